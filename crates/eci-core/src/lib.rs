//! Shared types, normalisers and Arrow schemas for Commission answer extraction.

pub mod dates;
pub mod document;
pub mod record;
pub mod schema;
pub mod status;
pub mod text;

pub use dates::{find_date_expression, normalize_period, parse_exact_date};
pub use document::{Document, DocumentTree, Element, HeadingSelector, Link, ParseContext};
pub use record::{
    ActionStatus, AnswerRecord, Deadlines, FormalReferences, InformalReferences,
    LegislativeAction, NonLegislativeAction, OfficialJournalRefs, RelatedLegislation,
};
pub use schema::answers;
pub use status::OutcomeStatus;
