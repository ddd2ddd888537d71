//! Extraction layer: outcome classification, deadlines, legislative and policy
//! actions, and legislation references from Commission answers.

pub mod actions;
pub mod classifier;
mod config;
pub mod deadlines;
mod error;
pub mod identifiers;
pub mod phrases;
mod pipeline;
pub mod policies;
pub mod references;
pub mod section;
pub mod sentences;

pub use classifier::{OutcomeClassifier, law_implementation_date};
pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use pipeline::{AnswerParser, parse_concurrent};
pub use section::{SectionKind, Sections};
