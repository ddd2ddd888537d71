//! Structured records produced by one parse of one Commission answer.
//!
//! Every type here is a plain output value: built once per document, never
//! mutated afterwards, never shared between documents.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::status::OutcomeStatus;

/// Committed deadlines keyed by normalised date.
///
/// When several phrases resolve to the same date they are joined with `"; "`.
pub type Deadlines = BTreeMap<NaiveDate, String>;

/// Separator between phrases that share a deadline date.
pub const PHRASE_SEPARATOR: &str = "; ";

/// Merge `phrase` into the entry for `date`.
///
/// Returns `false` when the phrase was already recorded for that date.
pub fn merge_deadline(deadlines: &mut Deadlines, date: NaiveDate, phrase: &str) -> bool {
    match deadlines.get_mut(&date) {
        None => {
            deadlines.insert(date, phrase.to_string());
            true
        }
        Some(existing) => {
            if existing.split(PHRASE_SEPARATOR).any(|p| p == phrase) {
                return false;
            }
            existing.push_str(PHRASE_SEPARATOR);
            existing.push_str(phrase);
            true
        }
    }
}

// ── Actions ──

/// Lifecycle stage of a legislative act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Proposed,
    Adopted,
    InVacatioLegis,
    LawActive,
    Withdrawn,
    Planned,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Adopted => "adopted",
            Self::InVacatioLegis => "in_vacatio_legis",
            Self::LawActive => "law_active",
            Self::Withdrawn => "withdrawn",
            Self::Planned => "planned",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposal, adoption, entry-into-force or withdrawal event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislativeAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub description: String,
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub document_urls: Vec<String>,
}

/// A policy measure that is not legislation: studies, funding, dialogue, …
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonLegislativeAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Identity used to deduplicate actions.
pub type ActionKey = (String, String, Option<NaiveDate>);

impl LegislativeAction {
    pub fn key(&self) -> ActionKey {
        (self.action_type.clone(), self.description.clone(), self.date)
    }
}

impl NonLegislativeAction {
    pub fn key(&self) -> ActionKey {
        (self.action_type.clone(), self.description.clone(), self.date)
    }
}

// ── Legislation references ──

/// Informal legislation names found in prose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformalReferences {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub treaties: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regulations: Vec<String>,
}

impl InformalReferences {
    pub fn is_empty(&self) -> bool {
        self.treaties.is_empty()
            && self.charters.is_empty()
            && self.directives.is_empty()
            && self.regulations.is_empty()
    }
}

/// Official Journal references bucketed by series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialJournalRefs {
    /// L series.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legislation: Vec<String>,
    /// C series.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub information_and_notices: Vec<String>,
}

impl OfficialJournalRefs {
    pub fn is_empty(&self) -> bool {
        self.legislation.is_empty() && self.information_and_notices.is_empty()
    }
}

/// Formal identifiers: CELEX numbers, article numbers, OJ references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalReferences {
    #[serde(rename = "CELEX", default, skip_serializing_if = "Vec::is_empty")]
    pub celex: Vec<String>,
    #[serde(rename = "Article", default, skip_serializing_if = "Vec::is_empty")]
    pub articles: Vec<String>,
    #[serde(default, skip_serializing_if = "OfficialJournalRefs::is_empty")]
    pub official_journal: OfficialJournalRefs,
}

impl FormalReferences {
    pub fn is_empty(&self) -> bool {
        self.celex.is_empty() && self.articles.is_empty() && self.official_journal.is_empty()
    }
}

/// Every legislation reference of one answer, serialised as one flat map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLegislation {
    #[serde(flatten)]
    pub informal: InformalReferences,
    #[serde(flatten)]
    pub formal: FormalReferences,
}

impl RelatedLegislation {
    pub fn is_empty(&self) -> bool {
        self.informal.is_empty() && self.formal.is_empty()
    }
}

// ── Answer record ──

/// Everything extracted from one answer document, handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub registration_number: String,
    pub outcome_status: OutcomeStatus,
    /// Citizen-facing label of `outcome_status`.
    pub final_outcome_status: String,
    /// Date the adopted law became applicable; only set for `applicable`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_implementation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_deadlines: Option<Deadlines>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laws_actions: Option<Vec<LegislativeAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies_actions: Option<Vec<NonLegislativeAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_eu_legislation: Option<RelatedLegislation>,
}
