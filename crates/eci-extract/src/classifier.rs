//! Priority-ordered outcome classification of a Commission answer.
//!
//! The classifier is an ordered table of `(tier, check)` rules evaluated
//! against the normalised Answer text. The first rule whose check returns a
//! status decides the outcome; later rules never run. Rule order *is* the
//! priority order of [`OutcomeStatus`].

use chrono::NaiveDate;
use eci_core::text::{clean_for_matching, preview};
use eci_core::{OutcomeStatus, ParseContext, find_date_expression};
use tracing::debug;

use crate::error::ExtractError;
use crate::phrases::*;
use crate::sentences::{clause_after, sentence_around};

/// One entry of the strategy table.
///
/// `check` receives normalised text and returns the status it decides, or
/// `None` to pass. Most rules return `tier`; the rejection rule picks one of
/// the three rejection variants.
#[derive(Clone, Copy)]
pub struct OutcomeRule {
    pub tier: OutcomeStatus,
    pub check: fn(&str) -> Option<OutcomeStatus>,
}

impl std::fmt::Debug for OutcomeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutcomeRule").field("tier", &self.tier).finish()
    }
}

/// Rules in evaluation order.
pub const RULES: &[OutcomeRule] = &[
    OutcomeRule {
        tier: OutcomeStatus::Applicable,
        check: check_applicable,
    },
    OutcomeRule {
        tier: OutcomeStatus::Adopted,
        check: check_adopted,
    },
    OutcomeRule {
        tier: OutcomeStatus::Committed,
        check: check_committed,
    },
    OutcomeRule {
        tier: OutcomeStatus::AssessmentPending,
        check: check_assessment_pending,
    },
    OutcomeRule {
        tier: OutcomeStatus::RoadmapDevelopment,
        check: check_roadmap,
    },
    OutcomeRule {
        tier: OutcomeStatus::Rejected,
        check: check_rejection,
    },
    OutcomeRule {
        tier: OutcomeStatus::NonLegislativeAction,
        check: check_non_legislative,
    },
    OutcomeRule {
        tier: OutcomeStatus::ProposalPendingAdoption,
        check: check_proposal_pending,
    },
];

fn when(cond: bool, status: OutcomeStatus) -> Option<OutcomeStatus> {
    cond.then_some(status)
}

// ── Predicates ──

fn has_applicability(text: &str) -> bool {
    contains_any(text, APPLICABILITY)
}

fn check_applicable(text: &str) -> Option<OutcomeStatus> {
    let in_force_and_adopted =
        text.contains(ENTERED_INTO_FORCE) && ADOPTION_EVIDENCE.is_match(text);
    let applies_from =
        APPLIES_FROM.is_match(text) && contains_any(text, APPLIES_FROM_CONTEXT);

    when(
        has_applicability(text) || in_force_and_adopted || applies_from,
        OutcomeStatus::Applicable,
    )
}

fn check_adopted(text: &str) -> Option<OutcomeStatus> {
    let published = text.contains(OFFICIAL_JOURNAL) && !has_applicability(text);
    when(
        published || ADOPTED_BY.is_match(text),
        OutcomeStatus::Adopted,
    )
}

fn check_committed(text: &str) -> Option<OutcomeStatus> {
    let table_by = text.contains(TABLE_PROPOSAL) && text.contains(" by ");
    when(
        contains_any(text, COMMITMENTS) || table_by,
        OutcomeStatus::Committed,
    )
}

fn check_assessment_pending(text: &str) -> Option<OutcomeStatus> {
    if contains_any(text, ASSESSMENT_SUPPRESSORS) {
        return None;
    }
    let impact_launch =
        text.contains(IMPACT_ASSESSMENT) && contains_any(text, ASSESSMENT_LAUNCH);
    let communicate =
        text.contains(WILL_COMMUNICATE) && contains_any(text, COMMUNICATION_TIMING);

    when(
        EFSA_OPINION.is_match(text) || impact_launch || communicate,
        OutcomeStatus::AssessmentPending,
    )
}

fn check_roadmap(text: &str) -> Option<OutcomeStatus> {
    if contains_any(text, ROADMAP_SUPPRESSORS) {
        return None;
    }
    when(
        text.contains(ROADMAP) && contains_any(text, ROADMAP_DEVELOPMENT),
        OutcomeStatus::RoadmapDevelopment,
    )
}

fn check_rejection(text: &str) -> Option<OutcomeStatus> {
    let (no_repeal, proposed) = REPEAL_COMPOUND;
    let rejected = contains_any(text, REJECTIONS)
        || (text.contains(no_repeal) && text.contains(proposed));
    if !rejected {
        return None;
    }

    let status = if contains_any(text, EXISTING_FRAMEWORK) {
        OutcomeStatus::RejectedAlreadyCovered
    } else if contains_any(text, CONTINUING_ACTIONS) {
        OutcomeStatus::RejectedWithActions
    } else {
        OutcomeStatus::Rejected
    };
    Some(status)
}

fn check_non_legislative(text: &str) -> Option<OutcomeStatus> {
    when(
        !text.contains(PROPOSAL)
            && (contains_any(text, FOCUS) || contains_any(text, NON_LEGISLATIVE_ACTIONS)),
        OutcomeStatus::NonLegislativeAction,
    )
}

fn check_proposal_pending(text: &str) -> Option<OutcomeStatus> {
    when(
        text.contains(PROPOSAL)
            && text.contains(TABLED)
            && text.contains(RATHER_THAN_NEW_ACTS)
            && !contains_any(text, FORCE_PHRASES),
        OutcomeStatus::ProposalPendingAdoption,
    )
}

// ── Classifier ──

/// Derives exactly one [`OutcomeStatus`] per answer.
#[derive(Debug, Clone)]
pub struct OutcomeClassifier {
    rules: &'static [OutcomeRule],
    preview_chars: usize,
}

impl Default for OutcomeClassifier {
    fn default() -> Self {
        Self::new(300)
    }
}

impl OutcomeClassifier {
    pub fn new(preview_chars: usize) -> Self {
        Self {
            rules: RULES,
            preview_chars,
        }
    }

    pub fn rules(&self) -> &[OutcomeRule] {
        self.rules
    }

    /// Classify already-normalised text; `None` when no rule fires.
    pub fn classify_normalized(&self, normalized: &str) -> Option<OutcomeStatus> {
        self.rules.iter().find_map(|rule| (rule.check)(normalized))
    }

    /// Classify raw Answer text.
    pub fn classify(
        &self,
        answer_text: &str,
        ctx: &ParseContext,
    ) -> Result<OutcomeStatus, ExtractError> {
        let normalized = clean_for_matching(answer_text);
        match self.classify_normalized(&normalized) {
            Some(status) => {
                debug!(status = %status, "outcome classified");
                Ok(status)
            }
            None => Err(ExtractError::ClassificationExhausted {
                registration_number: ctx.registration_number.clone(),
                preview: preview(&normalized, self.preview_chars),
            }),
        }
    }
}

/// Date the adopted act became applicable, read from the clause following the
/// first applicability phrase that carries one; falls back to the sentence
/// around the phrase.
pub fn law_implementation_date(answer_text: &str) -> Option<NaiveDate> {
    APPLICABILITY_ANCHOR.find_iter(answer_text).find_map(|m| {
        find_date_expression(clause_after(answer_text, m.end()))
            .or_else(|| find_date_expression(sentence_around(answer_text, m.start(), m.end())))
            .map(|found| found.date)
    })
}
