//! Committed deadlines from Answer and Follow-up text.

use std::sync::LazyLock;

use eci_core::dates::DATE_EXPR;
use eci_core::record::merge_deadline;
use eci_core::text::{
    DEFAULT_STOP_WORDS, normalize_whitespace, strip_leading_punctuation, strip_trailing_phrases,
};
use eci_core::{Deadlines, Element, normalize_period};
use regex::Regex;
use tracing::debug;

use crate::sentences::{sentence_around, sentence_bounds};

/// Family of a deadline-bearing construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitmentKind {
    LegislativeProposal,
    Communication,
    Assessment,
    Roadmap,
    Report,
    DeadlineFirst,
}

pub struct DeadlinePattern {
    pub kind: CommitmentKind,
    pub regex: Regex,
}

/// Build a pattern whose named group `date` captures a date expression plus
/// any trailing qualifier words up to the next punctuation.
fn commitment(kind: CommitmentKind, lead: &str) -> DeadlinePattern {
    let regex = Regex::new(&format!(
        r"(?i){lead}\s+(?P<date>{DATE_EXPR}\b[^.;:!?\n\d]{{0,40}})"
    ))
    .unwrap();
    DeadlinePattern { kind, regex }
}

fn deadline_first(lead: &str) -> DeadlinePattern {
    let regex = Regex::new(&format!(
        r"(?i)\b{lead}\s+(?P<date>{DATE_EXPR})\b\s*,?\s+(?:the\s+commission|it)\s+(?:will|intends|plans|aims)\b"
    ))
    .unwrap();
    DeadlinePattern {
        kind: CommitmentKind::DeadlineFirst,
        regex,
    }
}

const BY: &str = r"\b(?P<prep>by|before|until|in|within|during|no\s+later\s+than)";

/// "in"/"during" only mark a deadline when the lead-in pledges future action.
static COMMITMENT_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:will|shall|intends?\s+to|plans?\s+to|(?:is\s+)?committed\s+to|commits\s+to|aims?\s+to|is\s+(?:expected|due|scheduled)\s+to|envisages?)\b",
    )
    .unwrap()
});

fn needs_cue(caps: &regex::Captures<'_>) -> bool {
    caps.name("prep")
        .is_some_and(|p| matches!(p.as_str().to_lowercase().as_str(), "in" | "during"))
}

pub static PATTERNS: LazyLock<Vec<DeadlinePattern>> = LazyLock::new(|| {
    vec![
        commitment(
            CommitmentKind::LegislativeProposal,
            &format!(
                r"\b(?:legislative\s+proposals?|(?:table|present|put\s+forward|come\s+forward\s+with)\s+(?:a\s+)?proposal)[^.;]{{0,80}}?{BY}"
            ),
        ),
        commitment(
            CommitmentKind::Communication,
            &format!(r"\bcommunicat(?:e|ion)[^.;]{{0,80}}?{BY}"),
        ),
        commitment(
            CommitmentKind::Assessment,
            &format!(
                r"\b(?:impact\s+assessment|assessment|study|studies|evaluation|review|consultation|fitness\s+check)[^.;]{{0,80}}?{BY}"
            ),
        ),
        commitment(
            CommitmentKind::Roadmap,
            &format!(r"\b(?:roadmap|action\s+plan|strategy)[^.;]{{0,80}}?{BY}"),
        ),
        commitment(
            CommitmentKind::Report,
            &format!(r"\breport(?:s|ing)?[^.;]{{0,80}}?{BY}"),
        ),
        deadline_first(r"(?:by|before|in|during|no\s+later\s+than)"),
    ]
});

/// Scan every block and merge all deadlines found. `None` when nothing
/// normalises.
pub fn extract_deadlines(blocks: &[&Element]) -> Option<Deadlines> {
    let mut deadlines = Deadlines::new();
    for block in blocks.iter().filter(|b| !b.is_heading()) {
        collect_from_text(&block.text_content(), &mut deadlines);
    }
    (!deadlines.is_empty()).then_some(deadlines)
}

/// Add the deadlines in `text` to `deadlines`; returns how many phrases were
/// newly recorded.
pub fn collect_from_text(text: &str, deadlines: &mut Deadlines) -> usize {
    let mut added = 0;
    for pattern in PATTERNS.iter() {
        for caps in pattern.regex.captures_iter(text) {
            let Some(found) = caps.name("date") else {
                continue;
            };
            let expression = strip_trailing_phrases(found.as_str(), DEFAULT_STOP_WORDS);
            let Some(date) = normalize_period(&expression) else {
                debug!(expression = %expression, "deadline expression dropped");
                continue;
            };

            if needs_cue(&caps) {
                let (from, _) = sentence_bounds(text, found.start(), found.end());
                if !COMMITMENT_CUE.is_match(&text[from..found.start()]) {
                    debug!(expression = found.as_str(), "past or uncommitted date skipped");
                    continue;
                }
            }

            let sentence = sentence_around(text, found.start(), found.end());
            let phrase = strip_leading_punctuation(&normalize_whitespace(sentence));
            if phrase.is_empty() {
                continue;
            }
            if merge_deadline(deadlines, date, &phrase) {
                debug!(kind = ?pattern.kind, %date, "deadline recorded");
                added += 1;
            }
        }
    }
    added
}
