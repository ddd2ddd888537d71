//! One parse per document: sections, outcome, deadlines, actions, references.
//!
//! [`AnswerParser`] holds only immutable configuration, so a single instance
//! can serve any number of documents, sequentially or from many threads.

use std::sync::Arc;

use eci_core::{
    AnswerRecord, DocumentTree, OutcomeStatus, ParseContext, RelatedLegislation,
};
use tokio::task::JoinSet;
use tracing::{info, info_span, warn};

use crate::actions::extract_legislative_actions;
use crate::classifier::{OutcomeClassifier, law_implementation_date};
use crate::config::ExtractorConfig;
use crate::deadlines::extract_deadlines;
use crate::error::ExtractError;
use crate::identifiers::extract_formal;
use crate::policies::extract_policy_actions;
use crate::references::extract_informal;
use crate::section::Sections;

#[derive(Debug, Clone)]
pub struct AnswerParser {
    config: ExtractorConfig,
    classifier: OutcomeClassifier,
}

impl Default for AnswerParser {
    fn default() -> Self {
        Self::with_config(ExtractorConfig::default())
    }
}

impl AnswerParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        let classifier = OutcomeClassifier::new(config.preview_chars);
        Self { config, classifier }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the full record for one document.
    pub fn parse<D>(&self, doc: &D, ctx: &ParseContext) -> Result<AnswerRecord, ExtractError>
    where
        D: DocumentTree + ?Sized,
    {
        let _span = info_span!(
            "parse_answer",
            registration_number = %ctx.registration_number
        )
        .entered();

        let sections = Sections::locate(doc, &self.config, ctx)?;
        let answer_text = sections.answer_text();
        let status = self.classifier.classify(&answer_text, ctx)?;

        let law_implementation_date = match status {
            OutcomeStatus::Applicable => law_implementation_date(&answer_text),
            _ => None,
        };
        let commission_deadlines = extract_deadlines(&sections.commitment_blocks());
        let laws_actions = extract_legislative_actions(&sections, status, &self.config);
        let policies_actions = extract_policy_actions(&sections, &self.config);
        let related_eu_legislation = related_legislation(doc);

        info!(
            status = %status,
            deadlines = commission_deadlines.as_ref().map_or(0, |d| d.len()),
            laws = laws_actions.as_ref().map_or(0, Vec::len),
            policies = policies_actions.as_ref().map_or(0, Vec::len),
            "answer parsed"
        );

        Ok(AnswerRecord {
            registration_number: ctx.registration_number.clone(),
            outcome_status: status,
            final_outcome_status: status.label().to_string(),
            law_implementation_date,
            commission_deadlines,
            laws_actions,
            policies_actions,
            related_eu_legislation,
        })
    }

    /// Parse documents one after another. A failing document yields its own
    /// error and does not stop the rest.
    pub fn parse_batch<D>(&self, docs: &[(ParseContext, D)]) -> Vec<Result<AnswerRecord, ExtractError>>
    where
        D: DocumentTree,
    {
        docs.iter()
            .map(|(ctx, doc)| {
                let result = self.parse(doc, ctx);
                if let Err(e) = &result {
                    warn!(error = %e, "answer extraction failed");
                }
                result
            })
            .collect()
    }
}

/// Informal names and formal identifiers across the whole document.
fn related_legislation<D>(doc: &D) -> Option<RelatedLegislation>
where
    D: DocumentTree + ?Sized,
{
    let text = doc.raw_text();
    let links = doc.links();
    let related = RelatedLegislation {
        informal: extract_informal(&text),
        formal: extract_formal(&text, &links),
    };
    (!related.is_empty()).then_some(related)
}

/// Parse documents on the blocking pool, one task per document.
///
/// Results come back in input order. A task that panics is reported as
/// [`ExtractError::Worker`] for its document only.
pub async fn parse_concurrent<D>(
    parser: Arc<AnswerParser>,
    docs: Vec<(ParseContext, D)>,
) -> Vec<Result<AnswerRecord, ExtractError>>
where
    D: DocumentTree + Send + 'static,
{
    let registrations: Vec<String> = docs
        .iter()
        .map(|(ctx, _)| ctx.registration_number.clone())
        .collect();
    let mut slots: Vec<Option<Result<AnswerRecord, ExtractError>>> =
        registrations.iter().map(|_| None).collect();

    let mut set = JoinSet::new();
    for (idx, (ctx, doc)) in docs.into_iter().enumerate() {
        let parser = Arc::clone(&parser);
        set.spawn_blocking(move || (idx, parser.parse(&doc, &ctx)));
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, result)) => {
                if let Err(e) = &result {
                    warn!(error = %e, "answer extraction failed");
                }
                slots[idx] = Some(result);
            }
            Err(e) => warn!(%e, "answer extraction task failed"),
        }
    }

    slots
        .into_iter()
        .zip(registrations)
        .map(|(slot, registration_number)| {
            slot.unwrap_or_else(|| {
                Err(ExtractError::Worker {
                    registration_number,
                    detail: "task did not complete".into(),
                })
            })
        })
        .collect()
}
