//! Section discovery: the Answer, Follow-up and Updates parts of a page.

use eci_core::{DocumentTree, Element, ParseContext};
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Answer,
    FollowUp,
    Updates,
}

/// The sections of one document, borrowed from its tree.
#[derive(Debug)]
pub struct Sections<'a> {
    pub answer: Vec<&'a Element>,
    pub follow_up: Option<Vec<&'a Element>>,
    pub updates: Option<Vec<&'a Element>>,
}

impl<'a> Sections<'a> {
    /// Locate all sections. The Answer section is mandatory.
    pub fn locate<D>(
        doc: &'a D,
        config: &ExtractorConfig,
        ctx: &ParseContext,
    ) -> Result<Self, ExtractError>
    where
        D: DocumentTree + ?Sized,
    {
        let answer_idx = doc.find_heading(&config.answer_heading).ok_or_else(|| {
            ExtractError::MissingSection {
                registration_number: ctx.registration_number.clone(),
                heading: config.answer_heading.text.clone(),
            }
        })?;

        let answer = doc.section(answer_idx);
        let follow_up = doc
            .find_heading(&config.follow_up_heading)
            .map(|idx| doc.section(idx));
        let updates = doc
            .find_heading(&config.updates_heading)
            .map(|idx| doc.section(idx));

        debug!(
            answer_elements = answer.len(),
            follow_up = follow_up.is_some(),
            updates = updates.is_some(),
            "sections located"
        );

        Ok(Self {
            answer,
            follow_up,
            updates,
        })
    }

    pub fn has_follow_up(&self) -> bool {
        self.follow_up.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Full Answer text, one element per line, headings excluded.
    pub fn answer_text(&self) -> String {
        section_text(&self.answer)
    }

    /// Paragraphs and list items of the Answer and Follow-up sections.
    pub fn commitment_blocks(&self) -> Vec<&'a Element> {
        let mut blocks = text_blocks(&self.answer);
        if let Some(follow_up) = &self.follow_up {
            blocks.extend(text_blocks(follow_up));
        }
        blocks
    }

    /// Paragraphs and list items tagged by section, highest priority first:
    /// Updates, then Follow-up, then Answer.
    pub fn action_blocks(&self) -> Vec<(SectionKind, &'a Element)> {
        let mut out = Vec::new();
        if let Some(updates) = &self.updates {
            out.extend(text_blocks(updates).into_iter().map(|b| (SectionKind::Updates, b)));
        }
        if let Some(follow_up) = &self.follow_up {
            out.extend(text_blocks(follow_up).into_iter().map(|b| (SectionKind::FollowUp, b)));
        }
        out.extend(
            text_blocks(&self.answer)
                .into_iter()
                .map(|b| (SectionKind::Answer, b)),
        );
        out
    }
}

/// Non-heading text blocks, list items flattened.
fn text_blocks<'a>(elements: &[&'a Element]) -> Vec<&'a Element> {
    elements
        .iter()
        .filter(|e| !e.is_heading())
        .flat_map(|&e| e.blocks())
        .filter(|b| b.is_significant())
        .collect()
}

fn section_text(elements: &[&Element]) -> String {
    elements
        .iter()
        .filter(|e| !e.is_heading())
        .map(|e| e.text_content())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
