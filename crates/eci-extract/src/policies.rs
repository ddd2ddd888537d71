//! Non-legislative actions: studies, funding, dialogue, monitoring and the like.

use std::collections::HashSet;
use std::sync::LazyLock;

use eci_core::text::{normalize_whitespace, strip_leading_punctuation};
use eci_core::{Element, NonLegislativeAction, find_date_expression};
use regex::Regex;
use tracing::debug;

use crate::actions::is_legislative;
use crate::config::ExtractorConfig;
use crate::section::Sections;

/// Policy taxonomy in match order; the first category whose pattern matches
/// names the action.
static POLICY_TYPES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "impact_assessment",
            r"(?i)\bimpact assessments?\b|\b(?:public|targeted|stakeholder) consultations?\b|\bcall for evidence\b",
        ),
        (
            "scientific_activity",
            r"(?i)\b(?:scientific|efsa|research|studies|study|expert opinion|evidence base|alternative methods?)\b",
        ),
        (
            "monitoring_enforcement",
            r"(?i)\b(?:monitor(?:s|ed|ing)?|enforce(?:ment|d)?|audits?|inspections?|infringement|compliance)\b",
        ),
        (
            "stakeholder_dialogue",
            r"(?i)\b(?:dialogues?|stakeholders?|platform|round ?tables?|workshops?|conferences?|citizens'? panels?)\b",
        ),
        (
            "funding_programme",
            r"(?i)\b(?:fund(?:s|ing|ed)?|financ(?:e|ing|ial support)|grants?|budget|horizon europe|life programme|eur \d|€\s?\d)",
        ),
        (
            "policy_roadmap",
            r"(?i)\b(?:roadmap|strategy|strategies|action plan|agenda|communication)\b",
        ),
        (
            "international_cooperation",
            r"(?i)\b(?:international|multilateral|bilateral|global|third countries|united nations|wto|oecd|who)\b",
        ),
        (
            "data_transparency",
            r"(?i)\b(?:data(?:base|set)?s?|transparen(?:t|cy)|labell?ing|information to consumers|reporting obligations?)\b",
        ),
        (
            "policy_implementation",
            r"(?i)\b(?:implement(?:s|ed|ing|ation)?|guidelines?|guidance|best practices?|good practices?|awareness|campaign|training|recommendations?)\b",
        ),
    ]
    .into_iter()
    .map(|(name, p)| (name, Regex::new(p).unwrap()))
    .collect()
});

pub fn policy_type(text: &str) -> Option<&'static str> {
    POLICY_TYPES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(name, _)| *name)
}

/// Short colon-terminated fragment such as "Next steps:".
fn is_header_like(text: &str, max_chars: usize) -> bool {
    text.ends_with(':') && text.chars().count() <= max_chars
}

/// Interpret one block as a non-legislative action.
pub fn policy_action(block: &Element, config: &ExtractorConfig) -> Option<NonLegislativeAction> {
    let text = strip_leading_punctuation(&normalize_whitespace(&block.text_content()));
    if text.chars().count() < config.min_policy_chars
        || is_header_like(&text, config.header_max_chars)
        || is_legislative(&text)
    {
        return None;
    }

    let action_type = policy_type(&text)?;
    Some(NonLegislativeAction {
        action_type: action_type.to_string(),
        date: find_date_expression(&text).map(|found| found.date),
        description: text,
    })
}

/// Non-legislative actions across Updates, Follow-up and Answer, deduplicated
/// by `(type, description, date)`.
pub fn extract_policy_actions(
    sections: &Sections<'_>,
    config: &ExtractorConfig,
) -> Option<Vec<NonLegislativeAction>> {
    let mut seen = HashSet::new();
    let actions: Vec<NonLegislativeAction> = sections
        .action_blocks()
        .into_iter()
        .filter_map(|(_, block)| policy_action(block, config))
        .filter(|action| seen.insert(action.key()))
        .collect();

    debug!(count = actions.len(), "policy actions extracted");
    (!actions.is_empty()).then_some(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use eci_core::{Document, ParseContext};
    use pretty_assertions::assert_eq;

    fn action(text: &str) -> Option<NonLegislativeAction> {
        policy_action(&Element::paragraph(text), &ExtractorConfig::default())
    }

    fn kind(text: &str) -> Option<String> {
        action(text).map(|a| a.action_type)
    }

    #[test]
    fn taxonomy_categories() {
        assert_eq!(
            kind("The Commission will launch a public consultation in 2024.").as_deref(),
            Some("impact_assessment")
        );
        assert_eq!(
            kind("EFSA was asked to review the available evidence on cages.").as_deref(),
            Some("scientific_activity")
        );
        assert_eq!(
            kind("Member States will step up enforcement of the current rules.").as_deref(),
            Some("monitoring_enforcement")
        );
        assert_eq!(
            kind("A dedicated platform will bring together the organisers.").as_deref(),
            Some("stakeholder_dialogue")
        );
        assert_eq!(
            kind("The LIFE programme will provide grants to farmers.").as_deref(),
            Some("funding_programme")
        );
        assert_eq!(
            kind("The Farm to Fork strategy sets out a coherent approach.").as_deref(),
            Some("policy_roadmap")
        );
        assert_eq!(
            kind("The EU will raise the issue in multilateral fora.").as_deref(),
            Some("international_cooperation")
        );
        assert_eq!(
            kind("Consumers will get better labelling of origin.").as_deref(),
            Some("data_transparency")
        );
        assert_eq!(
            kind("The Commission will issue guidelines on good welfare practice.").as_deref(),
            Some("policy_implementation")
        );
    }

    #[test]
    fn short_and_header_like_blocks_are_excluded() {
        assert_eq!(action("Funding: see below"), None);
        assert_eq!(action("The Commission will take the following actions on funding:"), None);
    }

    #[test]
    fn legislative_blocks_are_excluded() {
        assert_eq!(
            action("The Commission will monitor how the Directive (EU) 2019/904 is applied."),
            None
        );
        assert_eq!(
            action("A legislative proposal on monitoring will follow."),
            None
        );
    }

    #[test]
    fn unclassified_blocks_are_dropped() {
        assert_eq!(action("The Commission thanks the organisers for their engagement."), None);
    }

    #[test]
    fn date_is_taken_from_text() {
        let a = action("A public consultation will run until March 2025.").unwrap();
        assert_eq!(a.date, NaiveDate::from_ymd_opt(2025, 3, 31));
        assert_eq!(a.description, "A public consultation will run until March 2025.");
    }

    #[test]
    fn duplicates_across_sections_collapse() {
        let doc = Document::new(vec![
            Element::heading(2, None, "Answer of the Commission"),
            Element::paragraph("The Commission will issue guidelines on best practices."),
            Element::heading(2, None, "Follow-up"),
            Element::paragraph("The Commission will issue guidelines on best practices."),
            Element::paragraph("Next steps:"),
        ]);
        let config = ExtractorConfig::default();
        let sections = Sections::locate(&doc, &config, &ParseContext::new("X")).unwrap();
        let actions = extract_policy_actions(&sections, &config).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type, "policy_implementation");
    }
}
