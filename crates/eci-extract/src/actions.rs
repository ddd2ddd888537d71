//! Legislative actions: proposals, adoptions, entry into force, withdrawals.
//!
//! Each paragraph or list item is tested against a table of status rules.
//! A rule fires when one of its keywords occurs and the block names a
//! legislative object; the firing rule with the lowest priority number sets
//! the action's status.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use eci_core::text::{normalize_whitespace, strip_leading_punctuation};
use eci_core::{ActionStatus, Element, LegislativeAction, OutcomeStatus, find_date_expression};
use regex::{Match, Regex};
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::phrases::{COMMITMENTS, contains_any};
use crate::section::Sections;
use crate::sentences::clause_bounds;

// ── Status rules ──

pub struct StatusRule {
    pub status: ActionStatus,
    pub priority: u8,
    pub keywords: &'static LazyLock<Regex>,
}

static LAW_ACTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:entered into (?:force|application)|became applicable|(?:is|are) (?:now )?(?:in force|applicable)|in force since|appl(?:y|ies|icable) (?:from|since))\b",
    )
    .unwrap()
});

static IN_VACATIO_LEGIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:will (?:enter into force|become applicable|apply|start to apply|be applicable)|enters into force|shall apply|transposition (?:deadline|period)|(?:to be|must be) transposed)\b",
    )
    .unwrap()
});

static ADOPTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:adopted|published in the official journal|signed|(?:political|provisional) agreement)\b",
    )
    .unwrap()
});

static WITHDRAWN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:withdr(?:ew|awn|awal)|withdraw|repealed)\b").unwrap()
});

static PROPOSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:proposed|tabled|put forward|presented|submitted)\b").unwrap()
});

/// Auxiliaries that turn a proposal keyword into a plan.
static FUTURE_AUXILIARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:will|would|shall|to|be)\s+$").unwrap());

static PLANNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:will (?:propose|table|present|put forward|come forward|prepare|revise|amend)|plans? to|intends? to|is preparing|envisages?|considering)\b",
    )
    .unwrap()
});

/// "adopted a proposal" describes a proposal, not an adopted act.
static ADOPTED_PROPOSAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s+(?:a|an|its|the|two|several)\s+(?:[\w-]+\s+){0,2}proposals?\b").unwrap()
});

/// Rules in priority order.
pub static STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        status: ActionStatus::LawActive,
        priority: 1,
        keywords: &LAW_ACTIVE,
    },
    StatusRule {
        status: ActionStatus::InVacatioLegis,
        priority: 2,
        keywords: &IN_VACATIO_LEGIS,
    },
    StatusRule {
        status: ActionStatus::Adopted,
        priority: 3,
        keywords: &ADOPTED,
    },
    StatusRule {
        status: ActionStatus::Withdrawn,
        priority: 4,
        keywords: &WITHDRAWN,
    },
    StatusRule {
        status: ActionStatus::Proposed,
        priority: 5,
        keywords: &PROPOSED,
    },
    StatusRule {
        status: ActionStatus::Planned,
        priority: 6,
        keywords: &PLANNED,
    },
];

/// Names of legislative objects. A block without one is not a legislative action.
static LEGISLATIVE_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:regulations?|directives?|decisions?|legislati(?:on|ve)|laws?|(?:delegated|implementing) acts?|amendments?|recast|revision|tariffs?|combined nomenclature|technical standards?)\b",
    )
    .unwrap()
});

/// Keywords that mark a block as legislative, for excluding it from the
/// non-legislative scan.
pub static LEGISLATIVE_KEYWORDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\blegislative proposals?\b",
        r"(?i)\b(?:regulation|directive)\s*(?:\((?:eu|ec|eec)\)|\d)",
        r"(?i)\b(?:entered|enter|entry) into force\b",
        r"(?i)\bbecame applicable\b",
        r"(?i)\bofficial journal\b",
        r"(?i)\b(?:delegated|implementing) acts?\b",
        r"(?i)\bamend(?:s|ed|ing|ment)?\b[^.]{0,60}\b(?:regulation|directive)\b",
        r"(?i)\b(?:adopted|proposed|withdrew|withdrawn)\b[^.]{0,60}\b(?:regulation|directive|legislation)\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub fn is_legislative(text: &str) -> bool {
    LEGISLATIVE_KEYWORDS.iter().any(|re| re.is_match(text))
}

// ── Action types ──

static ACTION_TYPES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "tariff_classification",
            r"(?i)\b(?:tariffs?|combined nomenclature|cn codes?|customs classification)\b",
        ),
        (
            "technical_standard",
            r"(?i)\b(?:technical|harmoni[sz]ed) standards?\b|\bstandardi[sz]ation\b",
        ),
        ("revision", r"(?i)\b(?:revis(?:e|ed|es|ing|ion)|recast)\b"),
        ("amendment", r"(?i)\bamend(?:s|ed|ing|ment|ments)?\b"),
        ("legislative_proposal", r"(?i)\bpropos(?:e|ed|es|al|als)\b"),
        ("adoption", r"(?i)\badopt(?:ed|ion|s)?\b"),
        (
            "entry_into_force",
            r"(?i)\b(?:entered|enter|enters|entry) into force\b|\b(?:became|become) applicable\b",
        ),
        ("withdrawal", r"(?i)\bwithdr(?:ew|aw|awn|awal)\b"),
    ]
    .into_iter()
    .map(|(name, p)| (name, Regex::new(p).unwrap()))
    .collect()
});

const GENERIC_TYPE: &str = "legislative_action";

pub fn action_type(text: &str) -> &'static str {
    ACTION_TYPES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(name, _)| *name)
        .unwrap_or(GENERIC_TYPE)
}

// ── Matching ──

/// The winning rule for a block and where its keyword matched.
fn best_status<'t>(text: &'t str) -> Option<(&'static StatusRule, Match<'t>)> {
    STATUS_RULES
        .iter()
        .filter_map(|rule| keyword_match(rule, text).map(|m| (rule, m)))
        .min_by_key(|(rule, _)| rule.priority)
}

fn keyword_match<'t>(rule: &StatusRule, text: &'t str) -> Option<Match<'t>> {
    match rule.status {
        ActionStatus::Adopted => rule
            .keywords
            .find_iter(text)
            .find(|m| !is_adopted_proposal(text, *m)),
        ActionStatus::Proposed => rule
            .keywords
            .find_iter(text)
            .find(|m| !FUTURE_AUXILIARY.is_match(&text[..m.start()]))
            .or_else(|| {
                ADOPTED
                    .find_iter(text)
                    .find(|m| is_adopted_proposal(text, *m))
            }),
        _ => rule.keywords.find(text),
    }
}

fn is_adopted_proposal(text: &str, m: Match<'_>) -> bool {
    m.as_str().eq_ignore_ascii_case("adopted") && ADOPTED_PROPOSAL.is_match(&text[m.end()..])
}

/// Date in the clause around the keyword, else anywhere in the block. Within
/// the clause, a date after the keyword is preferred.
pub fn action_date(text: &str, start: usize, end: usize) -> Option<NaiveDate> {
    let (from, to) = clause_bounds(text, start, end);
    find_date_expression(&text[end..to])
        .or_else(|| find_date_expression(&text[from..to]))
        .or_else(|| find_date_expression(text))
        .map(|found| found.date)
}

/// Interpret one block as a legislative action.
pub fn legislative_action(block: &Element, config: &ExtractorConfig) -> Option<LegislativeAction> {
    let text = block.text_content();
    if !LEGISLATIVE_OBJECT.is_match(&text) {
        return None;
    }
    let (rule, keyword) = best_status(&text)?;

    let document_urls = block
        .all_links()
        .into_iter()
        .filter(|link| config.is_legal_document(&link.href))
        .map(|link| link.href.clone())
        .collect();

    Some(LegislativeAction {
        action_type: action_type(&text).to_string(),
        description: strip_leading_punctuation(&normalize_whitespace(&text)),
        status: rule.status,
        date: action_date(&text, keyword.start(), keyword.end()),
        document_urls,
    })
}

/// Whether the document's outcome allows legislative actions at all.
fn actions_expected(sections: &Sections<'_>, outcome: OutcomeStatus) -> bool {
    if outcome.is_rejection() {
        let answer = sections.answer_text().to_lowercase();
        return answer.contains("committed") || contains_any(&answer, COMMITMENTS);
    }
    outcome != OutcomeStatus::Committed || sections.has_follow_up()
}

/// Legislative actions across Updates, Follow-up and Answer, deduplicated by
/// `(type, description, date)` with the earlier section winning.
pub fn extract_legislative_actions(
    sections: &Sections<'_>,
    outcome: OutcomeStatus,
    config: &ExtractorConfig,
) -> Option<Vec<LegislativeAction>> {
    if !actions_expected(sections, outcome) {
        debug!(outcome = %outcome, "legislative actions not expected");
        return None;
    }

    let mut seen = HashSet::new();
    let actions: Vec<LegislativeAction> = sections
        .action_blocks()
        .into_iter()
        .filter_map(|(_, block)| legislative_action(block, config))
        .filter(|action| seen.insert(action.key()))
        .collect();

    debug!(count = actions.len(), "legislative actions extracted");
    (!actions.is_empty()).then_some(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eci_core::{Document, ParseContext};
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    fn action(text: &str) -> Option<LegislativeAction> {
        legislative_action(&Element::paragraph(text), &ExtractorConfig::default())
    }

    #[test]
    fn rules_are_in_priority_order() {
        assert!(STATUS_RULES.windows(2).all(|w| w[0].priority < w[1].priority));
    }

    #[test]
    fn entry_into_force_is_law_active() {
        let a = action("The Regulation entered into force on 26 March 2019.").unwrap();
        assert_eq!(a.status, ActionStatus::LawActive);
        assert_eq!(a.action_type, "entry_into_force");
        assert_eq!(a.date, d(2019, 3, 26));
    }

    #[test]
    fn lowest_priority_number_wins() {
        let a = action(
            "The Directive was adopted on 5 June 2019 and entered into force on 2 July 2019.",
        )
        .unwrap();
        assert_eq!(a.status, ActionStatus::LawActive);
        assert_eq!(a.action_type, "adoption");
        assert_eq!(a.date, d(2019, 7, 2));
    }

    #[test]
    fn future_application_is_vacatio_legis() {
        let a = action("The new Regulation will apply from 1 January 2026.").unwrap();
        assert_eq!(a.status, ActionStatus::InVacatioLegis);
        assert_eq!(a.date, d(2026, 1, 1));
    }

    #[test]
    fn adopted_a_proposal_counts_as_proposed() {
        let a = action(
            "On 13 February 2023 the Commission adopted a proposal to revise the Directive.",
        )
        .unwrap();
        assert_eq!(a.status, ActionStatus::Proposed);
        assert_eq!(a.action_type, "revision");
        assert_eq!(a.date, d(2023, 2, 13));
    }

    #[test]
    fn adopted_act_counts_as_adopted() {
        let a = action("The Council adopted the amending Regulation in April 2022.").unwrap();
        assert_eq!(a.status, ActionStatus::Adopted);
        assert_eq!(a.action_type, "amendment");
        assert_eq!(a.date, d(2022, 4, 30));
    }

    #[test]
    fn withdrawal() {
        let a = action("The legislative proposal was withdrawn in 2020.").unwrap();
        assert_eq!(a.status, ActionStatus::Withdrawn);
        assert_eq!(a.action_type, "legislative_proposal");
        assert_eq!(a.date, d(2020, 12, 31));
    }

    #[test]
    fn planned_without_date() {
        let a = action("The Commission intends to present new legislation on animal transport.")
            .unwrap();
        assert_eq!(a.status, ActionStatus::Planned);
        assert_eq!(a.action_type, GENERIC_TYPE);
        assert_eq!(a.date, None);
    }

    #[test]
    fn tariff_type_has_precedence() {
        let a = action("An amendment to the Combined Nomenclature was adopted in 2021.").unwrap();
        assert_eq!(a.action_type, "tariff_classification");
    }

    #[test]
    fn technical_standard_type() {
        let a = action("Harmonised standards under the Toy Safety Regulation entered into force in 2023.")
            .unwrap();
        assert_eq!(a.status, ActionStatus::LawActive);
        assert_eq!(a.action_type, "technical_standard");
        assert_eq!(a.date, d(2023, 12, 31));
    }

    #[test]
    fn withdrawal_type_without_proposal() {
        let a = action("The Commission withdrew the Regulation on plastic bags in 2019.").unwrap();
        assert_eq!(a.status, ActionStatus::Withdrawn);
        assert_eq!(a.action_type, "withdrawal");
        assert_eq!(a.date, d(2019, 12, 31));
    }

    #[test]
    fn action_type_cascade_order() {
        let cases = [
            ("a tariff change adopted to revise the CN codes", "tariff_classification"),
            ("technical standards revised and amended", "technical_standard"),
            ("the Directive was revised and amended", "revision"),
            ("the Regulation was amended and adopted", "amendment"),
            ("the proposal was adopted", "legislative_proposal"),
            ("the act was adopted and entered into force", "adoption"),
            ("the act entered into force before it was withdrawn", "entry_into_force"),
            ("the act was withdrawn", "withdrawal"),
            ("new rules on animal welfare", GENERIC_TYPE),
        ];
        for (text, expected) in cases {
            assert_eq!(action_type(text), expected, "{text}");
        }
    }

    #[test]
    fn date_prefers_keyword_clause() {
        let a = action(
            "The proposal of 2018 was discussed at length; the Directive entered into force in June 2021.",
        )
        .unwrap();
        assert_eq!(a.status, ActionStatus::LawActive);
        assert_eq!(a.date, d(2021, 6, 30));
    }

    #[test]
    fn blocks_without_legislative_object_are_skipped() {
        assert!(action("The Commission presented its findings to stakeholders.").is_none());
        assert!(action("The Regulation is an important instrument.").is_none());
    }

    #[test]
    fn legal_document_links_are_collected() {
        let block = Element::paragraph("The Regulation entered into force in 2021.")
            .with_link(
                "https://eur-lex.europa.eu/legal-content/EN/TXT/?uri=CELEX:32019R1021",
                "Regulation",
            )
            .with_link("https://example.org/press", "press release");
        let a = legislative_action(&block, &ExtractorConfig::default()).unwrap();
        assert_eq!(
            a.document_urls,
            vec!["https://eur-lex.europa.eu/legal-content/EN/TXT/?uri=CELEX:32019R1021"]
        );
    }

    fn document(follow_up: Option<&str>) -> Document {
        let mut doc = Document::new(vec![
            Element::heading(2, None, "Answer of the Commission"),
            Element::paragraph("The Commission will table a legislative proposal by 2023."),
        ]);
        if let Some(text) = follow_up {
            doc.push(Element::heading(2, None, "Follow-up"));
            doc.push(Element::paragraph(text));
        }
        doc
    }

    #[test]
    fn committed_without_follow_up_has_no_actions() {
        let doc = document(None);
        let config = ExtractorConfig::default();
        let sections = Sections::locate(&doc, &config, &ParseContext::new("X")).unwrap();
        assert_eq!(
            extract_legislative_actions(&sections, OutcomeStatus::Committed, &config),
            None
        );
    }

    #[test]
    fn follow_up_actions_come_first_and_deduplicate() {
        let doc = document(Some("The Commission adopted a legislative proposal on 7 June 2023."));
        let config = ExtractorConfig::default();
        let sections = Sections::locate(&doc, &config, &ParseContext::new("X")).unwrap();
        let actions =
            extract_legislative_actions(&sections, OutcomeStatus::Committed, &config).unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].status, ActionStatus::Proposed);
        assert_eq!(actions[0].date, d(2023, 6, 7));
        assert_eq!(actions[1].status, ActionStatus::Planned);
        assert_eq!(actions[1].date, d(2023, 12, 31));
    }

    #[test]
    fn rejection_without_commitment_has_no_actions() {
        let doc = Document::new(vec![
            Element::heading(2, None, "Answer of the Commission"),
            Element::paragraph("The Commission will not propose new legislation."),
        ]);
        let config = ExtractorConfig::default();
        let sections = Sections::locate(&doc, &config, &ParseContext::new("X")).unwrap();
        assert_eq!(
            extract_legislative_actions(&sections, OutcomeStatus::Rejected, &config),
            None
        );
    }
}
