//! Phrase tables for outcome classification.
//!
//! Every entry is matched against text that went through
//! `clean_for_matching`: lowercase, single-spaced. Keep entries in that form.

use std::sync::LazyLock;

use regex::Regex;

// ── Applicability ──

pub const APPLICABILITY: &[&str] = &[
    "became applicable",
    "applicable immediately",
    "and applicable from",
];

pub const ENTERED_INTO_FORCE: &str = "entered into force";

/// Evidence that an act in force was actually adopted, not merely proposed.
pub static ADOPTION_EVIDENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"council\b[^.]{0,200}?\badopted\b|published in the official journal|following the agreement of",
    )
    .unwrap()
});

pub static APPLIES_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bappl(?:y|ies) from\b").unwrap());

pub const APPLIES_FROM_CONTEXT: &[&str] = &["adopted", "regulation", "directive"];

// ── Adoption ──

pub const OFFICIAL_JOURNAL: &str = "published in the official journal";

pub static ADOPTED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"was adopted by the commission|council\b[^.]{0,200}?\badopted\b").unwrap()
});

// ── Commitment ──

pub const COMMITMENTS: &[&str] = &[
    "committed to come forward with a legislative proposal",
    "committed to table a legislative proposal",
    "committed to propose",
    "intention to table a legislative proposal",
    "intends to table a legislative proposal",
    "will table a legislative proposal",
    "will come forward with a legislative proposal",
    "will put forward a legislative proposal",
    "will propose legislation",
    "decided to table a legislative proposal",
];

pub const TABLE_PROPOSAL: &str = "to table a legislative proposal";

// ── Assessment ──

/// Higher-priority signals that rule out `assessment_pending`.
pub const ASSESSMENT_SUPPRESSORS: &[&str] = &["intention to table", "became applicable"];

pub static EFSA_OPINION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"efsa[^.]{0,200}?scientific opinion|scientific opinion[^.]{0,200}?efsa|(?:mandated|asked|requested) (?:the )?(?:european food safety authority|efsa)",
    )
    .unwrap()
});

pub const IMPACT_ASSESSMENT: &str = "impact assessment";

pub const ASSESSMENT_LAUNCH: &[&str] = &[
    "launch",
    "consultation",
    "call for evidence",
    "inception",
];

pub const WILL_COMMUNICATE: &str = "will communicate";

pub const COMMUNICATION_TIMING: &[&str] = &[" by ", " after "];

// ── Roadmap ──

pub const ROADMAP: &str = "roadmap";

pub const ROADMAP_SUPPRESSORS: &[&str] = &["became applicable"];

pub const ROADMAP_DEVELOPMENT: &[&str] = &[
    "develop",
    "work on",
    "work with",
    "work together",
    "launched",
    "started work",
    "preparing",
    "towards",
    "prepare",
    "set out",
];

// ── Rejection ──

pub const REJECTIONS: &[&str] = &[
    "will not make a legislative proposal",
    "will not propose",
    "will not table",
    "decided not to submit",
    "decided not to make a legislative proposal",
    "not to make a legislative proposal",
    "not to put forward a legislative proposal",
    "does not intend to propose",
    "no new legislation",
    "no legislative proposal",
    "already covered",
    "outside eu competence",
    "outside the eu's competence",
    "outside the competence of the eu",
    "beyond the competences of the union",
    "not within the competence",
];

/// `no repeal` + `was proposed`: the initiative asked to repeal an act and the
/// answer declined.
pub const REPEAL_COMPOUND: (&str, &str) = ("no repeal", "was proposed");

pub const EXISTING_FRAMEWORK: &[&str] = &[
    "existing framework",
    "existing legal framework",
    "existing legislation",
    "existing eu legislation",
    "current legislation",
    "already covered",
    "already in place",
];

pub const CONTINUING_ACTIONS: &[&str] = &["committed", "will continue", "monitor", "support"];

// ── Non-legislative ──

pub const FOCUS: &[&str] = &["intends to focus on", "implementation of"];

pub const NON_LEGISLATIVE_ACTIONS: &[&str] = &[
    "will continue to",
    "action plan",
    "will launch",
    "will support",
    "will promote",
    "will monitor",
    "will work with member states",
    "guidelines",
    "guidance",
    "awareness",
    "exchange of good practices",
    "best practices",
    "financial support",
    "funding",
];

pub const PROPOSAL: &str = "proposal";

// ── Pending proposal ──

pub const TABLED: &str = "tabled";

pub const RATHER_THAN_NEW_ACTS: &str = "rather than proposing new legislative acts";

pub const FORCE_PHRASES: &[&str] = &[
    "entered into force",
    "became applicable",
    "applicable from",
    "applies from",
    "apply from",
];

// ── Applicability date ──

/// Phrases after which the applicability date is expected.
pub static APPLICABILITY_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)became applicable|applicable immediately|applicable from|appl(?:y|ies) from|entered into application",
    )
    .unwrap()
});

pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}
