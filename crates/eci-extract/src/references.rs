//! Informal legislation names: "Water Framework Directive", "REACH",
//! "Treaty on the Functioning of the European Union", …

use std::collections::HashSet;
use std::sync::LazyLock;

use eci_core::InformalReferences;
use eci_core::text::{normalize_whitespace, unescape_html, unwrap_emphasis};
use regex::Regex;

/// Kind of legislative instrument a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Treaty,
    Charter,
    Directive,
    Regulation,
}

impl InstrumentKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Treaty => "Treaty",
            Self::Charter => "Charter",
            Self::Directive => "Directive",
            Self::Regulation => "Regulation",
        }
    }

    fn abbreviations(&self) -> &'static [&'static str] {
        match self {
            Self::Treaty => TREATY_ABBREVIATIONS,
            Self::Charter => CHARTER_ABBREVIATIONS,
            Self::Directive => DIRECTIVE_ABBREVIATIONS,
            Self::Regulation => REGULATION_ABBREVIATIONS,
        }
    }
}

// ── Abbreviation tables ──

pub const TREATY_ABBREVIATIONS: &[&str] = &["TEU", "TFEU", "TEC", "TEEC", "ECSC", "EAEC"];

pub const CHARTER_ABBREVIATIONS: &[&str] = &["CFR", "ECHR"];

pub const DIRECTIVE_ABBREVIATIONS: &[&str] = &[
    "WFD", "MSFD", "UWWTD", "IED", "EIA", "SEA", "EPBD", "RED", "WEEE", "RoHS", "ELV", "SUPD",
    "AVMSD", "NECD",
];

pub const REGULATION_ABBREVIATIONS: &[&str] = &[
    "REACH", "GDPR", "CLP", "EUDR", "PPWR", "BPR", "NRL", "SFDR", "DSA", "DMA", "CPR",
];

// ── Name patterns ──

const CAPITALISED: &str = r"[A-Z][A-Za-z0-9'’]*(?:-[A-Za-z0-9]+)*";
const JOINERS: &str = r"(?:of|on|for|the|in|to|with|de|des|du|-)";
/// Spaces within a line; a newline separates blocks and never joins a name.
const GAP: &str = r"[^\S\n]+";

/// A run of capitalised words, optionally joined by lowercase connectives,
/// ending in the instrument keyword.
fn suffix_pattern(keyword: &str) -> Regex {
    Regex::new(&format!(
        r"\b{CAPITALISED}(?:{GAP}(?:{JOINERS}{GAP})*{CAPITALISED})*{GAP}{keyword}s?\b"
    ))
    .unwrap()
}

/// The instrument keyword followed by `of`/`on`/`establishing` and a
/// capitalised run: "Treaty on European Union".
fn prefix_pattern(keyword: &str) -> Regex {
    Regex::new(&format!(
        r"\b{keyword}{GAP}(?:on|of|establishing){GAP}(?:the{GAP})?{CAPITALISED}(?:{GAP}(?:(?:of|the|on){GAP})*{CAPITALISED})*"
    ))
    .unwrap()
}

fn abbreviation_pattern(abbreviations: &[&str]) -> Regex {
    Regex::new(&format!(r"\b(?:{})\b", abbreviations.join("|"))).unwrap()
}

struct NamePatterns {
    kind: InstrumentKind,
    patterns: Vec<Regex>,
    abbreviations: Regex,
}

static NAME_PATTERNS: LazyLock<Vec<NamePatterns>> = LazyLock::new(|| {
    [
        InstrumentKind::Treaty,
        InstrumentKind::Charter,
        InstrumentKind::Directive,
        InstrumentKind::Regulation,
    ]
    .into_iter()
    .map(|kind| {
        let mut patterns = vec![suffix_pattern(kind.keyword())];
        if matches!(kind, InstrumentKind::Treaty | InstrumentKind::Charter) {
            patterns.push(prefix_pattern(kind.keyword()));
        }
        NamePatterns {
            kind,
            patterns,
            abbreviations: abbreviation_pattern(kind.abbreviations()),
        }
    })
    .collect()
});

/// Words stripped from the front of a captured name.
const LEADING_NOISE: &[&str] = &[
    "the", "a", "an", "in", "under", "with", "by", "on", "of", "for", "and", "or", "to", "this",
    "that", "these", "its", "their", "as", "while", "since", "both", "new", "see", "also",
    "according", "pursuant", "following", "within", "from", "at", "into", "via",
];

/// Qualifiers that, with nothing else, leave a name generic ("the EU Directive").
const GENERIC_QUALIFIERS: &[&str] = &[
    "eu", "european", "union", "commission", "council", "parliament", "proposal", "proposed",
    "for", "a", "the", "new", "existing", "relevant", "current", "said", "amending", "revised",
    "implementing", "delegated", "framework",
];

static LIST_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*|\s+(?:and|or)\s+").unwrap());

// ── Post-processing ──

fn strip_leading_noise(name: &str) -> &str {
    let mut rest = name.trim();
    loop {
        let Some((first, tail)) = rest.split_once(char::is_whitespace) else {
            return rest;
        };
        if !LEADING_NOISE.contains(&first.to_lowercase().as_str()) {
            return rest;
        }
        rest = tail.trim_start();
    }
}

fn keyword_count(name: &str, keyword: &str) -> usize {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.eq_ignore_ascii_case(keyword) || w.eq_ignore_ascii_case(&format!("{keyword}s")))
        .count()
}

/// Split "Birds Directive and Habitats Directive" into its parts; the
/// combined original is not kept.
fn split_combined(name: &str, keyword: &str) -> Vec<String> {
    if keyword_count(name, keyword) < 2 {
        return vec![name.to_string()];
    }
    LIST_SPLIT
        .split(name)
        .map(|part| strip_leading_noise(part).to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn is_generic(name: &str, keyword: &str) -> bool {
    name.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .all(|w| {
            w == keyword.to_lowercase()
                || w == format!("{}s", keyword.to_lowercase())
                || GENERIC_QUALIFIERS.contains(&w.as_str())
        })
}

/// Case-insensitive dedup keeping the first spelling, then case-insensitive sort.
pub fn dedup_sorted(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect();
    out.sort_by_key(|item| item.to_lowercase());
    out
}

/// Drop abbreviations whose "abbreviation + keyword" form is also listed.
fn drop_covered_abbreviations(names: Vec<String>, kind: InstrumentKind) -> Vec<String> {
    let lowered: HashSet<String> = names.iter().map(|n| n.to_lowercase()).collect();
    let keyword = kind.keyword().to_lowercase();
    names
        .into_iter()
        .filter(|name| {
            let is_abbreviation = kind
                .abbreviations()
                .iter()
                .any(|a| a.eq_ignore_ascii_case(name));
            !(is_abbreviation && lowered.contains(&format!("{} {keyword}", name.to_lowercase())))
        })
        .collect()
}

fn names_for(text: &str, patterns: &NamePatterns) -> Vec<String> {
    let keyword = patterns.kind.keyword();
    let mut found = Vec::new();

    for re in &patterns.patterns {
        for m in re.find_iter(text) {
            let name = normalize_whitespace(m.as_str());
            for part in split_combined(strip_leading_noise(&name), keyword) {
                if !part.is_empty() && !is_generic(&part, keyword) {
                    found.push(part);
                }
            }
        }
    }
    found.extend(
        patterns
            .abbreviations
            .find_iter(text)
            .map(|m| m.as_str().to_string()),
    );

    drop_covered_abbreviations(dedup_sorted(found), patterns.kind)
}

/// Extract informal legislation names from prose.
pub fn extract_informal(text: &str) -> InformalReferences {
    let text = unwrap_emphasis(&unescape_html(text));
    let mut refs = InformalReferences::default();

    for patterns in NAME_PATTERNS.iter() {
        let names = names_for(&text, patterns);
        match patterns.kind {
            InstrumentKind::Treaty => refs.treaties = names,
            InstrumentKind::Charter => refs.charters = names,
            InstrumentKind::Directive => refs.directives = names,
            InstrumentKind::Regulation => refs.regulations = names,
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use eci_core::{Document, DocumentTree, Element};
    use pretty_assertions::assert_eq;

    #[test]
    fn directive_names_with_connectives() {
        let refs = extract_informal(
            "The Water Framework Directive and the Urban Waste Water Treatment Directive apply.",
        );
        assert_eq!(
            refs.directives,
            vec![
                "Urban Waste Water Treatment Directive",
                "Water Framework Directive",
            ]
        );
    }

    #[test]
    fn leading_articles_are_stripped() {
        let refs = extract_informal("In the Birds Directive, protection is strict.");
        assert_eq!(refs.directives, vec!["Birds Directive"]);
    }

    #[test]
    fn combined_names_are_split() {
        let refs = extract_informal("Relevant acts:\nBirds Directive\nHabitats Directive");
        assert_eq!(refs.directives, vec!["Birds Directive", "Habitats Directive"]);

        let refs = extract_informal("Under Birds Directive or Habitats Directive, member states act.");
        assert_eq!(refs.directives, vec!["Birds Directive", "Habitats Directive"]);
    }

    #[test]
    fn generic_forms_are_dropped() {
        let refs = extract_informal(
            "The Directive was reviewed. The Commission tabled a Proposal for a Regulation. \
             The EU Regulation is clear.",
        );
        assert!(refs.directives.is_empty());
        assert!(refs.regulations.is_empty());
    }

    #[test]
    fn abbreviation_dropped_when_full_form_present() {
        let refs = extract_informal(
            "Chemicals fall under the REACH Regulation. REACH also covers imports. GDPR applies.",
        );
        assert_eq!(refs.regulations, vec!["GDPR", "REACH Regulation"]);
    }

    #[test]
    fn names_do_not_run_across_blocks() {
        let doc = Document::new(vec![
            Element::heading(2, Some("answer"), "Answer of the Commission"),
            Element::paragraph("The REACH Regulation covers imports. REACH applies."),
        ]);
        let refs = extract_informal(&doc.raw_text());
        assert_eq!(refs.regulations, vec!["REACH Regulation"]);

        let refs = extract_informal("Chemicals fall under the REACH\nRegulation. REACH also covers imports.");
        assert_eq!(refs.regulations, vec!["REACH"]);
    }

    #[test]
    fn case_insensitive_dedup() {
        let refs = extract_informal("The Habitats Directive. The HABITATS Directive.");
        assert_eq!(refs.directives, vec!["Habitats Directive"]);
    }

    #[test]
    fn treaties_in_both_forms_and_abbreviations() {
        let refs = extract_informal(
            "Article 13 TFEU and the Treaty on European Union apply, as does the Lisbon Treaty.",
        );
        assert_eq!(
            refs.treaties,
            vec!["Lisbon Treaty", "TFEU", "Treaty on European Union"]
        );
    }

    #[test]
    fn charter_forms() {
        let refs = extract_informal(
            "Rights are protected by the Charter of Fundamental Rights of the European Union and the ECHR.",
        );
        assert_eq!(
            refs.charters,
            vec!["Charter of Fundamental Rights of the European Union", "ECHR"]
        );
    }

    #[test]
    fn emphasis_is_unwrapped_first() {
        let refs = extract_informal("The <em>Nitrates</em> Directive sets limits.");
        assert_eq!(refs.directives, vec!["Nitrates Directive"]);
    }

    #[test]
    fn nothing_found() {
        assert!(extract_informal("No legislation is named here.").is_empty());
    }
}
