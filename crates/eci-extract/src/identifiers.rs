//! Formal identifiers: CELEX numbers, Official Journal references and
//! article numbers.
//!
//! CELEX numbers come from link query strings and from textual citations
//! such as "Regulation (EU) No 1169/2011" (`32011R1169`) or
//! "Directive 91/271/EEC" (`31991L0271`).

use std::sync::LazyLock;

use eci_core::{FormalReferences, Link, OfficialJournalRefs};
use regex::{Captures, Regex};
use tracing::debug;

use crate::references::dedup_sorted;

static RE_CELEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcelex\s*[:=]\s*(?P<id>[0-9CE]\d{4}[A-Z]{1,2}\d{3,4}(?:\(\d+\))?(?:-\d{8})?)")
        .unwrap()
});

static RE_OJ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)uriserv:(?P<ref>OJ\.(?P<series>[LC])_\.\d{4}\.\d+(?:\.[A-Z0-9]+)*)").unwrap()
});

static RE_CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<kind>Regulation|Directive|Decision)\s+(?:\((?:EU|EC|EEC|Euratom|CE)\)\s+)?(?P<no>No\.?\s+)?(?P<first>\d{1,4})/(?P<second>\d{1,4})\b",
    )
    .unwrap()
});

const ARTICLE_NUMBER: &str = r"\d+[a-z]?(?:\(\d+[a-z]?\))*(?:\([a-z]\))?";

/// "Article 11(4)", "Articles 191, 192 and 193".
static RE_ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\bArticles?\s+(?P<list>{ARTICLE_NUMBER}(?:\s*(?:,\s*(?:and\s+|or\s+)?|and/or\s+|and\s+|or\s+){ARTICLE_NUMBER})*)"
    ))
    .unwrap()
});

static RE_ARTICLE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b{ARTICLE_NUMBER}")).unwrap());

const MIN_YEAR: u32 = 1950;
const MAX_YEAR: u32 = 2100;

/// Two-digit years: 50-99 are 19xx, 00-49 are 20xx.
fn expand_year(raw: &str) -> Option<u32> {
    let value: u32 = raw.parse().ok()?;
    let year = match raw.len() {
        2 if value >= 50 => 1900 + value,
        2 => 2000 + value,
        4 => value,
        _ => return None,
    };
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

fn type_letter(kind: &str) -> Option<char> {
    match kind {
        "Regulation" => Some('R'),
        "Directive" => Some('L'),
        "Decision" => Some('D'),
        _ => None,
    }
}

/// CELEX number for a textual citation, sector 3 (legal acts).
///
/// "No NNNN/YYYY" citations put the number first; all others put the year
/// first. When that reading gives an impossible year the other is tried.
fn citation_to_celex(caps: &Captures<'_>) -> Option<String> {
    let letter = type_letter(&caps["kind"])?;
    let first = &caps["first"];
    let second = &caps["second"];

    let (year_raw, number_raw) = if caps.name("no").is_some() {
        (second, first)
    } else {
        (first, second)
    };
    let (year, number) = match expand_year(year_raw) {
        Some(year) => (year, number_raw),
        None => (expand_year(number_raw)?, year_raw),
    };
    let number: u32 = number.parse().ok()?;

    Some(format!("3{year}{letter}{number:04}"))
}

/// CELEX numbers in link targets; hrefs are URL-decoded first.
pub fn celex_in_links(links: &[&Link]) -> Vec<String> {
    links
        .iter()
        .flat_map(|link| {
            let href = decode(&link.href);
            RE_CELEX
                .captures_iter(&href)
                .map(|caps| caps["id"].to_uppercase())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// CELEX numbers derived from citations in prose.
pub fn celex_in_text(text: &str) -> Vec<String> {
    RE_CELEX
        .captures_iter(text)
        .map(|caps| caps["id"].to_uppercase())
        .chain(RE_CITATION.captures_iter(text).filter_map(|caps| {
            let celex = citation_to_celex(&caps);
            if celex.is_none() {
                debug!(citation = &caps[0], "citation skipped");
            }
            celex
        }))
        .collect()
}

/// Official Journal references in link targets, bucketed by series.
pub fn official_journal_refs(links: &[&Link]) -> OfficialJournalRefs {
    let mut legislation = Vec::new();
    let mut notices = Vec::new();

    for link in links {
        let href = decode(&link.href);
        for caps in RE_OJ.captures_iter(&href) {
            let reference = caps["ref"].to_string();
            if caps["series"].eq_ignore_ascii_case("L") {
                legislation.push(reference);
            } else {
                notices.push(reference);
            }
        }
    }

    OfficialJournalRefs {
        legislation: dedup_sorted(legislation),
        information_and_notices: dedup_sorted(notices),
    }
}

/// Article numbers as written: "11(4)", "13". Enumerations yield one entry
/// per number.
pub fn articles_in_text(text: &str) -> Vec<String> {
    RE_ARTICLE
        .captures_iter(text)
        .flat_map(|caps| {
            RE_ARTICLE_NUMBER
                .find_iter(&caps["list"])
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// URL-decode a link target; undecodable input is scanned as-is.
fn decode(href: &str) -> String {
    match urlencoding::decode(href) {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            debug!(href, error = %err, "href not decodable");
            href.to_string()
        }
    }
}

/// All formal identifiers of one document.
pub fn extract_formal(text: &str, links: &[&Link]) -> FormalReferences {
    let mut celex = celex_in_links(links);
    celex.extend(celex_in_text(text));

    FormalReferences {
        celex: dedup_sorted(celex),
        articles: dedup_sorted(articles_in_text(text)),
        official_journal: official_journal_refs(links),
    }
}
