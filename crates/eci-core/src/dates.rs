//! Date and period normalisation for commitment language.
//!
//! Converts free-text date expressions into a canonical calendar date.
//!
//! # Period conventions
//!
//! Coarse periods resolve to the **last** day of the period, because a
//! commitment "by Q2 2024" is met up to 30 June 2024:
//!
//! - `Month YYYY` → last day of the month
//! - `YYYY`, `end of YYYY`, `end YYYY`, `late YYYY` → 31 December
//! - `early YYYY` → 31 March
//! - `Q<n> YYYY`, `<ordinal> quarter of YYYY` → last day of the quarter
//! - `first half of YYYY`, `half of YYYY`, `middle of YYYY`, `mid-YYYY` → 30 June
//! - `second half of YYYY`, `last half of YYYY` → 31 December
//! - `since YYYY` → 1 January (the only start-anchored period)
//!
//! A day-level date inside an otherwise coarse phrase always wins.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::text::normalize_whitespace;

/// Month names and their accepted abbreviations, as a regex alternation.
pub const MONTH_PATTERN: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

/// A date or period expression, suitable for embedding in larger patterns.
///
/// Alternatives are ordered longest-first so a day-level date is never
/// shortened to its month or year. Use with the `(?i)` flag.
pub const DATE_EXPR: &str = concat!(
    r"(?:",
    // 27 March 2021, 1st Jan. 2024
    r"\d{1,2}(?:st|nd|rd|th)?\s+(?:",
    "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec",
    r")\.?,?\s+\d{4}",
    // March 27, 2021
    r"|(?:",
    "january|february|march|april|may|june|july|august|september|october|november|december",
    r")\s+\d{1,2}(?:st|nd|rd|th)?,\s+\d{4}",
    // 27/03/2021, 27-03-2021, 27.03.2021
    r"|\d{1,2}[/.-]\d{1,2}[/.-]\d{4}",
    // 2021-03-27
    r"|\d{4}-\d{2}-\d{2}",
    // end of March 2024, March 2024
    r"|(?:(?:the\s+)?(?:end|beginning|start)\s+of\s+)?(?:",
    "january|february|march|april|may|june|july|august|september|october|november|december",
    r")\s+\d{4}",
    // Q2 2024
    r"|q[1-4]\s+\d{4}",
    // the second quarter of 2024
    r"|(?:the\s+)?(?:first|second|third|fourth|last|1st|2nd|3rd|4th)\s+quarter\s+of\s+\d{4}",
    // the first half of 2024, half of 2024
    r"|(?:the\s+)?(?:(?:first|second|last)\s+)?half\s+of\s+\d{4}",
    // the end of (the year) 2023, end 2023, middle of 2025
    r"|(?:the\s+)?(?:end|middle)\s+(?:of\s+)?(?:the\s+year\s+)?\d{4}",
    // early 2026, late 2025, mid-2025
    r"|(?:early|late|mid-?)\s*\d{4}",
    // since 2023
    r"|since\s+\d{4}",
    // 2024
    r"|\d{4}",
    r")"
);

// ── Regex patterns ──

static RE_DATE_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\b{DATE_EXPR}\b")).unwrap());

static RE_DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTH_PATTERN})\.?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static RE_MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH_PATTERN})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static RE_NUMERIC_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{4})\b").unwrap());

static RE_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static RE_SINCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsince\s+(\d{4})\b").unwrap());

static RE_QUARTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bq([1-4])\s*(\d{4})\b").unwrap());

static RE_ORDINAL_QUARTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(first|second|third|fourth|last|1st|2nd|3rd|4th)\s+quarter\s+(?:of\s+)?(\d{4})\b")
        .unwrap()
});

static RE_HALF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(first|second|last)\s+)?half\s+(?:of\s+)?(\d{4})\b").unwrap()
});

static RE_MIDDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:middle\s+(?:of\s+)?|mid-?\s*)(\d{4})\b").unwrap());

static RE_EARLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bearly\s+(\d{4})\b").unwrap());

static RE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:end\s+(?:of\s+)?(?:the\s+year\s+)?|late\s+)(\d{4})\b").unwrap()
});

static RE_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({MONTH_PATTERN})\.?\s+(\d{{4}})\b")).unwrap()
});

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

/// Years outside this range are treated as noise (article numbers, issue numbers).
const MIN_YEAR: i32 = 1950;
const MAX_YEAR: i32 = 2100;

// ── Exact dates ──

/// Parse a day-level date.
///
/// Accepts `27 March 2021`, `27 Mar 2021`, `27th March 2021`,
/// `March 27, 2021`, `27/03/2021`, `27-03-2021`, `27.03.2021` and `2021-03-27`.
/// The first day-level date found in `text` is returned.
pub fn parse_exact_date(text: &str) -> Option<NaiveDate> {
    let text = normalize_whitespace(text);

    if let Some(caps) = RE_ISO.captures(&text) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = RE_DAY_MONTH_YEAR.captures(&text) {
        let month = month_number(&caps[2])?;
        return ymd(&caps[3], &month.to_string(), &caps[1]);
    }
    if let Some(caps) = RE_MONTH_DAY_YEAR.captures(&text) {
        let month = month_number(&caps[1])?;
        return ymd(&caps[3], &month.to_string(), &caps[2]);
    }
    if let Some(caps) = RE_NUMERIC_DMY.captures(&text) {
        return ymd(&caps[3], &caps[2], &caps[1]);
    }

    None
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year = parse_year(year)?;
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn parse_year(year: &str) -> Option<i32> {
    year.parse()
        .ok()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
}

/// Month number (1-12) from a full or abbreviated English month name.
pub fn month_number(name: &str) -> Option<u32> {
    let lower = name.trim_end_matches('.').to_lowercase();
    let n = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

// ── Periods ──

/// Normalise a date or period expression to a single calendar date.
///
/// Returns `None` for yearless or invalid input; never panics.
pub fn normalize_period(text: &str) -> Option<NaiveDate> {
    let lower = normalize_whitespace(&text.to_lowercase());
    if lower.is_empty() {
        return None;
    }

    let resolved = parse_exact_date(&lower).or_else(|| normalize_coarse(&lower));
    if resolved.is_none() {
        debug!(text = %lower, "date expression not normalisable");
    }
    resolved
}

fn normalize_coarse(lower: &str) -> Option<NaiveDate> {
    if let Some(caps) = RE_SINCE.captures(lower) {
        return NaiveDate::from_ymd_opt(parse_year(&caps[1])?, 1, 1);
    }
    if let Some(caps) = RE_QUARTER.captures(lower) {
        return quarter_end(parse_year(&caps[2])?, caps[1].parse().ok()?);
    }
    if let Some(caps) = RE_ORDINAL_QUARTER.captures(lower) {
        let quarter = match &caps[1] {
            "first" | "1st" => 1,
            "second" | "2nd" => 2,
            "third" | "3rd" => 3,
            _ => 4,
        };
        return quarter_end(parse_year(&caps[2])?, quarter);
    }
    if let Some(caps) = RE_HALF.captures(lower) {
        let year = parse_year(&caps[2])?;
        return match caps.get(1).map(|m| m.as_str()) {
            Some("second") | Some("last") => NaiveDate::from_ymd_opt(year, 12, 31),
            _ => NaiveDate::from_ymd_opt(year, 6, 30),
        };
    }
    if let Some(caps) = RE_MIDDLE.captures(lower) {
        return NaiveDate::from_ymd_opt(parse_year(&caps[1])?, 6, 30);
    }
    if let Some(caps) = RE_EARLY.captures(lower) {
        return NaiveDate::from_ymd_opt(parse_year(&caps[1])?, 3, 31);
    }
    if let Some(caps) = RE_MONTH_YEAR.captures(lower) {
        return month_end(parse_year(&caps[2])?, month_number(&caps[1])?);
    }
    if let Some(caps) = RE_END.captures(lower) {
        return NaiveDate::from_ymd_opt(parse_year(&caps[1])?, 12, 31);
    }

    // Bare year: the first plausible one wins.
    RE_YEAR
        .captures_iter(lower)
        .find_map(|caps| parse_year(&caps[1]))
        .and_then(|year| NaiveDate::from_ymd_opt(year, 12, 31))
}

/// Last day of quarter `q` (1-4).
fn quarter_end(year: i32, q: u32) -> Option<NaiveDate> {
    if !(1..=4).contains(&q) {
        return None;
    }
    month_end(year, q * 3)
}

/// Last calendar day of `month` in `year`.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    first_of_next.pred_opt()
}

// ── Free-text scanning ──

/// A date expression located in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub date: NaiveDate,
    /// The matched expression as written.
    pub expression: String,
    /// Byte offset of the expression in the scanned text.
    pub start: usize,
    pub end: usize,
}

/// Find the first normalisable date expression in `text`.
///
/// Day-level dates anywhere in the text take precedence over coarser periods;
/// among coarse periods the leftmost wins. Bare years glued to `/` or digits
/// (`2019/1021`, `No 1169/2011`) are not dates.
pub fn find_date_expression(text: &str) -> Option<DateMatch> {
    let candidates: Vec<DateMatch> = RE_DATE_EXPR
        .find_iter(text)
        .filter(|m| !is_citation_number(text, m.start(), m.end()))
        .filter_map(|m| {
            normalize_period(m.as_str()).map(|date| DateMatch {
                date,
                expression: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            })
        })
        .collect();

    candidates
        .iter()
        .find(|c| parse_exact_date(&c.expression).is_some())
        .or_else(|| candidates.first())
        .cloned()
}

/// Whether a match is part of a legislative citation like `2019/1021` or
/// `Article 2020`.
fn is_citation_number(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    matches!(before, Some('/') | Some('.') | Some('(')) && text[start..end].len() == 4
        || matches!(after, Some('/'))
        || before.is_some_and(|c| c.is_ascii_digit())
}

/// Render a date the way the output record stores it.
pub fn iso(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn exact_date_formats() {
        assert_eq!(parse_exact_date("27 March 2021"), Some(d(2021, 3, 27)));
        assert_eq!(parse_exact_date("27 Mar 2021"), Some(d(2021, 3, 27)));
        assert_eq!(parse_exact_date("27th March 2021"), Some(d(2021, 3, 27)));
        assert_eq!(parse_exact_date("27/03/2021"), Some(d(2021, 3, 27)));
        assert_eq!(parse_exact_date("27-03-2021"), Some(d(2021, 3, 27)));
        assert_eq!(parse_exact_date("2021-03-27"), Some(d(2021, 3, 27)));
        assert_eq!(parse_exact_date("March 27, 2021"), Some(d(2021, 3, 27)));
        assert_eq!(parse_exact_date("1 Sept. 2024"), Some(d(2024, 9, 1)));
    }

    #[test]
    fn exact_date_rejects_invalid() {
        assert_eq!(parse_exact_date("31 February 2021"), None);
        assert_eq!(parse_exact_date("32/01/2021"), None);
        assert_eq!(parse_exact_date("March 2021"), None);
        assert_eq!(parse_exact_date(""), None);
    }

    #[test]
    fn documented_period_values() {
        assert_eq!(normalize_period("end of 2023"), Some(d(2023, 12, 31)));
        assert_eq!(normalize_period("early 2026"), Some(d(2026, 3, 31)));
        assert_eq!(normalize_period("Q2 2023"), Some(d(2023, 6, 30)));
        assert_eq!(normalize_period("since 2023"), Some(d(2023, 1, 1)));
        assert_eq!(normalize_period("12 December 2025"), Some(d(2025, 12, 12)));
    }

    #[test]
    fn month_year_resolves_to_month_end() {
        assert_eq!(normalize_period("February 2024"), Some(d(2024, 2, 29)));
        assert_eq!(normalize_period("February 2023"), Some(d(2023, 2, 28)));
        assert_eq!(normalize_period("end of March 2024"), Some(d(2024, 3, 31)));
        assert_eq!(normalize_period("Dec 2025"), Some(d(2025, 12, 31)));
    }

    #[test]
    fn year_forms() {
        assert_eq!(normalize_period("2024"), Some(d(2024, 12, 31)));
        assert_eq!(normalize_period("end 2024"), Some(d(2024, 12, 31)));
        assert_eq!(normalize_period("the end of the year 2024"), Some(d(2024, 12, 31)));
        assert_eq!(normalize_period("late 2025"), Some(d(2025, 12, 31)));
    }

    #[test]
    fn quarter_forms() {
        assert_eq!(normalize_period("Q1 2024"), Some(d(2024, 3, 31)));
        assert_eq!(normalize_period("q3 2024"), Some(d(2024, 9, 30)));
        assert_eq!(normalize_period("Q4 2024"), Some(d(2024, 12, 31)));
        assert_eq!(normalize_period("the second quarter of 2024"), Some(d(2024, 6, 30)));
        assert_eq!(normalize_period("4th quarter of 2024"), Some(d(2024, 12, 31)));
        assert_eq!(normalize_period("last quarter of 2024"), Some(d(2024, 12, 31)));
    }

    #[test]
    fn half_and_middle_forms() {
        assert_eq!(normalize_period("first half of 2024"), Some(d(2024, 6, 30)));
        assert_eq!(normalize_period("second half of 2024"), Some(d(2024, 12, 31)));
        assert_eq!(normalize_period("last half of 2024"), Some(d(2024, 12, 31)));
        assert_eq!(normalize_period("half of 2024"), Some(d(2024, 6, 30)));
        assert_eq!(normalize_period("middle of 2025"), Some(d(2025, 6, 30)));
        assert_eq!(normalize_period("mid-2025"), Some(d(2025, 6, 30)));
    }

    #[test]
    fn day_level_date_wins_over_period_words() {
        assert_eq!(
            normalize_period("by the end of 2025, at the latest on 12 December 2025"),
            Some(d(2025, 12, 12))
        );
    }

    #[test]
    fn yearless_or_garbage_is_absent() {
        assert_eq!(normalize_period("soon"), None);
        assert_eq!(normalize_period("end of the year"), None);
        assert_eq!(normalize_period(""), None);
        assert_eq!(normalize_period("the 30th"), None);
        assert_eq!(normalize_period("in 3024"), None);
    }

    #[test]
    fn normalisation_is_idempotent() {
        for input in ["end of 2023", "early 2026", "Q2 2023", "since 2023", "12 December 2025"] {
            let once = normalize_period(input).unwrap();
            let twice = normalize_period(&iso(once)).unwrap();
            assert_eq!(once, twice, "{input}");
        }
    }

    #[test]
    fn find_prefers_day_level_date() {
        let text = "became applicable 18 months later in 2021, i.e. on 27 March 2021";
        let found = find_date_expression(text).unwrap();
        assert_eq!(found.date, d(2021, 3, 27));
        assert_eq!(found.expression, "27 March 2021");
    }

    #[test]
    fn find_skips_citation_numbers() {
        let text = "Regulation (EU) 2019/1021 will be reviewed by Q3 2026";
        let found = find_date_expression(text).unwrap();
        assert_eq!(found.date, d(2026, 9, 30));

        assert!(find_date_expression("Regulation (EC) No 1907/2006").is_none());
    }

    #[test]
    fn find_returns_none_without_dates() {
        assert!(find_date_expression("The Commission will continue its work.").is_none());
    }

    #[test]
    fn iso_rendering() {
        assert_eq!(iso(d(2021, 3, 7)), "2021-03-07");
    }
}
