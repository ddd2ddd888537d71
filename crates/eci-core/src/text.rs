//! Text normalisation shared by every extractor.
//!
//! All helpers are total: they never fail and always return a string, which
//! may be empty.
//!
//! # Conventions
//!
//! - Matching is done on [`clean_for_matching`] output: entities unescaped,
//!   lowercased, whitespace collapsed.
//! - Phrases reported back to the caller keep their original case and only go
//!   through [`normalize_whitespace`] and [`strip_leading_punctuation`].

use std::sync::LazyLock;

use regex::Regex;

/// Stop words that end a captured phrase, in the order they are tried.
pub const DEFAULT_STOP_WORDS: &[&str] = &["in order to", "amongst", "among", "with", "for", "to"];

/// Bullet glyphs that may precede list items after text extraction.
const BULLETS: &[char] = &['•', '·', '▪', '◦', '‣', '–', '—', '-', '*', '►'];

// ── Whitespace and case ──

/// Collapse runs of whitespace (including non-breaking spaces) to one space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unescape entities, lowercase, then collapse whitespace.
pub fn clean_for_matching(text: &str) -> String {
    normalize_whitespace(&unescape_html(text).to_lowercase())
}

// ── HTML residue ──

/// Replace the HTML entities that survive text extraction.
///
/// Handles the named entities seen in answer pages plus decimal (`&#39;`) and
/// hexadecimal (`&#x2019;`) references. Unknown entities are left untouched.
pub fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // Entities are short; anything longer is a bare ampersand.
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }

    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '–',
        "mdash" => '—',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "hellip" => '…',
        "euro" => '€',
        _ => return None,
    };
    Some(c)
}

static RE_EMPHASIS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:em|i|strong|b|u|span)(?:\s[^>]*)?>").unwrap()
});

static RE_EMPHASIS_MARKDOWN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\*{1,2}|_{1,2})([^*_\n]+?)(\*{1,2}|_{1,2})").unwrap());

/// Remove inline emphasis markup so phrases split across it become contiguous.
///
/// `the <em>Birds</em> Directive` → `the Birds Directive`;
/// `the *Habitats* Directive` → `the Habitats Directive`.
pub fn unwrap_emphasis(text: &str) -> String {
    let without_tags = RE_EMPHASIS_TAG.replace_all(text, "");
    RE_EMPHASIS_MARKDOWN
        .replace_all(&without_tags, |caps: &regex::Captures<'_>| {
            if caps[1] == caps[3] {
                caps[2].to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

// ── Phrase trimming ──

/// Truncate at the first stop word (whole words, case-insensitive) and drop
/// trailing punctuation.
///
/// `"end of 2023 to assess the options"` → `"end of 2023"`.
pub fn strip_trailing_phrases(text: &str, stop_words: &[&str]) -> String {
    // ASCII folding keeps every byte offset valid in `text`.
    let lower = text.to_ascii_lowercase();

    let cut = stop_words
        .iter()
        .filter_map(|word| find_word(&lower, &word.to_ascii_lowercase()))
        .min();

    let kept = cut.map_or(text, |pos| &text[..pos]);

    kept.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string()
}

/// Byte offset of the first whole-word occurrence of `word` in `haystack`.
fn find_word(haystack: &str, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let bytes = haystack.as_bytes();
    let mut from = 0;

    while let Some(rel) = haystack[from..].find(word) {
        let start = from + rel;
        let end = start + word.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + word.len();
    }

    None
}

/// Remove leading punctuation, bullet glyphs and whitespace.
pub fn strip_leading_punctuation(text: &str) -> String {
    text.trim_start_matches(|c: char| {
        c.is_ascii_punctuation() || c.is_whitespace() || BULLETS.contains(&c)
    })
    .to_string()
}

/// First `max_chars` characters of `text`, on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
