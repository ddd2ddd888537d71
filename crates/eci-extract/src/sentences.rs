//! Sentence and clause boundaries around a match.
//!
//! Deliberately simple scans, not a linguistic splitter:
//!
//! - **Sentence**: ends at `.`, `!` or `?` followed by whitespace (or end of
//!   text), at a bullet glyph, or at a blank line.
//! - **Clause**: ends at `;`, a newline, or a `.` followed by whitespace and an
//!   uppercase letter, so abbreviations like "i.e. on" stay inside.

const BULLETS: &[char] = &['•', '▪', '◦', '‣', '►'];

/// Byte range of the sentence containing `text[start..end]`.
pub fn sentence_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let mut from = 0;
    for (i, c) in text[..start].char_indices().rev() {
        let next = i + c.len_utf8();
        let followed_by_space = text[next..].chars().next().is_some_and(char::is_whitespace);
        if matches!(c, '.' | '!' | '?') && followed_by_space || BULLETS.contains(&c) {
            from = next;
            break;
        }
        if c == '\n' && text[..i].ends_with('\n') {
            from = next;
            break;
        }
    }

    let mut to = text.len();
    for (offset, c) in text[end..].char_indices() {
        let i = end + offset;
        let next = i + c.len_utf8();
        let at_break = text[next..].chars().next().is_none_or(char::is_whitespace);
        if matches!(c, '.' | '!' | '?') && at_break {
            to = next;
            break;
        }
        if BULLETS.contains(&c) || c == '\n' && text[next..].starts_with('\n') {
            to = i;
            break;
        }
    }

    (from, to.max(from))
}

/// The sentence containing `text[start..end]`, trimmed.
pub fn sentence_around(text: &str, start: usize, end: usize) -> &str {
    let (from, to) = sentence_bounds(text, start, end);
    text[from..to].trim()
}

fn is_clause_break(text: &str, i: usize, c: char) -> bool {
    match c {
        ';' | '\n' => true,
        '.' => {
            let mut rest = text[i + 1..].chars();
            rest.next().is_some_and(char::is_whitespace)
                && rest
                    .find(|c| !c.is_whitespace())
                    .is_some_and(char::is_uppercase)
        }
        _ => false,
    }
}

/// Byte range of the clause containing `text[start..end]`.
pub fn clause_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let from = text[..start]
        .char_indices()
        .rev()
        .find(|&(i, c)| is_clause_break(text, i, c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);

    let to = text[end..]
        .char_indices()
        .map(|(offset, c)| (end + offset, c))
        .find(|&(i, c)| is_clause_break(text, i, c))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    (from, to.max(from))
}

/// The clause containing `text[start..end]`, trimmed.
pub fn clause_around(text: &str, start: usize, end: usize) -> &str {
    let (from, to) = clause_bounds(text, start, end);
    text[from..to].trim()
}

/// The rest of the clause after `end`.
pub fn clause_after(text: &str, end: usize) -> &str {
    let (_, to) = clause_bounds(text, end, end);
    &text[end..to]
}
