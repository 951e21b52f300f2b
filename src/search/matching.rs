//! Character level matching primitives.
//!
//! Positions and lengths are counted in `char`s, never bytes, so folding the
//! case of a line never shifts where a match sits in the original text.

/// Whether `c` belongs to a word: ASCII letters, digits and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lowercase a single char, keeping it unchanged when its lowercase form
/// is more than one char long.
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Chars of `text`, case folded unless `case_sensitive`.
pub fn search_chars(text: &str, case_sensitive: bool) -> Vec<char> {
    if case_sensitive {
        text.chars().collect()
    } else {
        text.chars().map(fold_char).collect()
    }
}

/// Whether `pos` sits on a word/non-word transition. Text start and end
/// count as non-word.
fn is_boundary(text: &[char], pos: usize) -> bool {
    let before = pos > 0 && text.get(pos - 1).is_some_and(|&c| is_word_char(c));
    let after = text.get(pos).is_some_and(|&c| is_word_char(c));
    before != after
}

/// Whether `text[start..start + len]` is delimited as a whole word.
pub fn is_whole_word(text: &[char], start: usize, len: usize) -> bool {
    is_boundary(text, start) && is_boundary(text, start + len)
}

/// Every start position of `query` in `text`, overlapping matches included.
///
/// Scanning resumes one char after each match start, so `"aa"` is found
/// three times in `"aaaa"`.
pub fn find_all_positions(text: &[char], query: &[char], whole_word: bool) -> Vec<usize> {
    if query.is_empty() || query.len() > text.len() {
        return Vec::new();
    }

    (0..=text.len() - query.len())
        .filter(|&i| text[i..i + query.len()] == *query)
        .filter(|&i| !whole_word || is_whole_word(text, i, query.len()))
        .collect()
}

/// Char positions of every case-sensitive occurrence of `query`.
pub fn case_sensitive_match(text: &str, query: &str) -> Vec<usize> {
    find_all_positions(&search_chars(text, true), &search_chars(query, true), false)
}

/// Char positions of every case-insensitive occurrence of `query`.
pub fn case_insensitive_match(text: &str, query: &str) -> Vec<usize> {
    find_all_positions(&search_chars(text, false), &search_chars(query, false), false)
}

/// Char positions of every case-insensitive whole-word occurrence of `query`.
pub fn word_match(text: &str, query: &str) -> Vec<usize> {
    find_all_positions(&search_chars(text, false), &search_chars(query, false), true)
}

/// Char position of the first occurrence of `query` on `line`.
pub fn find_match_on_line(line: &str, query: &str, case_sensitive: bool) -> Option<usize> {
    find_all_positions(
        &search_chars(line, case_sensitive),
        &search_chars(query, case_sensitive),
        false,
    )
    .first()
    .copied()
}

/// Up to `context` chars before and after `text[start..start + len]`.
///
/// Returns `(before, matched, after)`, clipped to the bounds of `text`.
pub fn extract_context(
    text: &[char],
    start: usize,
    len: usize,
    context: usize,
) -> (String, String, String) {
    let start = start.min(text.len());
    let end = (start + len).min(text.len());
    let before = &text[start.saturating_sub(context)..start];
    let after = &text[end..(end + context).min(text.len())];

    (
        before.iter().collect(),
        text[start..end].iter().collect(),
        after.iter().collect(),
    )
}

/// One line of a page with its position in the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo<'a> {
    /// Line number (1-indexed)
    pub line_num: usize,
    /// Line text without the newline
    pub text: &'a str,
    /// Byte offset of the line start
    pub start: usize,
    /// Byte offset of the line end
    pub end: usize,
}

/// Split text into lines. A trailing newline does not start a new line.
pub fn text_to_lines(text: &str) -> Vec<LineInfo<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, segment) in text.split('\n').enumerate() {
        let end = start + segment.len();
        if end == text.len() && segment.is_empty() {
            break;
        }
        lines.push(LineInfo {
            line_num: i + 1,
            text: segment,
            start,
            end,
        });
        start = end + 1;
    }

    lines
}

/// Line and column (both 1-indexed, columns in chars) of a byte offset.
pub fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let prefix = text.get(..offset).unwrap_or(text);
    let mut line = 1;
    let mut column = 1;
    for c in prefix.chars() {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// ANSI escape that starts a yellow background.
pub const HIGHLIGHT_START: &str = "\x1b[43m";

/// ANSI escape that resets all attributes.
pub const HIGHLIGHT_END: &str = "\x1b[0m";

/// Wrap each match (char positions, `query_len` chars long) in a yellow
/// background for terminal output.
///
/// Overlapping matches are merged into the highlight already open.
pub fn highlight_matches(text: &str, matches: &[usize], query_len: usize) -> String {
    if matches.is_empty() || query_len == 0 {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len() + matches.len() * 9);
    let mut last_end = 0;

    for &start in matches {
        let start = start.max(last_end).min(chars.len());
        let end = (start + query_len).min(chars.len());
        if start >= end {
            continue;
        }
        output.extend(&chars[last_end..start]);
        output.push_str(HIGHLIGHT_START);
        output.extend(&chars[start..end]);
        output.push_str(HIGHLIGHT_END);
        last_end = end;
    }

    output.extend(&chars[last_end..]);
    output
}
