use super::text::{line_of_index, line_text};
use super::FUNCTION_KEYWORD;
use std::collections::BTreeMap;

/// Pairs the index of each `function` keyword occurrence with the index of
/// the balanced closing brace of its body.
///
/// From the keyword the scan advances to the first `{`, then a stack-based
/// brace counter runs until it empties; that index is the matching close.
/// `None` marks a scope whose braces never balance (truncated source, or a
/// brace hidden inside a string/comment literal throwing off the count).
pub fn function_scopes(source: &str) -> BTreeMap<usize, Option<usize>> {
    let mut scopes = BTreeMap::new();
    for (start, _) in source.match_indices(FUNCTION_KEYWORD) {
        scopes.insert(start, closing_brace_index(source, start));
    }
    scopes
}

/// Index of the closing brace matching the first `{` at or after
/// `start_index`. `None` when no `{` follows or the braces never balance.
fn closing_brace_index(source: &str, start_index: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = start_index;
    while i < bytes.len() && bytes[i] != b'{' {
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    let mut depth = 0usize;
    for (offset, &b) in bytes[i..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Char-index scopes converted to line numbers. A start line may map to
/// several end lines when more than one function opens on the same line.
pub fn line_scopes(source: &str) -> BTreeMap<u32, Vec<u32>> {
    let mut lines: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for (start, end) in function_scopes(source) {
        let Some(end) = end else { continue };
        let start_line = line_of_index(source, start);
        let end_line = line_of_index(source, end);
        lines.entry(start_line).or_default().push(end_line);
    }
    lines
}

/// (start line, end line) of the function scope enclosing `line`.
///
/// Among all recorded scopes the winner is the one with the greatest start
/// line that is `<= line` and some end line `>= line`; the end is the
/// smallest such end line for that start. The latest-starting candidate is
/// a heuristic for "innermost", not a provably minimal enclosing range.
/// `None` when the line sits outside every function.
pub fn enclosing_scope(source: &str, line: u32) -> Option<(u32, u32)> {
    let scopes = line_scopes(source);

    let mut best_start: Option<u32> = None;
    for (&start, ends) in &scopes {
        if start > line {
            break;
        }
        if ends.iter().any(|&end| end >= line) && best_start.map_or(true, |b| b <= start) {
            best_start = Some(start);
        }
    }

    let start = best_start?;
    let end = scopes
        .get(&start)?
        .iter()
        .copied()
        .filter(|&end| end >= line)
        .min()?;
    Some((start, end))
}

/// Name of the function enclosing `line`: the text between the keyword and
/// the next `(` on the scope's start line. Anonymous and arrow-style
/// definitions have nothing there and yield `None`.
pub fn enclosing_function_name(source: &str, line: u32) -> Option<String> {
    let (start_line, _) = enclosing_scope(source, line)?;
    let text = line_text(source, start_line)?;
    let keyword = text.find(FUNCTION_KEYWORD)?;
    let after_keyword = keyword + FUNCTION_KEYWORD.len();
    let paren = text[after_keyword..].find('(')?;
    let name = text[after_keyword..after_keyword + paren].trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Cheap pre-check used before paying for a full scope scan.
pub fn has_functions(source: &str) -> bool {
    source.contains(FUNCTION_KEYWORD)
}
