//! Line/column primitives shared by the scope resolver and the event
//! builder. Lines are 0-indexed; a tab counts as 4 columns, any other
//! character as 1.

const TAB_WIDTH: u32 = 4;

/// Line number (0-indexed) containing the character at `index`.
pub fn line_of_index(source: &str, index: usize) -> u32 {
    let mut line = 0;
    for (i, ch) in source.char_indices() {
        if i >= index {
            return line;
        }
        if ch == '\n' {
            line += 1;
        }
    }
    line
}

/// The text of line `line`, without its terminator.
pub fn line_text(source: &str, line: u32) -> Option<&str> {
    source.lines().nth(line as usize)
}

/// Number of lines in the source.
pub fn line_count(source: &str) -> u32 {
    source.lines().count() as u32
}

/// Column of the first occurrence of `target` on `line_text`, scanning
/// left to right. Returns the width of the whole line when the target
/// never occurs.
pub fn column_of(line_text: &str, target: char) -> u32 {
    let mut column = 0;
    for ch in line_text.chars() {
        if ch == target {
            return column;
        }
        if ch == '\t' {
            column += TAB_WIDTH;
        } else {
            column += 1;
        }
    }
    column
}

/// Width in columns of an entire line.
pub fn line_width(line_text: &str) -> u32 {
    line_text
        .chars()
        .map(|ch| if ch == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Column just past the last character of the source.
pub fn last_column(source: &str) -> u32 {
    line_width(source.lines().last().unwrap_or(""))
}

/// First line that holds code: not blank and not opening with a comment
/// marker once trimmed. `None` for an all-blank source.
pub fn first_code_line(source: &str) -> Option<u32> {
    for (i, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with("/*") {
            continue;
        }
        return Some(i as u32);
    }
    None
}

/// Column of the first non-whitespace character on `line`.
pub fn start_column_for_line(source: &str, line: u32) -> u32 {
    let text = line_text(source, line).unwrap_or("");
    let mut column = 0;
    for ch in text.chars() {
        if !ch.is_whitespace() {
            break;
        }
        if ch == '\t' {
            column += TAB_WIDTH;
        } else {
            column += 1;
        }
    }
    column
}

/// Index of the first letter character on `line`, counted in columns.
pub fn first_letter_column(source: &str, line: u32) -> u32 {
    let text = line_text(source, line).unwrap_or("");
    let mut column = 0;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            break;
        }
        if ch == '\t' {
            column += TAB_WIDTH;
        } else {
            column += 1;
        }
    }
    column
}
