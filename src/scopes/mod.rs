//! Function-scope resolution over raw source text.
//!
//! The execution engine exposes no parse tree, so scope boundaries are
//! reconstructed by scanning the source for the `function` keyword and
//! brace-matching from there. Braces or keywords inside string and comment
//! literals are NOT skipped and will corrupt the result; this is a known
//! limitation of the text-scanning approach, kept intentionally.

mod resolver;
mod text;

pub use resolver::{
    enclosing_function_name, enclosing_scope, function_scopes, has_functions, line_scopes,
};
pub use text::{
    column_of, first_code_line, first_letter_column, last_column, line_count, line_of_index,
    line_text, line_width, start_column_for_line,
};

/// The keyword that introduces a function scope in the scripting language.
pub const FUNCTION_KEYWORD: &str = "function";
