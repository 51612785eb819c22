//! Stateless predicates and extractors over raw message text.
//!
//! Everything here is tolerant of malformed JSON: a parse failure yields
//! "unknown" (`false`/`None`), never an error, so classification can run
//! on anything a client throws at the socket.

use serde_json::Value;

fn decode(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// The dotted `method` field, when the text decodes and carries one.
pub fn method_of(text: &str) -> Option<String> {
    decode(text)?
        .get("method")?
        .as_str()
        .map(|m| m.to_string())
}

/// The correlation `id` field, when the text decodes and carries one.
pub fn id_of(text: &str) -> Option<u64> {
    decode(text)?.get("id")?.as_u64()
}

fn method_contains(text: &str, needle: &str) -> bool {
    method_of(text)
        .map(|m| m.to_ascii_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Set, remove or toggle of breakpoints.
pub fn is_breakpoint_message(text: &str) -> bool {
    method_contains(text, "breakpoint")
}

/// Stepping or execution-control command.
pub fn is_step_command(text: &str) -> bool {
    const VERBS: [&str; 6] = ["stepinto", "stepover", "stepout", "resume", "pause", "continue"];
    method_of(text)
        .map(|m| {
            let m = m.to_ascii_lowercase();
            VERBS.iter().any(|v| m.ends_with(v))
        })
        .unwrap_or(false)
}

/// Resource tree or resource content request.
pub fn is_resource_request(text: &str) -> bool {
    method_contains(text, "resource")
}

/// Domain enable handshake (`Debugger.enable`, `Inspector.enable`, ...).
pub fn is_enable_request(text: &str) -> bool {
    method_of(text)
        .map(|m| m.to_ascii_lowercase().ends_with(".enable"))
        .unwrap_or(false)
}
