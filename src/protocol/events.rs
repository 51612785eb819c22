//! Outbound protocol events.
//!
//! The script bounds in `script_parsed` are heuristic approximations
//! computed from the raw text (there is no parser); DevTools frontends
//! use them for display, not execution semantics.

use crate::model::{CallFrame, Location, ScriptRecord};
use crate::scopes;
use serde_json::{json, Value};

/// The "script was parsed" event for a freshly registered script.
///
/// Start line is the first non-blank, non-comment line; end line is the
/// total line count; start column is the first letter on the start line;
/// end column is the width of the longest line.
pub fn script_parsed(record: &ScriptRecord) -> Value {
    let start_line = scopes::first_code_line(&record.source).unwrap_or(0);
    let end_line = scopes::line_count(&record.source);
    let start_column = scopes::first_letter_column(&record.source, start_line);
    let end_column = record
        .source
        .lines()
        .map(scopes::line_width)
        .max()
        .unwrap_or(0);

    json!({
        "method": "Debugger.scriptParsed",
        "params": {
            "scriptId": record.script_id,
            "url": record.url,
            "startLine": start_line,
            "startColumn": start_column,
            "endLine": end_line,
            "endColumn": end_column,
        }
    })
}

/// The "execution paused" event carrying the captured frames. The
/// enclosing function name is best-effort and omitted when the hit sits
/// outside any resolvable scope.
pub fn paused(frames: &[CallFrame], location: &Location, function_name: Option<&str>) -> Value {
    json!({
        "method": "Debugger.paused",
        "params": {
            "callFrames": frames,
            "reason": "other",
            "hitLocation": location,
            "functionName": function_name,
        }
    })
}

pub fn resumed() -> Value {
    json!({ "method": "Debugger.resumed", "params": {} })
}

/// Best-effort notification that the bridge lost the session transport.
pub fn detached(reason: &str) -> Value {
    json!({ "method": "Inspector.detached", "params": { "reason": reason } })
}
