use serde::{Deserialize, Serialize};
use std::fmt;

/// Script ids are handed out above this floor so they can never collide
/// with the well-known ids DevTools frontends reserve for internal scripts.
pub const SCRIPT_ID_FLOOR: u64 = 1000;

/// Process-local integer identifying one registered source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScriptId(pub u64);

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A position in a known script. Immutable value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub script_id: ScriptId,
    pub line_number: u32,
    pub column_number: u32,
}

impl Location {
    pub fn new(script_id: ScriptId, line_number: u32, column_number: u32) -> Self {
        Self {
            script_id,
            line_number,
            column_number,
        }
    }
}

/// Wire-encoded breakpoint identity: `<script url>:<row>:<col>:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakpointId(pub String);

impl BreakpointId {
    /// Encodes (url, row, col) in the wire format expected by the frontend.
    pub fn encode(url: &str, row: u32, col: u32) -> Self {
        Self(format!("{}:{}:{}:", url, row, col))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A breakpoint owned by exactly one user partition. Identity is the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub id: BreakpointId,
    pub location: Location,
}

/// One registered source text. `script_id` and `url` are immutable after
/// registration; `source` may be replaced in place on live edit.
#[derive(Debug, Clone)]
pub struct ScriptRecord {
    pub script_id: ScriptId,
    pub url: String,
    pub source: String,
}

/// A weak reference into interpreter-owned scope state. Never dereferenced
/// on this side of the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    #[serde(rename = "type")]
    pub kind: String,
    pub object_id: String,
}

/// Snapshot of one stack frame's scope chain, captured while the
/// interpreter is paused and discarded when it resumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    pub frame_id: String,
    pub scope_chain: Vec<Scope>,
}

/// User identity a transport session is bound to. Breakpoint and script
/// state partitions by user, not by session: two simultaneous connections
/// for the same user observe and mutate the same state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One transport connection. Lifecycle is bound to the connection; message
/// history dies with it, user-level state does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
