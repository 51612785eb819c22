use thiserror::Error;

/// Errors surfaced by the bridge. Protocol-facing callers convert these
/// into error response envelopes; nothing here is allowed to panic a
/// transport thread.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The wire-encoded breakpoint id did not match `<url>:<row>:<col>:`.
    #[error("malformed breakpoint id: {0:?}")]
    MalformedBreakpointId(String),

    #[error("no script registered under id {0}")]
    UnknownScript(u64),

    #[error("no debug controller attached for user {0:?}")]
    NoController(String),

    /// The interpreter is still servicing the previous stepping command.
    #[error("a stepping command is already in flight for user {0:?}")]
    SteppingInProgress(String),

    /// The interpreter exposes no step-out primitive.
    #[error("stepOut is not supported by the execution engine")]
    StepOutUnsupported,

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
