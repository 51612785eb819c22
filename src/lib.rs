//! A DevTools-style remote-debugging bridge for scripts running inside an
//! embedded interpreter. Frontends attach over a persistent connection and
//! set breakpoints, step and inspect paused frames; the interpreter side
//! is reached through a narrow controller interface. With no parser
//! available, function-scope boundaries are reconstructed by scanning raw
//! source text.

pub mod bridge;
pub mod channel;
pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod registry;
pub mod scopes;
pub mod service;

pub use config::BridgeConfig;
pub use error::BridgeError;
pub use model::{
    Breakpoint, BreakpointId, CallFrame, Location, Scope, ScriptId, ScriptRecord, SessionId,
    UserId,
};
pub use service::InspectorService;
