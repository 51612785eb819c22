//! Per-user registries shared across a user's sessions: scripts, their
//! cached sources, captured call frames and breakpoints. Everything here
//! is backed by concurrent maps with atomic per-key operations; transport
//! threads never observe a partially updated entry and unrelated users are
//! never serialized against each other.

mod breakpoints;
mod frames;
mod scripts;

pub use breakpoints::BreakpointStore;
pub use frames::FrameStore;
pub use scripts::ScriptRegistry;

/// Read-only resolution of a script URL to project file content, owned by
/// the source repository.
pub trait SourceLookup: Send + Sync {
    fn content_for(&self, url: &str) -> Option<String>;
}

/// Lookup over a fixed in-memory set, for tests and the dev harness.
pub struct StaticLookup(pub Vec<(String, String)>);

impl SourceLookup for StaticLookup {
    fn content_for(&self, url: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, content)| content.clone())
    }
}
