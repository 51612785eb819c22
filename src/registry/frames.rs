use crate::model::{CallFrame, UserId};
use dashmap::DashMap;
use tracing::debug;

/// Call frames captured while a user's interpreter is paused.
///
/// Frames would otherwise accumulate across pauses for the lifetime of a
/// long session; the eviction policy is to drop a user's frames whenever
/// their interpreter resumes.
pub struct FrameStore {
    by_user: DashMap<UserId, Vec<CallFrame>>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self {
            by_user: DashMap::new(),
        }
    }

    pub fn push_frame(&self, user: &UserId, frame: CallFrame) {
        self.by_user.entry(user.clone()).or_default().push(frame);
    }

    pub fn push_frames(&self, user: &UserId, frames: Vec<CallFrame>) {
        self.by_user.entry(user.clone()).or_default().extend(frames);
    }

    pub fn frame_by_id(&self, user: &UserId, frame_id: &str) -> Option<CallFrame> {
        self.by_user
            .get(user)?
            .iter()
            .find(|f| f.frame_id == frame_id)
            .cloned()
    }

    pub fn frames_for(&self, user: &UserId) -> Vec<CallFrame> {
        self.by_user
            .get(user)
            .map(|f| f.value().clone())
            .unwrap_or_default()
    }

    /// Drops every frame captured for the user. Invoked on resume.
    pub fn clear(&self, user: &UserId) -> usize {
        let dropped = self
            .by_user
            .remove(user)
            .map(|(_, frames)| frames.len())
            .unwrap_or(0);
        if dropped > 0 {
            debug!(%user, dropped, "call frames evicted");
        }
        dropped
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}
