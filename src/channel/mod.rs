//! Per-session send/receive with history for request/response correlation.

use crate::model::SessionId;
use crate::protocol::events;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// Framing over the persistent connection is owned by the transport
/// layer; the channel only hands it finished message text. Sends have no
/// built-in timeout; cancellation belongs to the caller.
pub trait MessageTransport: Send + Sync {
    fn send(&self, session: &SessionId, text: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub direction: Direction,
    pub text: String,
}

/// Sends messages for a session and records both directions of the
/// exchange so later asynchronous responses and events can be correlated
/// back to the request that caused them.
pub struct MessageChannel {
    transport: Arc<dyn MessageTransport>,
    history: DashMap<SessionId, VecDeque<HistoryEntry>>,
    history_cap: usize,
}

impl MessageChannel {
    pub fn new(transport: Arc<dyn MessageTransport>, history_cap: usize) -> Self {
        Self {
            transport,
            history: DashMap::new(),
            history_cap,
        }
    }

    /// Blocking send. An IO failure is caught and logged, and a
    /// best-effort detach notification goes back to the client; a failure
    /// of that notification is itself swallowed so a dead connection can
    /// never cascade into the calling thread.
    pub fn send_sync(&self, session: &SessionId, text: &str) {
        self.record(session, Direction::Sent, text);
        if let Err(err) = self.transport.send(session, text) {
            warn!(%session, %err, "synchronous send failed");
            let notice = events::detached("target_closed").to_string();
            if let Err(err) = self.transport.send(session, &notice) {
                debug!(%session, %err, "error notification also failed, dropping");
            }
        }
    }

    /// Fire-and-forget send on a worker thread.
    pub fn send_async(&self, session: &SessionId, text: &str) {
        self.record(session, Direction::Sent, text);
        let transport = Arc::clone(&self.transport);
        let session = session.clone();
        let text = text.to_string();
        thread::spawn(move || {
            if let Err(err) = transport.send(&session, &text) {
                warn!(%session, %err, "asynchronous send failed");
            }
        });
    }

    /// Invoked by the transport layer for every inbound message.
    pub fn record_received(&self, session: &SessionId, text: &str) {
        self.record(session, Direction::Received, text);
    }

    /// The ordered messages exchanged on a session.
    pub fn history_for(&self, session: &SessionId) -> Vec<HistoryEntry> {
        self.history
            .get(session)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Id of the first recorded request on the session whose method
    /// matches. Entries that fail to JSON-decode are skipped.
    pub fn request_id_for_method(&self, session: &SessionId, method: &str) -> Option<u64> {
        let history = self.history.get(session)?;
        for entry in history.iter() {
            if entry.direction != Direction::Received {
                continue;
            }
            let Ok(value) = serde_json::from_str::<serde_json::Value>(&entry.text) else {
                continue;
            };
            let matches = value
                .get("method")
                .and_then(|m| m.as_str())
                .is_some_and(|m| m.eq_ignore_ascii_case(method));
            if matches {
                if let Some(id) = value.get("id").and_then(|id| id.as_u64()) {
                    return Some(id);
                }
            }
        }
        None
    }

    /// Releases the session's history when the connection closes.
    /// User-level breakpoint and script state is untouched.
    pub fn drop_session(&self, session: &SessionId) {
        self.history.remove(session);
    }

    fn record(&self, session: &SessionId, direction: Direction, text: &str) {
        let mut history = self.history.entry(session.clone()).or_default();
        history.push_back(HistoryEntry {
            direction,
            text: text.to_string(),
        });
        while history.len() > self.history_cap {
            history.pop_front();
        }
    }
}
