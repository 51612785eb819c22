use super::SourceLookup;
use crate::error::{BridgeError, Result};
use crate::model::{ScriptId, ScriptRecord, SCRIPT_ID_FLOOR};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maps script URL ↔ script id ↔ cached source text.
///
/// Ids are strictly increasing across the process; url and id are
/// immutable once registered, the cached source is not (live edit).
pub struct ScriptRegistry {
    lookup: Arc<dyn SourceLookup>,
    next_id: AtomicU64,
    by_id: DashMap<ScriptId, ScriptRecord>,
    by_url: DashMap<String, ScriptId>,
}

impl ScriptRegistry {
    pub fn new(lookup: Arc<dyn SourceLookup>) -> Self {
        Self {
            lookup,
            next_id: AtomicU64::new(SCRIPT_ID_FLOOR + 1),
            by_id: DashMap::new(),
            by_url: DashMap::new(),
        }
    }

    /// Registers a newly parsed script and caches its source, resolved
    /// through the project resource lookup. A URL with no matching
    /// resource registers with empty source. Re-registering a known URL
    /// returns the existing id.
    pub fn register(&self, url: &str) -> ScriptId {
        *self
            .by_url
            .entry(url.to_string())
            .or_insert_with(|| {
                let script_id = ScriptId(self.next_id.fetch_add(1, Ordering::SeqCst));
                let source = self.lookup.content_for(url).unwrap_or_else(|| {
                    warn!(url, "no project resource matches url, registering empty source");
                    String::new()
                });
                debug!(url, %script_id, "script registered");
                self.by_id.insert(
                    script_id,
                    ScriptRecord {
                        script_id,
                        url: url.to_string(),
                        source,
                    },
                );
                script_id
            })
            .value()
    }

    /// Replaces the cached source text in place (live edit).
    pub fn update_source(&self, script_id: ScriptId, new_source: String) -> Result<()> {
        let mut record = self
            .by_id
            .get_mut(&script_id)
            .ok_or(BridgeError::UnknownScript(script_id.0))?;
        record.source = new_source;
        debug!(%script_id, "source updated in place");
        Ok(())
    }

    pub fn lookup_id(&self, url: &str) -> Option<ScriptId> {
        self.by_url.get(url).map(|id| *id.value())
    }

    pub fn lookup_url(&self, script_id: ScriptId) -> Option<String> {
        self.by_id.get(&script_id).map(|r| r.url.clone())
    }

    pub fn source_of(&self, script_id: ScriptId) -> Option<String> {
        self.by_id.get(&script_id).map(|r| r.source.clone())
    }

    pub fn record(&self, script_id: ScriptId) -> Option<ScriptRecord> {
        self.by_id.get(&script_id).map(|r| r.value().clone())
    }

    /// All registered scripts, ordered by id for deterministic replay.
    pub fn all_records(&self) -> Vec<ScriptRecord> {
        let mut records: Vec<ScriptRecord> =
            self.by_id.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by_key(|r| r.script_id);
        records
    }
}
