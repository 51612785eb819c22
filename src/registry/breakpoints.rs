use crate::bridge::DebugBridge;
use crate::error::{BridgeError, Result};
use crate::model::{Breakpoint, BreakpointId, ScriptId, UserId};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One user's breakpoints plus their activation flag. The whole struct
/// sits behind a single dashmap entry, so add/remove/toggle for a user
/// are atomic with respect to each other.
struct UserBreakpoints {
    by_id: HashMap<BreakpointId, Breakpoint>,
    active: bool,
}

impl Default for UserBreakpoints {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            active: true,
        }
    }
}

/// Per-user breakpoint partitions. Mutations are mirrored into the debug
/// bridge so the interpreter-side controller stays in sync; a user with no
/// attached controller keeps the stored state and syncs on the next run.
pub struct BreakpointStore {
    bridge: Arc<DebugBridge>,
    by_user: DashMap<UserId, UserBreakpoints>,
}

impl BreakpointStore {
    pub fn new(bridge: Arc<DebugBridge>) -> Self {
        Self {
            bridge,
            by_user: DashMap::new(),
        }
    }

    /// Inserts into the user's set (deduplicated by id) and registers the
    /// breakpoint with the interpreter. A malformed id is rejected before
    /// anything is stored.
    pub fn add(&self, user: &UserId, breakpoint: Breakpoint) -> Result<()> {
        crate::bridge::parse_breakpoint_id(breakpoint.id.as_str())?;

        let mut partition = self.by_user.entry(user.clone()).or_default();
        if partition.by_id.contains_key(&breakpoint.id) {
            debug!(%user, id = %breakpoint.id, "breakpoint already present");
            return Ok(());
        }

        if partition.active {
            self.mirror(self.bridge.register_breakpoint(user, &breakpoint.id));
        }
        partition.by_id.insert(breakpoint.id.clone(), breakpoint);
        Ok(())
    }

    /// Removes one breakpoint and clears it in the interpreter.
    pub fn remove_by_id(&self, user: &UserId, id: &BreakpointId) -> Option<Breakpoint> {
        let mut partition = self.by_user.get_mut(user)?;
        let removed = partition.by_id.remove(id)?;
        if partition.active {
            self.mirror(self.bridge.clear_breakpoint(user, id));
        }
        Some(removed)
    }

    /// Removes every breakpoint of the user. Returns how many went away.
    pub fn remove_all(&self, user: &UserId) -> usize {
        let Some(mut partition) = self.by_user.get_mut(user) else {
            return 0;
        };
        let ids: Vec<BreakpointId> = partition.by_id.keys().cloned().collect();
        partition.by_id.clear();
        if partition.active {
            for id in &ids {
                self.mirror(self.bridge.clear_breakpoint(user, id));
            }
        }
        ids.len()
    }

    pub fn by_id(&self, user: &UserId, id: &BreakpointId) -> Option<Breakpoint> {
        self.by_user.get(user)?.by_id.get(id).cloned()
    }

    /// Linear filter of the user's set by the location's script.
    pub fn for_script(&self, user: &UserId, script_id: ScriptId) -> Vec<Breakpoint> {
        self.by_user
            .get(user)
            .map(|p| {
                p.by_id
                    .values()
                    .filter(|bp| bp.location.script_id == script_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The user's breakpoints ordered by (script, line, column) for
    /// deterministic enumeration.
    pub fn sorted(&self, user: &UserId) -> Vec<Breakpoint> {
        let mut breakpoints: Vec<Breakpoint> = self
            .by_user
            .get(user)
            .map(|p| p.by_id.values().cloned().collect())
            .unwrap_or_default();
        breakpoints.sort_by_key(|bp| bp.location);
        breakpoints
    }

    pub fn is_active(&self, user: &UserId) -> bool {
        self.by_user.get(user).map(|p| p.active).unwrap_or(true)
    }

    /// Bulk (de)activation with real suppression: deactivating clears
    /// every registered breakpoint in the controller while keeping the
    /// stored set intact, reactivating registers them again. Returns the
    /// number of breakpoints touched.
    pub fn set_active(&self, user: &UserId, active: bool) -> usize {
        let mut partition = self.by_user.entry(user.clone()).or_default();
        if partition.active == active {
            return 0;
        }
        partition.active = active;

        let ids: Vec<BreakpointId> = partition.by_id.keys().cloned().collect();
        for id in &ids {
            if active {
                self.mirror(self.bridge.register_breakpoint(user, id));
            } else {
                self.mirror(self.bridge.clear_breakpoint(user, id));
            }
        }
        debug!(%user, active, count = ids.len(), "breakpoints toggled");
        ids.len()
    }

    /// Controller mirroring is best-effort: a user without an attached
    /// controller keeps stored state and syncs on the next run.
    fn mirror<T>(&self, outcome: Result<T>) {
        match outcome {
            Ok(_) => {}
            Err(BridgeError::NoController(user)) => {
                debug!(%user, "no controller attached yet, breakpoint kept locally");
            }
            Err(err) => warn!(%err, "controller rejected breakpoint mirror"),
        }
    }
}
