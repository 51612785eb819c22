//! Translation layer between protocol verbs and the external per-user
//! debug controller owned by the execution engine.

mod controller;
mod wire;

pub use controller::DebugController;
pub use wire::{parse_breakpoint_id, WireBreakpoint};

use crate::error::{BridgeError, Result};
use crate::model::{BreakpointId, UserId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Stepping and execution-control verbs accepted from the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    Continue,
    Pause,
    Resume,
    StepInto,
    StepOver,
    StepOut,
}

/// Forwards breakpoint registration and stepping verbs to the debug
/// controller attached for a user. Stepping is sequential per user: the
/// interpreter will not produce further events until exactly one command
/// is accepted, so a second command arriving before the interpreter
/// reports back is rejected rather than interleaved.
pub struct DebugBridge {
    controllers: DashMap<UserId, Arc<dyn DebugController>>,
    in_flight: DashMap<UserId, Arc<AtomicBool>>,
}

impl DebugBridge {
    pub fn new() -> Self {
        Self {
            controllers: DashMap::new(),
            in_flight: DashMap::new(),
        }
    }

    /// Called by the execution engine when a debuggable run starts.
    pub fn attach_controller(&self, user: UserId, controller: Arc<dyn DebugController>) {
        debug!(%user, "debug controller attached");
        self.controllers.insert(user, controller);
    }

    pub fn detach_controller(&self, user: &UserId) {
        debug!(%user, "debug controller detached");
        self.controllers.remove(user);
        self.in_flight.remove(user);
    }

    fn controller(&self, user: &UserId) -> Result<Arc<dyn DebugController>> {
        self.controllers
            .get(user)
            .map(|c| Arc::clone(c.value()))
            .ok_or_else(|| BridgeError::NoController(user.0.clone()))
    }

    /// Decodes a wire breakpoint id and registers it with the controller.
    pub fn register_breakpoint(&self, user: &UserId, id: &BreakpointId) -> Result<WireBreakpoint> {
        let wire = parse_breakpoint_id(id.as_str())?;
        self.controller(user)?
            .set_breakpoint(&wire.url, wire.row);
        debug!(%user, breakpoint = %id, "breakpoint registered with controller");
        Ok(wire)
    }

    /// Decodes a wire breakpoint id and clears it in the controller.
    pub fn clear_breakpoint(&self, user: &UserId, id: &BreakpointId) -> Result<WireBreakpoint> {
        let wire = parse_breakpoint_id(id.as_str())?;
        self.controller(user)?
            .clear_breakpoint(&wire.url, wire.row);
        debug!(%user, breakpoint = %id, "breakpoint cleared in controller");
        Ok(wire)
    }

    /// Forwards an execution-control verb 1:1 to the controller.
    ///
    /// `Pause` is always accepted (the interpreter is running and has no
    /// pending command). Every other verb takes the per-user gate, which
    /// stays taken until the interpreter reports the next pause or resume.
    /// `StepOut` has no interpreter-side primitive and is answered with a
    /// structured error instead of being silently dropped.
    pub fn command(&self, user: &UserId, command: DebugCommand) -> Result<()> {
        let controller = self.controller(user)?;

        match command {
            DebugCommand::Pause => {
                controller.pause_execution();
                return Ok(());
            }
            DebugCommand::StepOut => return Err(BridgeError::StepOutUnsupported),
            _ => {}
        }

        let gate = self.gate(user);
        if gate.swap(true, Ordering::SeqCst) {
            return Err(BridgeError::SteppingInProgress(user.0.clone()));
        }

        match command {
            DebugCommand::Continue => controller.continue_execution(),
            DebugCommand::Resume => controller.resume_execution(),
            DebugCommand::StepInto => controller.step_into(),
            DebugCommand::StepOver => controller.step_over(),
            DebugCommand::Pause | DebugCommand::StepOut => unreachable!(),
        }
        debug!(%user, ?command, "command forwarded to controller");
        Ok(())
    }

    /// The interpreter suspended; the previous command has completed.
    pub fn notify_paused(&self, user: &UserId) {
        self.gate(user).store(false, Ordering::SeqCst);
    }

    /// The interpreter resumed; the previous command has completed.
    pub fn notify_resumed(&self, user: &UserId) {
        self.gate(user).store(false, Ordering::SeqCst);
    }

    fn gate(&self, user: &UserId) -> Arc<AtomicBool> {
        Arc::clone(
            self.in_flight
                .entry(user.clone())
                .or_insert_with(|| Arc::new(AtomicBool::new(false)))
                .value(),
        )
    }
}

impl Default for DebugBridge {
    fn default() -> Self {
        Self::new()
    }
}
