//! The protocol dispatcher. Inbound messages are classified, routed to
//! the breakpoint store, debug bridge or script registry, and answered
//! (or announced) through the message channel.

use crate::bridge::{DebugBridge, DebugCommand};
use crate::channel::{MessageChannel, MessageTransport};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::model::{Breakpoint, BreakpointId, CallFrame, Location, ScriptId, SessionId, UserId};
use crate::protocol::{classifier, events, response_err, response_ok, Request};
use crate::registry::{BreakpointStore, FrameStore, ScriptRegistry, SourceLookup};
use crate::scopes;
use dashmap::DashMap;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One explicitly constructed service instance owns every registry and is
/// passed by reference to the transport layer; there are no globals.
pub struct InspectorService {
    scripts: Arc<ScriptRegistry>,
    breakpoints: Arc<BreakpointStore>,
    frames: Arc<FrameStore>,
    bridge: Arc<DebugBridge>,
    channel: Arc<MessageChannel>,
    sessions: DashMap<SessionId, UserId>,
}

impl InspectorService {
    pub fn new(
        lookup: Arc<dyn SourceLookup>,
        transport: Arc<dyn MessageTransport>,
        config: &BridgeConfig,
    ) -> Self {
        let bridge = Arc::new(DebugBridge::new());
        Self {
            scripts: Arc::new(ScriptRegistry::new(lookup)),
            breakpoints: Arc::new(BreakpointStore::new(Arc::clone(&bridge))),
            frames: Arc::new(FrameStore::new()),
            bridge,
            channel: Arc::new(MessageChannel::new(transport, config.history_cap)),
            sessions: DashMap::new(),
        }
    }

    pub fn scripts(&self) -> &ScriptRegistry {
        &self.scripts
    }

    pub fn breakpoints(&self) -> &BreakpointStore {
        &self.breakpoints
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn bridge(&self) -> &DebugBridge {
        &self.bridge
    }

    pub fn channel(&self) -> &MessageChannel {
        &self.channel
    }

    /// Binds a transport session to its user identity. State stays
    /// partitioned by user: a second session for the same user sees the
    /// same breakpoints and scripts.
    pub fn attach_session(&self, session: SessionId, user: UserId) {
        info!(%session, %user, "session attached");
        self.sessions.insert(session, user);
    }

    /// Releases session-scoped state (message history). User-level
    /// breakpoints and scripts survive the connection.
    pub fn detach_session(&self, session: &SessionId) {
        info!(%session, "session detached");
        self.sessions.remove(session);
        self.channel.drop_session(session);
    }

    fn user_of(&self, session: &SessionId) -> Option<UserId> {
        self.sessions.get(session).map(|u| u.value().clone())
    }

    fn sessions_of(&self, user: &UserId) -> Vec<SessionId> {
        self.sessions
            .iter()
            .filter(|entry| entry.value() == user)
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn broadcast(&self, user: &UserId, event: &Value) {
        let text = event.to_string();
        for session in self.sessions_of(user) {
            self.channel.send_async(&session, &text);
        }
    }

    /// Entry point for every inbound frontend message.
    pub fn handle_message(&self, session: &SessionId, text: &str) {
        self.channel.record_received(session, text);

        let Some(user) = self.user_of(session) else {
            warn!(%session, "message on unattached session dropped");
            return;
        };

        let Some(method) = classifier::method_of(text) else {
            warn!(%session, "unclassifiable message dropped");
            return;
        };
        let Some(request) = Request::parse(text) else {
            // A method without a correlation id cannot be answered.
            warn!(%session, %method, "request with no id dropped");
            return;
        };

        debug!(%session, %user, %method, id = request.id, "dispatching");
        let reply = self.dispatch(&user, &request, &method);
        self.channel.send_sync(session, &reply.to_string());
    }

    fn dispatch(&self, user: &UserId, request: &Request, method: &str) -> Value {
        match method.to_ascii_lowercase().as_str() {
            "debugger.enable" => self.handle_enable(user, request),
            "debugger.setbreakpointbyurl" => self.handle_set_breakpoint(user, request),
            "debugger.removebreakpoint" => self.handle_remove_breakpoint(user, request),
            "debugger.removeallbreakpoints" => {
                let removed = self.breakpoints.remove_all(user);
                response_ok(request.id, json!({ "removed": removed }))
            }
            "debugger.setbreakpointsactive" => {
                let active = request.bool_param("active").unwrap_or(true);
                self.breakpoints.set_active(user, active);
                response_ok(request.id, json!({}))
            }
            "debugger.stepinto" => self.handle_command(user, request, DebugCommand::StepInto),
            "debugger.stepover" => self.handle_command(user, request, DebugCommand::StepOver),
            "debugger.stepout" => self.handle_command(user, request, DebugCommand::StepOut),
            "debugger.resume" => self.handle_command(user, request, DebugCommand::Resume),
            "debugger.continue" => self.handle_command(user, request, DebugCommand::Continue),
            "debugger.pause" => self.handle_command(user, request, DebugCommand::Pause),
            "runtime.getproperties" => self.handle_get_properties(user, request),
            "debugger.evaluateoncallframe" => response_err(
                request.id,
                "evaluation on a call frame is not exposed by the execution engine",
            ),
            "page.getresourcetree" => self.handle_resource_tree(request),
            "page.getresourcecontent" => self.handle_resource_content(request),
            other if other.ends_with(".enable") => response_ok(request.id, json!({})),
            other => {
                // DevTools frontends probe many domains; answer with an
                // empty result rather than dropping the connection.
                debug!(method = other, "unhandled method acknowledged");
                response_ok(request.id, json!({}))
            }
        }
    }

    fn handle_enable(&self, user: &UserId, request: &Request) -> Value {
        for record in self.scripts.all_records() {
            self.broadcast(user, &events::script_parsed(&record));
        }
        response_ok(request.id, json!({}))
    }

    fn handle_set_breakpoint(&self, user: &UserId, request: &Request) -> Value {
        let Some(url) = request.str_param("url") else {
            return response_err(request.id, "missing url");
        };
        let line = request.u64_param("lineNumber").unwrap_or(0) as u32;
        let column = request.u64_param("columnNumber").unwrap_or(0) as u32;

        let id = BreakpointId::encode(url, line, column);
        // Validate the wire id before the url can reach the registry.
        if let Err(err) = crate::bridge::parse_breakpoint_id(id.as_str()) {
            return response_err(request.id, &err.to_string());
        }
        let script_id = self.scripts.register(url);
        let location = Location::new(script_id, line, column);
        let breakpoint = Breakpoint {
            id: id.clone(),
            location,
        };

        match self.breakpoints.add(user, breakpoint) {
            Ok(()) => response_ok(
                request.id,
                json!({ "breakpointId": id, "actualLocation": location }),
            ),
            Err(err) => response_err(request.id, &err.to_string()),
        }
    }

    fn handle_remove_breakpoint(&self, user: &UserId, request: &Request) -> Value {
        let Some(raw) = request.str_param("breakpointId") else {
            return response_err(request.id, "missing breakpointId");
        };
        if let Err(err) = crate::bridge::parse_breakpoint_id(raw) {
            return response_err(request.id, &err.to_string());
        }
        self.breakpoints
            .remove_by_id(user, &BreakpointId(raw.to_string()));
        response_ok(request.id, json!({}))
    }

    fn handle_command(&self, user: &UserId, request: &Request, command: DebugCommand) -> Value {
        match self.bridge.command(user, command) {
            Ok(()) => response_ok(request.id, json!({})),
            Err(err @ BridgeError::SteppingInProgress(_)) => {
                warn!(%user, %err, "command rejected");
                response_err(request.id, &err.to_string())
            }
            Err(err) => response_err(request.id, &err.to_string()),
        }
    }

    fn handle_get_properties(&self, user: &UserId, request: &Request) -> Value {
        let Some(frame_id) = request.str_param("callFrameId") else {
            return response_err(request.id, "missing callFrameId");
        };
        match self.frames.frame_by_id(user, frame_id) {
            Some(frame) => response_ok(request.id, json!({ "scopeChain": frame.scope_chain })),
            None => response_err(request.id, "no such call frame"),
        }
    }

    fn handle_resource_tree(&self, request: &Request) -> Value {
        let resources: Vec<Value> = self
            .scripts
            .all_records()
            .iter()
            .map(|r| json!({ "url": r.url, "type": "Script" }))
            .collect();
        response_ok(request.id, json!({ "frameTree": { "resources": resources } }))
    }

    fn handle_resource_content(&self, request: &Request) -> Value {
        let Some(url) = request.str_param("url") else {
            return response_err(request.id, "missing url");
        };
        match self
            .scripts
            .lookup_id(url)
            .and_then(|id| self.scripts.source_of(id))
        {
            Some(content) => response_ok(request.id, json!({ "content": content })),
            None => response_err(request.id, "no resource registered for url"),
        }
    }

    // ---- interpreter-facing entry points -------------------------------

    /// The interpreter reports a newly parsed script: register it and
    /// announce it to every session of the user.
    pub fn script_parsed(&self, user: &UserId, url: &str) -> ScriptId {
        let script_id = self.scripts.register(url);
        if let Some(record) = self.scripts.record(script_id) {
            self.broadcast(user, &events::script_parsed(&record));
        }
        script_id
    }

    /// The interpreter suspended. Frames are captured, the stepping gate
    /// reopens, and every session of the user hears about the pause. The
    /// enclosing function name is best-effort: a hit outside any function
    /// simply goes out without one.
    pub fn paused(&self, user: &UserId, frames: Vec<CallFrame>, location: Location) {
        let function_name = self
            .scripts
            .source_of(location.script_id)
            .and_then(|source| scopes::enclosing_function_name(&source, location.line_number));

        self.frames.push_frames(user, frames);
        self.bridge.notify_paused(user);

        let frames = self.frames.frames_for(user);
        let event = events::paused(&frames, &location, function_name.as_deref());
        self.broadcast(user, &event);
    }

    /// The interpreter resumed: captured frames are evicted, the stepping
    /// gate reopens, and sessions are notified.
    pub fn resumed(&self, user: &UserId) {
        self.frames.clear(user);
        self.bridge.notify_resumed(user);
        self.broadcast(user, &events::resumed());
    }
}
