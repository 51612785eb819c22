use inspector_bridge::bridge::DebugController;
use inspector_bridge::channel::MessageTransport;
use inspector_bridge::registry::StaticLookup;
use inspector_bridge::{
    BreakpointId, BridgeConfig, CallFrame, InspectorService, Location, Scope, SessionId, UserId,
};
use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex};

// Helper transport that records everything it is asked to send
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    fn texts_for(&self, session: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == session)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// The response sent for a given request id. Event broadcasts go out
    /// on worker threads, so replies are matched by id instead of order.
    fn reply_for(&self, session: &str, id: u64) -> Value {
        self.texts_for(session)
            .iter()
            .filter_map(|text| serde_json::from_str::<Value>(text).ok())
            .find(|v| v.get("id").and_then(Value::as_u64) == Some(id))
            .expect("a reply should have been sent for the request id")
    }
}

impl MessageTransport for RecordingTransport {
    fn send(&self, session: &SessionId, text: &str) -> io::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((session.0.clone(), text.to_string()));
        Ok(())
    }
}

// Controller stub: accepts every verb
#[derive(Default)]
struct NullController;

impl DebugController for NullController {
    fn set_breakpoint(&self, _url: &str, _row: u32) {}
    fn clear_breakpoint(&self, _url: &str, _row: u32) {}
    fn step_into(&self) {}
    fn step_over(&self) {}
    fn continue_execution(&self) {}
    fn pause_execution(&self) {}
    fn resume_execution(&self) {}
}

fn make_service() -> (InspectorService, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let lookup = StaticLookup(vec![(
        "app.js".to_string(),
        "function main(){\n  return 1;\n}\n".to_string(),
    )]);
    let service = InspectorService::new(
        Arc::new(lookup),
        transport.clone(),
        &BridgeConfig::default(),
    );
    (service, transport)
}

fn attached(service: &InspectorService, session: &str, user: &str) -> SessionId {
    let session = SessionId::new(session);
    service.attach_session(session.clone(), UserId::new(user));
    session
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn test_step_request_id_is_correlatable_later() {
        let (service, _transport) = make_service();
        let session = attached(&service, "s1", "alice");

        service.handle_message(&session, r#"{"id":7,"method":"Debugger.stepInto"}"#);

        assert_eq!(
            service.channel().request_id_for_method(&session, "Debugger.stepInto"),
            Some(7),
            "a later async response must find the originating request id"
        );
    }

    #[test]
    fn test_set_breakpoint_round_trip() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");
        let user = UserId::new("alice");
        service
            .bridge()
            .attach_controller(user.clone(), Arc::new(NullController));

        service.handle_message(
            &session,
            r#"{"id":1,"method":"Debugger.setBreakpointByUrl","params":{"url":"app.js","lineNumber":3,"columnNumber":0}}"#,
        );

        let reply = transport.reply_for("s1", 1);
        assert_eq!(
            reply["result"]["breakpointId"], "app.js:3:0:",
            "the breakpoint id is wire-encoded from (url, row, col)"
        );

        let id = BreakpointId("app.js:3:0:".to_string());
        let stored = service.breakpoints().by_id(&user, &id);
        assert!(stored.is_some(), "the breakpoint should be stored for the user");
        assert!(
            service.breakpoints().by_id(&UserId::new("bob"), &id).is_none(),
            "other users must not see it"
        );
    }

    #[test]
    fn test_remove_breakpoint() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");
        let user = UserId::new("alice");

        service.handle_message(
            &session,
            r#"{"id":1,"method":"Debugger.setBreakpointByUrl","params":{"url":"app.js","lineNumber":3}}"#,
        );
        service.handle_message(
            &session,
            r#"{"id":2,"method":"Debugger.removeBreakpoint","params":{"breakpointId":"app.js:3:0:"}}"#,
        );

        let reply = transport.reply_for("s1", 2);
        assert!(reply.get("error").is_none());
        assert!(service
            .breakpoints()
            .by_id(&user, &BreakpointId("app.js:3:0:".to_string()))
            .is_none());
    }

    #[test]
    fn test_malformed_breakpoint_id_yields_protocol_error() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");

        service.handle_message(
            &session,
            r#"{"id":4,"method":"Debugger.removeBreakpoint","params":{"breakpointId":"garbage"}}"#,
        );

        let reply = transport.reply_for("s1", 4);
        assert!(
            reply["error"]["message"]
                .as_str()
                .unwrap()
                .contains("malformed breakpoint id"),
            "pattern mismatch must be answered with a structured error"
        );
    }

    #[test]
    fn test_breakpoint_url_without_script_extension_is_rejected() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");

        service.handle_message(
            &session,
            r#"{"id":5,"method":"Debugger.setBreakpointByUrl","params":{"url":"styles.css","lineNumber":1}}"#,
        );

        let reply = transport.reply_for("s1", 5);
        assert!(reply.get("error").is_some());
    }

    #[test]
    fn test_step_without_controller_is_an_error_response() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");

        service.handle_message(&session, r#"{"id":6,"method":"Debugger.resume"}"#);

        let reply = transport.reply_for("s1", 6);
        assert!(reply.get("error").is_some());
    }

    #[test]
    fn test_second_step_is_rejected_until_pause_reported() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");
        let user = UserId::new("alice");
        service
            .bridge()
            .attach_controller(user.clone(), Arc::new(NullController));

        service.handle_message(&session, r#"{"id":1,"method":"Debugger.stepInto"}"#);
        assert!(transport.reply_for("s1", 1).get("error").is_none());

        service.handle_message(&session, r#"{"id":2,"method":"Debugger.stepOver"}"#);
        assert!(
            transport.reply_for("s1", 2).get("error").is_some(),
            "interleaved stepping must be rejected"
        );

        service.paused(&user, Vec::new(), Location::new(service.scripts().register("app.js"), 1, 0));
        service.handle_message(&session, r#"{"id":3,"method":"Debugger.stepOver"}"#);
        assert!(transport.reply_for("s1", 3).get("error").is_none());
    }

    #[test]
    fn test_step_out_is_answered_with_unsupported() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");
        service
            .bridge()
            .attach_controller(UserId::new("alice"), Arc::new(NullController));

        service.handle_message(&session, r#"{"id":8,"method":"Debugger.stepOut"}"#);

        let reply = transport.reply_for("s1", 8);
        assert!(
            reply["error"]["message"]
                .as_str()
                .unwrap()
                .contains("stepOut"),
            "stepOut has no interpreter primitive and must say so"
        );
    }

    #[test]
    fn test_resource_content_for_registered_script() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");
        service.scripts().register("app.js");

        service.handle_message(
            &session,
            r#"{"id":9,"method":"Page.getResourceContent","params":{"url":"app.js"}}"#,
        );

        let reply = transport.reply_for("s1", 9);
        assert_eq!(
            reply["result"]["content"],
            "function main(){\n  return 1;\n}\n"
        );
    }

    #[test]
    fn test_resource_content_for_unknown_url_is_not_found() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");

        service.handle_message(
            &session,
            r#"{"id":10,"method":"Page.getResourceContent","params":{"url":"nope.js"}}"#,
        );

        assert!(transport.reply_for("s1", 10).get("error").is_some());
    }

    #[test]
    fn test_get_properties_returns_stored_scope_chain() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");
        let user = UserId::new("alice");
        let script = service.scripts().register("app.js");

        let frame = CallFrame {
            frame_id: "frame-1".to_string(),
            scope_chain: vec![Scope {
                kind: "local".to_string(),
                object_id: "obj-9".to_string(),
            }],
        };
        service.paused(&user, vec![frame], Location::new(script, 1, 0));

        service.handle_message(
            &session,
            r#"{"id":11,"method":"Runtime.getProperties","params":{"callFrameId":"frame-1"}}"#,
        );

        let reply = transport.reply_for("s1", 11);
        assert_eq!(reply["result"]["scopeChain"][0]["objectId"], "obj-9");
    }

    #[test]
    fn test_frames_are_evicted_on_resume() {
        let (service, _transport) = make_service();
        let user = UserId::new("alice");
        let script = service.scripts().register("app.js");

        let frame = CallFrame {
            frame_id: "frame-1".to_string(),
            scope_chain: Vec::new(),
        };
        service.paused(&user, vec![frame], Location::new(script, 1, 0));
        assert_eq!(service.frames().frames_for(&user).len(), 1);

        service.resumed(&user);
        assert!(
            service.frames().frames_for(&user).is_empty(),
            "resume must drop captured frames"
        );
    }

    #[test]
    fn test_unknown_method_is_acknowledged() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");

        service.handle_message(&session, r#"{"id":12,"method":"Profiler.start"}"#);

        let reply = transport.reply_for("s1", 12);
        assert!(reply.get("error").is_none());
    }

    #[test]
    fn test_malformed_message_is_dropped_quietly() {
        let (service, transport) = make_service();
        let session = attached(&service, "s1", "alice");

        service.handle_message(&session, "{definitely not json");

        assert!(
            transport.texts_for("s1").is_empty(),
            "unclassifiable input produces no reply and no panic"
        );
    }
}

#[cfg(test)]
mod classifier_tests {
    use inspector_bridge::protocol::classifier;

    #[test]
    fn test_extractors() {
        let text = r#"{"id":7,"method":"Debugger.stepInto","params":{}}"#;
        assert_eq!(classifier::method_of(text).as_deref(), Some("Debugger.stepInto"));
        assert_eq!(classifier::id_of(text), Some(7));
    }

    #[test]
    fn test_malformed_json_is_unknown_not_an_error() {
        let text = "{broken";
        assert_eq!(classifier::method_of(text), None);
        assert_eq!(classifier::id_of(text), None);
        assert!(!classifier::is_breakpoint_message(text));
        assert!(!classifier::is_step_command(text));
        assert!(!classifier::is_resource_request(text));
        assert!(!classifier::is_enable_request(text));
    }

    #[test]
    fn test_predicates_are_case_insensitive() {
        assert!(classifier::is_breakpoint_message(
            r#"{"id":1,"method":"debugger.SETBREAKPOINTBYURL"}"#
        ));
        assert!(classifier::is_step_command(
            r#"{"id":2,"method":"Debugger.StepInto"}"#
        ));
        assert!(classifier::is_step_command(r#"{"id":3,"method":"Debugger.resume"}"#));
        assert!(classifier::is_resource_request(
            r#"{"id":4,"method":"Page.getResourceContent"}"#
        ));
        assert!(classifier::is_enable_request(r#"{"id":5,"method":"Debugger.ENABLE"}"#));
    }

    #[test]
    fn test_non_matching_methods() {
        assert!(!classifier::is_step_command(
            r#"{"id":1,"method":"Debugger.setBreakpointByUrl"}"#
        ));
        assert!(!classifier::is_breakpoint_message(r#"{"id":2,"method":"Debugger.resume"}"#));
    }
}

#[cfg(test)]
mod event_tests {
    use inspector_bridge::protocol::events;
    use inspector_bridge::{ScriptId, ScriptRecord};

    #[test]
    fn test_script_parsed_bounds_are_heuristic_display_bounds() {
        let record = ScriptRecord {
            script_id: ScriptId(1001),
            url: "app.js".to_string(),
            source: "\n// header\nfunction main(){\n  return 1;\n}\n".to_string(),
        };

        let event = events::script_parsed(&record);
        let params = &event["params"];
        assert_eq!(event["method"], "Debugger.scriptParsed");
        assert_eq!(params["scriptId"], 1001);
        assert_eq!(params["startLine"], 2, "first non-blank, non-comment line");
        assert_eq!(params["endLine"], 5, "total line count");
        assert_eq!(params["startColumn"], 0);
        assert_eq!(
            params["endColumn"], 16,
            "width of the longest line, 'function main(){{'"
        );
    }
}
