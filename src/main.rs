//! Development harness: serves the bridge over a plain TCP socket with
//! newline-delimited JSON messages. Real deployments frame messages in
//! their own transport layer and drive `InspectorService` directly.

use dashmap::DashMap;
use inspector_bridge::channel::MessageTransport;
use inspector_bridge::registry::SourceLookup;
use inspector_bridge::{BridgeConfig, InspectorService, SessionId, UserId};
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{info, warn};

/// Resolves script URLs against the working directory.
struct FsLookup;

impl SourceLookup for FsLookup {
    fn content_for(&self, url: &str) -> Option<String> {
        let path = url.trim_start_matches("file://");
        std::fs::read_to_string(path).ok()
    }
}

/// One write half per live session, newline-delimited.
struct TcpTransport {
    writers: DashMap<SessionId, Mutex<TcpStream>>,
}

impl TcpTransport {
    fn new() -> Self {
        Self {
            writers: DashMap::new(),
        }
    }

    fn register(&self, session: SessionId, stream: TcpStream) {
        self.writers.insert(session, Mutex::new(stream));
    }

    fn release(&self, session: &SessionId) {
        self.writers.remove(session);
    }
}

impl MessageTransport for TcpTransport {
    fn send(&self, session: &SessionId, text: &str) -> io::Result<()> {
        let writer = self
            .writers
            .get(session)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "session closed"))?;
        let mut stream = writer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "writer poisoned"))?;
        stream.write_all(text.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = BridgeConfig::from_env();
    let transport = Arc::new(TcpTransport::new());
    let service = Arc::new(InspectorService::new(
        Arc::new(FsLookup),
        transport.clone(),
        &config,
    ));

    let listener = TcpListener::bind(&config.bind_addr)?;
    info!(addr = %config.bind_addr, "inspector bridge listening");

    let session_counter = AtomicU64::new(1);
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(err) => {
                warn!(%err, "accept failed");
                continue;
            }
        };
        let session = SessionId::new(format!(
            "session-{}",
            session_counter.fetch_add(1, Ordering::SeqCst)
        ));
        let service = Arc::clone(&service);
        let transport = Arc::clone(&transport);
        thread::spawn(move || {
            if let Err(err) = serve_connection(&service, &transport, session.clone(), stream) {
                warn!(%session, %err, "connection ended with error");
            }
        });
    }
    Ok(())
}

/// The first line of a connection names the user; every following line is
/// one protocol message.
fn serve_connection(
    service: &InspectorService,
    transport: &TcpTransport,
    session: SessionId,
    stream: TcpStream,
) -> io::Result<()> {
    let reader = BufReader::new(stream.try_clone()?);
    transport.register(session.clone(), stream);

    let mut lines = reader.lines();
    let user = match lines.next() {
        Some(Ok(line)) if !line.trim().is_empty() => UserId::new(line.trim().to_string()),
        _ => {
            transport.release(&session);
            return Ok(());
        }
    };
    service.attach_session(session.clone(), user);

    let mut result = Ok(());
    for line in lines {
        match line {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => service.handle_message(&session, &line),
            Err(err) => {
                result = Err(err);
                break;
            }
        }
    }

    service.detach_session(&session);
    transport.release(&session);
    result
}
