//! Scripted in-memory engine for tests
//!
//! [`ScriptedEngine`] implements [`EngineTransport`] without a process. Each
//! command it receives is recorded and handed to a responder closure, whose
//! replies are emitted on the output channel from a spawned task, each after
//! its own delay. Under `#[tokio::test(start_paused = true)]` those delays
//! cost no wall-clock time.
//!
//! ```rust,ignore
//! let engine = ScriptedEngine::uci(vec![
//!     reply("info depth 8 score cp 20 pv e2e4"),
//!     after(100, "bestmove e2e4"),
//! ]);
//! let session = EngineSession::new(Arc::new(engine));
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::TransportError;
use crate::transport::{EngineTransport, LINE_CHANNEL_CAPACITY};

/// One output line and the pause before it is emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedReply {
    pub delay: Duration,
    pub line: String,
}

/// Reply emitted right away
pub fn reply(line: &str) -> ScriptedReply {
    after(0, line)
}

/// Reply emitted `delay_ms` after the previous one
pub fn after(delay_ms: u64, line: &str) -> ScriptedReply {
    ScriptedReply {
        delay: Duration::from_millis(delay_ms),
        line: line.to_string(),
    }
}

type Responder = dyn Fn(&str) -> Vec<ScriptedReply> + Send + Sync;

/// In-memory [`EngineTransport`] driven by a responder closure
pub struct ScriptedEngine {
    lines: broadcast::Sender<String>,
    sent: Mutex<Vec<String>>,
    starts: AtomicUsize,
    running: AtomicBool,
    responder: Box<Responder>,
}

impl ScriptedEngine {
    /// Engine answering every command through `responder`
    pub fn new(responder: impl Fn(&str) -> Vec<ScriptedReply> + Send + Sync + 'static) -> Self {
        let (lines, _) = broadcast::channel(LINE_CHANNEL_CAPACITY);
        Self {
            lines,
            sent: Mutex::new(Vec::new()),
            starts: AtomicUsize::new(0),
            running: AtomicBool::new(false),
            responder: Box::new(responder),
        }
    }

    /// Well-behaved engine: completes the handshake, acknowledges `isready`
    /// and answers every `go` with `search`
    pub fn uci(search: Vec<ScriptedReply>) -> Self {
        Self::new(move |command| match command.split_whitespace().next() {
            Some("uci") => vec![reply("id name Scripted"), reply("uciok")],
            Some("isready") => vec![reply("readyok")],
            Some("go") => search.clone(),
            _ => Vec::new(),
        })
    }

    /// Engine that never says anything
    pub fn silent() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Every command received so far, in order
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// How many times `start` was called
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Push an unsolicited output line
    pub fn emit(&self, line: &str) {
        let _ = self.lines.send(line.to_string());
    }
}

#[async_trait]
impl EngineTransport for ScriptedEngine {
    async fn start(&self) -> Result<(), TransportError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, command: &str) -> Result<(), TransportError> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(TransportError::NotStarted);
        }
        self.sent.lock().push(command.to_string());

        let replies = (self.responder)(command);
        if !replies.is_empty() {
            let lines = self.lines.clone();
            tokio::spawn(async move {
                for ScriptedReply { delay, line } in replies {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let _ = lines.send(line);
                }
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.lines.subscribe()
    }

    async fn shutdown(&self) -> Result<(), TransportError> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }
}
