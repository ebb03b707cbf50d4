//! Native engine process transport
//!
//! Spawns the engine executable with piped stdin/stdout. A reader task
//! forwards each stdout line to the broadcast channel; commands are written
//! to stdin under an async mutex so concurrent senders never interleave
//! partial lines.
//!
//! The child is spawned with `kill_on_drop`, so a transport dropped without
//! [`EngineTransport::shutdown`] still takes the engine down with it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use stockfish_bridge::transport::LINE_CHANNEL_CAPACITY;
use stockfish_bridge::{EngineTransport, TransportError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Running child plus the handles needed to talk to it
struct RunningEngine {
    child: Child,
    stdin: ChildStdin,
    reader: JoinHandle<()>,
}

/// [`EngineTransport`] backed by a spawned engine executable
pub struct ProcessTransport {
    program: PathBuf,
    lines: broadcast::Sender<String>,
    running: Mutex<Option<RunningEngine>>,
}

impl ProcessTransport {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let (lines, _) = broadcast::channel(LINE_CHANNEL_CAPACITY);
        Self {
            program: program.into(),
            lines,
            running: Mutex::new(None),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn spawn(&self) -> Result<RunningEngine, TransportError> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TransportError::Spawn {
                reason: format!("{}: {}", self.program.display(), e),
            })?;

        let stdin = child.stdin.take().ok_or_else(|| TransportError::Spawn {
            reason: "engine stdin was not captured".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| TransportError::Spawn {
            reason: "engine stdout was not captured".to_string(),
        })?;

        let lines = self.lines.clone();
        let reader = tokio::spawn(async move {
            let mut stdout = BufReader::new(stdout).lines();
            loop {
                match stdout.next_line().await {
                    Ok(Some(line)) => {
                        trace!("[ENGINE] << {}", line);
                        // No receivers is fine; the line is simply dropped
                        let _ = lines.send(line);
                    }
                    Ok(None) => {
                        debug!("[ENGINE] stdout closed");
                        break;
                    }
                    Err(e) => {
                        warn!("[ENGINE] Failed reading engine output: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(RunningEngine { child, stdin, reader })
    }
}

#[async_trait]
impl EngineTransport for ProcessTransport {
    async fn start(&self) -> Result<(), TransportError> {
        let mut running = self.running.lock().await;
        if let Some(engine) = running.as_mut() {
            match engine.child.try_wait() {
                Ok(None) => return Ok(()),
                Ok(Some(status)) => warn!("[ENGINE] Engine exited ({}), restarting", status),
                Err(e) => warn!("[ENGINE] Could not poll engine process: {}", e),
            }
            engine.reader.abort();
        }

        let engine = self.spawn()?;
        info!("[ENGINE] Started {:?}", self.program);
        *running = Some(engine);
        Ok(())
    }

    async fn send(&self, command: &str) -> Result<(), TransportError> {
        let mut running = self.running.lock().await;
        let engine = running.as_mut().ok_or(TransportError::NotStarted)?;

        trace!("[ENGINE] >> {}", command);
        let written = async {
            engine.stdin.write_all(command.as_bytes()).await?;
            engine.stdin.write_all(b"\n").await?;
            engine.stdin.flush().await
        }
        .await;

        written.map_err(|e| match e.kind() {
            std::io::ErrorKind::BrokenPipe => TransportError::Closed,
            _ => TransportError::Io(e),
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.lines.subscribe()
    }

    async fn shutdown(&self) -> Result<(), TransportError> {
        let Some(mut engine) = self.running.lock().await.take() else {
            return Ok(());
        };

        engine.reader.abort();
        drop(engine.stdin);
        if engine.child.try_wait()?.is_none() {
            engine.child.kill().await?;
        }
        info!("[ENGINE] Stopped {:?}", self.program);
        Ok(())
    }
}
