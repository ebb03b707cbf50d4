//! UCI engine session
//!
//! One [`EngineSession`] drives one engine instance over an
//! [`EngineTransport`]. It owns the session state machine:
//!
//! ```text
//! Uninitialized --initialize--> Initializing --uciok/readyok--> Ready
//!       ^                             |                          |  ^
//!       +--------- timeout -----------+                  analyze |  | bestmove / watchdog
//!                                                                v  |
//!                                                             Analyzing
//! any state --shutdown--> Stopped
//! ```
//!
//! # Search Cycle
//!
//! [`analyze`](EngineSession::analyze) holds an async mutex for the whole
//! cycle, so two `go` commands never overlap on one engine. Inside it:
//!
//! 1. `stop`, the `position` command when the search was started through
//!    [`analyze_position`](EngineSession::analyze_position), then `isready`
//!    and a bounded wait for `readyok` to drain any output left over from a
//!    previous search
//! 2. calibration options, then one `go`
//! 3. a listener task folds `info` lines into [`SearchProgress`] and a
//!    watchdog task sleeps for the search budget plus grace; whichever
//!    settles the shared [`CompletionSlot`] first decides the outcome and
//!    the other task is aborted
//!
//! A watchdog win is not an error: the caller gets what was streamed so far
//! with an empty best move.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chess_core::Position;
use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use crate::analysis::{EngineAnalysis, SearchCompletion};
use crate::calibration::{calibration_commands, GoCommand};
use crate::completion::CompletionSlot;
use crate::error::{EngineError, EngineResult, TransportError};
use crate::info::{parse_best_move, SearchProgress};
use crate::settings::EngineSettings;
use crate::transport::EngineTransport;

/// Lifecycle of an engine session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Analyzing,
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Initializing => "initializing",
            SessionState::Ready => "ready",
            SessionState::Analyzing => "analyzing",
            SessionState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Fixed delays and bounds used by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    /// Bound on the whole `uci`/`isready` handshake
    pub init_timeout: Duration,
    /// Pause after `position` and after the following `isready`
    pub settle_delay: Duration,
    /// Bound on the `readyok` wait before each search
    pub resync_timeout: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            init_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_millis(50),
            resync_timeout: Duration::from_secs(1),
        }
    }
}

#[derive(Debug)]
enum SearchOutcome {
    BestMove(String),
    TimedOut,
}

/// Session with one UCI engine
pub struct EngineSession {
    transport: Arc<dyn EngineTransport>,
    state: Mutex<SessionState>,
    search_lock: tokio::sync::Mutex<()>,
    timings: SessionTimings,
}

impl fmt::Debug for EngineSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSession")
            .field("state", &self.state())
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

impl EngineSession {
    /// Session with default timings; nothing is sent until [`initialize`](Self::initialize)
    pub fn new(transport: Arc<dyn EngineTransport>) -> Self {
        Self::with_timings(transport, SessionTimings::default())
    }

    pub fn with_timings(transport: Arc<dyn EngineTransport>, timings: SessionTimings) -> Self {
        Self {
            transport,
            state: Mutex::new(SessionState::Uninitialized),
            search_lock: tokio::sync::Mutex::new(()),
            timings,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }

    fn set_state(&self, state: SessionState) {
        *self.state.lock() = state;
    }

    /// Start the engine and run the UCI handshake
    ///
    /// Succeeds immediately on a session that is already up. On timeout the
    /// session falls back to `Uninitialized` and may be initialized again.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InitTimeout`] when `uciok`/`readyok` do not arrive in time
    /// - [`EngineError::Transport`] when the engine cannot be started or exits
    /// - [`EngineError::Stopped`] after [`shutdown`](Self::shutdown)
    pub async fn initialize(&self) -> EngineResult<()> {
        match self.state() {
            SessionState::Ready | SessionState::Analyzing => return Ok(()),
            SessionState::Stopped => return Err(EngineError::Stopped),
            SessionState::Uninitialized | SessionState::Initializing => {}
        }

        self.set_state(SessionState::Initializing);
        info!("[ENGINE] Starting UCI handshake");

        let timeout = self.timings.init_timeout;
        match tokio::time::timeout(timeout, self.handshake()).await {
            Ok(Ok(())) => {
                self.set_state(SessionState::Ready);
                info!("[ENGINE] Engine ready");
                Ok(())
            }
            Ok(Err(e)) => {
                self.set_state(SessionState::Uninitialized);
                error!("[ENGINE] Handshake failed: {}", e);
                Err(e.into())
            }
            Err(_) => {
                self.set_state(SessionState::Uninitialized);
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                warn!("[ENGINE] Handshake timed out after {}ms", timeout_ms);
                Err(EngineError::InitTimeout { timeout_ms })
            }
        }
    }

    async fn handshake(&self) -> Result<(), TransportError> {
        self.transport.start().await?;
        let mut lines = self.transport.subscribe();

        self.send("uci").await?;
        wait_for_token(&mut lines, "uciok").await?;
        self.send("isready").await?;
        wait_for_token(&mut lines, "readyok").await?;
        Ok(())
    }

    async fn send(&self, command: &str) -> Result<(), TransportError> {
        debug!("[ENGINE] >> {}", command);
        self.transport.send(command).await
    }

    /// Load `position` into the engine
    pub async fn set_position(&self, position: &Position) -> EngineResult<()> {
        self.set_position_fen(&position.to_fen()).await
    }

    /// Load a position given as text
    ///
    /// Fire-and-forget: the command is followed by `isready` with a short
    /// pause on either side, but `readyok` is not awaited here. The next
    /// [`analyze`](Self::analyze) resynchronizes before searching.
    pub async fn set_position_fen(&self, fen: &str) -> EngineResult<()> {
        if self.state() == SessionState::Stopped {
            return Err(EngineError::Stopped);
        }

        self.send(&format!("position fen {fen}")).await?;
        tokio::time::sleep(self.timings.settle_delay).await;
        self.send("isready").await?;
        tokio::time::sleep(self.timings.settle_delay).await;
        Ok(())
    }

    /// Run one search and collect its result
    ///
    /// Never fails. A session that is not ready yields
    /// [`EngineAnalysis::not_ready`]; a search cut off by the watchdog
    /// yields partial data with [`SearchCompletion::TimedOut`]. Check
    /// [`EngineAnalysis::has_best_move`] before using the move.
    pub async fn analyze(&self, settings: &EngineSettings) -> EngineAnalysis {
        self.search_cycle(None, settings).await
    }

    /// Load `position` and search it in one cycle
    ///
    /// The `position` command is sent under the same lock as the search, so
    /// a concurrent request cannot swap the engine's position between the two.
    /// Degrades like [`analyze`](Self::analyze).
    pub async fn analyze_position(&self, position: &Position, settings: &EngineSettings) -> EngineAnalysis {
        self.search_cycle(Some(&position.to_fen()), settings).await
    }

    async fn search_cycle(&self, fen: Option<&str>, settings: &EngineSettings) -> EngineAnalysis {
        let _search = self.search_lock.lock().await;

        {
            let mut state = self.state.lock();
            if *state != SessionState::Ready {
                warn!("[ENGINE] Analysis requested while {}", *state);
                return EngineAnalysis::not_ready();
            }
            *state = SessionState::Analyzing;
        }

        let analysis = match self.run_search(fen, settings).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("[ENGINE] Search aborted: {}", e);
                EngineAnalysis::not_ready()
            }
        };

        {
            let mut state = self.state.lock();
            if *state == SessionState::Analyzing {
                *state = SessionState::Ready;
            }
        }

        analysis
    }

    async fn run_search(
        &self,
        fen: Option<&str>,
        settings: &EngineSettings,
    ) -> Result<EngineAnalysis, TransportError> {
        let mut lines = self.transport.subscribe();

        self.send("stop").await?;
        if let Some(fen) = fen {
            self.send(&format!("position fen {fen}")).await?;
        }
        self.resync(&mut lines).await?;

        for command in calibration_commands(settings) {
            self.send(&command).await?;
        }

        let go = GoCommand::from_settings(settings);
        let watchdog_timeout = go.watchdog_timeout();
        self.send(&go.to_string()).await?;

        let progress = Arc::new(Mutex::new(SearchProgress::default()));
        let slot = Arc::new(CompletionSlot::new());

        let listener = tokio::spawn(listen(lines, Arc::clone(&progress), Arc::clone(&slot)));
        let watchdog = tokio::spawn({
            let slot = Arc::clone(&slot);
            async move {
                tokio::time::sleep(watchdog_timeout).await;
                slot.settle(SearchOutcome::TimedOut);
            }
        });

        let outcome = slot.wait().await;
        listener.abort();
        watchdog.abort();

        let progress = progress.lock();
        let analysis = match outcome {
            SearchOutcome::BestMove(best_move) => {
                debug!(
                    "[ENGINE] bestmove {:?} at depth {} ({} nodes)",
                    best_move, progress.depth, progress.nodes
                );
                progress.to_analysis(best_move, SearchCompletion::BestMove)
            }
            SearchOutcome::TimedOut => {
                warn!(
                    "[ENGINE] No bestmove within {}ms, returning depth {} partial result",
                    watchdog_timeout.as_millis(),
                    progress.depth
                );
                progress.to_analysis(String::new(), SearchCompletion::TimedOut)
            }
        };
        Ok(analysis)
    }

    async fn resync(&self, lines: &mut broadcast::Receiver<String>) -> Result<(), TransportError> {
        self.send("isready").await?;
        match tokio::time::timeout(self.timings.resync_timeout, wait_for_token(lines, "readyok")).await {
            Ok(result) => result,
            Err(_) => {
                debug!("[ENGINE] No readyok before search, continuing");
                Ok(())
            }
        }
    }

    /// Ask the engine to stop searching
    ///
    /// Cooperative: the running [`analyze`](Self::analyze) returns once the
    /// engine answers with `bestmove` or its watchdog fires.
    pub async fn stop(&self) -> EngineResult<()> {
        self.send("stop").await?;
        Ok(())
    }

    /// Send `quit` and release the transport
    pub async fn shutdown(&self) -> EngineResult<()> {
        if self.state() == SessionState::Stopped {
            return Ok(());
        }

        if let Err(e) = self.send("quit").await {
            debug!("[ENGINE] quit not delivered: {}", e);
        }
        self.set_state(SessionState::Stopped);
        self.transport.shutdown().await?;
        info!("[ENGINE] Session stopped");
        Ok(())
    }
}

async fn wait_for_token(
    lines: &mut broadcast::Receiver<String>,
    token: &str,
) -> Result<(), TransportError> {
    loop {
        match lines.recv().await {
            Ok(line) if line.trim() == token => return Ok(()),
            Ok(_) | Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => return Err(TransportError::Closed),
        }
    }
}

async fn listen(
    mut lines: broadcast::Receiver<String>,
    progress: Arc<Mutex<SearchProgress>>,
    slot: Arc<CompletionSlot<SearchOutcome>>,
) {
    while !slot.is_settled() {
        match lines.recv().await {
            Ok(line) => {
                if let Some(best_move) = parse_best_move(&line) {
                    slot.settle(SearchOutcome::BestMove(best_move));
                    return;
                }
                progress.lock().apply_line(&line);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("[ENGINE] Listener fell behind, {} lines skipped", skipped);
            }
            Err(RecvError::Closed) => {
                // Watchdog still settles with whatever arrived
                warn!("[ENGINE] Engine output closed during search");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{after, reply, ScriptedEngine};

    fn fast_timings() -> SessionTimings {
        SessionTimings {
            init_timeout: Duration::from_secs(2),
            settle_delay: Duration::from_millis(5),
            resync_timeout: Duration::from_millis(200),
        }
    }

    async fn ready_session(engine: Arc<ScriptedEngine>) -> EngineSession {
        let session = EngineSession::with_timings(engine, fast_timings());
        session.initialize().await.unwrap();
        session
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_handshake() {
        let engine = Arc::new(ScriptedEngine::uci(Vec::new()));
        let session = EngineSession::with_timings(engine.clone(), fast_timings());
        assert_eq!(session.state(), SessionState::Uninitialized);

        session.initialize().await.unwrap();

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(engine.sent(), vec!["uci", "isready"]);

        // second call is a no-op
        session.initialize().await.unwrap();
        assert_eq!(engine.start_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_timeout_returns_to_uninitialized() {
        //! A silent engine fails the attempt and leaves the session reusable
        let session = EngineSession::with_timings(Arc::new(ScriptedEngine::silent()), fast_timings());

        let err = session.initialize().await.unwrap_err();
        assert!(matches!(err, EngineError::InitTimeout { timeout_ms: 2000 }));
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_before_ready_is_degraded() {
        let engine = Arc::new(ScriptedEngine::uci(Vec::new()));
        let session = EngineSession::with_timings(engine.clone(), fast_timings());

        let analysis = session.analyze(&EngineSettings::default()).await;

        assert_eq!(analysis, EngineAnalysis::not_ready());
        assert!(engine.sent().is_empty(), "nothing may reach an engine that is not up");
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_collects_info_and_best_move() {
        let engine = Arc::new(ScriptedEngine::uci(vec![
            reply("info depth 12 score cp 35 nodes 50000 nps 500000 hashfull 40 pv e2e4 e7e5"),
            after(50, "bestmove e2e4 ponder e7e5"),
        ]));
        let session = ready_session(engine.clone()).await;
        session
            .set_position(&Position::starting())
            .await
            .unwrap();

        let analysis = session.analyze(&EngineSettings::default()).await;

        assert_eq!(analysis.best_move, "e2e4");
        assert_eq!(analysis.completion, SearchCompletion::BestMove);
        assert_eq!(analysis.depth, 12);
        assert_eq!(analysis.principal_variation, vec!["e2e4", "e7e5"]);
        assert_eq!(analysis.alternatives, vec!["e2e4"]);
        assert_eq!(session.state(), SessionState::Ready);

        let sent = engine.sent();
        let search_start = sent.iter().position(|c| c == "stop").unwrap();
        assert_eq!(sent[search_start + 1], "isready");
        assert!(sent[search_start + 2].starts_with("setoption name Skill Level"));
        assert!(sent.last().unwrap().starts_with("go depth 10 movetime 1000"));
        assert!(sent.contains(&format!("position fen {}", chess_core::constants::STARTING_FEN)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_position_sends_position_inside_cycle() {
        //! stop, position, isready, options, go: nothing else in between
        let engine = Arc::new(ScriptedEngine::uci(vec![reply("bestmove e7e5")]));
        let session = ready_session(engine.clone()).await;
        let position: Position = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
            .parse()
            .unwrap();

        let analysis = session
            .analyze_position(&position, &EngineSettings::default())
            .await;

        assert_eq!(analysis.best_move, "e7e5");
        let sent = engine.sent();
        let search_start = sent.iter().position(|c| c == "stop").unwrap();
        assert_eq!(sent[search_start + 1], format!("position fen {}", position.to_fen()));
        assert_eq!(sent[search_start + 2], "isready");
        assert!(sent.last().unwrap().starts_with("go "));
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_position_before_ready_sends_nothing() {
        let engine = Arc::new(ScriptedEngine::uci(Vec::new()));
        let session = EngineSession::with_timings(engine.clone(), fast_timings());

        let analysis = session
            .analyze_position(&Position::starting(), &EngineSettings::default())
            .await;

        assert_eq!(analysis, EngineAnalysis::not_ready());
        assert!(engine.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_best_move_ends_search_before_later_lines() {
        //! Output after bestmove must not leak into the result
        let engine = Arc::new(ScriptedEngine::uci(vec![
            reply("info depth 5 score cp 10 pv d2d4"),
            reply("bestmove d2d4"),
            reply("info depth 30 score mate 1 pv g1f3"),
        ]));
        let session = ready_session(engine).await;

        let analysis = session.analyze(&EngineSettings::default()).await;

        assert_eq!(analysis.best_move, "d2d4");
        assert_eq!(analysis.depth, 5);
        assert_eq!(analysis.mate_in, None);
        assert_eq!(analysis.principal_variation, vec!["d2d4"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_returns_partial_result() {
        let engine = Arc::new(ScriptedEngine::uci(vec![reply(
            "info depth 8 score cp -42 nodes 9000 pv c7c5 g1f3",
        )]));
        let session = ready_session(engine).await;

        let start = tokio::time::Instant::now();
        let analysis = session.analyze(&EngineSettings::default()).await;

        assert!(start.elapsed() >= Duration::from_millis(5000));
        assert_eq!(analysis.completion, SearchCompletion::TimedOut);
        assert!(!analysis.has_best_move());
        assert_eq!(analysis.depth, 8);
        assert!((analysis.evaluation + 0.42).abs() < f64::EPSILON);
        assert_eq!(analysis.principal_variation, vec!["c7c5", "g1f3"]);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_move_best_move_is_empty() {
        let engine = Arc::new(ScriptedEngine::uci(vec![
            reply("info depth 0 score mate 0"),
            reply("bestmove (none)"),
        ]));
        let session = ready_session(engine).await;

        let analysis = session.analyze(&EngineSettings::default()).await;

        assert_eq!(analysis.completion, SearchCompletion::BestMove);
        assert!(!analysis.has_best_move());
        assert_eq!(analysis.mate_in, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_analyses_do_not_overlap() {
        //! Second request waits for the first; go commands alternate with stop
        let engine = Arc::new(ScriptedEngine::uci(vec![after(100, "bestmove e2e4")]));
        let session = Arc::new(ready_session(engine.clone()).await);

        let settings = EngineSettings::default();
        let (a, b) = tokio::join!(session.analyze(&settings), session.analyze(&settings));
        assert_eq!(a.best_move, "e2e4");
        assert_eq!(b.best_move, "e2e4");

        let cycle: Vec<&str> = engine
            .sent()
            .iter()
            .filter(|c| *c == "stop" || c.starts_with("go "))
            .map(|c| if c == "stop" { "stop" } else { "go" })
            .collect();
        assert_eq!(cycle, vec!["stop", "go", "stop", "go"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_terminal() {
        let engine = Arc::new(ScriptedEngine::uci(Vec::new()));
        let session = ready_session(engine.clone()).await;

        session.shutdown().await.unwrap();

        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(engine.sent().last().map(String::as_str), Some("quit"));
        assert!(matches!(session.initialize().await, Err(EngineError::Stopped)));
        assert_eq!(
            session.analyze(&EngineSettings::default()).await.completion,
            SearchCompletion::NotReady
        );
    }
}
