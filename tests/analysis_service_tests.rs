//! Integration tests for the analysis service
//!
//! Book, engine and notation wired together the way the binary does it,
//! with the scripted engine standing in for a real process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chess_core::{CoordinateNotation, PatternType, Position, Square};
use stockfish_bridge::testing::{after, reply, ScriptedEngine, ScriptedReply};
use stockfish_bridge::{EngineError, EngineSession, EngineSettings, SessionTimings};
use xfchess_analyzer::analysis::BOOK_PLY_LIMIT;
use xfchess_analyzer::{AnalysisService, BuiltinOpeningBook, EvaluationSource};

fn timings() -> SessionTimings {
    SessionTimings {
        init_timeout: Duration::from_secs(2),
        settle_delay: Duration::from_millis(10),
        resync_timeout: Duration::from_millis(200),
    }
}

fn service_with(engine: Arc<ScriptedEngine>) -> AnalysisService {
    let session = Arc::new(EngineSession::with_timings(engine, timings()));
    AnalysisService::new(
        session,
        Arc::new(BuiltinOpeningBook::seeded(11)),
        Arc::new(CoordinateNotation),
    )
}

fn strong() -> EngineSettings {
    EngineSettings {
        skill_level: 20,
        ..EngineSettings::default()
    }
}

fn square(name: &str) -> Square {
    name.parse().unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_book_move_skips_the_engine() {
    let engine = Arc::new(ScriptedEngine::uci(vec![reply("bestmove d2d4")]));
    let service = service_with(engine.clone());
    service.initialize_with_retry(1, Duration::ZERO).await.unwrap();

    let mv = service
        .analyze_best_move(&Position::starting(), 0, &strong())
        .await
        .unwrap();

    assert_eq!(mv.from, square("e2"));
    assert_eq!(mv.to, square("e4"));
    assert!(!engine.sent().iter().any(|c| c.starts_with("go")));
}

#[tokio::test(start_paused = true)]
async fn test_engine_used_once_opening_is_over() {
    //! Same position, but the game is already past the book window
    let engine = Arc::new(ScriptedEngine::uci(vec![
        reply("info depth 12 score cp 25 pv d2d4 d7d5"),
        after(10, "bestmove d2d4 ponder d7d5"),
    ]));
    let service = service_with(engine.clone());
    service.initialize_with_retry(1, Duration::ZERO).await.unwrap();

    let evaluation = service
        .analyze_with_evaluation(&Position::starting(), BOOK_PLY_LIMIT, &strong())
        .await;

    assert_eq!(evaluation.source, EvaluationSource::Engine);
    let mv = evaluation.best_move.unwrap();
    assert_eq!((mv.from, mv.to), (square("d2"), square("d4")));
    assert!((evaluation.score - 0.25).abs() < f64::EPSILON);
    assert_eq!(evaluation.depth, 12);
    assert_eq!(evaluation.principal_variation, vec!["d2d4", "d7d5"]);

    let sent = engine.sent();
    assert!(sent.contains(&format!("position fen {}", Position::starting().to_fen())));
    assert!(sent.iter().any(|c| c.starts_with("go ")));
}

#[tokio::test(start_paused = true)]
async fn test_disabled_book_goes_to_engine() {
    let engine = Arc::new(ScriptedEngine::uci(vec![reply("bestmove g1f3")]));
    let service = service_with(engine.clone());
    service.initialize_with_retry(1, Duration::ZERO).await.unwrap();

    let settings = EngineSettings {
        use_opening_book: false,
        ..strong()
    };
    let mv = service
        .analyze_best_move(&Position::starting(), 0, &settings)
        .await
        .unwrap();
    assert_eq!(mv.to, square("f3"));
}

#[tokio::test(start_paused = true)]
async fn test_unplayable_engine_move_is_dropped() {
    //! e2e5 is well formed but no pawn move reaches e5 from e2
    let engine = Arc::new(ScriptedEngine::uci(vec![
        reply("info depth 9 score cp -40 pv e2e5"),
        reply("bestmove e2e5"),
    ]));
    let service = service_with(engine.clone());
    service.initialize_with_retry(1, Duration::ZERO).await.unwrap();

    let position = Position::starting();
    assert_eq!(service.analyze_best_move(&position, 20, &strong()).await, None);

    let evaluation = service.analyze_with_evaluation(&position, 20, &strong()).await;
    assert_eq!(evaluation.best_move, None);
    assert_eq!(evaluation.source, EvaluationSource::Unavailable);
    assert!((evaluation.score + 0.40).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_no_legal_move_reported_as_unavailable() {
    let engine = Arc::new(ScriptedEngine::uci(vec![
        reply("info depth 0 score mate 0"),
        reply("bestmove (none)"),
    ]));
    let service = service_with(engine.clone());
    service.initialize_with_retry(1, Duration::ZERO).await.unwrap();

    // Black is checkmated
    let position: Position = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1".parse().unwrap();
    let evaluation = service.analyze_with_evaluation(&position, 40, &strong()).await;

    assert_eq!(evaluation.best_move, None);
    assert_eq!(evaluation.source, EvaluationSource::Unavailable);
    assert!(evaluation.is_mate);
}

#[tokio::test(start_paused = true)]
async fn test_mate_score_carried_through() {
    let engine = Arc::new(ScriptedEngine::uci(vec![
        reply("info depth 5 score mate 1 pv a1a8"),
        reply("bestmove a1a8"),
    ]));
    let service = service_with(engine.clone());
    service.initialize_with_retry(1, Duration::ZERO).await.unwrap();

    let position: Position = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
    let evaluation = service.analyze_with_evaluation(&position, 40, &strong()).await;

    assert_eq!(evaluation.source, EvaluationSource::Engine);
    assert!(evaluation.is_mate);
    assert_eq!(evaluation.mate_in, Some(1));
    assert!(evaluation.score > 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_uninitialized_engine_degrades() {
    //! Never initialized: the book still answers, the engine path does not
    let engine = Arc::new(ScriptedEngine::uci(vec![reply("bestmove e2e4")]));
    let service = service_with(engine.clone());

    let book = service.analyze_with_evaluation(&Position::starting(), 0, &strong()).await;
    assert_eq!(book.source, EvaluationSource::Book);

    let past_book = service
        .analyze_with_evaluation(&Position::starting(), BOOK_PLY_LIMIT, &strong())
        .await;
    assert_eq!(past_book.source, EvaluationSource::Unavailable);
    assert_eq!(past_book.best_move, None);
    assert!(engine.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_retry_gives_up_after_all_attempts() {
    let engine = Arc::new(ScriptedEngine::silent());
    let service = service_with(engine.clone());

    let started = tokio::time::Instant::now();
    let err = service
        .initialize_with_retry(3, Duration::from_millis(100))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InitTimeout { .. }));
    assert_eq!(engine.start_count(), 3);
    // Three 2 s handshakes plus 100 ms and 200 ms of backoff
    assert!(started.elapsed() >= Duration::from_millis(6300));
}

#[tokio::test(start_paused = true)]
async fn test_retry_recovers_when_engine_wakes_up() {
    let awake = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&awake);
    let engine = Arc::new(ScriptedEngine::new(move |command| {
        if !flag.load(Ordering::SeqCst) {
            return Vec::<ScriptedReply>::new();
        }
        match command {
            "uci" => vec![reply("uciok")],
            "isready" => vec![reply("readyok")],
            _ => Vec::new(),
        }
    }));
    let service = service_with(engine.clone());

    let waker = Arc::clone(&awake);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        waker.store(true, Ordering::SeqCst);
    });

    service
        .initialize_with_retry(3, Duration::from_millis(100))
        .await
        .unwrap();
    assert!(service.session().is_ready());
    assert_eq!(engine.start_count(), 2);
}

#[tokio::test]
async fn test_tactical_report_needs_no_engine() {
    let engine = Arc::new(ScriptedEngine::silent());
    let service = service_with(engine.clone());

    let position: Position = "7k/8/3r1b2/8/4N3/8/8/K7 w - - 0 1".parse().unwrap();
    let report = service.tactical_report(&position);

    assert!(report
        .iter()
        .any(|p| matches!(p.pattern_type, PatternType::KnightFork)));
    assert!(report.windows(2).all(|w| w[0].severity >= w[1].severity));
    assert_eq!(engine.start_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_search_their_own_position() {
    //! The engine answers for whatever position it was given last, so a
    //! request whose position was replaced by another one gets a wrong move
    let side = Arc::new(parking_lot::Mutex::new(String::new()));
    let seen = Arc::clone(&side);
    let engine = Arc::new(ScriptedEngine::new(move |command| {
        let mut tokens = command.split_whitespace();
        match tokens.next() {
            Some("uci") => vec![reply("uciok")],
            Some("isready") => vec![reply("readyok")],
            Some("position") => {
                *seen.lock() = tokens.nth(2).unwrap_or_default().to_string();
                Vec::new()
            }
            Some("go") => match seen.lock().as_str() {
                "w" => vec![after(30, "bestmove d2d4")],
                _ => vec![after(30, "bestmove e7e5")],
            },
            _ => Vec::new(),
        }
    }));
    let service = service_with(engine.clone());
    service.initialize_with_retry(1, Duration::ZERO).await.unwrap();

    let white = Position::starting();
    let black: Position = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        .parse()
        .unwrap();
    let settings = strong();

    let (white_move, black_move) = tokio::join!(
        service.analyze_best_move(&white, BOOK_PLY_LIMIT, &settings),
        service.analyze_best_move(&black, BOOK_PLY_LIMIT, &settings),
    );

    let white_move = white_move.unwrap();
    let black_move = black_move.unwrap();
    assert_eq!((white_move.from, white_move.to), (square("d2"), square("d4")));
    assert_eq!((black_move.from, black_move.to), (square("e7"), square("e5")));

    // Every go directly follows the position it searches
    let sent = engine.sent();
    let cycle: Vec<&str> = sent
        .iter()
        .filter_map(|c| c.split_whitespace().next())
        .filter(|c| matches!(*c, "position" | "go"))
        .collect();
    assert_eq!(cycle, vec!["position", "go", "position", "go"]);
}
