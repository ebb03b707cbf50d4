use std::sync::Arc;

use anyhow::Context;
use chess_core::{CoordinateNotation, Position};
use clap::Parser;
use stockfish_bridge::EngineSession;
use tracing::{info, warn};

use xfchess_analyzer::cli::Cli;
use xfchess_analyzer::core::{init_logging, load_or_default, AnalyzerSettings};
use xfchess_analyzer::{AnalysisReport, AnalysisService, BuiltinOpeningBook, OpeningBook, ProcessTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings_path = cli.settings_path();

    // The filter has to exist before load_or_default logs anything
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| AnalyzerSettings::load_from(&settings_path).ok().map(|s| s.log_level))
        .unwrap_or_else(|| AnalyzerSettings::default().log_level);
    init_logging(&log_level)?;

    let mut settings = load_or_default(&settings_path);
    cli.apply_overrides(&mut settings)
        .context("invalid settings after applying command-line flags")?;
    if cli.save_settings {
        settings
            .save_to(&settings_path)
            .with_context(|| format!("could not save settings to {}", settings_path.display()))?;
    }

    let position: Position = cli
        .fen
        .parse()
        .with_context(|| format!("invalid position {:?}", cli.fen))?;
    let history_len = cli.history.unwrap_or_else(|| position.plies_played());

    let transport = Arc::new(ProcessTransport::new(settings.engine_path.clone()));
    let session = Arc::new(EngineSession::with_timings(transport, settings.session_timings()));
    let book: Arc<dyn OpeningBook> = match settings.book_seed {
        Some(seed) => Arc::new(BuiltinOpeningBook::seeded(seed)),
        None => Arc::new(BuiltinOpeningBook::default()),
    };
    let service = AnalysisService::new(session, book, Arc::new(CoordinateNotation));

    let evaluation = if cli.tactics_only {
        None
    } else {
        if let Err(e) = service
            .initialize_with_retry(settings.init_attempts, settings.retry_backoff())
            .await
        {
            warn!(
                "[ANALYSIS] Engine {:?} unavailable ({}). Only book moves and tactics will be reported.",
                settings.engine_path, e
            );
        }
        Some(
            service
                .analyze_with_evaluation(&position, history_len, &settings.engine)
                .await,
        )
    };

    let report = AnalysisReport {
        fen: position.to_fen(),
        evaluation,
        tactics: service.tactical_report(&position),
    };

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }

    if let Err(e) = service.session().shutdown().await {
        warn!("[ENGINE] Shutdown failed: {}", e);
    }
    info!("[ANALYSIS] Done");
    Ok(())
}
