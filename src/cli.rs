//! Command-line interface
//!
//! Flags override the values loaded from `settings.json` field by field;
//! anything left unset keeps the file (or default) value.

use std::path::PathBuf;

use chess_core::constants::STARTING_FEN;
use clap::Parser;
use stockfish_bridge::{DifficultyBand, EngineSettings};

use crate::core::{AnalyzerSettings, ConfigResult};

/// Analyze a chess position with a UCI engine, an opening book and tactical detectors
#[derive(Debug, Clone, Parser)]
#[command(name = "xfchess-analyzer", version, about)]
pub struct Cli {
    /// Position to analyze, as FEN text
    #[arg(default_value = STARTING_FEN)]
    pub fen: String,

    /// Engine executable (defaults to the settings file value)
    #[arg(long, value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// Settings file to load instead of the platform default
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset, e.g. "debug" or "info,stockfish_bridge=trace"
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Difficulty band: beginner, casual, intermediate, advanced, expert or master
    #[arg(long, value_name = "BAND")]
    pub difficulty: Option<DifficultyBand>,

    /// Engine skill level, 0-20 (applied after --difficulty)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=20))]
    pub skill: Option<u8>,

    /// Search depth limit in plies
    #[arg(long)]
    pub depth: Option<u32>,

    /// Search time limit in milliseconds
    #[arg(long, value_name = "MS")]
    pub movetime: Option<u64>,

    /// Number of principal variations to request
    #[arg(long)]
    pub multipv: Option<u32>,

    /// Never consult the opening book
    #[arg(long)]
    pub no_book: bool,

    /// Half-moves already played; defaults to the move counters in the FEN
    #[arg(long, value_name = "PLIES")]
    pub history: Option<usize>,

    /// Report tactical patterns only, without starting the engine
    #[arg(long)]
    pub tactics_only: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    pub save_settings: bool,
}

impl Cli {
    /// Settings file this run reads from and saves to
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(AnalyzerSettings::default_path)
    }

    /// Apply flag overrides on top of loaded settings and validate the result
    pub fn apply_overrides(&self, settings: &mut AnalyzerSettings) -> ConfigResult<()> {
        if let Some(path) = &self.engine {
            settings.engine_path = path.clone();
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
        if let Some(band) = self.difficulty {
            settings.engine = EngineSettings {
                use_opening_book: settings.engine.use_opening_book,
                hash_mb: settings.engine.hash_mb,
                ..EngineSettings::from_difficulty(band)
            };
        }
        if let Some(skill) = self.skill {
            settings.engine.skill_level = skill;
        }
        if let Some(depth) = self.depth {
            settings.engine.depth = depth;
        }
        if let Some(movetime) = self.movetime {
            settings.engine.time_limit_ms = movetime;
        }
        if let Some(multi_pv) = self.multipv {
            settings.engine.multi_pv = multi_pv;
        }
        if self.no_book {
            settings.engine.use_opening_book = false;
        }
        settings.validate()
    }
}
