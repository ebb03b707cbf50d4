//! Engine search settings and difficulty bands
//!
//! [`EngineSettings`] is the bundle handed to
//! [`EngineSession::analyze`](crate::EngineSession::analyze) for each request.
//! Most hosts do not fill it by hand; they pick a [`DifficultyBand`] and let
//! [`EngineSettings::from_difficulty`] supply depth, time and skill.
//!
//! # Difficulty Bands
//!
//! | Band         | Depth | Time/Move | Skill | Approx. rating |
//! |--------------|-------|-----------|-------|----------------|
//! | Beginner     | 4     | 200ms     | 1     | 900            |
//! | Casual       | 6     | 500ms     | 5     | 1300           |
//! | Intermediate | 10    | 1000ms    | 10    | 1800           |
//! | Advanced     | 14    | 2000ms    | 15    | 2300           |
//! | Expert       | 18    | 3000ms    | 18    | 2600           |
//! | Master       | 22    | 5000ms    | 20    | unlimited      |
//!
//! Ratings follow the calibration rule `800 + 100 * skill` applied in
//! [`crate::calibration`]; skill 20 removes the strength limit.
//!
//! Blunder and inaccuracy rates are carried for hosts that post-process the
//! engine's choice; the session itself never reads them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest skill level the engine accepts
pub const MAX_SKILL_LEVEL: u8 = 20;

/// Named strength presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Beginner,
    Casual,
    #[default]
    Intermediate,
    Advanced,
    Expert,
    Master,
}

/// Defaults carried by a [`DifficultyBand`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub depth: u32,
    pub time_limit_ms: u64,
    pub skill_level: u8,
    /// Probability (0..1) a host should swap the engine move for a poor one
    pub blunder_rate: f64,
    /// Probability (0..1) a host should prefer a slightly worse alternative
    pub inaccuracy_rate: f64,
}

impl DifficultyBand {
    /// Every band, weakest first
    pub const ALL: [DifficultyBand; 6] = [
        DifficultyBand::Beginner,
        DifficultyBand::Casual,
        DifficultyBand::Intermediate,
        DifficultyBand::Advanced,
        DifficultyBand::Expert,
        DifficultyBand::Master,
    ];

    /// Preset values for this band
    pub fn profile(self) -> DifficultyProfile {
        let (depth, time_limit_ms, skill_level, blunder_rate, inaccuracy_rate) = match self {
            DifficultyBand::Beginner => (4, 200, 1, 0.25, 0.35),
            DifficultyBand::Casual => (6, 500, 5, 0.15, 0.25),
            DifficultyBand::Intermediate => (10, 1000, 10, 0.07, 0.15),
            DifficultyBand::Advanced => (14, 2000, 15, 0.03, 0.08),
            DifficultyBand::Expert => (18, 3000, 18, 0.01, 0.04),
            DifficultyBand::Master => (22, 5000, MAX_SKILL_LEVEL, 0.0, 0.0),
        };
        DifficultyProfile {
            depth,
            time_limit_ms,
            skill_level,
            blunder_rate,
            inaccuracy_rate,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            DifficultyBand::Beginner => "beginner",
            DifficultyBand::Casual => "casual",
            DifficultyBand::Intermediate => "intermediate",
            DifficultyBand::Advanced => "advanced",
            DifficultyBand::Expert => "expert",
            DifficultyBand::Master => "master",
        }
    }
}

impl fmt::Display for DifficultyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DifficultyBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DifficultyBand::ALL
            .into_iter()
            .find(|band| band.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty band: {s}"))
    }
}

/// Per-request engine configuration
///
/// # Fields
///
/// - `skill_level`: 0..=20, values above 20 are treated as 20
/// - `depth`: search depth in plies, 0 to omit the depth bound
/// - `time_limit_ms`: requested move time, clamped when the `go` command is built
/// - `node_limit`: optional node budget
/// - `contempt`, `multi_pv`, `hash_mb`: forwarded as engine options
/// - `difficulty`: band these settings were derived from
/// - `use_opening_book`: allow the caller to answer from a book first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub skill_level: u8,
    pub depth: u32,
    pub time_limit_ms: u64,
    pub node_limit: Option<u64>,
    pub contempt: i32,
    pub multi_pv: u32,
    pub hash_mb: u32,
    pub difficulty: DifficultyBand,
    pub use_opening_book: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_difficulty(DifficultyBand::default())
    }
}

impl EngineSettings {
    /// Settings seeded from a band's profile, other options at engine defaults
    pub fn from_difficulty(band: DifficultyBand) -> Self {
        let profile = band.profile();
        Self {
            skill_level: profile.skill_level,
            depth: profile.depth,
            time_limit_ms: profile.time_limit_ms,
            node_limit: None,
            contempt: 0,
            multi_pv: 1,
            hash_mb: 64,
            difficulty: band,
            use_opening_book: true,
        }
    }

    /// Skill level capped at [`MAX_SKILL_LEVEL`]
    pub fn effective_skill(&self) -> u8 {
        self.skill_level.min(MAX_SKILL_LEVEL)
    }
}
