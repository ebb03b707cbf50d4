//! Strength calibration and search command construction
//!
//! Every analysis pushes the full option set before `go`, so a session
//! shared between opponents of different strength never carries one
//! request's settings into the next.
//!
//! # Rules
//!
//! - `Skill Level` is always sent
//! - below the maximum skill, strength limiting is switched on with a rating
//!   of `800 + 100 * skill`; at the maximum it is switched off
//! - hash drops to 16 MB below skill 10
//! - move time is clamped into `[50, 60000]` ms; under 300 ms a node budget
//!   of at least 10 000 is added so very short searches still return a move
//! - the watchdog waits `max(movetime + 2000, 5000)` ms for `bestmove`

use std::fmt;
use std::time::Duration;

use crate::settings::{EngineSettings, MAX_SKILL_LEVEL};

pub const MIN_MOVE_TIME_MS: u64 = 50;
pub const MAX_MOVE_TIME_MS: u64 = 60_000;
/// Move times below this get a node budget
pub const SHORT_SEARCH_MS: u64 = 300;
pub const SHORT_SEARCH_MIN_NODES: u64 = 10_000;
pub const BASE_RATING: u32 = 800;
pub const RATING_PER_SKILL: u32 = 100;
/// Skill levels below this run with [`LOW_SKILL_HASH_MB`]
pub const LOW_SKILL_THRESHOLD: u8 = 10;
pub const LOW_SKILL_HASH_MB: u32 = 16;
const WATCHDOG_GRACE_MS: u64 = 2_000;
const WATCHDOG_FLOOR_MS: u64 = 5_000;

/// Rating used when strength limiting is on
pub fn rating_for_skill(skill: u8) -> u32 {
    BASE_RATING + RATING_PER_SKILL * u32::from(skill.min(MAX_SKILL_LEVEL))
}

/// `setoption` lines for `settings`, in the order they are sent
pub fn calibration_commands(settings: &EngineSettings) -> Vec<String> {
    let skill = settings.effective_skill();
    let mut commands = vec![set_option("Skill Level", skill)];

    if skill < MAX_SKILL_LEVEL {
        commands.push(set_option("UCI_LimitStrength", "true"));
        commands.push(set_option("UCI_Elo", rating_for_skill(skill)));
    } else {
        commands.push(set_option("UCI_LimitStrength", "false"));
    }

    commands.push(set_option("Contempt", settings.contempt));
    commands.push(set_option("MultiPV", settings.multi_pv.max(1)));

    let hash_mb = if skill < LOW_SKILL_THRESHOLD {
        LOW_SKILL_HASH_MB
    } else {
        settings.hash_mb
    };
    commands.push(set_option("Hash", hash_mb));

    commands
}

fn set_option(name: &str, value: impl fmt::Display) -> String {
    format!("setoption name {name} value {value}")
}

/// Bounds for one `go` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoCommand {
    pub depth: Option<u32>,
    pub movetime_ms: u64,
    pub nodes: Option<u64>,
}

impl GoCommand {
    /// Build the search bounds from request settings
    pub fn from_settings(settings: &EngineSettings) -> Self {
        let movetime_ms = settings
            .time_limit_ms
            .clamp(MIN_MOVE_TIME_MS, MAX_MOVE_TIME_MS);

        let nodes = if movetime_ms < SHORT_SEARCH_MS {
            Some(settings.node_limit.unwrap_or(0).max(SHORT_SEARCH_MIN_NODES))
        } else {
            settings.node_limit
        };

        Self {
            depth: (settings.depth > 0).then_some(settings.depth),
            movetime_ms,
            nodes,
        }
    }

    /// How long to wait for `bestmove` before giving up on the search
    pub fn watchdog_timeout(&self) -> Duration {
        Duration::from_millis((self.movetime_ms + WATCHDOG_GRACE_MS).max(WATCHDOG_FLOOR_MS))
    }
}

impl fmt::Display for GoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("go")?;
        if let Some(depth) = self.depth {
            write!(f, " depth {depth}")?;
        }
        write!(f, " movetime {}", self.movetime_ms)?;
        if let Some(nodes) = self.nodes {
            write!(f, " nodes {nodes}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(skill_level: u8, time_limit_ms: u64) -> EngineSettings {
        EngineSettings {
            skill_level,
            time_limit_ms,
            ..EngineSettings::default()
        }
    }

    #[test]
    fn test_limited_strength_below_max_skill() {
        let commands = calibration_commands(&settings(5, 1000));
        assert_eq!(
            commands,
            vec![
                "setoption name Skill Level value 5",
                "setoption name UCI_LimitStrength value true",
                "setoption name UCI_Elo value 1300",
                "setoption name Contempt value 0",
                "setoption name MultiPV value 1",
                "setoption name Hash value 16",
            ]
        );
    }

    #[test]
    fn test_full_strength_at_max_skill() {
        //! No rating is sent and the configured hash is kept
        let mut s = settings(20, 1000);
        s.hash_mb = 256;
        let commands = calibration_commands(&s);
        assert!(commands.contains(&"setoption name UCI_LimitStrength value false".to_string()));
        assert!(!commands.iter().any(|c| c.contains("UCI_Elo")));
        assert!(commands.contains(&"setoption name Hash value 256".to_string()));
    }

    #[test]
    fn test_hash_tier_boundary() {
        let mut s = settings(10, 1000);
        s.hash_mb = 128;
        assert!(calibration_commands(&s).contains(&"setoption name Hash value 128".to_string()));
        s.skill_level = 9;
        assert!(calibration_commands(&s).contains(&"setoption name Hash value 16".to_string()));
    }

    #[test]
    fn test_rating_formula() {
        assert_eq!(rating_for_skill(0), 800);
        assert_eq!(rating_for_skill(19), 2700);
        assert_eq!(rating_for_skill(99), 2800);
    }

    #[test]
    fn test_go_command_clamps_time() {
        let go = GoCommand::from_settings(&settings(10, 120_000));
        assert_eq!(go.movetime_ms, MAX_MOVE_TIME_MS);
        assert_eq!(go.nodes, None);
        assert_eq!(go.to_string(), "go depth 10 movetime 60000");

        let go = GoCommand::from_settings(&settings(10, 0));
        assert_eq!(go.movetime_ms, MIN_MOVE_TIME_MS);
    }

    #[test]
    fn test_short_search_gets_node_budget() {
        let go = GoCommand::from_settings(&settings(1, 200));
        assert_eq!(go.nodes, Some(SHORT_SEARCH_MIN_NODES));
        assert_eq!(go.to_string(), "go depth 10 movetime 200 nodes 10000");

        let mut s = settings(1, 200);
        s.node_limit = Some(50_000);
        assert_eq!(GoCommand::from_settings(&s).nodes, Some(50_000));
    }

    #[test]
    fn test_depth_zero_is_omitted() {
        let mut s = settings(10, 1000);
        s.depth = 0;
        assert_eq!(GoCommand::from_settings(&s).to_string(), "go movetime 1000");
    }

    #[test]
    fn test_watchdog_timeout() {
        assert_eq!(
            GoCommand::from_settings(&settings(10, 1000)).watchdog_timeout(),
            Duration::from_millis(5000)
        );
        assert_eq!(
            GoCommand::from_settings(&settings(10, 8000)).watchdog_timeout(),
            Duration::from_millis(10_000)
        );
    }
}
