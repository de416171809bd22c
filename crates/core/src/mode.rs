//! Game modes - finish/failure predicates and the leaderboard hand-off
//!
//! A session is generic over [`ModeRules`]; [`GameMode`] covers the three
//! shipped modes. Modes only ever look at [`SessionStats`], never at the field.

use crate::types::ModeResult;

/// Lines needed to finish a Marathon
pub const MARATHON_LINES: u32 = 150;

/// Lines needed to finish a Sprint
pub const SPRINT_LINES: u32 = 40;

/// Length of an Ultra run in simulated milliseconds
pub const ULTRA_DURATION_MS: f64 = 120_000.0;

/// Read-only view of the numbers a mode needs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionStats {
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    /// Unpaused game time since the session started.
    pub elapsed_ms: f64,
}

/// Strategy for a game mode.
pub trait ModeRules {
    /// The run ended successfully.
    fn is_finished(&self, stats: &SessionStats) -> bool;

    /// The mode itself failed the run. Topping out is handled by the session.
    fn is_failed(&self, _stats: &SessionStats) -> bool {
        false
    }

    /// Value handed to the leaderboard once `is_finished` becomes true.
    fn on_finished(&self, stats: &SessionStats) -> ModeResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GameMode {
    /// Clear 150 lines, ranked by score.
    #[default]
    Marathon,
    /// Clear 40 lines, ranked by time.
    Sprint,
    /// Two minutes, ranked by score.
    Ultra,
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "marathon" => Some(GameMode::Marathon),
            "sprint" => Some(GameMode::Sprint),
            "ultra" => Some(GameMode::Ultra),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Marathon => "marathon",
            GameMode::Sprint => "sprint",
            GameMode::Ultra => "ultra",
        }
    }
}

impl ModeRules for GameMode {
    fn is_finished(&self, stats: &SessionStats) -> bool {
        match self {
            GameMode::Marathon => stats.lines_cleared >= MARATHON_LINES,
            GameMode::Sprint => stats.lines_cleared >= SPRINT_LINES,
            GameMode::Ultra => stats.elapsed_ms >= ULTRA_DURATION_MS,
        }
    }

    fn on_finished(&self, stats: &SessionStats) -> ModeResult {
        match self {
            GameMode::Marathon | GameMode::Ultra => ModeResult::Score(stats.score),
            GameMode::Sprint => ModeResult::Time(stats.elapsed_ms),
        }
    }
}
