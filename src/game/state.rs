//! Reconstructed match state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{StoneCoordinate, Team, TeamPair};

/// Why a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResultReason {
    /// Decided on points.
    Score,
    /// The losing team ran out of thinking time.
    TimeLimit,
}

/// Terminal outcome of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    /// Winning team.
    pub winner: Team,
    /// How the match was decided.
    pub reason: GameResultReason,
}

/// Authoritative local view of the match, reconstructed from stream events.
///
/// Score entries for ends that have not been played yet are `None`, never a
/// default zero; the vectors always have `max_end + 1` entries to leave room
/// for an extra end.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Current end, clamped to the configured maximum.
    pub end: u8,
    /// Shot counter within the current end.
    pub shot: u8,
    /// Team throwing the last stone of this end.
    pub hammer: Team,
    /// Remaining thinking time per team.
    pub thinking_time_remaining: TeamPair<Duration>,
    /// Per-end scores; `None` marks an end not yet decided.
    pub scores: TeamPair<Vec<Option<u8>>>,
    /// Stone positions on the sheet.
    pub stones: StoneCoordinate,
    /// Terminal result, once the match is over.
    pub game_result: Option<GameResult>,
}

impl GameState {
    /// Whether this state carries a terminal result.
    pub fn is_game_over(&self) -> bool {
        self.game_result.is_some()
    }
}
