//! Per-match session state, owned exclusively by the consumer task.

use crate::game::{GameState, Shot, Team};

/// Mutable session record.
///
/// Single-writer: only the consumer task ever touches an instance once
/// streaming starts, so no locking is needed around it.
#[derive(Debug)]
pub(crate) struct SessionState {
    /// This client's team, assigned by `join`.
    pub team: Team,
    /// Hammer holder, rewritten only at the first shot of an end.
    pub hammer: Team,
    first_update_seen: bool,
    game_over_fired: bool,
    prestart: Vec<(GameState, Option<Shot>)>,
}

impl SessionState {
    /// Creates session state for an assigned team.
    pub fn new(team: Team) -> Self {
        Self {
            team,
            hammer: Team::Unassigned,
            first_update_seen: false,
            game_over_fired: false,
            prestart: Vec::new(),
        }
    }

    /// Records a pre-start state. A no-op once the first authoritative
    /// update has been seen.
    pub fn record_prestart(&mut self, state: GameState, last_shot: Option<Shot>) {
        if !self.first_update_seen {
            self.prestart.push((state, last_shot));
        }
    }

    /// Marks the first authoritative update as seen. Returns `true` exactly
    /// once, on the flip.
    pub fn mark_first_update(&mut self) -> bool {
        if self.first_update_seen {
            return false;
        }
        self.first_update_seen = true;
        true
    }

    /// Hands out the frozen pre-start history, leaving it empty.
    pub fn take_prestart(&mut self) -> Vec<(GameState, Option<Shot>)> {
        std::mem::take(&mut self.prestart)
    }

    /// Marks the terminal result as dispatched. Returns `true` exactly once.
    pub fn mark_game_over(&mut self) -> bool {
        if self.game_over_fired {
            return false;
        }
        self.game_over_fired = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{StoneCoordinate, TeamPair};
    use std::time::Duration;

    fn state() -> GameState {
        GameState {
            end: 0,
            shot: 0,
            hammer: Team::Unassigned,
            thinking_time_remaining: TeamPair::new(Duration::ZERO, Duration::ZERO),
            scores: TeamPair::new(vec![None], vec![None]),
            stones: StoneCoordinate::empty(),
            game_result: None,
        }
    }

    #[test]
    fn prestart_freezes_after_first_update() {
        let mut session = SessionState::new(Team::Team0);
        session.record_prestart(state(), None);
        session.record_prestart(state(), None);

        assert!(session.mark_first_update());
        assert!(!session.mark_first_update());

        session.record_prestart(state(), None);
        assert_eq!(session.take_prestart().len(), 2);
        assert!(session.take_prestart().is_empty());
    }

    #[test]
    fn game_over_fires_once() {
        let mut session = SessionState::new(Team::Team1);
        assert!(session.mark_game_over());
        assert!(!session.mark_game_over());
    }
}
