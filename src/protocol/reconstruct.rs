//! Wire-to-domain reconstruction of stream events.
//!
//! The wire format is incremental: hammer, stone positions, and the shot
//! counter are only self-describing on the first event of an end, and the
//! rest of the end leans on state the session already holds. Reconstruction
//! is a pure transformation over the decoded frame plus those persisted
//! fields.

use std::time::Duration;

use crate::error::ClientError;
use crate::game::{
    GameResult, GameResultReason, GameState, STONES_PER_TEAM, Shot, Stone, StoneCoordinate, Team,
    TeamPair,
};
use crate::protocol::{GameRuleType, StateUpdateFrame};

/// One decoded and reconstructed stream event.
///
/// Ephemeral: built for a single dispatch cycle and never persisted.
#[derive(Debug, Clone)]
pub struct StateUpdateEventData {
    /// Shot counter within the end; 0 for end starts and end-setup events.
    pub total_shot_number: u32,
    /// Team throwing next, or [`Team::Unassigned`] on a mixed-doubles
    /// end-setup pseudo-event.
    pub next_shot_team: Team,
    /// Reconstructed match state.
    pub game_state: GameState,
    /// The previous shot, when one was delivered.
    pub last_shot: Option<Shot>,
}

/// Reconstructs a [`StateUpdateEventData`] from a decoded frame.
///
/// `hammer` is the session's persisted hammer holder: it is read mid-end
/// (the wire omits the hammer there) and rewritten at the first shot of an
/// end when the frame names the next-shot team.
pub fn reconstruct_state_update(
    frame: &StateUpdateFrame,
    rule_type: GameRuleType,
    max_end: u8,
    hammer: &mut Team,
) -> Result<StateUpdateEventData, ClientError> {
    let (total_shot, next_shot_team) = match frame.total_shot_number {
        Some(n) => {
            let n = u32::try_from(n)
                .map_err(|_| ClientError::parse(format!("negative total_shot_number: {n}")))?;
            let next = frame
                .next_shot_team
                .ok_or_else(|| ClientError::parse("next_shot_team is required"))?;
            (n, next)
        }
        // An absent shot counter is the mixed-doubles end-setup pseudo-event.
        None if rule_type == GameRuleType::MixedDoubles => (0, Team::Unassigned),
        None => {
            return Err(ClientError::parse(
                "total_shot_number is required for non-mixed-doubles game mode",
            ));
        }
    };

    let end = frame.end_number.min(max_end);
    let thinking_time_remaining = TeamPair::new(
        seconds_to_duration(frame.first_team_remaining_time),
        seconds_to_duration(frame.second_team_remaining_time),
    );

    let mut scores = TeamPair::new(
        vec![None; usize::from(max_end) + 1],
        vec![None; usize::from(max_end) + 1],
    );
    for team in [Team::Team0, Team::Team1] {
        for e in 0..usize::from(end) {
            let value = frame.score[team].get(e).copied().ok_or_else(|| {
                ClientError::parse(format!("score array for {team} is missing end {e}"))
            })?;
            scores[team][e] = Some(value);
        }
    }

    let (shot, state_hammer) = if total_shot == 0 {
        if next_shot_team.is_assigned() {
            *hammer = next_shot_team.opponent();
            (0, *hammer)
        } else {
            let settings = frame.mix_doubles_settings.as_ref().ok_or_else(|| {
                ClientError::parse("mix_doubles_settings.end_setup_team is required")
            })?;
            (0, settings.end_setup_team)
        }
    } else {
        let shot = u8::try_from(total_shot - 1)
            .map_err(|_| ClientError::parse(format!("total_shot_number out of range: {total_shot}")))?;
        (shot, *hammer)
    };

    let last_shot = frame
        .last_move
        .map(|m| Shot::new(m.translational_velocity, m.angular_velocity, m.shot_angle));

    let mut stones = StoneCoordinate::empty();
    let stones_meaningful = total_shot != 0
        || (rule_type == GameRuleType::MixedDoubles && next_shot_team.is_assigned());
    if stones_meaningful {
        let coordinate = frame
            .stone_coordinate
            .as_ref()
            .ok_or_else(|| ClientError::parse("stone_coordinate is required"))?;
        for team in [Team::Team0, Team::Team1] {
            for (i, position) in coordinate.data[team]
                .iter()
                .take(STONES_PER_TEAM)
                .enumerate()
            {
                if !position.is_origin() {
                    stones.set(team, i, Some(Stone::new(*position, 0.0)));
                }
            }
        }
        if rule_type == GameRuleType::MixedDoubles {
            stones.swap_lead_slots();
        }
    }

    let game_result = match frame.winner_team {
        Some(winner) if winner.is_assigned() => {
            let reason = if thinking_time_remaining[winner.opponent()] > Duration::ZERO {
                GameResultReason::Score
            } else {
                GameResultReason::TimeLimit
            };
            Some(GameResult { winner, reason })
        }
        Some(_) => {
            return Err(ClientError::parse("winner_team names an invalid team"));
        }
        None => None,
    };

    Ok(StateUpdateEventData {
        total_shot_number: total_shot,
        next_shot_team,
        game_state: GameState {
            end,
            shot,
            hammer: state_hammer,
            thinking_time_remaining,
            scores,
            stones,
            game_result,
        },
        last_shot,
    })
}

fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::from_millis((seconds * 1000.0) as u64)
}
