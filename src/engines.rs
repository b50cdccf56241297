//! Illustrative engine and factory implementations.
//!
//! These are example callers of the client, not competitive strategies: a
//! draw-weight engine that always plays the same line, and a factory creator
//! that resolves the normal-dist configuration blocks the descriptor
//! synthesizes.

use async_trait::async_trait;
use derive_getters::Getters;
use tracing::{debug, info};

use crate::engine::{
    FactoryCreator, Gender, Player, PlayerFactory, PositionedStone, Simulator, SimulatorFactory,
    ThinkingEngine,
};
use crate::error::ClientError;
use crate::game::{GameState, Move, Shot, Stone, Team};
use crate::protocol::{GameRule, GameRuleType, GameSetting};

/// An engine that plays draw weight onto the button every turn, alternating
/// curl with the shot parity.
#[derive(Debug, Default)]
pub struct DrawEngine {
    team: Option<Team>,
}

impl DrawEngine {
    /// Creates the engine.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThinkingEngine for DrawEngine {
    fn name(&self) -> &str {
        "draw"
    }

    fn supports(&self, _rule_type: GameRuleType) -> bool {
        true
    }

    fn on_init(
        &mut self,
        rule: &GameRule,
        _setting: &GameSetting,
        _simulator: Box<dyn SimulatorFactory>,
        players: &[Box<dyn PlayerFactory>],
    ) -> Result<Vec<u8>, ClientError> {
        debug!(rule = %rule.rule_type, roster = players.len(), "draw engine initialized");
        Ok((0..players.len() as u8).collect())
    }

    async fn on_game_start(&mut self, team: Team, history: Vec<(GameState, Option<Shot>)>) {
        info!(team = %team, observed = history.len(), "game starting");
        self.team = Some(team);
    }

    async fn on_next_end(&mut self, state: &GameState) {
        debug!(end = state.end, "next end");
    }

    async fn on_my_turn(
        &mut self,
        _player: &dyn PlayerFactory,
        state: &GameState,
        _last_shot: Option<&Shot>,
    ) -> Move {
        let spin = if state.shot % 2 == 0 { 1.57 } else { -1.57 };
        Move::Shot(Shot::new(2.4, spin, 0.0))
    }

    async fn on_opponent_turn(&mut self, state: &GameState, _last_shot: Option<&Shot>) {
        debug!(end = state.end, shot = state.shot, "opponent threw");
    }

    async fn on_game_over(&mut self, state: &GameState) {
        if let Some(result) = &state.game_result {
            info!(winner = %result.winner, reason = ?result.reason, "game over");
        }
    }

    async fn decide_positioned_stone(&mut self, _state: &GameState) -> PositionedStone {
        PositionedStone::CenterHouse
    }
}

/// Player persona backed by a normal-dist configuration block.
#[derive(Debug, Clone, Getters)]
pub struct NormalDistPlayerFactory {
    /// Fastest delivery the persona can throw, in m/s.
    max_speed: f64,
    /// Speed deviation of the behavior model.
    stddev_speed: f64,
    /// Angle deviation of the behavior model.
    stddev_angle: f64,
    /// Declared gender of the persona.
    gender: Gender,
}

impl PlayerFactory for NormalDistPlayerFactory {
    fn gender(&self) -> Gender {
        self.gender
    }

    fn create_player(&self) -> Box<dyn Player> {
        Box::new(NormalDistPlayer {
            max_speed: self.max_speed as f32,
        })
    }
}

struct NormalDistPlayer {
    max_speed: f32,
}

impl Player for NormalDistPlayer {
    fn play(&mut self, shot: Shot) -> Shot {
        Shot::new(
            shot.translational_velocity.min(self.max_speed),
            shot.angular_velocity,
            shot.release_angle,
        )
    }
}

/// Resolves the `normal_dist` player blocks and accepts any simulator
/// configuration with an inert stand-in.
#[derive(Debug, Default)]
pub struct NormalDistFactoryCreator;

impl FactoryCreator for NormalDistFactoryCreator {
    fn create_player_factory(
        &self,
        config: &serde_json::Value,
    ) -> Result<Box<dyn PlayerFactory>, ClientError> {
        let kind = config
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("normal_dist");
        if kind != "normal_dist" {
            return Err(ClientError::config(format!("unknown player type: {kind}")));
        }

        let gender = match config.get("gender").and_then(serde_json::Value::as_str) {
            Some("male") => Gender::Male,
            Some("female") => Gender::Female,
            _ => Gender::Unknown,
        };

        Ok(Box::new(NormalDistPlayerFactory {
            max_speed: config_f64(config, "max_speed")?,
            stddev_speed: config_f64(config, "stddev_speed")?,
            stddev_angle: config_f64(config, "stddev_angle")?,
            gender,
        }))
    }

    fn create_simulator_factory(
        &self,
        config: &serde_json::Value,
    ) -> Result<Box<dyn SimulatorFactory>, ClientError> {
        let kind = config
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        Ok(Box::new(InertSimulatorFactory { kind }))
    }
}

struct InertSimulatorFactory {
    kind: String,
}

impl SimulatorFactory for InertSimulatorFactory {
    fn create_simulator(&self) -> Box<dyn Simulator> {
        debug!(simulator = %self.kind, "creating inert simulator");
        Box::new(InertSimulator {
            stones: [None; 16],
        })
    }
}

/// Stand-in simulator: stones never move.
struct InertSimulator {
    stones: [Option<Stone>; 16],
}

impl Simulator for InertSimulator {
    fn step(&mut self) {}

    fn stones(&self) -> [Option<Stone>; 16] {
        self.stones
    }

    fn set_stones(&mut self, stones: [Option<Stone>; 16]) {
        self.stones = stones;
    }

    fn all_stones_stopped(&self) -> bool {
        true
    }
}

fn config_f64(config: &serde_json::Value, key: &str) -> Result<f64, ClientError> {
    config
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| ClientError::config(format!("player configuration is missing {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn player_factory_resolves_normal_dist_blocks() {
        let creator = NormalDistFactoryCreator;
        let factory = creator
            .create_player_factory(&json!({
                "type": "normal_dist",
                "max_speed": 3.0,
                "stddev_speed": 0.025,
                "stddev_angle": 0.0025,
                "gender": "female",
            }))
            .expect("factory");
        assert_eq!(factory.gender(), Gender::Female);
    }

    #[test]
    fn unknown_player_type_is_rejected() {
        let creator = NormalDistFactoryCreator;
        let err = creator
            .create_player_factory(&json!({ "type": "telekinetic", "max_speed": 1.0 }))
            .err()
            .expect("unknown type");
        assert!(matches!(err, ClientError::Configuration { .. }));
    }

    #[test]
    fn personas_clamp_delivery_speed() {
        let creator = NormalDistFactoryCreator;
        let factory = creator
            .create_player_factory(&json!({
                "max_speed": 3.0,
                "stddev_speed": 0.025,
                "stddev_angle": 0.0025,
            }))
            .expect("factory");
        let mut player = factory.create_player();
        let delivered = player.play(Shot::new(9.9, 1.0, 0.0));
        assert_eq!(delivered.translational_velocity, 3.0);
    }
}
