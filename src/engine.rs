//! Contracts between the client and its collaborators: the thinking engine,
//! and the simulator/player factories it is initialized with.
//!
//! The client never looks inside these; it resolves opaque configuration
//! blobs through a [`FactoryCreator`] and forwards the results to the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::game::{GameState, Move, Shot, Stone, Team};
use crate::protocol::{GameRule, GameRuleType, GameSetting};

/// Gender of a player persona, used by the mixed-rule throw-order check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male player.
    Male,
    /// Female player.
    Female,
    /// Not declared by the configuration.
    Unknown,
}

/// Pre-placed stone choices of the mixed-doubles end-setup sub-protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionedStone {
    /// Guard on the center line.
    CenterGuard,
    /// Stone in the house on the center line.
    CenterHouse,
    /// Power play, left side.
    PowerPlayLeft,
    /// Power play, right side.
    PowerPlayRight,
}

impl PositionedStone {
    /// Wire name used by the end-setup endpoint.
    pub fn request_name(self) -> &'static str {
        match self {
            PositionedStone::CenterGuard => "center_guard",
            PositionedStone::CenterHouse => "center_house",
            PositionedStone::PowerPlayLeft => "pp_left",
            PositionedStone::PowerPlayRight => "pp_right",
        }
    }
}

/// A player persona: applies a configured behavior model to an intended shot.
pub trait Player: Send {
    /// Perturbs an intended shot the way this persona would deliver it.
    fn play(&mut self, shot: Shot) -> Shot;
}

/// Creates [`Player`] instances from one roster slot's configuration.
pub trait PlayerFactory: Send {
    /// Declared gender of the persona.
    fn gender(&self) -> Gender;

    /// Creates a fresh player instance.
    fn create_player(&self) -> Box<dyn Player>;
}

/// A physics simulator instance. Black box to the client; engines drive it.
pub trait Simulator: Send {
    /// Advances the simulation one frame.
    fn step(&mut self);

    /// Current state of all sixteen stone slots.
    fn stones(&self) -> [Option<Stone>; 16];

    /// Overwrites the state of all sixteen stone slots.
    fn set_stones(&mut self, stones: [Option<Stone>; 16]);

    /// Whether every stone has come to rest.
    fn all_stones_stopped(&self) -> bool;
}

/// Creates [`Simulator`] instances from the match's simulator configuration.
pub trait SimulatorFactory: Send {
    /// Creates a fresh simulator instance.
    fn create_simulator(&self) -> Box<dyn Simulator>;
}

/// Resolves opaque configuration blobs into factory instances.
///
/// Stands in for a plugin registry: the match descriptor only names
/// configurations, and this trait turns them into live factories.
pub trait FactoryCreator: Send {
    /// Resolves one roster slot's player configuration.
    fn create_player_factory(
        &self,
        config: &serde_json::Value,
    ) -> Result<Box<dyn PlayerFactory>, ClientError>;

    /// Resolves the simulator configuration.
    fn create_simulator_factory(
        &self,
        config: &serde_json::Value,
    ) -> Result<Box<dyn SimulatorFactory>, ClientError>;
}

/// A decision engine driven by the client.
///
/// Engines declare the rule variants they can play via [`supports`]
/// (a capability set, checked once at construction) and receive the match
/// lifecycle as callbacks from the consumer task.
///
/// [`supports`]: ThinkingEngine::supports
#[async_trait]
pub trait ThinkingEngine: Send {
    /// Engine name, for logs and the join payload.
    fn name(&self) -> &str;

    /// Whether this engine can play the given rule variant.
    fn supports(&self, rule_type: GameRuleType) -> bool;

    /// Initializes the engine with the match configuration.
    ///
    /// Returns the throw order: for each throwing position, the roster slot
    /// of the persona that acts there. Its length must match the variant's
    /// roster size.
    fn on_init(
        &mut self,
        rule: &GameRule,
        setting: &GameSetting,
        simulator: Box<dyn SimulatorFactory>,
        players: &[Box<dyn PlayerFactory>],
    ) -> Result<Vec<u8>, ClientError>;

    /// The match is starting. `history` holds every state observed before
    /// the first authoritative update; it is delivered exactly once.
    async fn on_game_start(&mut self, team: Team, history: Vec<(GameState, Option<Shot>)>);

    /// A new end is starting.
    async fn on_next_end(&mut self, state: &GameState);

    /// It is this team's turn; return the action to take.
    async fn on_my_turn(
        &mut self,
        player: &dyn PlayerFactory,
        state: &GameState,
        last_shot: Option<&Shot>,
    ) -> Move;

    /// The opposing team is throwing.
    async fn on_opponent_turn(&mut self, state: &GameState, last_shot: Option<&Shot>);

    /// The match is over.
    async fn on_game_over(&mut self, state: &GameState);

    /// Mixed-doubles only: choose the pre-placed stone for an end this team
    /// has hammer in. Engines that declare mixed-doubles support should
    /// override the default.
    async fn decide_positioned_stone(&mut self, state: &GameState) -> PositionedStone {
        let _ = state;
        PositionedStone::CenterGuard
    }
}
