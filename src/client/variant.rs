//! Rule-variant adapter: roster sizes, turn indexing, and the throw-order
//! constraints each variant imposes.

use crate::engine::{Gender, PlayerFactory};
use crate::error::ClientError;
use crate::protocol::GameRuleType;

/// Per-variant turn machinery, fixed at construction.
pub(crate) struct VariantAdapter {
    rule_type: GameRuleType,
    players: Vec<Box<dyn PlayerFactory>>,
    /// Engine-selected throw order: roster slot per throwing position.
    throw_order: Vec<u8>,
}

impl VariantAdapter {
    /// Validates the engine's throw order against the variant and wraps the
    /// roster.
    pub fn new(
        rule_type: GameRuleType,
        players: Vec<Box<dyn PlayerFactory>>,
        throw_order: Vec<u8>,
    ) -> Result<Self, ClientError> {
        let roster = Self::roster_size(rule_type);
        if throw_order.len() != roster {
            return Err(ClientError::config(format!(
                "number of players after engine init is not {roster}"
            )));
        }
        if let Some(slot) = throw_order.iter().find(|&&s| usize::from(s) >= players.len()) {
            return Err(ClientError::config(format!(
                "throw order names roster slot {slot}, but only {} players are configured",
                players.len()
            )));
        }

        if rule_type == GameRuleType::Mixed {
            let mut last_gender = Gender::Unknown;
            for (position, &slot) in throw_order.iter().enumerate() {
                let gender = players[usize::from(slot)].gender();
                if gender == last_gender {
                    return Err(ClientError::config(format!(
                        "consecutive throwers must alternate gender (position {position})"
                    )));
                }
                last_gender = gender;
            }
        }

        Ok(Self {
            rule_type,
            players,
            throw_order,
        })
    }

    /// Players per team for a variant.
    pub fn roster_size(rule_type: GameRuleType) -> usize {
        match rule_type {
            GameRuleType::Standard | GameRuleType::Mixed => 4,
            GameRuleType::MixedDoubles => 2,
        }
    }

    /// Throwing position consulted for a given shot counter.
    pub fn thrower_index(rule_type: GameRuleType, shot: u8) -> usize {
        match rule_type {
            GameRuleType::Standard | GameRuleType::Mixed => usize::from(shot / 2),
            GameRuleType::MixedDoubles => {
                if shot == 0 || shot == 4 {
                    0
                } else {
                    1
                }
            }
        }
    }

    /// The persona acting for a given shot counter.
    pub fn player_for_shot(&self, shot: u8) -> &dyn PlayerFactory {
        let position = Self::thrower_index(self.rule_type, shot);
        let slot = usize::from(self.throw_order[position]);
        self.players[slot].as_ref()
    }

    /// Roster slots in throw order, as submitted in the join payload.
    pub fn join_slot_order(&self) -> &[u8] {
        &self.throw_order
    }
}
