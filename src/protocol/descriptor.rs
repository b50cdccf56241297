//! Match descriptor: rules, settings, and factory configuration.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;

use crate::error::ClientError;
use crate::game::TeamPair;

/// Rule variant of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameRuleType {
    /// Four-player teams, standard rotation.
    Standard,
    /// Four-player teams alternating gender through the throw order.
    Mixed,
    /// Two-player teams with pre-placed stones and an end-setup sub-protocol.
    MixedDoubles,
}

impl fmt::Display for GameRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameRuleType::Standard => "standard",
            GameRuleType::Mixed => "mixed",
            GameRuleType::MixedDoubles => "mixed doubles",
        };
        write!(f, "{name}")
    }
}

/// Free-guard-zone rule, optionally with an explicit zone extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeGuardZoneRule {
    /// Number of shots the zone protects, when the rule set overrides the
    /// default.
    pub zone_extent: Option<u8>,
}

/// Rules a match is played under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRule {
    /// Rule variant.
    pub rule_type: GameRuleType,
    /// Whether wheelchair rules apply.
    pub wheelchair: bool,
    /// Free-guard-zone rule, if in force.
    pub free_guard_zone: Option<FreeGuardZoneRule>,
    /// Whether the no-tick-shot rule is in force.
    pub no_tick_shot: bool,
}

/// Timing and length settings of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetting {
    /// Number of regular ends.
    pub max_end: u8,
    /// Thinking-time budget per team for regular ends.
    pub thinking_time: TeamPair<Duration>,
    /// Thinking-time budget per team for an extra end.
    pub extra_end_thinking_time: TeamPair<Duration>,
}

/// The match descriptor fetched once from `/matches/{id}`.
///
/// The server's per-player configuration is replaced with the variant's
/// normal-dist defaults; the entries are opaque blobs handed to the caller's
/// factory creator.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchInfo {
    /// Display name of the match.
    pub name: String,
    /// Winner id, when the match already finished.
    pub winner: Option<String>,
    /// Rules in force.
    pub rule: GameRule,
    /// Length and timing settings.
    pub setting: GameSetting,
    /// Opaque simulator configuration.
    pub simulator: serde_json::Value,
    /// Opaque per-slot player configurations, one per roster slot.
    pub players: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DescriptorWire {
    match_name: String,
    #[serde(default)]
    winner_team_id: Option<String>,
    game_mode: String,
    applied_rule: i64,
    standard_end_count: u8,
    time_limit: u64,
    extra_end_time_limit: u64,
    simulator: SimulatorWire,
}

#[derive(Debug, Deserialize)]
struct SimulatorWire {
    simulator_name: String,
}

impl MatchInfo {
    /// Parses a descriptor document. Identical bytes yield an identical
    /// descriptor.
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        let wire: DescriptorWire = serde_json::from_str(body)?;

        let rule_type = match wire.game_mode.as_str() {
            "standard" => GameRuleType::Standard,
            "mixed" => GameRuleType::Mixed,
            "mix_doubles" => GameRuleType::MixedDoubles,
            other => {
                return Err(ClientError::parse(format!("unsupported game_mode: {other}")));
            }
        };

        let (free_guard_zone, no_tick_shot) = match wire.applied_rule {
            0 => (Some(FreeGuardZoneRule { zone_extent: None }), false),
            1 => (None, true),
            2 => (Some(FreeGuardZoneRule { zone_extent: Some(3) }), false),
            other => {
                return Err(ClientError::parse(format!(
                    "unsupported applied_rule: {other}"
                )));
            }
        };

        let thinking_time = Duration::from_millis(wire.time_limit * 1000);
        let extra_end_thinking_time = Duration::from_millis(wire.extra_end_time_limit * 1000);

        Ok(Self {
            name: wire.match_name,
            winner: wire.winner_team_id,
            rule: GameRule {
                rule_type,
                wheelchair: false,
                free_guard_zone,
                no_tick_shot,
            },
            setting: GameSetting {
                max_end: wire.standard_end_count,
                thinking_time: TeamPair::new(thinking_time, thinking_time),
                extra_end_thinking_time: TeamPair::new(
                    extra_end_thinking_time,
                    extra_end_thinking_time,
                ),
            },
            simulator: json!({
                "type": wire.simulator.simulator_name,
                "seconds_per_frame": 0.001,
            }),
            players: default_players(rule_type),
        })
    }
}

/// Default normal-dist player configurations per variant.
fn default_players(rule_type: GameRuleType) -> Vec<serde_json::Value> {
    let male = json!({
        "type": "normal_dist",
        "max_speed": 4.0,
        "stddev_speed": 0.0076,
        "stddev_angle": 0.0018,
        "gender": "male",
    });
    let female = json!({
        "type": "normal_dist",
        "max_speed": 3.0,
        "stddev_speed": 0.025,
        "stddev_angle": 0.0025,
        "gender": "female",
    });

    match rule_type {
        GameRuleType::Standard => vec![male.clone(), male.clone(), male.clone(), male],
        // Throw order must alternate gender, so the default roster does too.
        GameRuleType::Mixed => vec![male.clone(), female.clone(), male, female],
        GameRuleType::MixedDoubles => vec![
            json!({
                "type": "normal_dist",
                "max_speed": 4.0,
                "stddev_speed": 0.08,
                "stddev_angle": 0.006,
                "gender": "male",
            }),
            female,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_descriptor() -> String {
        serde_json::json!({
            "match_name": "round robin 3",
            "winner_team_id": null,
            "game_mode": "standard",
            "applied_rule": 0,
            "standard_end_count": 8,
            "time_limit": 600,
            "extra_end_time_limit": 120,
            "simulator": { "simulator_name": "fcv1" },
        })
        .to_string()
    }

    #[test]
    fn standard_descriptor_parses() {
        let info = MatchInfo::from_json(&standard_descriptor()).expect("parse descriptor");

        assert_eq!(info.rule.rule_type, GameRuleType::Standard);
        assert_eq!(info.setting.max_end, 8);
        assert_eq!(
            info.setting.thinking_time.team0,
            Duration::from_millis(600_000)
        );
        assert_eq!(
            info.setting.thinking_time.team1,
            Duration::from_millis(600_000)
        );
        assert!(info.rule.free_guard_zone.is_some());
        assert!(!info.rule.no_tick_shot);
        assert_eq!(info.players.len(), 4);
    }

    #[test]
    fn parsing_is_deterministic() {
        let body = standard_descriptor();
        let first = MatchInfo::from_json(&body).expect("first parse");
        let second = MatchInfo::from_json(&body).expect("second parse");
        assert_eq!(first, second);
    }

    #[test]
    fn applied_rule_variants() {
        let mut doc: serde_json::Value = serde_json::from_str(&standard_descriptor()).unwrap();

        doc["applied_rule"] = 1.into();
        let info = MatchInfo::from_json(&doc.to_string()).expect("no-tick rule");
        assert!(info.rule.no_tick_shot);
        assert!(info.rule.free_guard_zone.is_none());

        doc["applied_rule"] = 2.into();
        let info = MatchInfo::from_json(&doc.to_string()).expect("extended zone");
        assert_eq!(info.rule.free_guard_zone.unwrap().zone_extent, Some(3));

        doc["applied_rule"] = 9.into();
        assert!(MatchInfo::from_json(&doc.to_string()).is_err());
    }

    #[test]
    fn mixed_doubles_roster_has_two_slots() {
        let mut doc: serde_json::Value = serde_json::from_str(&standard_descriptor()).unwrap();
        doc["game_mode"] = "mix_doubles".into();

        let info = MatchInfo::from_json(&doc.to_string()).expect("mixed doubles descriptor");
        assert_eq!(info.rule.rule_type, GameRuleType::MixedDoubles);
        assert_eq!(info.players.len(), 2);
    }

    #[test]
    fn unknown_game_mode_is_rejected() {
        let mut doc: serde_json::Value = serde_json::from_str(&standard_descriptor()).unwrap();
        doc["game_mode"] = "bonspiel".into();
        assert!(MatchInfo::from_json(&doc.to_string()).is_err());
    }
}
