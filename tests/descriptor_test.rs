//! Tests for match descriptor parsing.

use std::time::Duration;

use hogline::{GameRuleType, MatchInfo, Team, TeamPair};

fn descriptor(game_mode: &str, applied_rule: i64) -> String {
    serde_json::json!({
        "match_name": "qualifier 1",
        "winner_team_id": null,
        "game_mode": game_mode,
        "applied_rule": applied_rule,
        "standard_end_count": 8,
        "time_limit": 600,
        "extra_end_time_limit": 180,
        "simulator": { "simulator_name": "fcv1" },
    })
    .to_string()
}

#[test]
fn standard_descriptor_maps_to_setting_and_rule() {
    let info = MatchInfo::from_json(&descriptor("standard", 0)).expect("parse");

    assert_eq!(info.rule.rule_type, GameRuleType::Standard);
    assert_eq!(info.setting.max_end, 8);
    assert_eq!(
        info.setting.thinking_time,
        TeamPair::new(Duration::from_millis(600_000), Duration::from_millis(600_000))
    );
    assert_eq!(
        info.setting.extra_end_thinking_time[Team::Team0],
        Duration::from_millis(180_000)
    );
    assert!(info.rule.free_guard_zone.is_some(), "applied_rule 0 enables the free guard zone");
    assert!(!info.rule.wheelchair);
}

#[test]
fn identical_bytes_yield_identical_descriptors() {
    let body = descriptor("mix_doubles", 2);
    assert_eq!(
        MatchInfo::from_json(&body).expect("first"),
        MatchInfo::from_json(&body).expect("second")
    );
}

#[test]
fn simulator_config_carries_the_named_simulator() {
    let info = MatchInfo::from_json(&descriptor("standard", 0)).expect("parse");
    assert_eq!(
        info.simulator.get("type").and_then(|v| v.as_str()),
        Some("fcv1")
    );
}

#[test]
fn finished_match_reports_its_winner() {
    let mut doc: serde_json::Value =
        serde_json::from_str(&descriptor("standard", 0)).expect("fixture");
    doc["winner_team_id"] = "team1".into();

    let info = MatchInfo::from_json(&doc.to_string()).expect("parse");
    assert_eq!(info.winner.as_deref(), Some("team1"));
}

#[test]
fn roster_size_follows_the_variant() {
    assert_eq!(
        MatchInfo::from_json(&descriptor("standard", 0))
            .expect("standard")
            .players
            .len(),
        4
    );
    assert_eq!(
        MatchInfo::from_json(&descriptor("mix_doubles", 0))
            .expect("mixed doubles")
            .players
            .len(),
        2
    );
}
