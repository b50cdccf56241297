//! Tests for wire-to-domain state reconstruction.

use hogline::{
    GameResultReason, GameRuleType, Position, StateUpdateFrame, Team, reconstruct_state_update,
};

fn frame(json: serde_json::Value) -> StateUpdateFrame {
    serde_json::from_value(json).expect("frame fixture")
}

#[test]
fn missing_shot_counter_is_an_end_setup_pseudo_event_under_mixed_doubles() {
    let f = frame(serde_json::json!({
        "end_number": 0,
        "first_team_remaining_time": 600.0,
        "second_team_remaining_time": 600.0,
        "score": { "team0": [], "team1": [] },
        "mix_doubles_settings": { "end_setup_team": "team1" },
    }));

    let mut hammer = Team::Unassigned;
    let event = reconstruct_state_update(&f, GameRuleType::MixedDoubles, 8, &mut hammer)
        .expect("pseudo-event");

    assert_eq!(event.total_shot_number, 0);
    assert_eq!(event.next_shot_team, Team::Unassigned);
    // The hammer comes from the explicit end-setup field, not from carry-over.
    assert_eq!(event.game_state.hammer, Team::Team1);
    assert_eq!(hammer, Team::Unassigned, "persisted hammer is untouched");
}

#[test]
fn mixed_doubles_swaps_the_preplaced_stone_slots() {
    let mut team0 = vec![serde_json::json!({ "x": 0.0, "y": 0.0 }); 8];
    team0[0] = serde_json::json!({ "x": 1.0, "y": 1.0 });
    team0[5] = serde_json::json!({ "x": 2.0, "y": 2.0 });
    let team1 = vec![serde_json::json!({ "x": 0.0, "y": 0.0 }); 8];

    let f = frame(serde_json::json!({
        "total_shot_number": 0,
        "next_shot_team": "team1",
        "end_number": 0,
        "first_team_remaining_time": 600.0,
        "second_team_remaining_time": 600.0,
        "score": { "team0": [], "team1": [] },
        "stone_coordinate": { "data": { "team0": team0, "team1": team1 } },
    }));

    let mut hammer = Team::Unassigned;
    let event = reconstruct_state_update(&f, GameRuleType::MixedDoubles, 8, &mut hammer)
        .expect("end start");

    let stones = &event.game_state.stones;
    assert_eq!(
        stones.stone(Team::Team0, 0).map(|s| s.position),
        Some(Position::new(2.0, 2.0))
    );
    assert_eq!(
        stones.stone(Team::Team0, 5).map(|s| s.position),
        Some(Position::new(1.0, 1.0))
    );
    assert!(stones.stone(Team::Team1, 0).is_none(), "origin means no stone");
}

#[test]
fn winner_with_opponent_time_left_wins_on_score() {
    let f = frame(serde_json::json!({
        "total_shot_number": 10,
        "next_shot_team": "team1",
        "end_number": 7,
        "first_team_remaining_time": 120.0,
        "second_team_remaining_time": 45.5,
        "score": { "team0": [1, 0, 2, 0, 1, 0, 3], "team1": [0, 2, 0, 1, 0, 2, 0] },
        "stone_coordinate": { "data": { "team0": [], "team1": [] } },
        "winner_team": "team0",
    }));

    let mut hammer = Team::Team0;
    let event =
        reconstruct_state_update(&f, GameRuleType::Standard, 8, &mut hammer).expect("terminal");

    let result = event.game_state.game_result.expect("terminal result");
    assert_eq!(result.winner, Team::Team0);
    assert_eq!(result.reason, GameResultReason::Score);
}

#[test]
fn winner_with_opponent_clock_exhausted_wins_on_time() {
    let f = frame(serde_json::json!({
        "total_shot_number": 10,
        "next_shot_team": "team1",
        "end_number": 7,
        "first_team_remaining_time": 120.0,
        "second_team_remaining_time": 0.0,
        "score": { "team0": [1, 0, 2, 0, 1, 0, 3], "team1": [0, 2, 0, 1, 0, 2, 0] },
        "stone_coordinate": { "data": { "team0": [], "team1": [] } },
        "winner_team": "team0",
    }));

    let mut hammer = Team::Team0;
    let event =
        reconstruct_state_update(&f, GameRuleType::Standard, 8, &mut hammer).expect("terminal");

    assert_eq!(
        event.game_state.game_result.expect("terminal result").reason,
        GameResultReason::TimeLimit
    );
}

#[test]
fn scores_at_or_beyond_the_current_end_stay_unknown() {
    let f = frame(serde_json::json!({
        "total_shot_number": 5,
        "next_shot_team": "team0",
        "end_number": 3,
        "first_team_remaining_time": 400.0,
        "second_team_remaining_time": 380.0,
        "score": { "team0": [2, 0, 1, 0, 0], "team1": [0, 3, 0, 0, 0] },
        "stone_coordinate": { "data": { "team0": [], "team1": [] } },
    }));

    let mut hammer = Team::Team1;
    let event =
        reconstruct_state_update(&f, GameRuleType::Standard, 8, &mut hammer).expect("mid-end");

    let scores = &event.game_state.scores;
    assert_eq!(scores[Team::Team0].len(), 9, "max_end + 1 entries");
    assert_eq!(scores[Team::Team0][..3], [Some(2), Some(0), Some(1)]);
    assert_eq!(scores[Team::Team1][..3], [Some(0), Some(3), Some(0)]);
    // The payload carries zeros for unplayed ends; the state must not.
    assert!(scores[Team::Team0][3..].iter().all(Option::is_none));
    assert!(scores[Team::Team1][3..].iter().all(Option::is_none));
}

#[test]
fn hammer_persists_through_an_end() {
    let start = frame(serde_json::json!({
        "total_shot_number": 0,
        "next_shot_team": "team1",
        "end_number": 2,
        "first_team_remaining_time": 500.0,
        "second_team_remaining_time": 500.0,
        "score": { "team0": [1, 0], "team1": [0, 2] },
    }));

    let mut hammer = Team::Unassigned;
    let event =
        reconstruct_state_update(&start, GameRuleType::Standard, 8, &mut hammer).expect("end start");
    assert_eq!(event.game_state.hammer, Team::Team0, "other team holds hammer");
    assert_eq!(hammer, Team::Team0);

    // Mid-end events omit every hammer-determining field.
    for shot in 1..=6 {
        let mid = frame(serde_json::json!({
            "total_shot_number": shot,
            "next_shot_team": if shot % 2 == 0 { "team1" } else { "team0" },
            "end_number": 2,
            "first_team_remaining_time": 480.0,
            "second_team_remaining_time": 470.0,
            "score": { "team0": [1, 0], "team1": [0, 2] },
            "stone_coordinate": { "data": { "team0": [], "team1": [] } },
        }));
        let event = reconstruct_state_update(&mid, GameRuleType::Standard, 8, &mut hammer)
            .expect("mid-end");
        assert_eq!(event.game_state.hammer, Team::Team0);
    }

    // The next end start may move it.
    let next = frame(serde_json::json!({
        "total_shot_number": 0,
        "next_shot_team": "team0",
        "end_number": 3,
        "first_team_remaining_time": 450.0,
        "second_team_remaining_time": 440.0,
        "score": { "team0": [1, 0, 0], "team1": [0, 2, 1] },
    }));
    let event =
        reconstruct_state_update(&next, GameRuleType::Standard, 8, &mut hammer).expect("end start");
    assert_eq!(event.game_state.hammer, Team::Team1);
}

#[test]
fn last_move_becomes_the_last_shot() {
    let f = frame(serde_json::json!({
        "total_shot_number": 4,
        "next_shot_team": "team0",
        "end_number": 0,
        "first_team_remaining_time": 500.0,
        "second_team_remaining_time": 500.0,
        "score": { "team0": [], "team1": [] },
        "last_move": {
            "translational_velocity": 2.2,
            "angular_velocity": -1.5,
            "shot_angle": 0.03,
        },
        "stone_coordinate": { "data": { "team0": [], "team1": [] } },
    }));

    let mut hammer = Team::Team1;
    let event =
        reconstruct_state_update(&f, GameRuleType::Standard, 8, &mut hammer).expect("mid-end");

    let shot = event.last_shot.expect("last shot");
    assert_eq!(shot.translational_velocity, 2.2);
    assert_eq!(shot.angular_velocity, -1.5);
    assert_eq!(shot.release_angle, 0.03);
}
