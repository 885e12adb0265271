//! Whole-session flows through the engine, including snapshot and restore.

use money_wisdom_core::{
    command::PlayerCommand,
    engine::GameEngine,
    error::GameError,
    event::GameEvent,
    session::PlayerProfile,
    snapshot::{SessionSnapshot, SNAPSHOT_VERSION},
};

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

fn started() -> GameEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut engine = GameEngine::standard().unwrap();
    engine.start_session(PlayerProfile {
        name:          "Ada".into(),
        age:           31,
        annual_income: 72_000,
    });
    engine
}

fn kinds(events: &[GameEvent]) -> Vec<&'static str> {
    events.iter().map(GameEvent::kind).collect()
}

#[test]
fn full_playthrough_completes_on_exhaustion() {
    let mut engine = started();
    let total = engine.catalog().len();

    for _ in 0..total {
        engine.choose(2).unwrap();
        engine.next_scenario();
    }

    assert!(engine.state().is_complete);
    assert!(engine.current_scenario().is_none());
    assert_eq!(engine.state().decisions.len(), total);
    assert_eq!(engine.state().current_scenario_index, total);

    let summary = engine.summary();
    assert_eq!(summary.player.name, "Ada");
    assert!(summary.achievements.iter().any(|a| a.id == "journey_complete"));
    assert!(summary.achievements.iter().any(|a| a.id == "halfway_there"));
    assert!(summary.achievements.iter().any(|a| a.id == "financial_guru"));

    let events = engine.drain_events();
    assert_eq!(events.first().map(GameEvent::kind), Some("session_started"));
    assert_eq!(events.last().map(GameEvent::kind), Some("session_completed"));
    assert!(engine.drain_events().is_empty());
}

#[test]
fn draining_each_turn_keeps_the_journal_per_turn() {
    let mut engine = started();
    assert_eq!(kinds(&engine.drain_events()), vec!["session_started"]);

    let total = engine.catalog().len();
    let mut seen = 0;
    for turn in 0..total {
        engine.choose(0).unwrap();
        engine.next_scenario();
        let events = engine.drain_events();
        assert_eq!(events.first().map(GameEvent::kind), Some("choice_made"), "turn {turn}");
        assert!(events.len() <= 2 + 13 + 1, "turn {turn}: {} events", events.len());
        seen += events.len();
    }
    assert!(seen >= 2 * total);
    assert!(engine.drain_events().is_empty());
}

#[test]
fn choose_after_exhaustion_fails() {
    let mut engine = started();
    for _ in 0..engine.catalog().len() {
        engine.next_scenario();
    }
    assert!(matches!(engine.choose(0), Err(GameError::NoCurrentScenario)));
}

#[test]
fn next_scenario_completes_only_once() {
    let mut engine = started();
    for _ in 0..engine.catalog().len() + 3 {
        engine.next_scenario();
    }
    let completions = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::SessionCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn revise_reaches_any_scenario() {
    let mut engine = started();
    engine.choose(0).unwrap();

    let recorded = engine.revise("dinner-pasta", 2).unwrap();
    assert!(recorded.replaced.is_some());
    assert_eq!(engine.state().decisions.len(), 1);

    let ahead = engine.revise("phone-upgrade", 1).unwrap();
    assert!(ahead.replaced.is_none());
    assert_eq!(engine.state().decisions.len(), 2);

    let recomputed = engine.state().recomputed_totals();
    assert!(approx(engine.state().total_nominal_savings, recomputed.nominal, 1e-6));
}

#[test]
fn revise_unknown_scenario_fails() {
    let mut engine = started();
    match engine.revise("space-travel", 0) {
        Err(GameError::UnknownScenario { scenario_id }) => assert_eq!(scenario_id, "space-travel"),
        other => panic!("expected UnknownScenario, got {other:?}"),
    }
    assert!(engine.state().decisions.is_empty());
}

#[test]
fn choice_events_carry_running_totals() {
    let mut engine = started();
    engine.drain_events();

    engine.choose(1).unwrap();
    engine.choose(2).unwrap();

    let events = engine.drain_events();
    assert_eq!(kinds(&events), vec!["choice_made", "choice_made"]);
    match &events[1] {
        GameEvent::ChoiceMade { replaced, total_nominal_savings, .. } => {
            assert!(replaced.is_some());
            assert!(approx(*total_nominal_savings, engine.state().total_nominal_savings, 1e-9));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn progress_tracks_cursor_and_totals() {
    let mut engine = started();
    engine.choose(1).unwrap();
    engine.next_scenario();

    let progress = engine.progress();
    assert_eq!(progress.current, 2);
    assert_eq!(progress.total, 9);
    assert_eq!(progress.decisions_count, 1);
    assert!(approx(progress.total_savings, 912.5 * 30.0, 1e-6));
    assert!(!progress.is_complete);
}

#[test]
fn reset_returns_to_start() {
    let mut engine = started();
    engine.choose(0).unwrap();
    engine.next_scenario();
    engine.reset();

    assert_eq!(engine.cursor().index(), 0);
    assert!(engine.state().decisions.is_empty());
    assert_eq!(engine.state().player, engine.config().default_player);
    assert_eq!(engine.drain_events().last().map(GameEvent::kind), Some("session_reset"));
}

#[test]
fn commands_drive_the_engine() {
    let mut engine = GameEngine::standard().unwrap();
    let script = r#"[
        {"cmd": "start", "shuffle_seed": 99},
        {"cmd": "choose", "choice_index": 2},
        {"cmd": "next"}
    ]"#;
    let commands: Vec<PlayerCommand> = serde_json::from_str(script).unwrap();
    for command in commands {
        engine.submit_command(command).unwrap();
    }

    assert_eq!(engine.state().shuffle_seed, Some(99));
    assert_eq!(engine.state().player.name, "Player");
    assert_eq!(engine.state().decisions.len(), 1);
    assert_eq!(engine.cursor().index(), 1);

    let first = engine.state().decisions[0].scenario_id.clone();
    engine
        .submit_command(PlayerCommand::Revise { scenario_id: first, choice_index: 0 })
        .unwrap();
    assert_eq!(engine.state().decisions.len(), 1);

    let bad = engine.submit_command(PlayerCommand::Choose { choice_index: 7 });
    assert!(matches!(bad, Err(GameError::InvalidChoiceIndex { .. })));
    assert_eq!(engine.state().decisions.len(), 1);
}

#[test]
fn snapshot_restores_position_and_totals() {
    let mut engine = started();
    engine.choose(1).unwrap();
    engine.next_scenario();
    engine.choose(0).unwrap();
    engine.next_scenario();

    let json = engine.snapshot().to_json().unwrap();
    let snapshot = SessionSnapshot::from_json(&json).unwrap();
    assert_eq!(snapshot.version, SNAPSHOT_VERSION);

    let mut restored = GameEngine::standard().unwrap();
    restored.restore(snapshot);

    assert!(restored.drain_events().is_empty(), "restore emits nothing");
    assert_eq!(restored.cursor().index(), 2);
    assert_eq!(restored.current_scenario().unwrap().id, engine.current_scenario().unwrap().id);
    assert_eq!(restored.state().decisions.len(), 2);
    assert_eq!(restored.state().decisions[0].id, engine.state().decisions[0].id);
    assert!(approx(
        restored.state().total_invested_savings,
        engine.state().total_invested_savings,
        1e-6
    ));
}

#[test]
fn shuffled_session_restores_same_order() {
    let mut engine = GameEngine::standard().unwrap();
    engine.start_shuffled_session(PlayerProfile::default(), 0xFEED);
    engine.next_scenario();
    engine.next_scenario();
    let here = engine.current_scenario().unwrap().id.clone();

    let mut restored = GameEngine::standard().unwrap();
    restored.restore(engine.snapshot());
    assert_eq!(restored.current_scenario().unwrap().id, here);

    let rest_a: Vec<String> = std::iter::from_fn(|| engine.next_scenario().map(|s| s.id.clone())).collect();
    let rest_b: Vec<String> = std::iter::from_fn(|| restored.next_scenario().map(|s| s.id.clone())).collect();
    assert_eq!(rest_a, rest_b);
}

#[test]
fn restore_clamps_out_of_range_index() {
    let engine = started();
    let mut snapshot = engine.snapshot();
    snapshot.state.current_scenario_index = 500;

    let mut restored = GameEngine::standard().unwrap();
    restored.restore(snapshot);
    assert_eq!(restored.cursor().index(), 9);
    assert_eq!(restored.state().current_scenario_index, 9);
    assert!(restored.current_scenario().is_none());
}

#[test]
fn snapshot_version_mismatch_rejected() {
    let engine = started();
    let mut value: serde_json::Value = serde_json::from_str(&engine.snapshot().to_json().unwrap()).unwrap();
    value["version"] = serde_json::json!(SNAPSHOT_VERSION + 1);

    match SessionSnapshot::from_json(&value.to_string()) {
        Err(GameError::SnapshotVersion { expected, actual }) => {
            assert_eq!(expected, SNAPSHOT_VERSION);
            assert_eq!(actual, SNAPSHOT_VERSION + 1);
        }
        other => panic!("expected SnapshotVersion, got {other:?}"),
    }
}

#[test]
fn compare_choices_through_engine() {
    let engine = GameEngine::standard().unwrap();
    let coffee = engine.catalog().by_id("morning-coffee").unwrap();
    let cmp = engine.compare_choices(&coffee.choices[0], &coffee.choices[2]);
    assert!(approx(cmp.annual_difference, (6.0 - 0.25) * 365.0, 1e-9));
}
