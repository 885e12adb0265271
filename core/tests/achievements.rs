//! Achievement predicates evaluated against real sessions.

use chrono::{Duration, TimeZone, Utc};
use money_wisdom_core::{
    achievement::{self, ACHIEVEMENTS},
    catalog::ScenarioCatalog,
    clock::ManualClock,
    config::{GameConfig, RateSet, TimeframeSet},
    engine::GameEngine,
    event::GameEvent,
    impact::ImpactCalculator,
    session::{PlayerProfile, SessionState},
};
use std::{rc::Rc, sync::Arc};

fn ids(list: &[achievement::Achievement]) -> Vec<&str> {
    list.iter().map(|a| a.id.as_str()).collect()
}

fn play(catalog: &ScenarioCatalog, picks: &[(&str, usize)]) -> SessionState {
    let calc = ImpactCalculator::new(RateSet::default(), TimeframeSet::default());
    let mut state = SessionState::new(catalog.len(), PlayerProfile::default());
    for (id, index) in picks {
        state
            .record_choice(&calc, catalog.by_id(id).unwrap(), *index, Utc::now())
            .unwrap();
    }
    state
}

fn engine_with_clock() -> (GameEngine, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()));
    let engine = GameEngine::with_clock(
        Arc::new(GameConfig::default()),
        Arc::new(ScenarioCatalog::standard().unwrap()),
        Box::new(Rc::clone(&clock)),
    );
    (engine, clock)
}

#[test]
fn table_has_thirteen_unique_entries() {
    assert_eq!(ACHIEVEMENTS.len(), 13);
    let mut seen: Vec<&str> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 13);
    assert_eq!(achievement::find("penny_pincher").unwrap().title, "Penny Pincher");
    assert!(achievement::find("nope").is_none());
}

#[test]
fn fresh_session_earns_nothing() {
    let catalog = ScenarioCatalog::standard().unwrap();
    let state = SessionState::new(catalog.len(), PlayerProfile::default());
    assert!(achievement::evaluate(&state, &catalog).is_empty());
}

#[test]
fn first_cheap_decision() {
    let catalog = ScenarioCatalog::standard().unwrap();
    let state = play(&catalog, &[("dinner-pasta", 2)]);
    // budget-pasta saves 1460/yr against premium, about 148k invested over 30 years.
    assert_eq!(
        ids(&achievement::evaluate(&state, &catalog)),
        vec!["first_decision", "penny_pincher", "smart_saver"]
    );
}

#[test]
fn penny_pincher_lost_after_one_splurge() {
    let catalog = ScenarioCatalog::standard().unwrap();
    let state = play(&catalog, &[("dinner-pasta", 2), ("morning-coffee", 1)]);
    let earned = achievement::evaluate(&state, &catalog);
    assert!(!ids(&earned).contains(&"penny_pincher"));
}

#[test]
fn category_master_needs_every_scenario_in_it() {
    let catalog = ScenarioCatalog::standard().unwrap();
    let partial = play(&catalog, &[("dinner-pasta", 0), ("morning-coffee", 0)]);
    assert!(!ids(&achievement::evaluate(&partial, &catalog)).contains(&"daily_master"));

    let full = play(&catalog, &[("dinner-pasta", 0), ("morning-coffee", 0), ("lunch-choices", 0)]);
    let earned = achievement::evaluate(&full, &catalog);
    assert!(ids(&earned).contains(&"daily_master"));
    assert!(ids(&earned).contains(&"treat_yourself"));
    assert!(!ids(&earned).contains(&"home_economist"));
}

#[test]
fn empty_category_counts_as_complete() {
    let daily_only = ScenarioCatalog::new(
        ScenarioCatalog::standard()
            .unwrap()
            .scenarios()
            .iter()
            .filter(|s| s.id == "dinner-pasta")
            .cloned()
            .collect(),
    )
    .unwrap();
    let state = play(&daily_only, &[("dinner-pasta", 0)]);
    let earned = achievement::evaluate(&state, &daily_only);
    assert!(ids(&earned).contains(&"daily_master"));
    assert!(ids(&earned).contains(&"transport_expert"));
    assert!(ids(&earned).contains(&"home_economist"));

    let undecided = SessionState::new(daily_only.len(), PlayerProfile::default());
    let earned = achievement::evaluate(&undecided, &daily_only);
    assert!(!ids(&earned).contains(&"daily_master"));
    assert!(ids(&earned).contains(&"home_economist"));
}

#[test]
fn balanced_life_needs_three_and_a_mix() {
    let catalog = ScenarioCatalog::standard().unwrap();
    let two = play(&catalog, &[("dinner-pasta", 0), ("morning-coffee", 2)]);
    assert!(!ids(&achievement::evaluate(&two, &catalog)).contains(&"balanced_life"));

    let three = play(&catalog, &[("dinner-pasta", 0), ("morning-coffee", 2), ("lunch-choices", 1)]);
    assert!(ids(&achievement::evaluate(&three, &catalog)).contains(&"balanced_life"));
}

#[test]
fn savings_thresholds() {
    let catalog = ScenarioCatalog::standard().unwrap();
    // Used car instead of luxury: 6600/yr for 30 years, invested.
    let state = play(&catalog, &[("car-purchase", 2)]);
    assert!(state.total_invested_savings > 500_000.0);
    let earned = achievement::evaluate(&state, &catalog);
    assert!(ids(&earned).contains(&"smart_saver"));
    assert!(ids(&earned).contains(&"millionaire_mindset"));

    let modest = play(&catalog, &[("dinner-pasta", 1)]);
    assert!(modest.total_invested_savings < 100_000.0);
    assert!(!ids(&achievement::evaluate(&modest, &catalog)).contains(&"smart_saver"));
}

#[test]
fn new_achievements_skips_seen() {
    let catalog = ScenarioCatalog::standard().unwrap();
    let state = play(&catalog, &[("dinner-pasta", 2)]);
    let fresh = achievement::new_achievements(&state, &catalog, &["first_decision".to_string()]);
    assert_eq!(ids(&fresh), vec!["penny_pincher", "smart_saver"]);
}

#[test]
fn quick_learner_under_ten_minutes() {
    let (mut engine, clock) = engine_with_clock();
    engine.start_session(PlayerProfile::default());
    engine.choose(2).unwrap();
    clock.advance(Duration::minutes(9));

    let summary = engine.complete_session();

    assert!(summary.achievements.iter().any(|a| a.id == "quick_learner"));
    assert_eq!(summary.play_time_ms, Some(9 * 60 * 1000));
}

#[test]
fn slow_session_is_not_quick() {
    let (mut engine, clock) = engine_with_clock();
    engine.start_session(PlayerProfile::default());
    clock.advance(Duration::minutes(10));

    let summary = engine.complete_session();
    assert!(!summary.achievements.iter().any(|a| a.id == "quick_learner"));
}

#[test]
fn completion_emits_unlock_events_once() {
    let (mut engine, _clock) = engine_with_clock();
    engine.start_session(PlayerProfile::default());
    engine.choose(2).unwrap();
    engine.drain_events();

    engine.complete_session();
    let unlocked: Vec<String> = engine
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::AchievementUnlocked { achievement_id } => Some(achievement_id),
            _ => None,
        })
        .collect();
    assert!(unlocked.contains(&"first_decision".to_string()));
    assert!(unlocked.contains(&"quick_learner".to_string()));

    engine.complete_session();
    let again = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::AchievementUnlocked { .. }))
        .count();
    assert_eq!(again, 0);
}
