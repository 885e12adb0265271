//! The game engine: one player session, start to summary.
//!
//! OWNERSHIP:
//!   - Config and catalog are shared read-only (Arc) and never mutated.
//!   - The engine owns its SessionState and cursor exclusively.
//!     Two engines never share state.
//!
//! RULES:
//!   - Every mutating call returns its result directly and appends a
//!     GameEvent to the journal. There are no callbacks.
//!   - Restoring a snapshot re-derives the cursor and emits nothing.
//!   - All timestamps come from the engine's SessionClock.

use crate::{
    achievement::{self, Achievement},
    catalog::{Choice, Scenario, ScenarioCatalog},
    clock::{SessionClock, SystemClock},
    command::PlayerCommand,
    config::GameConfig,
    cursor::ScenarioCursor,
    error::{GameError, GameResult},
    event::GameEvent,
    impact::{ChoiceComparison, ImpactCalculator, ImpactResult},
    scoring::{self, FinalSummary},
    session::{ChoiceRecorded, PlayerProfile, SessionState},
    snapshot::SessionSnapshot,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based position for display.
    pub current:         usize,
    pub total:           usize,
    pub percentage:      u8,
    pub is_complete:     bool,
    pub decisions_count: usize,
    pub total_savings:   f64,
    pub total_invested:  f64,
}

pub struct GameEngine {
    config:     Arc<GameConfig>,
    catalog:    Arc<ScenarioCatalog>,
    calculator: ImpactCalculator,
    cursor:     ScenarioCursor,
    state:      SessionState,
    clock:      Box<dyn SessionClock>,
    events:     Vec<GameEvent>,
}

impl GameEngine {
    pub fn new(config: Arc<GameConfig>, catalog: Arc<ScenarioCatalog>) -> Self {
        Self::with_clock(config, catalog, Box::new(SystemClock))
    }

    pub fn with_clock(
        config: Arc<GameConfig>,
        catalog: Arc<ScenarioCatalog>,
        clock: Box<dyn SessionClock>,
    ) -> Self {
        let calculator = ImpactCalculator::new(config.rates, config.timeframes.clone());
        let state = SessionState::new(catalog.len(), config.default_player.clone());
        Self {
            cursor: ScenarioCursor::new(Arc::clone(&catalog)),
            config,
            catalog,
            calculator,
            state,
            clock,
            events: Vec::new(),
        }
    }

    /// Bundled config and catalog.
    pub fn standard() -> GameResult<Self> {
        let catalog = ScenarioCatalog::standard()?;
        Ok(Self::new(Arc::new(GameConfig::standard()?), Arc::new(catalog)))
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn calculator(&self) -> &ImpactCalculator {
        &self.calculator
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cursor(&self) -> &ScenarioCursor {
        &self.cursor
    }

    pub fn current_scenario(&self) -> Option<&Scenario> {
        self.cursor.current()
    }

    /// Take every event emitted since the last drain.
    /// The journal only grows until drained; hosts call this after each step.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Session lifecycle ──────────────────────────────────────

    /// Begin a fresh session in catalog order.
    pub fn start_session(&mut self, player: PlayerProfile) {
        self.begin(player, None);
    }

    /// Begin a fresh session with the scenario order shuffled by `seed`.
    pub fn start_shuffled_session(&mut self, player: PlayerProfile, seed: u64) {
        self.begin(player, Some(seed));
    }

    fn begin(&mut self, player: PlayerProfile, shuffle_seed: Option<u64>) {
        self.cursor = match shuffle_seed {
            Some(seed) => ScenarioCursor::shuffled(Arc::clone(&self.catalog), seed),
            None => ScenarioCursor::new(Arc::clone(&self.catalog)),
        };
        self.state = SessionState::new(self.catalog.len(), player);
        self.state.shuffle_seed = shuffle_seed;
        self.state.started_at = Some(self.clock.now());

        log::info!(
            "session started: player={} scenarios={} shuffle_seed={shuffle_seed:?}",
            self.state.player.name,
            self.state.total_scenarios
        );
        self.events.push(GameEvent::SessionStarted {
            player_name: self.state.player.name.clone(),
            total_scenarios: self.state.total_scenarios,
            shuffle_seed,
        });
    }

    /// Discard the session and return to the first scenario.
    pub fn reset(&mut self) {
        self.cursor = ScenarioCursor::new(Arc::clone(&self.catalog));
        self.state = SessionState::new(self.catalog.len(), self.config.default_player.clone());
        log::info!("session reset");
        self.events.push(GameEvent::SessionReset);
    }

    // ── Calculation ────────────────────────────────────────────

    pub fn scenario_impact(&self, scenario: &Scenario, choice_index: usize) -> GameResult<ImpactResult> {
        self.calculator.scenario_impact(scenario, choice_index)
    }

    pub fn compare_choices(&self, first: &Choice, second: &Choice) -> ChoiceComparison {
        self.calculator.compare_choices(first, second)
    }

    // ── Play ───────────────────────────────────────────────────

    /// Answer the current scenario.
    pub fn choose(&mut self, choice_index: usize) -> GameResult<ChoiceRecorded> {
        let scenario = self.cursor.current().ok_or(GameError::NoCurrentScenario)?;
        let now = self.clock.now();
        let recorded = self
            .state
            .record_choice(&self.calculator, scenario, choice_index, now)?;
        self.after_choice(&recorded);
        Ok(recorded)
    }

    /// Change the answer to a scenario, visited or not.
    pub fn revise(&mut self, scenario_id: &str, choice_index: usize) -> GameResult<ChoiceRecorded> {
        let scenario = self
            .catalog
            .by_id(scenario_id)
            .ok_or_else(|| GameError::UnknownScenario {
                scenario_id: scenario_id.to_string(),
            })?;
        let now = self.clock.now();
        let recorded = self
            .state
            .record_choice(&self.calculator, scenario, choice_index, now)?;
        self.after_choice(&recorded);
        Ok(recorded)
    }

    fn after_choice(&mut self, recorded: &ChoiceRecorded) {
        self.events.push(GameEvent::ChoiceMade {
            decision_id:            recorded.decision.id.clone(),
            scenario_id:            recorded.decision.scenario_id.clone(),
            choice_id:              recorded.decision.chosen().choice.id.clone(),
            replaced:               recorded.replaced.as_ref().map(|d| d.id.clone()),
            total_nominal_savings:  self.state.total_nominal_savings,
            total_invested_savings: self.state.total_invested_savings,
        });
    }

    /// Move to the next scenario. Completes the session when the
    /// sequence runs out, and returns None from then on.
    pub fn next_scenario(&mut self) -> Option<&Scenario> {
        let exhausted = self.cursor.advance().is_none();
        self.state.current_scenario_index = self.cursor.index();

        self.events.push(GameEvent::ScenarioChanged {
            index:       self.cursor.index(),
            scenario_id: self.cursor.current().map(|s| s.id.clone()),
        });

        if exhausted && !self.state.is_complete {
            self.complete_session();
        }
        self.cursor.current()
    }

    /// Score the session and produce the final summary.
    pub fn complete_session(&mut self) -> FinalSummary {
        let before: Vec<String> = self.state.achievements.iter().map(|a| a.id.clone()).collect();

        let now = self.clock.now();
        let summary = self.state.complete(&self.catalog, &self.config, now);

        for earned in &self.state.achievements {
            if !before.contains(&earned.id) {
                self.events.push(GameEvent::AchievementUnlocked {
                    achievement_id: earned.id.clone(),
                });
            }
        }
        self.events.push(GameEvent::SessionCompleted {
            wisdom_score:    summary.wisdom_score,
            total_decisions: summary.total_decisions,
        });
        summary
    }

    /// The summary as of now, without completing anything.
    pub fn summary(&self) -> FinalSummary {
        scoring::final_summary(
            &self.state,
            &self.config.rates,
            &self.config.timeframes,
            &self.config.wisdom_tiers,
        )
    }

    pub fn evaluate_achievements(&self) -> Vec<Achievement> {
        achievement::evaluate(&self.state, &self.catalog)
    }

    pub fn new_achievements(&self, previously_seen: &[String]) -> Vec<Achievement> {
        achievement::new_achievements(&self.state, &self.catalog, previously_seen)
    }

    pub fn progress(&self) -> Progress {
        let cursor = self.cursor.progress();
        Progress {
            current:         cursor.current,
            total:           cursor.total,
            percentage:      cursor.percentage,
            is_complete:     cursor.is_complete,
            decisions_count: self.state.decisions.len(),
            total_savings:   self.state.total_nominal_savings,
            total_invested:  self.state.total_invested_savings,
        }
    }

    // ── Commands ───────────────────────────────────────────────

    pub fn submit_command(&mut self, command: PlayerCommand) -> GameResult<()> {
        let name = command.name();
        let result = match command {
            PlayerCommand::Start { player, shuffle_seed } => {
                let player = player.unwrap_or_else(|| self.config.default_player.clone());
                self.begin(player, shuffle_seed);
                Ok(())
            }
            PlayerCommand::Choose { choice_index } => self.choose(choice_index).map(|_| ()),
            PlayerCommand::Revise { scenario_id, choice_index } => {
                self.revise(&scenario_id, choice_index).map(|_| ())
            }
            PlayerCommand::Next => {
                self.next_scenario();
                Ok(())
            }
            PlayerCommand::Complete => {
                self.complete_session();
                Ok(())
            }
            PlayerCommand::Reset => {
                self.reset();
                Ok(())
            }
        };
        if let Err(e) = &result {
            log::warn!("command {name} rejected: {e}");
        }
        result
    }

    // ── Persistence boundary ───────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.state.clone())
    }

    /// Replace the session with a previously saved one.
    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        let mut state = snapshot.state;

        let mut cursor = match state.shuffle_seed {
            Some(seed) => ScenarioCursor::shuffled(Arc::clone(&self.catalog), seed),
            None => ScenarioCursor::new(Arc::clone(&self.catalog)),
        };
        cursor.set_index(state.current_scenario_index);
        state.current_scenario_index = cursor.index();
        state.total_scenarios = self.catalog.len();

        for decision in &state.decisions {
            if self.catalog.by_id(&decision.scenario_id).is_none() {
                log::warn!(
                    "restored decision {} refers to unknown scenario {}",
                    decision.id,
                    decision.scenario_id
                );
            }
        }

        log::debug!(
            "session restored at index {} with {} decisions",
            state.current_scenario_index,
            state.decisions.len()
        );
        self.cursor = cursor;
        self.state = state;
    }
}
