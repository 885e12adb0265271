//! Session state: the player's decisions and the running totals.
//!
//! INVARIANT: total_nominal_savings and total_invested_savings always equal
//! the sum, over the current decision list, of each decision's 30-year
//! savings-vs-most-expensive figures. Re-deciding a scenario backs out the
//! old decision's contribution before adding the new one.
//!
//! RULE: At most one decision per scenario id. A re-decision replaces the
//! old record at its original position in the list.

use crate::{
    achievement::{self, Achievement},
    catalog::{Scenario, ScenarioCatalog},
    config::GameConfig,
    error::GameResult,
    impact::{ImpactCalculator, ImpactResult, PricedChoice, Projection},
    scoring::{self, FinalSummary},
    types::{DecisionId, ScenarioId, RUNNING_TOTAL_HORIZON},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Who is playing. Informational only; never used in calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name:          String,
    pub age:           u32,
    pub annual_income: u64,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name:          "Player".into(),
            age:           25,
            annual_income: 50_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id:             DecisionId,
    pub scenario_id:    ScenarioId,
    pub scenario_title: String,
    pub impact:         ImpactResult,
    pub made_at:        DateTime<Utc>,
}

impl Decision {
    pub fn chosen(&self) -> &PricedChoice {
        &self.impact.chosen
    }

    /// This decision's contribution to the running totals.
    pub fn running_total_contribution(&self) -> Projection {
        self.impact
            .at(RUNNING_TOTAL_HORIZON)
            .map(|t| t.savings_vs_expensive)
            .unwrap_or_default()
    }
}

/// What record_choice hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceRecorded {
    pub decision: Decision,
    pub impact:   ImpactResult,
    /// The decision this one replaced, if the scenario was already decided.
    pub replaced: Option<Decision>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub player:                 PlayerProfile,
    pub current_scenario_index: usize,
    pub total_scenarios:        usize,
    /// Insertion order, which is decision order, not scenario order.
    pub decisions:              Vec<Decision>,
    pub total_nominal_savings:  f64,
    pub total_invested_savings: f64,
    /// Only meaningful once the session is complete.
    pub wisdom_score:           u8,
    pub achievements:           Vec<Achievement>,
    pub started_at:             Option<DateTime<Utc>>,
    pub ended_at:               Option<DateTime<Utc>>,
    pub is_complete:            bool,
    /// Set when the scenario order was shuffled.
    #[serde(default)]
    pub shuffle_seed:           Option<u64>,
}

impl SessionState {
    pub fn new(total_scenarios: usize, player: PlayerProfile) -> Self {
        Self {
            player,
            current_scenario_index: 0,
            total_scenarios,
            decisions: Vec::new(),
            total_nominal_savings: 0.0,
            total_invested_savings: 0.0,
            wisdom_score: 0,
            achievements: Vec::new(),
            started_at: None,
            ended_at: None,
            is_complete: false,
            shuffle_seed: None,
        }
    }

    pub fn decision_for(&self, scenario_id: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.scenario_id == scenario_id)
    }

    /// Record a choice for `scenario`, replacing any earlier decision for it.
    pub fn record_choice(
        &mut self,
        calculator: &ImpactCalculator,
        scenario: &Scenario,
        choice_index: usize,
        now: DateTime<Utc>,
    ) -> GameResult<ChoiceRecorded> {
        let impact = calculator.scenario_impact(scenario, choice_index)?;

        let decision = Decision {
            id:             uuid::Uuid::new_v4().to_string(),
            scenario_id:    scenario.id.clone(),
            scenario_title: scenario.title.clone(),
            impact:         impact.clone(),
            made_at:        now,
        };

        let existing = self
            .decisions
            .iter()
            .position(|d| d.scenario_id == scenario.id);

        let replaced = match existing {
            Some(pos) => {
                let old = std::mem::replace(&mut self.decisions[pos], decision.clone());
                let backed_out = old.running_total_contribution();
                self.total_nominal_savings -= backed_out.nominal;
                self.total_invested_savings -= backed_out.invested;
                log::debug!(
                    "scenario={} re-decided: {} -> {}",
                    scenario.id,
                    old.chosen().choice.id,
                    decision.chosen().choice.id
                );
                Some(old)
            }
            None => {
                self.decisions.push(decision.clone());
                None
            }
        };

        let added = decision.running_total_contribution();
        self.total_nominal_savings += added.nominal;
        self.total_invested_savings += added.invested;

        Ok(ChoiceRecorded {
            decision,
            impact,
            replaced,
        })
    }

    /// Running totals recomputed from scratch over the decision list.
    pub fn recomputed_totals(&self) -> Projection {
        self.decisions
            .iter()
            .map(Decision::running_total_contribution)
            .fold(Projection::default(), |acc, p| Projection {
                nominal:  acc.nominal + p.nominal,
                invested: acc.invested + p.invested,
            })
    }

    pub fn play_time(&self) -> Option<Duration> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Stamp the end, score the session, evaluate achievements,
    /// and produce the summary.
    pub fn complete(
        &mut self,
        catalog: &ScenarioCatalog,
        config: &GameConfig,
        now: DateTime<Utc>,
    ) -> FinalSummary {
        self.ended_at = Some(now);
        self.is_complete = true;
        self.wisdom_score = scoring::wisdom_score(&self.decisions);
        self.achievements = achievement::evaluate(self, catalog);

        log::info!(
            "session complete: {} decisions, wisdom={}, achievements={}",
            self.decisions.len(),
            self.wisdom_score,
            self.achievements.len()
        );

        scoring::final_summary(self, &config.rates, &config.timeframes, &config.wisdom_tiers)
    }
}
