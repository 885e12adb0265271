//! Game events: what happened, returned to the caller.
//!
//! RULE: The engine holds no listeners. Every state change it makes is
//! described by a GameEvent pushed onto its journal; hosts drain the
//! journal after each call and fan out to UI, storage, analytics.

use crate::types::{ChoiceId, DecisionId, ScenarioId};
use serde::{Deserialize, Serialize};

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStarted {
        player_name:     String,
        total_scenarios: usize,
        shuffle_seed:    Option<u64>,
    },
    ChoiceMade {
        decision_id:            DecisionId,
        scenario_id:            ScenarioId,
        choice_id:              ChoiceId,
        replaced:               Option<DecisionId>,
        total_nominal_savings:  f64,
        total_invested_savings: f64,
    },
    ScenarioChanged {
        index:       usize,
        scenario_id: Option<ScenarioId>,
    },
    AchievementUnlocked {
        achievement_id: String,
    },
    SessionCompleted {
        wisdom_score:    u8,
        total_decisions: usize,
    },
    SessionReset,
}

impl GameEvent {
    /// Stable name of the variant, for logs and analytics keys.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }      => "session_started",
            Self::ChoiceMade { .. }          => "choice_made",
            Self::ScenarioChanged { .. }     => "scenario_changed",
            Self::AchievementUnlocked { .. } => "achievement_unlocked",
            Self::SessionCompleted { .. }    => "session_completed",
            Self::SessionReset               => "session_reset",
        }
    }
}
