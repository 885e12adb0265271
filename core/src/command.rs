use crate::{session::PlayerProfile, types::ScenarioId};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Session lifecycle ─────────────────────────
    Start {
        #[serde(default)]
        player:       Option<PlayerProfile>,
        #[serde(default)]
        shuffle_seed: Option<u64>,
    },
    Complete,
    Reset,

    // ── Play ──────────────────────────────────────
    Choose {
        choice_index: usize,
    },
    Revise {
        scenario_id:  ScenarioId,
        choice_index: usize,
    },
    Next,
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { .. }  => "start",
            Self::Complete      => "complete",
            Self::Reset         => "reset",
            Self::Choose { .. } => "choose",
            Self::Revise { .. } => "revise",
            Self::Next          => "next",
        }
    }
}
