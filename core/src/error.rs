use crate::types::ScenarioId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Choice index {index} out of range for scenario '{scenario_id}' ({len} choices)")]
    InvalidChoiceIndex {
        scenario_id: ScenarioId,
        index:       usize,
        len:         usize,
    },

    #[error("Scenario index {index} out of range ({len} scenarios)")]
    InvalidScenarioIndex { index: usize, len: usize },

    #[error("Scenario '{scenario_id}' not found")]
    UnknownScenario { scenario_id: ScenarioId },

    #[error("No current scenario: every scenario has been visited")]
    NoCurrentScenario,

    #[error("Malformed catalog entry '{scenario_id}': {reason}")]
    MalformedCatalogEntry {
        scenario_id: ScenarioId,
        reason:      String,
    },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unsupported snapshot version: expected {expected}, got {actual}")]
    SnapshotVersion { expected: u32, actual: u32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
