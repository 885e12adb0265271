//! Shared primitive types used across the engine.

/// Stable identifier of a scenario in the catalog.
pub type ScenarioId = String;

/// Stable identifier of a choice within its scenario.
pub type ChoiceId = String;

/// Unique identifier of a recorded decision.
pub type DecisionId = String;

/// A projection horizon, in whole years.
pub type Years = u32;

/// Horizon at which a session's running totals are measured.
pub const RUNNING_TOTAL_HORIZON: Years = 30;
