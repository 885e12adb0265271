//! Scenario catalog: the fixed, ordered list of choices a player faces.
//!
//! RULE: The catalog is validated once at load and is immutable after.
//! A malformed entry is fatal to startup; nothing mid-session re-checks shape.

use crate::{
    error::{GameError, GameResult},
    types::{ChoiceId, ScenarioId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Quality assumed for a choice that does not state one.
pub const DEFAULT_QUALITY_SCORE: u8 = 70;

/// How often a choice's cost recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Once,
    #[serde(rename = "every5years")]
    EveryFiveYears,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Once,
        Self::EveryFiveYears,
    ];

    /// Factor that converts one occurrence into a yearly amount.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Daily          => 365.0,
            Self::Weekly         => 52.0,
            Self::Monthly        => 12.0,
            Self::Yearly         => 1.0,
            Self::Once           => 1.0,
            Self::EveryFiveYears => 0.2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily          => "per day",
            Self::Weekly         => "per week",
            Self::Monthly        => "per month",
            Self::Yearly         => "per year",
            Self::Once           => "one time",
            Self::EveryFiveYears => "every 5 years",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Daily,
    Transportation,
    Housing,
    Subscriptions,
    Lifestyle,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily          => "Daily Spending",
            Self::Transportation => "Transportation",
            Self::Housing        => "Housing",
            Self::Subscriptions  => "Subscriptions",
            Self::Lifestyle      => "Lifestyle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id:                ChoiceId,
    pub label:             String,
    pub detail:            String,
    /// Cost per occurrence. Negative means the choice is itself a contribution.
    pub cost:              f64,
    pub frequency:         Frequency,
    /// Subjective satisfaction, 0–100.
    pub quality_score:     u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_rate:       Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_note: Option<String>,
    #[serde(default)]
    pub is_investment:     bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appreciation_rate: Option<f64>,
}

impl Choice {
    /// Cost normalised to one year.
    pub fn annual_cost(&self) -> f64 {
        crate::finance::annual_cost(self.cost, self.frequency)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id:                  ScenarioId,
    pub category:            Category,
    pub title:               String,
    pub description:         String,
    pub choices:             Vec<Choice>,
    pub tip:                 String,
    pub educational_focus:   String,
    #[serde(default)]
    pub complex_calculation: bool,
}

impl Scenario {
    /// Shape checks every catalog applies, however it was built.
    fn validate(&self) -> GameResult<()> {
        let malformed = |reason: String| GameError::MalformedCatalogEntry {
            scenario_id: self.id.clone(),
            reason,
        };

        if self.choices.is_empty() {
            return Err(malformed("scenario has no choices".into()));
        }
        let mut seen = HashSet::new();
        for choice in &self.choices {
            let id = &choice.id;
            if !choice.cost.is_finite() {
                return Err(malformed(format!("choice '{id}' has a non-finite cost")));
            }
            if choice.quality_score > 100 {
                return Err(malformed(format!(
                    "choice '{id}' quality score {} exceeds 100",
                    choice.quality_score
                )));
            }
            if !seen.insert(id.as_str()) {
                return Err(malformed(format!("duplicate choice id '{id}'")));
            }
        }
        Ok(())
    }

    /// The choice at `index`, or InvalidChoiceIndex.
    pub fn choice(&self, index: usize) -> GameResult<&Choice> {
        self.choices.get(index).ok_or_else(|| GameError::InvalidChoiceIndex {
            scenario_id: self.id.clone(),
            index,
            len:         self.choices.len(),
        })
    }
}

// ── Catalog file shape ────────────────────────────────────────────
// Fields the engine cannot run without are optional here so a missing
// field is reported as a MalformedCatalogEntry naming the scenario,
// rather than as an anonymous parse error.

#[derive(Debug, Deserialize)]
struct CatalogFile {
    scenarios: Vec<RawScenario>,
}

#[derive(Debug, Deserialize)]
struct RawScenario {
    id:                  ScenarioId,
    category:            Category,
    title:               String,
    #[serde(default)]
    description:         String,
    #[serde(default)]
    choices:             Vec<RawChoice>,
    #[serde(default)]
    tip:                 String,
    #[serde(default)]
    educational_focus:   String,
    #[serde(default)]
    complex_calculation: bool,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    id:                Option<ChoiceId>,
    #[serde(default)]
    label:             String,
    #[serde(default)]
    detail:            String,
    cost:              Option<f64>,
    frequency:         Option<Frequency>,
    quality_score:     Option<u8>,
    return_rate:       Option<f64>,
    satisfaction_note: Option<String>,
    #[serde(default)]
    is_investment:     bool,
    appreciation_rate: Option<f64>,
}

impl RawScenario {
    /// Fill in defaults and reject missing required fields.
    /// Shape checks happen in ScenarioCatalog::new.
    fn into_scenario(self) -> GameResult<Scenario> {
        let malformed = |reason: String| GameError::MalformedCatalogEntry {
            scenario_id: self.id.clone(),
            reason,
        };

        let mut choices = Vec::with_capacity(self.choices.len());
        for (i, raw) in self.choices.into_iter().enumerate() {
            let id = raw.id.ok_or_else(|| malformed(format!("choice {i} has no id")))?;
            let cost = raw.cost.ok_or_else(|| malformed(format!("choice '{id}' has no cost")))?;
            let frequency = raw
                .frequency
                .ok_or_else(|| malformed(format!("choice '{id}' has no frequency")))?;
            choices.push(Choice {
                id,
                label: raw.label,
                detail: raw.detail,
                cost,
                frequency,
                quality_score: raw.quality_score.unwrap_or(DEFAULT_QUALITY_SCORE),
                return_rate: raw.return_rate,
                satisfaction_note: raw.satisfaction_note,
                is_investment: raw.is_investment,
                appreciation_rate: raw.appreciation_rate,
            });
        }

        Ok(Scenario {
            id:                  self.id,
            category:            self.category,
            title:               self.title,
            description:         self.description,
            choices,
            tip:                 self.tip,
            educational_focus:   self.educational_focus,
            complex_calculation: self.complex_calculation,
        })
    }
}

/// Ordered, validated list of scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Build from already-typed scenarios, applying the load-time checks.
    pub fn new(scenarios: Vec<Scenario>) -> GameResult<Self> {
        let mut ids = HashSet::new();
        for scenario in &scenarios {
            scenario.validate()?;
            if !ids.insert(scenario.id.as_str()) {
                return Err(GameError::MalformedCatalogEntry {
                    scenario_id: scenario.id.clone(),
                    reason:      "duplicate scenario id".into(),
                });
            }
        }
        Ok(Self { scenarios })
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let scenarios = file
            .scenarios
            .into_iter()
            .map(RawScenario::into_scenario)
            .collect::<GameResult<Vec<_>>>()?;
        Self::new(scenarios)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let catalog = Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid catalog {path}: {e}"))?;
        log::debug!("catalog loaded from {path}: {} scenarios", catalog.len());
        Ok(catalog)
    }

    /// The catalog shipped with the game.
    pub fn standard() -> GameResult<Self> {
        Self::from_json(include_str!("../../data/scenarios/scenarios.json"))
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Scenario> + '_ {
        self.scenarios.iter().filter(move |s| s.category == category)
    }
}
