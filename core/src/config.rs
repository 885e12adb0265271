//! Rate tables, projection horizons and scoring tiers.
//!
//! RULE: Config is built once, before the engine, and never mutated.
//! The engine receives it behind an Arc; nothing reads ambient globals.

use crate::{
    error::{GameError, GameResult},
    session::PlayerProfile,
    types::{Years, RUNNING_TOTAL_HORIZON},
};
use serde::{Deserialize, Serialize};

/// Annual rates used by every projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSet {
    pub stock_market_return: f64,
    pub savings_account:     f64,
    pub inflation:           f64,
    pub home_appreciation:   f64,
    pub car_depreciation:    f64,
    pub mortgage_rate:       f64,
}

impl Default for RateSet {
    fn default() -> Self {
        Self {
            stock_market_return: 0.07,
            savings_account:     0.04,
            inflation:           0.03,
            home_appreciation:   0.035,
            car_depreciation:    0.15,
            mortgage_rate:       0.065,
        }
    }
}

impl RateSet {
    fn validate(&self) -> GameResult<()> {
        let fields = [
            ("stock_market_return", self.stock_market_return),
            ("savings_account", self.savings_account),
            ("inflation", self.inflation),
            ("home_appreciation", self.home_appreciation),
            ("car_depreciation", self.car_depreciation),
            ("mortgage_rate", self.mortgage_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(GameError::InvalidConfig {
                    reason: format!("rate {name} is not finite"),
                });
            }
        }
        Ok(())
    }
}

/// Ordered set of projection horizons.
///
/// Always non-empty, strictly ascending, positive, and contains
/// the running-total horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Years>", into = "Vec<Years>")]
pub struct TimeframeSet(Vec<Years>);

impl TimeframeSet {
    pub fn new(years: Vec<Years>) -> GameResult<Self> {
        if years.is_empty() {
            return Err(GameError::InvalidConfig {
                reason: "timeframes must not be empty".into(),
            });
        }
        if years.contains(&0) {
            return Err(GameError::InvalidConfig {
                reason: "timeframes must be positive".into(),
            });
        }
        if years.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GameError::InvalidConfig {
                reason: format!("timeframes must be strictly ascending: {years:?}"),
            });
        }
        if !years.contains(&RUNNING_TOTAL_HORIZON) {
            return Err(GameError::InvalidConfig {
                reason: format!("timeframes must include the {RUNNING_TOTAL_HORIZON}-year horizon"),
            });
        }
        Ok(Self(years))
    }

    pub fn years(&self) -> &[Years] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Years> + '_ {
        self.0.iter().copied()
    }
}

impl Default for TimeframeSet {
    fn default() -> Self {
        Self(vec![1, 5, 10, 20, 30])
    }
}

impl TryFrom<Vec<Years>> for TimeframeSet {
    type Error = GameError;

    fn try_from(years: Vec<Years>) -> GameResult<Self> {
        Self::new(years)
    }
}

impl From<TimeframeSet> for Vec<Years> {
    fn from(set: TimeframeSet) -> Self {
        set.0
    }
}

/// A wisdom score band and the message shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisdomTier {
    pub min:     u8,
    pub label:   String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub rates:          RateSet,
    pub timeframes:     TimeframeSet,
    /// Sorted by `min`, highest first.
    pub wisdom_tiers:   Vec<WisdomTier>,
    pub default_player: PlayerProfile,
}

impl GameConfig {
    /// Parse and validate a config document.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let mut config: GameConfig = serde_json::from_str(json)?;
        config.rates.validate()?;
        if config.wisdom_tiers.is_empty() {
            return Err(GameError::InvalidConfig {
                reason: "at least one wisdom tier is required".into(),
            });
        }
        config.wisdom_tiers.sort_by(|a, b| b.min.cmp(&a.min));
        Ok(config)
    }

    /// The config shipped with the game.
    pub fn standard() -> GameResult<Self> {
        Self::from_json(include_str!("../../data/config/game_config.json"))
    }

    /// Load from the data/ directory.
    /// Without a data directory, use GameConfig::standard().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/config/game_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        log::debug!(
            "config loaded from {path}: {} timeframes, {} tiers",
            config.timeframes.years().len(),
            config.wisdom_tiers.len()
        );
        Ok(config)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let tier = |min: u8, label: &str, message: &str| WisdomTier {
            min,
            label:   label.into(),
            message: message.into(),
        };
        Self {
            rates:          RateSet::default(),
            timeframes:     TimeframeSet::default(),
            wisdom_tiers:   vec![
                tier(80, "excellent", "Financial Guru! You make incredibly wise money decisions."),
                tier(60, "good", "Smart Saver! You have a good balance of enjoying life and building wealth."),
                tier(40, "average", "On Track! There's room to optimize your financial decisions."),
                tier(0, "needs_work", "Learning Journey! Small changes can lead to big improvements."),
            ],
            default_player: PlayerProfile::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_matches_defaults() {
        let bundled = GameConfig::standard().expect("bundled config parses");
        let defaults = GameConfig::default();
        assert_eq!(bundled.rates, defaults.rates);
        assert_eq!(bundled.timeframes, defaults.timeframes);
        assert_eq!(bundled.wisdom_tiers, defaults.wisdom_tiers);
    }

    #[test]
    fn timeframes_must_include_thirty_years() {
        assert!(TimeframeSet::new(vec![1, 5, 10]).is_err());
        assert!(TimeframeSet::new(vec![5, 1, 30]).is_err());
        assert!(TimeframeSet::new(vec![0, 30]).is_err());
        assert!(TimeframeSet::new(vec![30]).is_ok());
    }

    #[test]
    fn tiers_are_sorted_highest_first() {
        let json = r#"{
            "rates": {"stock_market_return": 0.07, "savings_account": 0.04, "inflation": 0.03,
                      "home_appreciation": 0.035, "car_depreciation": 0.15, "mortgage_rate": 0.065},
            "timeframes": [1, 30],
            "wisdom_tiers": [
                {"min": 0, "label": "low", "message": "low"},
                {"min": 50, "label": "high", "message": "high"}
            ],
            "default_player": {"name": "P", "age": 30, "annual_income": 1000}
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.wisdom_tiers[0].label, "high");
    }
}
