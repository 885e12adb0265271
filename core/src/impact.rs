//! Impact calculator: what a choice costs over time, relative to the
//! alternatives in the same scenario.
//!
//! Ranking policy:
//!   - Choices are ordered by annual cost with a stable sort, so ties keep
//!     catalog order. The first is "cheapest", the last "most expensive".
//!   - A choice is flagged cheapest (most expensive) when its annual cost
//!     equals the minimum (maximum). Several choices may carry a flag.
//!   - "Invested" projections in a scenario impact always use the baseline
//!     stock-market rate, whatever return a choice advertises.

use crate::{
    catalog::{Choice, Scenario},
    config::{RateSet, TimeframeSet},
    error::GameResult,
    finance,
    types::{ScenarioId, Years},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A choice annotated with its yearly cost and rank flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedChoice {
    pub choice:            Choice,
    pub annual_cost:       f64,
    pub is_cheapest:       bool,
    pub is_most_expensive: bool,
}

/// An amount at face value and as a monthly-invested future value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Projection {
    pub nominal:  f64,
    pub invested: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeframeImpact {
    pub years:                Years,
    pub savings_vs_expensive: Projection,
    pub cost_vs_cheapest:     Projection,
    pub chosen_total:         Projection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub scenario_id:                 ScenarioId,
    pub scenario_title:              String,
    pub chosen_index:                usize,
    pub chosen:                      PricedChoice,
    pub cheapest:                    PricedChoice,
    pub most_expensive:              PricedChoice,
    pub annual_savings_vs_expensive: f64,
    pub annual_cost_vs_cheapest:     f64,
    pub by_timeframe:                BTreeMap<Years, TimeframeImpact>,
}

impl ImpactResult {
    pub fn at(&self, years: Years) -> Option<&TimeframeImpact> {
        self.by_timeframe.get(&years)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTimeframe {
    pub years:              Years,
    pub nominal_savings:    f64,
    pub invested_savings:   f64,
    pub inflation_adjusted: f64,
    pub first_total:        f64,
    pub second_total:       f64,
}

/// Which side of a head-to-head comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceComparison {
    pub first_annual:      f64,
    pub second_annual:     f64,
    pub annual_difference: f64,
    pub cheaper:           Side,
    /// Rate used for the invested column.
    pub return_rate:       f64,
    pub by_timeframe:      BTreeMap<Years, ComparisonTimeframe>,
}

#[derive(Debug, Clone)]
pub struct ImpactCalculator {
    rates:      RateSet,
    timeframes: TimeframeSet,
}

impl ImpactCalculator {
    pub fn new(rates: RateSet, timeframes: TimeframeSet) -> Self {
        Self { rates, timeframes }
    }

    pub fn rates(&self) -> &RateSet {
        &self.rates
    }

    pub fn timeframes(&self) -> &TimeframeSet {
        &self.timeframes
    }

    /// Head-to-head comparison of two choices.
    ///
    /// The lower annual cost is "cheaper"; on a tie the first argument wins.
    /// The invested column uses the cheaper choice's own return rate when it
    /// has one, then the other choice's, then the stock-market rate.
    pub fn compare_choices(&self, first: &Choice, second: &Choice) -> ChoiceComparison {
        let first_annual = first.annual_cost();
        let second_annual = second.annual_cost();
        let annual_difference = (first_annual - second_annual).abs();

        let (cheaper, cheaper_choice, other_choice) = if first_annual <= second_annual {
            (Side::First, first, second)
        } else {
            (Side::Second, second, first)
        };
        let return_rate = cheaper_choice
            .return_rate
            .or(other_choice.return_rate)
            .unwrap_or(self.rates.stock_market_return);

        let by_timeframe = self
            .timeframes
            .iter()
            .map(|years| {
                let y = f64::from(years);
                let nominal_savings = annual_difference * y;
                (
                    years,
                    ComparisonTimeframe {
                        years,
                        nominal_savings,
                        invested_savings: finance::opportunity_cost(
                            annual_difference,
                            y,
                            return_rate,
                        ),
                        inflation_adjusted: finance::inflation_adjusted(
                            nominal_savings,
                            y,
                            self.rates.inflation,
                        ),
                        first_total: first_annual * y,
                        second_total: second_annual * y,
                    },
                )
            })
            .collect();

        ChoiceComparison {
            first_annual,
            second_annual,
            annual_difference,
            cheaper,
            return_rate,
            by_timeframe,
        }
    }

    /// Impact of picking `chosen_index` in `scenario`.
    pub fn scenario_impact(&self, scenario: &Scenario, chosen_index: usize) -> GameResult<ImpactResult> {
        let chosen = scenario.choice(chosen_index)?;

        let mut ranked: Vec<(f64, &Choice)> = scenario
            .choices
            .iter()
            .map(|c| (c.annual_cost(), c))
            .collect();
        // sort_by is stable: equal costs keep catalog order.
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Scenarios always have at least one choice, and chosen_index was
        // in range, so ranked is non-empty here.
        let (cheapest_annual, cheapest) = ranked[0];
        let (most_expensive_annual, most_expensive) = ranked[ranked.len() - 1];
        let chosen_annual = chosen.annual_cost();

        let price = |choice: &Choice, annual: f64| PricedChoice {
            choice:            choice.clone(),
            annual_cost:       annual,
            is_cheapest:       annual == cheapest_annual,
            is_most_expensive: annual == most_expensive_annual,
        };

        let savings_vs_expensive = most_expensive_annual - chosen_annual;
        let cost_vs_cheapest = chosen_annual - cheapest_annual;
        let market = self.rates.stock_market_return;

        let by_timeframe = self
            .timeframes
            .iter()
            .map(|years| {
                let y = f64::from(years);
                let project = |annual: f64| Projection {
                    nominal:  annual * y,
                    invested: finance::opportunity_cost(annual, y, market),
                };
                (
                    years,
                    TimeframeImpact {
                        years,
                        savings_vs_expensive: project(savings_vs_expensive),
                        cost_vs_cheapest:     project(cost_vs_cheapest),
                        chosen_total:         project(chosen_annual),
                    },
                )
            })
            .collect();

        log::debug!(
            "scenario={} choice={} annual={chosen_annual:.2} vs_cheapest={cost_vs_cheapest:.2} vs_expensive={savings_vs_expensive:.2}",
            scenario.id,
            chosen.id,
        );

        Ok(ImpactResult {
            scenario_id:                 scenario.id.clone(),
            scenario_title:              scenario.title.clone(),
            chosen_index,
            chosen:                      price(chosen, chosen_annual),
            cheapest:                    price(cheapest, cheapest_annual),
            most_expensive:              price(most_expensive, most_expensive_annual),
            annual_savings_vs_expensive: savings_vs_expensive,
            annual_cost_vs_cheapest:     cost_vs_cheapest,
            by_timeframe,
        })
    }
}
