//! Session scoring: wisdom score, cumulative impact and the end-of-game
//! summary. Everything here is recomputed from the decision list; none of
//! it reads the session's running totals except to report them.

use crate::{
    achievement::Achievement,
    config::{RateSet, TimeframeSet, WisdomTier},
    finance,
    session::{Decision, PlayerProfile, SessionState},
    types::{DecisionId, ScenarioId, Years, RUNNING_TOTAL_HORIZON},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight of frugality in a decision's value score.
const FRUGALITY_WEIGHT: f64 = 70.0;
/// Weight of self-reported quality in a decision's value score.
const QUALITY_WEIGHT: f64 = 30.0;
/// Position credited when every option costs the same.
const TIED_SAVINGS_RATIO: f64 = 0.5;

/// Value score of one decision, 0–100.
pub fn decision_value_score(decision: &Decision) -> f64 {
    let impact = &decision.impact;
    let cost_range = impact.most_expensive.annual_cost - impact.cheapest.annual_cost;
    let cost_position = impact.most_expensive.annual_cost - impact.chosen.annual_cost;

    let savings_ratio = if cost_range > 0.0 {
        cost_position / cost_range
    } else {
        TIED_SAVINGS_RATIO
    };
    let quality = f64::from(impact.chosen.choice.quality_score) / 100.0;

    savings_ratio * FRUGALITY_WEIGHT + quality * QUALITY_WEIGHT
}

/// Average value score across decisions, rounded to 0–100. Empty is 0.
pub fn wisdom_score(decisions: &[Decision]) -> u8 {
    if decisions.is_empty() {
        return 0;
    }
    let earned: f64 = decisions.iter().map(decision_value_score).sum();
    let possible = 100.0 * decisions.len() as f64;
    ((earned / possible) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// The tier a score falls into. `tiers` must be sorted highest first.
pub fn wisdom_tier(score: u8, tiers: &[WisdomTier]) -> Option<&WisdomTier> {
    tiers.iter().find(|t| score >= t.min)
}

pub fn wisdom_message(score: u8, tiers: &[WisdomTier]) -> String {
    wisdom_tier(score, tiers)
        .or_else(|| tiers.last())
        .map(|t| t.message.clone())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeTimeframe {
    pub years:                  Years,
    pub total_savings_nominal:  f64,
    pub total_savings_invested: f64,
    pub total_cost_nominal:     f64,
    pub total_cost_invested:    f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeImpact {
    pub total_annual_savings: f64,
    pub total_annual_cost:    f64,
    pub net_annual_position:  f64,
    pub by_timeframe:         BTreeMap<Years, CumulativeTimeframe>,
}

impl CumulativeImpact {
    pub fn at(&self, years: Years) -> Option<&CumulativeTimeframe> {
        self.by_timeframe.get(&years)
    }
}

/// Sum every decision's annual deltas, then project the sums.
pub fn cumulative_impact(
    decisions: &[Decision],
    rates: &RateSet,
    timeframes: &TimeframeSet,
) -> CumulativeImpact {
    let total_annual_savings: f64 = decisions
        .iter()
        .map(|d| d.impact.annual_savings_vs_expensive)
        .sum();
    let total_annual_cost: f64 = decisions
        .iter()
        .map(|d| d.impact.annual_cost_vs_cheapest)
        .sum();
    let market = rates.stock_market_return;

    let by_timeframe = timeframes
        .iter()
        .map(|years| {
            let y = f64::from(years);
            (
                years,
                CumulativeTimeframe {
                    years,
                    total_savings_nominal:  total_annual_savings * y,
                    total_savings_invested: finance::opportunity_cost(
                        total_annual_savings,
                        y,
                        market,
                    ),
                    total_cost_nominal:     total_annual_cost * y,
                    total_cost_invested:    finance::opportunity_cost(total_annual_cost, y, market),
                },
            )
        })
        .collect();

    CumulativeImpact {
        total_annual_savings,
        total_annual_cost,
        net_annual_position: total_annual_savings - total_annual_cost,
        by_timeframe,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiggestImpact {
    pub decision_id:    DecisionId,
    pub scenario_id:    ScenarioId,
    pub scenario_title: String,
    /// 30-year invested cost versus the cheapest option.
    pub amount:         f64,
}

/// The decision whose 30-year invested cost-vs-cheapest is largest.
/// None when no decision cost anything extra.
pub fn biggest_impact(decisions: &[Decision]) -> Option<BiggestImpact> {
    let mut best: Option<(&Decision, f64)> = None;
    for decision in decisions {
        let amount = decision
            .impact
            .at(RUNNING_TOTAL_HORIZON)
            .map(|t| t.cost_vs_cheapest.invested)
            .unwrap_or(0.0);
        let floor = best.map(|(_, a)| a).unwrap_or(0.0);
        if amount > floor {
            best = Some((decision, amount));
        }
    }
    best.map(|(d, amount)| BiggestImpact {
        decision_id:    d.id.clone(),
        scenario_id:    d.scenario_id.clone(),
        scenario_title: d.scenario_title.clone(),
        amount,
    })
}

/// Monthly amount the player could free up by always picking the cheapest.
pub fn monthly_savings_potential(decisions: &[Decision]) -> f64 {
    decisions
        .iter()
        .map(|d| d.impact.annual_cost_vs_cheapest / 12.0)
        .sum()
}

/// Immutable end-of-game report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSummary {
    pub player:                    PlayerProfile,
    pub total_decisions:           usize,
    pub total_nominal_savings:     f64,
    pub total_invested_savings:    f64,
    pub monthly_savings_potential: f64,
    pub cumulative_impact:         CumulativeImpact,
    pub biggest_impact:            Option<BiggestImpact>,
    pub wisdom_score:              u8,
    pub wisdom_message:            String,
    pub achievements:              Vec<Achievement>,
    /// None when the session was never started or never ended.
    pub play_time_ms:              Option<i64>,
}

pub fn final_summary(
    state: &SessionState,
    rates: &RateSet,
    timeframes: &TimeframeSet,
    tiers: &[WisdomTier],
) -> FinalSummary {
    FinalSummary {
        player:                    state.player.clone(),
        total_decisions:           state.decisions.len(),
        total_nominal_savings:     state.total_nominal_savings,
        total_invested_savings:    state.total_invested_savings,
        monthly_savings_potential: monthly_savings_potential(&state.decisions),
        cumulative_impact:         cumulative_impact(&state.decisions, rates, timeframes),
        biggest_impact:            biggest_impact(&state.decisions),
        wisdom_score:              state.wisdom_score,
        wisdom_message:            wisdom_message(state.wisdom_score, tiers),
        achievements:              state.achievements.clone(),
        play_time_ms:              state.play_time().map(|d| d.num_milliseconds()),
    }
}
