//! Achievements: a fixed table of named predicates over session state.
//!
//! RULE: Stateless. Every call evaluates the whole table fresh against the
//! state it is given and returns matches in declaration order.
//! Entries are appended, never reordered.

use crate::{
    catalog::{Category, ScenarioCatalog},
    session::SessionState,
};
use serde::{Deserialize, Serialize};

pub const SMART_SAVER_THRESHOLD: f64 = 100_000.0;
pub const MILLIONAIRE_MINDSET_THRESHOLD: f64 = 500_000.0;
pub const FINANCIAL_GURU_SCORE: u8 = 80;
pub const QUICK_LEARNER_MINUTES: i64 = 10;
const TREAT_YOURSELF_PREMIUM_PICKS: usize = 3;
const BALANCED_LIFE_MIN_DECISIONS: usize = 3;

/// An earned achievement, as stored on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id:          String,
    pub title:       String,
    pub description: String,
    pub icon:        String,
}

pub struct AchievementDef {
    pub id:          &'static str,
    pub title:       &'static str,
    pub description: &'static str,
    pub icon:        &'static str,
    pub condition:   fn(&SessionState, &ScenarioCatalog) -> bool,
}

impl AchievementDef {
    fn earned(&self) -> Achievement {
        Achievement {
            id:          self.id.into(),
            title:       self.title.into(),
            description: self.description.into(),
            icon:        self.icon.into(),
        }
    }
}

pub static ACHIEVEMENTS: &[AchievementDef] = &[
    // ── Completion ─────────────────────────────────
    AchievementDef {
        id:          "first_decision",
        title:       "First Step",
        description: "Made your first financial decision",
        icon:        "👣",
        condition:   |s, _| !s.decisions.is_empty(),
    },
    AchievementDef {
        id:          "halfway_there",
        title:       "Halfway There",
        description: "Completed half of all scenarios",
        icon:        "🎯",
        condition:   |s, _| s.current_scenario_index >= s.total_scenarios / 2,
    },
    AchievementDef {
        id:          "journey_complete",
        title:       "Journey Complete",
        description: "Finished all scenarios",
        icon:        "🏆",
        condition:   |s, _| s.current_scenario_index >= s.total_scenarios,
    },
    // ── Savings ────────────────────────────────────
    AchievementDef {
        id:          "penny_pincher",
        title:       "Penny Pincher",
        description: "Always chose the most frugal option",
        icon:        "🪙",
        condition:   |s, _| {
            !s.decisions.is_empty() && s.decisions.iter().all(|d| d.chosen().is_cheapest)
        },
    },
    AchievementDef {
        id:          "smart_saver",
        title:       "Smart Saver",
        description: "Potential savings exceed $100,000 (if invested)",
        icon:        "💰",
        condition:   |s, _| s.total_invested_savings >= SMART_SAVER_THRESHOLD,
    },
    AchievementDef {
        id:          "millionaire_mindset",
        title:       "Millionaire Mindset",
        description: "Potential savings exceed $500,000 (if invested)",
        icon:        "🤑",
        condition:   |s, _| s.total_invested_savings >= MILLIONAIRE_MINDSET_THRESHOLD,
    },
    // ── Balance ────────────────────────────────────
    AchievementDef {
        id:          "balanced_life",
        title:       "Balanced Life",
        description: "Made a mix of frugal and premium choices",
        icon:        "⚖️",
        condition:   |s, _| {
            s.decisions.len() >= BALANCED_LIFE_MIN_DECISIONS
                && frugal_picks(s) > 0
                && premium_picks(s) > 0
        },
    },
    AchievementDef {
        id:          "treat_yourself",
        title:       "Treat Yourself",
        description: "Chose the premium option at least 3 times",
        icon:        "✨",
        condition:   |s, _| premium_picks(s) >= TREAT_YOURSELF_PREMIUM_PICKS,
    },
    // ── Learning ───────────────────────────────────
    AchievementDef {
        id:          "daily_master",
        title:       "Daily Habit Master",
        description: "Completed all daily spending scenarios",
        icon:        "☕",
        condition:   |s, c| completed_category(s, c, Category::Daily),
    },
    AchievementDef {
        id:          "transport_expert",
        title:       "Transport Expert",
        description: "Completed all transportation scenarios",
        icon:        "🚗",
        condition:   |s, c| completed_category(s, c, Category::Transportation),
    },
    AchievementDef {
        id:          "home_economist",
        title:       "Home Economist",
        description: "Completed all housing scenarios",
        icon:        "🏠",
        condition:   |s, c| completed_category(s, c, Category::Housing),
    },
    // ── Score ──────────────────────────────────────
    AchievementDef {
        id:          "financial_guru",
        title:       "Financial Guru",
        description: "Achieved a wisdom score of 80 or higher",
        icon:        "🧠",
        condition:   |s, _| s.wisdom_score >= FINANCIAL_GURU_SCORE,
    },
    AchievementDef {
        id:          "quick_learner",
        title:       "Quick Learner",
        description: "Completed the game in under 10 minutes",
        icon:        "⚡",
        condition:   |s, _| {
            s.play_time()
                .is_some_and(|d| d < chrono::Duration::minutes(QUICK_LEARNER_MINUTES))
        },
    },
];

fn frugal_picks(state: &SessionState) -> usize {
    state.decisions.iter().filter(|d| d.chosen().is_cheapest).count()
}

fn premium_picks(state: &SessionState) -> usize {
    state.decisions.iter().filter(|d| d.chosen().is_most_expensive).count()
}

/// Every catalog scenario in `category` has a decision.
/// True when the catalog has no scenario in that category.
fn completed_category(state: &SessionState, catalog: &ScenarioCatalog, category: Category) -> bool {
    catalog
        .in_category(category)
        .all(|scenario| state.decision_for(&scenario.id).is_some())
}

pub fn find(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// All achievements whose condition holds, in declaration order.
pub fn evaluate(state: &SessionState, catalog: &ScenarioCatalog) -> Vec<Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| (a.condition)(state, catalog))
        .map(AchievementDef::earned)
        .collect()
}

/// Earned achievements whose ids are not in `previously_seen`.
pub fn new_achievements(
    state: &SessionState,
    catalog: &ScenarioCatalog,
    previously_seen: &[String],
) -> Vec<Achievement> {
    evaluate(state, catalog)
        .into_iter()
        .filter(|a| !previously_seen.contains(&a.id))
        .collect()
}
