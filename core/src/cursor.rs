//! Scenario cursor: position within the ordered scenario sequence.
//!
//! Forward only. The index runs from 0 to len; len means exhausted.
//! The only way to move backwards is set_index (used on restore),
//! which clamps instead of failing.

use crate::{
    catalog::{Scenario, ScenarioCatalog},
    error::{GameError, GameResult},
    rng::SessionRng,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorProgress {
    /// 1-based position for display.
    pub current:     usize,
    pub total:       usize,
    pub percentage:  u8,
    pub is_complete: bool,
}

#[derive(Debug, Clone)]
pub struct ScenarioCursor {
    catalog: Arc<ScenarioCatalog>,
    /// Catalog indices in play order.
    order:   Vec<usize>,
    index:   usize,
}

impl ScenarioCursor {
    /// Catalog order.
    pub fn new(catalog: Arc<ScenarioCatalog>) -> Self {
        let order = (0..catalog.len()).collect();
        Self { catalog, order, index: 0 }
    }

    /// A deterministic permutation of the catalog derived from `seed`.
    pub fn shuffled(catalog: Arc<ScenarioCatalog>, seed: u64) -> Self {
        let mut cursor = Self::new(catalog);
        SessionRng::scenario_order(seed).shuffle(&mut cursor.order);
        cursor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Scenario> {
        self.order.get(self.index).and_then(|&i| self.catalog.get(i))
    }

    /// Step forward. None once past the last scenario.
    pub fn advance(&mut self) -> Option<&Scenario> {
        if self.index < self.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Jump to `index`, clamped to [0, len].
    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.len());
    }

    /// The scenario at a play-order position.
    pub fn scenario_at(&self, index: usize) -> GameResult<&Scenario> {
        self.order
            .get(index)
            .and_then(|&i| self.catalog.get(i))
            .ok_or(GameError::InvalidScenarioIndex { index, len: self.len() })
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len()
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.len()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn progress(&self) -> CursorProgress {
        let total = self.len();
        let percentage = if total == 0 {
            100
        } else {
            ((self.index as f64 / total as f64) * 100.0).round() as u8
        };
        CursorProgress {
            current: self.index + 1,
            total,
            percentage,
            is_complete: self.is_complete(),
        }
    }
}
