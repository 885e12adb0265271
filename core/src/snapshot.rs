//! Snapshot serialization: full session state to/from JSON.
//!
//! A snapshot captures everything needed to resume a session: the
//! state itself carries the cursor index and the shuffle seed, so the
//! scenario order is re-derived on restore rather than stored.

use crate::{
    error::{GameError, GameResult},
    session::SessionState,
};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub state:   SessionState,
}

impl SessionSnapshot {
    pub fn new(state: SessionState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            state,
        }
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        let snapshot: SessionSnapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(GameError::SnapshotVersion {
                expected: SNAPSHOT_VERSION,
                actual:   snapshot.version,
            });
        }
        Ok(snapshot)
    }
}
