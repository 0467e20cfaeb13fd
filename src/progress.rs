//! Per-problem progress record.
//!
//! The JSON shape `{"completed": bool, "attempts": int,
//! "lastDurationSeconds": int}` is read by other tools and must stay stable.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: bool,
    pub attempts: u32,
    pub last_duration_seconds: u64,
}

impl Progress {
    /// Count one attempt. `completed` stays set once a problem was solved.
    pub fn record(&mut self, solved: bool, duration: Duration) {
        self.attempts = self.attempts.saturating_add(1);
        self.completed |= solved;
        self.last_duration_seconds = duration.as_secs();
    }

    /// Load a record; a missing file is a fresh record.
    pub fn load(path: &Path) -> Result<Progress> {
        if !path.exists() {
            return Ok(Progress::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading progress {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing progress {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing progress {}", path.display()))
    }
}
