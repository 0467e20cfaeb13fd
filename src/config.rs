//! Runtime configuration.
//!
//! Every field has a default taken from [`crate::constants`]; a JSON file
//! may override any subset of them.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SIZE, REPLY_DELAY_MS, RIGHT_KEYWORDS, WRONG_KEYWORDS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pause before a scripted reply is shown, in milliseconds
    pub reply_delay_ms: u64,
    /// Comment words marking a wrong line (matched as whole words, any case)
    pub wrong_keywords: Vec<String>,
    /// Comment words marking a solved line
    pub right_keywords: Vec<String>,
    /// Ignore comments and trust only bad-move markers and leaf nodes
    pub markers_only: bool,
    /// Treat `DO` (doubtful move) like `BM`
    pub doubtful_is_wrong: bool,
    /// Board size for generated games
    pub default_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reply_delay_ms: REPLY_DELAY_MS,
            wrong_keywords: WRONG_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            right_keywords: RIGHT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            markers_only: false,
            doubtful_is_wrong: false,
            default_size: DEFAULT_SIZE,
        }
    }
}

impl Config {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"reply_delay_ms": 0}"#).unwrap();
        assert_eq!(config.reply_delay(), Duration::ZERO);
        assert_eq!(config.default_size, 19);
        assert!(config.wrong_keywords.iter().any(|k| k == "wrong"));
    }
}
