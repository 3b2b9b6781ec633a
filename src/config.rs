//! Tunables for both games.
//!
//! Every struct is `#[serde(default)]`, so a JSON document only needs to name the keys it
//! changes:
//!
//! ```
//! use treespire::config::TreespireConfig;
//!
//! let config = TreespireConfig::from_json_str(r#"{ "noughts_and_crosses": { "ai_delay_ms": 0 } }"#)?;
//! assert_eq!(config.noughts_and_crosses.ai_delay_ms, 0);
//! assert_eq!(config.noughts_and_crosses.search_depth, 10);
//! # Ok::<(), treespire::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::knowledge::tree::DEFAULT_QUESTION_LIMIT;
use crate::search::DEFAULT_MAX_DEPTH;

/// Settings for the noughts and crosses program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NacConfig {
    /// Pause before the AI plays, in milliseconds.
    pub ai_delay_ms: u64,
    /// Pause between the final move and the result being shown, in milliseconds.
    pub game_over_delay_ms: u64,
    /// How many moves ahead the AI looks.
    pub search_depth: u32,
}

impl Default for NacConfig {
    fn default() -> Self {
        Self {
            ai_delay_ms: 500,
            game_over_delay_ms: 1000,
            search_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl NacConfig {
    pub fn with_ai_delay(mut self, delay: Duration) -> Self {
        self.ai_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_game_over_delay(mut self, delay: Duration) -> Self {
        self.game_over_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_search_depth(mut self, depth: u32) -> Self {
        self.search_depth = depth;
        self
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }
}

/// Settings for the twenty questions program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionsConfig {
    /// Where the knowledge tree is stored.
    pub knowledge_path: PathBuf,
    /// Questions allowed per round before the machine gives up.
    pub max_questions: u32,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            knowledge_path: PathBuf::from("20Questions").join("knowledge.json"),
            max_questions: DEFAULT_QUESTION_LIMIT,
        }
    }
}

impl QuestionsConfig {
    pub fn with_knowledge_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.knowledge_path = path.into();
        self
    }

    pub fn with_max_questions(mut self, max_questions: u32) -> Self {
        self.max_questions = max_questions;
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreespireConfig {
    pub noughts_and_crosses: NacConfig,
    pub questions: QuestionsConfig,
}

impl TreespireConfig {
    pub fn with_noughts_and_crosses(mut self, config: NacConfig) -> Self {
        self.noughts_and_crosses = config;
        self
    }

    pub fn with_questions(mut self, config: QuestionsConfig) -> Self {
        self.questions = config;
        self
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {path:?}"),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects settings the games cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.noughts_and_crosses.search_depth == 0 {
            return Err(Error::InvalidConfiguration {
                message: "search_depth must be at least 1".to_string(),
            });
        }

        if self.questions.max_questions == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_questions must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
