//! Runtime configuration, optionally loaded from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::corpus::DEFAULT_DELIMITER;
use crate::error::ConfigError;
use crate::search::DEFAULT_MAX_DEPTH;

pub const DEFAULT_REFERENCE_ACTOR: &str = "Bacon, Kevin";
pub const DEFAULT_SELF_TEST_SAMPLES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Actor every query measures its distance to.
    pub reference_actor: String,
    /// Corpus field separator.
    pub delimiter: char,
    /// Bound on path reconstruction before reporting corrupt bookkeeping.
    pub max_depth: usize,
    /// Random actors queried before interactive mode.
    pub self_test_samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_actor: DEFAULT_REFERENCE_ACTOR.to_string(),
            delimiter: char::from(DEFAULT_DELIMITER),
            max_depth: DEFAULT_MAX_DEPTH,
            self_test_samples: DEFAULT_SELF_TEST_SAMPLES,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be > 0".into()));
        }
        Ok(())
    }

    /// The delimiter as a single byte; it has to be ASCII and not a line break.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter {
            '\n' | '\r' => Err(ConfigError::Invalid(
                "delimiter cannot be a line terminator".into(),
            )),
            c if c.is_ascii() => Ok(c as u8),
            c => Err(ConfigError::Invalid(format!(
                "delimiter {c:?} is not a single-byte ASCII character"
            ))),
        }
    }
}
