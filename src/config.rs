//! Run configuration for enumeration

use crate::generation::ExpandOptions;
use crate::utils::load_json;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory used for checkpoints when none is configured
pub const DEFAULT_DATA_DIR: &str = "data";

/// Enumeration configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    /// Directory holding `size_<n>.json` checkpoints
    pub data_dir: PathBuf,
    /// Resume from the highest stored generation below the target
    pub resume: bool,
    /// Expansion tuning
    pub expand: ExpandOptions,
}

impl EnumerationConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: EnumerationConfig = load_json(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the checkpoint directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Enable or disable resuming
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Set expansion options
    pub fn with_expand(mut self, expand: ExpandOptions) -> Self {
        self.expand = expand;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(Error::Config("data_dir must not be empty".to_string()));
        }
        if self.data_dir.is_file() {
            return Err(Error::Config(format!(
                "data_dir {} is a file",
                self.data_dir.display()
            )));
        }

        Ok(())
    }
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        EnumerationConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            resume: true,
            expand: ExpandOptions::default(),
        }
    }
}
