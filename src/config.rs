//! Configuration for training and inference.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::config::AnalysisConfig;
use crate::error::{Result, SpamGuardError};
use crate::ml::model_selection::{DEFAULT_RANDOM_SEED, DEFAULT_TEST_SIZE};
use crate::ml::naive_bayes::DEFAULT_ALPHA;

/// Default location of the training corpus.
pub const DEFAULT_DATA_PATH: &str = "data/emails.csv";

/// Default directory holding the model artifacts.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Configuration for the spam pipeline.
///
/// Paths are used as given; relative paths resolve against the current
/// working directory of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamConfig {
    /// CSV corpus with `text` and `spam` columns.
    pub data_path: PathBuf,

    /// Directory the artifacts are written to and read from.
    pub model_dir: PathBuf,

    /// Fraction of the corpus held out for evaluation.
    pub test_size: f64,

    /// Seed for the train/test shuffle.
    pub random_seed: u64,

    /// Additive smoothing constant.
    pub alpha: f64,

    /// Tokenization policy.
    pub analysis: AnalysisConfig,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            test_size: DEFAULT_TEST_SIZE,
            random_seed: DEFAULT_RANDOM_SEED,
            alpha: DEFAULT_ALPHA,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl SpamConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: SpamConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(SpamGuardError::invalid_config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(SpamGuardError::invalid_config(format!(
                "alpha must be a positive finite number, got {}",
                self.alpha
            )));
        }
        if self.analysis.token_pattern.is_empty() {
            return Err(SpamGuardError::invalid_config("token_pattern is empty"));
        }
        Ok(())
    }
}
