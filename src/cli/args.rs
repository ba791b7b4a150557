//! Command line argument parsing for the SpamGuard CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::SpamConfig;
use crate::error::Result;

/// SpamGuard - train and run a bag-of-words spam filter
#[derive(Parser, Debug, Clone)]
#[command(name = "spamguard")]
#[command(about = "Train a Naive Bayes spam filter and classify email text")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SpamGuardArgs {
    /// Verbosity level (-v for progress, -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Directory holding the model artifacts
    #[arg(long, value_name = "DIR", env = "SPAMGUARD_MODEL_DIR", global = true)]
    pub model_dir: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpamGuardArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Resolve the configuration: defaults, then the config file, then
    /// command line flags.
    pub fn spam_config(&self) -> Result<SpamConfig> {
        let mut config = match &self.config {
            Some(path) => SpamConfig::from_file(path)?,
            None => SpamConfig::default(),
        };

        if let Some(model_dir) = &self.model_dir {
            config.model_dir = model_dir.clone();
        }
        if let Command::Train(train_args) = &self.command {
            train_args.apply(&mut config);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model on a labeled corpus and save it
    Train(TrainArgs),

    /// Classify a piece of text with the saved model
    Predict(PredictArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone, Default)]
pub struct TrainArgs {
    /// CSV corpus with `text` and `spam` columns
    #[arg(short, long, value_name = "CSV_FILE", env = "SPAMGUARD_DATA")]
    pub data: Option<PathBuf>,

    /// Fraction of the corpus held out for evaluation
    #[arg(long, value_name = "FRACTION")]
    pub test_size: Option<f64>,

    /// Seed for the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Additive smoothing constant
    #[arg(long)]
    pub alpha: Option<f64>,
}

impl TrainArgs {
    fn apply(&self, config: &mut SpamConfig) {
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
    }
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Text to classify; multiple words are joined with single spaces
    #[arg(value_name = "TEXT", required = true, num_args = 1..)]
    pub text: Vec<String>,
}

impl PredictArgs {
    /// The text to classify.
    pub fn joined_text(&self) -> String {
        self.text.join(" ")
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
