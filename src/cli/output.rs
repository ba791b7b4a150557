//! Output formatting for CLI commands.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::Verdict;
use crate::cli::args::{OutputFormat, SpamGuardArgs};
use crate::error::{Result, SpamGuardError};
use crate::ml::types::Label;
use crate::pipeline::TrainingReport;

/// Result structure for a prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResult {
    pub text: String,
    pub label: Label,
    pub spam: bool,
    pub spam_probability: f64,
}

impl PredictionResult {
    pub fn new(text: String, verdict: &Verdict) -> Self {
        PredictionResult {
            text,
            label: verdict.label,
            spam: verdict.is_spam(),
            spam_probability: verdict.spam_probability,
        }
    }

    /// One-word verdict shown to humans.
    pub fn headline(&self) -> &'static str {
        if self.spam { "SPAM" } else { "not spam" }
    }
}

/// Reported instead of a prediction when no usable model is available.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelUnavailable {
    pub error: String,
    pub model_dir: String,
    pub hint: Option<String>,
}

impl ModelUnavailable {
    pub fn new(error: &SpamGuardError, model_dir: &Path) -> Self {
        let hint = matches!(error, SpamGuardError::ArtifactMissing(_))
            .then(|| "Run `spamguard train` first to create the model files.".to_string());
        ModelUnavailable {
            error: error.to_string(),
            model_dir: model_dir.display().to_string(),
            hint,
        }
    }
}

/// Print the outcome of a training run.
pub fn output_training_report(report: &TrainingReport, args: &SpamGuardArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("Training completed");
                println!();
            }
            println!("Corpus size: {}", report.corpus_size);
            println!("Vocabulary size: {}", report.vocabulary_size);
            println!(
                "Train / test split: {} / {}",
                report.train_size, report.test_size
            );
            println!();
            println!("Test accuracy: {:.2}%", report.accuracy * 100.0);
            println!();
            print!("{}", report.report);
            println!();
            println!("Vectorizer saved to: {}", report.vectorizer_path.display());
            println!("Model saved to: {}", report.model_path.display());
            Ok(())
        }
        OutputFormat::Json => output_json(report, args),
    }
}

/// Print a prediction.
pub fn output_prediction(result: &PredictionResult, args: &SpamGuardArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            println!("Result: {}", result.headline());
            if args.verbosity() > 1 {
                println!(
                    "Spam probability: {}",
                    format_probability(result.spam_probability)
                );
            }
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Print why no prediction could be made.
pub fn output_model_unavailable(result: &ModelUnavailable, args: &SpamGuardArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            println!("Error: {}", result.error);
            if let Some(hint) = &result.hint {
                println!("Expected the model files in: {}", result.model_dir);
                println!("{hint}");
            }
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SpamGuardArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn format_probability(p: f64) -> String {
    if p > 0.0 && p < 0.0001 {
        format!("{p:.2e}")
    } else {
        format!("{:.2}%", p * 100.0)
    }
}
