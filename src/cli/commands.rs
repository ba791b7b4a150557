//! Command implementations for the SpamGuard CLI.

use crate::classifier::SpamClassifier;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::pipeline;
use crate::storage::ArtifactStore;

/// Execute a CLI command.
pub fn execute_command(args: SpamGuardArgs) -> Result<()> {
    match &args.command {
        Command::Train(_) => train_model(&args),
        Command::Predict(predict_args) => predict_text(predict_args, &args),
    }
}

/// Train a model and save its artifacts.
fn train_model(cli_args: &SpamGuardArgs) -> Result<()> {
    let config = cli_args.spam_config()?;
    log::debug!("Training with {config:?}");

    let report = pipeline::train(&config)?;
    output_training_report(&report, cli_args)
}

/// Classify text with the saved model.
///
/// Missing or unreadable artifacts are reported on stdout and do not fail
/// the command.
fn predict_text(args: &PredictArgs, cli_args: &SpamGuardArgs) -> Result<()> {
    let config = cli_args.spam_config()?;
    let store = ArtifactStore::new(&config.model_dir);

    let classifier = match SpamClassifier::load(&store) {
        Ok(classifier) => classifier,
        Err(e) if e.is_recoverable() => {
            log::warn!("No usable model in {}", store.directory().display());
            return output_model_unavailable(&ModelUnavailable::new(&e, store.directory()), cli_args);
        }
        Err(e) => return Err(e),
    };

    let text = args.joined_text();
    let verdict = classifier.classify(&text)?;
    output_prediction(&PredictionResult::new(text, &verdict), cli_args)
}
