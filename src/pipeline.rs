//! End-to-end training.
//!
//! [`train`] runs the whole batch job: load the corpus, learn the vocabulary,
//! split, fit, evaluate, and persist the artifacts. [`fit_corpus`] is the
//! in-memory part of that job and touches no files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classifier::SpamClassifier;
use crate::config::SpamConfig;
use crate::corpus::Corpus;
use crate::error::{Result, SpamGuardError};
use crate::ml::metrics::ClassificationReport;
use crate::ml::model_selection::train_test_split;
use crate::ml::naive_bayes::NaiveBayesTrainer;
use crate::ml::vectorizer::CountVectorizer;
use crate::storage::ArtifactStore;

/// Held-out evaluation of a freshly fitted classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
    pub report: ClassificationReport,
}

/// Summary of a completed training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub corpus_size: usize,
    pub vocabulary_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub vectorizer_path: PathBuf,
    pub model_path: PathBuf,
}

/// Train on the corpus at `config.data_path` and save the artifacts to
/// `config.model_dir`.
pub fn train(config: &SpamConfig) -> Result<TrainingReport> {
    config.validate()?;

    log::info!("Loading corpus from {}", config.data_path.display());
    let corpus = Corpus::from_csv_path(&config.data_path)?;
    let [ham, spam] = corpus.class_counts();
    log::info!("Loaded {} emails ({ham} ham, {spam} spam)", corpus.len());

    let (classifier, evaluation) = fit_corpus(&corpus, config)?;

    let store = ArtifactStore::new(&config.model_dir);
    classifier.save(&store)?;

    Ok(TrainingReport {
        corpus_size: corpus.len(),
        vocabulary_size: classifier.vectorizer().vocabulary_size(),
        train_size: evaluation.train_size,
        test_size: evaluation.test_size,
        accuracy: evaluation.accuracy,
        report: evaluation.report,
        vectorizer_path: store.vectorizer_path(),
        model_path: store.model_path(),
    })
}

/// Fit a classifier on `corpus` and evaluate it on a held-out partition.
///
/// The vocabulary is learned from the whole corpus before the split, so the
/// held-out texts contribute terms but never counts. The model itself only
/// sees the training partition.
pub fn fit_corpus(corpus: &Corpus, config: &SpamConfig) -> Result<(SpamClassifier, Evaluation)> {
    if corpus.is_empty() {
        return Err(SpamGuardError::insufficient_data("the corpus has no rows"));
    }

    let mut vectorizer = CountVectorizer::new(config.analysis.clone())?;
    let x = vectorizer.fit_transform(&corpus.texts())?;
    if vectorizer.vocabulary_size() == 0 {
        return Err(SpamGuardError::insufficient_data(
            "no tokens were found in the corpus",
        ));
    }
    log::info!("Vocabulary size: {}", vectorizer.vocabulary_size());

    let split = train_test_split(corpus.len(), config.test_size, config.random_seed)?;
    let (x_train, x_test) = split.apply(&x);
    let (y_train, y_test) = split.apply(&corpus.labels());

    let trainer = NaiveBayesTrainer::with_alpha(config.alpha)?;
    let model = trainer.fit(&x_train, &y_train)?;
    log::info!("Trained on {} emails", x_train.len());

    let y_pred = model.predict(&x_test)?;
    let report = ClassificationReport::new(&y_test, &y_pred)?;
    log::info!(
        "Accuracy on {} held-out emails: {:.4}",
        y_test.len(),
        report.accuracy
    );

    let evaluation = Evaluation {
        train_size: x_train.len(),
        test_size: x_test.len(),
        accuracy: report.accuracy,
        report,
    };
    Ok((SpamClassifier::new(vectorizer, model)?, evaluation))
}
