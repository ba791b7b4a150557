//! Inference over a trained model.
//!
//! [`SpamClassifier`] pairs a fitted vectorizer with the Naive Bayes model
//! trained on its vectors. It is immutable once built. [`SharedClassifier`]
//! hands the current classifier out to any number of readers and lets a
//! newly trained one be swapped in without disturbing requests already in
//! flight.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamGuardError};
use crate::ml::naive_bayes::NaiveBayesModel;
use crate::ml::types::Label;
use crate::ml::vectorizer::CountVectorizer;
use crate::storage::ArtifactStore;

/// Outcome of classifying one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Label,
    /// Posterior probability of [`Label::Spam`].
    pub spam_probability: f64,
}

impl Verdict {
    /// Whether the text was judged spam.
    pub fn is_spam(&self) -> bool {
        self.label.is_spam()
    }
}

/// A fitted vectorizer and classifier that agree on the feature space.
#[derive(Debug)]
pub struct SpamClassifier {
    vectorizer: CountVectorizer,
    model: NaiveBayesModel,
}

impl SpamClassifier {
    /// Bundle a fitted vectorizer with its model.
    pub fn new(vectorizer: CountVectorizer, model: NaiveBayesModel) -> Result<Self> {
        if !vectorizer.is_fitted() {
            return Err(SpamGuardError::not_fitted(
                "a classifier needs a fitted vectorizer",
            ));
        }
        if vectorizer.vocabulary_size() != model.n_features() {
            return Err(SpamGuardError::invalid_argument(format!(
                "vectorizer has {} terms but the model expects {} features",
                vectorizer.vocabulary_size(),
                model.n_features()
            )));
        }
        Ok(SpamClassifier { vectorizer, model })
    }

    /// Load the artifacts of `store`.
    pub fn load(store: &ArtifactStore) -> Result<Self> {
        let (vectorizer, model) = store.load()?;
        Self::new(vectorizer, model)
    }

    /// Persist this classifier to `store`.
    pub fn save(&self, store: &ArtifactStore) -> Result<()> {
        store.save(&self.vectorizer, &self.model)
    }

    /// Classify a single text.
    ///
    /// Tokens never seen during training are ignored; a text made only of
    /// such tokens is decided by the class priors.
    pub fn classify(&self, text: &str) -> Result<Verdict> {
        let x = self.vectorizer.transform_one(text)?;
        let label = self.model.predict_one(&x)?;
        let spam_probability = self.model.predict_proba(&x)?;
        log::debug!(
            "Classified text with {} known tokens as {label} (p_spam={spam_probability:.4})",
            x.total()
        );
        Ok(Verdict {
            label,
            spam_probability,
        })
    }

    /// Labels of a batch of texts.
    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Label>> {
        let x = self.vectorizer.transform(texts)?;
        self.model.predict(&x)
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &NaiveBayesModel {
        &self.model
    }
}

/// Shared, hot-swappable handle to a [`SpamClassifier`].
///
/// Readers take a snapshot with [`current`](Self::current) and keep using it
/// even if a new classifier is installed meanwhile.
#[derive(Debug, Clone)]
pub struct SharedClassifier {
    inner: Arc<RwLock<Arc<SpamClassifier>>>,
}

impl SharedClassifier {
    pub fn new(classifier: SpamClassifier) -> Self {
        SharedClassifier {
            inner: Arc::new(RwLock::new(Arc::new(classifier))),
        }
    }

    /// Load the initial classifier from `store`.
    pub fn load(store: &ArtifactStore) -> Result<Self> {
        Ok(Self::new(SpamClassifier::load(store)?))
    }

    /// The classifier currently installed.
    pub fn current(&self) -> Arc<SpamClassifier> {
        Arc::clone(&self.inner.read())
    }

    /// Install `classifier`, returning the one it replaces.
    pub fn replace(&self, classifier: SpamClassifier) -> Arc<SpamClassifier> {
        std::mem::replace(&mut *self.inner.write(), Arc::new(classifier))
    }

    /// Load fresh artifacts from `store` and install them.
    ///
    /// On failure the installed classifier is left untouched.
    pub fn reload(&self, store: &ArtifactStore) -> Result<()> {
        let classifier = SpamClassifier::load(store)?;
        self.replace(classifier);
        log::info!("Reloaded classifier from {}", store.directory().display());
        Ok(())
    }

    /// Classify with the currently installed classifier.
    pub fn classify(&self, text: &str) -> Result<Verdict> {
        self.current().classify(text)
    }
}
