//! Multinomial Naive Bayes over bag-of-words count vectors.
//!
//! Training estimates, for each [`Label`], the prior `P(c)` and the smoothed
//! likelihood of every vocabulary token:
//!
//! ```text
//! P(c)           = docs(c) / docs
//! P(token_i | c) = (count(i, c) + α) / (count(c) + α · |V|)
//! ```
//!
//! Both are stored as natural logarithms, so scoring a document is a sum:
//! `score(c) = ln P(c) + Σ_i x_i · ln P(token_i | c)`. The class with the
//! higher score wins; an exact tie goes to [`Label::Ham`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamGuardError};
use crate::ml::types::Label;
use crate::ml::vectorizer::DocumentVector;

/// Additive (Laplace) smoothing constant used unless configured otherwise.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Fits [`NaiveBayesModel`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaiveBayesTrainer {
    alpha: f64,
}

impl Default for NaiveBayesTrainer {
    fn default() -> Self {
        NaiveBayesTrainer {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl NaiveBayesTrainer {
    /// Create a trainer with Laplace smoothing (`α = 1`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trainer with a custom smoothing constant.
    ///
    /// `alpha` must be finite and strictly positive so that no token ends up
    /// with zero probability.
    pub fn with_alpha(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(SpamGuardError::invalid_argument(format!(
                "smoothing alpha must be a positive finite number, got {alpha}"
            )));
        }
        Ok(NaiveBayesTrainer { alpha })
    }

    /// The smoothing constant.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Estimate class priors and token likelihoods from labeled vectors.
    ///
    /// Requires `x.len() == y.len()`, vectors of a single dimension, and at
    /// least one example of each label.
    pub fn fit(&self, x: &[DocumentVector], y: &[Label]) -> Result<NaiveBayesModel> {
        if x.len() != y.len() {
            return Err(SpamGuardError::invalid_argument(format!(
                "got {} document vectors but {} labels",
                x.len(),
                y.len()
            )));
        }
        let Some(first) = x.first() else {
            return Err(SpamGuardError::insufficient_data(
                "no training examples were provided",
            ));
        };

        let n_features = first.len();
        let mut class_counts = [0usize; 2];
        let mut token_counts = [vec![0.0f64; n_features], vec![0.0f64; n_features]];
        let mut class_totals = [0.0f64; 2];

        for (doc, &label) in x.iter().zip(y) {
            if doc.len() != n_features {
                return Err(SpamGuardError::invalid_argument(format!(
                    "document vector has dimension {} but expected {n_features}",
                    doc.len()
                )));
            }
            let c = label.index();
            class_counts[c] += 1;
            for (idx, count) in doc.iter() {
                token_counts[c][idx] += f64::from(count);
                class_totals[c] += f64::from(count);
            }
        }

        for label in Label::ALL {
            if class_counts[label.index()] == 0 {
                return Err(SpamGuardError::insufficient_data(format!(
                    "training data has no {label} examples"
                )));
            }
        }

        let n_documents = x.len() as f64;
        let class_log_prior = class_counts.map(|count| (count as f64 / n_documents).ln());

        let mut feature_log_prob = [Vec::new(), Vec::new()];
        for label in Label::ALL {
            let c = label.index();
            let log_denominator = (class_totals[c] + self.alpha * n_features as f64).ln();
            feature_log_prob[c] = token_counts[c]
                .iter()
                .map(|&count| (count + self.alpha).ln() - log_denominator)
                .collect();
        }

        log::debug!(
            "Fitted naive Bayes on {} documents ({} ham, {} spam), {} features",
            x.len(),
            class_counts[Label::Ham.index()],
            class_counts[Label::Spam.index()],
            n_features
        );

        Ok(NaiveBayesModel {
            alpha: self.alpha,
            class_counts,
            class_log_prior,
            feature_log_prob,
        })
    }
}

/// Fitted multinomial Naive Bayes parameters.
///
/// Immutable once fitted; every array is indexed by [`Label::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    alpha: f64,
    class_counts: [usize; 2],
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
}

impl NaiveBayesModel {
    /// Assemble a model from raw parameters.
    ///
    /// The parameters are checked with [`validate`](Self::validate).
    pub fn from_parameters(
        alpha: f64,
        class_counts: [usize; 2],
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    ) -> Result<Self> {
        let model = NaiveBayesModel {
            alpha,
            class_counts,
            class_log_prior,
            feature_log_prob,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check internal consistency: both classes share one dimension and every
    /// log-probability is finite.
    pub fn validate(&self) -> Result<()> {
        let [ham, spam] = &self.feature_log_prob;
        if ham.len() != spam.len() {
            return Err(SpamGuardError::invalid_argument(format!(
                "per-class likelihoods disagree on dimension ({} vs {})",
                ham.len(),
                spam.len()
            )));
        }
        let all_finite = self
            .class_log_prior
            .iter()
            .chain(ham.iter())
            .chain(spam.iter())
            .all(|p| p.is_finite());
        if !all_finite {
            return Err(SpamGuardError::invalid_argument(
                "model contains non-finite log-probabilities",
            ));
        }
        Ok(())
    }

    /// Number of features (vocabulary size) the model was fitted on.
    pub fn n_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    /// The smoothing constant used while fitting.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of training documents with `label`.
    pub fn class_count(&self, label: Label) -> usize {
        self.class_counts[label.index()]
    }

    /// `ln P(label)`.
    pub fn class_log_prior(&self, label: Label) -> f64 {
        self.class_log_prior[label.index()]
    }

    /// `ln P(token_i | label)` for every feature, in vocabulary order.
    pub fn feature_log_prob(&self, label: Label) -> &[f64] {
        &self.feature_log_prob[label.index()]
    }

    /// Unnormalized log-posterior of each class, indexed by [`Label::index`].
    pub fn joint_log_likelihood(&self, x: &DocumentVector) -> Result<[f64; 2]> {
        if x.len() != self.n_features() {
            return Err(SpamGuardError::invalid_argument(format!(
                "document vector has dimension {} but the model expects {}",
                x.len(),
                self.n_features()
            )));
        }

        let mut scores = self.class_log_prior;
        for (c, score) in scores.iter_mut().enumerate() {
            let log_probs = &self.feature_log_prob[c];
            *score += x
                .iter()
                .map(|(idx, count)| f64::from(count) * log_probs[idx])
                .sum::<f64>();
        }
        Ok(scores)
    }

    /// Most likely label of a single document.
    pub fn predict_one(&self, x: &DocumentVector) -> Result<Label> {
        Ok(Self::decide(self.joint_log_likelihood(x)?))
    }

    /// Most likely label of each document.
    pub fn predict(&self, x: &[DocumentVector]) -> Result<Vec<Label>> {
        x.iter().map(|doc| self.predict_one(doc)).collect()
    }

    /// Posterior probability that the document is spam.
    pub fn predict_proba(&self, x: &DocumentVector) -> Result<f64> {
        let [ham, spam] = self.joint_log_likelihood(x)?;
        let max = ham.max(spam);
        let log_norm = max + ((ham - max).exp() + (spam - max).exp()).ln();
        Ok((spam - log_norm).exp())
    }

    /// Spam only on a strictly higher score.
    fn decide(scores: [f64; 2]) -> Label {
        if scores[Label::Spam.index()] > scores[Label::Ham.index()] {
            Label::Spam
        } else {
            Label::Ham
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn toy_data() -> (Vec<DocumentVector>, Vec<Label>) {
        // features: [free, money, meeting]
        let x = vec![
            DocumentVector::from_dense(&[2, 1, 0]),
            DocumentVector::from_dense(&[1, 0, 0]),
            DocumentVector::from_dense(&[0, 0, 3]),
        ];
        let y = vec![Label::Spam, Label::Spam, Label::Ham];
        (x, y)
    }

    #[test]
    fn test_priors_and_smoothed_likelihoods() {
        let (x, y) = toy_data();
        let model = NaiveBayesTrainer::new().fit(&x, &y).unwrap();

        assert_eq!(model.n_features(), 3);
        assert_eq!(model.class_count(Label::Spam), 2);
        assert_eq!(model.class_count(Label::Ham), 1);
        assert!(approx_eq(model.class_log_prior(Label::Spam), (2.0f64 / 3.0).ln()));
        assert!(approx_eq(model.class_log_prior(Label::Ham), (1.0f64 / 3.0).ln()));

        // spam total = 4 tokens, |V| = 3 -> denominator 7
        let spam = model.feature_log_prob(Label::Spam);
        assert!(approx_eq(spam[0], (4.0f64 / 7.0).ln()));
        assert!(approx_eq(spam[1], (2.0f64 / 7.0).ln()));
        assert!(approx_eq(spam[2], (1.0f64 / 7.0).ln()));

        // ham total = 3 tokens -> denominator 6; unseen tokens stay non-zero
        let ham = model.feature_log_prob(Label::Ham);
        assert!(approx_eq(ham[0], (1.0f64 / 6.0).ln()));
        assert!(approx_eq(ham[2], (4.0f64 / 6.0).ln()));
    }

    #[test]
    fn test_likelihoods_sum_to_one() {
        let (x, y) = toy_data();
        let model = NaiveBayesTrainer::new().fit(&x, &y).unwrap();
        for label in Label::ALL {
            let total: f64 = model.feature_log_prob(label).iter().map(|p| p.exp()).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_predict() {
        let (x, y) = toy_data();
        let model = NaiveBayesTrainer::new().fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions, y);

        let proba = model
            .predict_proba(&DocumentVector::from_dense(&[3, 2, 0]))
            .unwrap();
        assert!(proba > 0.5 && proba <= 1.0);
    }

    #[test]
    fn test_zero_vector_uses_priors() {
        let (x, y) = toy_data();
        let model = NaiveBayesTrainer::new().fit(&x, &y).unwrap();

        let zero = DocumentVector::zeros(3);
        let scores = model.joint_log_likelihood(&zero).unwrap();
        assert!(approx_eq(scores[0], model.class_log_prior(Label::Ham)));
        assert!(approx_eq(scores[1], model.class_log_prior(Label::Spam)));
        // Spam is the majority class here.
        assert_eq!(model.predict_one(&zero).unwrap(), Label::Spam);
        assert_eq!(model.predict_one(&zero).unwrap(), Label::Spam);
    }

    #[test]
    fn test_tie_resolves_to_ham() {
        let half = 0.5f64.ln();
        let likelihoods = vec![(0.25f64).ln(), (0.75f64).ln()];
        let model = NaiveBayesModel::from_parameters(
            1.0,
            [1, 1],
            [half, half],
            [likelihoods.clone(), likelihoods],
        )
        .unwrap();

        for dense in [[0, 0], [1, 0], [3, 7]] {
            let doc = DocumentVector::from_dense(&dense);
            assert_eq!(model.predict_one(&doc).unwrap(), Label::Ham);
            assert!(approx_eq(model.predict_proba(&doc).unwrap(), 0.5));
        }
    }

    #[test]
    fn test_identical_classes_tie_to_ham() {
        let x = vec![
            DocumentVector::from_dense(&[1, 1]),
            DocumentVector::from_dense(&[1, 1]),
        ];
        let y = vec![Label::Spam, Label::Ham];
        let model = NaiveBayesTrainer::new().fit(&x, &y).unwrap();

        assert_eq!(model.predict(&x).unwrap(), vec![Label::Ham, Label::Ham]);
    }

    #[test]
    fn test_missing_class_is_insufficient() {
        let x = vec![DocumentVector::from_dense(&[1, 0])];
        let err = NaiveBayesTrainer::new().fit(&x, &[Label::Ham]).unwrap_err();
        assert!(matches!(err, SpamGuardError::InsufficientData(_)));

        let err = NaiveBayesTrainer::new().fit(&[], &[]).unwrap_err();
        assert!(matches!(err, SpamGuardError::InsufficientData(_)));
    }

    #[test]
    fn test_shape_errors() {
        let (x, _) = toy_data();
        let err = NaiveBayesTrainer::new().fit(&x, &[Label::Ham]).unwrap_err();
        assert!(matches!(err, SpamGuardError::InvalidArgument(_)));

        let ragged = vec![
            DocumentVector::from_dense(&[1, 0]),
            DocumentVector::from_dense(&[1, 0, 1]),
        ];
        let err = NaiveBayesTrainer::new()
            .fit(&ragged, &[Label::Ham, Label::Spam])
            .unwrap_err();
        assert!(matches!(err, SpamGuardError::InvalidArgument(_)));

        let (x, y) = toy_data();
        let model = NaiveBayesTrainer::new().fit(&x, &y).unwrap();
        assert!(model.predict_one(&DocumentVector::zeros(5)).is_err());
    }

    #[test]
    fn test_alpha_validation() {
        assert!(NaiveBayesTrainer::with_alpha(0.0).is_err());
        assert!(NaiveBayesTrainer::with_alpha(f64::NAN).is_err());
        assert_eq!(NaiveBayesTrainer::with_alpha(0.5).unwrap().alpha(), 0.5);
    }

    #[test]
    fn test_model_validation() {
        let err = NaiveBayesModel::from_parameters(
            1.0,
            [1, 1],
            [0.5f64.ln(), 0.5f64.ln()],
            [vec![0.0], vec![]],
        )
        .unwrap_err();
        assert!(matches!(err, SpamGuardError::InvalidArgument(_)));
    }
}
