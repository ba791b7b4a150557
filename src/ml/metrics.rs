//! Evaluation metrics for binary spam classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamGuardError};
use crate::ml::types::Label;

/// Fraction of predictions equal to the true label.
pub fn accuracy(y_true: &[Label], y_pred: &[Label]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

fn check_lengths(y_true: &[Label], y_pred: &[Label]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(SpamGuardError::invalid_argument(format!(
            "got {} true labels but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(SpamGuardError::invalid_argument(
            "cannot evaluate an empty set of predictions",
        ));
    }
    Ok(())
}

/// Precision, recall and F1 for one class (or one average).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(tp: usize, fp: usize, fn_count: usize) -> Self {
        let ratio = |num: usize, den: usize| {
            if den == 0 {
                0.0
            } else {
                num as f64 / den as f64
            }
        };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_count);
        let f1_score = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        ClassMetrics {
            precision,
            recall,
            f1_score,
            support: tp + fn_count,
        }
    }
}

/// Per-class metrics plus accuracy and averages over a test set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Metrics for ham then spam, indexed by [`Label::index`].
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    /// Unweighted mean over classes.
    pub macro_avg: ClassMetrics,
    /// Mean over classes weighted by support.
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Compare predictions against the true labels.
    ///
    /// Ratios that are undefined (no predicted or no actual members of a
    /// class) are reported as `0.0`.
    pub fn new(y_true: &[Label], y_pred: &[Label]) -> Result<Self> {
        check_lengths(y_true, y_pred)?;

        let mut tp = [0usize; 2];
        let mut fp = [0usize; 2];
        let mut fn_counts = [0usize; 2];
        for (&truth, &pred) in y_true.iter().zip(y_pred) {
            if truth == pred {
                tp[truth.index()] += 1;
            } else {
                fp[pred.index()] += 1;
                fn_counts[truth.index()] += 1;
            }
        }

        let classes = Label::ALL.map(|label| {
            let c = label.index();
            ClassMetrics::from_counts(tp[c], fp[c], fn_counts[c])
        });

        let total = y_true.len();
        let macro_avg = weighted_mean(&classes, [0.5, 0.5], total);
        let support_weights = classes.map(|m| m.support as f64 / total as f64);
        let weighted_avg = weighted_mean(&classes, support_weights, total);

        Ok(ClassificationReport {
            classes,
            accuracy: tp.iter().sum::<usize>() as f64 / total as f64,
            macro_avg,
            weighted_avg,
        })
    }

    /// Metrics of a single class.
    pub fn class(&self, label: Label) -> &ClassMetrics {
        &self.classes[label.index()]
    }
}

fn weighted_mean(classes: &[ClassMetrics; 2], weights: [f64; 2], support: usize) -> ClassMetrics {
    let mean = |field: fn(&ClassMetrics) -> f64| {
        classes
            .iter()
            .zip(weights)
            .map(|(m, w)| field(m) * w)
            .sum::<f64>()
    };
    ClassMetrics {
        precision: mean(|m| m.precision),
        recall: mean(|m| m.recall),
        f1_score: mean(|m| m.f1_score),
        support,
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics| {
            writeln!(
                f,
                "{name:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.precision, m.recall, m.f1_score, m.support
            )
        };

        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for label in Label::ALL {
            row(f, label.display_name(), self.class(label))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, "weighted avg", &self.weighted_avg)
    }
}
