//! Bag-of-words spam classification.
//!
//! The pieces compose into the training and inference pipelines:
//!
//! ```text
//! texts ─▶ CountVectorizer ─▶ DocumentVector ─▶ NaiveBayesTrainer ─▶ NaiveBayesModel
//!                                   │                                     │
//!                                   └──────────── predict ◀───────────────┘
//! ```
//!
//! - [`types`]: the [`Label`](types::Label) of an email.
//! - [`vectorizer`]: vocabulary building and count vectors.
//! - [`naive_bayes`]: multinomial Naive Bayes fitting and prediction.
//! - [`model_selection`]: seeded train/test splitting.
//! - [`metrics`]: accuracy and per-class classification report.

pub mod metrics;
pub mod model_selection;
pub mod naive_bayes;
pub mod types;
pub mod vectorizer;

pub use metrics::{ClassificationReport, accuracy};
pub use model_selection::{TrainTestSplit, train_test_split};
pub use naive_bayes::{NaiveBayesModel, NaiveBayesTrainer};
pub use types::Label;
pub use vectorizer::{CountVectorizer, DocumentVector, VectorizerState, Vocabulary};
