//! # SpamGuard
//!
//! A spam filter for email text built on a bag-of-words representation and
//! a multinomial Naive Bayes classifier.
//!
//! ## Features
//!
//! - Configurable tokenization pipeline (regex tokenizer and token filters)
//! - Count vectorizer with a frozen, persisted vocabulary
//! - Laplace-smoothed multinomial Naive Bayes in log space
//! - Seeded train/test split and per-class evaluation report
//! - Atomic artifact persistence and hot-swappable shared classifier
//!
//! ## Example
//!
//! ```no_run
//! use spamguard::classifier::SpamClassifier;
//! use spamguard::config::SpamConfig;
//! use spamguard::pipeline;
//! use spamguard::storage::ArtifactStore;
//!
//! # fn main() -> spamguard::error::Result<()> {
//! let config = SpamConfig::default();
//! let report = pipeline::train(&config)?;
//! println!("accuracy: {:.4}", report.accuracy);
//!
//! let classifier = SpamClassifier::load(&ArtifactStore::new(&config.model_dir))?;
//! let verdict = classifier.classify("congratulations you won a prize")?;
//! println!("{}", verdict.label);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod ml;
pub mod pipeline;
pub mod storage;

pub mod prelude {
    pub use crate::classifier::{SharedClassifier, SpamClassifier, Verdict};
    pub use crate::config::SpamConfig;
    pub use crate::corpus::Corpus;
    pub use crate::error::{Result, SpamGuardError};
    pub use crate::ml::Label;
    pub use crate::pipeline::{TrainingReport, train};
    pub use crate::storage::ArtifactStore;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
