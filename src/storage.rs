//! Persistence of trained models.
//!
//! A trained model is stored as two independent files inside one directory:
//! the vectorizer state (tokenization policy and vocabulary) and the Naive
//! Bayes parameters. Files are bincode-encoded with no version header; a new
//! training run replaces both.
//!
//! # Example
//!
//! ```no_run
//! use spamguard::storage::ArtifactStore;
//!
//! # fn main() -> spamguard::error::Result<()> {
//! let store = ArtifactStore::new("models");
//! let (vectorizer, model) = store.load()?;
//! let x = vectorizer.transform(&["claim your free prize"])?;
//! println!("{:?}", model.predict(&x)?);
//! # Ok(())
//! # }
//! ```

pub mod artifact;

pub use artifact::{ArtifactStore, MODEL_FILE, VECTORIZER_FILE};
