//! Core analyzer trait definition.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Vectorizer
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 .. Filter N
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// `Send + Sync` is required because a fitted vectorizer, and the analyzer it
/// owns, may be shared between concurrent inference callers.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    ///
    /// This runs the complete pipeline: tokenization and every configured
    /// filter.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
