//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step in the analysis pipeline: they split input
//! text into tokens. Only regex-based tokenization is provided; the pattern
//! is part of the persisted [`AnalysisConfig`](super::config::AnalysisConfig).

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a fitted vectorizer can be shared
/// between threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;

pub use self::regex::RegexTokenizer;
