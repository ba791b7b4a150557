//! Serializable description of the tokenization policy.
//!
//! A fitted vectorizer stores its [`AnalysisConfig`] rather than the analyzer
//! itself, and rebuilds the analyzer after loading. Changing any field changes
//! which tokens exist, so the config is fixed at training time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::regex::{DEFAULT_TOKEN_PATTERN, RegexTokenizer};
use crate::error::Result;

/// Tokenization policy shared by training and inference.
///
/// The default is word tokens of two or more word characters, lowercased,
/// with no stop word removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Regex whose matches become tokens.
    pub token_pattern: String,

    /// Fold tokens to lowercase.
    pub lowercase: bool,

    /// Drop the built-in English stop words.
    pub stop_words: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            lowercase: true,
            stop_words: false,
        }
    }
}

impl AnalysisConfig {
    /// Build the analyzer described by this config.
    ///
    /// Fails with an analysis error when `token_pattern` is not a valid regex.
    pub fn build(&self) -> Result<PipelineAnalyzer> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&self.token_pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer);

        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        if self.stop_words {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
        }

        Ok(analyzer.with_name("bag_of_words"))
    }
}
