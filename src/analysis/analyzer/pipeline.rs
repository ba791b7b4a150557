//! Pipeline analyzer that combines a tokenizer with token filters.
//!
//! # Examples
//!
//! ```
//! use spamguard::analysis::analyzer::analyzer::Analyzer;
//! use spamguard::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use spamguard::analysis::tokenizer::regex::RegexTokenizer;
//! use spamguard::analysis::token_filter::lowercase::LowercaseFilter;
//! use spamguard::analysis::token_filter::stop::StopFilter;
//! use std::sync::Arc;
//!
//! let tokenizer = Arc::new(RegexTokenizer::new().unwrap());
//! let analyzer = PipelineAnalyzer::new(tokenizer)
//!     .add_filter(Arc::new(LowercaseFilter::new()))
//!     .add_filter(Arc::new(StopFilter::from_words(vec!["the", "and"])))
//!     .with_name("my_custom_analyzer");
//!
//! let tokens: Vec<_> = analyzer.analyze("Claim THE prize AND win").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].text, "claim");
//! assert_eq!(tokens[1].text, "prize");
//! assert_eq!(tokens[2].text, "win");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
///
/// Filters run in the order they were added.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    /// Get the configured name of this pipeline.
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;
    use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
    use crate::analysis::tokenizer::RegexTokenizer;

    #[test]
    fn test_pipeline_applies_filters_in_order() {
        let tokenizer = Arc::new(RegexTokenizer::new().unwrap());
        // Stop words are matched before lowercasing, so "THE" survives.
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(StopFilter::from_words(vec!["the"])))
            .add_filter(Arc::new(LowercaseFilter::new()));

        let tokens: Vec<Token> = analyzer.analyze("THE deal the end").unwrap().collect();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(texts, vec!["the", "deal", "end"]);
    }

    #[test]
    fn test_pipeline_debug_and_names() {
        let tokenizer = Arc::new(RegexTokenizer::new().unwrap());
        let analyzer =
            PipelineAnalyzer::new(tokenizer).add_filter(Arc::new(LowercaseFilter::new()));

        assert_eq!(analyzer.pipeline_name(), "pipeline_regex");
        assert_eq!(analyzer.name(), "pipeline");
        assert_eq!(analyzer.filters().len(), 1);
        assert!(format!("{analyzer:?}").contains("lowercase"));
    }
}
