//! Text analysis for the vectorizer.
//!
//! Raw text is split into tokens by a [`Tokenizer`](tokenizer::Tokenizer),
//! passed through a chain of [`Filter`](token_filter::Filter)s and exposed
//! as a [`TokenStream`](token::TokenStream) by an
//! [`Analyzer`](analyzer::analyzer::Analyzer). The policy used for a trained
//! model is captured by [`AnalysisConfig`](config::AnalysisConfig) and
//! persisted alongside the vocabulary so inference tokenizes exactly like
//! training did.

pub mod analyzer;
pub mod config;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
