//! Lowercase filter implementation.
//!
//! # Examples
//!
//! ```
//! use spamguard::analysis::token_filter::Filter;
//! use spamguard::analysis::token_filter::lowercase::LowercaseFilter;
//! use spamguard::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("FREE", 0), Token::new("Money", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "free");
//! assert_eq!(filtered[1].text, "money");
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that converts tokens to lowercase.
///
/// Uses Unicode-aware lowercasing, falling back to the cheaper ASCII path when
/// the token is pure ASCII. Stopped tokens are passed through untouched.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else if token.text.is_ascii() {
                    token.with_text(token.text.to_ascii_lowercase())
                } else {
                    token.with_text(token.text.to_lowercase())
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
