//! Common types for spam classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamGuardError};

/// Class of an email.
///
/// The integer encoding is fixed: `0` is ham and `1` is spam, matching the
/// `spam` column of the training corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    /// Legitimate mail.
    Ham = 0,
    /// Unsolicited mail.
    Spam = 1,
}

impl Label {
    /// Both labels, in index order.
    pub const ALL: [Label; 2] = [Label::Ham, Label::Spam];

    /// Position of this label in per-class parameter arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this label is [`Label::Spam`].
    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }

    /// Name used in classification reports.
    pub fn display_name(self) -> &'static str {
        match self {
            Label::Ham => "Ham (0)",
            Label::Spam => "Spam (1)",
        }
    }
}

impl TryFrom<i64> for Label {
    type Error = SpamGuardError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Label::Ham),
            1 => Ok(Label::Spam),
            other => Err(SpamGuardError::input_data(format!(
                "label must be 0 (ham) or 1 (spam), got {other}"
            ))),
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label as u8
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Ham => write!(f, "ham"),
            Label::Spam => write!(f, "spam"),
        }
    }
}
