//! Labeled email corpus loading.
//!
//! The training corpus is a CSV file with a header row containing a free-text
//! column named `text` and a binary label column named `spam`:
//!
//! ```csv
//! text,spam
//! "Subject: naturally irresistible your corporate identity ...",1
//! "Subject: the stock trading gunslinger ...",0
//! ```
//!
//! Other columns are ignored. Files that are not valid UTF-8 are decoded as
//! Latin-1.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{Result, SpamGuardError};
use crate::ml::types::Label;

/// Name of the text column.
pub const TEXT_COLUMN: &str = "text";

/// Name of the label column.
pub const LABEL_COLUMN: &str = "spam";

/// One labeled email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecord {
    pub text: String,
    pub label: Label,
}

impl EmailRecord {
    /// Create a new record.
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        EmailRecord {
            text: text.into(),
            label,
        }
    }
}

/// An ordered, in-memory collection of labeled emails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    records: Vec<EmailRecord>,
}

impl Corpus {
    /// Build a corpus from records.
    pub fn new(records: Vec<EmailRecord>) -> Self {
        Corpus { records }
    }

    /// Build a corpus from `(text, label)` pairs.
    pub fn from_rows<S, I>(rows: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Label)>,
    {
        Corpus {
            records: rows
                .into_iter()
                .map(|(text, label)| EmailRecord::new(text, label))
                .collect(),
        }
    }

    /// Load a corpus from a CSV file.
    ///
    /// Every failure (missing file, undecodable CSV, missing column, bad
    /// label) is reported as [`SpamGuardError::InputData`].
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            SpamGuardError::input_data(format!("cannot read corpus {}: {e}", path.display()))
        })?;
        let content = decode_text(bytes);
        Self::from_csv_str(&content).map_err(|e| match e {
            SpamGuardError::InputData(msg) => {
                SpamGuardError::input_data(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse a corpus from CSV text.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| SpamGuardError::input_data(format!("cannot read CSV header: {e}")))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SpamGuardError::input_data(format!("missing column '{name}'")))
        };
        let text_idx = column(TEXT_COLUMN)?;
        let label_idx = column(LABEL_COLUMN)?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            // Row numbers count the header as line 1.
            let line = row + 2;
            let record = result
                .map_err(|e| SpamGuardError::input_data(format!("malformed row {line}: {e}")))?;

            let text = record.get(text_idx).ok_or_else(|| {
                SpamGuardError::input_data(format!("row {line} has no '{TEXT_COLUMN}' value"))
            })?;
            let raw_label = record.get(label_idx).ok_or_else(|| {
                SpamGuardError::input_data(format!("row {line} has no '{LABEL_COLUMN}' value"))
            })?;
            let label = parse_label(raw_label)
                .map_err(|e| SpamGuardError::input_data(format!("row {line}: {e}")))?;

            records.push(EmailRecord::new(text, label));
        }

        Ok(Corpus { records })
    }

    /// The records, in file order.
    pub fn records(&self) -> &[EmailRecord] {
        &self.records
    }

    /// Texts, in file order.
    pub fn texts(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.text.as_str()).collect()
    }

    /// Labels, in file order.
    pub fn labels(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per label, indexed by [`Label::index`].
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0; 2];
        for record in &self.records {
            counts[record.label.index()] += 1;
        }
        counts
    }
}

/// Decode bytes as UTF-8, falling back to Latin-1.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::info!("Corpus is not valid UTF-8, decoding as Latin-1");
            // Latin-1 maps every byte to the code point of the same value.
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Parse a `spam` cell: `0`/`1`, tolerating a float rendering like `1.0`.
fn parse_label(raw: &str) -> Result<Label> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Label::try_from(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value == 0.0 => Ok(Label::Ham),
        Ok(value) if value == 1.0 => Ok(Label::Spam),
        _ => Err(SpamGuardError::input_data(format!(
            "label must be 0 (ham) or 1 (spam), got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_parse_csv() {
        let csv = "text,spam\n\"Subject: win, money now\",1\nmeeting at noon,0\n";
        let corpus = Corpus::from_csv_str(csv).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.texts(), vec!["Subject: win, money now", "meeting at noon"]);
        assert_eq!(corpus.labels(), vec![Label::Spam, Label::Ham]);
        assert_eq!(corpus.class_counts(), [1, 1]);
    }

    #[test]
    fn test_extra_columns_and_order() {
        let csv = "spam,id,text\n0,7,hello there\n1.0,8,buy now\n";
        let corpus = Corpus::from_csv_str(csv).unwrap();

        assert_eq!(corpus.records()[0], EmailRecord::new("hello there", Label::Ham));
        assert_eq!(corpus.records()[1], EmailRecord::new("buy now", Label::Spam));
    }

    #[test]
    fn test_missing_column() {
        let err = Corpus::from_csv_str("body,spam\nhello,0\n").unwrap_err();
        match err {
            SpamGuardError::InputData(msg) => assert!(msg.contains("'text'")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_label() {
        let err = Corpus::from_csv_str("text,spam\nhello,2\n").unwrap_err();
        assert!(matches!(err, SpamGuardError::InputData(_)));

        let err = Corpus::from_csv_str("text,spam\nhello,yes\n").unwrap_err();
        assert!(matches!(err, SpamGuardError::InputData(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Corpus::from_csv_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, SpamGuardError::InputData(_)));
    }

    #[test]
    fn test_latin1_fallback() {
        let mut file = NamedTempFile::new().unwrap();
        // "café" in Latin-1: 0xE9 is not valid UTF-8 on its own.
        file.write_all(b"text,spam\ncaf\xe9 offer,1\nhi,0\n").unwrap();

        let corpus = Corpus::from_csv_path(file.path()).unwrap();
        assert_eq!(corpus.texts()[0], "café offer");
    }

    #[test]
    fn test_decode_utf8_untouched() {
        assert_eq!(decode_text("grátis".as_bytes().to_vec()), "grátis");
    }

    #[test]
    fn test_from_rows() {
        let corpus = Corpus::from_rows(vec![("a b", Label::Spam), ("c d", Label::Ham)]);
        assert_eq!(corpus.len(), 2);
        assert!(!corpus.is_empty());
    }
}
