//! Bag-of-words count vectorizer.
//!
//! [`CountVectorizer`] learns a [`Vocabulary`] from a corpus and turns texts
//! into [`DocumentVector`]s of token counts over that vocabulary. Tokens are
//! produced by the analyzer built from the vectorizer's
//! [`AnalysisConfig`]. Once fitted the vocabulary is frozen: tokens that were
//! never seen during fitting are silently dropped by
//! [`transform`](CountVectorizer::transform).

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::config::AnalysisConfig;
use crate::error::{Result, SpamGuardError};

/// Mapping from token to a dense, zero-based column index.
///
/// Indices are assigned in first-seen order, so fitting the same corpus
/// always yields the same mapping. Serialized as the ordered term list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary whose indices follow the order of `terms`.
    ///
    /// Fails if a term appears twice.
    pub fn from_terms(terms: Vec<String>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(terms.len());
        for (idx, term) in terms.iter().enumerate() {
            if index.insert(term.clone(), idx).is_some() {
                return Err(SpamGuardError::invalid_argument(format!(
                    "duplicate vocabulary term '{term}'"
                )));
            }
        }
        Ok(Vocabulary { terms, index })
    }

    /// Index of `term`, if known.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term stored at `index`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Whether `term` is part of the vocabulary.
    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Iterate over `(term, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.as_str(), idx))
    }

    /// Index of `term`, assigning the next free index if it is new.
    fn get_or_insert(&mut self, term: &str) -> usize {
        if let Some(&idx) = self.index.get(term) {
            return idx;
        }
        let idx = self.terms.len();
        self.terms.push(term.to_string());
        self.index.insert(term.to_string(), idx);
        idx
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Eq for Vocabulary {}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = SpamGuardError;

    fn try_from(terms: Vec<String>) -> Result<Self> {
        Vocabulary::from_terms(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

/// Token counts of one document over a vocabulary.
///
/// Logically a vector of `len()` counts in vocabulary-index order. Only the
/// non-zero entries are stored, sorted by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentVector {
    dim: usize,
    entries: Vec<(usize, u32)>,
}

impl DocumentVector {
    /// An all-zero vector of dimension `dim`.
    pub fn zeros(dim: usize) -> Self {
        DocumentVector {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a vector from a dense slice of counts.
    pub fn from_dense(counts: &[u32]) -> Self {
        let entries = counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(idx, &count)| (idx, count))
            .collect();
        DocumentVector {
            dim: counts.len(),
            entries,
        }
    }

    fn from_counts(dim: usize, counts: BTreeMap<usize, u32>) -> Self {
        DocumentVector {
            dim,
            entries: counts.into_iter().collect(),
        }
    }

    /// Dimension of the vector (the vocabulary size).
    pub fn len(&self) -> usize {
        self.dim
    }

    /// Whether the vector has dimension zero.
    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Count at position `index`; zero outside the stored entries.
    pub fn get(&self, index: usize) -> u32 {
        self.entries
            .binary_search_by_key(&index, |&(idx, _)| idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Non-zero `(index, count)` entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, count)| u64::from(count)).sum()
    }

    /// Whether every count is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand to a dense vector of counts.
    pub fn to_dense(&self) -> Vec<u32> {
        let mut dense = vec![0; self.dim];
        for &(idx, count) in &self.entries {
            dense[idx] = count;
        }
        dense
    }
}

/// Persisted form of a fitted [`CountVectorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerState {
    /// Tokenization policy used while fitting.
    pub analysis: AnalysisConfig,
    /// The frozen vocabulary.
    pub vocabulary: Vocabulary,
}

/// Converts texts into bag-of-words count vectors.
pub struct CountVectorizer {
    config: AnalysisConfig,
    analyzer: PipelineAnalyzer,
    vocabulary: Option<Vocabulary>,
}

impl std::fmt::Debug for CountVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountVectorizer")
            .field("config", &self.config)
            .field(
                "vocabulary_size",
                &self.vocabulary.as_ref().map(Vocabulary::len),
            )
            .field("analyzer", &self.analyzer.pipeline_name())
            .finish()
    }
}

impl CountVectorizer {
    /// Create an unfitted vectorizer using the given tokenization policy.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let analyzer = config.build()?;
        Ok(CountVectorizer {
            config,
            analyzer,
            vocabulary: None,
        })
    }

    /// Restore a fitted vectorizer from its persisted state.
    pub fn from_state(state: VectorizerState) -> Result<Self> {
        let mut vectorizer = Self::new(state.analysis)?;
        vectorizer.vocabulary = Some(state.vocabulary);
        Ok(vectorizer)
    }

    /// Snapshot of the fitted state for persistence.
    pub fn state(&self) -> Result<VectorizerState> {
        Ok(VectorizerState {
            analysis: self.config.clone(),
            vocabulary: self.fitted_vocabulary()?.clone(),
        })
    }

    /// Learn the vocabulary of `documents`, replacing any previous one.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<&Vocabulary> {
        let mut vocabulary = Vocabulary::new();
        for doc in documents {
            for token in self.tokens(doc.as_ref())? {
                vocabulary.get_or_insert(&token);
            }
        }

        log::debug!(
            "Fitted vocabulary of {} terms over {} documents",
            vocabulary.len(),
            documents.len()
        );
        Ok(&*self.vocabulary.insert(vocabulary))
    }

    /// Learn the vocabulary and return the count vectors of `documents`.
    ///
    /// Equivalent to [`fit`](Self::fit) followed by
    /// [`transform`](Self::transform), with a single tokenization pass.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<DocumentVector>> {
        let mut vocabulary = Vocabulary::new();
        let mut counts = Vec::with_capacity(documents.len());

        for doc in documents {
            let mut doc_counts: BTreeMap<usize, u32> = BTreeMap::new();
            for token in self.tokens(doc.as_ref())? {
                let idx = vocabulary.get_or_insert(&token);
                *doc_counts.entry(idx).or_insert(0) += 1;
            }
            counts.push(doc_counts);
        }

        // Vectors are sized only once the whole corpus has been seen.
        let dim = vocabulary.len();
        let vectors = counts
            .into_iter()
            .map(|doc_counts| DocumentVector::from_counts(dim, doc_counts))
            .collect();

        log::debug!(
            "Fitted vocabulary of {} terms over {} documents",
            dim,
            documents.len()
        );
        self.vocabulary = Some(vocabulary);
        Ok(vectors)
    }

    /// Count vectors of `documents` over the fitted vocabulary.
    ///
    /// Tokens outside the vocabulary are ignored. Fails with
    /// [`SpamGuardError::NotFitted`] if the vectorizer has not been fitted.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<DocumentVector>> {
        documents
            .iter()
            .map(|doc| self.transform_one(doc.as_ref()))
            .collect()
    }

    /// Count vector of a single document.
    pub fn transform_one(&self, document: &str) -> Result<DocumentVector> {
        let vocabulary = self.fitted_vocabulary()?;
        let mut doc_counts: BTreeMap<usize, u32> = BTreeMap::new();

        for token in self.tokens(document)? {
            if let Some(idx) = vocabulary.get(&token) {
                *doc_counts.entry(idx).or_insert(0) += 1;
            }
        }

        Ok(DocumentVector::from_counts(vocabulary.len(), doc_counts))
    }

    /// Whether a vocabulary has been learned.
    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// The learned vocabulary, if fitted.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    /// Size of the learned vocabulary (zero when unfitted).
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, Vocabulary::len)
    }

    /// The tokenization policy.
    pub fn analysis_config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn fitted_vocabulary(&self) -> Result<&Vocabulary> {
        self.vocabulary.as_ref().ok_or_else(|| {
            SpamGuardError::not_fitted("call fit or fit_transform before transform")
        })
    }

    /// Analyzed token texts of `text`, skipping tokens marked as stopped.
    fn tokens(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .analyzer
            .analyze(text)?
            .filter(|token| !token.is_stopped())
            .map(|token| token.text)
            .collect())
    }
}
