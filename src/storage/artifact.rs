//! File-based artifact store.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::{Result, SpamGuardError};
use crate::ml::naive_bayes::NaiveBayesModel;
use crate::ml::vectorizer::{CountVectorizer, VectorizerState};

/// File name of the serialized vectorizer.
pub const VECTORIZER_FILE: &str = "vectorizer.bin";

/// File name of the serialized classifier.
pub const MODEL_FILE: &str = "spam_model.bin";

/// Reads and writes the two model artifacts in a directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The directory holding the artifacts.
    directory: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `directory`. Nothing is touched on disk until
    /// [`save`](Self::save) or [`load`](Self::load).
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        ArtifactStore {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// The artifact directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the vectorizer artifact.
    pub fn vectorizer_path(&self) -> PathBuf {
        self.directory.join(VECTORIZER_FILE)
    }

    /// Path of the classifier artifact.
    pub fn model_path(&self) -> PathBuf {
        self.directory.join(MODEL_FILE)
    }

    /// Whether both artifacts are present.
    pub fn exists(&self) -> bool {
        self.vectorizer_path().is_file() && self.model_path().is_file()
    }

    /// Persist a fitted vectorizer and its classifier, replacing any previous
    /// artifacts.
    ///
    /// The directory is created if needed. Each file is written to a
    /// temporary file next to its destination and renamed into place, so a
    /// concurrent reader sees either the old or the new file, never a partial
    /// one.
    pub fn save(&self, vectorizer: &CountVectorizer, model: &NaiveBayesModel) -> Result<()> {
        let state = vectorizer.state()?;
        if state.vocabulary.len() != model.n_features() {
            return Err(SpamGuardError::invalid_argument(format!(
                "vectorizer has {} terms but the model expects {} features",
                state.vocabulary.len(),
                model.n_features()
            )));
        }

        fs::create_dir_all(&self.directory)?;

        let vectorizer_path = self.vectorizer_path();
        write_atomic(&vectorizer_path, &state)?;
        log::info!("Saved vectorizer to {}", vectorizer_path.display());

        let model_path = self.model_path();
        write_atomic(&model_path, model)?;
        log::info!("Saved model to {}", model_path.display());

        Ok(())
    }

    /// Load the vectorizer and classifier.
    ///
    /// Fails with [`SpamGuardError::ArtifactMissing`] when either file does
    /// not exist, and with [`SpamGuardError::ArtifactCorrupt`] for any other
    /// read, decode or consistency failure.
    pub fn load(&self) -> Result<(CountVectorizer, NaiveBayesModel)> {
        let vectorizer_path = self.vectorizer_path();
        let model_path = self.model_path();
        for path in [&vectorizer_path, &model_path] {
            if !path.exists() {
                return Err(SpamGuardError::artifact_missing(path));
            }
        }

        let state: VectorizerState = read_artifact(&vectorizer_path)?;
        let model: NaiveBayesModel = read_artifact(&model_path)?;

        model
            .validate()
            .map_err(|e| SpamGuardError::artifact_corrupt(&model_path, e.to_string()))?;
        if state.vocabulary.len() != model.n_features() {
            return Err(SpamGuardError::artifact_corrupt(
                &model_path,
                format!(
                    "model expects {} features but the vectorizer has {} terms",
                    model.n_features(),
                    state.vocabulary.len()
                ),
            ));
        }

        let vectorizer = CountVectorizer::from_state(state)
            .map_err(|e| SpamGuardError::artifact_corrupt(&vectorizer_path, e.to_string()))?;

        log::debug!(
            "Loaded model with {} features from {}",
            model.n_features(),
            self.directory.display()
        );
        Ok((vectorizer, model))
    }
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let temp_file = NamedTempFile::new_in(parent)?;

    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, value).map_err(|e| {
            SpamGuardError::other(format!("failed to encode {}: {e}", path.display()))
        })?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;

    temp_file.persist(path).map_err(|e| SpamGuardError::Io(e.error))?;
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SpamGuardError::artifact_missing(path)
        } else {
            SpamGuardError::artifact_corrupt(path, e.to_string())
        }
    })?;

    bincode::deserialize(&bytes).map_err(|e| SpamGuardError::artifact_corrupt(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::analysis::config::AnalysisConfig;
    use crate::ml::naive_bayes::NaiveBayesTrainer;
    use crate::ml::types::Label;

    fn trained() -> (CountVectorizer, NaiveBayesModel) {
        let texts = ["win money now", "meeting at noon", "free prize now"];
        let labels = [Label::Spam, Label::Ham, Label::Spam];
        let mut vectorizer = CountVectorizer::new(AnalysisConfig::default()).unwrap();
        let x = vectorizer.fit_transform(&texts).unwrap();
        let model = NaiveBayesTrainer::new().fit(&x, &labels).unwrap();
        (vectorizer, model)
    }

    #[test]
    fn test_save_creates_directory_and_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("nested").join("models"));
        let (vectorizer, model) = trained();

        assert!(!store.exists());
        store.save(&vectorizer, &model).unwrap();

        assert!(store.exists());
        assert!(store.vectorizer_path().ends_with(VECTORIZER_FILE));
        assert!(store.model_path().ends_with(MODEL_FILE));
        // No temporary files are left behind.
        assert_eq!(fs::read_dir(store.directory()).unwrap().count(), 2);
    }

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let (vectorizer, model) = trained();
        store.save(&vectorizer, &model).unwrap();

        let (loaded_vectorizer, loaded_model) = store.load().unwrap();
        assert_eq!(loaded_vectorizer.vocabulary(), vectorizer.vocabulary());
        assert_eq!(loaded_model, model);
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let (vectorizer, model) = trained();
        store.save(&vectorizer, &model).unwrap();

        let mut other = CountVectorizer::new(AnalysisConfig::default()).unwrap();
        let x = other.fit_transform(&["aa bb", "cc dd"]).unwrap();
        let other_model = NaiveBayesTrainer::new()
            .fit(&x, &[Label::Ham, Label::Spam])
            .unwrap();
        store.save(&other, &other_model).unwrap();

        let (loaded, loaded_model) = store.load().unwrap();
        assert_eq!(loaded.vocabulary_size(), 4);
        assert_eq!(loaded_model, other_model);
    }

    #[test]
    fn test_load_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());

        let err = store.load().unwrap_err();
        assert!(matches!(err, SpamGuardError::ArtifactMissing(_)));
        assert!(err.is_recoverable());

        // One file present is still missing.
        let (vectorizer, model) = trained();
        store.save(&vectorizer, &model).unwrap();
        fs::remove_file(store.model_path()).unwrap();
        match store.load().unwrap_err() {
            SpamGuardError::ArtifactMissing(path) => assert_eq!(path, store.model_path()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let (vectorizer, model) = trained();
        store.save(&vectorizer, &model).unwrap();

        fs::write(store.model_path(), b"definitely not a model").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, SpamGuardError::ArtifactCorrupt { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_mismatched_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let (vectorizer, model) = trained();
        store.save(&vectorizer, &model).unwrap();

        // Replace the vectorizer with one of a different vocabulary size.
        let mut other = CountVectorizer::new(AnalysisConfig::default()).unwrap();
        other.fit(&["just two"]).unwrap();
        write_atomic(&store.vectorizer_path(), &other.state().unwrap()).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, SpamGuardError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn test_save_unfitted() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let (_, model) = trained();
        let unfitted = CountVectorizer::new(AnalysisConfig::default()).unwrap();

        let err = store.save(&unfitted, &model).unwrap_err();
        assert!(matches!(err, SpamGuardError::NotFitted(_)));
    }
}
