use std::fs;
use std::io::Write;

use spamguard::analysis::config::AnalysisConfig;
use spamguard::classifier::{SharedClassifier, SpamClassifier};
use spamguard::config::SpamConfig;
use spamguard::corpus::Corpus;
use spamguard::error::{Result, SpamGuardError};
use spamguard::ml::{CountVectorizer, Label, NaiveBayesTrainer, accuracy};
use spamguard::pipeline;
use spamguard::storage::ArtifactStore;
use tempfile::TempDir;

fn sample_corpus() -> Corpus {
    Corpus::from_rows(vec![
        ("win money now", Label::Spam),
        ("meeting at noon", Label::Ham),
        ("free prize claim now", Label::Spam),
        ("lunch schedule update", Label::Ham),
    ])
}

fn fit_all(corpus: &Corpus) -> Result<SpamClassifier> {
    let mut vectorizer = CountVectorizer::new(AnalysisConfig::default())?;
    let x = vectorizer.fit_transform(&corpus.texts())?;
    let model = NaiveBayesTrainer::new().fit(&x, &corpus.labels())?;
    SpamClassifier::new(vectorizer, model)
}

#[test]
fn small_corpus_separates_spam_from_ham() -> Result<()> {
    let classifier = fit_all(&sample_corpus())?;

    assert_eq!(classifier.vectorizer().vocabulary_size(), 12);
    assert_eq!(classifier.classify("free money now")?.label, Label::Spam);
    assert_eq!(
        classifier.classify("schedule lunch meeting")?.label,
        Label::Ham
    );
    Ok(())
}

#[test]
fn training_accuracy_beats_majority_baseline() -> Result<()> {
    let corpus = Corpus::from_rows(vec![
        ("cheap pills online now", Label::Spam),
        ("quarterly report attached", Label::Ham),
        ("team meeting moved to friday", Label::Ham),
        ("you won a free cruise", Label::Spam),
        ("notes from the design review", Label::Ham),
        ("click here for free money", Label::Spam),
        ("can we reschedule our call", Label::Ham),
    ]);
    let classifier = fit_all(&corpus)?;

    let predicted = classifier.predict(&corpus.texts())?;
    let training_accuracy = accuracy(&corpus.labels(), &predicted)?;
    let [ham, spam] = corpus.class_counts();
    let baseline = ham.max(spam) as f64 / corpus.len() as f64;

    assert!(training_accuracy > baseline);
    Ok(())
}

#[test]
fn saved_classifier_behaves_like_the_original() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = ArtifactStore::new(temp_dir.path().join("models"));
    let original = fit_all(&sample_corpus())?;
    original.save(&store)?;

    let loaded = SpamClassifier::load(&store)?;
    assert_eq!(loaded.vectorizer().vocabulary(), original.vectorizer().vocabulary());
    assert_eq!(loaded.model(), original.model());

    for text in ["free money now", "schedule lunch meeting", "nothing known", ""] {
        assert_eq!(
            loaded.vectorizer().transform_one(text)?,
            original.vectorizer().transform_one(text)?
        );
        assert_eq!(loaded.classify(text)?, original.classify(text)?);
    }
    Ok(())
}

#[test]
fn unknown_words_produce_zero_vector() -> Result<()> {
    let classifier = fit_all(&sample_corpus())?;

    let x = classifier.vectorizer().transform_one("xylophone quartz")?;
    assert_eq!(x.len(), 12);
    assert!(x.is_zero());

    let first = classifier.classify("xylophone quartz")?;
    let second = classifier.classify("xylophone quartz")?;
    assert_eq!(first, second);
    // Balanced classes: the tie resolves to ham.
    assert_eq!(first.label, Label::Ham);
    Ok(())
}

#[test]
fn empty_model_directory_reports_missing_artifacts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = ArtifactStore::new(temp_dir.path());

    let err = SpamClassifier::load(&store).unwrap_err();
    assert!(matches!(err, SpamGuardError::ArtifactMissing(_)));
    assert!(err.is_recoverable());
    Ok(())
}

#[test]
fn truncated_artifact_is_reported_as_corrupt() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = ArtifactStore::new(temp_dir.path());
    fit_all(&sample_corpus())?.save(&store)?;

    let bytes = fs::read(store.vectorizer_path())?;
    fs::write(store.vectorizer_path(), &bytes[..bytes.len() / 2])?;

    let err = SpamClassifier::load(&store).unwrap_err();
    assert!(matches!(err, SpamGuardError::ArtifactCorrupt { .. }));
    Ok(())
}

#[test]
fn train_from_csv_then_reload_shared_classifier() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_path = temp_dir.path().join("emails.csv");
    let mut file = fs::File::create(&data_path)?;
    writeln!(file, "text,spam")?;
    for i in 0..10 {
        writeln!(file, "\"Subject: free prize {i}, claim now\",1")?;
        writeln!(file, "\"Subject: meeting notes {i}\",0")?;
    }
    drop(file);

    let config = SpamConfig {
        data_path,
        model_dir: temp_dir.path().join("models"),
        ..SpamConfig::default()
    };
    let report = pipeline::train(&config)?;
    assert_eq!(report.corpus_size, 20);
    assert_eq!(report.test_size, 4);
    assert_eq!(report.report.weighted_avg.support, 4);

    let store = ArtifactStore::new(&config.model_dir);
    let shared = SharedClassifier::load(&store)?;
    assert_eq!(shared.classify("claim your free prize")?.label, Label::Spam);

    // Retraining replaces the artifacts; readers pick them up on reload.
    let before = shared.current();
    pipeline::train(&SpamConfig {
        random_seed: 7,
        ..config.clone()
    })?;
    shared.reload(&store)?;
    assert!(!std::sync::Arc::ptr_eq(&before, &shared.current()));
    assert_eq!(shared.classify("meeting notes")?.label, Label::Ham);
    Ok(())
}
