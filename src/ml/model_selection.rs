//! Train/test splitting.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, SpamGuardError};

/// Fraction of rows held out for evaluation by default.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Seed used for the split by default.
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    /// Rows used for fitting.
    pub train: Vec<usize>,
    /// Rows held out for evaluation.
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Pick the rows of `items` belonging to each partition.
    pub fn apply<T: Clone>(&self, items: &[T]) -> (Vec<T>, Vec<T>) {
        let pick = |indices: &[usize]| -> Vec<T> {
            indices.iter().map(|&i| items[i].clone()).collect()
        };
        (pick(&self.train), pick(&self.test))
    }
}

/// Shuffle `n_samples` row indices with a seeded RNG and cut them into a
/// training and a test partition.
///
/// The test partition has `ceil(n_samples * test_size)` rows. Both partitions
/// must end up non-empty, and `test_size` must lie strictly between 0 and 1.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(SpamGuardError::invalid_argument(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(SpamGuardError::insufficient_data(format!(
            "cannot split {n_samples} rows with test_size {test_size}: \
             both partitions need at least one row"
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices.split_off(n_samples - n_test);
    log::debug!(
        "Split {} rows into {} train / {} test (seed {})",
        n_samples,
        indices.len(),
        test.len(),
        seed
    );

    Ok(TrainTestSplit {
        train: indices,
        test,
    })
}
