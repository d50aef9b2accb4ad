//! Seeded train/test split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `rows` with a seeded RNG and split off the test portion.
///
/// The test split holds `ceil(n * test_size)` rows (never more than `n`),
/// the train split the rest. Identical inputs and seed yield identical splits.
pub fn train_test_split<T>(mut rows: Vec<T>, test_size: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let n = rows.len();
    let n_test = ((n as f64) * test_size).ceil().clamp(0.0, n as f64) as usize;

    let mut rng = StdRng::seed_from_u64(seed);
    rows.shuffle(&mut rng);

    let train = rows.split_off(n_test);
    (train, rows)
}
