// ============================================================
// Layer 4 — Train/Holdout Splitter
// ============================================================
// Shuffles rows and splits them into two sets:
//   - Training set: used to fit the coefficients
//   - Holdout set:  used to report fit quality on unseen rows
//
// The shuffle is driven by a ChaCha8 generator seeded with a
// fixed value, so the same corpus always yields the same split
// (and therefore the same model) on every platform.
//
// Holdout size is ceil(total * holdout_fraction); the training
// set gets the rest.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used by training runs.
pub const SPLIT_SEED: u64 = 42;

/// Share of rows held out for evaluation.
pub const HOLDOUT_FRACTION: f64 = 0.2;

/// Shuffle `rows` with a generator seeded by `seed` and split them
/// into (train, holdout).
pub fn split_train_holdout<T>(mut rows: Vec<T>, holdout_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rows.shuffle(&mut rng);

    let total    = rows.len();
    // 50 * 0.14 is 7.000000000000001 in f64; shave the error before ceil
    let exact    = (total as f64) * holdout_fraction.clamp(0.0, 1.0);
    let holdout  = (exact - 1e-9).ceil().max(0.0) as usize;
    let split_at = total - holdout.min(total);

    // split_off(n) leaves [0..n) in `rows` and returns [n..total)
    let held_out = rows.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} holdout (seed {})",
        rows.len(),
        held_out.len(),
        seed,
    );

    (rows, held_out)
}
