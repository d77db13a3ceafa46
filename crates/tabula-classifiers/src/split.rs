//! Seeded train/validation partitioning.
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::data_handling::Dataset;
use crate::error::ArgumentError;

/// Disjoint, exhaustive partition of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub training_set: Dataset,
    pub validation_set: Dataset,
}

/// Number of validation rows drawn for `len` rows at `validation_fraction`.
pub fn validation_size(len: usize, validation_fraction: f64) -> usize {
    ((len as f64 * validation_fraction).round() as usize).min(len)
}

/// Partition `dataset` into training and validation subsets.
///
/// `round(len * validation_fraction)` row positions are drawn without
/// replacement from a generator seeded with `seed`; they form the validation
/// set and the rest form the training set. Both keep the input row order. The
/// same `(dataset, validation_fraction, seed)` always gives the same split.
pub fn split(
    dataset: &Dataset,
    validation_fraction: f64,
    seed: u64,
) -> Result<Split, ArgumentError> {
    if !(validation_fraction > 0.0 && validation_fraction < 1.0) {
        return Err(ArgumentError::InvalidFraction(validation_fraction));
    }

    let n = dataset.len();
    let n_validation = validation_size(n, validation_fraction);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut is_validation = vec![false; n];
    for position in index::sample(&mut rng, n, n_validation).into_vec() {
        is_validation[position] = true;
    }

    let (validation, training): (Vec<usize>, Vec<usize>) =
        (0..n).partition(|&position| is_validation[position]);

    if training.is_empty() || validation.is_empty() {
        log::warn!(
            "Split of {} rows at fraction {} left an empty subset ({} training, {} validation)",
            n,
            validation_fraction,
            training.len(),
            validation.len()
        );
    }

    Ok(Split {
        training_set: dataset.select(&training),
        validation_set: dataset.select(&validation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Dataset {
        Dataset::from_rows((0..n).map(|i| ([i as f64, 0.0, 0.0, 0.0], Some((i % 2) as u8))))
    }

    #[test]
    fn validation_size_rounds() {
        assert_eq!(validation_size(1000, 0.25), 250);
        assert_eq!(validation_size(10, 0.25), 3);
        assert_eq!(validation_size(3, 0.1), 0);
        assert_eq!(validation_size(0, 0.5), 0);
    }

    #[test]
    fn subsets_keep_input_order() {
        let split = split(&numbered(40), 0.3, 11).unwrap();
        for subset in [&split.training_set, &split.validation_set] {
            assert!(subset.row_index.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn different_seeds_usually_differ() {
        let data = numbered(200);
        let a = split(&data, 0.25, 1).unwrap();
        let b = split(&data, 0.25, 2).unwrap();
        assert_ne!(a.validation_set.row_index, b.validation_set.row_index);
    }

    #[test]
    fn tiny_fraction_may_leave_validation_empty() {
        let split = split(&numbered(3), 0.1, 1).unwrap();
        assert!(split.validation_set.is_empty());
        assert_eq!(split.training_set.len(), 3);
    }

    #[test]
    fn rejects_fraction_outside_open_interval() {
        assert!(split(&numbered(4), 0.0, 1).is_err());
        assert!(split(&numbered(4), 1.0, 1).is_err());
    }
}
