//! In-memory dataset and the imputation step that turns it into model input.
//!
//! Missing feature values are stored as `NaN`; missing labels as `None`. Each
//! row keeps the index it had in the source file so splits can be audited.
use crate::config::{ImputationPolicy, FEATURE_COLUMNS};
use crate::error::{DataError, TrainingError};
use crate::math::Array2;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Position of each row in the original file.
    pub row_index: Vec<usize>,
    /// Feature matrix, columns in [`FEATURE_COLUMNS`] order.
    pub x: Array2<f64>,
    /// Binary labels, `None` when missing.
    pub target: Vec<Option<u8>>,
}

/// Fully imputed features and labels, ready for fitting or scoring.
#[derive(Debug, Clone)]
pub struct ModelInput {
    pub x: Array2<f64>,
    pub y: Vec<u8>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, target: Vec<Option<u8>>) -> Result<Self, DataError> {
        if x.ncols() != FEATURE_COLUMNS.len() {
            return Err(DataError::ColumnCount {
                expected: FEATURE_COLUMNS.len(),
                actual: x.ncols(),
            });
        }
        if x.nrows() != target.len() {
            return Err(DataError::LengthMismatch {
                features: x.nrows(),
                targets: target.len(),
            });
        }
        Ok(Dataset {
            row_index: (0..target.len()).collect(),
            x,
            target,
        })
    }

    /// Build a dataset from `(features, target)` rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = ([f64; 4], Option<u8>)>,
    {
        let mut features = Vec::new();
        let mut target = Vec::new();
        for (row, label) in rows {
            features.extend_from_slice(&row);
            target.push(label);
        }
        let n = target.len();
        let x = Array2::from_shape_vec((n, FEATURE_COLUMNS.len()), features)
            .unwrap_or_else(|_| Array2::empty(FEATURE_COLUMNS.len()));
        Dataset {
            row_index: (0..n).collect(),
            x,
            target,
        }
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Rows at the given positions, keeping their original row index.
    pub fn select(&self, positions: &[usize]) -> Dataset {
        Dataset {
            row_index: positions.iter().map(|&p| self.row_index[p]).collect(),
            x: self.x.select_rows(positions),
            target: positions.iter().map(|&p| self.target[p]).collect(),
        }
    }

    /// Counts of (negative, positive, missing) labels.
    pub fn class_counts(&self) -> (usize, usize, usize) {
        self.target
            .iter()
            .fold((0, 0, 0), |(neg, pos, missing), label| match label {
                Some(0) => (neg + 1, pos, missing),
                Some(_) => (neg, pos + 1, missing),
                None => (neg, pos, missing + 1),
            })
    }

    pub fn log_summary(&self, name: &str) {
        let (neg, pos, missing) = self.class_counts();
        log::info!(
            "{} set has {} rows ({} positive, {} negative, {} unlabeled)",
            name,
            self.len(),
            pos,
            neg,
            missing
        );
    }

    /// Apply the imputation policy. `subset` names the data in error messages.
    pub fn impute(
        &self,
        policy: &ImputationPolicy,
        subset: &'static str,
    ) -> Result<ModelInput, TrainingError> {
        if self.is_empty() {
            return Err(TrainingError::EmptySubset(subset));
        }

        let fills: Vec<Option<f64>> = FEATURE_COLUMNS
            .iter()
            .map(|column| policy.fill_for(column))
            .collect();

        let mut x = self.x.clone();
        let mut imputed = 0usize;
        for row in 0..x.nrows() {
            for (col, fill) in fills.iter().enumerate() {
                if !x[(row, col)].is_nan() {
                    continue;
                }
                match fill {
                    Some(value) => {
                        x[(row, col)] = *value;
                        imputed += 1;
                    }
                    None => {
                        return Err(TrainingError::MissingValue {
                            column: FEATURE_COLUMNS[col].to_string(),
                            row: self.row_index[row],
                        })
                    }
                }
            }
        }

        let y: Vec<u8> = self
            .target
            .iter()
            .map(|label| label.unwrap_or(policy.target_fill))
            .collect();

        if imputed > 0 {
            log::debug!("Imputed {} missing feature values in {} subset", imputed, subset);
        }

        Ok(ModelInput { x, y })
    }
}

impl ModelInput {
    /// Fail unless both classes are present.
    pub fn require_both_classes(&self, subset: &'static str) -> Result<(), TrainingError> {
        let positives = self.y.iter().filter(|&&v| v == 1).count();
        if positives == 0 {
            return Err(TrainingError::SingleClass { subset, class: 0 });
        }
        if positives == self.y.len() {
            return Err(TrainingError::SingleClass { subset, class: 1 });
        }
        Ok(())
    }
}
