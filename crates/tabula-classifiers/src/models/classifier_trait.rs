use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TrainingError;
use crate::math::Array2;

/// Outcome of a successful fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitSummary {
    /// Solver iterations used.
    pub iterations: usize,
}

/// The capability the trainer, evaluator and persister rely on: a binary
/// classifier that can be fitted, asked for positive-class probabilities and
/// serialized. Labels use 0 for the negative and 1 for the positive class.
pub trait ClassifierModel: Serialize + DeserializeOwned {
    fn fit(&mut self, x: &Array2<f64>, y: &[u8]) -> Result<FitSummary, TrainingError>;

    /// Probability of the positive class for every row of `x`.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>, TrainingError>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
