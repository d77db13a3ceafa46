use crate::config::{ImputationPolicy, ModelConfig};
use crate::data_handling::Dataset;
use crate::error::TrainingError;
use crate::models::{ClassifierModel, FitSummary, LogisticRegression};

/// Fits a classifier on an imputed training subset.
#[derive(Debug, Clone)]
pub struct Trainer {
    imputation: ImputationPolicy,
    model: ModelConfig,
}

impl Trainer {
    pub fn new(imputation: ImputationPolicy, model: ModelConfig) -> Self {
        Trainer { imputation, model }
    }

    /// Fit the configured logistic regression.
    pub fn fit(
        &self,
        training_set: &Dataset,
    ) -> Result<(LogisticRegression, FitSummary), TrainingError> {
        self.fit_model(LogisticRegression::new(self.model.clone()), training_set)
    }

    /// Fit any classifier with the trainer's imputation policy.
    pub fn fit_model<M: ClassifierModel>(
        &self,
        mut model: M,
        training_set: &Dataset,
    ) -> Result<(M, FitSummary), TrainingError> {
        let input = training_set.impute(&self.imputation, "training")?;
        input.require_both_classes("training")?;

        let summary = model.fit(&input.x, &input.y)?;
        log::info!(
            "Fitted {} on {} rows in {} iterations",
            model.name(),
            input.x.nrows(),
            summary.iterations
        );
        Ok((model, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_class_training_set_is_rejected() {
        let data = Dataset::from_rows(vec![
            ([1.0, 2.0, 3.0, 4.0], Some(0)),
            ([2.0, 3.0, 4.0, 5.0], None),
        ]);
        let trainer = Trainer::new(ImputationPolicy::default(), ModelConfig::default());
        assert_eq!(
            trainer.fit(&data).unwrap_err(),
            TrainingError::SingleClass {
                subset: "training",
                class: 0
            }
        );
    }

    #[test]
    fn missing_x1_is_imputed_before_fitting() {
        let data = Dataset::from_rows(vec![
            ([f64::NAN, 0.2, 0.1, 0.0], Some(1)),
            ([400.0, -0.3, 0.2, 0.1], Some(0)),
            ([430.0, 0.4, -0.1, 0.3], Some(1)),
            ([410.0, -0.2, 0.0, -0.2], Some(0)),
        ]);
        let trainer = Trainer::new(ImputationPolicy::default(), ModelConfig::default());
        let (model, _) = trainer.fit(&data).unwrap();
        assert!(model.is_fitted());
    }
}
