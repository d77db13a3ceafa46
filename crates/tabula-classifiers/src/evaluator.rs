use crate::config::ImputationPolicy;
use crate::data_handling::Dataset;
use crate::error::TrainingError;
use crate::models::ClassifierModel;
use crate::stats::roc_auc;

/// Scores a fitted model on held-out data by ROC AUC.
#[derive(Debug, Clone)]
pub struct Evaluator {
    imputation: ImputationPolicy,
}

impl Evaluator {
    pub fn new(imputation: ImputationPolicy) -> Self {
        Evaluator { imputation }
    }

    /// AUC of the model's positive-class probabilities on `validation_set`.
    ///
    /// Fails when the subset is empty or holds a single class.
    pub fn evaluate<M: ClassifierModel>(
        &self,
        model: &M,
        validation_set: &Dataset,
    ) -> Result<f64, TrainingError> {
        let input = validation_set.impute(&self.imputation, "validation")?;
        let scores = model.predict_proba(&input.x)?;
        let auc = roc_auc(&scores, &input.y, "validation")?;
        log::info!("Validation AUC: {:.4} on {} rows", auc, input.y.len());
        Ok(auc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::trainer::Trainer;

    #[test]
    fn degenerate_validation_set_fails_loudly() {
        let training = Dataset::from_rows(vec![
            ([1.0, 0.0, 0.0, 0.0], Some(1)),
            ([-1.0, 0.0, 0.0, 0.0], Some(0)),
            ([2.0, 0.0, 0.0, 0.0], Some(1)),
            ([-2.0, 0.0, 0.0, 0.0], Some(0)),
        ]);
        let trainer = Trainer::new(ImputationPolicy::default(), ModelConfig::default());
        let (model, _) = trainer.fit(&training).unwrap();

        let validation = Dataset::from_rows(vec![
            ([1.5, 0.0, 0.0, 0.0], Some(1)),
            ([0.5, 0.0, 0.0, 0.0], Some(1)),
        ]);
        let evaluator = Evaluator::new(ImputationPolicy::default());
        assert_eq!(
            evaluator.evaluate(&model, &validation).unwrap_err(),
            TrainingError::SingleClass {
                subset: "validation",
                class: 1
            }
        );

        let validation = Dataset::from_rows(vec![
            ([1.5, 0.0, 0.0, 0.0], Some(1)),
            ([-0.5, 0.0, 0.0, 0.0], None),
        ]);
        let auc = evaluator.evaluate(&model, &validation).unwrap();
        assert!((auc - 1.0).abs() < 1e-12);
    }
}
