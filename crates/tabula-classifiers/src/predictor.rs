//! Inference path: validate a request, impute, score.
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::config::{ImputationPolicy, FEATURE_COLUMNS};
use crate::error::{DataError, PipelineError, TrainingError, ValidationError};
use crate::io::load_model;
use crate::math::Array2;
use crate::models::{ClassifierModel, LogisticRegression};
use crate::validation::{validate, ValidatedRecord, PREDICT};

/// A validated `predict` request.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub id: String,
    /// Feature values in [`FEATURE_COLUMNS`] order; `NaN` marks a missing value.
    pub features: [f64; 4],
}

impl TryFrom<&ValidatedRecord> for PredictRequest {
    type Error = ValidationError;

    fn try_from(record: &ValidatedRecord) -> Result<Self, Self::Error> {
        let id = record
            .text("id")
            .ok_or_else(|| ValidationError::MissingField("id".to_string()))?
            .to_string();
        let mut features = [0.0; 4];
        for (slot, column) in features.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = record
                .float(column)
                .ok_or_else(|| ValidationError::MissingField(column.to_string()))?;
        }
        Ok(PredictRequest { id, features })
    }
}

impl PredictRequest {
    /// Validate a raw JSON record against the `predict` schema.
    pub fn from_json(record: &Value) -> Result<Self, ValidationError> {
        PredictRequest::try_from(&validate(PREDICT, record)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub id: String,
    /// Probability of the positive class.
    pub probability: f64,
}

/// A fitted model plus the imputation policy it was trained with.
#[derive(Debug, Clone)]
pub struct Predictor<M = LogisticRegression> {
    model: M,
    imputation: ImputationPolicy,
}

impl Predictor<LogisticRegression> {
    /// Load a persisted logistic model.
    pub fn from_artifact<P: AsRef<Path>>(
        path: P,
        imputation: ImputationPolicy,
    ) -> Result<Self, PipelineError> {
        let model: LogisticRegression = load_model(path)?;
        if !model.is_fitted() {
            return Err(TrainingError::NotFitted.into());
        }
        Ok(Predictor::new(model, imputation))
    }
}

impl<M: ClassifierModel> Predictor<M> {
    pub fn new(model: M, imputation: ImputationPolicy) -> Self {
        Predictor { model, imputation }
    }

    /// Validate `record` and return the positive-class probability.
    pub fn predict(&self, record: &Value) -> Result<Prediction, PipelineError> {
        let request = PredictRequest::from_json(record)?;
        self.predict_request(&request)
    }

    pub fn predict_request(&self, request: &PredictRequest) -> Result<Prediction, PipelineError> {
        let mut row = request.features;
        for (value, column) in row.iter_mut().zip(FEATURE_COLUMNS) {
            if value.is_finite() {
                continue;
            }
            *value = match self.imputation.fill_for(column) {
                Some(fill) if value.is_nan() => fill,
                _ => {
                    return Err(ValidationError::Coercion {
                        field: column.to_string(),
                        value: value.to_string(),
                        expected: "finite float",
                    }
                    .into())
                }
            };
        }

        let x = Array2::from_shape_vec((1, row.len()), row.to_vec()).map_err(DataError::from)?;
        let probability = self
            .model
            .predict_proba(&x)?
            .first()
            .copied()
            .ok_or(TrainingError::NotFitted)?;

        Ok(Prediction {
            id: request.id.clone(),
            probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_from_json_keeps_feature_order() {
        let request = PredictRequest::from_json(
            &json!({"id": "abc", "x_4": 4, "x_3": 3, "x_2": 2, "x_1": "1"}),
        )
        .unwrap();
        assert_eq!(request.id, "abc");
        assert_eq!(request.features, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn unfitted_model_is_reported_as_model_failure() {
        let predictor = Predictor::new(
            LogisticRegression::new(Default::default()),
            ImputationPolicy::default(),
        );
        let err = predictor
            .predict(&json!({"id": "a", "x_1": 0, "x_2": 0, "x_3": 0, "x_4": 0}))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Training(TrainingError::NotFitted)));
    }
}
