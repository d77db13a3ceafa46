use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::TrainingError;
use crate::math::{dot, log1p_exp, sigmoid, solve, Array2};
use crate::models::classifier_trait::{ClassifierModel, FitSummary};

/// Sufficient-decrease constant for the backtracking line search.
const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-10;

/// L2-regularized logistic regression.
///
/// Minimizes `0.5 * |w|^2 + C * sum(logloss)` with an unpenalized intercept,
/// using Newton steps with backtracking. Running out of iterations is an
/// error, never a silently returned half-fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: ModelConfig,
    coefficients: Option<Vec<f64>>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(config: ModelConfig) -> Self {
        LogisticRegression {
            config,
            coefficients: None,
            intercept: 0.0,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Number of optimized parameters: one per feature plus the intercept.
    fn dim(&self, n_features: usize) -> usize {
        n_features + usize::from(self.config.fit_intercept)
    }

    fn margin(&self, theta: &[f64], row: &[f64]) -> f64 {
        let p = row.len();
        let bias = if self.config.fit_intercept { theta[p] } else { 0.0 };
        dot(&theta[..p], row) + bias
    }

    fn objective(&self, theta: &[f64], x: &Array2<f64>, y: &[u8]) -> f64 {
        let p = x.ncols();
        let penalty = 0.5 * dot(&theta[..p], &theta[..p]);
        let loss: f64 = x
            .rows()
            .zip(y)
            .map(|(row, &label)| {
                let z = self.margin(theta, row);
                log1p_exp(z) - f64::from(label) * z
            })
            .sum();
        penalty + self.config.inverse_regularization * loss
    }

    /// Gradient and row-major Hessian of the objective at `theta`.
    fn derivatives(&self, theta: &[f64], x: &Array2<f64>, y: &[u8]) -> (Vec<f64>, Vec<f64>) {
        let p = x.ncols();
        let d = self.dim(p);
        let c = self.config.inverse_regularization;

        let mut grad = vec![0.0; d];
        let mut hess = vec![0.0; d * d];
        grad[..p].copy_from_slice(&theta[..p]);
        for j in 0..p {
            hess[j * d + j] = 1.0;
        }

        let mut extended = vec![1.0; d];
        for (row, &label) in x.rows().zip(y) {
            extended[..p].copy_from_slice(row);
            let prob = sigmoid(self.margin(theta, row));
            let residual = c * (prob - f64::from(label));
            let weight = c * prob * (1.0 - prob);
            for j in 0..d {
                grad[j] += residual * extended[j];
                let wj = weight * extended[j];
                for k in j..d {
                    hess[j * d + k] += wj * extended[k];
                }
            }
        }
        for j in 0..d {
            for k in 0..j {
                hess[j * d + k] = hess[k * d + j];
            }
        }
        (grad, hess)
    }

    fn store(&mut self, theta: &[f64], n_features: usize) {
        self.coefficients = Some(theta[..n_features].to_vec());
        self.intercept = if self.config.fit_intercept {
            theta[n_features]
        } else {
            0.0
        };
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

impl ClassifierModel for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &[u8]) -> Result<FitSummary, TrainingError> {
        if x.nrows() != y.len() {
            return Err(TrainingError::LabelMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(TrainingError::EmptySubset("training"));
        }

        let p = x.ncols();
        let d = self.dim(p);
        let mut theta = vec![0.0; d];
        let mut value = self.objective(&theta, x, y);

        for iteration in 0..self.config.max_iterations {
            let (grad, hess) = self.derivatives(&theta, x, y);
            let gradient_norm = max_abs(&grad);
            log::debug!(
                "Newton iteration {}: objective {:.6}, max |gradient| {:.3e}",
                iteration,
                value,
                gradient_norm
            );
            if gradient_norm <= self.config.tolerance {
                self.store(&theta, p);
                return Ok(FitSummary { iterations: iteration });
            }

            let direction = solve(hess, grad.clone())
                .ok_or(TrainingError::SingularHessian(iteration))?;
            let slope = dot(&grad, &direction);

            let mut step = 1.0;
            loop {
                let candidate: Vec<f64> = theta
                    .iter()
                    .zip(&direction)
                    .map(|(t, dir)| t - step * dir)
                    .collect();
                let candidate_value = self.objective(&candidate, x, y);
                if candidate_value <= value - ARMIJO * step * slope || step < MIN_STEP {
                    theta = candidate;
                    value = candidate_value;
                    break;
                }
                step *= 0.5;
            }
        }

        let (grad, _) = self.derivatives(&theta, x, y);
        let gradient_norm = max_abs(&grad);
        if gradient_norm <= self.config.tolerance {
            self.store(&theta, p);
            return Ok(FitSummary {
                iterations: self.config.max_iterations,
            });
        }

        Err(TrainingError::NotConverged {
            iterations: self.config.max_iterations,
            gradient_norm,
        })
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>, TrainingError> {
        let coefficients = self.coefficients.as_ref().ok_or(TrainingError::NotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(TrainingError::FeatureMismatch {
                expected: coefficients.len(),
                actual: x.ncols(),
            });
        }
        Ok(x
            .rows()
            .map(|row| sigmoid(dot(coefficients, row) + self.intercept))
            .collect())
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (Array2<f64>, Vec<u8>) {
        // class 1 when the first feature is large, with one overlapping point
        let x = Array2::from_shape_vec(
            (8, 2),
            vec![
                0.1, 1.0, //
                0.3, -1.0, //
                0.4, 0.5, //
                0.9, 0.2, //
                1.1, -0.3, //
                1.6, 0.8, //
                2.0, -0.6, //
                2.4, 0.1, //
            ],
        )
        .unwrap();
        let y = vec![0, 0, 0, 1, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn fit_orders_probabilities_by_signal() {
        let (x, y) = toy();
        let mut model = LogisticRegression::new(ModelConfig {
            inverse_regularization: 10.0,
            ..ModelConfig::default()
        });
        let summary = model.fit(&x, &y).unwrap();
        assert!(summary.iterations <= 100);

        let coefficients = model.coefficients().unwrap();
        assert!(coefficients[0] > 0.0, "coefficients: {:?}", coefficients);

        let probs = model.predict_proba(&x).unwrap();
        assert_eq!(probs.len(), 8);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!(probs[7] > probs[0]);
    }

    #[test]
    fn strong_regularization_leaves_only_the_base_rate() {
        let (x, _) = toy();
        let y = vec![1, 0, 0, 0, 1, 0, 0, 0];
        let mut model = LogisticRegression::new(ModelConfig {
            inverse_regularization: 1e-8,
            tolerance: 1e-12,
            ..ModelConfig::default()
        });
        model.fit(&x, &y).unwrap();
        for p in model.predict_proba(&x).unwrap() {
            assert!((p - 0.25).abs() < 1e-3, "p = {}", p);
        }
    }

    #[test]
    fn exhausted_budget_is_an_error() {
        let (x, y) = toy();
        let mut model = LogisticRegression::new(ModelConfig {
            max_iterations: 1,
            tolerance: 1e-14,
            ..ModelConfig::default()
        });
        let err = model.fit(&x, &y).unwrap_err();
        assert!(matches!(err, TrainingError::NotConverged { iterations: 1, .. }));
        assert!(!model.is_fitted());
    }

    #[test]
    fn predict_requires_fit_and_matching_width() {
        let (x, y) = toy();
        let mut model = LogisticRegression::new(ModelConfig::default());
        assert_eq!(model.predict_proba(&x).unwrap_err(), TrainingError::NotFitted);

        model.fit(&x, &y).unwrap();
        let wide = Array2::from_shape_vec((1, 3), vec![0.0, 0.0, 0.0]).unwrap();
        assert_eq!(
            model.predict_proba(&wide).unwrap_err(),
            TrainingError::FeatureMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn label_count_must_match_rows() {
        let (x, _) = toy();
        let mut model = LogisticRegression::new(ModelConfig::default());
        assert!(matches!(
            model.fit(&x, &[0, 1]),
            Err(TrainingError::LabelMismatch { rows: 8, labels: 2 })
        ));
    }
}
