//! Binary logistic regression
//!
//! Batch gradient descent on the mean log-loss, regularized with strength
//! `1 / C` (the same convention as liblinear: larger `C`, weaker penalty).

use contracts::ModelParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{LearnError, Result};

/// Regularization penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Penalty {
    L1,
    L2,
    None,
}

/// Classifier hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularization strength, > 0
    pub c: f64,
    pub penalty: Penalty,
    /// Recorded for provenance; gradient descent is always used
    pub solver: String,
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Stop once no coefficient moves by more than this
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            penalty: Penalty::L2,
            solver: "gradient_descent".to_string(),
            max_iter: 1000,
            learning_rate: 0.1,
            tol: 1e-6,
        }
    }
}

impl LogisticParams {
    /// Interpret the opaque `model_params` mapping.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    /// Unknown keys and out-of-range values
    pub fn from_model_params(params: &ModelParams) -> Result<Self> {
        let mut out = Self::default();
        for (key, value) in params {
            match key.as_str() {
                "C" => out.c = positive_f64(key, value)?,
                "penalty" => out.penalty = parse_penalty(key, value)?,
                "solver" => out.solver = as_str(key, value)?.to_string(),
                "max_iter" => {
                    out.max_iter = value
                        .as_u64()
                        .filter(|v| *v > 0)
                        .ok_or_else(|| {
                            LearnError::invalid_param(key, "expected a positive integer")
                        })? as usize
                }
                "learning_rate" => out.learning_rate = positive_f64(key, value)?,
                "tol" => {
                    out.tol = value
                        .as_f64()
                        .filter(|v| *v >= 0.0)
                        .ok_or_else(|| {
                            LearnError::invalid_param(key, "expected a non-negative number")
                        })?
                }
                other => return Err(LearnError::UnknownParam(other.to_string())),
            }
        }
        Ok(out)
    }
}

fn positive_f64(key: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| {
            LearnError::invalid_param(key, format!("expected a positive number, got {value}"))
        })
}

fn as_str<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| LearnError::invalid_param(key, format!("expected a string, got {value}")))
}

fn parse_penalty(key: &str, value: &Value) -> Result<Penalty> {
    match as_str(key, value)?.to_lowercase().as_str() {
        "l1" => Ok(Penalty::L1),
        "l2" => Ok(Penalty::L2),
        "none" => Ok(Penalty::None),
        other => Err(LearnError::invalid_param(
            key,
            format!("expected one of l1, l2, none; got '{other}'"),
        )),
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Fitted binary classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    bias: f64,
    params: LogisticParams,
    /// Iterations run before convergence or `max_iter`
    n_iter: usize,
}

impl LogisticRegression {
    /// Fit on feature rows `x` with labels `y` in {0, 1}.
    pub fn fit(x: &[Vec<f64>], y: &[u8], params: LogisticParams) -> Result<Self> {
        if x.is_empty() {
            return Err(LearnError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(LearnError::LengthMismatch {
                left: x.len(),
                right: y.len(),
            });
        }
        let n_features = x[0].len();
        if let Some(row) = x.iter().find(|row| row.len() != n_features) {
            return Err(LearnError::DimensionMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }

        let n = x.len() as f64;
        let lr = params.learning_rate;
        let reg = 1.0 / (params.c * n);
        let mut weights = vec![0.0; n_features];
        let mut bias = 0.0;
        let mut n_iter = 0;

        for _ in 0..params.max_iter {
            n_iter += 1;
            let mut grad_w = vec![0.0; n_features];
            let mut grad_b = 0.0;
            for (row, &label) in x.iter().zip(y) {
                let err = sigmoid(dot(&weights, row) + bias) - f64::from(label);
                for (g, v) in grad_w.iter_mut().zip(row) {
                    *g += err * v;
                }
                grad_b += err;
            }

            let mut max_step = (lr * grad_b / n).abs();
            bias -= lr * grad_b / n;
            for (w, g) in weights.iter_mut().zip(&grad_w) {
                let mut grad = g / n;
                if params.penalty == Penalty::L2 {
                    grad += reg * *w;
                }
                let mut next = *w - lr * grad;
                if params.penalty == Penalty::L1 {
                    // proximal step
                    let threshold = lr * reg;
                    next = next.signum() * (next.abs() - threshold).max(0.0);
                }
                max_step = max_step.max((next - *w).abs());
                *w = next;
            }

            if max_step < params.tol {
                debug!(n_iter, "Gradient descent converged");
                break;
            }
        }

        info!(
            samples = x.len(),
            features = n_features,
            n_iter,
            penalty = ?params.penalty,
            "Logistic regression fitted"
        );
        Ok(Self {
            weights,
            bias,
            params,
            n_iter,
        })
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn params(&self) -> &LogisticParams {
        &self.params
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.weights.len() {
            return Err(LearnError::DimensionMismatch {
                expected: self.weights.len(),
                actual: row.len(),
            });
        }
        Ok(sigmoid(dot(&self.weights, row) + self.bias))
    }

    /// Class label, 1 when the positive probability is at least 0.5
    pub fn predict(&self, row: &[f64]) -> Result<u8> {
        Ok(u8::from(self.predict_proba(row)? >= 0.5))
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn separable() -> (Vec<Vec<f64>>, Vec<u8>) {
        // feature 0 counts "good", feature 1 counts "bad"
        let x = vec![
            vec![2.0, 0.0],
            vec![1.0, 0.0],
            vec![3.0, 1.0],
            vec![0.0, 2.0],
            vec![0.0, 1.0],
            vec![1.0, 3.0],
        ];
        let y = vec![1, 1, 1, 0, 0, 0];
        (x, y)
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, LogisticParams::default()).unwrap();
        for (row, label) in x.iter().zip(&y) {
            assert_eq!(model.predict(row).unwrap(), *label);
        }
        assert!(model.predict_proba(&[4.0, 0.0]).unwrap() > 0.5);
    }

    #[test]
    fn test_l1_and_no_penalty_fit() {
        let (x, y) = separable();
        for penalty in [Penalty::L1, Penalty::None] {
            let params = LogisticParams {
                penalty,
                ..Default::default()
            };
            let model = LogisticRegression::fit(&x, &y, params).unwrap();
            assert_eq!(model.predict(&[3.0, 0.0]).unwrap(), 1);
            assert_eq!(model.predict(&[0.0, 3.0]).unwrap(), 0);
        }
    }

    #[test]
    fn test_dimension_checked_at_predict() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, LogisticParams::default()).unwrap();
        assert!(matches!(
            model.predict(&[1.0]),
            Err(LearnError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_empty_training_set() {
        assert!(matches!(
            LogisticRegression::fit(&[], &[], LogisticParams::default()),
            Err(LearnError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_params_from_model_params() {
        let mut mp = ModelParams::new();
        mp.insert("C".into(), json!(0.5));
        mp.insert("penalty".into(), json!("L1"));
        mp.insert("solver".into(), json!("liblinear"));
        mp.insert("max_iter".into(), json!(200));
        let params = LogisticParams::from_model_params(&mp).unwrap();
        assert_eq!(params.c, 0.5);
        assert_eq!(params.penalty, Penalty::L1);
        assert_eq!(params.solver, "liblinear");
        assert_eq!(params.max_iter, 200);
        assert_eq!(params.tol, 1e-6);
    }

    #[test]
    fn test_integer_c_accepted() {
        let mut mp = ModelParams::new();
        mp.insert("C".into(), json!(2));
        assert_eq!(LogisticParams::from_model_params(&mp).unwrap().c, 2.0);
    }

    #[test]
    fn test_unknown_param_rejected() {
        let mut mp = ModelParams::new();
        mp.insert("gamma".into(), json!(0.1));
        assert!(matches!(
            LogisticParams::from_model_params(&mp),
            Err(LearnError::UnknownParam(name)) if name == "gamma"
        ));
    }

    #[test]
    fn test_non_positive_c_rejected() {
        let mut mp = ModelParams::new();
        mp.insert("C".into(), json!(0.0));
        assert!(LogisticParams::from_model_params(&mp).is_err());
    }
}
