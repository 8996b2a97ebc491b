//! Statistical helpers for score calibration
//!
//! Sigmoid fitting follows Platt, "Probabilistic Outputs for Support Vector
//! Machines" (1999), with the Newton method and backtracking line search of
//! Lin, Lin and Weng, "A Note on Platt's Probabilistic Outputs for Support
//! Vector Machines" (2007).
//!
//! The fitted model is P(y = +1 | f) = 1 / (1 + exp(a * f + b)).

use crate::core::{Result, SVMError};
use log::{debug, warn};

const MAX_ITERATIONS: usize = 100;
const MIN_STEP: f64 = 1e-10;
const SIGMA: f64 = 1e-12;
const EPSILON: f64 = 1e-5;

/// Parameters of a fitted sigmoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidParams {
    pub a: f64,
    pub b: f64,
}

impl SigmoidParams {
    /// Probability of the positive class for `score`
    pub fn probability(&self, score: f64) -> f64 {
        logistic(score * self.a + self.b)
    }
}

/// 1 / (1 + exp(f)), evaluated without overflow for large |f|
#[inline]
pub fn logistic(f: f64) -> f64 {
    if f >= 0.0 {
        (-f).exp() / (1.0 + (-f).exp())
    } else {
        1.0 / (1.0 + f.exp())
    }
}

/// Fit a sigmoid to `scores`, taking every positive score as a positive example
pub fn fit_sigmoid(scores: &[f64]) -> Result<SigmoidParams> {
    let labels: Vec<f64> = scores
        .iter()
        .map(|&s| if s > 0.0 { 1.0 } else { -1.0 })
        .collect();
    fit_sigmoid_with_labels(scores, &labels)
}

/// Fit a sigmoid to `scores` against known labels (positive means +1)
pub fn fit_sigmoid_with_labels(scores: &[f64], labels: &[f64]) -> Result<SigmoidParams> {
    if scores.is_empty() {
        return Err(SVMError::InvalidParameter(
            "Cannot fit a sigmoid to an empty score vector".to_string(),
        ));
    }
    if scores.len() != labels.len() {
        return Err(SVMError::LengthMismatch {
            expected: scores.len(),
            actual: labels.len(),
        });
    }

    let prior1 = labels.iter().filter(|&&l| l > 0.0).count() as f64;
    let prior0 = labels.len() as f64 - prior1;

    let hi_target = (prior1 + 1.0) / (prior1 + 2.0);
    let lo_target = 1.0 / (prior0 + 2.0);
    let targets: Vec<f64> = labels
        .iter()
        .map(|&l| if l > 0.0 { hi_target } else { lo_target })
        .collect();

    let mut a = 0.0;
    let mut b = ((prior0 + 1.0) / (prior1 + 1.0)).ln();
    let mut fval = objective(scores, &targets, a, b);

    let mut iteration = 0;
    while iteration < MAX_ITERATIONS {
        // Gradient and Hessian, with H' = H + sigma * I
        let mut h11 = SIGMA;
        let mut h22 = SIGMA;
        let mut h21 = 0.0;
        let mut g1 = 0.0;
        let mut g2 = 0.0;

        for (&score, &t) in scores.iter().zip(&targets) {
            let f = score * a + b;
            let (p, q) = if f >= 0.0 {
                ((-f).exp() / (1.0 + (-f).exp()), 1.0 / (1.0 + (-f).exp()))
            } else {
                (1.0 / (1.0 + f.exp()), f.exp() / (1.0 + f.exp()))
            };
            let d2 = p * q;
            h11 += score * score * d2;
            h22 += d2;
            h21 += score * d2;
            let d1 = t - p;
            g1 += score * d1;
            g2 += d1;
        }

        if g1.abs() < EPSILON && g2.abs() < EPSILON {
            break;
        }

        let det = h11 * h22 - h21 * h21;
        let da = -(h22 * g1 - h21 * g2) / det;
        let db = -(-h21 * g1 + h11 * g2) / det;
        let gd = g1 * da + g2 * db;

        let mut step = 1.0;
        while step >= MIN_STEP {
            let new_a = a + step * da;
            let new_b = b + step * db;
            let new_f = objective(scores, &targets, new_a, new_b);

            if new_f < fval + 0.0001 * step * gd {
                a = new_a;
                b = new_b;
                fval = new_f;
                break;
            }
            step /= 2.0;
        }

        if step < MIN_STEP {
            warn!("fit_sigmoid: line search fails (a={a}, b={b}, g1={g1}, g2={g2})");
            break;
        }

        debug!("fit_sigmoid: iteration {iteration}, a={a}, b={b}, fval={fval}");
        iteration += 1;
    }

    if iteration >= MAX_ITERATIONS {
        warn!("fit_sigmoid: reached maximal iterations ({MAX_ITERATIONS})");
    }

    Ok(SigmoidParams { a, b })
}

/// Negative log likelihood of `targets` under the sigmoid (a, b)
fn objective(scores: &[f64], targets: &[f64], a: f64, b: f64) -> f64 {
    scores
        .iter()
        .zip(targets)
        .map(|(&score, &t)| {
            let f = score * a + b;
            if f >= 0.0 {
                t * f + (1.0 + (-f).exp()).ln()
            } else {
                (t - 1.0) * f + (1.0 + f.exp()).ln()
            }
        })
        .sum()
}
