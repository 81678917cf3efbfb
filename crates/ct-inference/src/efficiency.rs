//! Efficiency evaluation and error propagation over a fitted polynomial.

use ct_core::{EfficiencyResult, Error, Result};

use crate::polyfit::PolyFit;

/// Evaluate the fitted efficiency at each mu, clamped into [0, 1].
///
/// The error is the quadrature sum of `mu^k * err_k` over the coefficient
/// errors. The covariance between coefficients is deliberately omitted,
/// matching the original analysis (a known slight underestimate).
/// One result per input mu, in input order.
pub fn compute_efficiency(mus: &[f64], fit: &PolyFit) -> Vec<EfficiencyResult> {
    mus.iter()
        .map(|&mu| {
            let efficiency = fit.eval(mu).clamp(0.0, 1.0);
            let var: f64 = fit
                .errors
                .iter()
                .enumerate()
                .map(|(k, &err)| {
                    let d = mu.powi(k as i32) * err;
                    d * d
                })
                .sum();
            EfficiencyResult { mu, efficiency, error: var.sqrt() }
        })
        .collect()
}

/// Run-weighted mean efficiency `sum(w * eff) / sum(w)`.
///
/// Returns `Error::Undefined` when the weights sum to zero.
pub fn weighted_mean_efficiency(results: &[EfficiencyResult], weights: &[f64]) -> Result<f64> {
    if results.len() != weights.len() {
        return Err(Error::Validation(format!(
            "{} efficiency results but {} weights",
            results.len(),
            weights.len()
        )));
    }
    let wsum: f64 = weights.iter().sum();
    if wsum == 0.0 {
        return Err(Error::Undefined("weighted mean over zero total weight".to_string()));
    }
    let num: f64 = results.iter().zip(weights).map(|(r, &w)| w * r.efficiency).sum();
    Ok(num / wsum)
}
