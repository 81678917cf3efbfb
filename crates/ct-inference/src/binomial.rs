//! Binomial standard error of an observed fraction.

use ct_core::{Error, Result};

/// Standard error of the fraction `observed / total` over `total` trials:
/// `sqrt(p * (1 - p) / total)`.
///
/// Returns `Error::Undefined` when `total` is zero — the fraction of an
/// empty bucket has no error estimate, and callers must not coerce this to
/// zero silently.
pub fn binomial_error(observed: f64, total: f64) -> Result<f64> {
    if !observed.is_finite() || !total.is_finite() {
        return Err(Error::Validation(format!(
            "counts must be finite, got observed={observed} total={total}"
        )));
    }
    if observed < 0.0 || total < 0.0 {
        return Err(Error::Validation(format!(
            "counts must be non-negative, got observed={observed} total={total}"
        )));
    }
    if total == 0.0 {
        return Err(Error::Undefined("binomial error of an empty sample".to_string()));
    }
    if observed > total {
        return Err(Error::Validation(format!(
            "observed={observed} exceeds total={total}"
        )));
    }
    let p = observed / total;
    Ok((p * (1.0 - p) / total).sqrt())
}
