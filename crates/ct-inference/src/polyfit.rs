//! Weighted polynomial least squares.
//!
//! Degree-1 is what the efficiency fit uses; the solver is written for an
//! arbitrary degree since the design matrix generalises for free. Weights
//! are treated as inverse variances, so the coefficient covariance is the
//! plain inverse of the normal-equations matrix with no residual rescaling.

use nalgebra::{DMatrix, DVector};
use statrs::function::gamma::gamma_ur;

use ct_core::{Error, Result};

/// One weighted fit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitPoint {
    /// Independent variable (mean pile-up mu for the efficiency fit).
    pub x: f64,
    /// Dependent variable (observed fraction).
    pub y: f64,
    /// Inverse-variance weight, strictly positive.
    pub weight: f64,
}

/// Result of a weighted polynomial fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyFit {
    /// Coefficients in ascending power order: `y = c[0] + c[1] x + ...`.
    pub coefficients: Vec<f64>,
    /// Standard error of each coefficient.
    pub errors: Vec<f64>,
    /// Weighted sum of squared residuals.
    pub chi2: f64,
    /// Degrees of freedom (points minus parameters).
    pub ndf: usize,
    /// Chi-square tail probability `Q(ndf/2, chi2/2)`; `None` when ndf = 0.
    pub prob: Option<f64>,
}

impl PolyFit {
    /// Evaluate the fitted polynomial at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        // Horner form.
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }
}

/// Weighted least-squares fit of `y` against powers of `x`.
///
/// Solves the normal equations `(XᵀWX) c = XᵀWy` over the Vandermonde
/// design matrix; coefficient errors are the square roots of the diagonal
/// of `(XᵀWX)⁻¹`. Returns `Error::InsufficientData` when fewer than
/// `degree + 1` distinct `x` values are present, rather than producing a
/// degenerate fit.
pub fn fit_polynomial(points: &[FitPoint], degree: usize) -> Result<PolyFit> {
    let n_params = degree + 1;

    for p in points {
        if !p.x.is_finite() || !p.y.is_finite() || !p.weight.is_finite() {
            return Err(Error::Validation(format!("non-finite fit point {p:?}")));
        }
        if p.weight <= 0.0 {
            return Err(Error::Validation(format!(
                "fit weights must be > 0, got {} at x={}",
                p.weight, p.x
            )));
        }
    }

    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    if xs.len() < n_params {
        return Err(Error::InsufficientData(format!(
            "degree-{degree} fit needs {n_params} distinct x values, got {}",
            xs.len()
        )));
    }

    let n = points.len();
    let design = DMatrix::from_fn(n, n_params, |i, j| points[i].x.powi(j as i32));
    let y = DVector::from_fn(n, |i, _| points[i].y);
    let w = DVector::from_fn(n, |i, _| points[i].weight);

    // XᵀWX and XᵀWy without materialising the diagonal W.
    let xtw = design.transpose() * DMatrix::from_diagonal(&w);
    let xtwx = &xtw * &design;
    let xtwy = &xtw * &y;

    let chol = xtwx
        .cholesky()
        .ok_or_else(|| Error::InsufficientData("normal equations are singular".to_string()))?;
    let coefficients = chol.solve(&xtwy);
    let covariance = chol.inverse();
    let errors: Vec<f64> =
        (0..n_params).map(|j| covariance[(j, j)].max(0.0).sqrt()).collect();

    let residuals = &y - &design * &coefficients;
    let chi2 = residuals
        .iter()
        .zip(w.iter())
        .map(|(r, wi)| wi * r * r)
        .sum::<f64>();
    let ndf = n - n_params;
    let prob = (ndf > 0).then(|| gamma_ur(ndf as f64 / 2.0, chi2 / 2.0));

    Ok(PolyFit {
        coefficients: coefficients.iter().copied().collect(),
        errors,
        chi2,
        ndf,
        prob,
    })
}
