//! # ct-inference
//!
//! The batch estimation step of the CTRUE analysis: binomial uncertainties
//! for per-run observed fractions, a weighted polynomial least-squares fit
//! of fraction against mean pile-up, and the efficiency computation with
//! linear error propagation.
//!
//! Everything here is a pure transform over already-accumulated data; the
//! per-event path lives in ct-trigger.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binomial;
pub mod efficiency;
pub mod polyfit;

pub use binomial::binomial_error;
pub use efficiency::{compute_efficiency, weighted_mean_efficiency};
pub use polyfit::{fit_polynomial, FitPoint, PolyFit};
