//! # ct-core
//!
//! Shared data model and error type for the CTRUE trigger-class analysis.
//!
//! This crate holds the value types exchanged between the decoding,
//! classification, accumulation and estimation crates, and nothing else:
//! no I/O, no mutable state, no numerics.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    BeamDecision, Category, EfficiencyResult, EventRecord, Period, RunRecord, TriggerFlags,
    TriggerInput, ZdcEnergies,
};
