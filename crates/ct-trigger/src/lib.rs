//! # ct-trigger
//!
//! The event-side half of the CTRUE analysis:
//! - decoding raw L0/L1 trigger-input words into named flags,
//! - the per-period good-run tables,
//! - the pure trigger-pattern classifier,
//! - the accumulator holding per-category and per-run counts.
//!
//! Everything here is synchronous and allocation-free on the per-event path;
//! the fit over the accumulated buckets lives in ct-inference.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accumulator;
pub mod classifier;
pub mod inputs;
pub mod runtable;

pub use accumulator::{Accumulator, RunBucket};
pub use classifier::classify;
pub use inputs::{InputDef, Level, TriggerInputMap};
pub use runtable::RunTable;
