//! # ct-analysis
//!
//! The analysis-session driver: one value owning the run table, the
//! trigger-input wiring and the accumulator for a single analysis pass.
//! The event-source collaborator feeds it events one at a time (or in
//! batches), the reporting collaborator reads snapshots and efficiency
//! estimates back out.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod session;

pub use session::AnalysisSession;
