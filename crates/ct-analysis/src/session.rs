//! One analysis pass over an event stream.

use rayon::prelude::*;
use tracing::{debug, info};

use ct_core::{Category, EfficiencyResult, EventRecord, Period, Result};
use ct_inference::{binomial_error, compute_efficiency, fit_polynomial, FitPoint, PolyFit};
use ct_trigger::{classify, Accumulator, RunTable, TriggerInputMap};

/// The per-session analysis driver.
///
/// Owns the immutable configuration (good-run table, trigger wiring) and the
/// single mutable accumulator of the pass. Per-event processing is
/// synchronous and never fails: events that match no pattern are counted as
/// rejected, events from unknown runs are counted but excluded from the
/// weighted buckets.
pub struct AnalysisSession {
    table: RunTable,
    inputs: TriggerInputMap,
    accumulator: Accumulator,
}

impl AnalysisSession {
    /// A session over one of the compiled-in period presets: the period's
    /// good-run table together with its trigger wiring.
    pub fn new(period: Period) -> Self {
        Self::with_table(RunTable::for_period(period), TriggerInputMap::for_period(period))
    }

    /// A session over injected configuration. Starting a session with a
    /// different table fully replaces the old one; tables never merge.
    pub fn with_table(table: RunTable, inputs: TriggerInputMap) -> Self {
        info!(runs = table.len(), period = ?table.period(), "analysis session opened");
        Self { table, inputs, accumulator: Accumulator::new() }
    }

    /// Classify one event without touching any state.
    #[inline]
    pub fn classify_event(&self, event: &EventRecord) -> Category {
        let flags = self.inputs.decode(event.l0_inputs, event.l1_inputs);
        classify(&flags)
    }

    /// Decode, classify and accumulate one event; returns its category.
    pub fn process_event(&mut self, event: &EventRecord) -> Category {
        let category = self.classify_event(event);
        self.accumulator.update(category, event, self.table.lookup(event.run));
        category
    }

    /// Process a batch of events in parallel.
    ///
    /// Each worker fills its own accumulator and the partials are merged
    /// pointwise afterwards, so the result is identical to sequential
    /// processing in any order.
    pub fn process_batch(&mut self, events: &[EventRecord]) {
        let partial = events
            .par_iter()
            .fold(Accumulator::new, |mut acc, event| {
                let flags = self.inputs.decode(event.l0_inputs, event.l1_inputs);
                acc.update(classify(&flags), event, self.table.lookup(event.run));
                acc
            })
            .reduce(Accumulator::new, |mut a, b| {
                a.merge(&b);
                a
            });
        self.accumulator.merge(&partial);
    }

    /// Read-only copy of the accumulated state.
    pub fn snapshot(&self) -> Accumulator {
        self.accumulator.snapshot()
    }

    /// Clear the accumulated state; the configuration stays.
    pub fn reset(&mut self) {
        self.accumulator.reset();
    }

    /// The good-run table of this session.
    pub fn run_table(&self) -> &RunTable {
        &self.table
    }

    // Fit inputs from the non-empty per-run buckets, in ascending run order:
    // (mu, observed fraction, inverse binomial variance) plus the run weight
    // for downstream averaging.
    fn fit_points(&self) -> (Vec<FitPoint>, Vec<f64>, Vec<f64>) {
        let mut points = Vec::new();
        let mut mus = Vec::new();
        let mut run_weights = Vec::new();
        for (run, bucket) in self.accumulator.per_run() {
            let Some(fraction) = bucket.fraction() else { continue };
            // Buckets only exist for runs the table knows.
            let Some(record) = self.table.lookup(*run) else { continue };
            let total = bucket.total as f64;
            // Inverse binomial variance; at p = 0 or 1 the binomial error
            // degenerates to zero, fall back to the raw sample size.
            let weight = match binomial_error(bucket.observed as f64, total) {
                Ok(err) if err > 0.0 => 1.0 / (err * err),
                _ => total,
            };
            points.push(FitPoint { x: record.mu, y: fraction, weight });
            mus.push(record.mu);
            run_weights.push(record.weight);
        }
        (points, mus, run_weights)
    }

    /// Weighted linear fit of observed fraction against mu over the per-run
    /// buckets. `Error::InsufficientData` when fewer than two distinct mu
    /// values contributed.
    pub fn fit(&self) -> Result<PolyFit> {
        let (points, _, _) = self.fit_points();
        debug!(buckets = points.len(), "fitting efficiency against mu");
        fit_polynomial(&points, 1)
    }

    /// The fitted efficiency evaluated at each contributing run's mu, in
    /// ascending run order, clamped into [0, 1] with propagated errors.
    pub fn estimate_efficiency(&self) -> Result<Vec<EfficiencyResult>> {
        let (points, mus, _) = self.fit_points();
        let fit = fit_polynomial(&points, 1)?;
        Ok(compute_efficiency(&mus, &fit))
    }

    /// Run-weighted mean of the per-run efficiency estimates.
    pub fn mean_efficiency(&self) -> Result<f64> {
        let (points, mus, run_weights) = self.fit_points();
        let fit = fit_polynomial(&points, 1)?;
        let results = compute_efficiency(&mus, &fit);
        ct_inference::weighted_mean_efficiency(&results, &run_weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_core::{Error, RunRecord, TriggerInput};

    fn three_run_session() -> AnalysisSession {
        let table = RunTable::from_records([
            RunRecord { run: 100, weight: 1.0, mu: 1.0 },
            RunRecord { run: 200, weight: 2.0, mu: 1.5 },
            RunRecord { run: 300, weight: 0.5, mu: 2.0 },
        ])
        .unwrap();
        AnalysisSession::with_table(table, TriggerInputMap::for_period(Period::PbPb2018))
    }

    fn event(session: &AnalysisSession, run: i32, fired: &[TriggerInput]) -> EventRecord {
        let (l0, l1) = session.inputs.mask(fired);
        EventRecord { run, l0_inputs: l0, l1_inputs: l1, ..Default::default() }
    }

    const CANDIDATE: &[TriggerInput] = &[
        TriggerInput::V0aInGate,
        TriggerInput::V0cInGate,
        TriggerInput::SpdFastOr,
    ];
    // Both beam gates without SPD confirmation: rejected, counts into the
    // bucket denominator.
    const REJECTED: &[TriggerInput] = &[TriggerInput::V0aInGate, TriggerInput::V0cInGate];

    #[test]
    fn test_process_event_classifies_and_buckets() {
        let mut session = three_run_session();
        let ev = event(&session, 100, CANDIDATE);
        assert_eq!(session.process_event(&ev), Category::CollisionCandidate);
        let ev = event(&session, 100, REJECTED);
        assert_eq!(session.process_event(&ev), Category::Rejected);

        let snap = session.snapshot();
        assert_eq!(snap.per_run()[&100].observed, 1);
        assert_eq!(snap.per_run()[&100].total, 2);
    }

    #[test]
    fn test_unknown_run_classified_but_unweighted() {
        let mut session = three_run_session();
        let ev = event(&session, 999, CANDIDATE);
        assert_eq!(session.process_event(&ev), Category::CollisionCandidate);
        let snap = session.snapshot();
        assert_eq!(snap.count(Category::CollisionCandidate), 1);
        assert!(snap.per_run().is_empty());
    }

    #[test]
    fn test_reset_clears_counts_only() {
        let mut session = three_run_session();
        let ev = event(&session, 100, CANDIDATE);
        session.process_event(&ev);
        session.reset();
        assert_eq!(session.snapshot(), Accumulator::new());
        // The table survives a reset.
        assert_eq!(session.run_table().len(), 3);
    }

    #[test]
    fn test_estimate_requires_two_distinct_mu() {
        let mut session = three_run_session();
        for _ in 0..10 {
            let ev = event(&session, 100, CANDIDATE);
            session.process_event(&ev);
        }
        // One bucket, one mu: underdetermined line.
        assert!(matches!(
            session.estimate_efficiency(),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let mut seq = three_run_session();
        let mut par = three_run_session();
        let mut events = Vec::new();
        for i in 0..300 {
            let run = [100, 200, 300, 999][i % 4];
            let fired = if i % 3 == 0 { CANDIDATE } else { REJECTED };
            events.push(event(&seq, run, fired));
        }
        for ev in &events {
            seq.process_event(ev);
        }
        par.process_batch(&events);
        assert_eq!(seq.snapshot(), par.snapshot());
    }
}
