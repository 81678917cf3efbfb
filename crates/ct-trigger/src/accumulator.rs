//! The accumulator: the sole mutable aggregate of an analysis pass.
//!
//! Holds per-category event counts, per-run observed/total buckets, and the
//! histogram-equivalent per-category ZN energy sums. Counts only ever grow;
//! `reset` swaps in a fresh value wholesale, and `merge` is a pointwise sum
//! so partial accumulators from parallel workers combine in any order.

use std::collections::BTreeMap;

use serde::Serialize;

use ct_core::{BeamDecision, Category, EventRecord, RunRecord};

/// Observed/total counts of one run, the raw material of one fit point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunBucket {
    /// Collision candidates with a known run weight.
    pub observed: u64,
    /// Candidates plus rejected events of the same run.
    pub total: u64,
}

impl RunBucket {
    /// Observed fraction, the raw per-run efficiency estimate.
    /// `None` while the bucket is empty.
    pub fn fraction(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.observed as f64 / self.total as f64)
        }
    }
}

/// Accumulated classification state of one analysis pass.
///
/// `snapshot` is a plain clone: the value itself is the read-only state the
/// reporting collaborator consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Accumulator {
    counts: [u64; Category::COUNT],
    zna_sums: [f64; Category::COUNT],
    znc_sums: [f64; Category::COUNT],
    confirmed_candidates: u64,
    per_run: BTreeMap<i32, RunBucket>,
}

impl Accumulator {
    /// A fresh, all-zero accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classified event.
    ///
    /// The category count and energy sums grow unconditionally; the per-run
    /// bucket is only touched when the run is in the good-run table
    /// (`run_info` is `Some`): candidates count into observed and total,
    /// rejected events into total only. Other categories never enter the
    /// buckets.
    pub fn update(&mut self, category: Category, event: &EventRecord, run_info: Option<&RunRecord>) {
        let i = category.index();
        self.counts[i] += 1;
        self.zna_sums[i] += event.zdc.zna;
        self.znc_sums[i] += event.zdc.znc;

        if category == Category::CollisionCandidate
            && event.v0a == BeamDecision::BeamBeam
            && event.v0c == BeamDecision::BeamBeam
        {
            self.confirmed_candidates += 1;
        }

        if run_info.is_some() {
            match category {
                Category::CollisionCandidate => {
                    let bucket = self.per_run.entry(event.run).or_default();
                    bucket.observed += 1;
                    bucket.total += 1;
                }
                Category::Rejected => {
                    self.per_run.entry(event.run).or_default().total += 1;
                }
                _ => {}
            }
        }
    }

    /// Event count of one category.
    #[inline]
    pub fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }

    /// Total number of recorded events.
    pub fn total_events(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Summed (ZNA, ZNC) energies of one category.
    pub fn zn_sums(&self, category: Category) -> (f64, f64) {
        (self.zna_sums[category.index()], self.znc_sums[category.index()])
    }

    /// Collision candidates whose V0A and V0C offline decisions were both
    /// beam-beam.
    pub fn confirmed_candidates(&self) -> u64 {
        self.confirmed_candidates
    }

    /// Per-run buckets, keyed by run id in ascending order.
    pub fn per_run(&self) -> &BTreeMap<i32, RunBucket> {
        &self.per_run
    }

    /// Read-only copy of the full state.
    pub fn snapshot(&self) -> Accumulator {
        self.clone()
    }

    /// Clear all state. All-or-nothing: the whole value is replaced at once.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Pointwise sum of another accumulator into this one.
    ///
    /// Commutative and associative, so partial states from any partition of
    /// an event set merge to the same result in any order.
    pub fn merge(&mut self, other: &Accumulator) {
        for i in 0..Category::COUNT {
            self.counts[i] += other.counts[i];
            self.zna_sums[i] += other.zna_sums[i];
            self.znc_sums[i] += other.znc_sums[i];
        }
        self.confirmed_candidates += other.confirmed_candidates;
        for (run, bucket) in &other.per_run {
            let mine = self.per_run.entry(*run).or_default();
            mine.observed += bucket.observed;
            mine.total += bucket.total;
        }
    }
}
