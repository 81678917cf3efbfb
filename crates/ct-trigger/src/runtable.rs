//! Good-run tables: the per-run (weight, mu) calibration lookup.
//!
//! A table is an immutable value built exactly once, either from one of the
//! compiled-in period presets or from caller-supplied records (including
//! JSON, the format the configuration collaborator ships). Selecting a
//! different preset means constructing a new table; there is no way to
//! merge or mutate an existing one.

use std::collections::HashMap;
use std::path::Path;

use ct_core::{Error, Period, Result, RunRecord};

const fn rec(run: i32, weight: f64, mu: f64) -> RunRecord {
    RunRecord { run, weight, mu }
}

// Good runs of the 2015 Pb-Pb period with their luminosity weights and
// mean pile-up values.
const GOOD_RUNS_PBPB_2015: [RunRecord; 16] = [
    rec(244_980, 0.82, 0.0009),
    rec(244_982, 0.91, 0.0010),
    rec(245_064, 1.05, 0.0012),
    rec(245_145, 1.21, 0.0014),
    rec(245_231, 0.77, 0.0008),
    rec(245_345, 1.33, 0.0016),
    rec(245_401, 0.95, 0.0011),
    rec(245_501, 1.12, 0.0013),
    rec(245_683, 1.48, 0.0018),
    rec(245_831, 0.68, 0.0007),
    rec(245_952, 1.02, 0.0012),
    rec(246_042, 1.19, 0.0014),
    rec(246_113, 0.88, 0.0010),
    rec(246_272, 1.41, 0.0017),
    rec(246_434, 1.07, 0.0012),
    rec(246_989, 0.73, 0.0008),
];

// The 2017 Xe-Xe period was a single short fill.
const GOOD_RUNS_XEXE_2017: [RunRecord; 2] = [
    rec(280_234, 1.00, 0.0004),
    rec(280_235, 0.62, 0.0003),
];

// Good runs of the 2018 Pb-Pb period.
const GOOD_RUNS_PBPB_2018: [RunRecord; 18] = [
    rec(295_585, 0.94, 0.0011),
    rec(295_589, 1.08, 0.0013),
    rec(295_612, 1.22, 0.0015),
    rec(295_717, 0.81, 0.0009),
    rec(295_786, 1.35, 0.0017),
    rec(295_831, 0.97, 0.0011),
    rec(295_936, 1.16, 0.0014),
    rec(296_016, 1.44, 0.0019),
    rec(296_133, 0.71, 0.0008),
    rec(296_244, 1.03, 0.0012),
    rec(296_378, 1.27, 0.0016),
    rec(296_433, 0.89, 0.0010),
    rec(296_550, 1.31, 0.0016),
    rec(296_749, 0.76, 0.0008),
    rec(296_935, 1.11, 0.0013),
    rec(297_031, 1.24, 0.0015),
    rec(297_222, 0.92, 0.0011),
    rec(297_595, 1.06, 0.0012),
];

/// Immutable run-to-(weight, mu) lookup table.
///
/// A miss is not an error: events from unknown runs are still classified,
/// they are merely excluded from the weighted statistics downstream.
#[derive(Debug, Clone)]
pub struct RunTable {
    period: Option<Period>,
    runs: HashMap<i32, RunRecord>,
}

impl RunTable {
    /// The compiled-in good-run preset of a real data-taking period.
    pub fn for_period(period: Period) -> Self {
        let records: &[RunRecord] = match period {
            Period::PbPb2015 => &GOOD_RUNS_PBPB_2015,
            Period::XeXe2017 => &GOOD_RUNS_XEXE_2017,
            Period::PbPb2018 => &GOOD_RUNS_PBPB_2018,
        };
        let runs = records.iter().map(|r| (r.run, *r)).collect();
        Self { period: Some(period), runs }
    }

    /// Build a table from caller-supplied records, validating the run-table
    /// invariants: unique run ids, weight > 0, mu >= 0.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = RunRecord>,
    {
        let mut runs = HashMap::new();
        for r in records {
            if !r.weight.is_finite() || r.weight <= 0.0 {
                return Err(Error::Validation(format!(
                    "run {}: weight must be finite and > 0, got {}",
                    r.run, r.weight
                )));
            }
            if !r.mu.is_finite() || r.mu < 0.0 {
                return Err(Error::Validation(format!(
                    "run {}: mu must be finite and >= 0, got {}",
                    r.run, r.mu
                )));
            }
            if runs.insert(r.run, r).is_some() {
                return Err(Error::Validation(format!("duplicate run id {}", r.run)));
            }
        }
        Ok(Self { period: None, runs })
    }

    /// Build a table from a JSON array of `{run, weight, mu}` objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<RunRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Build a table from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Look up the calibration entry of a run. `None` means the run is not
    /// in the good-run list and must be excluded from weighted statistics.
    #[inline]
    pub fn lookup(&self, run: i32) -> Option<&RunRecord> {
        self.runs.get(&run)
    }

    /// The period this table was built for, if it is a preset.
    pub fn period(&self) -> Option<Period> {
        self.period
    }

    /// Number of good runs in the table.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Iterate over the run records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &RunRecord> {
        self.runs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup_hit_and_miss() {
        let table = RunTable::for_period(Period::PbPb2018);
        let rec = table.lookup(295_585).unwrap();
        assert_eq!(rec.weight, 0.94);
        assert_eq!(rec.mu, 0.0011);
        assert!(table.lookup(123_456).is_none());
        assert_eq!(table.period(), Some(Period::PbPb2018));
    }

    #[test]
    fn test_presets_are_disjoint_sessions() {
        // Building a second preset yields an independent table, never a merge.
        let t2015 = RunTable::for_period(Period::PbPb2015);
        let t2018 = RunTable::for_period(Period::PbPb2018);
        assert!(t2018.lookup(244_980).is_none());
        assert!(t2015.lookup(295_585).is_none());
    }

    #[test]
    fn test_preset_invariants() {
        for period in [Period::PbPb2015, Period::XeXe2017, Period::PbPb2018] {
            let table = RunTable::for_period(period);
            assert!(!table.is_empty());
            // Re-validating the constants through the checked constructor.
            let revalidated = RunTable::from_records(table.records().copied()).unwrap();
            assert_eq!(revalidated.len(), table.len());
        }
    }

    #[test]
    fn test_from_records_rejects_bad_weight() {
        let err = RunTable::from_records([rec(1, 0.0, 0.5)]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = RunTable::from_records([rec(1, -1.0, 0.5)]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_from_records_rejects_negative_mu_and_duplicates() {
        let err = RunTable::from_records([rec(1, 1.0, -0.1)]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = RunTable::from_records([rec(1, 1.0, 0.1), rec(1, 2.0, 0.2)]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {"run": 10, "weight": 1.5, "mu": 0.001},
            {"run": 11, "weight": 0.5, "mu": 0.002}
        ]"#;
        let table = RunTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(11).unwrap().weight, 0.5);
        assert!(table.period().is_none());
    }

    #[test]
    fn test_from_json_str_propagates_parse_error() {
        assert!(matches!(RunTable::from_json_str("not json"), Err(Error::Json(_))));
    }
}
