//! Common data types for the CTRUE analysis.

use serde::{Deserialize, Serialize};

/// Data-taking period. Each period carries its own good-run table and its own
/// trigger-input wiring; exactly one period is active per analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// Pb-Pb collisions, 2015.
    PbPb2015,
    /// Xe-Xe collisions, 2017.
    XeXe2017,
    /// Pb-Pb collisions, 2018.
    PbPb2018,
}

/// Per-run calibration entry: the luminosity weight and the mean pile-up
/// parameter mu for one good run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run identifier.
    pub run: i32,
    /// Luminosity/exposure weight, strictly positive.
    pub weight: f64,
    /// Mean pile-up parameter, non-negative.
    pub mu: f64,
}

/// Named hardware trigger inputs of the central trigger processor.
///
/// Each input is a single-bit coincidence condition inside the L0 or L1
/// input word; the bit position is period-dependent configuration
/// (see the trigger-input map), not part of the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerInput {
    /// 0VBA: at least one V0A cell fired in the beam-beam timing gate.
    V0aInGate,
    /// 0VBC: at least one V0C cell fired in the beam-beam timing gate.
    V0cInGate,
    /// 0UBA: at least one ADA cell fired in the beam-beam timing gate.
    AdaInGate,
    /// 0UBC: at least one ADC cell fired in the beam-beam timing gate.
    AdcInGate,
    /// 0SH1: fast-OR fired in the SPD.
    SpdFastOr,
    /// 0STG: SPD topological (back-to-back fast-OR) condition.
    SpdTopological,
    /// 0MUL: low-pT muon pair in the muon trigger.
    MuonPair,
    /// 0OM2: at least two TOF pads fired.
    TofMultiplicity,
    /// 0VOM: V0 online multiplicity condition.
    V0Multiplicity,
    /// 1ZED: single-neutron signal in the ZDC (L1).
    ZdcSingleNeutron,
}

impl TriggerInput {
    /// Number of named trigger inputs.
    pub const COUNT: usize = 10;

    /// All named inputs, in flag-array order.
    pub const ALL: [TriggerInput; Self::COUNT] = [
        TriggerInput::V0aInGate,
        TriggerInput::V0cInGate,
        TriggerInput::AdaInGate,
        TriggerInput::AdcInGate,
        TriggerInput::SpdFastOr,
        TriggerInput::SpdTopological,
        TriggerInput::MuonPair,
        TriggerInput::TofMultiplicity,
        TriggerInput::V0Multiplicity,
        TriggerInput::ZdcSingleNeutron,
    ];

    /// Position of this input in the flag array.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Decoded per-event trigger flags, one boolean per named input.
///
/// Ephemeral: produced from the raw L0/L1 words of one event and discarded
/// after classification. Every named input is always either fired or not;
/// there is no "undefined" state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerFlags {
    fired: [bool; TriggerInput::COUNT],
}

impl TriggerFlags {
    /// Whether the given input fired in this event.
    #[inline]
    pub fn fired(&self, input: TriggerInput) -> bool {
        self.fired[input.index()]
    }

    /// Set the state of one input.
    #[inline]
    pub fn set(&mut self, input: TriggerInput, fired: bool) {
        self.fired[input.index()] = fired;
    }
}

/// Offline beam decision of a V0 or AD detector side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamDecision {
    /// No signal in the timing window.
    #[default]
    Empty,
    /// Timing compatible with a beam-beam collision.
    BeamBeam,
    /// Timing compatible with beam-gas background.
    BeamGas,
    /// Signal present but timing inconsistent with either hypothesis.
    Fake,
}

/// Energies recorded by the four zero-degree calorimeters, in GeV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZdcEnergies {
    /// Neutron calorimeter, A side.
    pub zna: f64,
    /// Neutron calorimeter, C side.
    pub znc: f64,
    /// Proton calorimeter, A side.
    pub zpa: f64,
    /// Proton calorimeter, C side.
    pub zpc: f64,
}

/// One event as supplied by the event-source collaborator.
///
/// Immutable value owned by the caller; the core reads it during
/// classification and retains no reference afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Run identifier the event belongs to.
    pub run: i32,
    /// Raw L0 trigger-input word.
    pub l0_inputs: u32,
    /// Raw L1 trigger-input word.
    pub l1_inputs: u32,
    /// ZDC energies.
    pub zdc: ZdcEnergies,
    /// V0A offline decision.
    pub v0a: BeamDecision,
    /// V0C offline decision.
    pub v0c: BeamDecision,
    /// ADA offline decision.
    pub ada: BeamDecision,
    /// ADC offline decision.
    pub adc: BeamDecision,
    /// Number of SPD tracklets.
    pub tracklets: u32,
    /// Bunch-crossing number within the orbit.
    pub bunch_crossing: u16,
}

/// Trigger-condition category of one event.
///
/// The four physical classes of the original CTRUE split (collision
/// conditions, empty, beam on A side, beam on C side) plus the bucket for
/// events matching none of the patterns. Mutually exclusive by construction:
/// the classifier evaluates the rules in order and the first match wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    /// Beam-beam gates on both sides plus central-detector confirmation.
    CollisionCandidate,
    /// No beam-related input fired on either side.
    Empty,
    /// Beam-gas pattern on the A side only.
    BeamSideA,
    /// Beam-gas pattern on the C side only.
    BeamSideC,
    /// None of the above patterns matched.
    Rejected,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 5;

    /// All categories, in counter order.
    pub const ALL: [Category; Self::COUNT] = [
        Category::CollisionCandidate,
        Category::Empty,
        Category::BeamSideA,
        Category::BeamSideC,
        Category::Rejected,
    ];

    /// Position of this category in per-category counter arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One efficiency estimate produced by the estimation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyResult {
    /// Mean pile-up parameter the estimate was evaluated at.
    pub mu: f64,
    /// Estimated detection efficiency, clamped into [0, 1].
    pub efficiency: f64,
    /// Propagated standard error, non-negative.
    pub error: f64,
}
