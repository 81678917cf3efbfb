//! Decoding of raw trigger-input words into named flags.
//!
//! The central trigger processor delivers two fixed-width input words per
//! event (L0 and L1); each named input occupies one bit whose position is
//! period-dependent wiring. The wiring is a declarative table of
//! (input, level, input id) entries, decoded generically; adding an input
//! means adding one table row, not new decode logic.

use ct_core::{Period, TriggerFlags, TriggerInput};

/// Trigger level an input word belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Level-0 input word.
    L0,
    /// Level-1 input word.
    L1,
}

/// One row of the wiring table: a named input at a 1-based CTP input id
/// within one of the two words. Id 0 means the input was not connected in
/// that period and the flag always decodes to false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDef {
    /// The named input.
    pub input: TriggerInput,
    /// Which word carries it.
    pub level: Level,
    /// 1-based input id; the tested bit is `id - 1`. 0 = not connected.
    pub id: u8,
}

const fn def(input: TriggerInput, level: Level, id: u8) -> InputDef {
    InputDef { input, level, id }
}

// Wiring for the 2015 Pb-Pb period. AD was newly installed and the SPD
// topological and TOF/V0 multiplicity inputs were not in the CTRUE cluster.
const PBPB_2015: [InputDef; TriggerInput::COUNT] = [
    def(TriggerInput::V0aInGate, Level::L0, 5),
    def(TriggerInput::V0cInGate, Level::L0, 2),
    def(TriggerInput::AdaInGate, Level::L0, 19),
    def(TriggerInput::AdcInGate, Level::L0, 18),
    def(TriggerInput::SpdFastOr, Level::L0, 10),
    def(TriggerInput::SpdTopological, Level::L0, 0),
    def(TriggerInput::MuonPair, Level::L0, 13),
    def(TriggerInput::TofMultiplicity, Level::L0, 0),
    def(TriggerInput::V0Multiplicity, Level::L0, 0),
    def(TriggerInput::ZdcSingleNeutron, Level::L1, 14),
];

// Wiring for the 2017 Xe-Xe period.
const XEXE_2017: [InputDef; TriggerInput::COUNT] = [
    def(TriggerInput::V0aInGate, Level::L0, 5),
    def(TriggerInput::V0cInGate, Level::L0, 2),
    def(TriggerInput::AdaInGate, Level::L0, 4),
    def(TriggerInput::AdcInGate, Level::L0, 3),
    def(TriggerInput::SpdFastOr, Level::L0, 9),
    def(TriggerInput::SpdTopological, Level::L0, 0),
    def(TriggerInput::MuonPair, Level::L0, 0),
    def(TriggerInput::TofMultiplicity, Level::L0, 0),
    def(TriggerInput::V0Multiplicity, Level::L0, 21),
    def(TriggerInput::ZdcSingleNeutron, Level::L1, 0),
];

// Wiring for the 2018 Pb-Pb period.
const PBPB_2018: [InputDef; TriggerInput::COUNT] = [
    def(TriggerInput::V0aInGate, Level::L0, 5),
    def(TriggerInput::V0cInGate, Level::L0, 2),
    def(TriggerInput::AdaInGate, Level::L0, 4),
    def(TriggerInput::AdcInGate, Level::L0, 3),
    def(TriggerInput::SpdFastOr, Level::L0, 9),
    def(TriggerInput::SpdTopological, Level::L0, 11),
    def(TriggerInput::MuonPair, Level::L0, 13),
    def(TriggerInput::TofMultiplicity, Level::L0, 20),
    def(TriggerInput::V0Multiplicity, Level::L0, 21),
    def(TriggerInput::ZdcSingleNeutron, Level::L1, 14),
];

/// The wiring table of one period, with a total, side-effect-free decode.
///
/// Bits not named by any table row are ignored; named inputs with id 0
/// decode to false. Read-only after construction and `Sync`, so one map can
/// serve any number of concurrent decoders.
#[derive(Debug, Clone)]
pub struct TriggerInputMap {
    defs: Vec<InputDef>,
}

impl TriggerInputMap {
    /// The wiring of a real data-taking period.
    pub fn for_period(period: Period) -> Self {
        let defs = match period {
            Period::PbPb2015 => PBPB_2015,
            Period::XeXe2017 => XEXE_2017,
            Period::PbPb2018 => PBPB_2018,
        };
        Self { defs: defs.to_vec() }
    }

    /// A map from explicit wiring rows, for non-standard configurations.
    pub fn from_defs(defs: Vec<InputDef>) -> Self {
        Self { defs }
    }

    /// The wiring rows.
    pub fn defs(&self) -> &[InputDef] {
        &self.defs
    }

    /// Decode the raw L0/L1 words of one event into named flags.
    #[inline]
    pub fn decode(&self, l0: u32, l1: u32) -> TriggerFlags {
        let mut flags = TriggerFlags::default();
        for d in &self.defs {
            if d.id == 0 {
                continue;
            }
            let word = match d.level {
                Level::L0 => l0,
                Level::L1 => l1,
            };
            flags.set(d.input, word & (1u32 << (d.id - 1)) != 0);
        }
        flags
    }

    /// Build the (L0, L1) words in which exactly the given inputs fire.
    ///
    /// Inputs not connected in this period are silently skipped, mirroring
    /// the decode direction. Mainly useful for simulated event streams.
    pub fn mask(&self, fired: &[TriggerInput]) -> (u32, u32) {
        let mut l0 = 0u32;
        let mut l1 = 0u32;
        for d in &self.defs {
            if d.id == 0 || !fired.contains(&d.input) {
                continue;
            }
            let bit = 1u32 << (d.id - 1);
            match d.level {
                Level::L0 => l0 |= bit,
                Level::L1 => l1 |= bit,
            }
        }
        (l0, l1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_is_total() {
        // Every named flag has a defined value for every bit pattern.
        let map = TriggerInputMap::for_period(Period::PbPb2018);
        for l0 in [0u32, 1, 0xFFFF_FFFF, 0xDEAD_BEEF] {
            for l1 in [0u32, 0xFFFF_FFFF] {
                let flags = map.decode(l0, l1);
                for input in TriggerInput::ALL {
                    // Just exercising the accessor; fired() is a plain bool.
                    let _ = flags.fired(input);
                }
            }
        }
    }

    #[test]
    fn test_decode_round_trips_mask() {
        let map = TriggerInputMap::for_period(Period::PbPb2018);
        let fired = [
            TriggerInput::V0aInGate,
            TriggerInput::AdcInGate,
            TriggerInput::SpdFastOr,
            TriggerInput::ZdcSingleNeutron,
        ];
        let (l0, l1) = map.mask(&fired);
        let flags = map.decode(l0, l1);
        for input in TriggerInput::ALL {
            assert_eq!(flags.fired(input), fired.contains(&input), "{input:?}");
        }
    }

    #[test]
    fn test_unconnected_input_never_fires() {
        // 0STG had no id in 2015; all-ones words must still leave it clear.
        let map = TriggerInputMap::for_period(Period::PbPb2015);
        let flags = map.decode(0xFFFF_FFFF, 0xFFFF_FFFF);
        assert!(!flags.fired(TriggerInput::SpdTopological));
        assert!(flags.fired(TriggerInput::V0aInGate));
    }

    #[test]
    fn test_unknown_bits_are_ignored() {
        let map = TriggerInputMap::for_period(Period::XeXe2017);
        // Bit 31 is not claimed by any 2017 input.
        let flags = map.decode(1u32 << 31, 0);
        assert_eq!(flags, TriggerFlags::default());
    }

    #[test]
    fn test_connected_ids_are_unique_per_word() {
        for period in [Period::PbPb2015, Period::XeXe2017, Period::PbPb2018] {
            let map = TriggerInputMap::for_period(period);
            let mut seen_l0 = std::collections::HashSet::new();
            let mut seen_l1 = std::collections::HashSet::new();
            for d in map.defs() {
                if d.id == 0 {
                    continue;
                }
                let seen = match d.level {
                    Level::L0 => &mut seen_l0,
                    Level::L1 => &mut seen_l1,
                };
                assert!(seen.insert(d.id), "{period:?}: duplicate id {}", d.id);
            }
        }
    }
}
