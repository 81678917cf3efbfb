//! The trigger-pattern classifier.
//!
//! A pure function from decoded flags to exactly one category. The rules are
//! evaluated in order and the first match wins; later rules are only reached
//! when every earlier one failed, so the categories are mutually exclusive
//! without any cross-checks.

use ct_core::{Category, TriggerFlags, TriggerInput};

/// Classify one event from its decoded trigger flags.
///
/// Classification is independent of the run table: an event from an unknown
/// run still gets a category, it is only excluded from weighted statistics
/// by the accumulator.
#[inline]
pub fn classify(flags: &TriggerFlags) -> Category {
    let side_a = flags.fired(TriggerInput::V0aInGate) || flags.fired(TriggerInput::AdaInGate);
    let side_c = flags.fired(TriggerInput::V0cInGate) || flags.fired(TriggerInput::AdcInGate);
    let central =
        flags.fired(TriggerInput::SpdFastOr) || flags.fired(TriggerInput::SpdTopological);

    if !side_a && !side_c {
        Category::Empty
    } else if side_a && !side_c {
        Category::BeamSideA
    } else if side_c && !side_a {
        Category::BeamSideC
    } else if central {
        // Both sides gated; SPD confirmation promotes this to a candidate.
        Category::CollisionCandidate
    } else {
        Category::Rejected
    }
}
