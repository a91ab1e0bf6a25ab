//! Property-based tests for the state classifier.
//!
//! The classifier must be total over every raw code a host could ever
//! report, and the settled set must stay exactly the four resting states.

use proptest::prelude::*;

use vmwatch::MachineState;

const KNOWN_CODES: [u16; 10] = [2, 3, 4, 6, 9, 32770, 32773, 32774, 32776, 32777];

proptest! {
    #[test]
    fn classify_is_total_and_deterministic(raw in any::<u16>()) {
        let first = MachineState::classify(raw);
        let second = MachineState::classify(raw);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn codes_outside_the_known_set_are_unknown(raw in any::<u16>()) {
        prop_assume!(!KNOWN_CODES.contains(&raw));
        prop_assert_eq!(MachineState::classify(raw), MachineState::Unknown);
        prop_assert!(!MachineState::classify(raw).is_settled());
    }

    #[test]
    fn settled_states_are_resting_states(raw in any::<u16>()) {
        let state = MachineState::classify(raw);
        if state.is_settled() {
            prop_assert!(matches!(
                state,
                MachineState::Running
                    | MachineState::Stopped
                    | MachineState::Saved
                    | MachineState::Paused
            ));
        }
    }
}
