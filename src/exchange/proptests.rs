//! Property-based tests for the exchange state machine

use super::*;
use proptest::prelude::*;

fn arb_state() -> impl Strategy<Value = ExchangeState> {
    prop_oneof![
        Just(ExchangeState::Idle),
        Just(ExchangeState::Submitting),
        Just(ExchangeState::Settled),
        Just(ExchangeState::Failed),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Submit),
        Just(Event::ResponseReceived),
        Just(Event::TransportFailed),
        Just(Event::Finish),
        Just(Event::ResetRequested),
    ]
}

proptest! {
    #[test]
    fn submit_only_accepted_when_idle(state in arb_state()) {
        let result = transition(state, Event::Submit);
        if state == ExchangeState::Idle {
            prop_assert_eq!(result, Ok(ExchangeState::Submitting));
        } else {
            prop_assert_eq!(result, Err(TransitionError::Busy));
        }
    }

    #[test]
    fn reset_never_leaves_idle_or_interrupts(state in arb_state()) {
        let result = transition(state, Event::ResetRequested);
        if state.is_busy() {
            prop_assert_eq!(result, Err(TransitionError::Busy));
        } else {
            prop_assert_eq!(result, Ok(ExchangeState::Idle));
        }
    }

    #[test]
    fn transition_is_deterministic(state in arb_state(), event in arb_event()) {
        prop_assert_eq!(transition(state, event), transition(state, event));
    }

    #[test]
    fn at_most_one_submission_in_flight(events in proptest::collection::vec(arb_event(), 0..50)) {
        let mut state = ExchangeState::Idle;
        let mut in_flight = 0u32;

        for event in events {
            let Ok(next) = transition(state, event) else {
                continue;
            };
            if event == Event::Submit {
                in_flight += 1;
            }
            if next == ExchangeState::Idle && state != ExchangeState::Idle {
                in_flight -= 1;
            }
            prop_assert!(in_flight <= 1);
            prop_assert_eq!(in_flight == 1, next.is_busy());
            state = next;
        }
    }

    #[test]
    fn outcome_states_only_lead_back_to_idle(event in arb_event()) {
        for state in [ExchangeState::Settled, ExchangeState::Failed] {
            if let Ok(next) = transition(state, event) {
                prop_assert_eq!(next, ExchangeState::Idle);
            }
        }
    }
}
