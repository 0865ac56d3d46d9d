//! Property-based tests for the display/transport projections

use super::projection::{is_blank, project_to_display, project_to_transport, turn_to_display};
use super::types::{DisplayMessage, Role, TransportTurn};
use proptest::prelude::*;

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant)]
}

fn arb_display_message() -> impl Strategy<Value = DisplayMessage> {
    (arb_role(), any::<String>()).prop_map(|(role, content)| DisplayMessage { role, content })
}

proptest! {
    #[test]
    fn display_round_trips_through_transport(message in arb_display_message()) {
        let turn = project_to_transport(&message);
        prop_assert_eq!(turn_to_display(&turn), message);
    }

    #[test]
    fn projection_preserves_length_and_order(messages in proptest::collection::vec(arb_display_message(), 0..20)) {
        let history: Vec<TransportTurn> = messages.iter().map(project_to_transport).collect();
        prop_assert_eq!(project_to_display(&history), messages);
    }

    #[test]
    fn stored_json_round_trips(messages in proptest::collection::vec(arb_display_message(), 1..10)) {
        let history: Vec<TransportTurn> = messages.iter().map(project_to_transport).collect();
        let json = serde_json::to_string(&history).unwrap();
        let parsed: Vec<TransportTurn> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, history);
    }

    #[test]
    fn whitespace_only_is_blank(ws in "[ \t\r\n]{0,10}") {
        prop_assert!(is_blank(Some(&ws)));
    }

    #[test]
    fn any_visible_char_is_not_blank(prefix in "[ \t]{0,5}", c in "[a-zA-Z0-9?!]", suffix in "[ \t]{0,5}") {
        let text = format!("{prefix}{c}{suffix}");
        prop_assert!(!is_blank(Some(&text)));
    }
}
