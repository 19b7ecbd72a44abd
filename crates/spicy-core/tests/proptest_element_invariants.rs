//! Property-based invariant tests for the element model.
//!
//! 1. `ElementKind::from_tag` ignores ASCII case and surrounding whitespace.
//! 2. Only inputs, selects and text areas report a value.
//! 3. A value-bearing element reports exactly the value it was built with.

use proptest::prelude::*;
use spicy_core::{Element, ElementKind, Event, EventKind};

fn tag_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("input".to_string()),
        Just("select".to_string()),
        Just("textarea".to_string()),
        Just("button".to_string()),
        "[a-z]{1,8}",
    ]
}

fn flip_case(s: &str, mask: u64) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask >> (i % 64) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn from_tag_ignores_case(tag in tag_strategy(), mask in any::<u64>(), pad in 0usize..3) {
        let noisy = format!("{}{}{}", " ".repeat(pad), flip_case(&tag, mask), " ".repeat(pad));
        prop_assert_eq!(ElementKind::from_tag(&noisy), ElementKind::from_tag(&tag));
    }

    #[test]
    fn only_value_bearing_elements_report_values(tag in tag_strategy(), value in ".{0,16}") {
        let element = Element::from_tag(&tag).with_value(value.clone());
        let bearing = matches!(tag.as_str(), "input" | "select" | "textarea");
        prop_assert_eq!(element.kind().is_value_bearing(), bearing);
        if bearing {
            prop_assert_eq!(element.value(), Some(value.as_str()));
        } else {
            prop_assert_eq!(element.value(), None);
        }
    }

    #[test]
    fn event_value_tracks_target(tag in tag_strategy(), value in ".{0,16}") {
        let element = Element::from_tag(&tag).with_value(value);
        let expected = element.value().map(str::to_owned);
        let event = Event::new(EventKind::Change).with_target(element);
        prop_assert_eq!(event.target_value().map(str::to_owned), expected);
    }
}
