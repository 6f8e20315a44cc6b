//! Property-based tests for the substitution guarantees.
//!
//! Generated trees are checked for the properties that must hold for every
//! input: output is valid JSON, lossy values never leak through as their
//! JSON form, and repeated references collapse to the circular token.

use proptest::prelude::*;
use safe_stringify::{placeholder, to_string, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e9..1.0e9f64).prop_map(Value::from),
        Just(Value::from(f64::INFINITY)),
        Just(Value::from(f64::NEG_INFINITY)),
        Just(Value::from(-0.0)),
        ".{0,8}".prop_map(Value::from),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::vec(("[a-z]{1,4}", inner.clone()), 0..4)
                .prop_map(Value::object),
            prop::collection::vec(inner, 0..4).prop_map(Value::set),
        ]
    })
}

/// Every JSON leaf must be a string or a non-zero number or `true`, except
/// `null`, which is how the encoder writes NaN.
fn no_lossy_leaves(json: &serde_json::Value) -> bool {
    match json {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Null => true,
        serde_json::Value::Array(items) => items.iter().all(no_lossy_leaves),
        serde_json::Value::Object(props) => props.values().all(no_lossy_leaves),
    }
}

proptest! {
    #[test]
    fn prop_output_is_json_without_lossy_leaves(value in tree()) {
        let text = to_string(&value).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        prop_assert!(no_lossy_leaves(&json));
    }

    #[test]
    fn prop_integers(n in any::<i64>()) {
        let text = to_string(&Value::from(n)).unwrap();
        if n == 0 {
            prop_assert_eq!(text, format!("\"{}\"", placeholder::ZERO));
        } else {
            prop_assert_eq!(text, n.to_string());
        }
    }

    #[test]
    fn prop_non_empty_strings_pass_through(s in ".{1,16}") {
        let text = to_string(&Value::from(s.as_str())).unwrap();
        let back: String = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(back, s);
    }

    #[test]
    fn prop_repeated_child_is_circular(value in tree(), copies in 2usize..5) {
        let shared = Value::array([value]);
        let root = Value::array(std::iter::repeat(shared).take(copies));
        let text = to_string(&root).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let items = json.as_array().unwrap();

        prop_assert_eq!(items.len(), copies);
        for item in &items[1..] {
            prop_assert_eq!(item, &serde_json::json!(placeholder::CIRCULAR));
        }
    }
}
