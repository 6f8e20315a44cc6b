//! # safe_stringify
//!
//! JSON serialization for dynamic value graphs that never loses sight of a
//! value.
//!
//! ## What does it do?
//!
//! Plain JSON encoders have two blind spots when they are used to dump
//! runtime state for debugging:
//!
//! - **Cycles**: an object that (directly or indirectly) contains itself
//!   makes a recursive encoder loop until it fails
//! - **Lossy values**: `undefined`, `null`, `false`, `0`, `-0`, `""`,
//!   `Infinity` and `-Infinity` are dropped, merged or rejected
//!
//! `safe_stringify` runs every node of a [`Value`] graph through a fixed
//! substitution policy before `serde_json` sees it. Lossy values become
//! readable placeholder tokens, and a composite reached a second time
//! becomes `"~~~ Circular Reference ~~~"` instead of being walked again.
//!
//! ## Quick Start
//!
//! ```rust
//! use safe_stringify::{to_string, value};
//!
//! let state = value!({
//!     "count": 0,
//!     "enabled": false,
//!     "title": "",
//!     "owner": null
//! });
//!
//! assert_eq!(
//!     to_string(&state).unwrap(),
//!     concat!(
//!         r#"{"count":"~~~ zero ~~~","enabled":"~~~ false ~~~","#,
//!         r#""title":"~~~ empty string ~~~","owner":"~~~ null ~~~"}"#
//!     )
//! );
//! ```
//!
//! ### Cycles
//!
//! ```rust
//! use safe_stringify::{to_string, Value};
//!
//! let node = Value::empty_object();
//! node.insert("self", node.clone());
//!
//! assert_eq!(
//!     to_string(&node).unwrap(),
//!     r#"{"self":"~~~ Circular Reference ~~~"}"#
//! );
//! ```
//!
//! Shared substructure counts as a repeat visit too: a node reachable
//! through two paths is encoded in full the first time and as the circular
//! token every time after that.
//!
//! ## Placeholders
//!
//! The full token table is in [`placeholder`]. Tokens are plain strings, so
//! a real string with the same content cannot be told apart from a
//! substituted value. NaN has no token and is written as JSON `null`.
//!
//! ## Non-goals
//!
//! - No encoder of its own: all text is produced by `serde_json`
//! - No deserialization: the output is meant to be read, not parsed back
//! - No escaping of placeholder look-alikes

pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod placeholder;
pub mod policy;
pub mod ser;
pub mod tracker;
pub mod value;

pub use error::{Error, Result};
pub use map::ValueMap;
pub use options::SafeOptions;
pub use policy::{Key, Policy, Transform};
pub use ser::Serializer;
pub use tracker::{Identity, IdentityTracker};
pub use value::{Function, Number, Shared, Value};

use serde::Serialize;
use std::io;

/// Serialize a value graph to a compact JSON string.
///
/// `nativeEvent` wrappers are left alone; use [`to_string_with_options`] to
/// unwrap them.
///
/// # Examples
///
/// ```rust
/// use safe_stringify::{to_string, Value};
///
/// assert_eq!(to_string(&Value::Undefined).unwrap(), r#""~~~ undefined ~~~""#);
/// ```
///
/// # Errors
///
/// Returns an error if the graph contains a value JSON cannot represent
/// (`BigInt`).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(value: &Value) -> Result<String> {
    to_string_with_options(value, SafeOptions::default())
}

/// Serialize a value graph to a pretty-printed JSON string.
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty(value: &Value) -> Result<String> {
    to_string_with_options(value, SafeOptions::pretty())
}

/// Serialize a value graph to a JSON string with custom options.
///
/// # Examples
///
/// ```rust
/// use safe_stringify::{to_string_with_options, value, SafeOptions};
///
/// let wrapper = value!({ "nativeEvent": { "x": 1 } });
///
/// let plain = to_string_with_options(&wrapper, SafeOptions::new()).unwrap();
/// assert_eq!(plain, r#"{"nativeEvent":{"x":1}}"#);
///
/// let unwrapped = SafeOptions::new().with_native_event_unwrap(true);
/// assert_eq!(to_string_with_options(&wrapper, unwrapped).unwrap(), r#"{"x":1}"#);
/// ```
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(value: &Value, options: SafeOptions) -> Result<String> {
    Serializer::new(options).to_string(value)
}

/// Serialize a value graph as compact JSON into a writer.
///
/// # Examples
///
/// ```rust
/// use safe_stringify::{to_writer, value};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &value!([0, 1])).unwrap();
/// assert_eq!(buffer, br#"["~~~ zero ~~~",1]"#);
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, value, SafeOptions::default())
}

/// Serialize a value graph as JSON into a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(writer: W, value: &Value, options: SafeOptions) -> Result<()>
where
    W: io::Write,
{
    Serializer::new(options).to_writer(writer, value)
}

/// Produce the substituted tree as a `serde_json::Value` instead of text.
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_value(value: &Value) -> Result<serde_json::Value> {
    Serializer::new(SafeOptions::default()).to_json_value(value)
}

/// Convert any `T: Serialize` into a [`Value`] tree.
///
/// The result is a fresh tree with no sharing. Options become `Null`.
///
/// # Examples
///
/// ```rust
/// use safe_stringify::{to_string, to_value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 0, y: 2 }).unwrap();
/// assert_eq!(to_string(&value).unwrap(), r#"{"x":"~~~ zero ~~~","y":2}"#);
/// ```
///
/// # Errors
///
/// Returns an error if `T`'s `Serialize` implementation fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    Ok(Value::from(serde_json::to_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Settings {
        retries: u32,
        name: String,
        verbose: bool,
        limit: Option<u32>,
    }

    #[test]
    fn test_to_value_keeps_falsy_fields_visible() {
        let settings = Settings {
            retries: 0,
            name: String::new(),
            verbose: false,
            limit: None,
        };

        let json = to_string(&to_value(&settings).unwrap()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"retries":"~~~ zero ~~~","name":"~~~ empty string ~~~","#,
                r#""verbose":"~~~ false ~~~","limit":"~~~ null ~~~"}"#
            )
        );
    }

    #[test]
    fn test_pretty_printing() {
        let value = value!({ "a": [1] });
        assert_eq!(
            to_string_pretty(&value).unwrap(),
            "{\n  \"a\": [\n    1\n  ]\n}"
        );
    }

    #[test]
    fn test_to_json_value() {
        let out = to_json_value(&value!({ "n": null })).unwrap();
        assert_eq!(out, serde_json::json!({ "n": placeholder::NULL }));
    }

    #[test]
    fn test_writer_errors_are_io() {
        struct Broken;

        impl io::Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = to_writer(Broken, &value!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
