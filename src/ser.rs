//! Safe serialization on top of `serde_json`.
//!
//! This module provides the [`Serializer`], which walks a [`Value`] graph
//! through the substitution [`policy`](crate::policy) and lets `serde_json`
//! produce the text. Each call gets its own identity tracker, so calls never
//! share state.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use safe_stringify::{to_string, value};
//!
//! let data = value!({ "count": 0, "label": "" });
//! assert_eq!(
//!     to_string(&data).unwrap(),
//!     r#"{"count":"~~~ zero ~~~","label":"~~~ empty string ~~~"}"#
//! );
//! ```
//!
//! ## Caller transforms
//!
//! A transform sees every array and object on its first visit and returns
//! what should be encoded in its place:
//!
//! ```rust
//! use safe_stringify::{value, Key, SafeOptions, Serializer, Value};
//!
//! let data = value!({ "user": { "password": "hunter2" }, "id": 7 });
//!
//! let serializer = Serializer::new(SafeOptions::new()).with_transform(|key, value| {
//!     if *key == Key::Field("user") {
//!         return Ok(Value::from("[redacted]"));
//!     }
//!     Ok(value)
//! });
//!
//! assert_eq!(
//!     serializer.to_string(&data).unwrap(),
//!     r#"{"user":"[redacted]","id":7}"#
//! );
//! ```

use crate::policy::{Key, Policy, Transform};
use crate::{Error, Number, Result, SafeOptions, Value};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{self, SerializeMap, SerializeSeq};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::borrow::Cow;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use tracing::debug;

/// The safe serializer.
///
/// Holds the options and an optional caller transform; each `to_*` call
/// runs one independent traversal.
pub struct Serializer {
    options: SafeOptions,
    transform: Option<Rc<Transform>>,
}

impl Serializer {
    pub fn new(options: SafeOptions) -> Self {
        Serializer {
            options,
            transform: None,
        }
    }

    /// Installs a transform for arrays and objects on their first visit.
    ///
    /// An error returned by the transform aborts serialization and is
    /// returned from the `to_*` call unchanged.
    ///
    /// # Panics
    ///
    /// The transform must not mutate the graph being walked. Its ancestors
    /// are borrowed while it runs, so an `insert` or `push` on one of them
    /// panics with "already borrowed".
    #[must_use]
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Key<'_>, Value) -> Result<Value> + 'static,
    {
        self.transform = Some(Rc::new(transform));
        self
    }

    #[must_use]
    pub fn options(&self) -> &SafeOptions {
        &self.options
    }

    /// Serializes `value` to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform fails or the encoder rejects a value.
    pub fn to_string(&self, value: &Value) -> Result<String> {
        let mut output = Vec::with_capacity(256);
        self.to_writer(&mut output, value)?;
        let text = String::from_utf8(output).map_err(Error::custom)?;
        debug!(bytes = text.len(), "serialized value graph");
        Ok(text)
    }

    /// Serializes `value` as JSON into `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform fails, the encoder rejects a value,
    /// or writing fails.
    pub fn to_writer<W>(&self, writer: W, value: &Value) -> Result<()>
    where
        W: io::Write,
    {
        let pretty = self.options.pretty;
        self.run(value, |root| {
            if pretty {
                let indent = self.options.indent_bytes();
                let formatter = PrettyFormatter::with_indent(&indent);
                let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
                root.serialize(&mut ser)
            } else {
                let mut ser = serde_json::Serializer::new(writer);
                root.serialize(&mut ser)
            }
        })
    }

    /// Produces the substituted tree as a `serde_json::Value`.
    ///
    /// # Errors
    ///
    /// Same as [`Serializer::to_string`].
    pub fn to_json_value(&self, value: &Value) -> Result<serde_json::Value> {
        self.run(value, |root| serde_json::to_value(root))
    }

    fn run<T, F>(&self, value: &Value, encode: F) -> Result<T>
    where
        F: FnOnce(&Node<'_>) -> serde_json::Result<T>,
    {
        let mut policy = Policy::new(self.options.unwrap_native_event);
        if let Some(transform) = &self.transform {
            policy = policy.with_transform(Rc::clone(transform));
        }
        let walk = Walk {
            policy: RefCell::new(policy),
            failure: RefCell::new(None),
        };
        debug!(
            unwrap_native_event = self.options.unwrap_native_event,
            pretty = self.options.pretty,
            "serializing value graph"
        );

        let root = Node {
            key: Key::Root,
            value,
            walk: &walk,
        };
        let result = encode(&root);
        debug!(
            composites = walk.policy.borrow().tracker().len(),
            ok = result.is_ok(),
            "walk finished"
        );

        // Prefer the stashed error; the encoder only saw its message.
        result.map_err(|err| walk.failure.take().unwrap_or_else(|| Error::from(err)))
    }
}

/// State shared by all nodes of one traversal.
struct Walk {
    policy: RefCell<Policy>,
    failure: RefCell<Option<Error>>,
}

impl Walk {
    fn fail<E: ser::Error>(&self, err: Error) -> E {
        let wrapped = E::custom(&err);
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
        wrapped
    }
}

/// One `(key, value)` pair as the encoder sees it.
struct Node<'a> {
    key: Key<'a>,
    value: &'a Value,
    walk: &'a Walk,
}

impl Serialize for Node<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let value = json_form(self.value);
        let replaced = self
            .walk
            .policy
            .borrow_mut()
            .substitute(&self.key, &value);
        match replaced {
            Ok(replaced) => emit(&replaced, self.walk, serializer),
            Err(err) => Err(self.walk.fail(err)),
        }
    }
}

/// Values with a JSON form of their own are converted before the policy
/// sees them.
fn json_form(value: &Value) -> Cow<'_, Value> {
    match value {
        Value::Date(dt) => Cow::Owned(Value::String(date_json(dt))),
        _ => Cow::Borrowed(value),
    }
}

fn date_json(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn emit<S>(value: &Value, walk: &Walk, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: ser::Serializer,
{
    match value {
        Value::Undefined | Value::Null | Value::Function(_) => serializer.serialize_unit(),
        Value::Bool(b) => serializer.serialize_bool(*b),
        Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
        Value::Number(n) => serializer.serialize_f64(n.as_f64()),
        Value::String(s) => serializer.serialize_str(s),
        Value::Date(dt) => serializer.serialize_str(&date_json(dt)),
        Value::BigInt(bi) => Err(walk.fail(Error::unsupported_type(&format!(
            "BigInt {} has no JSON representation",
            bi
        )))),
        Value::Array(items) => {
            let items = items.borrow();
            let mut seq = serializer.serialize_seq(Some(items.len()))?;
            for (i, item) in items.iter().enumerate() {
                seq.serialize_element(&Node {
                    key: Key::Index(i),
                    value: item,
                    walk,
                })?;
            }
            seq.end()
        }
        Value::Object(obj) => {
            let obj = obj.borrow();
            let mut map = serializer.serialize_map(Some(obj.len()))?;
            for (name, item) in obj.iter() {
                map.serialize_entry(
                    name,
                    &Node {
                        key: Key::Field(name),
                        value: item,
                        walk,
                    },
                )?;
            }
            map.end()
        }
        // Collections reach here only as a transform result; JSON sees no members.
        Value::Set(_) | Value::Map(_) => serializer.serialize_map(Some(0))?.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder;
    use num_bigint::BigInt;

    fn compact(value: &Value) -> String {
        Serializer::new(SafeOptions::new()).to_string(value).unwrap()
    }

    #[test]
    fn test_nested_tokens() {
        let data = Value::object([
            ("a", Value::array([Value::from(0), Value::Null])),
            ("b", Value::from(true)),
        ]);
        assert_eq!(
            compact(&data),
            r#"{"a":["~~~ zero ~~~","~~~ null ~~~"],"b":true}"#
        );
    }

    #[test]
    fn test_self_reference() {
        let a = Value::empty_object();
        a.insert("self", a.clone());
        assert_eq!(
            compact(&a),
            format!(r#"{{"self":"{}"}}"#, placeholder::CIRCULAR)
        );
    }

    #[test]
    fn test_date_uses_iso_text() {
        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(compact(&Value::from(dt)), r#""2024-01-15T10:30:00.000Z""#);
    }

    #[test]
    fn test_bigint_is_rejected() {
        let err = Serializer::new(SafeOptions::new())
            .to_string(&Value::array([Value::from(BigInt::from(12))]))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_nan_is_encoded_as_json_null() {
        assert_eq!(compact(&Value::from(f64::NAN)), "null");
    }

    #[test]
    fn test_transform_result_is_encoded() {
        let serializer = Serializer::new(SafeOptions::new())
            .with_transform(|_key, _value| Ok(Value::array([Value::from(false)])));
        // the replacement is not re-checked, its children are
        assert_eq!(
            serializer.to_string(&Value::empty_object()).unwrap(),
            r#"["~~~ false ~~~"]"#
        );
    }

    #[test]
    fn test_transform_error_is_returned_unchanged() {
        let serializer = Serializer::new(SafeOptions::new()).with_transform(|key, value| {
            if *key == Key::Field("bad") {
                Err(Error::transform("bad field"))
            } else {
                Ok(value)
            }
        });
        let data = Value::object([("bad", Value::array([]))]);

        let err = serializer.to_string(&data).unwrap_err();
        assert!(matches!(err, Error::Transform(msg) if msg == "bad field"));
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn test_transform_mutating_an_ancestor_panics() {
        let root = Value::object([("child", Value::empty_object())]);
        let handle = root.clone();
        let serializer = Serializer::new(SafeOptions::new()).with_transform(move |key, value| {
            if *key == Key::Field("child") {
                handle.insert("late", Value::from(1));
            }
            Ok(value)
        });

        let _ = serializer.to_string(&root);
    }

    #[test]
    fn test_pretty_indent() {
        let serializer = Serializer::new(SafeOptions::pretty().with_indent(4));
        let out = serializer
            .to_string(&Value::object([("k", Value::from(1))]))
            .unwrap();
        assert_eq!(out, "{\n    \"k\": 1\n}");
    }

    #[test]
    fn test_to_json_value() {
        let serializer = Serializer::new(SafeOptions::new());
        let out = serializer
            .to_json_value(&Value::array([Value::Undefined, Value::from(2)]))
            .unwrap();
        assert_eq!(out, serde_json::json!([placeholder::UNDEFINED, 2]));
    }
}
