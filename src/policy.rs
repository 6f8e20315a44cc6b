//! The substitution policy.
//!
//! [`Policy::substitute`] decides, for one `(key, value)` node of the walk,
//! what the encoder actually receives. The rules are checked in a fixed
//! order and the first match wins:
//!
//! 1. `true` passes through.
//! 2. Positive infinity becomes [`INFINITY`](crate::placeholder::INFINITY).
//! 3. Negative infinity becomes [`NEGATIVE_INFINITY`](crate::placeholder::NEGATIVE_INFINITY).
//! 4. Zero and negative zero become [`ZERO`](crate::placeholder::ZERO).
//! 5. `Undefined` becomes [`UNDEFINED`](crate::placeholder::UNDEFINED).
//! 6. `Null` becomes [`NULL`](crate::placeholder::NULL).
//! 7. `false` becomes [`FALSE`](crate::placeholder::FALSE).
//! 8. The empty string becomes [`EMPTY_STRING`](crate::placeholder::EMPTY_STRING).
//! 9. If enabled, an object whose `nativeEvent` property is truthy is
//!    replaced by that property, which goes through these rules again. A
//!    wrapper reached a second time becomes the circular token.
//! 10. Other strings pass through.
//! 11. Other numbers pass through. This includes NaN, which has no token.
//! 12. Functions become `~~~ name() ~~~` or the anonymous token.
//! 13. Sets and maps are drained into a fresh array (maps as `[key, value]`
//!     pairs), unless the collection was already visited.
//! 14. Arrays and objects already visited become the circular token; on the
//!     first visit they are marked and passed through, or handed to the
//!     caller transform when one is installed.
//!
//! Anything else (`BigInt`) passes through and is left to the encoder.
//!
//! The returned value is what gets encoded. If it is a composite, the
//! encoder visits its children, each through the policy again; the returned
//! value itself is not re-checked.

use crate::placeholder;
use crate::tracker::{Identity, IdentityTracker};
use crate::{Result, Value};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Property name unwrapped by rule 9.
pub const NATIVE_EVENT: &str = "nativeEvent";

/// Where a node sits in its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    /// The value passed to the top-level call.
    Root,
    /// An element of an array.
    Index(usize),
    /// A property of an object.
    Field(&'a str),
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Root => Ok(()),
            Key::Index(i) => write!(f, "{}", i),
            Key::Field(name) => f.write_str(name),
        }
    }
}

/// A caller-supplied transform applied to arrays and objects on their first
/// visit. Its result replaces the value; an error aborts the whole call and
/// is returned to the caller unchanged.
pub type Transform = dyn Fn(&Key<'_>, Value) -> Result<Value>;

/// Per-traversal substitution state.
pub struct Policy {
    tracker: IdentityTracker,
    unwrap_native_event: bool,
    transform: Option<Rc<Transform>>,
}

impl Policy {
    pub fn new(unwrap_native_event: bool) -> Self {
        Policy {
            tracker: IdentityTracker::new(),
            unwrap_native_event,
            transform: None,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Rc<Transform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn tracker(&self) -> &IdentityTracker {
        &self.tracker
    }

    /// Returns the value to encode in place of `value`.
    ///
    /// # Errors
    ///
    /// Only a caller transform can fail; its error is returned as-is.
    pub fn substitute(&mut self, key: &Key<'_>, value: &Value) -> Result<Value> {
        match value {
            Value::Bool(true) => Ok(Value::Bool(true)),
            Value::Number(n) if n.is_positive_infinity() => Ok(token(placeholder::INFINITY)),
            Value::Number(n) if n.is_negative_infinity() => {
                Ok(token(placeholder::NEGATIVE_INFINITY))
            }
            Value::Number(n) if n.is_zero() => Ok(token(placeholder::ZERO)),
            Value::Undefined => Ok(token(placeholder::UNDEFINED)),
            Value::Null => Ok(token(placeholder::NULL)),
            Value::Bool(false) => Ok(token(placeholder::FALSE)),
            Value::String(s) if s.is_empty() => Ok(token(placeholder::EMPTY_STRING)),
            Value::Object(obj) if self.unwrap_native_event => {
                let inner = obj
                    .borrow()
                    .get(NATIVE_EVENT)
                    .filter(|inner| inner.is_truthy())
                    .cloned();
                match inner {
                    Some(inner) => {
                        // the wrapper counts as visited, so wrapper cycles end
                        if !self.tracker.visit(Identity::Object(obj.clone())) {
                            trace!(key = %key, "circular nativeEvent wrapper replaced");
                            return Ok(token(placeholder::CIRCULAR));
                        }
                        trace!(key = %key, "unwrapping nativeEvent");
                        self.substitute(key, &inner)
                    }
                    None => self.track(key, value),
                }
            }
            Value::String(_) | Value::Number(_) => Ok(value.clone()),
            Value::Function(f) => Ok(Value::String(placeholder::function(f.name()))),
            Value::Set(members) => {
                if !self.tracker.visit(Identity::Set(members.clone())) {
                    trace!(key = %key, "circular set replaced");
                    return Ok(token(placeholder::CIRCULAR));
                }
                trace!(key = %key, len = members.borrow().len(), "materializing set");
                Ok(Value::array(members.borrow().iter().cloned()))
            }
            Value::Map(entries) => {
                if !self.tracker.visit(Identity::Map(entries.clone())) {
                    trace!(key = %key, "circular map replaced");
                    return Ok(token(placeholder::CIRCULAR));
                }
                trace!(key = %key, len = entries.borrow().len(), "materializing map");
                let pairs: Vec<Value> = entries
                    .borrow()
                    .iter()
                    .map(|(k, v)| Value::array([k.clone(), v.clone()]))
                    .collect();
                Ok(Value::from(pairs))
            }
            Value::Array(_) | Value::Object(_) => self.track(key, value),
            Value::Date(_) | Value::BigInt(_) => Ok(value.clone()),
        }
    }

    fn track(&mut self, key: &Key<'_>, value: &Value) -> Result<Value> {
        let Some(id) = Identity::of(value) else {
            return Ok(value.clone());
        };
        if self.tracker.was_seen(&id) {
            trace!(key = %key, "circular reference replaced");
            return Ok(token(placeholder::CIRCULAR));
        }
        self.tracker.mark_seen(id);
        match &self.transform {
            Some(transform) => transform(key, value.clone()),
            None => Ok(value.clone()),
        }
    }
}

fn token(text: &str) -> Value {
    Value::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Function, Number};

    fn to_t(_key: &Key<'_>, _value: Value) -> Result<Value> {
        Ok(Value::from("t"))
    }

    fn boom(_key: &Key<'_>, _value: Value) -> Result<Value> {
        Err(Error::transform("boom"))
    }

    fn substitute(value: &Value) -> Value {
        Policy::new(false).substitute(&Key::Root, value).unwrap()
    }

    #[test]
    fn test_falsy_values_get_tokens() {
        assert_eq!(substitute(&Value::Undefined), token(placeholder::UNDEFINED));
        assert_eq!(substitute(&Value::Null), token(placeholder::NULL));
        assert_eq!(substitute(&Value::Bool(false)), token(placeholder::FALSE));
        assert_eq!(substitute(&Value::from("")), token(placeholder::EMPTY_STRING));
        assert_eq!(substitute(&Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(substitute(&Value::from(0)), token(placeholder::ZERO));
        assert_eq!(substitute(&Value::from(-0.0)), token(placeholder::ZERO));
        assert_eq!(substitute(&Value::from(0.0)), token(placeholder::ZERO));
        assert_eq!(
            substitute(&Value::Number(Number::Infinity)),
            token(placeholder::INFINITY)
        );
        assert_eq!(
            substitute(&Value::from(f64::NEG_INFINITY)),
            token(placeholder::NEGATIVE_INFINITY)
        );
        assert_eq!(substitute(&Value::from(7)), Value::from(7));

        let nan = substitute(&Value::from(f64::NAN));
        assert!(matches!(nan, Value::Number(n) if n.is_nan()));
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            substitute(&Value::from(Function::named("render"))),
            token("~~~ render() ~~~")
        );
        assert_eq!(
            substitute(&Value::from(Function::anonymous())),
            token(placeholder::ANONYMOUS)
        );
    }

    #[test]
    fn test_second_visit_is_circular() {
        let obj = Value::empty_object();
        let mut policy = Policy::new(false);

        assert_eq!(policy.substitute(&Key::Root, &obj).unwrap(), obj);
        assert_eq!(
            policy.substitute(&Key::Field("again"), &obj).unwrap(),
            token(placeholder::CIRCULAR)
        );
        assert_eq!(policy.tracker().len(), 1);
    }

    #[test]
    fn test_set_is_materialized_once() {
        let set = Value::set([Value::from(1), Value::from(2)]);
        let mut policy = Policy::new(false);

        let first = policy.substitute(&Key::Root, &set).unwrap();
        let items = first.as_array().unwrap().borrow().clone();
        assert_eq!(items, vec![Value::from(1), Value::from(2)]);
        assert_eq!(
            policy.substitute(&Key::Index(0), &set).unwrap(),
            token(placeholder::CIRCULAR)
        );
    }

    #[test]
    fn test_map_becomes_pairs() {
        let map = Value::map([(Value::from("k"), Value::from(1))]);
        let out = substitute(&map);
        let pairs = out.as_array().unwrap().borrow();
        let pair = pairs[0].as_array().unwrap().borrow();
        assert_eq!(*pair, vec![Value::from("k"), Value::from(1)]);
    }

    #[test]
    fn test_native_event_only_when_enabled() {
        let event = Value::object([(NATIVE_EVENT, Value::from(7))]);

        assert_eq!(substitute(&event), event);
        assert_eq!(
            Policy::new(true).substitute(&Key::Root, &event).unwrap(),
            Value::from(7)
        );
    }

    #[test]
    fn test_falsy_native_event_is_not_unwrapped() {
        let event = Value::object([(NATIVE_EVENT, Value::from(0))]);
        let mut policy = Policy::new(true);

        assert_eq!(policy.substitute(&Key::Root, &event).unwrap(), event);
        assert_eq!(policy.tracker().len(), 1);
    }

    #[test]
    fn test_native_event_wrapper_cycle_ends() {
        let event = Value::empty_object();
        event.insert(NATIVE_EVENT, event.clone());

        assert_eq!(
            Policy::new(true).substitute(&Key::Root, &event).unwrap(),
            token(placeholder::CIRCULAR)
        );
    }

    #[test]
    fn test_transform_runs_on_first_visit_only() {
        let obj = Value::empty_object();
        let mut policy = Policy::new(false).with_transform(Rc::new(to_t));

        assert_eq!(policy.substitute(&Key::Root, &obj).unwrap(), Value::from("t"));
        assert_eq!(
            policy.substitute(&Key::Root, &obj).unwrap(),
            token(placeholder::CIRCULAR)
        );
        // primitives never reach the transform
        assert_eq!(policy.substitute(&Key::Root, &Value::from(5)).unwrap(), Value::from(5));
    }

    #[test]
    fn test_transform_error_passes_through() {
        let mut policy = Policy::new(false).with_transform(Rc::new(boom));

        let err = policy.substitute(&Key::Root, &Value::array([])).unwrap_err();
        assert!(matches!(err, Error::Transform(msg) if msg == "boom"));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::Root.to_string(), "");
        assert_eq!(Key::Index(3).to_string(), "3");
        assert_eq!(Key::Field("name").to_string(), "name");
    }
}
