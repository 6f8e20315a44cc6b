//! Identity tracking for cycle detection.

use crate::value::Shared;
use crate::{Value, ValueMap};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// A composite handle compared and hashed by address.
///
/// Holding the handle keeps the node alive, so its address cannot be reused
/// by another node while the tracker exists.
#[derive(Clone, Debug)]
pub enum Identity {
    Array(Shared<Vec<Value>>),
    Object(Shared<ValueMap>),
    Set(Shared<Vec<Value>>),
    Map(Shared<Vec<(Value, Value)>>),
}

impl Identity {
    /// The identity of a composite value, `None` for primitives.
    #[must_use]
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Identity::Array(items.clone())),
            Value::Object(obj) => Some(Identity::Object(obj.clone())),
            Value::Set(members) => Some(Identity::Set(members.clone())),
            Value::Map(entries) => Some(Identity::Map(entries.clone())),
            _ => None,
        }
    }

    fn addr(&self) -> usize {
        match self {
            Identity::Array(items) | Identity::Set(items) => items.addr(),
            Identity::Object(obj) => obj.addr(),
            Identity::Map(entries) => entries.addr(),
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

/// The set of composites visited so far in one traversal.
///
/// Entries are never removed: a node seen once stays seen until the
/// traversal ends, whichever branch reaches it next.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    seen: HashSet<Identity>,
}

impl IdentityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn was_seen(&self, id: &Identity) -> bool {
        self.seen.contains(id)
    }

    pub fn mark_seen(&mut self, id: Identity) {
        self.seen.insert(id);
    }

    /// Marks `id` and returns `true` if this is its first visit.
    pub fn visit(&mut self, id: Identity) -> bool {
        self.seen.insert(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_structure() {
        let a = Value::empty_object();
        let b = Value::empty_object();
        let mut tracker = IdentityTracker::new();

        tracker.mark_seen(Identity::of(&a).unwrap());
        assert!(tracker.was_seen(&Identity::of(&a.clone()).unwrap()));
        assert!(!tracker.was_seen(&Identity::of(&b).unwrap()));
    }

    #[test]
    fn test_visit_reports_first_time_only() {
        let list = Value::array([Value::from(1)]);
        let mut tracker = IdentityTracker::new();

        assert!(tracker.visit(Identity::of(&list).unwrap()));
        assert!(!tracker.visit(Identity::of(&list).unwrap()));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_primitives_have_no_identity() {
        assert!(Identity::of(&Value::from("text")).is_none());
        assert!(Identity::of(&Value::Null).is_none());
        assert!(Identity::of(&Value::set([])).is_some());
    }
}
