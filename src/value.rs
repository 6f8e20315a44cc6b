//! Dynamic value graphs.
//!
//! This module provides the [`Value`] enum, a dynamically typed value modelled
//! on the values a scripting runtime hands to a debug printer: it knows
//! `undefined` as well as `null`, special numbers, callables, and composites
//! that are shared by reference.
//!
//! ## Core Types
//!
//! - [`Value`]: any value, primitive or composite
//! - [`Number`]: integers, floats and the special values (Infinity, -Infinity, NaN)
//! - [`Shared`]: a reference-counted handle to a composite's contents
//! - [`Function`]: a callable with an optional discoverable name
//!
//! ## Sharing and cycles
//!
//! Composites (`Array`, `Object`, `Set`, `Map`) hold a [`Shared`] handle.
//! Cloning the value clones the handle, so both clones point at the same
//! node. That is how shared substructure and cycles are built:
//!
//! ```rust
//! use safe_stringify::Value;
//!
//! let a = Value::empty_object();
//! a.insert("self", a.clone());
//!
//! let inner = a.as_object().unwrap().borrow().get("self").cloned().unwrap();
//! assert_eq!(inner, a); // same node, compared by identity
//! ```
//!
//! Equality of composites is reference identity, never structural equality.
//! Note that a cyclic graph built from `Rc` handles is never freed; that is
//! acceptable for short-lived diagnostic values but worth knowing.

use crate::ValueMap;
use chrono::{DateTime, Utc};
use num_bigint::{BigInt, Sign};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A reference-counted, interior-mutable handle to the contents of a
/// composite value.
///
/// Clones alias the same contents. Equality and hashing helpers work on
/// identity, not on the contents.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(inner: T) -> Self {
        Shared(Rc::new(RefCell::new(inner)))
    }

    /// Immutably borrows the contents.
    ///
    /// # Panics
    ///
    /// Panics if the contents are currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrows the contents.
    ///
    /// # Panics
    ///
    /// Panics if the contents are currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

// Printing the contents could loop forever on a cycle.
impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.addr())
    }
}

type Body = dyn Fn(&[Value]) -> Value;

struct FunctionInner {
    name: Option<String>,
    body: Option<Box<Body>>,
}

/// A callable value.
///
/// Only its name matters to the serializer; the body, if any, can be
/// invoked with [`Function::call`].
///
/// # Examples
///
/// ```rust
/// use safe_stringify::{Function, Value};
///
/// fn on_click(_args: &[Value]) -> Value {
///     Value::Null
/// }
///
/// assert_eq!(Function::from_fn(on_click).name(), Some("on_click"));
/// assert_eq!(Function::from_fn(|_: &[Value]| Value::Null).name(), None);
/// assert_eq!(Function::named("render").name(), Some("render"));
/// ```
#[derive(Clone)]
pub struct Function(Rc<FunctionInner>);

impl Function {
    /// A body-less function with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Function(Rc::new(FunctionInner {
            name: Some(name.into()),
            body: None,
        }))
    }

    /// A body-less function without a name.
    pub fn anonymous() -> Self {
        Function(Rc::new(FunctionInner {
            name: None,
            body: None,
        }))
    }

    /// Wraps a Rust callable, naming it after the item it was defined as.
    ///
    /// Function items get the last segment of their path; closures stay
    /// anonymous.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Function(Rc::new(FunctionInner {
            name: infer_name(std::any::type_name::<F>()),
            body: Some(Box::new(f)),
        }))
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Invokes the body. A body-less function returns `Undefined`.
    pub fn call(&self, args: &[Value]) -> Value {
        match &self.0.body {
            Some(body) => body(args),
            None => Value::Undefined,
        }
    }
}

/// Names a callable after its function item path.
///
/// Closures, function pointers, references, trait objects and wrapper types
/// such as `Box<dyn Fn>` have no item name of their own.
fn infer_name(type_name: &str) -> Option<String> {
    if type_name.contains('{')
        || ["fn(", "for<", "&", "*", "(", "[", "dyn "]
            .iter()
            .any(|prefix| type_name.starts_with(prefix))
    {
        return None;
    }
    let path = type_name.split('<').next().unwrap_or(type_name);
    let last = path.rsplit("::").next().unwrap_or(path);
    // function items are snake_case, types are not
    match last.chars().next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => Some(last.to_string()),
        _ => None,
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.0.name)
            .field("has_body", &self.0.body.is_some())
            .finish()
    }
}

/// A dynamically typed value, possibly part of a cyclic graph.
///
/// # Examples
///
/// ```rust
/// use safe_stringify::{Number, Value};
///
/// let undefined = Value::Undefined;
/// let num = Value::Number(Number::Integer(42));
/// let list = Value::array([Value::from(1), Value::from(2)]);
///
/// assert!(undefined.is_undefined());
/// assert!(num.is_number());
/// assert!(list.is_composite());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    Array(Shared<Vec<Value>>),
    Object(Shared<ValueMap>),
    /// Iterable collection of members, not indexable.
    Set(Shared<Vec<Value>>),
    /// Iterable collection of key/value entries, keys of any type.
    Map(Shared<Vec<(Value, Value)>>),
    Function(Function),
}

/// A numeric value that can be an integer, float, or special value.
///
/// # Examples
///
/// ```rust
/// use safe_stringify::Number;
///
/// assert!(Number::Integer(0).is_zero());
/// assert!(Number::Float(-0.0).is_zero());
/// assert!(Number::Float(f64::INFINITY).is_positive_infinity());
/// assert!(Number::Infinity.is_special());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
    Infinity,
    NegativeInfinity,
    NaN,
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `true` for the special variants (Infinity, -Infinity, NaN).
    #[inline]
    #[must_use]
    pub const fn is_special(&self) -> bool {
        matches!(
            self,
            Number::Infinity | Number::NegativeInfinity | Number::NaN
        )
    }

    /// Returns `true` for zero and negative zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(i) => *i == 0,
            Number::Float(f) => *f == 0.0,
            _ => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_positive_infinity(&self) -> bool {
        match self {
            Number::Infinity => true,
            Number::Float(f) => *f == f64::INFINITY,
            _ => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_negative_infinity(&self) -> bool {
        match self {
            Number::NegativeInfinity => true,
            Number::Float(f) => *f == f64::NEG_INFINITY,
            _ => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        match self {
            Number::NaN => true,
            Number::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Converts this number to an `i64` if possible.
    ///
    /// Returns `Some(i64)` for integers and floats with no fractional part
    /// that fit in i64 range.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::Infinity => f64::INFINITY,
            Number::NegativeInfinity => f64::NEG_INFINITY,
            Number::NaN => f64::NAN,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
            Number::Infinity => write!(f, "Infinity"),
            Number::NegativeInfinity => write!(f, "-Infinity"),
            Number::NaN => write!(f, "NaN"),
        }
    }
}

impl Value {
    /// Builds a new array node.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Array(Shared::new(items.into_iter().collect()))
    }

    /// Builds a new object node from `(name, value)` pairs.
    pub fn object<I, K>(props: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(Shared::new(
            props.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn empty_object() -> Self {
        Value::Object(Shared::new(ValueMap::new()))
    }

    /// Builds a new set node. Members keep the given order.
    pub fn set<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Set(Shared::new(members.into_iter().collect()))
    }

    /// Builds a new map node. Entries keep the given order.
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        Value::Map(Shared::new(entries.into_iter().collect()))
    }

    /// Sets a property on an object node and returns the previous value.
    ///
    /// Returns `None` without effect when `self` is not an object.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.borrow_mut().insert(key.into(), value),
            _ => None,
        }
    }

    /// Appends to an array or set node. Returns `false` for other values.
    pub fn push(&self, value: Value) -> bool {
        match self {
            Value::Array(items) | Value::Set(items) => {
                items.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }

    /// JavaScript truthiness: `Undefined`, `Null`, `false`, zero, NaN, the
    /// empty string and a zero `BigInt` are falsy, everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(n.is_zero() || n.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::BigInt(bi) => bi.sign() != Sign::NoSign,
            _ => true,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Returns `true` for values shared by reference: arrays, objects,
    /// sets and maps.
    #[inline]
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::Set(_) | Value::Map(_)
        )
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Shared<Vec<Value>>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Shared<ValueMap>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value.as_i64() {
            Some(i) => Ok(i),
            None => Err(crate::Error::custom(format!(
                "expected integer, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::Integer(value as i64))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Value::Number(Number::Integer(value as i64))
        } else {
            Value::Number(Number::Float(value as f64))
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::Float(value as f64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(Shared::new(value))
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Object(Shared::new(value))
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::Integer(i))
                } else {
                    Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(props) => {
                Value::object(props.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}
