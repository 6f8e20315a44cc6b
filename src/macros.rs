/// Builds a [`Value`](crate::Value) from JSON-like literal syntax.
///
/// `undefined` and `null` are both available. Every array and object
/// written in the macro is a fresh node; to share a node, build it first and
/// pass the binding in.
///
/// ```rust
/// use safe_stringify::{value, Value};
///
/// let shared = value!([1, 2]);
/// let data = value!({ "a": shared, "b": shared, "missing": undefined });
///
/// let obj = data.as_object().unwrap().borrow();
/// assert_eq!(obj.get("a"), obj.get("b"));
/// assert_eq!(obj.get("missing"), Some(&Value::Undefined));
/// ```
#[macro_export]
macro_rules! value {
    (undefined) => {
        $crate::Value::Undefined
    };

    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::empty_object()
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let object = $crate::Value::empty_object();
        $(
            object.insert($key, $crate::value!($value));
        )*
        object
    }};

    // Anything else goes through `From`; bindings are cloned so composites stay shared.
    ($e:expr) => {
        $crate::Value::from(::std::clone::Clone::clone(&$e))
    };
}
