//! Placeholder tokens.
//!
//! Each token stands in for a value that plain JSON would drop, crash on, or
//! collapse into something else. The substitution rules that emit them live
//! in [`policy`](crate::policy).
//!
//! | Condition | Token |
//! |---|---|
//! | absence-of-value (`Undefined`) | `~~~ undefined ~~~` |
//! | `Null` | `~~~ null ~~~` |
//! | `false` | `~~~ false ~~~` |
//! | zero or negative zero | `~~~ zero ~~~` |
//! | empty string | `~~~ empty string ~~~` |
//! | repeated composite reference | `~~~ Circular Reference ~~~` |
//! | unnamed function | `~~~ anonymous function ~~~` |
//! | function named `foo` | `~~~ foo() ~~~` |
//! | positive infinity | `~~~ Infinity ~~~` |
//! | negative infinity | `~~~ -Infinity ~~~` |
//!
//! NaN has no token. It is passed to the encoder as a number, and
//! `serde_json` writes non-finite numbers as `null`.
//!
//! # Ambiguity
//!
//! Tokens are ordinary strings. A real string whose content is `~~~ null ~~~`
//! encodes exactly like a substituted `Null`, and nothing in the output tells
//! the two apart. Tokens are not escaped; consumers that need to distinguish
//! them must not feed such strings in.
//!
//! ```rust
//! use safe_stringify::{placeholder, to_string, Value};
//!
//! let real = to_string(&Value::from(placeholder::NULL)).unwrap();
//! let substituted = to_string(&Value::Null).unwrap();
//! assert_eq!(real, substituted);
//! ```

pub const UNDEFINED: &str = "~~~ undefined ~~~";
pub const NULL: &str = "~~~ null ~~~";
pub const FALSE: &str = "~~~ false ~~~";
pub const ZERO: &str = "~~~ zero ~~~";
pub const EMPTY_STRING: &str = "~~~ empty string ~~~";
pub const CIRCULAR: &str = "~~~ Circular Reference ~~~";
pub const ANONYMOUS: &str = "~~~ anonymous function ~~~";
pub const INFINITY: &str = "~~~ Infinity ~~~";
pub const NEGATIVE_INFINITY: &str = "~~~ -Infinity ~~~";

/// Token for a function, given its name if it has one.
///
/// # Examples
///
/// ```rust
/// use safe_stringify::placeholder::{function, ANONYMOUS};
///
/// assert_eq!(function(Some("render")), "~~~ render() ~~~");
/// assert_eq!(function(Some("")), ANONYMOUS);
/// assert_eq!(function(None), ANONYMOUS);
/// ```
#[must_use]
pub fn function(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.is_empty() => format!("~~~ {}() ~~~", n),
        _ => ANONYMOUS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_distinct() {
        let tokens = [
            UNDEFINED,
            NULL,
            FALSE,
            ZERO,
            EMPTY_STRING,
            CIRCULAR,
            ANONYMOUS,
            INFINITY,
            NEGATIVE_INFINITY,
        ];
        for (i, a) in tokens.iter().enumerate() {
            for b in &tokens[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
