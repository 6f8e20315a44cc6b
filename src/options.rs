//! Configuration options for safe serialization.
//!
//! [`SafeOptions`] controls the one optional policy rule (unwrapping
//! framework event wrappers) and the layout of the JSON text.
//!
//! ## Examples
//!
//! ```rust
//! use safe_stringify::{to_string_with_options, value, SafeOptions};
//!
//! let event = value!({ "nativeEvent": { "type": "click" } });
//!
//! let options = SafeOptions::new().with_native_event_unwrap(true);
//! let json = to_string_with_options(&event, options).unwrap();
//! assert_eq!(json, r#"{"type":"click"}"#);
//! ```

/// Configuration options for safe serialization.
///
/// # Examples
///
/// ```rust
/// use safe_stringify::SafeOptions;
///
/// // Default compact options, wrappers left alone
/// let options = SafeOptions::new();
/// assert!(!options.unwrap_native_event);
///
/// // Pretty-printed with 4-space indentation
/// let options = SafeOptions::pretty().with_indent(4);
/// assert!(options.pretty);
/// ```
#[derive(Clone, Debug)]
pub struct SafeOptions {
    /// Replace objects that carry a `nativeEvent` property by that property.
    pub unwrap_native_event: bool,
    pub pretty: bool,
    pub indent: usize,
}

impl Default for SafeOptions {
    fn default() -> Self {
        SafeOptions {
            unwrap_native_event: false,
            pretty: false,
            indent: 2,
        }
    }
}

impl SafeOptions {
    /// Creates default options (compact output, no wrapper unwrapping).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safe_stringify::SafeOptions;
    ///
    /// let options = SafeOptions::new();
    /// assert_eq!(options.indent, 2);
    /// assert!(!options.pretty);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output with newlines and indentation.
    #[must_use]
    pub fn pretty() -> Self {
        SafeOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Default is 2. Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables unwrapping of `nativeEvent` wrapper objects.
    ///
    /// When enabled, any object with a `nativeEvent` property serializes
    /// exactly like the value of that property.
    #[must_use]
    pub fn with_native_event_unwrap(mut self, enabled: bool) -> Self {
        self.unwrap_native_event = enabled;
        self
    }

    pub(crate) fn indent_bytes(&self) -> Vec<u8> {
        vec![b' '; self.indent]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let options = SafeOptions::pretty()
            .with_indent(4)
            .with_native_event_unwrap(true);
        assert!(options.pretty);
        assert!(options.unwrap_native_event);
        assert_eq!(options.indent_bytes(), b"    ".to_vec());
    }
}
