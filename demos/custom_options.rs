//! Customizing output with SafeOptions and a transform.
//!
//! Run with: cargo run --example custom_options

use safe_stringify::{to_string_with_options, value, Error, Key, SafeOptions, Serializer, Value};
use std::error::Error as StdError;

fn main() -> Result<(), Box<dyn StdError>> {
    let event = value!({
        "nativeEvent": {
            "type": "click",
            "button": 0,
            "shiftKey": false
        }
    });

    println!("Default:");
    println!("{}\n", to_string_with_options(&event, SafeOptions::new())?);

    let unwrap = SafeOptions::new().with_native_event_unwrap(true);
    println!("Unwrapping nativeEvent:");
    println!("{}\n", to_string_with_options(&event, unwrap)?);

    let indented = SafeOptions::pretty().with_indent(4);
    println!("Four space indent:");
    println!("{}\n", to_string_with_options(&event, indented)?);

    let secrets = value!({
        "user": "alice",
        "credentials": { "token": "abc123" },
        "history": [[1, 2], [3]]
    });

    let redacting = Serializer::new(SafeOptions::new()).with_transform(|key, value| match key {
        Key::Field("credentials") => Ok(Value::from("[redacted]")),
        _ => Ok(value),
    });
    println!("Redacting transform:");
    println!("{}\n", redacting.to_string(&secrets)?);

    let strict = Serializer::new(SafeOptions::new())
        .with_transform(|key, _value| Err(Error::transform(format!("refusing {:?}", key))));
    match strict.to_string(&secrets) {
        Ok(text) => println!("unexpected: {}", text),
        Err(err) => println!("Transform error: {}", err),
    }

    Ok(())
}
