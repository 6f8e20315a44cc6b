//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use chrono::{TimeZone, Utc};
use safe_stringify::{to_string_pretty, to_value, value, Function, Value};
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn on_click(_args: &[Value]) -> Value {
    Value::Undefined
}

fn main() -> Result<(), Box<dyn Error>> {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: Vec::new(),
    };

    let state = to_value(&user)?;
    state.insert("handler", Value::from(Function::from_fn(on_click)));
    state.insert("callback", Value::from(Function::from_fn(|_: &[Value]| Value::Null)));
    let created = Utc
        .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
        .single()
        .ok_or("invalid timestamp")?;
    state.insert("created", Value::from(created));
    state.insert("ratio", Value::from(f64::NEG_INFINITY));
    state.insert("pending", value!(undefined));

    println!("Component state:\n{}\n", to_string_pretty(&state)?);

    println!("Type checks:");
    println!("  is_object: {}", state.is_object());
    println!("  is_array:  {}", state.is_array());
    if let Some(obj) = state.as_object() {
        let obj = obj.borrow();
        println!("  id:        {:?}", obj.get("id").and_then(Value::as_i64));
        println!("  roles:     {:?}", obj.get("roles").map(Value::is_array));
    }

    Ok(())
}
