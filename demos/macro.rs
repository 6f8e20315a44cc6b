//! Building value graphs with the value! macro.
//!
//! Run with: cargo run --example macro

use safe_stringify::{to_string, to_string_pretty, value, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Primitives:");
    for (label, v) in [
        ("undefined", value!(undefined)),
        ("null", value!(null)),
        ("false", value!(false)),
        ("zero", value!(0)),
        ("negative zero", value!(-0.0)),
        ("empty string", value!("")),
        ("infinity", value!(f64::INFINITY)),
    ] {
        println!("  {:<14} {}", label, to_string(&v)?);
    }
    println!();

    let config = value!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432,
            "password": ""
        },
        "features": ["auth", "logging", null],
        "debug": false
    });

    println!("Nested structures:");
    println!("{}\n", to_string_pretty(&config)?);

    // a binding passed to the macro keeps its identity
    let owner = value!({ "name": "Alice" });
    let repo = value!({ "owner": owner, "maintainer": owner });

    println!("Shared node:");
    println!("{}\n", to_string(&repo)?);

    if let Value::Object(obj) = &config {
        if let Some(Value::Array(features)) = obj.borrow().get("features") {
            println!("Features: {}", features.borrow().len());
        }
    }

    Ok(())
}
