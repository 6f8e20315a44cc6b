//! Dumping runtime state with falsy values kept visible.
//!
//! Run with: cargo run --example simple

use safe_stringify::{to_string, to_string_pretty, to_value};
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
struct Session {
    id: u32,
    user: String,
    retries: u32,
    locked: bool,
    expires: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let session = Session {
        id: 42,
        user: String::new(),
        retries: 0,
        locked: false,
        expires: None,
    };

    println!("serde_json output:\n{}\n", serde_json::to_string(&session)?);

    let value = to_value(&session)?;
    println!("safe_stringify output:\n{}\n", to_string(&value)?);
    println!("Pretty:\n{}", to_string_pretty(&value)?);

    Ok(())
}
