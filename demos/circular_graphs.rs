//! Serializing graphs with cycles and shared nodes.
//!
//! Run with: cargo run --example circular_graphs

use safe_stringify::{to_string, to_string_pretty, value, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // an object that contains itself
    let node = Value::empty_object();
    node.insert("name", Value::from("root"));
    node.insert("self", node.clone());
    println!("Self reference:\n{}\n", to_string(&node)?);

    // parent <-> child
    let parent = value!({ "name": "parent" });
    let child = value!({ "name": "child", "parent": parent });
    parent.insert("child", child);
    println!("Parent and child:\n{}\n", to_string_pretty(&parent)?);

    // the second path to a shared node is reported too
    let address = value!({ "city": "Lisbon" });
    let people = value!([
        { "name": "Ana", "home": address },
        { "name": "Rui", "home": address }
    ]);
    println!("Shared address:\n{}\n", to_string_pretty(&people)?);

    // sets and maps
    let tags = Value::set([Value::from("a"), Value::from("b")]);
    tags.push(tags.clone());
    let lookup = Value::map([(Value::from("tags"), tags.clone()), (Value::from(0), Value::Null)]);
    println!("Set and map:\n{}", to_string(&value!({ "tags": tags, "lookup": lookup }))?);

    Ok(())
}
