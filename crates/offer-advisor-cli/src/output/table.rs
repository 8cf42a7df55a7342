use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::nested_tables;

/// Render the result as a field/value table, with each array of objects in
/// the result (comparison rows, advisories, monthly flows) as its own table
/// below it, then the envelope's warnings and methodology.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(envelope) => match envelope.get("result") {
            Some(Value::Object(result)) => {
                print_result(result);
                print_envelope_notes(envelope);
            }
            _ => println!("{}", field_table(envelope.iter())),
        },
        Value::Array(items) => print_records(items),
        other => println!("{}", other),
    }
}

fn print_result(result: &Map<String, Value>) {
    let nested = nested_tables(result);
    let scalar_fields = result
        .iter()
        .filter(|(key, _)| !nested.iter().any(|(name, _)| *name == key.as_str()));
    println!("{}", field_table(scalar_fields));

    for (name, items) in nested {
        println!("\n{}:", name);
        print_records(items);
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    let warnings: Vec<&str> = envelope
        .get("warnings")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in warnings {
            println!("  - {}", w);
        }
    }

    if let Some(methodology) = envelope.get("methodology").and_then(Value::as_str) {
        println!("\nMethodology: {}", methodology);
    }
}

fn field_table<'a>(fields: impl Iterator<Item = (&'a String, &'a Value)>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.clone(), cell(val)]);
    }
    builder.build()
}

/// One row per object, columns taken from the first object's keys.
fn print_records(items: &[Value]) {
    let Some(Value::Object(first)) = items.first() else {
        if items.is_empty() {
            println!("(none)");
        }
        for item in items {
            println!("{}", cell(item));
        }
        return;
    };

    let columns: Vec<&String> = first.keys().collect();
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.as_str()));
    for record in items.iter().filter_map(Value::as_object) {
        builder.push_record(
            columns
                .iter()
                .map(|c| record.get(c.as_str()).map(cell).unwrap_or_default()),
        );
    }
    println!("{}", builder.build());
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join("; "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, cell(v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
