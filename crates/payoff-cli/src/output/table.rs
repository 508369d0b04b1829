use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::render_value;

/// Format output as a table using the tabled crate.
///
/// Envelope outputs (`{ result, warnings, methodology, ... }`) render the
/// result section as a table followed by warnings and the methodology line;
/// a result holding a list (schedule points, milestones) becomes a
/// one-row-per-element table.
pub fn print_table(value: &Value) {
    let Some(map) = value.as_object() else {
        println!("{}", render_value(value));
        return;
    };

    match map.get("result") {
        Some(Value::Array(items)) => print_records(items),
        Some(Value::Object(fields)) => print_fields(fields),
        // No envelope: render the object itself.
        _ => {
            print_fields(map);
            return;
        }
    }

    if let Some(Value::Array(warnings)) = map.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = map.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

/// Two-column Field/Value table for a flat result object.
fn print_fields(fields: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.as_str(), &render_value(val)]);
    }
    println!("{}", Table::from(builder));
}

/// One row per element, with headers taken from the first object.
fn print_records(items: &[Value]) {
    if items.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = items.first() else {
        for item in items {
            println!("{}", render_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in items {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(render_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}
