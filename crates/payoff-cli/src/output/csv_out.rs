use serde_json::Value;
use std::io;

use super::render_value;

/// Write output as CSV to stdout. A list-shaped result (schedule points,
/// milestones) becomes one row per element; anything else becomes
/// field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Array(items)) => write_records(&mut wtr, items),
            Some(Value::Object(fields)) => write_fields(&mut wtr, fields),
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(items) => write_records(&mut wtr, items),
        _ => {
            let _ = wtr.write_record([&render_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut csv::Writer<io::StdoutLock<'_>>, fields: &serde_json::Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in fields {
        let _ = wtr.write_record([key.as_str(), &csv_value(val)]);
    }
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, items: &[Value]) {
    if items.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = items.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);
        for item in items {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in items {
            let _ = wtr.write_record([&csv_value(item)]);
        }
    }
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Object(_) | Value::Array(_) => serde_json::to_string(value).unwrap_or_default(),
        other => render_value(other),
    }
}
