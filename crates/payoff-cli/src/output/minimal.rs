use serde_json::Value;

use super::render_value;

/// Key figures, in answer-first priority order. The savings block is
/// preferred when present so `compare` prints what was saved rather than
/// the raw schedules.
const PRIORITY_KEYS: [&str; 6] = [
    "interest_saved",
    "months_saved",
    "payoff_date",
    "total_interest",
    "total_paid",
    "scenario_payoff_date",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Milestone lists: one line per marker.
    if let Value::Array(items) = result {
        for item in items {
            match (item.get("date"), item.get("label")) {
                (Some(Value::String(date)), Some(Value::String(label))) => {
                    println!("{}  {}", date, label)
                }
                _ => println!("{}", render_value(item)),
            }
        }
        return;
    }

    if let Value::Object(map) = result {
        let savings = map.get("savings").and_then(Value::as_object);
        let fields = savings.unwrap_or(map);

        for key in &PRIORITY_KEYS {
            if let Some(val) = fields.get(*key) {
                if !val.is_null() {
                    println!("{}: {}", key, render_value(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = fields.iter().next() {
            println!("{}: {}", key, render_value(val));
            return;
        }
    }

    println!("{}", render_value(result));
}
