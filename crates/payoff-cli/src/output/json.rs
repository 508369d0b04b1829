use serde_json::Value;

/// Pretty-print an output envelope (schedule, comparison, timeline) as
/// JSON to stdout. This is the default format and the only one carrying
/// the full envelope verbatim.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
