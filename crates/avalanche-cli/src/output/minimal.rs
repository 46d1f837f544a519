use serde_json::Value;

use super::format_scalar;

/// Print just the key answer value from the output.
///
/// For a simulation that is the number of months to payoff; other
/// commands fall back to their first result field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    let body = result_obj.get("summary").unwrap_or(result_obj);

    let priority_keys = ["totalMonths", "month_index", "valid"];

    if let Value::Object(map) = body {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_scalar(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(body));
}
