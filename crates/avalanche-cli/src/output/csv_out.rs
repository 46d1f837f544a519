use serde_json::Value;
use std::io;

use avalanche_core::export::schedule_to_csv;

use super::{format_scalar, schedule_of};

/// Write output as CSV to stdout. Simulation results use the schedule
/// export layout; anything else becomes a two-column field/value sheet.
pub fn print_csv(value: &Value) {
    if let Some(schedule) = schedule_of(value) {
        println!("{}", schedule_to_csv(&schedule));
        return;
    }

    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let body = value.get("result").unwrap_or(value);

    match body {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
            }
        }
        other => {
            let _ = wtr.write_record([&format_scalar(other)]);
        }
    }

    let _ = wtr.flush();
}
