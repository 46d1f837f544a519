use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tabled::{builder::Builder, Table};

use avalanche_core::avalanche::ScheduleRow;

use super::{format_scalar, schedule_of};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let Some(result) = value.get("result") else {
        print_fields(value);
        return;
    };

    if let Some(schedule) = schedule_of(value) {
        if let Some(summary) = result.get("summary") {
            print_fields(summary);
        }
        println!();
        print_schedule(&schedule);
    } else {
        print_fields(result);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", format_scalar(value));
        return;
    };
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        let shown = match val {
            Value::Array(items) => format!("{} item(s)", items.len()),
            other => format_scalar(other),
        };
        builder.push_record([key.as_str(), &shown]);
    }
    println!("{}", Table::from(builder));
}

/// One line per loan per month; month-level columns only on the month's
/// first line.
fn print_schedule(schedule: &[ScheduleRow]) {
    if schedule.is_empty() {
        println!("(no months simulated)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record([
        "Month",
        "Date",
        "Surplus",
        "Lumpsum",
        "Interest",
        "Paid",
        "Loan ID",
        "Loan Name",
        "Rate %",
        "Extra",
        "Balance after",
        "Total outstanding",
    ]);

    for row in schedule {
        for (idx, entry) in row.loans.iter().enumerate() {
            let first = idx == 0;
            let month_cell = |v: Decimal| if first { money(v) } else { String::new() };
            builder.push_record([
                if first { row.month.to_string() } else { String::new() },
                row.date.to_string(),
                month_cell(row.surplus_before),
                month_cell(row.lumpsum_total()),
                month_cell(row.total_interest_this_month),
                month_cell(row.total_paid_this_month),
                entry.id.clone(),
                entry.name.clone(),
                format!("{:.2}", entry.rate * dec!(100)),
                money(entry.extra_paid),
                money(entry.balance_after),
                month_cell(row.total_outstanding),
            ]);
        }
    }

    println!("{}", Table::from(builder));
}

fn money(v: Decimal) -> String {
    format!("{:.2}", v)
}
