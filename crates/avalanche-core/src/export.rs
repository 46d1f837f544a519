//! Schedule export in the CSV layout consumed by the download UI.
//!
//! One line per (month, loan) pair, month-level totals repeated on each of
//! the month's lines. Lines are `\n`-separated with no trailing newline.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::avalanche::{LoanLedgerEntry, ScheduleRow};
use crate::types::round_money;

pub const CSV_HEADER: &str = "month,date,surplus_before,total_interest,total_paid,total_outstanding,lumpsum_amount,lumpsum_note,loan_id,loan_name,loan_rate_pct,interest,emi,extra_paid,principal_paid,balance_after";

/// Suggested filename for the downloaded export.
pub const CSV_FILENAME: &str = "avalanche_schedule.csv";

/// Render the schedule as CSV text.
pub fn schedule_to_csv(schedule: &[ScheduleRow]) -> String {
    let mut lines = Vec::with_capacity(1 + schedule.iter().map(|r| r.loans.len()).sum::<usize>());
    lines.push(CSV_HEADER.to_string());

    for row in schedule {
        let notes: Vec<&str> = row
            .lumps_this_month
            .iter()
            .map(|l| l.note.as_str())
            .collect();
        let month_cells = [
            row.month.to_string(),
            row.date.to_string(),
            amount(row.surplus_before),
            amount(row.total_interest_this_month),
            amount(row.total_paid_this_month),
            amount(row.total_outstanding),
            amount(row.lumpsum_total()),
            quoted(&notes.join("; ")),
        ]
        .join(",");

        for entry in &row.loans {
            lines.push(format!("{month_cells},{}", loan_cells(entry)));
        }
    }

    lines.join("\n")
}

fn loan_cells(entry: &LoanLedgerEntry) -> String {
    [
        text(&entry.id),
        text(&entry.name),
        format!("{:.2}", round_money(entry.rate * dec!(100))),
        amount(entry.interest),
        amount(entry.emi),
        amount(entry.extra_paid),
        amount(entry.principal_paid),
        amount(entry.balance_after),
    ]
    .join(",")
}

/// Rounded to cents, trailing zeros dropped: `9100`, `12.5`, `0.07`.
fn amount(value: Decimal) -> String {
    round_money(value).normalize().to_string()
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn text(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        quoted(s)
    } else {
        s.to_string()
    }
}
