use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::MonthStamp;
use crate::types::{round_money, Money, Rate};

/// One loan's line in a month of the schedule. Monetary fields are rounded
/// to 2 dp; `rate` is the unrounded annual rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanLedgerEntry {
    pub id: String,
    pub name: String,
    pub rate: Rate,
    pub interest: Money,
    pub emi: Money,
    pub extra_paid: Money,
    pub payment: Money,
    pub principal_paid: Money,
    pub balance_after: Money,
}

/// A lumpsum as applied in the month it fell due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedLumpsum {
    pub amount: Money,
    pub note: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub month: u32,
    pub date: MonthStamp,
    pub surplus_before: Money,
    pub lumps_this_month: Vec<AppliedLumpsum>,
    pub total_interest_this_month: Money,
    pub total_paid_this_month: Money,
    pub total_outstanding: Money,
    pub loans: Vec<LoanLedgerEntry>,
}

impl ScheduleRow {
    pub fn lumpsum_total(&self) -> Money {
        self.lumps_this_month.iter().map(|l| l.amount).sum()
    }
}

/// The month a loan was retired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayoff {
    pub id: String,
    pub name: String,
    pub month: u32,
    pub date: MonthStamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_months: u32,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    pub total_outstanding: Money,
    pub months_limit_reached: bool,
    pub loan_payoffs: Vec<LoanPayoff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutput {
    pub schedule: Vec<ScheduleRow>,
    pub summary: Summary,
}

/// Append-only sink for one run's rows and running totals.
#[derive(Debug, Default)]
pub struct ScheduleRecorder {
    rows: Vec<ScheduleRow>,
    payoffs: Vec<LoanPayoff>,
    total_interest: Money,
    total_paid: Money,
}

impl ScheduleRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a month. `interest` and `paid` are the unrounded month totals.
    pub fn record(&mut self, row: ScheduleRow, interest: Money, paid: Money) {
        self.total_interest += interest;
        self.total_paid += paid;
        self.rows.push(row);
    }

    pub fn record_payoff(&mut self, payoff: LoanPayoff) {
        self.payoffs.push(payoff);
    }

    pub fn months_recorded(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Build the terminal summary. `fallback_outstanding` is reported when
    /// no month was simulated.
    pub fn finish(self, months_limit_reached: bool, fallback_outstanding: Money) -> SimulationOutput {
        let total_outstanding = self
            .rows
            .last()
            .map(|r| r.total_outstanding)
            .unwrap_or(fallback_outstanding);

        let summary = Summary {
            total_months: self.rows.len() as u32,
            total_interest_paid: round_money(self.total_interest),
            total_paid: round_money(self.total_paid),
            total_outstanding: round_money(total_outstanding),
            months_limit_reached,
            loan_payoffs: self.payoffs,
        };

        SimulationOutput {
            schedule: self.rows,
            summary,
        }
    }
}
