use rust_decimal::Decimal;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::calendar::MonthStamp;
use crate::types::*;
use crate::AvalancheResult;

use super::allocator::{allocate, WorkingLoan};
use super::input::SimulationInput;
use super::recorder::{AppliedLumpsum, LoanPayoff, ScheduleRecorder, ScheduleRow, SimulationOutput};
use super::validation::validate;

/// Loop state, evaluated once per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Running,
    AllPaid,
    LimitReached,
}

fn next_state(working: &[WorkingLoan], month: i64, months_limit: i64) -> SimulationState {
    if working.is_empty() {
        SimulationState::AllPaid
    } else if month > months_limit {
        SimulationState::LimitReached
    } else {
        SimulationState::Running
    }
}

/// Run the avalanche month loop for a run whose month 1 is `start`.
///
/// Validation happens first; on failure no schedule is produced. The
/// caller's loans and lumpsums are only read.
pub fn simulate(input: &SimulationInput, start: MonthStamp) -> AvalancheResult<SimulationOutput> {
    validate(input)?;

    let months_limit = input.effective_months_limit();
    let base_monthly_cash = input.cash_flow().base_monthly_cash();
    let mut working: Vec<WorkingLoan> = input
        .normalized_loans()
        .into_iter()
        .map(WorkingLoan::from)
        .collect();

    let mut recorder = ScheduleRecorder::new();
    let mut month: i64 = 1;

    let state = loop {
        let state = next_state(&working, month, months_limit);
        if state != SimulationState::Running {
            break state;
        }

        // stable: equal rates keep their current relative order
        working.sort_by(|a, b| b.annual_rate.cmp(&a.annual_rate));

        let current_emis: Money = working.iter().map(|l| l.emi).sum();
        let surplus_before = (base_monthly_cash - current_emis).max(Decimal::ZERO);

        let lumps_this_month: Vec<AppliedLumpsum> = input
            .lumps
            .iter()
            .filter(|lp| lp.month_index == month)
            .map(|lp| AppliedLumpsum {
                amount: lp.amount,
                note: lp.note.clone().unwrap_or_default(),
                label: lp.label.clone().unwrap_or_default(),
            })
            .collect();
        let lump_total: Money = lumps_this_month.iter().map(|l| l.amount).sum();

        let pool = surplus_before + lump_total;
        let allocation = allocate(&mut working, pool);

        let date = start.month_at(month);
        let month_no = month as u32;
        for loan in working.iter().filter(|l| l.is_paid_off()) {
            debug!(month = month_no, loan = %loan.id, "loan retired");
            recorder.record_payoff(LoanPayoff {
                id: loan.id.clone(),
                name: loan.name.clone(),
                month: month_no,
                date,
            });
        }
        working.retain(|l| !l.is_paid_off());

        let total_outstanding: Money = allocation.entries.iter().map(|e| e.balance_after).sum();

        debug!(
            month = month_no,
            date = %date,
            pool = %pool,
            unspent = %allocation.unspent_pool,
            outstanding = %total_outstanding,
            active = working.len(),
            "month simulated"
        );

        recorder.record(
            ScheduleRow {
                month: month_no,
                date,
                surplus_before: round_money(surplus_before),
                lumps_this_month,
                total_interest_this_month: round_money(allocation.interest),
                total_paid_this_month: round_money(allocation.paid),
                total_outstanding: round_money(total_outstanding),
                loans: allocation.entries,
            },
            allocation.interest,
            allocation.paid,
        );

        month += 1;
    };

    let limit_reached = state == SimulationState::LimitReached;
    if limit_reached {
        warn!(months_limit, "months cap reached before all loans were retired");
    }
    info!(
        months = recorder.months_recorded(),
        limit_reached, "avalanche simulation finished"
    );

    Ok(recorder.finish(limit_reached, input.initial_outstanding()))
}

/// Simulate starting from the current calendar month and wrap the result
/// in the standard output envelope.
pub fn run_avalanche(
    input: &SimulationInput,
) -> AvalancheResult<ComputationOutput<SimulationOutput>> {
    run_avalanche_from(input, MonthStamp::current())
}

/// As [`run_avalanche`] with an explicit first month.
pub fn run_avalanche_from(
    input: &SimulationInput,
    start: MonthStamp,
) -> AvalancheResult<ComputationOutput<SimulationOutput>> {
    let timer = Instant::now();
    let output = simulate(input, start)?;
    let warnings = collect_warnings(input, &output);

    let elapsed = timer.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt Avalanche (highest rate first, cascading surplus)",
        &serde_json::json!({
            "start_month": start.to_string(),
            "months_limit": input.effective_months_limit(),
            "base_monthly_cash": input.cash_flow().base_monthly_cash().to_string(),
            "loans": input.loans.len(),
            "lumpsums": input.lumps.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn collect_warnings(input: &SimulationInput, output: &SimulationOutput) -> Vec<String> {
    let mut warnings = Vec::new();
    let summary = &output.summary;

    if input.cash_flow().base_monthly_cash() < Decimal::ZERO {
        warnings.push(format!(
            "Monthly expenses exceed income by {}; no surplus available for prepayment",
            round_money(-input.cash_flow().base_monthly_cash())
        ));
    }

    if summary.months_limit_reached && summary.total_outstanding > Decimal::ZERO {
        warnings.push(format!(
            "Months cap of {} reached with {} still outstanding",
            input.effective_months_limit(),
            summary.total_outstanding
        ));
    }

    for lump in &input.lumps {
        if lump.month_index > summary.total_months as i64 {
            warnings.push(format!(
                "Lumpsum of {} scheduled for month {} was never applied (run ended after month {})",
                lump.amount, lump.month_index, summary.total_months
            ));
        }
    }

    for loan in &input.loans {
        if loan.principal < Decimal::ZERO || loan.annual_rate < Decimal::ZERO {
            warnings.push(format!(
                "Loan {} has a negative principal or rate",
                if loan.name.is_empty() { &loan.id } else { &loan.name }
            ));
        }
    }

    warnings
}
