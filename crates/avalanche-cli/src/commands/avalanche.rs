use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs;
use tracing::info;

use avalanche_core::avalanche::{self, LoanAccount, LumpsumPayment, SimulationInput};
use avalanche_core::calendar::MonthStamp;
use avalanche_core::error::AvalancheError;
use avalanche_core::export::{schedule_to_csv, CSV_FILENAME};

use crate::input;

/// Month a `--lumpsum` flag targets, before the run's start month is known.
#[derive(Debug, Clone, PartialEq)]
pub enum LumpsumMonth {
    Index(i64),
    Calendar(MonthStamp),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LumpsumArg {
    pub month: LumpsumMonth,
    pub amount: Decimal,
    pub note: Option<String>,
}

impl LumpsumArg {
    fn resolve(&self, start: MonthStamp) -> LumpsumPayment {
        let month_index = match self.month {
            LumpsumMonth::Index(i) => i,
            LumpsumMonth::Calendar(m) => start.index_of(m),
        };
        let mut lump = LumpsumPayment::new(month_index, self.amount);
        lump.note = self.note.clone();
        lump
    }
}

/// Arguments for an avalanche simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly take-home salary
    #[arg(long, allow_hyphen_values = true)]
    pub salary: Option<Decimal>,

    /// Other monthly income
    #[arg(long, allow_hyphen_values = true)]
    pub extra_income: Option<Decimal>,

    /// Monthly living expenses
    #[arg(long, allow_hyphen_values = true)]
    pub expenses: Option<Decimal>,

    /// Maximum number of months to simulate (default 600)
    #[arg(long, allow_hyphen_values = true)]
    pub months_limit: Option<i64>,

    /// Loan as ID:NAME:PRINCIPAL:RATE:EMI, rate as a decimal (repeatable)
    #[arg(long = "loan", value_parser = parse_loan)]
    pub loans: Vec<LoanAccount>,

    /// Lumpsum as MONTH:AMOUNT[:NOTE], MONTH a 1-based index or YYYY-MM (repeatable)
    #[arg(long = "lumpsum", value_parser = parse_lumpsum, allow_hyphen_values = true)]
    pub lumpsums: Vec<LumpsumArg>,

    /// First simulated month as YYYY-MM (default: current month)
    #[arg(long)]
    pub start: Option<String>,

    /// Also write the schedule CSV export; PATH defaults to avalanche_schedule.csv
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = CSV_FILENAME)]
    pub csv_out: Option<String>,
}

pub fn parse_loan(s: &str) -> Result<LoanAccount, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 5 {
        return Err(format!("expected ID:NAME:PRINCIPAL:RATE:EMI, got '{s}'"));
    }
    let number = |field: &str, raw: &str| -> Result<Decimal, String> {
        raw.trim()
            .parse::<Decimal>()
            .map_err(|e| format!("invalid {field} '{raw}': {e}"))
    };
    Ok(LoanAccount {
        id: parts[0].trim().to_string(),
        name: parts[1].trim().to_string(),
        principal: number("principal", parts[2])?,
        annual_rate: number("rate", parts[3])?,
        emi: number("emi", parts[4])?,
    })
}

pub fn parse_lumpsum(s: &str) -> Result<LumpsumArg, String> {
    let mut parts = s.splitn(3, ':');
    let month_raw = parts.next().unwrap_or_default().trim();
    let amount_raw = parts
        .next()
        .ok_or_else(|| format!("expected MONTH:AMOUNT[:NOTE], got '{s}'"))?
        .trim();
    let note = parts.next().map(|n| n.to_string());

    let month = if month_raw.contains('-') && !month_raw.starts_with('-') {
        LumpsumMonth::Calendar(month_raw.parse().map_err(|e| format!("{e}"))?)
    } else {
        LumpsumMonth::Index(
            month_raw
                .parse()
                .map_err(|e| format!("invalid month index '{month_raw}': {e}"))?,
        )
    };
    let amount = amount_raw
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount '{amount_raw}': {e}"))?;

    Ok(LumpsumArg {
        month,
        amount,
        note,
    })
}

fn resolve_start(args: &SimulateArgs) -> Result<MonthStamp, Box<dyn std::error::Error>> {
    match &args.start {
        Some(s) => Ok(s.parse()?),
        None => Ok(MonthStamp::current()),
    }
}

fn build_input(
    args: &SimulateArgs,
    start: MonthStamp,
) -> Result<SimulationInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    if args.loans.is_empty() {
        return Err(AvalancheError::InvalidInput {
            field: "loan".into(),
            reason: "--loan is required (or provide --input)".into(),
        }
        .into());
    }

    Ok(SimulationInput {
        salary: args.salary.unwrap_or_default(),
        extra_income: args.extra_income.unwrap_or_default(),
        expenses: args.expenses.unwrap_or_default(),
        months_limit: args.months_limit,
        loans: args.loans.clone(),
        lumps: args.lumpsums.iter().map(|l| l.resolve(start)).collect(),
    })
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = resolve_start(&args)?;
    let sim_input = build_input(&args, start)?;
    let result = avalanche::run_avalanche_from(&sim_input, start)?;

    if let Some(ref path) = args.csv_out {
        fs::write(path, schedule_to_csv(&result.result.schedule))
            .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
        info!(path = %path, rows = result.result.schedule.len(), "schedule CSV written");
    }

    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = resolve_start(&args)?;
    let sim_input = build_input(&args, start)?;
    avalanche::validate(&sim_input).map_err(|e| format!("{} [{}]", e, e.kind()))?;

    Ok(serde_json::json!({
        "result": {
            "valid": true,
            "loans": sim_input.loans.len(),
            "lumpsums": sim_input.lumps.len(),
            "months_limit": sim_input.effective_months_limit(),
            "base_monthly_cash": sim_input.cash_flow().base_monthly_cash().to_string(),
        }
    }))
}
