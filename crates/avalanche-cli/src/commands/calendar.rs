use clap::Args;
use serde_json::Value;

use avalanche_core::calendar::MonthStamp;

/// Arguments for converting a calendar month to a lumpsum month index
#[derive(Args)]
pub struct MonthIndexArgs {
    /// Calendar month of the payment, YYYY-MM
    #[arg(long)]
    pub month: String,

    /// First simulated month, YYYY-MM (default: current month)
    #[arg(long)]
    pub start: Option<String>,
}

pub fn run_month_index(args: MonthIndexArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start: MonthStamp = match args.start {
        Some(ref s) => s.parse()?,
        None => MonthStamp::current(),
    };
    let month: MonthStamp = args.month.parse()?;
    let index = start.index_of(month);

    Ok(serde_json::json!({
        "result": {
            "month_index": index,
            "start": start.to_string(),
            "month": month.to_string(),
            "schedulable": index >= 1,
        }
    }))
}
