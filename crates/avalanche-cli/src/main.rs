mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::avalanche::SimulateArgs;
use commands::calendar::MonthIndexArgs;

/// Debt-avalanche loan prepayment simulator
#[derive(Parser)]
#[command(
    name = "avalanche",
    version,
    about = "Debt-avalanche loan prepayment simulator",
    long_about = "Simulates paying down several installment loans by sending every month's \
                  surplus, plus any scheduled lumpsums, to the highest-rate loan first. \
                  Freed EMIs and leftover surplus cascade to the next loan until all debt \
                  is retired or the months cap is reached."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the month-by-month avalanche simulation
    Simulate(SimulateArgs),
    /// Check an input for arithmetic sanity without simulating
    Validate(SimulateArgs),
    /// Convert a calendar month (YYYY-MM) into a lumpsum month index
    MonthIndex(MonthIndexArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::avalanche::run_simulate(args),
        Commands::Validate(args) => commands::avalanche::run_validate(args),
        Commands::MonthIndex(args) => commands::calendar::run_month_index(args),
        Commands::Version => {
            println!("avalanche {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
