mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::investing::{SipArgs, StockAverageArgs};
use commands::loans::EmiArgs;
use commands::timezone::TimezoneArgs;

/// Loan, investment and timezone calculators
#[derive(Parser)]
#[command(
    name = "tcalc",
    version,
    about = "Loan, investment and timezone calculators",
    long_about = "A CLI for the trading platform's calculators with decimal precision. \
                  Supports EMI amortisation schedules, SIP projections, stock averaging \
                  and fixed-offset timezone conversion."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Equated monthly installment with amortisation schedule
    Emi(EmiArgs),
    /// Systematic investment plan future value
    Sip(SipArgs),
    /// Average purchase price across two lots
    StockAverage(StockAverageArgs),
    /// Convert a wall-clock time between fixed UTC offsets
    Timezone(TimezoneArgs),
    /// List the supported UTC offsets
    Timezones,
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loans::run_emi(args),
        Commands::Sip(args) => commands::investing::run_sip(args),
        Commands::StockAverage(args) => commands::investing::run_stock_average(args),
        Commands::Timezone(args) => commands::timezone::run_timezone(args),
        Commands::Timezones => commands::timezone::run_list_timezones(),
        Commands::Version => {
            println!("tcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
