use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use trade_calc_core::loans::emi::{self, LoanTerms};

use crate::input;

/// Arguments for the EMI calculator
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 10 for 10% p.a.)
    #[arg(long, alias = "annual-rate-percent")]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Show only this page of the amortisation schedule (1-based)
    #[arg(long)]
    pub page: Option<usize>,

    /// Rows per schedule page
    #[arg(long, default_value = "12")]
    pub page_size: usize,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::load(args.input.as_deref())? {
        Some(terms) => terms,
        None => LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            months: args.months.ok_or("--months is required (or provide --input)")?,
        },
    };

    let output = emi::calculate_emi(&terms)?;

    match args.page {
        Some(page) => {
            let page = output.result.schedule_page(page, args.page_size)?;
            Ok(json!({
                "installment": output.result.installment,
                "page": page.page,
                "total_pages": page.total_pages,
                "total_rows": page.total_rows,
                "results": page.rows,
            }))
        }
        None => Ok(serde_json::to_value(output)?),
    }
}
