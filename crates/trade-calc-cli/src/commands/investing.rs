use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use trade_calc_core::investing::sip::{self, SipTerms};
use trade_calc_core::investing::stock_average::{self, StockAverageInput, StockLot};

use crate::input;

/// Arguments for the SIP calculator
#[derive(Args)]
pub struct SipArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly contribution
    #[arg(long)]
    pub monthly_amount: Option<Decimal>,

    /// Expected annual return in percent (e.g. 12 for 12% p.a.)
    #[arg(long, alias = "annual-rate-percent")]
    pub rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for the stock average calculator
#[derive(Args)]
pub struct StockAverageArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Price paid in the first purchase
    #[arg(long)]
    pub price1: Option<Decimal>,

    /// Units bought in the first purchase
    #[arg(long, alias = "quantity1")]
    pub qty1: Option<Decimal>,

    /// Price paid in the second purchase
    #[arg(long)]
    pub price2: Option<Decimal>,

    /// Units bought in the second purchase
    #[arg(long, alias = "quantity2")]
    pub qty2: Option<Decimal>,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: SipTerms = match input::load(args.input.as_deref())? {
        Some(terms) => terms,
        None => SipTerms {
            monthly_amount: args
                .monthly_amount
                .ok_or("--monthly-amount is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        },
    };
    let result = sip::calculate_sip(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_stock_average(args: StockAverageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let avg_input: StockAverageInput = match input::load(args.input.as_deref())? {
        Some(avg_input) => avg_input,
        None => StockAverageInput {
            lot1: StockLot::new(
                args.price1.ok_or("--price1 is required (or provide --input)")?,
                args.qty1.ok_or("--qty1 is required (or provide --input)")?,
            ),
            lot2: StockLot::new(
                args.price2.ok_or("--price2 is required (or provide --input)")?,
                args.qty2.ok_or("--qty2 is required (or provide --input)")?,
            ),
        },
    };
    let result = stock_average::calculate_stock_average(&avg_input)?;
    Ok(serde_json::to_value(result)?)
}
