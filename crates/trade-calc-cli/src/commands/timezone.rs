use clap::Args;
use serde_json::Value;

use trade_calc_core::timezone::convert::{self, ConversionRequest};
use trade_calc_core::timezone::offset;

use crate::input;

/// Arguments for fixed-offset timezone conversion
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TimezoneArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Local date, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    /// Local time, HH:MM (24-hour)
    #[arg(long)]
    pub time: Option<String>,

    /// Source UTC offset, e.g. -05:00, +05:30, 0
    #[arg(long)]
    pub from: Option<String>,

    /// Target UTC offset
    #[arg(long)]
    pub to: Option<String>,
}

pub fn run_timezone(args: TimezoneArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ConversionRequest = match input::load(args.input.as_deref())? {
        Some(request) => request,
        None => ConversionRequest {
            local_date: args.date.ok_or("--date is required (or provide --input)")?,
            local_time: args.time.ok_or("--time is required (or provide --input)")?,
            from_offset: args.from.ok_or("--from is required (or provide --input)")?,
            to_offset: args.to.ok_or("--to is required (or provide --input)")?,
        },
    };
    let result = convert::calculate_timezone_conversion(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_list_timezones() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(offset::supported_offsets())?)
}
