use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::CalcError;
use crate::timezone::offset::TimezoneOffset;
use crate::types::*;
use crate::CalcResult;

const DATE_FORMAT: &str = "%B %-d, %Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
// Parses what DATE_FORMAT renders; a day without padding is accepted
const DISPLAY_DATE_INPUT: &str = "%B %d, %Y";
const TIME_FORMAT: &str = "%H:%M:%S";
const WEEKDAY_FORMAT: &str = "%A";

/// Wall-clock reading plus source and target offsets, as entered by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// `YYYY-MM-DD`, or a `converted_date` such as `March 1, 2024`
    pub local_date: String,
    /// `HH:MM` or `HH:MM:SS`, 24-hour
    pub local_time: String,
    pub from_offset: String,
    pub to_offset: String,
}

/// Both sides of a fixed-offset conversion, formatted for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub original_date: String,
    pub original_time: String,
    pub original_day_of_week: String,
    pub original_offset: TimezoneOffset,
    pub original_offset_label: String,
    pub converted_date: String,
    pub converted_time: String,
    pub converted_day_of_week: String,
    pub converted_offset: TimezoneOffset,
    pub converted_offset_label: String,
    pub summary_text: String,
    pub original_local: NaiveDateTime,
    pub converted_local: NaiveDateTime,
    /// Calendar days between the converted and original wall-clock dates
    pub day_shift: i64,
}

pub(crate) fn parse_date(local_date: &str) -> CalcResult<NaiveDate> {
    let trimmed = local_date.trim();
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DISPLAY_DATE_INPUT))
        .map_err(|e| {
            CalcError::InvalidDateTime(format!(
                "date '{local_date}' is not YYYY-MM-DD or 'Month D, YYYY': {e}"
            ))
        })
}

pub(crate) fn parse_time(local_time: &str) -> CalcResult<NaiveTime> {
    let trimmed = local_time.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|e| {
            CalcError::InvalidDateTime(format!("time '{local_time}' is not HH:MM: {e}"))
        })
}

/// Convert a wall-clock reading in `from` to the wall-clock reading in `to`.
///
/// The reading is treated as a naive date-time, shifted back by `from` to get
/// UTC, then forward by `to`. Weekday and date are derived from the shifted
/// value, so midnight crossings are reported.
pub fn convert_timezone(
    local_date: &str,
    local_time: &str,
    from: TimezoneOffset,
    to: TimezoneOffset,
) -> CalcResult<ConversionResult> {
    let original = NaiveDateTime::new(parse_date(local_date)?, parse_time(local_time)?);

    let converted = original
        .checked_sub_signed(from.as_duration())
        .and_then(|utc| utc.checked_add_signed(to.as_duration()))
        .ok_or_else(|| {
            CalcError::InvalidDateTime(format!("{original} {from} is outside the supported range"))
        })?;

    let original_date = original.format(DATE_FORMAT).to_string();
    let original_time = original.format(TIME_FORMAT).to_string();
    let original_day_of_week = original.format(WEEKDAY_FORMAT).to_string();
    let converted_date = converted.format(DATE_FORMAT).to_string();
    let converted_time = converted.format(TIME_FORMAT).to_string();
    let converted_day_of_week = converted.format(WEEKDAY_FORMAT).to_string();

    let summary_text = format!(
        "{original_date} {original_time} ({original_day_of_week}) {from} → \
         {converted_date} {converted_time} ({converted_day_of_week}) {to}"
    );
    let day_shift = (converted.date() - original.date()).num_days();

    debug!(%original, %from, %converted, %to, day_shift, "converted timezone");

    Ok(ConversionResult {
        original_date,
        original_time,
        original_day_of_week,
        original_offset: from,
        original_offset_label: from.label().to_string(),
        converted_date,
        converted_time,
        converted_day_of_week,
        converted_offset: to,
        converted_offset_label: to.label().to_string(),
        summary_text,
        original_local: original,
        converted_local: converted,
        day_shift,
    })
}

/// Timezone conversion wrapped in the standard output envelope.
pub fn calculate_timezone_conversion(
    request: &ConversionRequest,
) -> CalcResult<ComputationOutput<ConversionResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let from: TimezoneOffset = request.from_offset.parse()?;
    let to: TimezoneOffset = request.to_offset.parse()?;
    let result = convert_timezone(&request.local_date, &request.local_time, from, to)?;

    if from == to {
        warnings.push("Source and target offsets are identical".into());
    }
    match result.day_shift {
        0 => {}
        d if d > 0 => warnings.push("Converted time falls on the next calendar day".into()),
        _ => warnings.push("Converted time falls on the previous calendar day".into()),
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed UTC offset conversion (no daylight saving)",
        &serde_json::json!({
            "local_date": request.local_date,
            "local_time": request.local_time,
            "from_offset": from.to_string(),
            "to_offset": to.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}
