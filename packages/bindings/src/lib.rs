use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: trade_calc_core::loans::emi::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = trade_calc_core::loans::emi::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investing
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_sip(input_json: String) -> NapiResult<String> {
    let input: trade_calc_core::investing::sip::SipTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = trade_calc_core::investing::sip::calculate_sip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_stock_average(input_json: String) -> NapiResult<String> {
    let input: trade_calc_core::investing::stock_average::StockAverageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = trade_calc_core::investing::stock_average::calculate_stock_average(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Timezone
// ---------------------------------------------------------------------------

#[napi]
pub fn convert_timezone(input_json: String) -> NapiResult<String> {
    let input: trade_calc_core::timezone::convert::ConversionRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = trade_calc_core::timezone::convert::calculate_timezone_conversion(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn list_timezones() -> NapiResult<String> {
    serde_json::to_string(trade_calc_core::timezone::offset::supported_offsets())
        .map_err(to_napi_error)
}
