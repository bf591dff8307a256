use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::CalcError;
use crate::time_value;
use crate::types::*;
use crate::CalcResult;

/// Longest horizon accepted for a systematic investment plan.
pub const MAX_SIP_YEARS: u32 = 100;

/// Terms of a systematic investment plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipTerms {
    pub monthly_amount: Money,
    /// Expected annual return as a percentage (12 = 12% p.a.)
    pub annual_rate_percent: Percent,
    pub years: u32,
}

/// Projected value of a SIP at the end of its horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipResult {
    pub invested_amount: Money,
    pub estimated_returns: Money,
    pub total_value: Money,
    pub monthly_amount: Money,
    pub years: u32,
    pub annual_rate_percent: Percent,
    /// Estimated returns as a percentage of the amount invested (1dp)
    pub returns_pct_of_invested: Percent,
    /// Estimated returns as a share of the final value (1dp)
    pub returns_share_of_total: Percent,
}

fn validate(monthly_amount: Money, annual_rate_percent: Percent, years: u32) -> CalcResult<()> {
    if round_money(monthly_amount) <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "monthly_amount",
            "Monthly contribution must be at least 0.01",
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(CalcError::invalid(
            "annual_rate_percent",
            "Expected return cannot be negative",
        ));
    }
    if years == 0 {
        return Err(CalcError::invalid("years", "Horizon must be at least 1 year"));
    }
    if years > MAX_SIP_YEARS {
        return Err(CalcError::InvalidInput {
            field: "years".into(),
            reason: format!("Horizon cannot exceed {MAX_SIP_YEARS} years"),
        });
    }
    Ok(())
}

fn percent_of(part: Money, whole: Money) -> Percent {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        round_percent(part / whole * dec!(100))
    }
}

/// Future value of monthly contributions made at the start of each month.
///
/// `total_value` and `invested_amount` are rounded independently and
/// `estimated_returns` is their difference, so the three always reconcile.
pub fn compute_sip(
    monthly_amount: Money,
    annual_rate_percent: Percent,
    years: u32,
) -> CalcResult<SipResult> {
    validate(monthly_amount, annual_rate_percent, years)?;

    let total_months = years * 12;
    let rate = time_value::monthly_rate(annual_rate_percent);
    let future_value = time_value::annuity_due_fv(monthly_amount, rate, total_months)?;

    let invested_amount = round_money(monthly_amount * Decimal::from(total_months));
    let total_value = round_money(future_value);
    let estimated_returns = total_value - invested_amount;

    debug!(
        %monthly_amount,
        %annual_rate_percent,
        years,
        %total_value,
        "computed SIP projection"
    );

    Ok(SipResult {
        invested_amount,
        estimated_returns,
        total_value,
        monthly_amount: round_money(monthly_amount),
        years,
        annual_rate_percent,
        returns_pct_of_invested: percent_of(estimated_returns, invested_amount),
        returns_share_of_total: percent_of(estimated_returns, total_value),
    })
}

/// SIP projection wrapped in the standard output envelope.
pub fn calculate_sip(terms: &SipTerms) -> CalcResult<ComputationOutput<SipResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_sip(terms.monthly_amount, terms.annual_rate_percent, terms.years)?;

    if terms.annual_rate_percent.is_zero() {
        warnings.push("Zero expected return: value equals contributions".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP future value (annuity due, monthly compounding)",
        &serde_json::json!({
            "monthly_amount": terms.monthly_amount.to_string(),
            "annual_rate_percent": terms.annual_rate_percent.to_string(),
            "years": terms.years,
            "contribution_timing": "start of month",
        }),
        warnings,
        elapsed,
        result,
    ))
}
