use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::CalcError;
use crate::time_value;
use crate::types::*;
use crate::CalcResult;

/// Longest tenure accepted; keeps the schedule allocation bounded.
pub const MAX_TENURE_MONTHS: u32 = 6_000;

/// Terms of a fixed-rate amortising loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual interest rate as a percentage (10 = 10% p.a.)
    pub annual_rate_percent: Percent,
    pub months: u32,
}

/// One month of the amortisation schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub installment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// EMI totals plus the full month-by-month schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiResult {
    pub installment: Money,
    /// Nominal total: installment × months
    pub total_payment: Money,
    /// Nominal interest: total_payment − principal
    pub total_interest: Money,
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub months: u32,
    /// Last payment, trued-up so the balance closes at exactly zero
    pub final_installment: Money,
    /// Sum of the installments actually scheduled
    pub schedule_total_payment: Money,
    /// Sum of the interest portions actually scheduled
    pub schedule_total_interest: Money,
    pub schedule: Vec<AmortizationRow>,
}

/// A window of the amortisation schedule for paged display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePage {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub rows: Vec<AmortizationRow>,
}

impl EmiResult {
    /// Slice the schedule into 1-based pages. Out-of-range pages are clamped.
    pub fn schedule_page(&self, page: usize, page_size: usize) -> CalcResult<SchedulePage> {
        if page_size == 0 {
            return Err(CalcError::invalid("page_size", "Page size must be at least 1"));
        }

        let total_rows = self.schedule.len();
        let total_pages = total_rows.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total_rows);

        Ok(SchedulePage {
            page,
            page_size,
            total_pages,
            total_rows,
            rows: self.schedule[start..end].to_vec(),
        })
    }
}

fn validate(principal: Money, annual_rate_percent: Percent, months: u32) -> CalcResult<()> {
    if round_money(principal) <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "principal",
            "Loan principal must be at least 0.01",
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(CalcError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if months == 0 {
        return Err(CalcError::invalid("months", "Tenure must be at least 1 month"));
    }
    if months > MAX_TENURE_MONTHS {
        return Err(CalcError::InvalidInput {
            field: "months".into(),
            reason: format!("Tenure cannot exceed {MAX_TENURE_MONTHS} months"),
        });
    }
    Ok(())
}

/// Equated monthly installment and amortisation schedule.
///
/// The schedule runs in whole cents: each month's interest is rounded once,
/// the principal portion is the rounded installment less that interest, and
/// the final month repays whatever balance remains. The principal portions
/// therefore sum to the (rounded) principal exactly.
pub fn compute_emi(
    principal: Money,
    annual_rate_percent: Percent,
    months: u32,
) -> CalcResult<EmiResult> {
    validate(principal, annual_rate_percent, months)?;

    let rate = time_value::monthly_rate(annual_rate_percent);
    let installment = round_money(time_value::level_payment(principal, rate, months)?);
    let principal = round_money(principal);

    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = principal;
    let mut schedule_total_payment = Decimal::ZERO;
    let mut schedule_total_interest = Decimal::ZERO;

    for month in 1..=months {
        let interest = round_money(balance * rate);
        let principal_portion = if month == months {
            balance
        } else {
            (installment - interest).clamp(Decimal::ZERO, balance)
        };
        let payment = principal_portion + interest;
        balance -= principal_portion;

        schedule_total_payment += payment;
        schedule_total_interest += interest;

        schedule.push(AmortizationRow {
            month,
            installment: payment,
            principal_portion,
            interest_portion: interest,
            remaining_balance: balance,
        });
    }

    let total_payment = installment * Decimal::from(months);
    let total_interest = total_payment - principal;
    let final_installment = schedule
        .last()
        .map(|row| row.installment)
        .unwrap_or(installment);

    debug!(
        %principal,
        %annual_rate_percent,
        months,
        %installment,
        %total_interest,
        "computed EMI schedule"
    );

    Ok(EmiResult {
        installment,
        total_payment,
        total_interest,
        principal,
        annual_rate_percent,
        months,
        final_installment,
        schedule_total_payment,
        schedule_total_interest,
        schedule,
    })
}

/// EMI computation wrapped in the standard output envelope.
pub fn calculate_emi(terms: &LoanTerms) -> CalcResult<ComputationOutput<EmiResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_emi(terms.principal, terms.annual_rate_percent, terms.months)?;

    if terms.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: installment is principal / months".into());
    }
    if result.final_installment != result.installment {
        warnings.push(format!(
            "Final installment adjusted to {} to clear rounding residue",
            result.final_installment
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equated Monthly Installment (reducing balance)",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_rate_percent": terms.annual_rate_percent.to_string(),
            "months": terms.months,
            "monthly_rate": time_value::monthly_rate(terms.annual_rate_percent).to_string(),
            "rounding": "2dp half-up per field",
        }),
        warnings,
        elapsed,
        result,
    ))
}
