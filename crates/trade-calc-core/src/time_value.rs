use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::CalcError;
use crate::types::{Money, Percent, Rate};
use crate::CalcResult;

const MONTHS_PER_YEAR_PERCENT: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);

/// Convert an annual percentage (10 = 10% p.a.) into a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / MONTHS_PER_YEAR_PERCENT
}

/// Compound growth factor (1 + r)^n.
pub fn compound_factor(rate: Rate, nper: u32) -> CalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| CalcError::NumericOverflow {
            context: format!("compound factor (1 + {rate})^{nper}"),
        })
}

/// Level payment that fully amortises `present_value` over `nper` periods.
///
/// Returns the unrounded payment; callers round once at the field they expose.
pub fn level_payment(present_value: Money, rate: Rate, nper: u32) -> CalcResult<Money> {
    if nper == 0 {
        return Err(CalcError::invalid("nper", "Number of periods must be > 0"));
    }

    let periods = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(present_value / periods);
    }

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    // Rates small enough to vanish in 28 digits behave like a zero rate
    if denominator.is_zero() {
        return Ok(present_value / periods);
    }

    present_value
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| CalcError::NumericOverflow {
            context: "level payment".into(),
        })
}

/// Future value of `nper` contributions of `payment` made at the start of
/// each period (annuity due).
pub fn annuity_due_fv(payment: Money, rate: Rate, nper: u32) -> CalcResult<Money> {
    let periods = Decimal::from(nper);
    if rate.is_zero() {
        return payment
            .checked_mul(periods)
            .ok_or_else(|| CalcError::NumericOverflow {
                context: "annuity future value".into(),
            });
    }

    let factor = compound_factor(rate, nper)?;
    ((factor - Decimal::ONE) / rate)
        .checked_mul(payment)
        .and_then(|v| v.checked_mul(Decimal::ONE + rate))
        .ok_or_else(|| CalcError::NumericOverflow {
            context: "annuity future value".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_compound_factor_basic() {
        assert_eq!(compound_factor(dec!(0.1), 2).unwrap(), dec!(1.21));
        assert_eq!(compound_factor(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_factor_overflow_is_error() {
        let err = compound_factor(dec!(1), 200).unwrap_err();
        assert!(matches!(err, CalcError::NumericOverflow { .. }));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        assert_eq!(level_payment(dec!(1200), Decimal::ZERO, 12).unwrap(), dec!(100));
    }

    #[test]
    fn test_level_payment_basic() {
        // 100k over 12 months at 10% p.a. ≈ 8791.59
        let pmt = level_payment(dec!(100000), monthly_rate(dec!(10)), 12).unwrap();
        assert!((pmt - dec!(8791.59)).abs() < dec!(0.01));
    }

    #[test]
    fn test_level_payment_zero_periods_rejected() {
        assert!(level_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_annuity_due_fv_zero_rate() {
        assert_eq!(annuity_due_fv(dec!(500), Decimal::ZERO, 24).unwrap(), dec!(12000));
    }

    #[test]
    fn test_annuity_due_fv_one_period() {
        // A single contribution grows for one period
        assert_eq!(annuity_due_fv(dec!(100), dec!(0.01), 1).unwrap(), dec!(101));
    }
}
