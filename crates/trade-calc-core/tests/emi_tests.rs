use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trade_calc_core::loans::emi::{self, LoanTerms};
use trade_calc_core::{round_money, CalcError};

// ===========================================================================
// EMI engine tests
// ===========================================================================

// ---------------------------------------------------------------------------
// Reference values
// ---------------------------------------------------------------------------

#[test]
fn test_reference_loan_100k_10pct_12m() {
    let r = emi::compute_emi(dec!(100000), dec!(10), 12).unwrap();
    assert!((r.installment - dec!(8791.59)).abs() <= dec!(0.01));
    assert!((r.total_interest - dec!(5499.08)).abs() <= dec!(0.01));
    assert_eq!(r.total_payment, r.installment * dec!(12));
    assert_eq!(r.principal, dec!(100000));
}

#[test]
fn test_home_loan_20_years() {
    // 50 lakh at 8.5% over 240 months ≈ 43391.16
    let r = emi::compute_emi(dec!(5000000), dec!(8.5), 240).unwrap();
    assert!(
        (r.installment - dec!(43391.16)).abs() <= dec!(0.01),
        "installment was {}",
        r.installment
    );
    assert_eq!(r.schedule.len(), 240);
}

#[test]
fn test_interest_declines_and_principal_grows() {
    let r = emi::compute_emi(dec!(300000), dec!(9), 36).unwrap();
    for pair in r.schedule[..35].windows(2) {
        assert!(pair[1].interest_portion <= pair[0].interest_portion);
        assert!(pair[1].principal_portion >= pair[0].principal_portion);
    }
}

#[test]
fn test_months_are_sequential() {
    let r = emi::compute_emi(dec!(10000), dec!(7), 18).unwrap();
    let months: Vec<u32> = r.schedule.iter().map(|row| row.month).collect();
    assert_eq!(months, (1..=18).collect::<Vec<_>>());
}

// ---------------------------------------------------------------------------
// Zero-rate boundary
// ---------------------------------------------------------------------------

#[test]
fn test_zero_rate_installment_is_principal_over_months() {
    let r = emi::compute_emi(dec!(90000), Decimal::ZERO, 36).unwrap();
    assert_eq!(r.installment, dec!(2500));
    assert_eq!(r.total_payment, dec!(90000));
    assert_eq!(r.total_interest, Decimal::ZERO);
    assert_eq!(r.schedule_total_interest, Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Input rejection
// ---------------------------------------------------------------------------

#[test]
fn test_zero_principal_rejected() {
    let err = emi::compute_emi(Decimal::ZERO, dec!(10), 12).unwrap_err();
    match err {
        CalcError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_negative_rate_and_zero_tenure_rejected() {
    assert!(matches!(
        emi::compute_emi(dec!(1000), dec!(-2), 12),
        Err(CalcError::InvalidInput { .. })
    ));
    assert!(matches!(
        emi::compute_emi(dec!(1000), dec!(10), 0),
        Err(CalcError::InvalidInput { .. })
    ));
}

#[test]
fn test_absurd_rate_reports_overflow() {
    // (1 + 100)^6000 cannot be represented
    let err = emi::compute_emi(dec!(1000), dec!(120000), 6000).unwrap_err();
    assert!(matches!(err, CalcError::NumericOverflow { .. }));
}

// ---------------------------------------------------------------------------
// Envelope and serialisation
// ---------------------------------------------------------------------------

#[test]
fn test_envelope_metadata() {
    let terms = LoanTerms {
        principal: dec!(100000),
        annual_rate_percent: dec!(10),
        months: 12,
    };
    let out = emi::calculate_emi(&terms).unwrap();
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert!(out.methodology.contains("Equated Monthly Installment"));
    assert_eq!(out.assumptions["months"], 12);
}

#[test]
fn test_terms_deserialise_from_json() {
    let terms: LoanTerms = serde_json::from_str(
        r#"{"principal": "250000", "annual_rate_percent": "7.25", "months": 60}"#,
    )
    .unwrap();
    assert_eq!(terms.principal, dec!(250000));
    assert_eq!(terms.annual_rate_percent, dec!(7.25));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn principal_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..3_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_schedule_repays_principal_exactly(
        principal in principal_strategy(),
        rate in rate_strategy(),
        months in 1u32..=480u32,
    ) {
        let r = emi::compute_emi(principal, rate, months).unwrap();
        let repaid: Decimal = r.schedule.iter().map(|row| row.principal_portion).sum();
        prop_assert_eq!(repaid, round_money(principal));
        prop_assert_eq!(r.schedule.len(), months as usize);
        prop_assert_eq!(r.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
        prop_assert!(r.schedule.iter().all(|row| row.remaining_balance >= Decimal::ZERO));
    }

    #[test]
    fn prop_rows_reconcile(
        principal in principal_strategy(),
        rate in rate_strategy(),
        months in 1u32..=120u32,
    ) {
        let r = emi::compute_emi(principal, rate, months).unwrap();
        let mut balance = r.principal;
        for row in &r.schedule {
            prop_assert_eq!(row.installment, row.principal_portion + row.interest_portion);
            balance -= row.principal_portion;
            prop_assert_eq!(row.remaining_balance, balance);
        }
    }
}
