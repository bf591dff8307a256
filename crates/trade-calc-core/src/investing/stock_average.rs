use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

/// A single purchase: price paid per unit and units bought
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockLot {
    pub price: Money,
    pub quantity: Quantity,
}

impl StockLot {
    pub fn new(price: Money, quantity: Quantity) -> Self {
        Self { price, quantity }
    }

    /// Unrounded cost of the lot.
    pub fn investment(&self) -> CalcResult<Money> {
        self.price
            .checked_mul(self.quantity)
            .ok_or_else(|| overflow("lot investment"))
    }
}

/// Input for the two-purchase average calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAverageInput {
    pub lot1: StockLot,
    pub lot2: StockLot,
}

/// Weighted average cost basis across two purchases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageResult {
    pub lot1_investment: Money,
    pub lot2_investment: Money,
    pub total_investment: Money,
    pub total_quantity: Quantity,
    pub average_price: Money,
    pub lot1: StockLot,
    pub lot2: StockLot,
    /// Lowest price paid across the lots
    pub best_price: Money,
    /// average_price − best_price; never negative
    pub price_differential: Money,
}

/// Weighted average cost basis across any number of purchases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotsAverage {
    pub lot_investments: Vec<Money>,
    pub total_investment: Money,
    pub total_quantity: Quantity,
    pub average_price: Money,
    pub best_price: Money,
    pub price_differential: Money,
}

fn overflow(context: &str) -> CalcError {
    CalcError::NumericOverflow {
        context: context.into(),
    }
}

fn validate_lot(index: usize, lot: &StockLot) -> CalcResult<()> {
    if round_money(lot.price) <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: format!("lot{index}.price"),
            reason: "Purchase price must be at least 0.01".into(),
        });
    }
    if lot.quantity <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: format!("lot{index}.quantity"),
            reason: "Quantity must be positive".into(),
        });
    }
    Ok(())
}

/// Weighted average price over every lot.
///
/// The average is taken from the unrounded totals and rounded once, so it
/// always lies between the lowest and highest lot price. The reported total
/// investment is the sum of the rounded per-lot figures.
pub fn compute_average_lots(lots: &[StockLot]) -> CalcResult<LotsAverage> {
    if lots.is_empty() {
        return Err(CalcError::invalid("lots", "At least one purchase lot is required"));
    }
    for (i, lot) in lots.iter().enumerate() {
        validate_lot(i + 1, lot)?;
    }

    let mut exact_investment = Decimal::ZERO;
    let mut total_investment = Decimal::ZERO;
    let mut total_quantity = Decimal::ZERO;
    let mut lot_investments = Vec::with_capacity(lots.len());
    for lot in lots {
        let investment = lot.investment()?;
        let rounded = round_money(investment);
        exact_investment = exact_investment
            .checked_add(investment)
            .ok_or_else(|| overflow("total investment"))?;
        total_investment = total_investment
            .checked_add(rounded)
            .ok_or_else(|| overflow("total investment"))?;
        total_quantity = total_quantity
            .checked_add(lot.quantity)
            .ok_or_else(|| overflow("total quantity"))?;
        lot_investments.push(rounded);
    }

    let average_price = round_money(
        exact_investment
            .checked_div(total_quantity)
            .ok_or_else(|| overflow("average price"))?,
    );
    let best_price = lots
        .iter()
        .map(|lot| lot.price)
        .min()
        .unwrap_or(Decimal::ZERO);
    let best_price = round_money(best_price);

    Ok(LotsAverage {
        lot_investments,
        total_investment,
        total_quantity: round_money(total_quantity),
        average_price,
        best_price,
        price_differential: average_price - best_price,
    })
}

fn echo_lot(lot: StockLot) -> StockLot {
    StockLot::new(round_money(lot.price), lot.quantity)
}

/// Average purchase price across two lots.
pub fn compute_average(lot1: StockLot, lot2: StockLot) -> CalcResult<AverageResult> {
    let avg = compute_average_lots(&[lot1, lot2])?;

    debug!(
        average_price = %avg.average_price,
        total_quantity = %avg.total_quantity,
        "computed stock average"
    );

    Ok(AverageResult {
        lot1_investment: avg.lot_investments[0],
        lot2_investment: avg.lot_investments[1],
        total_investment: avg.total_investment,
        total_quantity: avg.total_quantity,
        average_price: avg.average_price,
        lot1: echo_lot(lot1),
        lot2: echo_lot(lot2),
        best_price: avg.best_price,
        price_differential: avg.price_differential,
    })
}

/// Stock average wrapped in the standard output envelope.
pub fn calculate_stock_average(
    input: &StockAverageInput,
) -> CalcResult<ComputationOutput<AverageResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_average(input.lot1, input.lot2)?;

    if input.lot1.price == input.lot2.price {
        warnings.push("Both lots bought at the same price; average is unchanged".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Weighted average cost basis",
        &serde_json::json!({
            "lot1": { "price": input.lot1.price.to_string(), "quantity": input.lot1.quantity.to_string() },
            "lot2": { "price": input.lot2.price.to_string(), "quantity": input.lot2.quantity.to_string() },
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_identical_lots() {
        let lot = StockLot::new(dec!(100), dec!(10));
        let r = compute_average(lot, lot).unwrap();
        assert_eq!(r.average_price, dec!(100));
        assert_eq!(r.total_quantity, dec!(20));
        assert_eq!(r.price_differential, Decimal::ZERO);
    }

    #[test]
    fn test_averaging_down() {
        let r = compute_average(
            StockLot::new(dec!(150), dec!(10)),
            StockLot::new(dec!(120), dec!(20)),
        )
        .unwrap();
        // (1500 + 2400) / 30 = 130
        assert_eq!(r.lot1_investment, dec!(1500));
        assert_eq!(r.lot2_investment, dec!(2400));
        assert_eq!(r.total_investment, dec!(3900));
        assert_eq!(r.average_price, dec!(130));
        assert_eq!(r.best_price, dec!(120));
        assert_eq!(r.price_differential, dec!(10));
    }

    #[test]
    fn test_average_rounds_once() {
        let r = compute_average(
            StockLot::new(dec!(10), dec!(1)),
            StockLot::new(dec!(20), dec!(2)),
        )
        .unwrap();
        // 50 / 3 = 16.666… → 16.67
        assert_eq!(r.average_price, dec!(16.67));
    }

    #[test]
    fn test_fractional_quantities() {
        let r = compute_average(
            StockLot::new(dec!(2000), dec!(0.5)),
            StockLot::new(dec!(2100), dec!(1.25)),
        )
        .unwrap();
        assert_eq!(r.total_quantity, dec!(1.75));
        assert_eq!(r.total_investment, dec!(3625));
    }

    #[test]
    fn test_many_lots() {
        let lots = [
            StockLot::new(dec!(10), dec!(1)),
            StockLot::new(dec!(20), dec!(1)),
            StockLot::new(dec!(30), dec!(2)),
        ];
        let r = compute_average_lots(&lots).unwrap();
        assert_eq!(r.average_price, dec!(22.5));
        assert_eq!(r.best_price, dec!(10));
        assert_eq!(r.lot_investments, vec![dec!(10), dec!(20), dec!(60)]);
    }

    #[test]
    fn test_total_is_sum_of_rounded_lots() {
        let lot = StockLot::new(dec!(100.25), dec!(0.5));
        let r = compute_average(lot, lot).unwrap();
        // 50.125 rounds to 50.13 on each lot
        assert_eq!(r.lot1_investment, dec!(50.13));
        assert_eq!(r.lot2_investment, dec!(50.13));
        assert_eq!(r.total_investment, dec!(100.26));
        assert_eq!(r.average_price, dec!(100.25));
    }

    #[test]
    fn test_sum_overflow_is_an_error() {
        let lot = StockLot::new(dec!(500000000000000), dec!(100000000000000));
        match compute_average(lot, lot) {
            Err(CalcError::NumericOverflow { .. }) => {}
            other => panic!("expected NumericOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_lot_investment_checked() {
        let lot = StockLot::new(dec!(12.5), dec!(4));
        assert_eq!(lot.investment().unwrap(), dec!(50));
        let huge = StockLot::new(Decimal::MAX, dec!(2));
        assert!(matches!(
            huge.investment(),
            Err(CalcError::NumericOverflow { .. })
        ));
    }

    #[test]
    fn test_echoed_prices_rounded() {
        let r = compute_average(
            StockLot::new(dec!(100.256), dec!(3)),
            StockLot::new(dec!(99.994), dec!(1.5)),
        )
        .unwrap();
        assert_eq!(r.lot1.price, dec!(100.26));
        assert_eq!(r.lot2.price, dec!(99.99));
        assert_eq!(r.lot2.quantity, dec!(1.5));
    }

    #[test]
    fn test_invalid_lots_rejected() {
        let good = StockLot::new(dec!(10), dec!(1));
        assert!(compute_average(StockLot::new(dec!(-5), dec!(1)), good).is_err());
        assert!(compute_average(good, StockLot::new(dec!(5), Decimal::ZERO)).is_err());
        assert!(compute_average_lots(&[]).is_err());
        assert!(compute_average(StockLot::new(dec!(0.004), dec!(1)), good).is_err());
    }

    #[test]
    fn test_error_names_offending_lot() {
        let err = compute_average(
            StockLot::new(dec!(10), dec!(1)),
            StockLot::new(dec!(0), dec!(1)),
        )
        .unwrap_err();
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "lot2.price"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
