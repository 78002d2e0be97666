use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{AMOUNT_DECIMAL_PRECISION, PERCENT_DECIMAL_PRECISION, UNITS_DECIMAL_PRECISION};

/// Rounds a cash amount to cents.
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates a non-negative cash amount to whole cents.
pub fn floor_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_DECIMAL_PRECISION, RoundingStrategy::ToZero)
}

/// Splits `total` into cent amounts that track non-negative `shares`.
///
/// Every share is floored to cents. The cents still missing from `total` are
/// handed out one per share, largest remainder first with ties in input
/// order, to shares for which `accepts(index, floored)` holds. Cents no
/// share accepts land on `fallback`. `shares` must sum to `total`, so no
/// amount ever drops below its floored share.
pub fn apportion_cents(
    shares: &[Decimal],
    total: Decimal,
    fallback: usize,
    accepts: impl Fn(usize, Decimal) -> bool,
) -> Vec<Decimal> {
    let cent = Decimal::new(1, AMOUNT_DECIMAL_PRECISION);
    let mut amounts: Vec<Decimal> = shares.iter().map(|s| floor_amount(*s)).collect();
    let mut leftover = total - amounts.iter().copied().sum::<Decimal>();

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|a, b| (shares[*b] - amounts[*b]).cmp(&(shares[*a] - amounts[*a])));

    for idx in order {
        if leftover < cent {
            break;
        }
        if accepts(idx, amounts[idx]) {
            amounts[idx] += cent;
            leftover -= cent;
        }
    }
    if leftover > Decimal::ZERO {
        if let Some(amount) = amounts.get_mut(fallback) {
            *amount += leftover;
        }
    }
    amounts
}

/// Rounds a unit count to the settlement precision.
pub fn round_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(UNITS_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / total` as a percentage, 0 when the total is not positive.
pub fn percent_of(part: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (part / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(PERCENT_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_amount_midpoint() {
        assert_eq!(round_amount(dec!(33.335)), dec!(33.34));
        assert_eq!(round_amount(dec!(33.3333)), dec!(33.33));
    }

    #[test]
    fn test_apportion_cents_never_rounds_below_zero() {
        let amounts = apportion_cents(&[dec!(0.005); 4], dec!(0.02), 0, |_, _| true);
        assert_eq!(amounts, vec![dec!(0.01), dec!(0.01), dec!(0), dec!(0)]);
    }

    #[test]
    fn test_apportion_cents_prefers_largest_remainder() {
        let amounts = apportion_cents(&[dec!(1.001), dec!(1.009), dec!(0.99)], dec!(3), 0, |_, _| true);
        assert_eq!(amounts, vec![dec!(1.00), dec!(1.01), dec!(0.99)]);
    }

    #[test]
    fn test_apportion_cents_unaccepted_cents_go_to_fallback() {
        let amounts = apportion_cents(&[dec!(0.005), dec!(0.005)], dec!(0.01), 1, |_, _| false);
        assert_eq!(amounts, vec![dec!(0), dec!(0.01)]);
    }

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent_of(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(dec!(1), dec!(3)), dec!(33.33));
    }
}
