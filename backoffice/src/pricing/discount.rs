//! Discount applicability

use shared::error::ErrorCode;
use shared::models::Discount;

/// Check that `discount` can be applied at `now` to an order with `subtotal`.
///
/// Checks run in a fixed order: active flag, start, end, usage limit,
/// then the minimum order amount.
pub fn check_discount(discount: &Discount, subtotal: f64, now: i64) -> Result<(), ErrorCode> {
    if !discount.is_active {
        return Err(ErrorCode::DiscountInactive);
    }
    if discount.starts_at.is_some_and(|starts| now < starts) {
        return Err(ErrorCode::DiscountNotStarted);
    }
    if discount.ends_at.is_some_and(|ends| now >= ends) {
        return Err(ErrorCode::DiscountExpired);
    }
    if discount
        .usage_limit
        .is_some_and(|limit| discount.used_count >= limit)
    {
        return Err(ErrorCode::DiscountUsageExceeded);
    }
    if subtotal < discount.min_order_amount {
        return Err(ErrorCode::DiscountMinAmountNotMet);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::fixtures::discount;
    use shared::models::DiscountKind;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_applicable_discount() {
        let d = discount(DiscountKind::Percentage, 10.0);
        assert_eq!(check_discount(&d, 0.0, NOW), Ok(()));
    }

    #[test]
    fn test_inactive_wins_over_other_failures() {
        let mut d = discount(DiscountKind::Fixed, 5.0);
        d.is_active = false;
        d.ends_at = Some(NOW - 1);
        assert_eq!(check_discount(&d, 100.0, NOW), Err(ErrorCode::DiscountInactive));
    }

    #[test]
    fn test_validity_window() {
        let mut d = discount(DiscountKind::Fixed, 5.0);
        d.starts_at = Some(NOW + 1);
        assert_eq!(check_discount(&d, 100.0, NOW), Err(ErrorCode::DiscountNotStarted));

        d.starts_at = Some(NOW);
        d.ends_at = Some(NOW);
        assert_eq!(check_discount(&d, 100.0, NOW), Err(ErrorCode::DiscountExpired));

        d.ends_at = Some(NOW + 1);
        assert_eq!(check_discount(&d, 100.0, NOW), Ok(()));
    }

    #[test]
    fn test_usage_limit_and_minimum() {
        let mut d = discount(DiscountKind::Fixed, 5.0);
        d.usage_limit = Some(3);
        d.used_count = 3;
        assert_eq!(
            check_discount(&d, 100.0, NOW),
            Err(ErrorCode::DiscountUsageExceeded)
        );

        d.used_count = 2;
        d.min_order_amount = 50.0;
        assert_eq!(
            check_discount(&d, 49.99, NOW),
            Err(ErrorCode::DiscountMinAmountNotMet)
        );
        assert_eq!(check_discount(&d, 50.0, NOW), Ok(()));
    }
}
