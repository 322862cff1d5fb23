//! Greedy oldest-first allocation of a payment across outstanding line items.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::validation::ValidationIssue;
use crate::domain::{LineItem, PaymentAllocation};

/// Default number of fractional digits kept for amounts.
pub const DEFAULT_PRECISION: u32 = 2;

/// Parses a user-entered amount.
///
/// Non-numeric, negative, or blank input is normalized to zero and reported as
/// [`ValidationIssue::InvalidAmount`] next to the value; parsing never fails.
pub fn normalize_amount(raw: &str, precision: u32) -> (Decimal, Option<ValidationIssue>) {
    let trimmed = raw.trim();
    match Decimal::from_str(trimmed) {
        Ok(value) if value >= Decimal::ZERO => (
            value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero),
            None,
        ),
        _ => (
            Decimal::ZERO,
            Some(ValidationIssue::InvalidAmount {
                input: trimmed.to_string(),
            }),
        ),
    }
}

/// Covers items oldest-first until the next item no longer fits.
///
/// Items with a missing or negative price are ignored. Items sharing a date keep
/// their input order. The walk stops at the first item that does not fit; a
/// cheaper later item is never picked instead. A negative `amount` is treated
/// as zero, and a zero amount covers nothing, not even free items.
pub fn allocate_payment(amount: Decimal, items: &[LineItem]) -> PaymentAllocation {
    let amount = amount.max(Decimal::ZERO);
    if amount.is_zero() {
        return PaymentAllocation::default();
    }

    let mut eligible: Vec<(&LineItem, Decimal)> = items
        .iter()
        .filter_map(|item| item.valid_price().map(|price| (item, price)))
        .collect();
    // stable: equal dates keep input order
    eligible.sort_by_key(|(item, _)| item.date);

    let mut remaining = amount;
    let mut covered = Vec::new();
    for (item, price) in eligible {
        if remaining < price {
            break;
        }
        remaining -= price;
        covered.push(item.clone());
    }

    PaymentAllocation {
        amount,
        covered,
        total_covered: amount - remaining,
        remaining_credit: remaining,
    }
}

/// Convenience for form input: normalizes `raw` and allocates the result.
pub fn allocate_from_input(
    raw: &str,
    items: &[LineItem],
    precision: u32,
) -> (PaymentAllocation, Option<ValidationIssue>) {
    let (amount, issue) = normalize_amount(raw, precision);
    (allocate_payment(amount, items), issue)
}
