use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::line_item::LineItem;

/// Outcome of applying a payment amount to a payer's outstanding items.
///
/// `covered` is always a contiguous prefix of the date-sorted eligible items and
/// `total_covered + remaining_credit == amount` holds exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentAllocation {
    pub amount: Decimal,
    pub covered: Vec<LineItem>,
    pub total_covered: Decimal,
    pub remaining_credit: Decimal,
}

impl PaymentAllocation {
    pub fn covered_count(&self) -> usize {
        self.covered.len()
    }

    pub fn covered_ids(&self) -> Vec<String> {
        self.covered.iter().map(|item| item.id.clone()).collect()
    }

    pub fn covers(&self, item_id: &str) -> bool {
        self.covered.iter().any(|item| item.id == item_id)
    }
}

/// Entry appended to the payment history when an allocation is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub payer_id: String,
    pub amount: Decimal,
    pub covered_item_ids: Vec<String>,
    pub covered_count: usize,
    pub total_covered: Decimal,
    pub remaining_credit: Decimal,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn from_allocation(payer_id: impl Into<String>, allocation: &PaymentAllocation) -> Self {
        Self {
            id: Uuid::new_v4(),
            payer_id: payer_id.into(),
            amount: allocation.amount,
            covered_item_ids: allocation.covered_ids(),
            covered_count: allocation.covered_count(),
            total_covered: allocation.total_covered,
            remaining_credit: allocation.remaining_credit,
            created_at: Utc::now(),
        }
    }
}
