use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Owned};

/// A priced, dated billable unit (typically a completed lesson) awaiting payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub id: String,
    pub owner_id: String,
    /// `None` when the price was never captured. Missing or negative prices make
    /// the item ineligible for allocation.
    #[serde(default)]
    pub price: Option<Decimal>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        price: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            price: Some(price),
            date,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the price when it is present and non-negative.
    pub fn valid_price(&self) -> Option<Decimal> {
        self.price.filter(|price| *price >= Decimal::ZERO)
    }
}

impl Owned for LineItem {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Displayable for LineItem {
    fn display_label(&self) -> String {
        match &self.description {
            Some(description) => format!("{} ({})", description, self.date),
            None => format!("{} ({})", self.id, self.date),
        }
    }
}
