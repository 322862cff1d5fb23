//! Outstanding balances, payment commits, and the payment history.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{AmountPolicy, Config};
use crate::core::allocation::{allocate_payment, normalize_amount, DEFAULT_PRECISION};
use crate::core::validation::{fields, ValidationErrors, ValidationIssue};
use crate::domain::{LineItem, PaymentAllocation, PaymentRecord};
use crate::errors::{CoreError, CoreResult};

/// Read-only result of applying an amount to a payer's current balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentPreview {
    pub payer_id: String,
    pub allocation: PaymentAllocation,
    /// Balance version the preview was computed against; pass it back to
    /// [`PaymentBook::commit`].
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_issue: Option<ValidationIssue>,
}

/// Owns the outstanding pool and the payment history.
///
/// The pool is replaced wholesale on every change, so a snapshot handed out by
/// [`PaymentBook::outstanding`] never observes a half-applied payment. Each
/// payer carries a balance version that is bumped whenever their outstanding
/// items change; commits must present the version they previewed.
#[derive(Debug, Clone)]
pub struct PaymentBook {
    outstanding: Arc<[LineItem]>,
    history: Vec<PaymentRecord>,
    versions: HashMap<String, u64>,
    policy: AmountPolicy,
    precision: u32,
}

impl Default for PaymentBook {
    fn default() -> Self {
        Self::new(AmountPolicy::default(), DEFAULT_PRECISION)
    }
}

impl PaymentBook {
    pub fn new(policy: AmountPolicy, precision: u32) -> Self {
        Self {
            outstanding: Arc::from(Vec::new()),
            history: Vec::new(),
            versions: HashMap::new(),
            policy,
            precision,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.amount_policy, config.precision())
    }

    pub fn policy(&self) -> AmountPolicy {
        self.policy
    }

    /// Adds a billable item after checking its id, owner and price.
    pub fn add_outstanding(&mut self, item: LineItem) -> CoreResult<()> {
        let mut errors = ValidationErrors::new();
        if item.id.trim().is_empty() {
            errors.push(fields::ID, ValidationIssue::MissingRequiredField);
        } else if self.outstanding.iter().any(|existing| existing.id == item.id) {
            errors.push(
                fields::ID,
                ValidationIssue::DuplicateKey {
                    key: item.id.clone(),
                },
            );
        }
        if item.owner_id.trim().is_empty() {
            errors.push(fields::OWNER, ValidationIssue::MissingRequiredField);
        }
        match item.price {
            None => errors.push(fields::PRICE, ValidationIssue::MissingRequiredField),
            Some(price) if price < Decimal::ZERO => errors.push(
                fields::PRICE,
                ValidationIssue::InvalidAmount {
                    input: price.to_string(),
                },
            ),
            Some(_) => {}
        }
        if !errors.is_empty() {
            warn!(item = %item.id, %errors, "rejected outstanding item");
            return Err(errors.into());
        }

        let payer = item.owner_id.clone();
        let mut next = self.outstanding.to_vec();
        next.push(item);
        self.outstanding = Arc::from(next);
        self.bump_version(&payer);
        Ok(())
    }

    /// Replaces the whole pool. Items with unusable prices are kept but will
    /// never be allocated. Duplicate ids are refused and leave the pool as it was.
    pub fn replace_outstanding(&mut self, items: Vec<LineItem>) -> CoreResult<()> {
        let mut errors = ValidationErrors::new();
        {
            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            for item in &items {
                if !seen.insert(item.id.as_str()) && reported.insert(item.id.as_str()) {
                    errors.push(
                        fields::ID,
                        ValidationIssue::DuplicateKey {
                            key: item.id.clone(),
                        },
                    );
                }
            }
        }
        if !errors.is_empty() {
            warn!(%errors, "outstanding pool refused");
            return Err(errors.into());
        }

        let invalid = items.iter().filter(|item| item.valid_price().is_none()).count();
        if invalid > 0 {
            warn!(invalid, "outstanding pool loaded with unpriced items");
        }

        let payers: HashSet<String> = self
            .outstanding
            .iter()
            .chain(items.iter())
            .map(|item| item.owner_id.clone())
            .collect();
        self.outstanding = Arc::from(items);
        for payer in payers {
            self.bump_version(&payer);
        }
        info!(items = self.outstanding.len(), "outstanding pool replaced");
        Ok(())
    }

    pub fn outstanding(&self) -> Arc<[LineItem]> {
        Arc::clone(&self.outstanding)
    }

    pub fn outstanding_for(&self, payer_id: &str) -> Vec<LineItem> {
        self.outstanding
            .iter()
            .filter(|item| item.owner_id == payer_id)
            .cloned()
            .collect()
    }

    /// Sum of valid prices still owed by `payer_id`.
    pub fn outstanding_total(&self, payer_id: &str) -> Decimal {
        self.outstanding
            .iter()
            .filter(|item| item.owner_id == payer_id)
            .filter_map(LineItem::valid_price)
            .sum()
    }

    pub fn balance_version(&self, payer_id: &str) -> u64 {
        self.versions.get(payer_id).copied().unwrap_or(0)
    }

    pub fn history(&self) -> &[PaymentRecord] {
        &self.history
    }

    pub fn history_for<'a>(&'a self, payer_id: &'a str) -> impl Iterator<Item = &'a PaymentRecord> + 'a {
        self.history
            .iter()
            .filter(move |record| record.payer_id == payer_id)
    }

    /// Computes which of the payer's items `raw_amount` would cover. Nothing changes.
    pub fn preview(&self, payer_id: &str, raw_amount: &str) -> CoreResult<PaymentPreview> {
        let payer_id = Self::require_payer(payer_id)?;
        let (amount, amount_issue) = self.resolve_amount(raw_amount)?;
        let allocation = allocate_payment(amount, &self.outstanding_for(payer_id));
        debug!(
            payer = payer_id,
            %amount,
            covered = allocation.covered_count(),
            credit = %allocation.remaining_credit,
            "payment preview"
        );
        Ok(PaymentPreview {
            payer_id: payer_id.to_string(),
            allocation,
            version: self.balance_version(payer_id),
            amount_issue,
        })
    }

    /// Applies a payment: covered items leave the pool and one record is appended.
    ///
    /// Both effects happen together or not at all. `expected_version` must match
    /// the payer's current balance version, otherwise the payment is refused
    /// with [`CoreError::StaleBalance`] so the same items cannot be paid twice.
    pub fn commit(
        &mut self,
        payer_id: &str,
        raw_amount: &str,
        expected_version: u64,
    ) -> CoreResult<PaymentRecord> {
        let payer_id = Self::require_payer(payer_id)?;
        let actual = self.balance_version(payer_id);
        if actual != expected_version {
            warn!(payer = payer_id, expected_version, actual, "stale payment refused");
            return Err(CoreError::StaleBalance {
                payer: payer_id.to_string(),
                expected: expected_version,
                actual,
            });
        }

        let (amount, _) = self.resolve_amount(raw_amount)?;
        let allocation = allocate_payment(amount, &self.outstanding_for(payer_id));
        let record = PaymentRecord::from_allocation(payer_id, &allocation);

        let next: Vec<LineItem> = self
            .outstanding
            .iter()
            .filter(|item| !(item.owner_id == payer_id && allocation.covers(&item.id)))
            .cloned()
            .collect();

        self.outstanding = Arc::from(next);
        self.history.push(record.clone());
        self.bump_version(payer_id);

        info!(
            payer = payer_id,
            payment = %record.id,
            %amount,
            covered = record.covered_count,
            credit = %record.remaining_credit,
            "payment committed"
        );
        Ok(record)
    }

    fn require_payer(payer_id: &str) -> CoreResult<&str> {
        let trimmed = payer_id.trim();
        if trimmed.is_empty() {
            return Err(
                ValidationErrors::single(fields::PAYER, ValidationIssue::MissingRequiredField)
                    .into(),
            );
        }
        Ok(trimmed)
    }

    fn resolve_amount(&self, raw: &str) -> CoreResult<(Decimal, Option<ValidationIssue>)> {
        let (amount, issue) = normalize_amount(raw, self.precision);
        match (issue, self.policy) {
            (Some(issue), AmountPolicy::Reject) => {
                Err(ValidationErrors::single(fields::AMOUNT, issue).into())
            }
            (Some(issue), AmountPolicy::Normalize) => {
                debug!(%issue, "amount normalized to zero");
                Ok((amount, Some(issue)))
            }
            (None, _) => Ok((amount, None)),
        }
    }

    fn bump_version(&mut self, payer_id: &str) {
        *self.versions.entry(payer_id.to_string()).or_insert(0) += 1;
    }
}
