//! Structured, per-field validation outcomes returned to callers for display.
//!
//! None of these are fatal: every issue describes user-correctable input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Canonical field keys used in [`ValidationErrors`].
pub mod fields {
    pub const AMOUNT: &str = "amount";
    pub const PAYER: &str = "payer";
    pub const ID: &str = "id";
    pub const OWNER: &str = "owner";
    pub const PRICE: &str = "price";
    pub const DAY: &str = "day";
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const NAME: &str = "name";
    pub const STAGE: &str = "stage";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("`{input}` is not a valid non-negative amount")]
    InvalidAmount { input: String },
    #[error("this field is required")]
    MissingRequiredField,
    #[error("start time must be before end time")]
    InvalidTimeRange,
    #[error("overlaps existing interval {with}")]
    OverlapConflict { with: Uuid },
    #[error("`{key}` already exists")]
    DuplicateKey { key: String },
}

/// Issues collected per field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(BTreeMap<String, Vec<ValidationIssue>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, issue: ValidationIssue) -> Self {
        let mut errors = Self::new();
        errors.push(field, issue);
        errors
    }

    pub fn push(&mut self, field: &str, issue: ValidationIssue) {
        self.0.entry(field.to_string()).or_default().push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of issues across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn get(&self, field: &str) -> &[ValidationIssue] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn issues(&self) -> impl Iterator<Item = (&str, &ValidationIssue)> {
        self.0
            .iter()
            .flat_map(|(field, issues)| issues.iter().map(move |issue| (field.as_str(), issue)))
    }

    pub fn has_overlap(&self) -> bool {
        self.issues()
            .any(|(_, issue)| matches!(issue, ValidationIssue::OverlapConflict { .. }))
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, issues) in other.0 {
            self.0.entry(field).or_default().extend(issues);
        }
    }

    /// `Ok(value)` when nothing was collected, otherwise the collected issues.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Renders issues as `field: message`, separated by `; `.
fn summarize(issues: &BTreeMap<String, Vec<ValidationIssue>>) -> String {
    issues
        .iter()
        .flat_map(|(field, issues)| issues.iter().map(move |issue| format!("{field}: {issue}")))
        .collect::<Vec<_>>()
        .join("; ")
}
