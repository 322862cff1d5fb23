//! View-model for the "record payment" form.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::services::PaymentBook;
use crate::core::validation::{fields, ValidationErrors};
use crate::domain::PaymentAllocation;
use crate::errors::CoreError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentFormState {
    pub payer_id: Option<String>,
    pub amount_input: String,
    /// Coverage the current input would produce, if a payer is selected.
    pub preview: Option<PaymentAllocation>,
    pub balance_version: u64,
    pub errors: ValidationErrors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFormAction {
    SelectPayer(String),
    ClearPayer,
    EditAmount(String),
    Reset,
}

impl PaymentFormState {
    /// True when the form holds a clean preview that can be committed.
    pub fn is_submittable(&self) -> bool {
        self.payer_id.is_some() && self.preview.is_some() && self.errors.is_empty()
    }
}

/// Applies `action` and recomputes the preview against `book`.
pub fn reduce(
    state: &PaymentFormState,
    action: PaymentFormAction,
    book: &PaymentBook,
) -> PaymentFormState {
    let mut next = state.clone();
    match action {
        PaymentFormAction::SelectPayer(payer) => next.payer_id = Some(payer),
        PaymentFormAction::ClearPayer => next.payer_id = None,
        PaymentFormAction::EditAmount(input) => next.amount_input = input,
        PaymentFormAction::Reset => next = PaymentFormState::default(),
    }
    refresh_preview(next, book)
}

fn refresh_preview(mut state: PaymentFormState, book: &PaymentBook) -> PaymentFormState {
    state.errors = ValidationErrors::new();
    state.preview = None;

    let Some(payer) = state.payer_id.clone() else {
        return state;
    };
    state.balance_version = book.balance_version(&payer);
    // Blank input is "not typed yet", not an error.
    if state.amount_input.trim().is_empty() {
        return state;
    }

    match book.preview(&payer, &state.amount_input) {
        Ok(preview) => {
            if let Some(issue) = preview.amount_issue {
                state.errors.push(fields::AMOUNT, issue);
            }
            state.balance_version = preview.version;
            state.preview = Some(preview.allocation);
        }
        Err(CoreError::Validation(errors)) => state.errors = errors,
        Err(err) => warn!(%err, "payment preview failed"),
    }
    state
}
