//! Allocation and conflict algorithms plus the services that apply them.

pub mod allocation;
pub mod conflicts;
pub mod services;
pub mod validation;

pub use allocation::{allocate_from_input, allocate_payment, normalize_amount};
pub use conflicts::{detect_conflicts, ranges_overlap, validate_interval_edit, validate_new_interval};
pub use validation::{ValidationErrors, ValidationIssue};
