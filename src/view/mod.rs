//! Serializable per-screen state updated by pure reducers.

pub mod availability_screen;
pub mod payment_form;

pub use availability_screen::{AvailabilityScreenAction, AvailabilityScreenState};
pub use payment_form::{PaymentFormAction, PaymentFormState};
