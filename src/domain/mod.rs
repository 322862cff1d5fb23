pub mod availability;
pub mod catalog;
pub mod common;
pub mod line_item;
pub mod payment;
pub mod time_format;

pub use availability::{AvailabilityInterval, IntervalDraft, TimeRange};
pub use catalog::{Catalog, StageSubject, Subject};
pub use common::{Displayable, Owned};
pub use line_item::LineItem;
pub use payment::{PaymentAllocation, PaymentRecord};
