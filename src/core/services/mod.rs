pub mod availability_service;
pub mod catalog_service;
pub mod payment_service;

pub use availability_service::AvailabilityBook;
pub use catalog_service::CatalogService;
pub use payment_service::{PaymentBook, PaymentPreview};
