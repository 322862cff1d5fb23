#![doc(test(attr(deny(warnings))))]

//! Tutordesk Core holds the money and scheduling logic behind the tutoring
//! dashboard: payment allocation over outstanding lessons, availability
//! conflict detection, and the services and view state built on them.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod utils;
pub mod view;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tutordesk Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
