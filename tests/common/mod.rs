#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use tempfile::TempDir;
use tutordesk_core::{
    config::ConfigManager,
    domain::{AvailabilityInterval, LineItem},
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn clock(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub fn lesson(id: &str, payer: &str, price: Decimal, on: NaiveDate) -> LineItem {
    LineItem::new(id, payer, price, on)
}

/// The three January lessons used throughout the payment scenarios.
pub fn january_lessons(payer: &str) -> Vec<LineItem> {
    use rust_decimal_macros::dec;
    vec![
        lesson("LES001", payer, dec!(150), date(2026, 1, 15)),
        lesson("LES002", payer, dec!(180), date(2026, 1, 18)),
        lesson("LES003", payer, dec!(150), date(2026, 1, 22)),
    ]
}

pub fn slot(owner: &str, day: Weekday, from: (u32, u32), to: (u32, u32)) -> AvailabilityInterval {
    AvailabilityInterval::available(owner, day, clock(from.0, from.1), clock(to.0, to.1))
}

/// Creates a config manager rooted in a fresh temporary directory.
///
/// Keep the returned guard alive for as long as the manager is used.
pub fn setup_config() -> (TempDir, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let manager =
        ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("create config manager");
    (temp, manager)
}
