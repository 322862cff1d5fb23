use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Owned};
use crate::domain::time_format;

/// Half-open `[start, end)` time-of-day window with `start < end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// Returns `None` unless `start` is strictly before `end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Half-open overlap: back-to-back windows do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A declared weekly window during which an owner (teacher) is bookable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityInterval {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub owner_id: String,
    pub day: Weekday,
    pub available: bool,
    #[serde(default, with = "time_format::option")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end: Option<NaiveTime>,
    /// Derived by conflict detection; never trusted from input.
    #[serde(default)]
    pub has_conflict: bool,
}

impl AvailabilityInterval {
    pub fn available(
        owner_id: impl Into<String>,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            day,
            available: true,
            start: Some(start),
            end: Some(end),
            has_conflict: false,
        }
    }

    pub fn unavailable(owner_id: impl Into<String>, day: Weekday) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            day,
            available: false,
            start: None,
            end: None,
            has_conflict: false,
        }
    }

    /// The comparable window, present only for available intervals with a valid range.
    pub fn time_range(&self) -> Option<TimeRange> {
        if !self.available {
            return None;
        }
        TimeRange::new(self.start?, self.end?)
    }
}

impl Owned for AvailabilityInterval {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Displayable for AvailabilityInterval {
    fn display_label(&self) -> String {
        match self.time_range() {
            Some(range) => format!(
                "{} {} {}-{}",
                self.owner_id,
                self.day,
                time_format::format_time(range.start),
                time_format::format_time(range.end)
            ),
            None => format!("{} {} unavailable", self.owner_id, self.day),
        }
    }
}

/// Form input for a new or edited interval. Any field may still be unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntervalDraft {
    pub owner_id: Option<String>,
    pub day: Option<Weekday>,
    pub available: bool,
    #[serde(default, with = "time_format::option")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end: Option<NaiveTime>,
}

impl IntervalDraft {
    pub fn available(
        owner_id: impl Into<String>,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            day: Some(day),
            available: true,
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn unavailable(owner_id: impl Into<String>, day: Weekday) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            day: Some(day),
            available: false,
            start: None,
            end: None,
        }
    }
}

impl From<&AvailabilityInterval> for IntervalDraft {
    fn from(interval: &AvailabilityInterval) -> Self {
        Self {
            owner_id: Some(interval.owner_id.clone()),
            day: Some(interval.day),
            available: interval.available,
            start: interval.start,
            end: interval.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn time_range_requires_strict_order() {
        assert!(TimeRange::new(t(9, 0), t(9, 0)).is_none());
        assert!(TimeRange::new(t(10, 0), t(9, 0)).is_none());
        let range = TimeRange::new(t(9, 0), t(10, 30)).unwrap();
        assert_eq!(range.duration_minutes(), 90);
    }

    #[test]
    fn unavailable_intervals_have_no_range() {
        let mut interval = AvailabilityInterval::available("TCH001", Weekday::Mon, t(8, 0), t(16, 0));
        assert!(interval.time_range().is_some());
        interval.available = false;
        assert!(interval.time_range().is_none());
    }

    #[test]
    fn deserializes_dashboard_records() {
        let json = r#"{
            "owner_id": "TCH001",
            "day": "Monday",
            "available": true,
            "start": "08:00",
            "end": "16:00",
            "has_conflict": true
        }"#;
        let interval: AvailabilityInterval = serde_json::from_str(json).unwrap();
        assert_eq!(interval.day, Weekday::Mon);
        assert_eq!(interval.start, Some(t(8, 0)));
        assert_eq!(interval.time_range().unwrap().end, t(16, 0));

        let round = serde_json::to_value(&interval).unwrap();
        assert_eq!(round["start"], "08:00");
    }
}
