use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::domain::AvailabilityInterval;

/// Filter state of the availability table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityScreenState {
    pub owner_filter: Option<String>,
    pub day_filter: Option<Weekday>,
    pub conflicts_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityScreenAction {
    FilterOwner(Option<String>),
    FilterDay(Option<Weekday>),
    ToggleConflictsOnly,
    ClearFilters,
}

pub fn reduce(
    state: &AvailabilityScreenState,
    action: AvailabilityScreenAction,
) -> AvailabilityScreenState {
    let mut next = state.clone();
    match action {
        AvailabilityScreenAction::FilterOwner(owner) => {
            next.owner_filter = owner.filter(|value| !value.trim().is_empty())
        }
        AvailabilityScreenAction::FilterDay(day) => next.day_filter = day,
        AvailabilityScreenAction::ToggleConflictsOnly => next.conflicts_only = !next.conflicts_only,
        AvailabilityScreenAction::ClearFilters => next = AvailabilityScreenState::default(),
    }
    next
}

/// Rows matching the filters, ordered by owner, weekday, then start time.
pub fn visible_rows<'a>(
    state: &AvailabilityScreenState,
    intervals: &'a [AvailabilityInterval],
) -> Vec<&'a AvailabilityInterval> {
    let mut rows: Vec<&AvailabilityInterval> = intervals
        .iter()
        .filter(|interval| {
            state
                .owner_filter
                .as_deref()
                .map_or(true, |owner| interval.owner_id == owner)
        })
        .filter(|interval| state.day_filter.map_or(true, |day| interval.day == day))
        .filter(|interval| !state.conflicts_only || interval.has_conflict)
        .collect();
    rows.sort_by(|a, b| {
        a.owner_id
            .cmp(&b.owner_id)
            .then(a.day.num_days_from_monday().cmp(&b.day.num_days_from_monday()))
            .then(a.start.cmp(&b.start))
    });
    rows
}
