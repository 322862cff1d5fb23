//! Overlap detection for weekly availability intervals.
//!
//! Two intervals conflict when they share an owner and a day, both are
//! available, and their half-open `[start, end)` windows intersect. Conflict
//! flags are derived: they are recomputed over a whole collection and never
//! carried over from input.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Weekday};
use uuid::Uuid;

use crate::core::validation::{fields, ValidationErrors, ValidationIssue};
use crate::domain::{AvailabilityInterval, IntervalDraft, TimeRange};

/// Half-open overlap test shared by detection and validation.
pub fn ranges_overlap(a: &TimeRange, b: &TimeRange) -> bool {
    a.overlaps(b)
}

/// Returns `intervals` in the same order, each with `has_conflict` recomputed.
///
/// Runs a sort-and-sweep per (owner, day) group, so the cost is O(n log n)
/// while the result matches a pairwise comparison of every interval.
pub fn detect_conflicts(intervals: &[AvailabilityInterval]) -> Vec<AvailabilityInterval> {
    let flags = conflict_flags(intervals);
    intervals
        .iter()
        .zip(flags)
        .map(|(interval, has_conflict)| AvailabilityInterval {
            has_conflict,
            ..interval.clone()
        })
        .collect()
}

fn conflict_flags(intervals: &[AvailabilityInterval]) -> Vec<bool> {
    let mut flags = vec![false; intervals.len()];
    let mut groups: BTreeMap<(&str, u32), Vec<(usize, TimeRange)>> = BTreeMap::new();
    for (idx, interval) in intervals.iter().enumerate() {
        if let Some(range) = interval.time_range() {
            groups
                .entry((interval.owner_id.as_str(), interval.day.num_days_from_monday()))
                .or_default()
                .push((idx, range));
        }
    }

    for members in groups.values_mut() {
        members.sort_by_key(|(idx, range)| (range.start, range.end, *idx));
        // Latest end among members already visited.
        let mut reach: Option<NaiveTime> = None;
        for pos in 0..members.len() {
            let (idx, range) = members[pos];
            let hits_earlier = reach.is_some_and(|end| range.start < end);
            // Later members start no earlier, so only the next one needs checking.
            let hits_later = members
                .get(pos + 1)
                .is_some_and(|(_, next)| next.start < range.end);
            if hits_earlier || hits_later {
                flags[idx] = true;
            }
            reach = Some(reach.map_or(range.end, |end| end.max(range.end)));
        }
    }
    flags
}

/// Field errors for an available interval's start and end, or the usable range.
pub fn check_time_range(
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
) -> Result<TimeRange, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    match (start, end) {
        (Some(start), Some(end)) => match TimeRange::new(start, end) {
            Some(range) => return Ok(range),
            None => errors.push(fields::END, ValidationIssue::InvalidTimeRange),
        },
        (start, end) => {
            if start.is_none() {
                errors.push(fields::START, ValidationIssue::MissingRequiredField);
            }
            if end.is_none() {
                errors.push(fields::END, ValidationIssue::MissingRequiredField);
            }
        }
    }
    Err(errors)
}

/// Finds an interval in `existing` that the given window would overlap.
pub fn find_overlap<'a>(
    owner_id: &str,
    day: Weekday,
    range: &TimeRange,
    existing: &'a [AvailabilityInterval],
    ignore: Option<Uuid>,
) -> Option<&'a AvailabilityInterval> {
    existing.iter().find(|other| {
        Some(other.id) != ignore
            && other.owner_id == owner_id
            && other.day == day
            && other
                .time_range()
                .is_some_and(|other_range| ranges_overlap(range, &other_range))
    })
}

/// Validates a proposed interval against the current collection.
///
/// Returns the interval ready to be inserted, or every field-level issue found,
/// including [`ValidationIssue::OverlapConflict`] when it clashes with an
/// existing available interval of the same owner and day.
pub fn validate_new_interval(
    draft: &IntervalDraft,
    existing: &[AvailabilityInterval],
) -> Result<AvailabilityInterval, ValidationErrors> {
    validate_against(draft, existing, None, Uuid::new_v4())
}

/// Same as [`validate_new_interval`] for an edit of interval `id`, which is not
/// compared against itself.
pub fn validate_interval_edit(
    id: Uuid,
    draft: &IntervalDraft,
    existing: &[AvailabilityInterval],
) -> Result<AvailabilityInterval, ValidationErrors> {
    validate_against(draft, existing, Some(id), id)
}

fn validate_against(
    draft: &IntervalDraft,
    existing: &[AvailabilityInterval],
    ignore: Option<Uuid>,
    id: Uuid,
) -> Result<AvailabilityInterval, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let owner = draft
        .owner_id
        .as_deref()
        .map(str::trim)
        .filter(|owner| !owner.is_empty());
    if owner.is_none() {
        errors.push(fields::OWNER, ValidationIssue::MissingRequiredField);
    }
    if draft.day.is_none() {
        errors.push(fields::DAY, ValidationIssue::MissingRequiredField);
    }

    let range = if draft.available {
        match check_time_range(draft.start, draft.end) {
            Ok(range) => Some(range),
            Err(range_errors) => {
                errors.merge(range_errors);
                None
            }
        }
    } else {
        None
    };

    if let (Some(owner), Some(day), Some(range)) = (owner, draft.day, range.as_ref()) {
        if let Some(clash) = find_overlap(owner, day, range, existing, ignore) {
            errors.push(fields::START, ValidationIssue::OverlapConflict { with: clash.id });
        }
    }

    match (owner, draft.day) {
        (Some(owner), Some(day)) if errors.is_empty() => Ok(AvailabilityInterval {
            id,
            owner_id: owner.to_string(),
            day,
            available: draft.available,
            start: range.map(|r| r.start),
            end: range.map(|r| r.end),
            has_conflict: false,
        }),
        _ => Err(errors),
    }
}
