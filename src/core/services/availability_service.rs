//! Teacher availability collection with conflict flags kept current.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::conflicts::{
    check_time_range, detect_conflicts, validate_interval_edit, validate_new_interval,
};
use crate::domain::{AvailabilityInterval, IntervalDraft};
use crate::errors::{CoreError, CoreResult};

/// Holds every availability interval as one immutable snapshot.
///
/// Each mutation builds a new collection, re-runs conflict detection over all
/// of it, and swaps the snapshot in. Readers holding an older snapshot keep a
/// consistent view.
#[derive(Debug, Clone)]
pub struct AvailabilityBook {
    intervals: Arc<[AvailabilityInterval]>,
}

impl Default for AvailabilityBook {
    fn default() -> Self {
        Self {
            intervals: Arc::from(Vec::new()),
        }
    }
}

impl AvailabilityBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads existing records as-is; overlaps among them are flagged, not rejected.
    pub fn from_intervals(intervals: Vec<AvailabilityInterval>) -> Self {
        let mut book = Self::new();
        book.replace_all(intervals);
        book
    }

    pub fn snapshot(&self) -> Arc<[AvailabilityInterval]> {
        Arc::clone(&self.intervals)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&AvailabilityInterval> {
        self.intervals.iter().find(|interval| interval.id == id)
    }

    pub fn for_owner<'a>(&'a self, owner_id: &'a str) -> impl Iterator<Item = &'a AvailabilityInterval> + 'a {
        self.intervals
            .iter()
            .filter(move |interval| interval.owner_id == owner_id)
    }

    pub fn conflicts(&self) -> Vec<&AvailabilityInterval> {
        self.intervals
            .iter()
            .filter(|interval| interval.has_conflict)
            .collect()
    }

    /// Validates and inserts a new interval, rejecting overlaps.
    pub fn add(&mut self, draft: &IntervalDraft) -> CoreResult<Uuid> {
        let interval = validate_new_interval(draft, &self.intervals).map_err(|errors| {
            warn!(%errors, "availability interval rejected");
            CoreError::Validation(errors)
        })?;
        let id = interval.id;
        info!(interval = %id, owner = %interval.owner_id, day = %interval.day, "availability added");

        let mut next = self.intervals.to_vec();
        next.push(interval);
        self.commit(next);
        Ok(id)
    }

    /// Replaces the fields of interval `id` with `draft`, under the same rules as [`add`](Self::add).
    pub fn edit(&mut self, id: Uuid, draft: &IntervalDraft) -> CoreResult<()> {
        let position = self.position(id)?;
        let edited = validate_interval_edit(id, draft, &self.intervals).map_err(|errors| {
            warn!(interval = %id, %errors, "availability edit rejected");
            CoreError::Validation(errors)
        })?;

        let mut next = self.intervals.to_vec();
        next[position] = edited;
        self.commit(next);
        info!(interval = %id, "availability edited");
        Ok(())
    }

    /// Flips the available flag. Overlaps created this way are flagged, not refused;
    /// turning an interval on still requires a valid time range.
    pub fn set_available(&mut self, id: Uuid, available: bool) -> CoreResult<()> {
        let position = self.position(id)?;
        let mut next = self.intervals.to_vec();
        let interval = &mut next[position];
        interval.available = available;
        if available {
            check_time_range(interval.start, interval.end).map_err(|errors| {
                warn!(interval = %id, %errors, "availability toggle rejected");
                CoreError::Validation(errors)
            })?;
        }
        self.commit(next);
        info!(interval = %id, available, "availability toggled");
        Ok(())
    }

    /// Toggles the available flag, returning the new value.
    pub fn toggle(&mut self, id: Uuid) -> CoreResult<bool> {
        let current = self
            .get(id)
            .map(|interval| interval.available)
            .ok_or(CoreError::IntervalNotFound(id))?;
        self.set_available(id, !current)?;
        Ok(!current)
    }

    pub fn remove(&mut self, id: Uuid) -> CoreResult<AvailabilityInterval> {
        let position = self.position(id)?;
        let mut next = self.intervals.to_vec();
        let removed = next.remove(position);
        self.commit(next);
        info!(interval = %id, "availability removed");
        Ok(removed)
    }

    pub fn replace_all(&mut self, intervals: Vec<AvailabilityInterval>) {
        self.commit(intervals);
        let flagged = self.intervals.iter().filter(|i| i.has_conflict).count();
        if flagged > 0 {
            warn!(flagged, "availability loaded with overlapping intervals");
        }
    }

    fn position(&self, id: Uuid) -> CoreResult<usize> {
        self.intervals
            .iter()
            .position(|interval| interval.id == id)
            .ok_or(CoreError::IntervalNotFound(id))
    }

    fn commit(&mut self, next: Vec<AvailabilityInterval>) {
        self.intervals = Arc::from(detect_conflicts(&next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::{fields, ValidationIssue};
    use chrono::{NaiveTime, Weekday};

    fn t(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn conflicting_pair() -> (AvailabilityBook, Uuid, Uuid) {
        let a = AvailabilityInterval::available("TCH001", Weekday::Mon, t(8), t(12));
        let b = AvailabilityInterval::available("TCH001", Weekday::Mon, t(11), t(14));
        let (a_id, b_id) = (a.id, b.id);
        (AvailabilityBook::from_intervals(vec![a, b]), a_id, b_id)
    }

    #[test]
    fn loading_flags_existing_overlaps() {
        let (book, a, b) = conflicting_pair();
        assert!(book.get(a).unwrap().has_conflict);
        assert!(book.get(b).unwrap().has_conflict);
        assert_eq!(book.conflicts().len(), 2);
    }

    #[test]
    fn removing_one_side_clears_the_other() {
        let (mut book, a, b) = conflicting_pair();
        book.remove(a).unwrap();
        assert!(!book.get(b).unwrap().has_conflict);
        assert!(book.conflicts().is_empty());
    }

    #[test]
    fn toggling_off_clears_and_toggling_on_restores_flags() {
        let (mut book, a, b) = conflicting_pair();
        assert!(!book.toggle(a).unwrap());
        assert!(!book.get(a).unwrap().has_conflict);
        assert!(!book.get(b).unwrap().has_conflict);

        assert!(book.toggle(a).unwrap());
        assert!(book.get(b).unwrap().has_conflict);
    }

    #[test]
    fn add_rejects_overlap_and_leaves_collection_untouched() {
        let mut book = AvailabilityBook::new();
        book.add(&IntervalDraft::available("TCH001", Weekday::Mon, t(8), t(16)))
            .unwrap();
        let err = book
            .add(&IntervalDraft::available("TCH001", Weekday::Mon, t(14), t(20)))
            .unwrap_err();
        assert!(err.validation().unwrap().has_overlap());
        assert_eq!(book.len(), 1);

        book.add(&IntervalDraft::available("TCH002", Weekday::Mon, t(14), t(20)))
            .unwrap();
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn edit_moves_interval_out_of_conflict() {
        let (mut book, a, b) = conflicting_pair();
        book.edit(a, &IntervalDraft::available("TCH001", Weekday::Mon, t(8), t(11)))
            .unwrap();
        assert!(!book.get(a).unwrap().has_conflict);
        assert!(!book.get(b).unwrap().has_conflict);
    }

    #[test]
    fn enabling_interval_without_times_is_refused() {
        let mut book = AvailabilityBook::new();
        let id = book
            .add(&IntervalDraft::unavailable("TCH003", Weekday::Sat))
            .unwrap();
        let err = book.set_available(id, true).unwrap_err();
        let errors = err.validation().unwrap();
        assert_eq!(errors.get(fields::START), &[ValidationIssue::MissingRequiredField]);
        assert!(!book.get(id).unwrap().available);
    }

    #[test]
    fn enabling_an_inverted_interval_reports_the_range() {
        let mut stored = AvailabilityInterval::available("TCH003", Weekday::Sun, t(15), t(9));
        stored.available = false;
        let id = stored.id;
        let mut book = AvailabilityBook::from_intervals(vec![stored]);

        let err = book.toggle(id).unwrap_err();
        let errors = err.validation().unwrap();
        assert_eq!(errors.get(fields::END), &[ValidationIssue::InvalidTimeRange]);
        assert!(errors.get(fields::START).is_empty());
        assert!(!book.get(id).unwrap().available);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut book = AvailabilityBook::new();
        let id = Uuid::new_v4();
        assert!(matches!(book.remove(id), Err(CoreError::IntervalNotFound(missing)) if missing == id));
        assert!(matches!(book.toggle(id), Err(CoreError::IntervalNotFound(_))));
    }

    #[test]
    fn snapshots_stay_consistent_after_mutation() {
        let (mut book, a, _) = conflicting_pair();
        let before = book.snapshot();
        book.remove(a).unwrap();
        assert_eq!(before.len(), 2);
        assert!(before.iter().all(|interval| interval.has_conflict));
        assert_eq!(book.snapshot().len(), 1);
    }
}
