//! Observable coordinator state and the queries derived from it.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::model::ErrorMap;
use crate::model::GroupState;

/// A snapshot of everything a form needs to render validation feedback.
///
/// Obtained from [`ValidationCoordinator::status`](super::ValidationCoordinator::status)
/// or, reactively, from [`ValidationCoordinator::subscribe`](super::ValidationCoordinator::subscribe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationStatus {
    initiated: bool,
    dirty: bool,
    dirty_fields: Vec<String>,
    /// Pending field -> round that marked it.
    pending: BTreeMap<String, u64>,
    validated: BTreeSet<String>,
    errors: Option<ErrorMap>,
    debounce: Duration,
}

impl Default for ValidationStatus {
    fn default() -> Self {
        Self {
            initiated: false,
            dirty: true,
            dirty_fields: Vec::new(),
            pending: BTreeMap::new(),
            validated: BTreeSet::new(),
            errors: None,
            debounce: Duration::ZERO,
        }
    }
}

impl ValidationStatus {
    /// Returns `true` once a round has succeeded.
    pub fn is_initiated(&self) -> bool {
        self.initiated
    }

    /// Returns `true` if anything changed since the last successful round.
    ///
    /// Starts out `true`: nothing is known before the first round.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Fields changed since the last successful round, in the order marked.
    pub fn dirty_fields(&self) -> &[String] {
        &self.dirty_fields
    }

    /// Returns `true` if the field changed since the last successful round.
    pub fn is_field_dirty(&self, field: &str) -> bool {
        self.dirty_fields.iter().any(|f| f == field)
    }

    /// Fields awaited by an in-flight round.
    pub fn pending_fields(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }

    /// The last error map received, if any.
    pub fn errors(&self) -> Option<&ErrorMap> {
        self.errors.as_ref()
    }

    /// Messages for a field, matched by prefix; empty if none.
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors
            .as_ref()
            .map(|errors| errors.errors_for(field))
            .unwrap_or(&[])
    }

    /// Returns `true` while the field awaits a response.
    ///
    /// Before the first successful round every field counts as validating.
    pub fn is_validating_field(&self, field: &str) -> bool {
        !self.initiated || self.pending.contains_key(field)
    }

    /// Returns `true` if a successful round has covered the field.
    pub fn has_been_validated(&self, field: &str) -> bool {
        self.validated.contains(field)
    }

    /// Aggregates the state of a group of fields.
    pub fn group_state<S: AsRef<str>>(&self, group: &[S]) -> GroupState {
        let fields = || group.iter().map(AsRef::<str>::as_ref);
        GroupState {
            dirty: fields().any(|f| self.is_field_dirty(f)),
            errored: fields().any(|f| !self.errors_for(f).is_empty()),
            complete: fields().any(|f| self.errors_for(f).is_empty()),
        }
    }

    /// Returns `true` if the error map is present and non-empty.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// Not dirty and no errors.
    pub fn is_valid(&self) -> bool {
        !self.dirty && !self.has_errors()
    }

    /// Dirty or has errors.
    pub fn is_errored(&self) -> bool {
        self.dirty || self.has_errors()
    }

    /// Returns `true` while any field awaits a response.
    pub fn is_validating(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Delay applied to the next non-immediate change.
    pub fn debounce_window(&self) -> Duration {
        self.debounce
    }

    // =========================================================================
    // Mutations, driven by the coordinator only
    // =========================================================================

    pub(crate) fn mark_dirty(&mut self, fields: &[String]) {
        self.dirty = true;
        for field in fields {
            if !self.is_field_dirty(field) {
                self.dirty_fields.push(field.clone());
            }
        }
    }

    pub(crate) fn mark_pending(&mut self, fields: &[String], round: u64) {
        for field in fields {
            self.pending.insert(field.clone(), round);
        }
    }

    /// Drops only the pending markers set by `round`. Returns whether any were.
    pub(crate) fn release_pending(&mut self, round: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|_, marked_by| *marked_by != round);
        self.pending.len() != before
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Applies a current successful round. Returns `true` on the first one.
    pub(crate) fn apply_success(&mut self, errors: ErrorMap, steady_debounce: Duration) -> bool {
        self.errors = Some(errors);
        self.dirty = false;
        self.validated.extend(self.dirty_fields.drain(..));
        self.pending.clear();

        if self.initiated {
            return false;
        }
        self.initiated = true;
        self.debounce = steady_debounce;
        true
    }

    pub(crate) fn clear_errors(&mut self) {
        self.errors = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fresh_status() {
        let status = ValidationStatus::default();
        assert!(status.is_dirty());
        assert!(!status.is_valid());
        assert!(status.is_errored());
        assert!(!status.has_errors());
        assert!(!status.is_validating());
        assert!(status.is_validating_field("anything"));
        assert_eq!(status.debounce_window(), Duration::ZERO);
    }

    #[test]
    fn test_mark_dirty_deduplicates_in_order() {
        let mut status = ValidationStatus::default();
        status.mark_dirty(&fields(&["b", "a"]));
        status.mark_dirty(&fields(&["a", "c"]));
        assert_eq!(status.dirty_fields(), ["b", "a", "c"]);
    }

    #[test]
    fn test_success_clears_dirty_and_pending_and_widens_once() {
        let mut status = ValidationStatus::default();
        status.mark_dirty(&fields(&["name"]));

        assert!(status.apply_success(ErrorMap::new(), Duration::from_millis(500)));
        status.mark_pending(&fields(&["name"]), 2);
        status.mark_dirty(&fields(&["name"]));
        assert!(!status.apply_success(ErrorMap::new(), Duration::from_millis(900)));

        assert!(status.is_valid());
        assert!(status.dirty_fields().is_empty());
        assert!(!status.is_validating());
        assert!(status.has_been_validated("name"));
        assert_eq!(status.debounce_window(), Duration::from_millis(500));
    }

    #[test]
    fn test_validating_field_follows_pending_once_initiated() {
        let mut status = ValidationStatus::default();
        status.apply_success(ErrorMap::new(), Duration::from_millis(500));
        assert!(!status.is_validating_field("email"));

        status.mark_pending(&fields(&["email"]), 3);
        assert!(status.is_validating_field("email"));
        assert!(!status.is_validating_field("name"));
    }

    #[test]
    fn test_release_pending_only_drops_own_round() {
        let mut status = ValidationStatus::default();
        status.mark_pending(&fields(&["a", "b"]), 1);
        status.mark_pending(&fields(&["b", "c"]), 2);

        assert!(status.release_pending(1));
        let pending: Vec<&str> = status.pending_fields().collect();
        assert_eq!(pending, ["b", "c"]);
        assert!(!status.release_pending(1));
    }

    #[test]
    fn test_has_errors_treats_empty_map_as_none() {
        let mut status = ValidationStatus::default();
        status.apply_success(ErrorMap::new(), Duration::from_millis(500));
        assert!(!status.has_errors());
        assert!(status.is_valid());

        status.apply_success(
            ErrorMap::new().with("email", &["Taken."]),
            Duration::from_millis(500),
        );
        assert!(status.has_errors());
        assert!(!status.is_valid());
        assert!(status.is_errored());

        status.clear_errors();
        assert!(status.errors().is_none());
        assert!(status.is_valid());
    }

    /// `complete` only needs one error-free member, so a half-failing group
    /// is both errored and complete. Kept as observed until product decides
    /// otherwise.
    #[test]
    fn test_group_can_be_errored_and_complete() {
        let mut status = ValidationStatus::default();
        status.apply_success(
            ErrorMap::new().with("b", &["B is wrong."]),
            Duration::from_millis(500),
        );

        let state = status.group_state(&["a", "b"]);
        assert!(state.errored);
        assert!(state.complete);
        assert!(!state.dirty);

        status.mark_dirty(&fields(&["a"]));
        assert!(status.group_state(&["a", "b"]).dirty);
        assert!(!status.group_state(&["b"]).complete);
    }
}
