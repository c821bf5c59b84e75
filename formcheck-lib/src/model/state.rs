//! Derived per-field and per-group state

/// Validation state of a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    /// Messages for the field (prefix match against the error map).
    pub errors: Vec<String>,
    /// Whether a response is still awaited for this field.
    pub is_validating: bool,
    /// Whether a successful round has covered this field since it was tracked.
    pub has_been_validated: bool,
    /// Whether the field holds something other than absent, `null` or `""`.
    pub has_value: bool,
    /// Whether the field changed since the last successful round.
    pub is_dirty: bool,
}

impl FieldState {
    /// Returns `true` if the server reported errors for this field.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Aggregate state of a group of fields.
///
/// `errored` and `complete` can both be `true` for the same group: `complete`
/// only requires one member without errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupState {
    /// At least one member is dirty.
    pub dirty: bool,
    /// At least one member has errors.
    pub errored: bool,
    /// At least one member has no errors.
    pub complete: bool,
}
