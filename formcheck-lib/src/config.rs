//! Coordinator configuration

use std::time::Duration;

/// Steady-state debounce window once the first round has succeeded.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Configuration for a [`ValidationCoordinator`](crate::ValidationCoordinator).
///
/// Controls which fields are tracked, which are validated together, which
/// skip the debounce, and what is sent along with every request.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use formcheck_lib::CoordinatorConfig;
///
/// let config = CoordinatorConfig::default()
///     .with_group(["password", "password_confirmation"])
///     .with_skip(["avatar"])
///     .with_immediate(["email"])
///     .with_header("X-Tenant", "acme")
///     .with_debounce(Duration::from_millis(300));
///
/// assert!(config.is_immediate("email"));
/// assert!(config.is_skipped("avatar"));
/// ```
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Sets of fields that are always marked and validated together.
    pub groups: Vec<Vec<String>>,

    /// Fields that are never tracked.
    pub skip: Vec<String>,

    /// Fields whose changes are sent without waiting for the debounce window.
    pub immediate: Vec<String>,

    /// Extra headers merged into every request.
    pub headers: Vec<(String, String)>,

    /// Debounce window once the coordinator is initiated.
    ///
    /// Default: 500 ms
    pub debounce: Duration,

    /// Whether [`watch`](crate::ValidationCoordinator::watch) validates every
    /// tracked field as soon as it starts.
    ///
    /// Default: `true`
    pub validate_on_watch: bool,

    /// Per-request timeout. `None` leaves it to the HTTP client.
    ///
    /// Default: `None`
    pub request_timeout: Option<Duration>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            skip: Vec::new(),
            immediate: Vec::new(),
            headers: Vec::new(),
            debounce: DEFAULT_DEBOUNCE,
            validate_on_watch: true,
            request_timeout: None,
        }
    }
}

impl CoordinatorConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group of fields validated together.
    pub fn with_group<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.push(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Adds fields excluded from tracking.
    pub fn with_skip<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Adds fields that bypass the debounce window.
    pub fn with_immediate<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.immediate.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the steady-state debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Enables or disables the initial round when watching starts.
    pub fn with_validate_on_watch(mut self, enabled: bool) -> Self {
        self.validate_on_watch = enabled;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Returns `true` if the field is excluded from tracking.
    pub fn is_skipped(&self, field: &str) -> bool {
        self.skip.iter().any(|f| f == field)
    }

    /// Returns `true` if the field bypasses the debounce window.
    pub fn is_immediate(&self, field: &str) -> bool {
        self.immediate.iter().any(|f| f == field)
    }
}
