//! The validation coordinator.
//!
//! A [`ValidationCoordinator`] watches a [`FormData`], marks changed fields
//! (and their group siblings) dirty, and after a debounce window sends one
//! check-only request carrying the whole form. At most one timer is armed at
//! a time: every change replaces it. A timer that already fired keeps its
//! request in flight, but only the latest scheduled round may apply its
//! answer.
//!
//! Until the first round succeeds the coordinator is *uninitiated*: requests
//! go out without delay and every field reports itself as validating.
//! Afterwards the configured debounce window applies and the pending set is
//! tracked per field.
//!
//! # Example
//!
//! ```ignore
//! use formcheck_lib::{ValidationCoordinator, form::FormData, model::ValidationMethod};
//! use serde_json::json;
//!
//! let form = FormData::from_value(json!({ "name": "", "email": "" }))?;
//! let coordinator = ValidationCoordinator::builder()
//!     .endpoint("https://app.example.com/users/validate")
//!     .data(form.clone())
//!     .immediate(["email"])
//!     .method(ValidationMethod::Post)
//!     .build()?;
//!
//! let _watch = coordinator.watch();
//! form.set("email", "ada@example.com");
//!
//! let mut status = coordinator.subscribe();
//! status.changed().await?;
//! println!("email errors: {:?}", coordinator.errors_for("email"));
//! ```

mod builder;
mod groups;
mod method;
mod status;
mod watch;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use log::debug;
use log::error;
use log::info;
use log::trace;
use reqwest::header::HeaderMap;
use tokio::sync::watch as watch_channel;
use tokio::task::AbortHandle;

use self::groups::FieldGroups;
use crate::config::CoordinatorConfig;
use crate::error::TransportError;
use crate::form::FormData;
use crate::model::ErrorMap;
use crate::model::FieldState;
use crate::model::GroupState;
use crate::model::ValidationMethod;
use crate::transport::ValidationRequest;
use crate::transport::ValidationTransport;

pub use builder::*;
pub use method::MethodSource;
pub use status::ValidationStatus;
pub use watch::WatchGuard;

/// Debounced, grouped, remote field validation for one form.
///
/// Cheap to clone; clones share state. Must be driven from within a Tokio
/// runtime, since each change spawns the debounce timer.
#[derive(Clone)]
pub struct ValidationCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    transport: Arc<dyn ValidationTransport>,
    data: FormData,
    config: CoordinatorConfig,
    groups: FieldGroups,
    headers: HeaderMap,
    method: MethodSource,
    timer: Mutex<TimerSlot>,
    /// Set while a [`WatchGuard`] owns the watch loop.
    watching: Arc<AtomicBool>,
    /// Lock order: `timer` before `status`.
    status: watch_channel::Sender<ValidationStatus>,
}

/// The single debounce timer.
#[derive(Default)]
struct TimerSlot {
    /// Round number of the most recently scheduled timer.
    round: u64,
    /// Set while the latest timer is still waiting to fire.
    armed: Option<AbortHandle>,
}

impl ValidationCoordinator {
    /// Creates a new builder for constructing a coordinator.
    pub fn builder() -> ValidationCoordinatorBuilder<Missing, Missing> {
        ValidationCoordinatorBuilder::new()
    }

    fn from_parts(
        transport: Arc<dyn ValidationTransport>,
        data: FormData,
        config: CoordinatorConfig,
        headers: HeaderMap,
        method: MethodSource,
    ) -> Self {
        let (status, _) = watch_channel::channel(ValidationStatus::default());
        Self {
            inner: Arc::new(CoordinatorInner {
                transport,
                data,
                groups: FieldGroups::new(config.groups.clone()),
                config,
                headers,
                method,
                timer: Mutex::new(TimerSlot::default()),
                watching: Arc::new(AtomicBool::new(false)),
                status,
            }),
        }
    }

    /// Reacts to a change of `field` (or of the validation method).
    ///
    /// Marks the field and its group siblings dirty and replaces the pending
    /// timer. Fields listed as immediate are sent without delay this once;
    /// the stored debounce window is left alone. Skipped fields are ignored.
    pub fn on_field_changed(&self, field: &str) {
        let inner = &self.inner;
        if inner.config.is_skipped(field) {
            debug!("Ignoring change to skipped field '{}'", field);
            return;
        }

        let fields = inner.groups.expand(field);
        let mut timer = inner.lock_timer();

        inner.status.send_modify(|status| status.mark_dirty(&fields));

        if let Some(armed) = timer.armed.take() {
            armed.abort();
        }
        timer.round += 1;
        let round = timer.round;

        let delay = if inner.config.is_immediate(field) {
            Duration::ZERO
        } else {
            inner.status.borrow().debounce_window()
        };
        debug!(
            "Scheduling validation round {} for '{}' in {:?}",
            round, field, delay
        );

        let task_inner = Arc::clone(inner);
        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task_inner.fire(round, fields).await;
        });
        timer.armed = Some(task.abort_handle());
    }

    /// Spawns the change-notification loop for the bound data.
    ///
    /// Unless disabled in the config, every tracked field is validated once
    /// right away. The loop stops when the returned guard is dropped. While a
    /// watch is active, further calls return an inert guard and do nothing.
    pub fn watch(&self) -> WatchGuard {
        watch::start(self.clone())
    }

    /// Fields that changes and method switches apply to: every data key not
    /// listed as skipped.
    pub fn tracked_fields(&self) -> Vec<String> {
        self.inner
            .data
            .keys()
            .into_iter()
            .filter(|field| !self.inner.config.is_skipped(field))
            .collect()
    }

    /// Treats every tracked field as changed, one at a time.
    pub(crate) fn touch_all(&self) {
        for field in self.tracked_fields() {
            self.on_field_changed(&field);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Messages for a field, matched by prefix against the error map.
    pub fn errors_for(&self, field: &str) -> Vec<String> {
        self.inner.status.borrow().errors_for(field).to_vec()
    }

    /// Returns `true` while the field awaits a response; always `true` before
    /// the first successful round.
    pub fn is_validating_field(&self, field: &str) -> bool {
        self.inner.status.borrow().is_validating_field(field)
    }

    /// Aggregated state of one field.
    pub fn field_state(&self, field: &str) -> FieldState {
        let has_value = self.inner.data.has_value(field);
        let status = self.inner.status.borrow();
        FieldState {
            errors: status.errors_for(field).to_vec(),
            is_validating: status.is_validating_field(field),
            has_been_validated: status.has_been_validated(field),
            has_value,
            is_dirty: status.is_field_dirty(field),
        }
    }

    /// Aggregated state of a group of fields.
    pub fn group_state<S: AsRef<str>>(&self, group: &[S]) -> GroupState {
        self.inner.status.borrow().group_state(group)
    }

    /// Returns `true` if the last answer reported any errors.
    pub fn has_errors(&self) -> bool {
        self.inner.status.borrow().has_errors()
    }

    /// Not dirty and no errors.
    pub fn is_valid(&self) -> bool {
        self.inner.status.borrow().is_valid()
    }

    /// Dirty or has errors.
    pub fn is_errored(&self) -> bool {
        self.inner.status.borrow().is_errored()
    }

    /// Returns `true` while any field awaits a response.
    pub fn is_validating(&self) -> bool {
        self.inner.status.borrow().is_validating()
    }

    /// Returns `true` if anything changed since the last successful round.
    pub fn is_dirty(&self) -> bool {
        self.inner.status.borrow().is_dirty()
    }

    /// Fields changed since the last successful round.
    pub fn dirty_fields(&self) -> Vec<String> {
        self.inner.status.borrow().dirty_fields().to_vec()
    }

    /// Fields awaited by an in-flight round.
    pub fn pending_fields(&self) -> Vec<String> {
        self.inner
            .status
            .borrow()
            .pending_fields()
            .map(str::to_string)
            .collect()
    }

    /// The last error map received, if any.
    pub fn errors(&self) -> Option<ErrorMap> {
        self.inner.status.borrow().errors().cloned()
    }

    /// Forgets the last error map.
    pub fn clear_errors(&self) {
        self.inner.status.send_if_modified(|status| {
            let had_errors = status.errors().is_some();
            status.clear_errors();
            had_errors
        });
    }

    /// Returns `true` once a round has succeeded.
    pub fn is_initiated(&self) -> bool {
        self.inner.status.borrow().is_initiated()
    }

    /// Delay applied to the next non-immediate change.
    pub fn debounce_window(&self) -> Duration {
        self.inner.status.borrow().debounce_window()
    }

    /// Method that the next round will be sent with.
    pub fn method(&self) -> ValidationMethod {
        self.inner.method.current()
    }

    /// The bound form data.
    pub fn data(&self) -> &FormData {
        &self.inner.data
    }

    /// A copy of the current state.
    pub fn status(&self) -> ValidationStatus {
        self.inner.status.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch_channel::Receiver<ValidationStatus> {
        self.inner.status.subscribe()
    }
}

impl CoordinatorInner {
    fn lock_timer(&self) -> MutexGuard<'_, TimerSlot> {
        self.timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs when a debounce timer elapses.
    async fn fire(&self, round: u64, fields: Vec<String>) {
        let request = {
            let mut timer = self.lock_timer();
            if timer.round != round {
                // Replaced between waking up and taking the lock.
                return;
            }
            // From here on a new change must not abort the request.
            timer.armed = None;

            self.status.send_if_modified(|status| {
                if !status.is_initiated() {
                    return false;
                }
                status.mark_pending(&fields, round);
                true
            });

            ValidationRequest::new(self.data.snapshot(), self.method.current(), &self.headers)
        };

        debug!("Sending validation round {} ({})", round, request.method);
        let result = self.transport.check(request).await;
        self.complete(round, result);
    }

    fn complete(&self, round: u64, result: Result<ErrorMap, TransportError>) {
        let timer = self.lock_timer();
        let current = timer.round == round;

        match result {
            Ok(errors) if current => {
                debug!(
                    "Validation round {} answered with {} field error(s)",
                    round,
                    errors.len()
                );
                let steady = self.config.debounce;
                self.status.send_modify(|status| {
                    if status.apply_success(errors, steady) {
                        info!("Validation initiated, debounce window is now {:?}", steady);
                    }
                });
            }
            Ok(_) => {
                trace!(
                    "Discarding stale validation round {} (latest is {})",
                    round, timer.round
                );
                self.status
                    .send_if_modified(|status| status.release_pending(round));
            }
            Err(e) => {
                error!("Validation round {} failed: {}", round, e);
                if current {
                    self.status.send_modify(|status| status.clear_pending());
                } else {
                    self.status
                        .send_if_modified(|status| status.release_pending(round));
                }
            }
        }
    }
}
