//! Change-notification loop between a form and its coordinator.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use log::debug;
use log::warn;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::ValidationCoordinator;
use crate::model::ValidationMethod;

/// Keeps a coordinator watching its form. Dropping it stops the watch.
///
/// Only one watch runs per coordinator. Calling
/// [`watch`](super::ValidationCoordinator::watch) while one is active returns
/// an inert guard that owns nothing.
#[derive(Debug)]
pub struct WatchGuard {
    active: Option<ActiveWatch>,
}

#[derive(Debug)]
struct ActiveWatch {
    task: JoinHandle<()>,
    watching: Arc<AtomicBool>,
}

impl WatchGuard {
    /// Stops watching.
    pub fn stop(self) {
        drop(self);
    }

    /// Returns `true` if the loop has exited, or if this guard never owned one.
    pub fn is_finished(&self) -> bool {
        self.active
            .as_ref()
            .is_none_or(|active| active.task.is_finished())
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.task.abort();
            active.watching.store(false, Ordering::Release);
        }
    }
}

pub(super) fn start(coordinator: ValidationCoordinator) -> WatchGuard {
    let watching = Arc::clone(&coordinator.inner.watching);
    if watching.swap(true, Ordering::AcqRel) {
        debug!("Already watching, returning an inert guard");
        return WatchGuard { active: None };
    }

    // Subscribe before the initial round so no change slips through.
    let changes = coordinator.inner.data.subscribe();
    let method = coordinator.inner.method.changes();

    if coordinator.inner.config.validate_on_watch {
        coordinator.touch_all();
    }

    WatchGuard {
        active: Some(ActiveWatch {
            task: tokio::spawn(run(coordinator, changes, method)),
            watching,
        }),
    }
}

async fn run(
    coordinator: ValidationCoordinator,
    mut changes: broadcast::Receiver<String>,
    mut method: Option<watch::Receiver<ValidationMethod>>,
) {
    loop {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(field) => coordinator.on_field_changed(&field),
                Err(RecvError::Lagged(missed)) => {
                    warn!("Missed {} form change(s), revalidating every field", missed);
                    coordinator.touch_all();
                }
                Err(RecvError::Closed) => break,
            },
            changed = method_changed(&mut method) => match changed {
                Ok(()) => {
                    debug!("Validation method changed to {}", coordinator.method());
                    coordinator.touch_all();
                }
                // Sender gone: the method can no longer change.
                Err(_) => method = None,
            },
        }
    }
}

async fn method_changed(
    method: &mut Option<watch::Receiver<ValidationMethod>>,
) -> Result<(), watch::error::RecvError> {
    match method {
        Some(rx) => rx.changed().await,
        None => std::future::pending().await,
    }
}
