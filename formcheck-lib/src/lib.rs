//! Remote form validation coordinator
//!
//! Debounces field changes of a bound form, validates them in groups against
//! a remote endpoint, and exposes per-field and per-group state for the UI to
//! render.

pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod transport;

mod coordinator;

pub use config::CoordinatorConfig;
pub use coordinator::*;
