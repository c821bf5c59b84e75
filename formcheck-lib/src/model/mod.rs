//! Typed models

mod error_map;
mod method;
mod state;

pub use error_map::*;
pub use method::*;
pub use state::*;
