//! Error types

mod build;
mod transport;

pub use build::*;
pub use transport::*;
