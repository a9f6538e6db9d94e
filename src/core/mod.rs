//! Shared data model: discoverable fields and per-file conversion results.

mod error;
mod types;

pub use error::*;
pub use types::*;
