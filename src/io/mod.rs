//! Input/output helpers.
//!
//! - roster snapshot write/read (`snapshot`)
//! - append-per-row enriched output (`output`)

pub mod output;
pub mod snapshot;

pub use output::*;
pub use snapshot::*;
