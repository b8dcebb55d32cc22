//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the chamber profiles that parameterize fetching and enrichment (`Chamber`, `ChamberProfile`)
//! - the cached roster entry (`RosterRecord`)
//! - per-member enrichment results (`ContactInfo`, `MemberDetails`, `OutputRow`)
//! - display-name normalization (`names`)

pub mod names;
pub mod types;

pub use names::split_name;
pub use types::*;
