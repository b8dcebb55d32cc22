//! `members-roster` library crate.
//!
//! The binary (`roster`) is a thin wrapper around this library so that the
//! fetch and enrichment pipelines can be driven in tests with a fake transport
//! and a clock that never actually sleeps.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
