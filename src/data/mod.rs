//! Upstream data access.
//!
//! - retrying JSON fetch client plus its transport/clock seams (`client`)
//! - members API endpoints and field extraction (`members`)

pub mod client;
pub mod members;

pub use client::{Clock, FetchClient, HttpTransport, RetryPolicy, SystemClock, Transport};
