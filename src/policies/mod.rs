//! Dispatch and sampling policies.
//!
//! ## Contents
//! - [`FailurePolicy`] what a failing observer does to the rest of the fan-out
//! - [`Cadence`] how long the sampler waits between firings
//!
//! ## Quick wiring
//! ```text
//! Config { failure, sample_interval, .. }
//!      ├─► Dispatcher uses failure to abort or isolate
//!      └─► Sampler uses config.cadence().next(count) to schedule the next firing
//! ```
//!
//! ## Defaults
//! - `FailurePolicy::Abort`.
//! - `Cadence::Adaptive` → 10s, then 30s after 10 firings, then 60s after 50.

mod cadence;
mod failure;

pub use cadence::{Cadence, MEDIUM_AFTER, SLOW_AFTER};
pub use failure::FailurePolicy;
