//! Periodic telemetry sampling.
//!
//! - [`Probe`] / [`ProbeFn`]: the collection step;
//! - [`Sampler`]: background schedule with adaptive or fixed cadence and join-style cancel.

mod probe;
#[allow(clippy::module_inception)]
mod sampler;

pub use probe::{Probe, ProbeFn, ProbeRef};
pub use sampler::Sampler;
