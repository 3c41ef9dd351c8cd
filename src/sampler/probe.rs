//! # Sampling probe and function-backed implementation.
//!
//! A [`Probe`] is the telemetry-collection function the [`Sampler`](crate::Sampler)
//! schedules. Its result is only logged; any reporting (e.g. dispatching
//! `on_runtime_info_update`) is the probe's own side effect.
//!
//! [`ProbeFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per firing.
//!
//! ## Example
//! ```rust
//! use labvisor::{ProbeFn, ProbeRef, ProbeError};
//!
//! let p: ProbeRef = ProbeFn::arc("gpu", || async {
//!     // read counters, forward them...
//!     Ok::<_, ProbeError>(())
//! });
//! assert_eq!(p.name(), "gpu");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProbeError;

/// Shared handle to a probe.
pub type ProbeRef = Arc<dyn Probe>;

/// # Telemetry collection step.
///
/// Blocking collectors should hop onto `tokio::task::spawn_blocking` inside `sample`.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// Returns a stable, human-readable probe name (used in logs).
    fn name(&self) -> &str;

    /// Collects one sample.
    async fn sample(&self) -> Result<(), ProbeError>;
}

/// Function-backed probe.
#[derive(Debug)]
pub struct ProbeFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProbeFn<F> {
    /// Creates a new function-backed probe.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the probe and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Probe for ProbeFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProbeError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn sample(&self) -> Result<(), ProbeError> {
        (self.f)().await
    }
}
