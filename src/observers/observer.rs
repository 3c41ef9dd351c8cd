//! # Lifecycle observer trait.
//!
//! Provides [`Observer`] an extension point for plugging storage, cloud sync or
//! console reporting into a run.
//!
//! Each observer gets:
//! - **One method per lifecycle hook**, each a no-op returning `Ok(None)` by default
//! - **A stable identity** ([`Observer::name`]) used as its registry key
//! - **Sequential delivery** in registration order, on the caller's thread
//!
//! ## Architecture
//! ```text
//! Dispatcher::dispatch(Event) ──► deliver(observer, event) ──► observer.on_<hook>(args)
//!                                                                   └─► Ok(Some(value)) / Ok(None) / Err
//! ```
//!
//! ## Rules
//! - A slow observer delays every observer registered after it.
//! - Return `Ok(Some(value))` only when the hook produces an answer for the host
//!   (see [`Fanout::first`](crate::Fanout::first)).
//! - Prefer returning `Err` over panicking; panics are only contained under
//!   [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate).
//!
//! ## Example
//! ```rust
//! use labvisor::{HookOutput, MetricInfo, Observer};
//!
//! struct Counter(std::sync::atomic::AtomicU64);
//!
//! impl Observer for Counter {
//!     fn name(&self) -> &str { "counter" }
//!
//!     fn on_metric_create(&self, _metric: &MetricInfo) -> HookOutput {
//!         self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         Ok(None)
//!     }
//! }
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::ObserverError;
use crate::events::{ColorPair, ColumnInfo, Event, LogRecord, MetricInfo};
use crate::metadata::RuntimeInfo;

/// What a single hook invocation produced.
pub type HookOutput = Result<Option<Value>, ObserverError>;

/// Lifecycle observer.
///
/// ### Implementation requirements
/// - Keep hooks short; they run inline in the host's training loop.
/// - Use interior mutability for state; hooks take `&self`.
/// - Identity must be unique among the observers of one dispatcher.
#[allow(unused_variables)]
pub trait Observer: Send + Sync + 'static {
    /// Returns the identity used as registry key, in logs and in results.
    ///
    /// The default uses `type_name::<Self>()`; override it with something short
    /// (e.g. "store", "cloud") and stable.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Tracking was initialised for `project` in `workspace`.
    fn on_init(&self, project: &str, workspace: &str, logdir: Option<&Path>) -> HookOutput {
        Ok(None)
    }

    fn before_run(&self) -> HookOutput {
        Ok(None)
    }

    fn before_init_experiment(
        &self,
        run_id: &str,
        experiment_name: &str,
        description: Option<&str>,
        colors: &ColorPair,
    ) -> HookOutput {
        Ok(None)
    }

    fn on_run(&self) -> HookOutput {
        Ok(None)
    }

    fn on_runtime_info_update(&self, info: &RuntimeInfo) -> HookOutput {
        Ok(None)
    }

    fn on_log(&self, record: &LogRecord) -> HookOutput {
        Ok(None)
    }

    fn on_metric_create(&self, metric: &MetricInfo) -> HookOutput {
        Ok(None)
    }

    fn on_column_create(&self, column: &ColumnInfo) -> HookOutput {
        Ok(None)
    }

    /// The run finished. `error` is set when the run crashed.
    fn on_stop(&self, error: Option<&str>, epoch: Option<u64>) -> HookOutput {
        Ok(None)
    }
}

/// Routes an event to the matching observer method.
pub(crate) fn deliver(observer: &dyn Observer, event: &Event<'_>) -> HookOutput {
    match *event {
        Event::Init {
            project,
            workspace,
            logdir,
        } => observer.on_init(project, workspace, logdir),
        Event::BeforeRun => observer.before_run(),
        Event::BeforeInitExperiment {
            run_id,
            experiment_name,
            description,
            colors,
        } => observer.before_init_experiment(run_id, experiment_name, description, colors),
        Event::Run => observer.on_run(),
        Event::RuntimeInfoUpdate(info) => observer.on_runtime_info_update(info),
        Event::Log(record) => observer.on_log(record),
        Event::MetricCreate(metric) => observer.on_metric_create(metric),
        Event::ColumnCreate(column) => observer.on_column_create(column),
        Event::Stop { error, epoch } => observer.on_stop(error, epoch),
    }
}
