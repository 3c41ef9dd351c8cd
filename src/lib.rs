//! # labvisor
//!
//! **Labvisor** is the lifecycle core of an experiment-tracking client.
//!
//! It routes the events of a training run (init, run start, metric/column
//! creation, logging, stop) to a set of pluggable observers, and samples
//! runtime telemetry on an adaptive schedule. Storage backends, cloud sync and
//! console reporting are all observers; the crate itself never does I/O on
//! their behalf.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                  host (training script / SDK)
//!                  │                         │
//!                  │ on_init/on_run/...      │ Sampler::spawn(probe, cadence)
//!                  ▼                         ▼
//! ┌───────────────────────────────┐   ┌──────────────────────────────┐
//! │  Dispatcher                   │   │  Sampler (tokio task)        │
//! │  - Registry (ordered, unique) │   │  - fire immediately          │
//! │  - Config (failure policy)    │   │  - Cadence: 10s → 30s → 60s  │
//! │  - Notify (on_run webhook)    │   │  - cancel(): token + join    │
//! └──────┬────────────────────────┘   └──────────────┬───────────────┘
//!        │ sequential, registration order            │ probe.sample()
//!        ▼                                           ▼
//!   ┌─────────┐ ┌─────────┐ ┌───────────┐      (probe may dispatch
//!   │  store  │ │  cloud  │ │ LogWriter │       on_runtime_info_update)
//!   └─────────┘ └─────────┘ └───────────┘
//!        │           │            │
//!        └───────────┴────────────┴──► Fanout { results, failures }
//! ```
//!
//! ### Lifecycle
//! ```text
//! register(store) ─► register(cloud) ─► on_init ─► before_run ─► before_init_experiment
//!    ─► on_run (+ webhook) ─► { on_column_create | on_metric_create | on_log | on_runtime_info_update }*
//!    ─► on_stop ─► registry cleared, is_disabled() == true
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                        |
//! |-------------------|-----------------------------------------------------------------|-------------------------------------------|
//! | **Observer API**  | Hook into run lifecycle events (storage, sync, reporting).      | [`Observer`], [`HookOutput`]              |
//! | **Dispatch**      | Ordered fan-out, result collection, terminal stop.              | [`Dispatcher`], [`Fanout`], [`parse_result`] |
//! | **Sampling**      | Adaptive periodic telemetry with join-style cancellation.       | [`Sampler`], [`Probe`], [`Cadence`]       |
//! | **Run state**     | Wire-stable run status codes.                                   | [`RunState`]                              |
//! | **Metadata**      | Host, process and git facts for `on_runtime_info_update`.       | [`RuntimeInfo`]                           |
//! | **Errors**        | Typed errors for registration, dispatch and sampling.           | [`RegisterError`], [`DispatchError`]      |
//! | **Configuration** | Centralize run settings.                                        | [`Config`], [`LogLevel`]                  |
//!
//! ## Optional features
//! - `logging` (default): exports a built-in console observer [`LogWriter`] that reports through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use labvisor::{Cadence, Config, Dispatcher, MetricInfo, ProbeError, ProbeFn, ProbeRef, Sampler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!
//!     // Build observers (optional)
//!     #[cfg(feature = "logging")]
//!     let observers: Vec<Arc<dyn labvisor::Observer>> = vec![Arc::new(labvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let observers: Vec<Arc<dyn labvisor::Observer>> = Vec::new();
//!
//!     let mut dispatcher = Dispatcher::builder(cfg.clone())
//!         .with_observers(observers)
//!         .build()?;
//!
//!     dispatcher.on_init("mnist", "lab", None)?;
//!     dispatcher.on_run()?;
//!
//!     // Sample telemetry in the background while training
//!     let probe: ProbeRef = ProbeFn::arc("runtime", || async { Ok::<_, ProbeError>(()) });
//!     let sampler = Sampler::spawn(probe, cfg.cadence());
//!
//!     dispatcher.on_metric_create(&MetricInfo::scalar("loss", 0, 0.93))?;
//!
//!     sampler.cancel().await;
//!     dispatcher.on_stop(None, None)?;
//!     assert!(dispatcher.is_disabled());
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod metadata;
mod notify;
mod observers;
mod policies;
mod sampler;
mod state;

// ---- Public re-exports ----

pub use core::{
    Config, DISPATCHER_NAME, Dispatcher, DispatcherBuilder, Fanout, LogLevel, Results,
    parse_result,
};
pub use error::{DispatchError, NotifyError, ObserverError, ProbeError, RegisterError};
pub use events::{ColorPair, ColumnInfo, ColumnKind, Event, Hook, LogRecord, MetricInfo};
pub use metadata::{MASK, RuntimeInfo, parse_git_url};
pub use notify::{Notify, NotifyFn};
pub use observers::{HookOutput, Observer};
pub use policies::{Cadence, FailurePolicy, MEDIUM_AFTER, SLOW_AFTER};
pub use sampler::{Probe, ProbeFn, ProbeRef, Sampler};
pub use state::{RunState, UnknownRunState};

// Optional: expose the built-in console observer.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use observers::LogWriter;
