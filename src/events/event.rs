//! # Lifecycle hooks and the events that carry them.
//!
//! The [`Hook`] enum names the fixed vocabulary of occasions observers can react to.
//! The [`Event`] enum pairs a hook with its arguments; it borrows its payload
//! from the caller, so building one is free.
//!
//! ## Vocabulary
//! ```text
//! on_init(project, workspace, logdir)
//! before_run()
//! before_init_experiment(run_id, experiment_name, description, colors)
//! on_run()                                   ──► webhook notifier, once
//! on_runtime_info_update(info)
//! on_log(record)
//! on_metric_create(metric)
//! on_column_create(column)
//! on_stop(error, epoch)                      ──► registry cleared
//! ```
//!
//! ## Example
//! ```rust
//! use labvisor::{Event, Hook};
//!
//! let ev = Event::Init { project: "mnist", workspace: "lab", logdir: None };
//! assert_eq!(ev.hook(), Hook::OnInit);
//! assert_eq!(ev.hook().as_str(), "on_init");
//! ```

use std::fmt;
use std::path::Path;

use super::payload::{ColorPair, ColumnInfo, LogRecord, MetricInfo};
use crate::metadata::RuntimeInfo;

/// Named lifecycle occasion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    OnInit,
    BeforeRun,
    BeforeInitExperiment,
    OnRun,
    OnRuntimeInfoUpdate,
    OnLog,
    OnMetricCreate,
    OnColumnCreate,
    OnStop,
}

impl Hook {
    /// Every hook, in lifecycle order.
    pub const ALL: [Hook; 9] = [
        Hook::OnInit,
        Hook::BeforeRun,
        Hook::BeforeInitExperiment,
        Hook::OnRun,
        Hook::OnRuntimeInfoUpdate,
        Hook::OnLog,
        Hook::OnMetricCreate,
        Hook::OnColumnCreate,
        Hook::OnStop,
    ];

    /// Snake_case hook name, stable across releases.
    pub fn as_str(self) -> &'static str {
        match self {
            Hook::OnInit => "on_init",
            Hook::BeforeRun => "before_run",
            Hook::BeforeInitExperiment => "before_init_experiment",
            Hook::OnRun => "on_run",
            Hook::OnRuntimeInfoUpdate => "on_runtime_info_update",
            Hook::OnLog => "on_log",
            Hook::OnMetricCreate => "on_metric_create",
            Hook::OnColumnCreate => "on_column_create",
            Hook::OnStop => "on_stop",
        }
    }

    /// Looks a hook up by its snake_case name.
    pub fn from_name(name: &str) -> Option<Hook> {
        Hook::ALL.into_iter().find(|h| h.as_str() == name)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle hook together with its arguments.
///
/// Each variant maps to one [`Observer`](crate::Observer) method.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// Tracking was initialised for a project.
    Init {
        project: &'a str,
        workspace: &'a str,
        logdir: Option<&'a Path>,
    },
    /// The run is about to start.
    BeforeRun,
    /// The experiment record is about to be created.
    BeforeInitExperiment {
        run_id: &'a str,
        experiment_name: &'a str,
        description: Option<&'a str>,
        colors: &'a ColorPair,
    },
    /// The run has started.
    Run,
    /// Fresh runtime metadata is available.
    RuntimeInfoUpdate(&'a RuntimeInfo),
    /// A batch of scalar values was logged.
    Log(&'a LogRecord),
    /// A metric point was created.
    MetricCreate(&'a MetricInfo),
    /// A new column (chart series) was created.
    ColumnCreate(&'a ColumnInfo),
    /// The run finished; `error` is set when it crashed.
    Stop {
        error: Option<&'a str>,
        epoch: Option<u64>,
    },
}

impl Event<'_> {
    /// The hook this event is dispatched to.
    pub fn hook(&self) -> Hook {
        match self {
            Event::Init { .. } => Hook::OnInit,
            Event::BeforeRun => Hook::BeforeRun,
            Event::BeforeInitExperiment { .. } => Hook::BeforeInitExperiment,
            Event::Run => Hook::OnRun,
            Event::RuntimeInfoUpdate(_) => Hook::OnRuntimeInfoUpdate,
            Event::Log(_) => Hook::OnLog,
            Event::MetricCreate(_) => Hook::OnMetricCreate,
            Event::ColumnCreate(_) => Hook::OnColumnCreate,
            Event::Stop { .. } => Hook::OnStop,
        }
    }
}
