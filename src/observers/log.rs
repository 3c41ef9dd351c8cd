//! # LogWriter: console reporting observer
//!
//! A minimal observer that reports the run lifecycle through `tracing`
//! (target `labvisor::console`). Install any `tracing` subscriber to see it.
//!
//! ## Example output
//! ```text
//! INFO labvisor::console: tracking project project="mnist" workspace="lab"
//! INFO labvisor::console: run data will be saved locally logdir="./runs"
//! INFO labvisor::console: view the dashboard locally hint="labvisor watch ./runs"
//! INFO labvisor::console: experiment started experiment="baseline" run_id="r1"
//! INFO labvisor::console: experiment has completed experiment="baseline" epoch=Some(10)
//! INFO labvisor::console: sync logs to the remote server hint="labvisor sync ./runs"
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::core::LogLevel;
use crate::events::{ColorPair, ColumnInfo, MetricInfo};
use crate::observers::{HookOutput, Observer};

const TARGET: &str = "labvisor::console";

#[derive(Default)]
struct Session {
    experiment: Option<String>,
    logdir: Option<PathBuf>,
}

/// Console reporting observer.
#[derive(Default)]
pub struct LogWriter {
    level: LogLevel,
    session: Mutex<Session>,
}

impl LogWriter {
    /// Construct a new [`LogWriter`] reporting at `Info` and above.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a [`LogWriter`] that only reports messages at `level` or above.
    #[must_use]
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            session: Mutex::default(),
        }
    }

    fn enabled(&self, at: LogLevel) -> bool {
        at >= self.level
    }

    fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

impl Observer for LogWriter {
    fn name(&self) -> &str {
        "LogWriter"
    }

    fn on_init(&self, project: &str, workspace: &str, logdir: Option<&Path>) -> HookOutput {
        self.with_session(|s| s.logdir = logdir.map(Path::to_path_buf));
        if self.enabled(LogLevel::Info) {
            tracing::info!(target: TARGET, project, workspace, "tracking project");
            if let Some(dir) = logdir {
                let dir = dir.display().to_string();
                tracing::info!(target: TARGET, logdir = %dir, "run data will be saved locally");
                tracing::info!(
                    target: TARGET,
                    hint = %format!("labvisor watch {dir}"),
                    "view the dashboard locally"
                );
            }
        }
        Ok(None)
    }

    fn before_init_experiment(
        &self,
        run_id: &str,
        experiment_name: &str,
        _description: Option<&str>,
        _colors: &ColorPair,
    ) -> HookOutput {
        self.with_session(|s| s.experiment = Some(experiment_name.to_string()));
        if self.enabled(LogLevel::Info) {
            tracing::info!(
                target: TARGET,
                experiment = experiment_name,
                run_id,
                "experiment started"
            );
        }
        Ok(None)
    }

    fn on_metric_create(&self, metric: &MetricInfo) -> HookOutput {
        if self.enabled(LogLevel::Debug) {
            tracing::debug!(target: TARGET, key = %metric.key, step = metric.step, "metric created");
        }
        Ok(None)
    }

    fn on_column_create(&self, column: &ColumnInfo) -> HookOutput {
        if self.enabled(LogLevel::Debug) {
            tracing::debug!(target: TARGET, key = %column.key, kind = ?column.kind, "column created");
        }
        Ok(None)
    }

    fn on_stop(&self, error: Option<&str>, epoch: Option<u64>) -> HookOutput {
        let (experiment, logdir) =
            self.with_session(|s| (s.experiment.take(), s.logdir.take()));
        let experiment = experiment.unwrap_or_default();

        match error {
            Some(err) if self.enabled(LogLevel::Error) => {
                tracing::error!(target: TARGET, experiment = %experiment, ?epoch, error = err, "experiment crashed");
            }
            None if self.enabled(LogLevel::Info) => {
                tracing::info!(target: TARGET, experiment = %experiment, ?epoch, "experiment has completed");
                if let Some(dir) = logdir {
                    tracing::info!(
                        target: TARGET,
                        hint = %format!("labvisor sync {}", dir.display()),
                        "sync logs to the remote server"
                    );
                }
            }
            _ => {}
        }
        Ok(None)
    }
}
