//! # Example: basic_run
//!
//! Drives one tracked run end to end.
//!
//! Shows how to:
//! - Implement the [`Observer`] trait for a storage and a sync backend.
//! - Wire observers and a webhook [`NotifyFn`] through [`Dispatcher::builder`].
//! - Sample [`RuntimeInfo`] in the background with a [`Sampler`].
//!
//! ## Flow
//! ```text
//! Dispatcher::builder(cfg)
//!     ├─► on_init ──► store answers the run directory
//!     ├─► before_init_experiment ──► cloud answers the experiment id
//!     ├─► on_run ──► webhook
//!     ├─► Sampler ──► probe ──► on_runtime_info_update
//!     ├─► on_column_create / on_metric_create / on_log
//!     └─► sampler.cancel() ──► on_stop ──► is_disabled()
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example basic_run
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use labvisor::{
    ColorPair, ColumnInfo, ColumnKind, Config, Dispatcher, HookOutput, LogRecord, MetricInfo,
    NotifyError, NotifyFn, Observer, ProbeError, ProbeFn, ProbeRef, RunState, RuntimeInfo, Sampler,
};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Pretends to persist payloads on disk and answers the run directory.
struct Store {
    written: AtomicU64,
}

impl Observer for Store {
    fn name(&self) -> &str {
        "store"
    }

    fn on_init(&self, project: &str, workspace: &str, logdir: Option<&Path>) -> HookOutput {
        let root = logdir.unwrap_or(Path::new("./runs"));
        let dir = root.join(workspace).join(project);
        Ok(Some(Value::from(dir.display().to_string())))
    }

    fn on_log(&self, record: &LogRecord) -> HookOutput {
        self.written.fetch_add(record.data.len() as u64, Ordering::Relaxed);
        Ok(None)
    }

    fn on_stop(&self, _error: Option<&str>, _epoch: Option<u64>) -> HookOutput {
        Ok(Some(json!({ "records": self.written.load(Ordering::Relaxed) })))
    }
}

/// Pretends to sync with a remote service and answers the experiment id.
struct Cloud;

impl Observer for Cloud {
    fn name(&self) -> &str {
        "cloud"
    }

    fn before_init_experiment(
        &self,
        run_id: &str,
        experiment_name: &str,
        _description: Option<&str>,
        _colors: &ColorPair,
    ) -> HookOutput {
        Ok(Some(json!({ "exp_id": format!("{experiment_name}-{run_id}") })))
    }

    fn on_runtime_info_update(&self, info: &RuntimeInfo) -> HookOutput {
        println!("[cloud] runtime: host={:?} pid={:?}", info.hostname, info.pid);
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = Config {
        sample_interval: Duration::from_millis(200),
        ..Config::default()
    };

    let observers: Vec<Arc<dyn Observer>> = vec![
        Arc::new(Store {
            written: AtomicU64::new(0),
        }),
        Arc::new(Cloud),
        Arc::new(labvisor::LogWriter::with_level(cfg.log_level)),
    ];

    let dispatcher = Dispatcher::builder(cfg.clone())
        .with_observers(observers)
        .with_notifier(NotifyFn::arc(|| {
            println!("[webhook] run started");
            Ok::<(), NotifyError>(())
        }))
        .build()?;
    let dispatcher = Arc::new(Mutex::new(dispatcher));

    {
        let mut d = dispatcher.lock().map_err(|_| "dispatcher poisoned")?;
        let fanout = d.on_init("mnist", "lab", None)?;
        println!("[host] run dir: {:?}", fanout.get("store")?);

        d.before_run()?;
        let fanout = d.before_init_experiment("run-1", "baseline", None, &ColorPair::default())?;
        println!("[host] experiment: {:?}", fanout.first());
        d.on_run()?;
    }

    let shared = Arc::clone(&dispatcher);
    let probe_cfg = cfg.clone();
    let probe: ProbeRef = ProbeFn::arc("runtime", move || {
        let shared = Arc::clone(&shared);
        let info = RuntimeInfo::collect(&probe_cfg);
        async move {
            let mut d = shared
                .lock()
                .map_err(|_| ProbeError::fail("dispatcher poisoned"))?;
            d.on_runtime_info_update(&info)
                .map_err(|e| ProbeError::fail(e.to_string()))?;
            Ok::<(), ProbeError>(())
        }
    });
    let sampler = Sampler::spawn(probe, cfg.cadence());

    let columns = [
        ColumnInfo::new("train/loss", ColumnKind::Float),
        ColumnInfo::new("train/acc", ColumnKind::Float),
    ];
    for step in 0..5u64 {
        {
            let mut d = dispatcher.lock().map_err(|_| "dispatcher poisoned")?;
            if step == 0 {
                for column in &columns {
                    d.on_column_create(column)?;
                }
            }
            let loss = 1.0 / (step as f64 + 1.0);
            d.on_metric_create(&MetricInfo::scalar("train/loss", step, loss))?;
            d.on_log(
                &LogRecord::new(step)
                    .with("train/loss", loss)
                    .with("train/acc", 1.0 - loss / 2.0),
            )?;
        }
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    println!("[host] samples taken: {}", sampler.count());
    sampler.cancel().await;

    let mut d = dispatcher.lock().map_err(|_| "dispatcher poisoned")?;
    let fanout = d.on_stop(None, Some(5))?;
    println!("[host] store summary: {:?}", fanout.get("store")?);
    println!(
        "[host] state={} disabled={}",
        RunState::Success,
        d.is_disabled()
    );
    Ok(())
}
