//! # Dispatcher: fans lifecycle events out to registered observers.
//!
//! The [`Dispatcher`] owns the observer [`Registry`], the webhook notifier and the
//! run [`Config`]. The host drives it through the run lifecycle; every event is
//! delivered synchronously, on the caller's thread, to each observer in
//! registration order.
//!
//! ## High-level architecture
//! ```text
//! host ── dispatch(&Event) ──► Dispatcher
//!                                 │
//!                                 ├─► for (name, observer) in registry (registration order)
//!                                 │       deliver(observer, event)
//!                                 │         ├─ Ok(value) ─► Fanout.results[name] = value
//!                                 │         └─ Err(e)    ─► Abort:   return Err(DispatchError::Observer)
//!                                 │                         Isolate: Fanout.failures[name] = e, continue
//!                                 │
//!                                 ├─► on_run:  notifier.notify() once (errors/panics logged, swallowed;
//!                                 │            skipped once stopped)
//!                                 └─► on_stop: registry.clear()  → is_disabled() == true, forever
//!                                              (also when an observer panics and the panic propagates)
//! ```
//!
//! ## Rules
//! - Fan-out is strictly sequential; a slow observer delays the ones after it.
//! - `on_stop` is terminal: the registry is cleared even when an observer failed,
//!   and later dispatches return an empty [`Fanout`].
//! - The dispatcher never locks; share it behind a `Mutex` if several threads dispatch.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use labvisor::{Config, Dispatcher, HookOutput, Observer};
//! use serde_json::Value;
//!
//! struct Store;
//! impl Observer for Store {
//!     fn name(&self) -> &str { "store" }
//!     fn on_init(&self, project: &str, _ws: &str, _dir: Option<&std::path::Path>) -> HookOutput {
//!         Ok(Some(Value::from(format!("{project}/run-1"))))
//!     }
//! }
//!
//! let mut dispatcher = Dispatcher::new(Config::default());
//! dispatcher.register(Arc::new(Store)).unwrap();
//!
//! let fanout = dispatcher.on_init("mnist", "lab", None).unwrap();
//! assert_eq!(fanout.first(), Some(&Value::from("mnist/run-1")));
//!
//! dispatcher.on_stop(None, None).unwrap();
//! assert!(dispatcher.is_disabled());
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use super::builder::DispatcherBuilder;
use super::config::Config;
use super::fanout::{Fanout, Results, parse_result};
use super::registry::Registry;
use crate::error::{DispatchError, ObserverError, RegisterError, panic_message};
use crate::events::{ColorPair, ColumnInfo, Event, Hook, LogRecord, MetricInfo};
use crate::metadata::RuntimeInfo;
use crate::notify::Notify;
use crate::observers::{HookOutput, Observer, deliver};
use crate::policies::FailurePolicy;

/// Identity reserved for the dispatcher; no observer may use it.
pub const DISPATCHER_NAME: &str = "RunDispatcher";

/// Run lifecycle dispatcher.
pub struct Dispatcher {
    cfg: Config,
    registry: Registry,
    notifier: Option<Arc<dyn Notify>>,
    stopped: bool,
}

impl Dispatcher {
    /// Creates a dispatcher with no observers and no notifier.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            registry: Registry::new(DISPATCHER_NAME),
            notifier: None,
            stopped: false,
        }
    }

    /// Returns a builder for wiring observers and a notifier up front.
    pub fn builder(cfg: Config) -> DispatcherBuilder {
        DispatcherBuilder::new(cfg)
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Adds an observer at the end of the dispatch order.
    ///
    /// Fails with [`RegisterError::Duplicate`] if the identity is taken and with
    /// [`RegisterError::Reserved`] for [`DISPATCHER_NAME`]; the registry is unchanged on error.
    pub fn register(&mut self, observer: Arc<dyn Observer>) -> Result<(), RegisterError> {
        self.registry.insert(observer)?;
        tracing::debug!(observers = ?self.registry.names(), "observer registered");
        Ok(())
    }

    /// Installs the notifier called on `on_run`, replacing any previous one.
    pub fn set_notifier(&mut self, notifier: Arc<dyn Notify>) {
        self.notifier = Some(notifier);
    }

    /// True iff no observer is registered (always true after `on_stop`).
    pub fn is_disabled(&self) -> bool {
        self.registry.is_empty()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.registry.len()
    }

    /// Observer identities in dispatch order.
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Delivers `event` to every observer and collects their return values.
    ///
    /// Under [`FailurePolicy::Abort`] the first failing observer stops the fan-out and its
    /// error is returned. `on_run` and `on_stop` carry the side effects described in the
    /// module docs.
    pub fn dispatch(&mut self, event: &Event<'_>) -> Result<Fanout, DispatchError> {
        let hook = event.hook();
        tracing::trace!(hook = hook.as_str(), observers = self.registry.len(), "dispatch");

        let outcome = match catch_unwind(AssertUnwindSafe(|| self.fan_out(event))) {
            Ok(outcome) => outcome,
            Err(panic) => {
                if hook == Hook::OnStop {
                    self.stop();
                }
                resume_unwind(panic);
            }
        };

        match hook {
            Hook::OnRun if outcome.is_ok() && !self.stopped => self.notify(),
            Hook::OnStop => self.stop(),
            _ => {}
        }
        outcome
    }

    fn stop(&mut self) {
        self.registry.clear();
        self.stopped = true;
        tracing::debug!("run stopped; observers released");
    }

    /// Picks a value out of a result mapping; see [`parse_result`].
    pub fn parse_result<'a>(
        results: &'a Results,
        key: Option<&str>,
    ) -> Result<Option<&'a Value>, DispatchError> {
        parse_result(results, key)
    }

    fn fan_out(&self, event: &Event<'_>) -> Result<Fanout, DispatchError> {
        let hook = event.hook();
        let mut fanout = Fanout::default();

        for (name, observer) in self.registry.iter() {
            match self.cfg.failure {
                FailurePolicy::Abort => {
                    let value = deliver(observer.as_ref(), event).map_err(|source| {
                        DispatchError::Observer {
                            observer: name.to_string(),
                            hook: hook.as_str(),
                            source,
                        }
                    })?;
                    fanout.record(name, value);
                }
                FailurePolicy::Isolate => match deliver_guarded(observer.as_ref(), event) {
                    Ok(value) => fanout.record(name, value),
                    Err(err) => {
                        tracing::warn!(
                            observer = name,
                            hook = hook.as_str(),
                            label = err.as_label(),
                            error = %err,
                            "observer failed; continuing fan-out"
                        );
                        fanout.record_failure(name, err);
                    }
                },
            }
        }
        Ok(fanout)
    }

    fn notify(&self) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        match catch_unwind(AssertUnwindSafe(|| notifier.notify())) {
            Ok(Ok(())) => tracing::debug!("run webhook delivered"),
            Ok(Err(err)) => {
                tracing::warn!(label = err.as_label(), error = %err, "run webhook failed")
            }
            Err(panic) => tracing::warn!(
                info = %panic_message(panic.as_ref()),
                "run webhook panicked"
            ),
        }
    }

    // ---------------------------
    // Named hooks
    // ---------------------------

    pub fn on_init(
        &mut self,
        project: &str,
        workspace: &str,
        logdir: Option<&Path>,
    ) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::Init {
            project,
            workspace,
            logdir,
        })
    }

    pub fn before_run(&mut self) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::BeforeRun)
    }

    pub fn before_init_experiment(
        &mut self,
        run_id: &str,
        experiment_name: &str,
        description: Option<&str>,
        colors: &ColorPair,
    ) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::BeforeInitExperiment {
            run_id,
            experiment_name,
            description,
            colors,
        })
    }

    pub fn on_run(&mut self) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::Run)
    }

    pub fn on_runtime_info_update(&mut self, info: &RuntimeInfo) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::RuntimeInfoUpdate(info))
    }

    pub fn on_log(&mut self, record: &LogRecord) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::Log(record))
    }

    pub fn on_metric_create(&mut self, metric: &MetricInfo) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::MetricCreate(metric))
    }

    pub fn on_column_create(&mut self, column: &ColumnInfo) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::ColumnCreate(column))
    }

    pub fn on_stop(
        &mut self,
        error: Option<&str>,
        epoch: Option<u64>,
    ) -> Result<Fanout, DispatchError> {
        self.dispatch(&Event::Stop { error, epoch })
    }
}

/// Delivers inside an error boundary: panics become [`ObserverError::Panicked`].
fn deliver_guarded(observer: &dyn Observer, event: &Event<'_>) -> HookOutput {
    catch_unwind(AssertUnwindSafe(|| deliver(observer, event))).unwrap_or_else(|panic| {
        Err(ObserverError::Panicked {
            info: panic_message(panic.as_ref()),
        })
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::NotifyError;
    use crate::notify::NotifyFn;

    type Journal = Arc<Mutex<Vec<String>>>;

    /// Records every hook it sees as `name:hook`.
    struct Recorder {
        name: &'static str,
        journal: Journal,
        answer: Option<Value>,
        fail_on: Option<Hook>,
        panic_on: Option<Hook>,
    }

    impl Recorder {
        fn new(name: &'static str, journal: &Journal) -> Self {
            Self {
                name,
                journal: Arc::clone(journal),
                answer: None,
                fail_on: None,
                panic_on: None,
            }
        }

        fn answering(mut self, v: impl Into<Value>) -> Self {
            self.answer = Some(v.into());
            self
        }

        fn failing_on(mut self, hook: Hook) -> Self {
            self.fail_on = Some(hook);
            self
        }

        fn panicking_on(mut self, hook: Hook) -> Self {
            self.panic_on = Some(hook);
            self
        }

        fn seen(&self, hook: Hook) -> HookOutput {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, hook));
            if self.panic_on == Some(hook) {
                panic!("{} exploded", self.name);
            }
            if self.fail_on == Some(hook) {
                return Err(ObserverError::fail(format!("{} refused", self.name)));
            }
            Ok(self.answer.clone())
        }
    }

    impl Observer for Recorder {
        fn name(&self) -> &str {
            self.name
        }
        fn on_init(&self, _p: &str, _w: &str, _l: Option<&Path>) -> HookOutput {
            self.seen(Hook::OnInit)
        }
        fn on_run(&self) -> HookOutput {
            self.seen(Hook::OnRun)
        }
        fn on_metric_create(&self, _m: &MetricInfo) -> HookOutput {
            self.seen(Hook::OnMetricCreate)
        }
        fn on_stop(&self, _e: Option<&str>, _epoch: Option<u64>) -> HookOutput {
            self.seen(Hook::OnStop)
        }
    }

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(j: &Journal) -> Vec<String> {
        j.lock().unwrap().clone()
    }

    fn isolating() -> Config {
        Config {
            failure: FailurePolicy::Isolate,
            ..Config::default()
        }
    }

    #[test]
    fn store_then_cloud_lifecycle() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j))).unwrap();
        d.register(Arc::new(Recorder::new("cloud", &j))).unwrap();

        let fanout = d.on_init("proj", "ws", None).unwrap();
        assert_eq!(entries(&j), ["store:on_init", "cloud:on_init"]);
        let keys: Vec<&str> = fanout.results().keys().map(String::as_str).collect();
        assert_eq!(keys, ["store", "cloud"]);

        d.on_stop(None, None).unwrap();
        assert!(d.is_disabled());
        assert_eq!(d.observer_count(), 0);
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j))).unwrap();
        let err = d.register(Arc::new(Recorder::new("store", &j))).unwrap_err();
        assert_eq!(err, RegisterError::Duplicate { name: "store".into() });
        assert_eq!(d.observer_count(), 1);
    }

    #[test]
    fn dispatcher_identity_is_reserved() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        let err = d
            .register(Arc::new(Recorder::new(DISPATCHER_NAME, &j)))
            .unwrap_err();
        assert_eq!(err.as_label(), "register_reserved");
        assert!(d.is_disabled());
    }

    #[test]
    fn every_observer_called_once_in_order() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        let names = ["a", "b", "c", "d", "e"];
        for name in names {
            d.register(Arc::new(Recorder::new(name, &j))).unwrap();
        }
        let fanout = d.on_metric_create(&MetricInfo::scalar("loss", 1, 0.5)).unwrap();

        let expected: Vec<String> = names.iter().map(|n| format!("{n}:on_metric_create")).collect();
        assert_eq!(entries(&j), expected);
        assert_eq!(fanout.results().len(), names.len());
        assert_eq!(d.names(), names);
    }

    #[test]
    fn first_non_null_answer() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("a", &j))).unwrap();
        d.register(Arc::new(Recorder::new("b", &j).answering("x"))).unwrap();
        d.register(Arc::new(Recorder::new("c", &j).answering("y"))).unwrap();

        let fanout = d.on_init("p", "w", None).unwrap();
        assert_eq!(fanout.first(), Some(&Value::from("x")));
        assert_eq!(
            Dispatcher::parse_result(fanout.results(), Some("c")),
            Ok(Some(&Value::from("y")))
        );
    }

    #[test]
    fn abort_stops_remaining_observers() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j))).unwrap();
        d.register(Arc::new(Recorder::new("cloud", &j).failing_on(Hook::OnInit)))
            .unwrap();
        d.register(Arc::new(Recorder::new("console", &j))).unwrap();

        let err = d.on_init("p", "w", None).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Observer {
                observer: "cloud".into(),
                hook: "on_init",
                source: ObserverError::fail("cloud refused"),
            }
        );
        assert_eq!(entries(&j), ["store:on_init", "cloud:on_init"]);
        assert!(!d.is_disabled());
    }

    #[test]
    fn isolate_records_failures_and_continues() {
        let j = journal();
        let mut d = Dispatcher::new(isolating());
        d.register(Arc::new(Recorder::new("store", &j))).unwrap();
        d.register(Arc::new(Recorder::new("cloud", &j).failing_on(Hook::OnInit)))
            .unwrap();
        d.register(Arc::new(Recorder::new("console", &j).panicking_on(Hook::OnInit)))
            .unwrap();
        d.register(Arc::new(Recorder::new("last", &j).answering(1))).unwrap();

        let fanout = d.on_init("p", "w", None).unwrap();
        assert_eq!(entries(&j).len(), 4);
        assert_eq!(fanout.results().len(), 2);
        assert_eq!(
            fanout.failures().get("cloud"),
            Some(&ObserverError::fail("cloud refused"))
        );
        assert!(matches!(
            fanout.failures().get("console"),
            Some(ObserverError::Panicked { info }) if info == "console exploded"
        ));
        assert_eq!(fanout.first(), Some(&Value::from(1)));
    }

    #[test]
    fn stop_is_terminal() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j))).unwrap();
        let fanout = d.on_stop(Some("oom"), Some(3)).unwrap();
        assert_eq!(fanout.results().len(), 1);
        assert!(d.is_disabled());

        let after = d.on_init("p", "w", None).unwrap();
        assert!(after.is_empty());
        assert_eq!(entries(&j), ["store:on_stop"]);
    }

    #[test]
    fn stop_clears_even_when_an_observer_fails() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j).failing_on(Hook::OnStop)))
            .unwrap();
        assert!(d.on_stop(None, None).is_err());
        assert!(d.is_disabled());
    }

    #[test]
    fn run_notifies_once_after_fanout() {
        let j = journal();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let jn = Arc::clone(&j);

        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j))).unwrap();
        d.set_notifier(NotifyFn::arc(move || {
            jn.lock().unwrap().push("webhook".into());
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        d.on_run().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(entries(&j), ["store:on_run", "webhook"]);

        d.on_init("p", "w", None).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notifier_failures_are_swallowed() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j).answering("ok")))
            .unwrap();

        d.set_notifier(NotifyFn::arc(|| {
            Err(NotifyError::Fail {
                error: "503".into(),
            })
        }));
        let fanout = d.on_run().unwrap();
        assert_eq!(fanout.first(), Some(&Value::from("ok")));

        d.set_notifier(NotifyFn::arc(|| -> Result<(), NotifyError> { panic!("dns") }));
        let fanout = d.on_run().unwrap();
        assert_eq!(fanout.results().len(), 1);
        assert_eq!(d.observer_count(), 1);
    }

    #[test]
    fn aborted_run_skips_notifier() {
        let j = journal();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j).failing_on(Hook::OnRun)))
            .unwrap();
        d.set_notifier(NotifyFn::arc(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        assert!(d.on_run().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stop_clears_even_when_an_observer_panics() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j).panicking_on(Hook::OnStop)))
            .unwrap();
        d.register(Arc::new(Recorder::new("cloud", &j))).unwrap();

        let res = catch_unwind(AssertUnwindSafe(|| d.on_stop(None, None)));
        assert!(res.is_err());
        assert!(d.is_disabled());
        assert_eq!(entries(&j), ["store:on_stop"]);
    }

    #[test]
    fn panic_outside_stop_keeps_observers() {
        let j = journal();
        let mut d = Dispatcher::new(Config::default());
        d.register(Arc::new(Recorder::new("store", &j).panicking_on(Hook::OnInit)))
            .unwrap();

        let res = catch_unwind(AssertUnwindSafe(|| d.on_init("p", "w", None)));
        assert!(res.is_err());
        assert_eq!(d.observer_count(), 1);
    }

    #[test]
    fn run_after_stop_skips_notifier() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut d = Dispatcher::new(Config::default());
        d.set_notifier(NotifyFn::arc(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        d.on_stop(None, None).unwrap();

        let fanout = d.on_run().unwrap();
        assert!(fanout.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
