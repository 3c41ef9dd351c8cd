//! # Sampler: adaptive periodic telemetry collection.
//!
//! Runs one [`Probe`] on a background tokio task:
//! - first firing immediately,
//! - next firing after [`Cadence::next`] of the number of completed firings,
//! - cooperative cancellation via [`CancellationToken`].
//!
//! ## Architecture
//! ```text
//! Sampler::spawn(probe, cadence)
//!     └─► tokio::spawn(run)
//!
//! loop {
//!   ├─► wait(delay)            (delay = 0 on the first pass; cancellable)
//!   ├─► fire: probe.sample()   (never interrupted; Err/panic logged)
//!   ├─► count += 1
//!   └─► delay = cadence.next(count)
//! }
//!
//! cancel().await ─► token.cancel() ─► join()   (waits out an in-flight firing)
//! ```
//!
//! ## Rules
//! - Firings run **sequentially** (never concurrent with each other)
//! - Cancellation is honoured at the **wait point** only; a started firing completes
//! - After `cancel()` returns the probe is never invoked again
//! - A failing or panicking probe does **not** stop the schedule
//! - Dropping a `Sampler` cancels its schedule without waiting; the task never pins the process

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::FutureExt;
use tokio::{select, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use super::probe::ProbeRef;
use crate::error::{ProbeError, panic_message};
use crate::policies::Cadence;

/// Handle to a running sampling schedule.
pub struct Sampler {
    name: String,
    cadence: Cadence,
    count: Arc<AtomicU64>,
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl Sampler {
    /// Starts sampling `probe` with the given cadence.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(probe: ProbeRef, cadence: Cadence) -> Self {
        let name = probe.name().to_string();
        let count = Arc::new(AtomicU64::new(0));
        let token = CancellationToken::new();

        let join = tokio::spawn(run(probe, cadence, Arc::clone(&count), token.clone()));
        tracing::debug!(probe = %name, ?cadence, "sampler started");

        Self {
            name,
            cadence,
            count,
            token,
            join: Some(join),
        }
    }

    /// Number of completed firings.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Name of the probe being sampled.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stops the schedule and waits for an in-flight firing to finish.
    pub async fn cancel(mut self) {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            if let Err(err) = join.await {
                tracing::warn!(probe = %self.name, error = %err, "sampler task ended abnormally");
            }
        }
        tracing::debug!(probe = %self.name, firings = self.count(), "sampler cancelled");
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run(probe: ProbeRef, cadence: Cadence, count: Arc<AtomicU64>, token: CancellationToken) {
    let mut delay = Duration::ZERO;

    loop {
        let sleep = time::sleep(delay);
        tokio::pin!(sleep);
        select! {
            biased;
            _ = token.cancelled() => break,
            _ = &mut sleep => {}
        }

        if let Err(err) = fire(&probe).await {
            tracing::warn!(
                probe = probe.name(),
                label = err.as_label(),
                error = %err,
                "sampling failed; keeping schedule"
            );
        }

        let fired = count.fetch_add(1, Ordering::AcqRel) + 1;
        delay = cadence.next(fired);
        tracing::trace!(probe = probe.name(), fired, ?delay, "next sample scheduled");
    }
}

/// One firing; panics are converted to [`ProbeError::Panicked`].
async fn fire(probe: &ProbeRef) -> Result<(), ProbeError> {
    match std::panic::AssertUnwindSafe(probe.sample()).catch_unwind().await {
        Ok(res) => res,
        Err(panic) => Err(ProbeError::Panicked {
            info: panic_message(panic.as_ref()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    use super::*;
    use crate::sampler::ProbeFn;

    fn counting(calls: &Arc<AtomicUsize>) -> ProbeRef {
        let calls = Arc::clone(calls);
        ProbeFn::arc("counting", move || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<(), ProbeError>(())
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = Sampler::spawn(counting(&calls), Cadence::Adaptive);
        time::sleep(Duration::from_millis(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sampler.count(), 1);
        sampler.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn adaptive_cadence_slows_down() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = Sampler::spawn(counting(&calls), Cadence::Adaptive);

        // t = 0, 10, ..., 90 → ten firings, then the gap grows to 30s.
        time::sleep(Duration::from_secs(95)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 10);

        time::sleep(Duration::from_secs(20)).await; // t = 115
        assert_eq!(calls.load(Ordering::SeqCst), 10);

        time::sleep(Duration::from_secs(10)).await; // t = 125, fired at 120
        assert_eq!(calls.load(Ordering::SeqCst), 11);

        sampler.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_override_ignores_count() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = Sampler::spawn(
            counting(&calls),
            Cadence::Fixed(Duration::from_secs(5)),
        );
        time::sleep(Duration::from_secs(12)).await; // t = 0, 5, 10
        assert_eq!(sampler.count(), 3);
        sampler.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_right_after_spawn_stops_everything() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = Sampler::spawn(counting(&calls), Cadence::Adaptive);
        sampler.cancel().await;

        let after_cancel = calls.load(Ordering::SeqCst);
        assert!(after_cancel <= 1);
        time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_cancel);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_several_firings_freezes_count() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = Sampler::spawn(counting(&calls), Cadence::Adaptive);

        time::sleep(Duration::from_secs(35)).await; // t = 0, 10, 20, 30
        let before = sampler.count();
        assert_eq!(before, 4);
        sampler.cancel().await;

        time::sleep(Duration::from_secs(3_600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), before as usize);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_fixed_interval_is_clamped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = Sampler::spawn(counting(&calls), Cadence::Fixed(Duration::ZERO));

        // t = 0, 100ms, ..., 900ms
        time::sleep(Duration::from_millis(950)).await;
        assert_eq!(sampler.count(), 10);
        sampler.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_waits_for_in_flight_firing() {
        let started = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));

        let probe: ProbeRef = ProbeFn::arc("slow", move || {
            let (s, f) = (Arc::clone(&s), Arc::clone(&f));
            async move {
                s.store(true, Ordering::SeqCst);
                time::sleep(Duration::from_secs(5)).await;
                f.store(true, Ordering::SeqCst);
                Ok::<(), ProbeError>(())
            }
        });
        let sampler = Sampler::spawn(probe, Cadence::Adaptive);

        while !started.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        assert!(!finished.load(Ordering::SeqCst));

        sampler.cancel().await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn failures_keep_the_schedule() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let probe: ProbeRef = ProbeFn::arc("flaky", move || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n % 2 == 0 {
                    Err::<(), _>(ProbeError::fail("sensor offline"))
                } else {
                    panic!("driver crashed")
                }
            }
        });
        let sampler = Sampler::spawn(probe, Cadence::Adaptive);

        time::sleep(Duration::from_secs(35)).await; // t = 0, 10, 20, 30
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(sampler.count(), 4);
        sampler.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_schedule() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = Sampler::spawn(counting(&calls), Cadence::Adaptive);
        time::sleep(Duration::from_millis(1)).await;
        drop(sampler);

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    struct Panicky;

    #[async_trait::async_trait]
    impl crate::sampler::Probe for Panicky {
        fn name(&self) -> &str {
            "panicky"
        }
        async fn sample(&self) -> Result<(), ProbeError> {
            panic!("bad reading")
        }
    }

    #[test]
    fn panic_is_reported_as_probe_error() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let probe: ProbeRef = Arc::new(Panicky);
        let res = rt.block_on(fire(&probe));
        assert_eq!(
            res,
            Err(ProbeError::Panicked {
                info: "bad reading".into()
            })
        );
    }
}
