//! # Observer failure policy.
//!
//! [`FailurePolicy`] decides what the dispatcher does when one observer hook fails.
//!
//! - [`FailurePolicy::Abort`] the error stops the fan-out and is returned to the caller (default).
//! - [`FailurePolicy::Isolate`] the error (or panic) is recorded against the observer and the
//!   remaining observers still run.
//!
//! ```text
//! observers: [store, cloud, console]          cloud fails
//!
//! Abort   → store ✓  cloud ✗ ──► Err(DispatchError::Observer{cloud})     console not called
//! Isolate → store ✓  cloud ✗  console ✓ ──► Ok(Fanout{ failures: {cloud} })
//! ```

/// Policy controlling how observer failures affect a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// First failure aborts the fan-out (default).
    #[default]
    Abort,
    /// Failures and panics are collected per observer; fan-out continues.
    Isolate,
}
