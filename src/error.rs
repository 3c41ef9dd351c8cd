//! Error types used by the dispatcher, its observers and the sampler.
//!
//! This module defines the error enums surfaced by labvisor:
//!
//! - [`RegisterError`]: an observer could not join the registry.
//! - [`DispatchError`]: a lifecycle event could not be fanned out, or a result lookup failed.
//! - [`ObserverError`]: raised by an individual observer hook.
//! - [`ProbeError`]: raised by a sampling probe (never escapes the sampler).
//! - [`NotifyError`]: raised by the webhook notifier (always swallowed).
//!
//! Every type provides `as_label` for logs/metrics.

use thiserror::Error;

/// # Errors produced while registering observers.
///
/// Registration errors are reported synchronously and never mutate the registry.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// An observer with the same identity is already registered.
    #[error("observer {name:?} is already registered")]
    Duplicate {
        /// The conflicting identity.
        name: String,
    },

    /// The observer uses the identity reserved for the dispatcher itself.
    #[error("observer identity {name:?} is reserved for the dispatcher")]
    Reserved {
        /// The reserved identity.
        name: String,
    },
}

impl RegisterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use labvisor::RegisterError;
    ///
    /// let err = RegisterError::Duplicate { name: "store".into() };
    /// assert_eq!(err.as_label(), "register_duplicate");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegisterError::Duplicate { .. } => "register_duplicate",
            RegisterError::Reserved { .. } => "register_reserved",
        }
    }
}

/// # Errors raised by an observer hook.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserverError {
    /// The hook reported a failure.
    #[error("observer failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The hook panicked (only observed under [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate)).
    #[error("observer panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ObserverError {
    /// Shorthand for [`ObserverError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ObserverError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ObserverError::Fail { .. } => "observer_failed",
            ObserverError::Panicked { .. } => "observer_panicked",
        }
    }
}

/// # Errors produced by the dispatcher.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// An observer hook failed and aborted the remaining fan-out.
    #[error("observer {observer:?} failed in {hook}: {source}")]
    Observer {
        /// Identity of the failing observer.
        observer: String,
        /// Hook being dispatched.
        hook: &'static str,
        /// What the observer reported.
        #[source]
        source: ObserverError,
    },

    /// A result lookup named an observer that produced no entry.
    #[error("no result recorded for observer {key:?}")]
    UnknownObserver {
        /// The requested identity.
        key: String,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use labvisor::DispatchError;
    ///
    /// let err = DispatchError::UnknownObserver { key: "cloud".into() };
    /// assert_eq!(err.as_label(), "dispatch_unknown_observer");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Observer { .. } => "dispatch_observer_failed",
            DispatchError::UnknownObserver { .. } => "dispatch_unknown_observer",
        }
    }
}

/// # Errors produced by a sampling probe.
///
/// These never reach the host: the sampler logs them and schedules the next firing.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The probe reported a failure.
    #[error("sampling failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The probe panicked.
    #[error("sampling panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ProbeError {
    /// Shorthand for [`ProbeError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ProbeError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProbeError::Fail { .. } => "probe_failed",
            ProbeError::Panicked { .. } => "probe_panicked",
        }
    }
}

/// # Errors produced by the webhook notifier.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Delivery failed.
    #[error("webhook delivery failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl NotifyError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            NotifyError::Fail { .. } => "notify_failed",
        }
    }
}

/// Renders a panic payload caught by `catch_unwind`.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
