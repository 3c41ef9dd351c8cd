//! # Webhook notifier.
//!
//! The dispatcher calls a [`Notify`] implementation exactly once per `on_run`,
//! after every observer handled the event. Delivery is best effort: errors and
//! panics are logged and never reach the caller of `dispatch`.
//!
//! [`NotifyFn`] wraps a closure, for hosts that already have an HTTP client at hand.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use labvisor::{Notify, NotifyFn, NotifyError};
//!
//! let hook: Arc<dyn Notify> = NotifyFn::arc(|| {
//!     // POST to the configured webhook URL...
//!     Ok::<(), NotifyError>(())
//! });
//! assert!(hook.notify().is_ok());
//! ```

use std::sync::Arc;

use crate::error::NotifyError;

/// Run-started notification sink.
pub trait Notify: Send + Sync + 'static {
    /// Sends the notification.
    fn notify(&self) -> Result<(), NotifyError>;
}

/// Function-backed notifier.
pub struct NotifyFn<F> {
    f: F,
}

impl<F> NotifyFn<F>
where
    F: Fn() -> Result<(), NotifyError> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the notifier and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> Notify for NotifyFn<F>
where
    F: Fn() -> Result<(), NotifyError> + Send + Sync + 'static,
{
    fn notify(&self) -> Result<(), NotifyError> {
        (self.f)()
    }
}
