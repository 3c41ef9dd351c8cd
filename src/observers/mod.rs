//! # Lifecycle observers.
//!
//! This module provides the [`Observer`] trait and the built-in console observer.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   host ── dispatch(Event) ──► Dispatcher ──► observers in registration order
//!                                                 │
//!                                            ┌────┴────┬─────────┬───────┐
//!                                            ▼         ▼         ▼       ▼
//!                                          store     cloud   LogWriter  ...
//! ```
//!
//! ## Observer types
//! - **Storage observers** persist payloads (local files, databases)
//! - **Sync observers** forward payloads to a remote service
//! - **Reporting observers** print progress (LogWriter)

#[cfg(feature = "logging")]
mod log;
mod observer;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::{HookOutput, Observer};
pub(crate) use observer::deliver;
