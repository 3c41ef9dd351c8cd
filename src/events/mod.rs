//! Lifecycle events: hook vocabulary and payloads.
//!
//! ## Contents
//! - [`Hook`], [`Event`] the named occasions and their arguments
//! - [`ColorPair`], [`ColumnInfo`], [`ColumnKind`], [`LogRecord`], [`MetricInfo`] payload data
//!
//! ## Quick reference
//! - **Publisher**: the host, through [`Dispatcher`](crate::Dispatcher).
//! - **Consumers**: every registered [`Observer`](crate::Observer), in registration order.

mod event;
mod payload;

pub use event::{Event, Hook};
pub use payload::{ColorPair, ColumnInfo, ColumnKind, LogRecord, MetricInfo};
