//! Dispatcher core: configuration, registry and fan-out.
//!
//! Public API from this module is [`Dispatcher`] (with its builder), [`Config`],
//! and the [`Fanout`] result types.
//!
//! Internal modules:
//! - [`dispatcher`]: sequential fan-out, webhook trigger, terminal `on_stop`;
//! - [`registry`]: insertion-ordered observer set keyed by identity;
//! - [`fanout`]: per-observer results and `parse_result`;
//! - [`builder`]: up-front wiring of observers and notifier;
//! - [`config`]: run settings.

mod builder;
mod config;
mod dispatcher;
mod fanout;
mod registry;

pub use builder::DispatcherBuilder;
pub use config::{Config, LogLevel};
pub use dispatcher::{DISPATCHER_NAME, Dispatcher};
pub use fanout::{Fanout, Results, parse_result};
