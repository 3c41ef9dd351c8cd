//! # Fan-out results.
//!
//! A dispatch produces one entry per observer, keyed by identity and kept in
//! registration order. [`parse_result`] resolves "the" answer when only one
//! observer is expected to return something meaningful.
//!
//! ```text
//! dispatch(on_init) ──► { store: None, cloud: Some("exp-42"), console: None }
//!                            │
//! parse_result(.., None) ────┴──► Some("exp-42")      (first non-null)
//! parse_result(.., "store") ────► None                (explicit key)
//! parse_result(.., "nope") ─────► Err(UnknownObserver)
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{DispatchError, ObserverError};

/// Per-observer return values, in registration order.
pub type Results = IndexMap<String, Option<Value>>;

/// Outcome of one dispatch.
///
/// `failures` is only populated under [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate);
/// an observer that failed has an entry there and none in `results`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fanout {
    results: Results,
    failures: IndexMap<String, ObserverError>,
}

impl Fanout {
    pub(crate) fn record(&mut self, observer: &str, value: Option<Value>) {
        self.results.insert(observer.to_string(), value);
    }

    pub(crate) fn record_failure(&mut self, observer: &str, error: ObserverError) {
        self.failures.insert(observer.to_string(), error);
    }

    /// Return values keyed by observer identity.
    pub fn results(&self) -> &Results {
        &self.results
    }

    /// Failures keyed by observer identity.
    pub fn failures(&self) -> &IndexMap<String, ObserverError> {
        &self.failures
    }

    /// First non-null value in registration order.
    pub fn first(&self) -> Option<&Value> {
        self.results.values().find_map(Option::as_ref)
    }

    /// Value returned by the observer named `key`.
    pub fn get(&self, key: &str) -> Result<Option<&Value>, DispatchError> {
        parse_result(&self.results, Some(key))
    }

    /// True when no observer ran (e.g. after `on_stop`).
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.failures.is_empty()
    }

    pub fn into_results(self) -> Results {
        self.results
    }
}

/// Picks a value out of a result mapping.
///
/// - With `key`: that observer's value; [`DispatchError::UnknownObserver`] if it has no entry.
/// - Without: the first non-null value in insertion order, or `None`.
///
/// # Example
/// ```rust
/// use labvisor::{Results, parse_result};
/// use serde_json::Value;
///
/// let mut map = Results::new();
/// map.insert("a".into(), None);
/// map.insert("b".into(), Some(Value::from("x")));
/// map.insert("c".into(), Some(Value::from("y")));
///
/// assert_eq!(parse_result(&map, None).unwrap(), Some(&Value::from("x")));
/// assert_eq!(parse_result(&map, Some("c")).unwrap(), Some(&Value::from("y")));
/// assert!(parse_result(&map, Some("d")).is_err());
/// ```
pub fn parse_result<'a>(
    results: &'a Results,
    key: Option<&str>,
) -> Result<Option<&'a Value>, DispatchError> {
    match key {
        Some(key) => results
            .get(key)
            .map(Option::as_ref)
            .ok_or_else(|| DispatchError::UnknownObserver {
                key: key.to_string(),
            }),
        None => Ok(results.values().find_map(Option::as_ref)),
    }
}
