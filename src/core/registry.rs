//! # Observer registry - insertion-ordered set of observers keyed by identity.
//!
//! ## Rules
//! - Iteration order is registration order, always
//! - Identities are unique; the dispatcher's own identity is reserved
//! - Entries are only ever added one at a time or cleared all at once
//! - A rejected insert leaves the registry untouched

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::RegisterError;
use crate::observers::Observer;

/// Insertion-ordered registry of observers.
pub struct Registry {
    observers: IndexMap<String, Arc<dyn Observer>>,
    reserved: &'static str,
}

impl Registry {
    /// Creates an empty registry that refuses the `reserved` identity.
    pub fn new(reserved: &'static str) -> Self {
        Self {
            observers: IndexMap::new(),
            reserved,
        }
    }

    /// Adds an observer at the end of the dispatch order.
    pub fn insert(&mut self, observer: Arc<dyn Observer>) -> Result<(), RegisterError> {
        let name = observer.name().to_string();
        if name == self.reserved {
            return Err(RegisterError::Reserved { name });
        }
        if self.observers.contains_key(&name) {
            return Err(RegisterError::Duplicate { name });
        }
        self.observers.insert(name, observer);
        Ok(())
    }

    /// Iterates `(identity, observer)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Observer>)> {
        self.observers.iter().map(|(name, obs)| (name.as_str(), obs))
    }

    /// Returns identities in registration order.
    pub fn names(&self) -> Vec<String> {
        self.observers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.observers.clear();
    }
}
