#![forbid(unsafe_code)]

//! Single-assignment values resolved later.
//!
//! A [`Deferred`] is the bridge between an asynchronous producer (a task on
//! the host's executor, a callback API) and the synchronous stream world.
//! Its stream emits nothing until [`Deferred::resolve`] is called, then
//! emits the resolved value once to every current and future subscriber.
//! Only the first resolution counts.

use std::fmt;

use crate::observable::Observable;
use crate::stream::Stream;

/// A value that will be provided at most once.
pub struct Deferred<T> {
    slot: Observable<Option<T>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Deferred<T> {
    /// An unresolved value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Observable::new(None),
        }
    }

    /// An already resolved value.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        Self {
            slot: Observable::new(Some(value)),
        }
    }

    /// Provide the value. Returns `false` if it was already resolved.
    pub fn resolve(&self, value: T) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.slot.set(Some(value));
        true
    }

    /// Whether [`Deferred::resolve`] has been called.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.slot.with(Option::is_some)
    }

    /// Stream of the resolved value.
    #[must_use]
    pub fn stream(&self) -> Stream<T> {
        self.slot.stream().filter_map(Option::clone)
    }
}

impl<T: Clone + PartialEq + 'static> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").field("slot", &self.slot).finish()
    }
}

impl<T: Clone + PartialEq + 'static> From<Deferred<T>> for Stream<T> {
    fn from(deferred: Deferred<T>) -> Self {
        deferred.stream()
    }
}

impl<T: Clone + PartialEq + 'static> From<Observable<T>> for Stream<T> {
    fn from(observable: Observable<T>) -> Self {
        observable.stream()
    }
}
