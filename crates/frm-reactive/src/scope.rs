#![forbid(unsafe_code)]

//! Lifecycle management for groups of subscriptions.
//!
//! A [`BindingScope`] collects every subscription created for one logical
//! owner (a bound control, a mounted view). Releasing the scope cancels all of
//! them at once.
//!
//! # Invariants
//!
//! 1. Subscriptions are released in reverse registration order.
//! 2. After release, no callback registered through this scope fires.
//! 3. [`BindingScope::clear`] releases immediately and leaves the scope reusable.
//! 4. [`BindingScope::len`] is always accurate.

use std::fmt;

use crate::stream::Stream;
use crate::subscription::Subscription;

/// Collects subscriptions for a logical owner and releases them together.
pub struct BindingScope {
    label: &'static str,
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            subscriptions: Vec::new(),
        }
    }

    /// Keep `sub` alive until the scope is released.
    pub fn hold(&mut self, sub: Subscription) -> &mut Self {
        self.subscriptions.push(sub);
        self
    }

    /// Subscribe to `source` for the lifetime of this scope.
    pub fn subscribe<T: 'static>(
        &mut self,
        source: &Stream<T>,
        on_next: impl Fn(&T) + 'static,
    ) -> &mut Self {
        let sub = source.subscribe(on_next);
        self.hold(sub)
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the scope holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription now; the scope stays usable.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            scope = self.label,
            subscriptions = self.subscriptions.len(),
            "binding scope released"
        );
        while let Some(sub) = self.subscriptions.pop() {
            drop(sub);
        }
    }

    /// Release every subscription and consume the scope. Returns how many
    /// subscriptions were cancelled.
    pub fn release(mut self) -> usize {
        let released = self.subscriptions.len();
        self.clear();
        released
    }
}

impl Drop for BindingScope {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("label", &self.label)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
