#![forbid(unsafe_code)]

//! RAII cancellation handles.
//!
//! A [`Subscription`] owns the teardown of one active listener. Dropping it
//! (or calling [`Subscription::unsubscribe`]) runs the teardown exactly once.
//! Composite subscriptions are built with [`Subscription::merge`].

use std::fmt;

/// Handle to an active listener. Dropping it cancels the listener.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a subscription that runs `teardown` when cancelled.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Keep `guard` alive until the subscription is cancelled.
    pub fn holding<G: 'static>(guard: G) -> Self {
        Self::new(move || drop(guard))
    }

    /// Combine several subscriptions into one. Cancellation runs in
    /// registration order.
    pub fn merge(subscriptions: Vec<Subscription>) -> Self {
        if subscriptions.is_empty() {
            return Self::empty();
        }
        Self::new(move || {
            for sub in subscriptions {
                drop(sub);
            }
        })
    }

    /// Whether cancelling this subscription would do anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.teardown.is_some()
    }

    /// Cancel now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
