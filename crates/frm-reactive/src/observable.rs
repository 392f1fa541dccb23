#![forbid(unsafe_code)]

//! Shared, version-tracked value cells with change notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op.
//! 4. No borrow is held while subscriber callbacks run, so callbacks may read
//!    or write the same observable.
//! 5. A write made from inside a callback supersedes the one being delivered:
//!    the nested notification reaches every subscriber with the newer value
//!    and the outer pass stops, so no subscriber sees a stale value last.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::stream::Stream;
use crate::subscription::Subscription;

type Callback<T> = dyn Fn(&T);

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A shared value with change notification.
///
/// Cloning an `Observable` clones the handle; both handles see the same value.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Read-modify-write using the current value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let current = self.get();
        self.set(f(&current));
    }

    /// Number of changes applied since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Register `callback` for future changes. The current value is not
    /// replayed; use [`Observable::stream`] for replay.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription::holding(strong)
    }

    /// A hot stream that replays the current value to each new subscriber
    /// and then forwards every change.
    #[must_use]
    pub fn stream(&self) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |sink| {
            let forward = {
                let sink = sink.clone();
                source.subscribe(move |value| sink(value))
            };
            sink(&source.get());
            forward
        })
    }

    fn notify(&self) {
        let (value, version, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            let callbacks: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value.clone(), inner.version, callbacks)
        };
        for callback in callbacks {
            if self.inner.borrow().version != version {
                break;
            }
            callback(&value);
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_notifies_and_bumps_version() {
        let obs = Observable::new(1);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let _sub = obs.subscribe(move |v| s.set(*v));

        obs.set(5);
        assert_eq!(seen.get(), 5);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn equal_set_is_noop() {
        let obs = Observable::new(3);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| c.set(c.get() + 1));

        obs.set(3);
        assert_eq!(count.get(), 0);
        assert_eq!(obs.version(), 0);
    }

    #[test]
    fn update_reads_current() {
        let obs = Observable::new(10);
        obs.update(|v| v * 2);
        assert_eq!(obs.get(), 20);
    }

    #[test]
    fn dropped_subscription_stops_callbacks() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let sub = obs.subscribe(move |v| s.set(*v));
        assert_eq!(obs.subscriber_count(), 1);

        drop(sub);
        obs.set(9);
        assert_eq!(seen.get(), 0);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn stream_replays_current_value() {
        let obs = Observable::new("a".to_string());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = obs.stream().subscribe(move |v| s.borrow_mut().push(v.clone()));

        obs.set("b".to_string());
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn callback_may_write_back() {
        let obs = Observable::new(0);
        let writer = obs.clone();
        let _sub = obs.subscribe(move |v| {
            if *v < 3 {
                writer.set(v + 1);
            }
        });
        obs.set(1);
        assert_eq!(obs.get(), 3);
    }

    #[test]
    fn nested_write_is_the_last_value_everyone_sees() {
        let obs = Observable::new(0);
        let clamp = obs.clone();
        let _clamp = obs.subscribe(move |v| {
            if *v > 10 {
                clamp.set(10);
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _watch = obs.subscribe(move |v| s.borrow_mut().push(*v));

        obs.set(15);
        assert_eq!(obs.get(), 10);
        assert_eq!(*seen.borrow(), vec![10]);
    }

    #[test]
    fn notification_order_is_registration_order() {
        let obs = Observable::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<_> = (0..3)
            .map(|i| {
                let o = Rc::clone(&order);
                obs.subscribe(move |_| o.borrow_mut().push(i))
            })
            .collect();
        obs.set(1);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
        drop(subs);
    }
}
