#![forbid(unsafe_code)]

//! Cold push streams with latest-value joins and switching.
//!
//! A [`Stream`] is a recipe: nothing runs until [`Stream::subscribe`] is
//! called, and every subscriber gets its own run of the producer. Emission is
//! synchronous on the caller's stack; there is no scheduler and no completion
//! signal. A stream that "emits nothing" simply never calls its sink.
//!
//! # Invariants
//!
//! 1. Joins ([`combine_latest`], [`combine_latest2`]) wait for one value from
//!    every operand, then re-emit on any operand change using the latest
//!    value of every other operand.
//! 2. [`Stream::switch_map`] cancels the previously active inner stream before
//!    subscribing to the next one. A switch triggered while the next inner
//!    stream is still subscribing supersedes it.
//! 3. Dropping the returned [`Subscription`] stops all further emissions to
//!    the sink.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::subscription::Subscription;

/// Receiver end of a stream.
pub type Sink<T> = Rc<dyn Fn(&T)>;

type Producer<T> = dyn Fn(Sink<T>) -> Subscription;

/// A lazily subscribed, synchronous push stream.
pub struct Stream<T> {
    producer: Rc<Producer<T>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").finish_non_exhaustive()
    }
}

impl<T: 'static> Stream<T> {
    /// Build a stream from a producer. The producer is invoked once per
    /// subscriber and returns the teardown for that subscriber.
    pub fn new(producer: impl Fn(Sink<T>) -> Subscription + 'static) -> Self {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// A stream that never emits.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(|_| Subscription::empty())
    }

    /// Start the producer, delivering every value to `on_next`.
    pub fn subscribe(&self, on_next: impl Fn(&T) + 'static) -> Subscription {
        (self.producer)(Rc::new(on_next))
    }

    /// Transform every value.
    #[must_use]
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Stream<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |sink: Sink<U>| {
            let f = Rc::clone(&f);
            source.subscribe(move |value| sink(&f(value)))
        })
    }

    /// Forward only the values matching `predicate`.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Stream::new(move |sink: Sink<T>| {
            let predicate = Rc::clone(&predicate);
            source.subscribe(move |value| {
                if predicate(value) {
                    sink(value);
                }
            })
        })
    }

    /// Transform values, dropping those mapped to `None`.
    #[must_use]
    pub fn filter_map<U: 'static>(&self, f: impl Fn(&T) -> Option<U> + 'static) -> Stream<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |sink: Sink<U>| {
            let f = Rc::clone(&f);
            source.subscribe(move |value| {
                if let Some(out) = f(value) {
                    sink(&out);
                }
            })
        })
    }

    /// For every source value, switch to the stream returned by `project`,
    /// cancelling the previously active one.
    #[must_use]
    pub fn switch_map<U: 'static>(&self, project: impl Fn(&T) -> Stream<U> + 'static) -> Stream<U> {
        let source = self.clone();
        let project = Rc::new(project);
        Stream::new(move |sink: Sink<U>| {
            let active: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
            let generation = Rc::new(Cell::new(0_u64));

            let outer = {
                let project = Rc::clone(&project);
                let active = Rc::clone(&active);
                source.subscribe(move |value| {
                    let current = generation.get().wrapping_add(1);
                    generation.set(current);

                    let previous = active.borrow_mut().take();
                    drop(previous);

                    let sink = sink.clone();
                    let inner = project(value).subscribe(move |out| sink(out));
                    if generation.get() == current {
                        *active.borrow_mut() = Some(inner);
                    }
                })
            };

            Subscription::new(move || {
                drop(outer);
                let inner = active.borrow_mut().take();
                drop(inner);
            })
        })
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Emit `value` once to each subscriber.
    #[must_use]
    pub fn of(value: T) -> Self {
        Self::new(move |sink| {
            sink(&value);
            Subscription::empty()
        })
    }

    /// Emit every value of `values`, in order, to each subscriber.
    #[must_use]
    pub fn from_values(values: Vec<T>) -> Self {
        Self::new(move |sink| {
            for value in &values {
                sink(value);
            }
            Subscription::empty()
        })
    }

    /// The value the stream emits synchronously on subscription, if any.
    ///
    /// Subscribes, keeps the last synchronous emission, and cancels. Hot
    /// streams built from [`Observable`](crate::Observable) always answer.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        let slot: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));
        let sub = {
            let slot = Rc::clone(&slot);
            self.subscribe(move |value| *slot.borrow_mut() = Some(value.clone()))
        };
        drop(sub);
        slot.take()
    }
}

impl<T: Clone + PartialEq + 'static> Stream<T> {
    /// Suppress consecutive duplicates.
    #[must_use]
    pub fn distinct(&self) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |sink: Sink<T>| {
            let last: RefCell<Option<T>> = RefCell::new(None);
            source.subscribe(move |value| {
                let changed = last.borrow().as_ref() != Some(value);
                if changed {
                    *last.borrow_mut() = Some(value.clone());
                    sink(value);
                }
            })
        })
    }
}

/// Latest-value join over any number of same-typed streams.
///
/// Emits nothing for an empty input.
#[must_use]
pub fn combine_latest<T: Clone + 'static>(streams: Vec<Stream<T>>) -> Stream<Vec<T>> {
    let streams = Rc::new(streams);
    Stream::new(move |sink: Sink<Vec<T>>| {
        if streams.is_empty() {
            return Subscription::empty();
        }
        let slots: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; streams.len()]));
        let subs = streams
            .iter()
            .enumerate()
            .map(|(index, stream)| {
                let slots = Rc::clone(&slots);
                let sink = sink.clone();
                stream.subscribe(move |value| {
                    let ready = {
                        let mut slots = slots.borrow_mut();
                        slots[index] = Some(value.clone());
                        slots.iter().cloned().collect::<Option<Vec<T>>>()
                    };
                    if let Some(values) = ready {
                        sink(&values);
                    }
                })
            })
            .collect();
        Subscription::merge(subs)
    })
}

/// Latest-value join over two differently typed streams.
#[must_use]
pub fn combine_latest2<A, B>(left: Stream<A>, right: Stream<B>) -> Stream<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    Stream::new(move |sink: Sink<(A, B)>| {
        let state: Rc<RefCell<(Option<A>, Option<B>)>> = Rc::new(RefCell::new((None, None)));

        let emit = {
            let state = Rc::clone(&state);
            Rc::new(move || {
                let ready = match &*state.borrow() {
                    (Some(a), Some(b)) => Some((a.clone(), b.clone())),
                    _ => None,
                };
                if let Some(pair) = ready {
                    sink(&pair);
                }
            })
        };

        let left_sub = {
            let state = Rc::clone(&state);
            let emit = Rc::clone(&emit);
            left.subscribe(move |a| {
                state.borrow_mut().0 = Some(a.clone());
                emit();
            })
        };
        let right_sub = {
            let state = Rc::clone(&state);
            right.subscribe(move |b| {
                state.borrow_mut().1 = Some(b.clone());
                emit();
            })
        };
        Subscription::merge(vec![left_sub, right_sub])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Observable;

    fn collect<T: Clone + 'static>(stream: &Stream<T>) -> (Rc<RefCell<Vec<T>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let sub = stream.subscribe(move |v| s.borrow_mut().push(v.clone()));
        (seen, sub)
    }

    #[test]
    fn of_emits_once_per_subscriber() {
        let stream = Stream::of(7);
        let (a, _sa) = collect(&stream);
        let (b, _sb) = collect(&stream);
        assert_eq!(*a.borrow(), vec![7]);
        assert_eq!(*b.borrow(), vec![7]);
    }

    #[test]
    fn empty_never_emits() {
        let (seen, _sub) = collect(&Stream::<i32>::empty());
        assert!(seen.borrow().is_empty());
        assert_eq!(Stream::<i32>::empty().latest(), None);
    }

    #[test]
    fn map_and_filter() {
        let stream = Stream::from_values(vec![1, 2, 3, 4])
            .filter(|v| v % 2 == 0)
            .map(|v| v * 10);
        let (seen, _sub) = collect(&stream);
        assert_eq!(*seen.borrow(), vec![20, 40]);
    }

    #[test]
    fn combine_latest_waits_for_every_operand() {
        let a = Observable::new(1);
        let b_source = Observable::new(0);
        let gate = Observable::new(false);
        let b = gate
            .stream()
            .switch_map({
                let b_source = b_source.clone();
                move |open| if *open { b_source.stream() } else { Stream::empty() }
            });
        let joined = combine_latest(vec![a.stream(), b]);
        let (seen, _sub) = collect(&joined);
        assert!(seen.borrow().is_empty());

        gate.set(true);
        assert_eq!(*seen.borrow(), vec![vec![1, 0]]);

        a.set(2);
        b_source.set(5);
        assert_eq!(*seen.borrow(), vec![vec![1, 0], vec![2, 0], vec![2, 5]]);
    }

    #[test]
    fn combine_latest_of_nothing_is_silent() {
        let (seen, _sub) = collect(&combine_latest::<i32>(Vec::new()));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn combine_latest2_pairs_latest() {
        let a = Observable::new(1);
        let b = Observable::new("x");
        let (seen, _sub) = collect(&combine_latest2(a.stream(), b.stream()));
        a.set(2);
        b.set("y");
        assert_eq!(*seen.borrow(), vec![(1, "x"), (2, "x"), (2, "y")]);
    }

    #[test]
    fn switch_map_cancels_previous_branch() {
        let selector = Observable::new(true);
        let left = Observable::new("L0");
        let right = Observable::new("R0");
        let stream = selector.stream().switch_map({
            let (left, right) = (left.clone(), right.clone());
            move |pick| if *pick { left.stream() } else { right.stream() }
        });
        let (seen, sub) = collect(&stream);
        assert_eq!(left.subscriber_count(), 1);

        selector.set(false);
        assert_eq!(left.subscriber_count(), 0);
        assert_eq!(right.subscriber_count(), 1);

        left.set("L1");
        right.set("R1");
        assert_eq!(*seen.borrow(), vec!["L0", "R0", "R1"]);

        drop(sub);
        assert_eq!(right.subscriber_count(), 0);
        assert_eq!(selector.subscriber_count(), 0);
    }

    #[test]
    fn latest_reads_synchronous_value() {
        let obs = Observable::new(4);
        assert_eq!(obs.stream().latest(), Some(4));
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn distinct_drops_repeats() {
        let stream = Stream::from_values(vec![1, 1, 2, 2, 1]).distinct();
        let (seen, _sub) = collect(&stream);
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn combine_latest_last_emission_matches_sources(
                writes in proptest::collection::vec((0usize..3, -50i32..50), 0..40)
            ) {
                let sources: Vec<Observable<i32>> = (0..3).map(|_| Observable::new(0)).collect();
                let joined = combine_latest(sources.iter().map(Observable::stream).collect());
                let last = Rc::new(RefCell::new(Vec::new()));
                let l = Rc::clone(&last);
                let _sub = joined.subscribe(move |v| *l.borrow_mut() = v.clone());

                for (index, value) in writes {
                    sources[index].set(value);
                }
                let expected: Vec<i32> = sources.iter().map(Observable::get).collect();
                prop_assert_eq!(last.borrow().clone(), expected);
            }
        }
    }
}
