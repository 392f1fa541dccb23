#![forbid(unsafe_code)]

//! Reactive primitives for frm.
//!
//! - [`Observable`]: a shared, version-tracked value with change notification.
//! - [`Stream`]: a cold, synchronous push stream with latest-value joins
//!   ([`combine_latest`], [`combine_latest2`]) and switching
//!   ([`Stream::switch_map`]).
//! - [`Deferred`]: a single-assignment value, the promise analogue.
//! - [`Subscription`]: RAII guard that cancels on drop.
//! - [`BindingScope`]: a disposer aggregate releasing many subscriptions at once.
//!
//! # Architecture
//!
//! Everything is single-threaded (`Rc` + `RefCell`). An emission runs to
//! completion on the caller's stack before control returns; there is no
//! scheduler queue. Observable subscribers are stored as `Weak` callbacks and
//! pruned lazily during notification.

pub mod deferred;
pub mod observable;
pub mod scope;
pub mod stream;
pub mod subscription;

pub use deferred::Deferred;
pub use observable::Observable;
pub use scope::BindingScope;
pub use stream::{Sink, Stream, combine_latest, combine_latest2};
pub use subscription::Subscription;
