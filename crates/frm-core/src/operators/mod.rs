//! The combinator language.
//!
//! Every combinator returns an [`Operation`](crate::Operation); nothing runs
//! until the operation is resolved against a context.

pub mod boolean;
pub mod compare;
pub mod field;
pub mod use_ops;

pub use boolean::{and, not, or};
pub use compare::{Comparator, compare};
pub use field::field_value;
pub use use_ops::{UseIf, UseWhen, use_from, use_if, use_value, use_when};
