//! Deferred computations resolved against a form context.

use std::fmt;
use std::rc::Rc;

use frm_reactive::Stream;

use crate::context::FormContext;
use crate::error::Result;

type Resolver<T> = dyn Fn(&FormContext) -> Result<Stream<T>>;

/// A computation that, given a [`FormContext`], yields a [`Stream`].
///
/// Operations are values: they can be stored in a control's configuration,
/// cloned, nested inside combinators, and resolved any number of times.
/// Each resolution produces an independent stream.
pub struct Operation<T> {
    resolver: Rc<Resolver<T>>,
}

impl<T> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            resolver: Rc::clone(&self.resolver),
        }
    }
}

impl<T> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation").finish_non_exhaustive()
    }
}

impl<T: 'static> Operation<T> {
    /// Wrap a resolver function.
    pub fn new(resolver: impl Fn(&FormContext) -> Result<Stream<T>> + 'static) -> Self {
        Self {
            resolver: Rc::new(resolver),
        }
    }

    /// Resolve against `ctx`.
    pub fn resolve(&self, ctx: &FormContext) -> Result<Stream<T>> {
        (self.resolver)(ctx)
    }

    /// Transform every value the resolved stream emits.
    #[must_use]
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Operation<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Operation::new(move |ctx| {
            let f = Rc::clone(&f);
            Ok(source.resolve(ctx)?.map(move |value| f(value)))
        })
    }
}
