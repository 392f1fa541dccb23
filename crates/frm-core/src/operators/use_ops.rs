//! Constant, adapted, and switching operations.

use std::collections::HashMap;
use std::rc::Rc;

use frm_reactive::Stream;
use tracing::debug;

use crate::operation::Operation;
use crate::value::{Value, case_key};

/// An operation that emits `value` once per subscriber.
#[must_use]
pub fn use_value<T: Clone + 'static>(value: T) -> Operation<T> {
    Operation::new(move |_| Ok(Stream::of(value.clone())))
}

/// Adapt an external source into an operation.
///
/// The result emits whatever the source emits, in order. A [`Deferred`]
/// that never resolves yields an operation that never emits.
///
/// [`Deferred`]: frm_reactive::Deferred
#[must_use]
pub fn use_from<T: 'static>(source: impl Into<Stream<T>>) -> Operation<T> {
    let stream = source.into();
    Operation::new(move |_| Ok(stream.clone()))
}

/// Arguments for [`use_if`].
#[derive(Debug, Clone)]
pub struct UseIf<T> {
    condition: Operation<bool>,
    then: Operation<T>,
    otherwise: Option<Operation<T>>,
}

impl<T: 'static> UseIf<T> {
    /// Follow `then` while `condition` is true.
    #[must_use]
    pub fn new(condition: Operation<bool>, then: Operation<T>) -> Self {
        Self {
            condition,
            then,
            otherwise: None,
        }
    }

    /// Follow `otherwise` while the condition is false.
    #[must_use]
    pub fn otherwise(mut self, otherwise: Operation<T>) -> Self {
        self.otherwise = Some(otherwise);
        self
    }
}

/// Switch between two branches on a boolean condition.
///
/// Each emission of the condition cancels the active branch before the
/// next one subscribes. Without an `otherwise` branch a false condition
/// emits nothing.
#[must_use]
pub fn use_if<T: 'static>(args: UseIf<T>) -> Operation<T> {
    let UseIf {
        condition,
        then,
        otherwise,
    } = args;
    Operation::new(move |ctx| {
        let condition = condition.resolve(ctx)?;
        let then = then.resolve(ctx)?;
        let otherwise = otherwise
            .as_ref()
            .map(|op| op.resolve(ctx))
            .transpose()?;
        Ok(condition.switch_map(move |flag| {
            if *flag {
                then.clone()
            } else {
                otherwise.clone().unwrap_or_else(Stream::empty)
            }
        }))
    })
}

/// Arguments for [`use_when`].
#[derive(Debug, Clone)]
pub struct UseWhen<T> {
    when: Operation<Value>,
    cases: Vec<(String, Operation<T>)>,
    default: Option<Operation<T>>,
}

impl<T: 'static> UseWhen<T> {
    /// Switch on the keys emitted by `when`.
    #[must_use]
    pub fn new(when: Operation<Value>) -> Self {
        Self {
            when,
            cases: Vec::new(),
            default: None,
        }
    }

    /// Follow `then` while the key equals `key`.
    ///
    /// Keys are compared by their canonical string form, so `0` and `"0"`
    /// name the same case. Array and object keys never match. A later case
    /// with the same key replaces an earlier one.
    #[must_use]
    pub fn case(mut self, key: impl Into<Value>, then: Operation<T>) -> Self {
        let key = key.into();
        match case_key(&key) {
            Some(key) => {
                self.cases.retain(|(existing, _)| *existing != key);
                self.cases.push((key, then));
            }
            None => debug!(key = %key, "ignoring use_when case with a non-scalar key"),
        }
        self
    }

    /// Follow `default` when no case matches.
    #[must_use]
    pub fn default(mut self, default: Operation<T>) -> Self {
        self.default = Some(default);
        self
    }
}

/// Multi-way switch on a key.
///
/// Unmatched keys follow the default branch, or emit nothing when there is
/// none.
#[must_use]
pub fn use_when<T: 'static>(args: UseWhen<T>) -> Operation<T> {
    let UseWhen {
        when,
        cases,
        default,
    } = args;
    Operation::new(move |ctx| {
        let key = when.resolve(ctx)?;
        let mut resolved = HashMap::with_capacity(cases.len());
        for (case, op) in &cases {
            resolved.insert(case.clone(), op.resolve(ctx)?);
        }
        let resolved = Rc::new(resolved);
        let default = default.as_ref().map(|op| op.resolve(ctx)).transpose()?;
        Ok(key.switch_map(move |key| {
            case_key(key)
                .and_then(|key| resolved.get(&key).cloned())
                .or_else(|| default.clone())
                .unwrap_or_else(Stream::empty)
        }))
    })
}
