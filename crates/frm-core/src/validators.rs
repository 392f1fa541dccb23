//! Validators and the built-in rule set.
//!
//! A validator maps the current value to a stream of booleans. The binding
//! engine runs every configured validator against each new value and ANDs
//! the latest results. A validator that returns an error is counted as
//! failing.
//!
//! The built-ins other than [`required`] accept empty values, so they
//! compose with `required` instead of duplicating it.

use std::fmt;
use std::rc::Rc;

use frm_reactive::Stream;
use regex::Regex;

use crate::error::{FormError, Result};
use crate::value::{Value, is_empty_value, to_number};

type Check = dyn Fn(&Value) -> Result<Stream<bool>>;

/// A named validity check.
#[derive(Clone)]
pub struct Validator {
    name: Rc<str>,
    check: Rc<Check>,
}

impl Validator {
    /// A validator producing a stream, for checks whose answer arrives later
    /// or changes over time.
    pub fn new(name: &str, check: impl Fn(&Value) -> Result<Stream<bool>> + 'static) -> Self {
        Self {
            name: Rc::from(name),
            check: Rc::new(check),
        }
    }

    /// A synchronous check.
    pub fn sync(name: &str, check: impl Fn(&Value) -> bool + 'static) -> Self {
        Self::new(name, move |value| Ok(Stream::of(check(value))))
    }

    /// A synchronous check that may fail to evaluate.
    pub fn fallible(name: &str, check: impl Fn(&Value) -> Result<bool> + 'static) -> Self {
        Self::new(name, move |value| check(value).map(Stream::of))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate against `value`.
    pub fn run(&self, value: &Value) -> Result<Stream<bool>> {
        (self.check)(value)
    }
}

/// Validators are equal when they share the same check.
impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.check, &other.check)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Fails on null, empty strings, empty arrays and empty objects.
#[must_use]
pub fn required() -> Validator {
    Validator::sync("required", |value| !is_empty_value(value))
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Strings and arrays must have at least `min` elements.
#[must_use]
pub fn min_length(min: usize) -> Validator {
    Validator::sync("min_length", move |value| {
        is_empty_value(value) || length(value).is_none_or(|len| len >= min)
    })
}

/// Strings and arrays must have at most `max` elements.
#[must_use]
pub fn max_length(max: usize) -> Validator {
    Validator::sync("max_length", move |value| {
        length(value).is_none_or(|len| len <= max)
    })
}

/// Numeric values must be at least `min`. Non-numeric values pass.
#[must_use]
pub fn min(min: f64) -> Validator {
    Validator::sync("min", move |value| {
        is_empty_value(value) || to_number(value).is_none_or(|n| n >= min)
    })
}

/// Numeric values must be at most `max`. Non-numeric values pass.
#[must_use]
pub fn max(max: f64) -> Validator {
    Validator::sync("max", move |value| {
        is_empty_value(value) || to_number(value).is_none_or(|n| n <= max)
    })
}

/// Strings and numbers must match `pattern` in full.
///
/// Fails with [`FormError::InvalidPattern`] when `pattern` does not compile.
pub fn pattern(pattern: &str) -> Result<Validator> {
    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|err| {
        FormError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    })?;
    Ok(Validator::sync("pattern", move |value| match value {
        _ if is_empty_value(value) => true,
        Value::String(s) => regex.is_match(s),
        Value::Number(n) => regex.is_match(&n.to_string()),
        _ => false,
    }))
}
