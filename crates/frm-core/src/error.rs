//! Configuration errors.
//!
//! Every variant is a programmer error surfaced at the point of use: a
//! missing context, a duplicated or unknown name, or a view without a
//! bindable input. None of them is retried or defaulted.

use std::fmt;

/// Result alias used across the crate.
pub type Result<T, E = FormError> = std::result::Result<T, E>;

/// Errors from building and binding forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// An operation or engine was used without a form context.
    MissingContext { operation: &'static str },
    /// A field reference could not be resolved from the given scope.
    UnknownField { field: String, scope: String },
    /// A group has no child with the requested key.
    UnknownChild { group: String, key: String },
    /// Two children of one group share a key.
    DuplicateChild { group: String, key: String },
    /// A live context with this name is already registered at the parent.
    DuplicateContext { parent: String, name: String },
    /// A rendered view contains nothing a value accessor can bind to.
    AccessorNotFound { control: String },
    /// A comparator string is not one of the supported operators.
    UnknownComparator(String),
    /// A pattern validator was given an invalid regular expression.
    InvalidPattern { pattern: String, reason: String },
    /// A validator could not evaluate the value.
    Validation { validator: String, reason: String },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContext { operation } => {
                write!(f, "{operation} requires a form context, but none was provided")
            }
            Self::UnknownField { field, scope } => {
                write!(f, "field '{field}' is not reachable from context '{scope}'")
            }
            Self::UnknownChild { group, key } => {
                write!(f, "group '{group}' has no control named '{key}'")
            }
            Self::DuplicateChild { group, key } => {
                write!(f, "group '{group}' declares control '{key}' more than once")
            }
            Self::DuplicateContext { parent, name } => {
                write!(f, "context '{parent}' already has a child named '{name}'")
            }
            Self::AccessorNotFound { control } => write!(
                f,
                "control '{control}' expects an input-like element in its rendered view, \
                 but none was found"
            ),
            Self::UnknownComparator(op) => write!(f, "unknown comparator '{op}'"),
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid pattern '{pattern}': {reason}")
            }
            Self::Validation { validator, reason } => {
                write!(f, "validator '{validator}' failed: {reason}")
            }
        }
    }
}

impl std::error::Error for FormError {}
