//! Comparison of two value operations.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use frm_reactive::combine_latest2;

use crate::error::FormError;
use crate::operation::Operation;
use crate::value::{Value, compare_values, contains, loose_eq, strict_eq};

/// A binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `in`: the left value is a member of the right collection.
    In,
    /// `not in`
    NotIn,
}

impl Comparator {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Eq,
        Self::Ne,
        Self::StrictEq,
        Self::StrictNe,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
        Self::In,
        Self::NotIn,
    ];

    /// The operator's source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::StrictEq => "===",
            Self::StrictNe => "!==",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }

    /// Apply the operator. Incomparable operands make every ordering
    /// operator false.
    #[must_use]
    pub fn apply(self, left: &Value, right: &Value) -> bool {
        let ordering = || compare_values(left, right);
        match self {
            Self::Eq => loose_eq(left, right),
            Self::Ne => !loose_eq(left, right),
            Self::StrictEq => strict_eq(left, right),
            Self::StrictNe => !strict_eq(left, right),
            Self::Lt => ordering() == Some(Ordering::Less),
            Self::Le => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
            Self::Gt => ordering() == Some(Ordering::Greater),
            Self::Ge => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
            Self::In => contains(right, left),
            Self::NotIn => !contains(right, left),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Comparator {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == normalized)
            .ok_or_else(|| FormError::UnknownComparator(s.to_string()))
    }
}

/// Compare the latest values of two operations.
///
/// Re-emits whenever either side emits, once both have emitted.
#[must_use]
pub fn compare(left: Operation<Value>, op: Comparator, right: Operation<Value>) -> Operation<bool> {
    Operation::new(move |ctx| {
        let joined = combine_latest2(left.resolve(ctx)?, right.resolve(ctx)?);
        Ok(joined.map(move |(l, r)| op.apply(l, r)))
    })
}
