//! Logical joins over boolean operations.

use frm_reactive::combine_latest;

use crate::operation::Operation;

fn join(
    operands: impl IntoIterator<Item = Operation<bool>>,
    reduce: fn(&[bool]) -> bool,
) -> Operation<bool> {
    let operands: Vec<Operation<bool>> = operands.into_iter().collect();
    Operation::new(move |ctx| {
        let streams = operands
            .iter()
            .map(|op| op.resolve(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(combine_latest(streams).map(move |values| reduce(values)))
    })
}

/// Logical AND of the latest value of every operand.
///
/// Waits for one emission from each operand. An empty operand list never
/// emits.
#[must_use]
pub fn and(operands: impl IntoIterator<Item = Operation<bool>>) -> Operation<bool> {
    join(operands, |values| values.iter().all(|v| *v))
}

/// Logical OR of the latest value of every operand.
#[must_use]
pub fn or(operands: impl IntoIterator<Item = Operation<bool>>) -> Operation<bool> {
    join(operands, |values| values.iter().any(|v| *v))
}

/// Negation of every value `operand` emits.
#[must_use]
pub fn not(operand: Operation<bool>) -> Operation<bool> {
    operand.map(|value| !*value)
}
