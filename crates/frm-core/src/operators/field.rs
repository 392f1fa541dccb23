//! References to other fields' live values.

use crate::controller::FormControl;
use crate::operation::Operation;
use crate::value::Value;

/// The live value of the field `path`, resolved from the evaluating context.
///
/// `path` may be dotted (`"address.street"`) to descend into groups. An
/// unknown field fails at resolution with
/// [`FormError::UnknownField`](crate::FormError::UnknownField).
#[must_use]
pub fn field_value(path: impl Into<String>) -> Operation<Value> {
    let path = path.into();
    Operation::new(move |ctx| Ok(ctx.lookup(&path)?.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormError;
    use crate::controller::{Controller, create_controller, create_group_controller};
    use crate::context::FormContext;
    use crate::testing::collect;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn form() -> (Controller, FormContext) {
        let group = create_group_controller(
            [
                ("name", create_controller(Default::default())),
                ("age", create_controller(Default::default())),
            ],
            Default::default(),
        )
        .expect("distinct keys");
        let ctx = FormContext::create(group.clone(), None).expect("root context");
        (group, ctx)
    }

    #[test]
    fn follows_sibling_value() {
        let (group, ctx) = form();
        let age = group.as_group().expect("group").get("age").expect("age");
        let seen = collect(&field_value("age"), &ctx);
        age.write_value(json!(30));
        assert_eq!(seen.values(), vec![Value::Null, json!(30)]);
    }

    #[test]
    fn unknown_field_fails_at_resolution() {
        let (_group, ctx) = form();
        let err = field_value("missing").resolve(&ctx).unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownField {
                field: "missing".into(),
                scope: "root".into(),
            }
        );
    }
}
