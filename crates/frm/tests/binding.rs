use std::rc::Rc;

use frm::prelude::*;
use frm::validators::{min_length, pattern, required};
use frm_core::testing::{MockAccessor, MockContainer};
use pretty_assertions::assert_eq;
use serde_json::json;
use tracing_test::traced_test;

fn leaf_ctx(config: ControlConfig) -> (Controller, FormContext) {
    let controller = create_controller(config);
    let ctx = FormContext::create(controller.clone(), None).expect("root");
    (controller, ctx)
}

#[test]
fn no_mutation_after_teardown() {
    let source = Observable::new(json!("first"));
    let hide = Observable::new(false);
    let disabled = Observable::new(false);
    let (controller, ctx) = leaf_ctx(
        ControlConfig::default()
            .with_value(use_from(source.clone()))
            .with_disabled(use_from(disabled.clone()))
            .with_hide(use_from(hide.clone()))
            .with_validators(use_value(vec![required()])),
    );
    let accessor = MockAccessor::new();
    let container = MockContainer::with_accessor(accessor.clone());
    let mut engine = BindingEngine::new(ctx);
    let view = engine.render_controller(container.clone()).expect("render");
    engine
        .bind_view_accessor(view.as_ref(), true)
        .expect("accessor");

    assert_eq!(controller.value().latest(), Some(json!("first")));
    engine.destroy();

    let writes = accessor.writes().len();
    source.set(json!("second"));
    disabled.set(true);
    hide.set(true);
    accessor.input(json!("typed"));
    accessor.blur();

    assert_eq!(controller.value().latest(), Some(json!("first")));
    assert_eq!(controller.disabled().latest(), Some(false));
    assert_eq!(controller.touched().latest(), Some(false));
    assert_eq!(controller.dirty().latest(), Some(false));
    assert_eq!(container.detaches(), 0);
    assert_eq!(accessor.writes().len(), writes);
    assert_eq!(source.subscriber_count(), 0);
}

#[test]
fn validity_tracks_value_through_accessor() {
    let zip = pattern(r"\d{5}").expect("regex");
    let (controller, ctx) = leaf_ctx(
        ControlConfig::default().with_validators(use_value(vec![required(), zip, min_length(5)])),
    );
    let accessor = MockAccessor::new();
    let mut engine = BindingEngine::new(ctx);
    let _view = engine
        .render_controller(MockContainer::with_accessor(accessor.clone()))
        .expect("render");
    engine.bind_to_accessor(accessor.clone());

    assert_eq!(controller.invalid().latest(), Some(true));
    accessor.input(json!("1234"));
    assert_eq!(controller.valid().latest(), Some(false));
    accessor.input(json!("12345"));
    assert_eq!(controller.valid().latest(), Some(true));
    assert_eq!(controller.dirty().latest(), Some(true));
}

#[test]
#[traced_test]
fn broken_validator_is_logged_and_invalid() {
    let broken = Validator::fallible("remote", |_| {
        Err(FormError::Validation {
            validator: "remote".into(),
            reason: "service unavailable".into(),
        })
    });
    let (controller, ctx) =
        leaf_ctx(ControlConfig::default().with_validators(use_value(vec![broken])));
    let mut engine = BindingEngine::new(ctx);
    let _view = engine.render_controller(MockContainer::new()).expect("render");

    assert_eq!(controller.valid().latest(), Some(false));
    assert!(logs_contain("validator failed"));
    assert!(logs_contain("service unavailable"));
}

#[test]
fn dependent_field_hides_and_shows() {
    let age = create_controller(ControlConfig::default());
    let licence = create_controller(ControlConfig::default().with_hide(compare(
        field_value("age"),
        Comparator::Lt,
        use_value(json!(18)),
    )));
    let form = create_group_controller(
        [("age", age.clone()), ("licence", licence.clone())],
        ControlConfig::default(),
    )
    .expect("form");

    let root = GroupMount::init(form, None, MockContainer::new()).expect("root");
    let container = MockContainer::new();
    let _licence = ControlMount::init(
        licence,
        Some(root.context()),
        container.clone(),
        MountOptions {
            require_accessor: false,
        },
    )
    .expect("licence");

    assert!(!container.is_attached(), "unset age compares as 0");
    age.write_value(json!(30));
    assert!(container.is_attached());
    age.write_value(json!(12));
    assert!(!container.is_attached());
}

#[test]
fn context_data_reaches_template_scope() {
    let label = Observable::new(ContextData::from_iter([(
        "label".to_string(),
        json!("Email"),
    )]));
    let (_controller, ctx) =
        leaf_ctx(ControlConfig::default().with_context_data(use_from(label.clone())));
    let container = MockContainer::new();
    let mut engine = BindingEngine::new(ctx.clone());
    let _view = engine.render_controller(container.clone()).expect("render");

    let view = container.view().expect("view");
    assert_eq!(view.scope()["label"], json!("Email"));
    label.set(ContextData::from_iter([("label".to_string(), json!("Mail"))]));
    assert_eq!(view.scope()["$implicit"], json!({"label": "Mail"}));
    assert_eq!(ctx.data()["label"], json!("Mail"));
}

#[test]
fn operate_requires_a_provider() {
    let err = frm::operate::<Value>(None, &use_value(json!(1))).unwrap_err();
    assert!(matches!(err, FormError::MissingContext { .. }));

    let (_controller, ctx) = leaf_ctx(ControlConfig::default());
    let provider: Rc<FormContext> = Rc::new(ctx);
    let stream = frm::operate(Some(provider.as_ref()), &use_value(7)).expect("resolves");
    assert_eq!(stream.latest(), Some(7));
}

#[test]
fn selector_options_depend_on_another_field() {
    let country = create_controller(ControlConfig::default());
    let cities = |names: &[&str]| {
        names
            .iter()
            .copied()
            .map(SelectorOption::new)
            .collect::<Vec<_>>()
    };
    let city = create_selector(SelectorConfig::default().with_options(use_when(
        UseWhen::new(field_value("country"))
            .case("fr", use_value(cities(&["Paris", "Lyon"])))
            .default(use_value(Vec::new())),
    )));
    let form = create_group_controller(
        [("country", country.clone()), ("city", city.clone())],
        ControlConfig::default(),
    )
    .expect("form");

    let root = GroupMount::init(form, None, MockContainer::new()).expect("root");
    let _city = ControlMount::init(
        city.clone(),
        Some(root.context()),
        MockContainer::new(),
        MountOptions {
            require_accessor: false,
        },
    )
    .expect("city");

    let selector = city.as_selector().expect("selector");
    assert!(selector.current_options().is_empty());
    country.write_value(json!("fr"));
    assert_eq!(selector.current_options(), cities(&["Paris", "Lyon"]));

    city.write_value(json!("Lyon"));
    assert_eq!(selector.selected().map(|o| o.display_label()), Some("Lyon".to_string()));
    assert_eq!(
        root.context().controller().value().latest(),
        Some(json!({"country": "fr", "city": "Lyon"}))
    );
}
