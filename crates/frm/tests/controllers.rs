use frm::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn latest<T: Clone + 'static>(stream: Stream<T>) -> T {
    stream.latest().expect("hot stream replays")
}

fn pair() -> (Controller, Controller, Controller) {
    let a = create_controller(ControlConfig::default());
    let b = create_controller(ControlConfig::default());
    let group =
        create_group_controller([("a", a.clone()), ("b", b.clone())], ControlConfig::default())
            .expect("group");
    (group, a, b)
}

#[test]
fn group_value_is_keyed_join() {
    let (group, a, b) = pair();
    a.write_value(json!("x"));
    b.write_value(json!(2));
    assert_eq!(latest(group.value()), json!({"a": "x", "b": 2}));
}

#[test]
fn group_partial_write_leaves_siblings() {
    let (group, a, b) = pair();
    b.write_value(json!("untouched"));
    group.write_value(json!({"a": "x"}));
    assert_eq!(latest(a.value()), json!("x"));
    assert_eq!(latest(b.value()), json!("untouched"));
}

#[test]
fn group_enabled_requires_every_child() {
    let (group, _a, b) = pair();
    assert!(latest(group.enabled()));
    b.set_disable_state(true);
    assert!(!latest(group.enabled()));
    b.set_enable_state(true);
    assert!(latest(group.enabled()));
}

#[test]
fn leaf_write_then_read() {
    let leaf = create_controller(ControlConfig::default());
    leaf.write_value(json!([1, "two", null]));
    assert_eq!(latest(leaf.value()), json!([1, "two", null]));
}

#[derive(Debug, Clone)]
enum Step {
    Set(Flag, bool),
    Toggle(Flag),
    SetComplement(Flag, bool),
    Reset,
}

fn step() -> impl Strategy<Value = Step> {
    let flag = prop::sample::select(Flag::ALL.to_vec());
    prop_oneof![
        (flag.clone(), any::<bool>()).prop_map(|(f, on)| Step::Set(f, on)),
        flag.clone().prop_map(Step::Toggle),
        (flag, any::<bool>()).prop_map(|(f, on)| Step::SetComplement(f, on)),
        Just(Step::Reset),
    ]
}

fn apply(control: &Controller, step: &Step) {
    match step {
        Step::Set(flag, on) => control.set_flag(*flag, *on),
        Step::Toggle(flag) => control.update_flag(*flag, &|on| !on),
        Step::SetComplement(flag, on) => match flag {
            Flag::Enabled => control.set_disable_state(*on),
            Flag::Touched => control.set_untouched_state(*on),
            Flag::Dirty => control.set_pristine_state(*on),
            Flag::Valid => control.set_invalid_state(*on),
        },
        Step::Reset => control.reset(),
    }
}

fn assert_pairs(control: &Controller) {
    assert_eq!(latest(control.enabled()), !latest(control.disabled()));
    assert_eq!(latest(control.touched()), !latest(control.untouched()));
    assert_eq!(latest(control.dirty()), !latest(control.pristine()));
    assert_eq!(latest(control.valid()), !latest(control.invalid()));
}

proptest! {
    #[test]
    fn complementary_flags_never_disagree(
        steps in proptest::collection::vec((0usize..3, step()), 0..48)
    ) {
        let (group, a, b) = pair();
        let controls = [group, a, b];
        for (target, step) in &steps {
            apply(&controls[*target], step);
            for control in &controls {
                assert_pairs(control);
            }
        }
    }

    #[test]
    fn group_flag_is_and_of_children(
        a_on in any::<bool>(),
        b_on in any::<bool>(),
    ) {
        let (group, a, b) = pair();
        a.set_valid_state(a_on);
        b.set_valid_state(b_on);
        prop_assert_eq!(latest(group.valid()), a_on && b_on);
    }
}
