//! A controller aggregating named children.
//!
//! A group stores no state of its own. Its value is the keyed latest-value
//! join of its children's values, and each stored flag is the AND over the
//! children's flags. Writes and flag changes fan out to the children.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use frm_reactive::{Stream, combine_latest};
use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use super::{ControlConfig, Controller, Flag, FormControl};
use crate::context::ROOT_NAME;
use crate::error::{FormError, Result};
use crate::value::{Map, Value};

struct GroupInner {
    name: RefCell<Option<String>>,
    config: ControlConfig,
    children: IndexMap<String, Controller>,
}

/// An ordered, fixed set of named child controllers.
#[derive(Clone)]
pub struct GroupController {
    inner: Rc<GroupInner>,
}

impl GroupController {
    /// Build a group, assigning each child its key as name.
    ///
    /// Fails with [`FormError::DuplicateChild`] when a key repeats.
    pub fn new<K: Into<String>>(
        children: impl IntoIterator<Item = (K, Controller)>,
        config: ControlConfig,
    ) -> Result<Self> {
        let mut map = IndexMap::new();
        for (key, child) in children {
            match map.entry(key.into()) {
                Entry::Occupied(entry) => {
                    return Err(FormError::DuplicateChild {
                        group: ROOT_NAME.to_string(),
                        key: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    child.set_name(entry.key());
                    entry.insert(child);
                }
            }
        }
        Ok(Self {
            inner: Rc::new(GroupInner {
                name: RefCell::new(None),
                config,
                children: map,
            }),
        })
    }

    /// The child named `key`.
    pub fn get(&self, key: &str) -> Result<Controller> {
        self.inner
            .children
            .get(key)
            .cloned()
            .ok_or_else(|| FormError::UnknownChild {
                group: self.label(),
                key: key.to_string(),
            })
    }

    /// Whether a child named `key` exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.children.contains_key(key)
    }

    /// Children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Controller)> {
        self.inner
            .children
            .iter()
            .map(|(key, child)| (key.as_str(), child))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.children.is_empty()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn label(&self) -> String {
        self.name().unwrap_or_else(|| ROOT_NAME.to_string())
    }
}

impl FormControl for GroupController {
    fn name(&self) -> Option<String> {
        self.inner.name.borrow().clone()
    }

    fn set_name(&self, name: &str) {
        *self.inner.name.borrow_mut() = Some(name.to_string());
    }

    fn config(&self) -> &ControlConfig {
        &self.inner.config
    }

    fn value(&self) -> Stream<Value> {
        if self.is_empty() {
            return Stream::of(Value::Object(Map::new()));
        }
        let keys: Rc<Vec<String>> = Rc::new(self.inner.children.keys().cloned().collect());
        let values = self.inner.children.values().map(FormControl::value).collect();
        combine_latest(values).map(move |values| {
            Value::Object(keys.iter().cloned().zip(values.iter().cloned()).collect())
        })
    }

    /// Writes each key present in `value` to the matching child. Absent
    /// keys are left alone; unknown keys and non-object values are ignored.
    fn write_value(&self, value: Value) {
        let Value::Object(fields) = value else {
            debug!(group = %self.label(), "ignoring non-object group write");
            return;
        };
        for (key, field) in fields {
            match self.inner.children.get(&key) {
                Some(child) => child.write_value(field),
                None => debug!(group = %self.label(), key = %key, "ignoring unknown group key"),
            }
        }
    }

    fn update_value(&self, f: &dyn Fn(&Value) -> Value) {
        let current = self
            .value()
            .latest()
            .unwrap_or_else(|| Value::Object(Map::new()));
        self.write_value(f(&current));
    }

    fn flag(&self, flag: Flag) -> Stream<bool> {
        if self.is_empty() {
            return Stream::of(true);
        }
        let flags = self
            .inner
            .children
            .values()
            .map(|child| child.flag(flag))
            .collect();
        combine_latest(flags).map(|values| values.iter().all(|on| *on))
    }

    fn set_flag(&self, flag: Flag, on: bool) {
        for child in self.inner.children.values() {
            child.set_flag(flag, on);
        }
    }

    fn update_flag(&self, flag: Flag, f: &dyn Fn(bool) -> bool) {
        for child in self.inner.children.values() {
            child.update_flag(flag, f);
        }
    }

    fn reset(&self) {
        for child in self.inner.children.values() {
            child.reset();
        }
    }
}

impl fmt::Debug for GroupController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupController")
            .field("name", &self.inner.name.borrow())
            .field("children", &self.inner.children.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::create_controller;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    fn pair() -> (GroupController, Controller, Controller) {
        let a = create_controller(ControlConfig::default());
        let b = create_controller(ControlConfig::default());
        let group = GroupController::new(
            [("a", a.clone()), ("b", b.clone())],
            ControlConfig::default(),
        )
        .expect("distinct keys");
        (group, a, b)
    }

    #[test]
    fn children_are_named_by_key() {
        let (group, a, b) = pair();
        assert_eq!(a.name().as_deref(), Some("a"));
        assert_eq!(b.name().as_deref(), Some("b"));
        let keys: Vec<&str> = group.children().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn value_is_keyed_join() {
        let (group, a, b) = pair();
        a.write_value(json!(1));
        b.write_value(json!("two"));
        assert_eq!(group.value().latest(), Some(json!({"a": 1, "b": "two"})));
    }

    #[test]
    fn partial_write_leaves_other_children() {
        let (group, a, b) = pair();
        b.write_value(json!("keep"));
        group.write_value(json!({"a": 5}));
        assert_eq!(a.value().latest(), Some(json!(5)));
        assert_eq!(b.value().latest(), Some(json!("keep")));
    }

    #[test]
    #[traced_test]
    fn unknown_keys_and_scalars_are_ignored() {
        let (group, a, _b) = pair();
        group.write_value(json!({"zzz": 1}));
        group.write_value(json!(3));
        assert_eq!(a.value().latest(), Some(Value::Null));
        assert!(logs_contain("ignoring unknown group key"));
        assert!(logs_contain("ignoring non-object group write"));
    }

    #[test]
    fn enabled_is_and_of_children() {
        let (group, a, _b) = pair();
        assert_eq!(group.enabled().latest(), Some(true));
        a.set_disable_state(true);
        assert_eq!(group.enabled().latest(), Some(false));
        assert_eq!(group.disabled().latest(), Some(true));
    }

    #[test]
    fn flag_writes_fan_out() {
        let (group, a, b) = pair();
        group.set_touched_state(true);
        assert_eq!(a.touched().latest(), Some(true));
        assert_eq!(b.touched().latest(), Some(true));
        group.update_touched_state(|t| !t);
        assert_eq!(group.untouched().latest(), Some(true));
    }

    #[test]
    fn value_stream_emits_fresh_object_per_change() {
        let (group, a, _b) = pair();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = group.value().subscribe(move |v| s.borrow_mut().push(v.clone()));
        a.write_value(json!(1));
        assert_eq!(
            *seen.borrow(),
            vec![json!({"a": null, "b": null}), json!({"a": 1, "b": null})]
        );
    }

    #[test]
    fn update_value_reads_join_once() {
        let (group, a, b) = pair();
        a.write_value(json!(1));
        group.update_value(&|current| json!({"b": current["a"].clone()}));
        assert_eq!(b.value().latest(), Some(json!(1)));
    }

    #[test]
    fn duplicate_and_unknown_keys_fail() {
        let err = GroupController::new(
            [
                ("a", create_controller(ControlConfig::default())),
                ("a", create_controller(ControlConfig::default())),
            ],
            ControlConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            FormError::DuplicateChild {
                group: "root".into(),
                key: "a".into()
            }
        );

        let (group, _a, _b) = pair();
        assert!(matches!(group.get("c"), Err(FormError::UnknownChild { .. })));
        assert!(group.contains("a"));
    }

    #[test]
    fn empty_group_emits_neutral_values() {
        let group =
            GroupController::new(Vec::<(String, Controller)>::new(), ControlConfig::default())
                .expect("empty group");
        assert_eq!(group.value().latest(), Some(json!({})));
        assert_eq!(group.valid().latest(), Some(true));
    }

    #[test]
    fn nested_groups_join_recursively() {
        let street = create_controller(ControlConfig::default());
        let address: Controller =
            GroupController::new([("street", street.clone())], ControlConfig::default())
                .expect("address")
                .into();
        let form = GroupController::new([("address", address)], ControlConfig::default())
            .expect("form");
        form.write_value(json!({"address": {"street": "Main"}}));
        assert_eq!(street.value().latest(), Some(json!("Main")));
        assert_eq!(form.value().latest(), Some(json!({"address": {"street": "Main"}})));
    }
}
