//! A controller owning its own state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use frm_reactive::{Observable, Stream};

use super::{ControlConfig, Flag, FormControl};
use crate::value::Value;

struct LeafInner {
    name: RefCell<Option<String>>,
    config: ControlConfig,
    value: Observable<Value>,
    enabled: Observable<bool>,
    touched: Observable<bool>,
    dirty: Observable<bool>,
    valid: Observable<bool>,
}

/// A single field: unset, enabled, untouched, pristine and provisionally
/// valid until validators run.
#[derive(Clone)]
pub struct LeafController {
    inner: Rc<LeafInner>,
}

impl LeafController {
    #[must_use]
    pub fn new(config: ControlConfig) -> Self {
        Self {
            inner: Rc::new(LeafInner {
                name: RefCell::new(None),
                config,
                value: Observable::new(Value::Null),
                enabled: Observable::new(Flag::Enabled.initial()),
                touched: Observable::new(Flag::Touched.initial()),
                dirty: Observable::new(Flag::Dirty.initial()),
                valid: Observable::new(Flag::Valid.initial()),
            }),
        }
    }

    /// The current value without subscribing.
    #[must_use]
    pub fn current_value(&self) -> Value {
        self.inner.value.get()
    }

    /// Number of changes the value has gone through.
    #[must_use]
    pub fn value_version(&self) -> u64 {
        self.inner.value.version()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn cell(&self, flag: Flag) -> &Observable<bool> {
        match flag {
            Flag::Enabled => &self.inner.enabled,
            Flag::Touched => &self.inner.touched,
            Flag::Dirty => &self.inner.dirty,
            Flag::Valid => &self.inner.valid,
        }
    }
}

impl FormControl for LeafController {
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
        self.inner.value.stream()
    }

    fn write_value(&self, value: Value) {
        self.inner.value.set(value);
    }

    fn update_value(&self, f: &dyn Fn(&Value) -> Value) {
        self.inner.value.update(f);
    }

    fn flag(&self, flag: Flag) -> Stream<bool> {
        self.cell(flag).stream()
    }

    fn set_flag(&self, flag: Flag, on: bool) {
        self.cell(flag).set(on);
    }

    fn update_flag(&self, flag: Flag, f: &dyn Fn(bool) -> bool) {
        self.cell(flag).update(|current| f(*current));
    }

    fn reset(&self) {
        self.inner.value.set(Value::Null);
        self.inner.touched.set(false);
        self.inner.dirty.set(false);
    }
}

impl fmt::Debug for LeafController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafController")
            .field("name", &self.inner.name.borrow())
            .field("value", &self.inner.value.get())
            .field("enabled", &self.inner.enabled.get())
            .field("touched", &self.inner.touched.get())
            .field("dirty", &self.inner.dirty.get())
            .field("valid", &self.inner.valid.get())
            .finish()
    }
}
