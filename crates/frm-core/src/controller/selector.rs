//! A leaf that picks its value from a list of options.

use std::fmt;
use std::rc::Rc;

use frm_reactive::{Observable, Stream};

use super::{ControlConfig, Flag, FormControl, LeafController};
use crate::operation::Operation;
use crate::operators::use_value;
use crate::value::Value;

/// One choice offered by a selector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorOption {
    pub value: Value,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
}

impl SelectorOption {
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label to display. Falls back to the value itself.
    #[must_use]
    pub fn display_label(&self) -> String {
        match (&self.label, &self.value) {
            (Some(label), _) => label.clone(),
            (None, Value::String(s)) => s.clone(),
            (None, value) => value.to_string(),
        }
    }
}

/// Control configuration plus the options to choose from.
///
/// The default offers no options.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub control: ControlConfig,
    /// Options pushed into the selector whenever they emit.
    pub options: Operation<Vec<SelectorOption>>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            control: ControlConfig::default(),
            options: use_value(Vec::new()),
        }
    }
}

impl SelectorConfig {
    #[must_use]
    pub fn with_control(mut self, control: ControlConfig) -> Self {
        self.control = control;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Operation<Vec<SelectorOption>>) -> Self {
        self.options = options;
        self
    }
}

struct SelectorInner {
    options_config: Operation<Vec<SelectorOption>>,
    options: Observable<Vec<SelectorOption>>,
}

/// A leaf controller that also holds its current list of options.
///
/// The value is not checked against the options; a value outside the list
/// is kept as written.
#[derive(Clone)]
pub struct SelectorController {
    leaf: LeafController,
    inner: Rc<SelectorInner>,
}

impl SelectorController {
    #[must_use]
    pub fn new(config: SelectorConfig) -> Self {
        let SelectorConfig { control, options } = config;
        Self {
            leaf: LeafController::new(control),
            inner: Rc::new(SelectorInner {
                options_config: options,
                options: Observable::new(Vec::new()),
            }),
        }
    }

    /// The configured options operation.
    #[must_use]
    pub fn options_config(&self) -> &Operation<Vec<SelectorOption>> {
        &self.inner.options_config
    }

    /// Current options, replayed to each subscriber and then on change.
    #[must_use]
    pub fn options(&self) -> Stream<Vec<SelectorOption>> {
        self.inner.options.stream()
    }

    #[must_use]
    pub fn current_options(&self) -> Vec<SelectorOption> {
        self.inner.options.get()
    }

    pub fn set_options(&self, options: Vec<SelectorOption>) {
        self.inner.options.set(options);
    }

    /// The option whose value equals the current value, if any.
    #[must_use]
    pub fn selected(&self) -> Option<SelectorOption> {
        let value = self.leaf.current_value();
        self.inner
            .options
            .with(|options| options.iter().find(|option| option.value == value).cloned())
    }

    #[must_use]
    pub fn leaf(&self) -> &LeafController {
        &self.leaf
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl FormControl for SelectorController {
    fn name(&self) -> Option<String> {
        self.leaf.name()
    }

    fn set_name(&self, name: &str) {
        self.leaf.set_name(name);
    }

    fn config(&self) -> &ControlConfig {
        self.leaf.config()
    }

    fn value(&self) -> Stream<Value> {
        self.leaf.value()
    }

    fn write_value(&self, value: Value) {
        self.leaf.write_value(value);
    }

    fn update_value(&self, f: &dyn Fn(&Value) -> Value) {
        self.leaf.update_value(f);
    }

    fn flag(&self, flag: Flag) -> Stream<bool> {
        self.leaf.flag(flag)
    }

    fn set_flag(&self, flag: Flag, on: bool) {
        self.leaf.set_flag(flag, on);
    }

    fn update_flag(&self, flag: Flag, f: &dyn Fn(bool) -> bool) {
        self.leaf.update_flag(flag, f);
    }

    /// Clears the value and interaction flags. Options are kept.
    fn reset(&self) {
        self.leaf.reset();
    }
}

impl fmt::Debug for SelectorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorController")
            .field("leaf", &self.leaf)
            .field("options", &self.inner.options.get().len())
            .finish()
    }
}
