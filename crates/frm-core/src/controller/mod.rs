//! Controllers: the stateful side of a form.
//!
//! A controller exposes its value and four boolean flags as hot
//! [`Stream`]s that replay the latest value to each new subscriber, plus
//! imperative setters and read-modify-write updaters.
//!
//! | Stored flag | Complement |
//! |-------------|------------|
//! | enabled | disabled |
//! | touched | untouched |
//! | dirty | pristine |
//! | valid | invalid |
//!
//! Only the left column is stored. The complement streams and setters are
//! derived by negation, so a pair can never disagree.
//!
//! [`LeafController`] owns its state. [`GroupController`] owns none: it
//! joins its children's streams and fans writes out to them.
//! [`SelectorController`] is a leaf that also carries a list of options.

pub mod config;
pub mod group;
pub mod leaf;
pub mod selector;

use frm_reactive::Stream;

pub use config::ControlConfig;
pub use group::GroupController;
pub use leaf::LeafController;
pub use selector::{SelectorConfig, SelectorController, SelectorOption};

use crate::error::Result;
use crate::value::Value;

/// A stored boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Enabled,
    Touched,
    Dirty,
    Valid,
}

impl Flag {
    /// Every stored flag.
    pub const ALL: [Self; 4] = [Self::Enabled, Self::Touched, Self::Dirty, Self::Valid];

    /// Initial value on a fresh leaf.
    #[must_use]
    pub const fn initial(self) -> bool {
        matches!(self, Self::Enabled | Self::Valid)
    }
}

/// Capability shared by leaf and group controllers.
pub trait FormControl {
    /// Key within the parent group; `None` for a root control.
    fn name(&self) -> Option<String>;

    /// Assign the key. Groups call this on their children.
    fn set_name(&self, name: &str);

    /// The operation-valued configuration.
    fn config(&self) -> &ControlConfig;

    /// Hot stream of the current value.
    fn value(&self) -> Stream<Value>;

    /// Replace the value.
    fn write_value(&self, value: Value);

    /// Apply `f` once to the value current at call time and write the result.
    fn update_value(&self, f: &dyn Fn(&Value) -> Value);

    /// Hot stream of a stored flag.
    fn flag(&self, flag: Flag) -> Stream<bool>;

    /// Set a stored flag.
    fn set_flag(&self, flag: Flag, on: bool);

    /// Read-modify-write a stored flag.
    fn update_flag(&self, flag: Flag, f: &dyn Fn(bool) -> bool);

    /// Clear the value and return to untouched and pristine.
    fn reset(&self);

    fn enabled(&self) -> Stream<bool> {
        self.flag(Flag::Enabled)
    }

    fn disabled(&self) -> Stream<bool> {
        self.flag(Flag::Enabled).map(|on| !*on)
    }

    fn touched(&self) -> Stream<bool> {
        self.flag(Flag::Touched)
    }

    fn untouched(&self) -> Stream<bool> {
        self.flag(Flag::Touched).map(|on| !*on)
    }

    fn dirty(&self) -> Stream<bool> {
        self.flag(Flag::Dirty)
    }

    fn pristine(&self) -> Stream<bool> {
        self.flag(Flag::Dirty).map(|on| !*on)
    }

    fn valid(&self) -> Stream<bool> {
        self.flag(Flag::Valid)
    }

    fn invalid(&self) -> Stream<bool> {
        self.flag(Flag::Valid).map(|on| !*on)
    }

    fn set_enable_state(&self, enabled: bool) {
        self.set_flag(Flag::Enabled, enabled);
    }

    fn set_disable_state(&self, disabled: bool) {
        self.set_flag(Flag::Enabled, !disabled);
    }

    fn set_touched_state(&self, touched: bool) {
        self.set_flag(Flag::Touched, touched);
    }

    fn set_untouched_state(&self, untouched: bool) {
        self.set_flag(Flag::Touched, !untouched);
    }

    fn set_dirty_state(&self, dirty: bool) {
        self.set_flag(Flag::Dirty, dirty);
    }

    fn set_pristine_state(&self, pristine: bool) {
        self.set_flag(Flag::Dirty, !pristine);
    }

    fn set_valid_state(&self, valid: bool) {
        self.set_flag(Flag::Valid, valid);
    }

    fn set_invalid_state(&self, invalid: bool) {
        self.set_flag(Flag::Valid, !invalid);
    }

    fn update_enable_state(&self, f: impl Fn(bool) -> bool)
    where
        Self: Sized,
    {
        self.update_flag(Flag::Enabled, &f);
    }

    /// `f` sees and returns the disabled state.
    fn update_disable_state(&self, f: impl Fn(bool) -> bool)
    where
        Self: Sized,
    {
        self.update_flag(Flag::Enabled, &|enabled| !f(!enabled));
    }

    fn update_touched_state(&self, f: impl Fn(bool) -> bool)
    where
        Self: Sized,
    {
        self.update_flag(Flag::Touched, &f);
    }

    fn update_untouched_state(&self, f: impl Fn(bool) -> bool)
    where
        Self: Sized,
    {
        self.update_flag(Flag::Touched, &|touched| !f(!touched));
    }

    fn update_dirty_state(&self, f: impl Fn(bool) -> bool)
    where
        Self: Sized,
    {
        self.update_flag(Flag::Dirty, &f);
    }

    fn update_pristine_state(&self, f: impl Fn(bool) -> bool)
    where
        Self: Sized,
    {
        self.update_flag(Flag::Dirty, &|dirty| !f(!dirty));
    }

    fn update_valid_state(&self, f: impl Fn(bool) -> bool)
    where
        Self: Sized,
    {
        self.update_flag(Flag::Valid, &f);
    }

    fn update_invalid_state(&self, f: impl Fn(bool) -> bool)
    where
        Self: Sized,
    {
        self.update_flag(Flag::Valid, &|valid| !f(!valid));
    }
}

/// Cheap-clone handle to either kind of controller.
#[derive(Debug, Clone)]
pub enum Controller {
    Leaf(LeafController),
    Group(GroupController),
    Selector(SelectorController),
}

impl Controller {
    fn as_control(&self) -> &dyn FormControl {
        match self {
            Self::Leaf(leaf) => leaf,
            Self::Group(group) => group,
            Self::Selector(selector) => selector,
        }
    }

    /// The group behind this handle, if any.
    #[must_use]
    pub fn as_group(&self) -> Option<&GroupController> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) | Self::Selector(_) => None,
        }
    }

    /// The leaf behind this handle, if any.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&LeafController> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Selector(selector) => Some(selector.leaf()),
            Self::Group(_) => None,
        }
    }

    /// The selector behind this handle, if any.
    #[must_use]
    pub fn as_selector(&self) -> Option<&SelectorController> {
        match self {
            Self::Selector(selector) => Some(selector),
            Self::Leaf(_) | Self::Group(_) => None,
        }
    }

    /// Whether both handles point at the same controller.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a.ptr_eq(b),
            (Self::Group(a), Self::Group(b)) => a.ptr_eq(b),
            (Self::Selector(a), Self::Selector(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl FormControl for Controller {
    fn name(&self) -> Option<String> {
        self.as_control().name()
    }

    fn set_name(&self, name: &str) {
        self.as_control().set_name(name);
    }

    fn config(&self) -> &ControlConfig {
        self.as_control().config()
    }

    fn value(&self) -> Stream<Value> {
        self.as_control().value()
    }

    fn write_value(&self, value: Value) {
        self.as_control().write_value(value);
    }

    fn update_value(&self, f: &dyn Fn(&Value) -> Value) {
        self.as_control().update_value(f);
    }

    fn flag(&self, flag: Flag) -> Stream<bool> {
        self.as_control().flag(flag)
    }

    fn set_flag(&self, flag: Flag, on: bool) {
        self.as_control().set_flag(flag, on);
    }

    fn update_flag(&self, flag: Flag, f: &dyn Fn(bool) -> bool) {
        self.as_control().update_flag(flag, f);
    }

    fn reset(&self) {
        self.as_control().reset();
    }
}

impl From<LeafController> for Controller {
    fn from(leaf: LeafController) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<GroupController> for Controller {
    fn from(group: GroupController) -> Self {
        Self::Group(group)
    }
}

impl From<SelectorController> for Controller {
    fn from(selector: SelectorController) -> Self {
        Self::Selector(selector)
    }
}

/// A new leaf control.
#[must_use]
pub fn create_controller(config: ControlConfig) -> Controller {
    LeafController::new(config).into()
}

/// A new selector: a leaf with a list of options to choose from.
#[must_use]
pub fn create_selector(config: SelectorConfig) -> Controller {
    SelectorController::new(config).into()
}

/// A new group over `children`, naming each child by its key.
///
/// Fails with [`FormError::DuplicateChild`](crate::FormError::DuplicateChild)
/// when a key repeats.
pub fn create_group_controller<K: Into<String>>(
    children: impl IntoIterator<Item = (K, Controller)>,
    config: ControlConfig,
) -> Result<Controller> {
    Ok(GroupController::new(children, config)?.into())
}
