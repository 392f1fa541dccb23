//! Contracts with the rendering layer and the input adapter.
//!
//! The core never draws anything. It asks a [`ViewContainer`] for an
//! [`EmbeddedView`], attaches or detaches it, feeds it template data, and
//! asks it for the [`ValueAccessor`] that bridges a concrete input.

use std::rc::Rc;

use crate::value::{ContextData, Value};

/// Template key under which the whole injected data object is exposed.
pub const IMPLICIT_KEY: &str = "$implicit";

/// Two-way bridge to a concrete input.
pub trait ValueAccessor {
    /// Show `value` in the input.
    fn write_value(&self, value: &Value);

    /// Called with the new value whenever the user edits the input.
    fn register_on_change(&self, on_change: Box<dyn Fn(Value)>);

    /// Called when the input loses focus.
    fn register_on_touched(&self, on_touched: Box<dyn Fn()>);

    fn set_disabled_state(&self, disabled: bool);
}

/// A rendered region owned by the rendering layer.
pub trait EmbeddedView {
    /// Replace the template scope.
    fn set_scope(&self, scope: &ContextData);

    /// The bindable input inside the view, if there is one.
    fn locate_accessor(&self) -> Option<Rc<dyn ValueAccessor>>;

    fn destroy(&self);
}

/// The place a control's view is mounted.
pub trait ViewContainer {
    /// Render a new view with `scope`. The view starts attached.
    fn create_view(&self, scope: &ContextData) -> Rc<dyn EmbeddedView>;

    /// Attach a detached view.
    fn insert(&self, view: &Rc<dyn EmbeddedView>);

    /// Detach `view` without destroying it.
    fn detach(&self, view: &Rc<dyn EmbeddedView>);
}

/// The scope a template sees: every key of `data`, plus the whole object
/// under [`IMPLICIT_KEY`].
#[must_use]
pub fn template_scope(data: &ContextData) -> ContextData {
    let mut scope = data.clone();
    scope.insert(IMPLICIT_KEY.to_string(), Value::Object(data.clone()));
    scope
}
