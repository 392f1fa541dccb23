//! Operation-valued control configuration.

use crate::operation::Operation;
use crate::operators::use_value;
use crate::validators::Validator;
use crate::value::{ContextData, Value};

/// Everything a control can be configured with. Each property is an
/// [`Operation`], so it may be constant or computed from other fields.
///
/// The default is the constant configuration: value unset, enabled,
/// visible, no validators, no context data.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Value written into the controller whenever it emits.
    pub value: Operation<Value>,
    /// Disabled state pushed into the controller.
    pub disabled: Operation<bool>,
    /// Whether the rendered view is detached.
    pub hide: Operation<bool>,
    /// Validators whose AND decides validity.
    pub validators: Operation<Vec<Validator>>,
    /// Data injected into the context node and the rendered scope.
    pub context_data: Operation<ContextData>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            value: use_value(Value::Null),
            disabled: use_value(false),
            hide: use_value(false),
            validators: use_value(Vec::new()),
            context_data: use_value(ContextData::new()),
        }
    }
}

impl ControlConfig {
    /// Set the value operation.
    #[must_use]
    pub fn with_value(mut self, value: Operation<Value>) -> Self {
        self.value = value;
        self
    }

    /// Set the disabled operation.
    #[must_use]
    pub fn with_disabled(mut self, disabled: Operation<bool>) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the hide operation.
    #[must_use]
    pub fn with_hide(mut self, hide: Operation<bool>) -> Self {
        self.hide = hide;
        self
    }

    /// Set the validators operation.
    #[must_use]
    pub fn with_validators(mut self, validators: Operation<Vec<Validator>>) -> Self {
        self.validators = validators;
        self
    }

    /// Set the context data operation.
    #[must_use]
    pub fn with_context_data(mut self, context_data: Operation<ContextData>) -> Self {
        self.context_data = context_data;
        self
    }
}
