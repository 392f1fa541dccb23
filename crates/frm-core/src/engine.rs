//! Live wiring between a configuration, a controller and the host.
//!
//! A [`BindingEngine`] owns one [`BindingScope`]. Every subscription it
//! creates, for configuration streams and for the input adapter, lands in
//! that scope, and [`BindingEngine::destroy`] releases the scope exactly once.
//!
//! # Setup order
//!
//! [`BindingEngine::render_controller`] resolves every configured operation
//! before subscribing to any, so a resolution error leaves nothing behind.
//! It then subscribes in this order:
//!
//! 1. context data, into the context node and the view scope
//! 2. value, into the controller
//! 3. disabled, into the controller, then a selector's options
//! 4. hide, detaching or re-inserting the view on each transition
//! 5. validators against the controller's value, into validity
//!
//! [`BindingEngine::render_group`] performs only steps 1 and 4. A group's
//! state lives in its children, which have engines of their own.
//!
//! # Validity
//!
//! Whenever the validator list or the controller's value changes, every
//! validator runs against the current value and the latest results are
//! ANDed. An empty list is valid. A validator that returns an error counts
//! as `false` and is logged at `warn`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use frm_reactive::{BindingScope, Stream, Subscription, combine_latest};
use tracing::{debug, trace, warn};

use crate::context::FormContext;
use crate::controller::FormControl;
use crate::error::{FormError, Result};
use crate::host::{EmbeddedView, ValueAccessor, ViewContainer, template_scope};
use crate::validators::Validator;
use crate::value::{ContextData, Value};

/// Binds one context's controller to its configuration and its input.
pub struct BindingEngine {
    context: FormContext,
    scope: BindingScope,
    armed: Rc<Cell<bool>>,
}

impl BindingEngine {
    #[must_use]
    pub fn new(context: FormContext) -> Self {
        Self {
            context,
            scope: BindingScope::new("binding-engine"),
            armed: Rc::new(Cell::new(false)),
        }
    }

    /// Like [`BindingEngine::new`], failing with
    /// [`FormError::MissingContext`] when there is no context.
    pub fn try_new(context: Option<FormContext>) -> Result<Self> {
        context.map(Self::new).ok_or(FormError::MissingContext {
            operation: "BindingEngine",
        })
    }

    #[must_use]
    pub fn context(&self) -> &FormContext {
        &self.context
    }

    /// Number of live subscriptions held.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.scope.len()
    }

    /// Create the view and start driving the controller from its
    /// configuration. Returns the attached view; the caller destroys it.
    pub fn render_controller(
        &mut self,
        container: Rc<dyn ViewContainer>,
    ) -> Result<Rc<dyn EmbeddedView>> {
        let ctx = self.context.clone();
        let control: Rc<str> = Rc::from(ctx.path());
        let controller = ctx.controller().clone();
        let config = controller.config().clone();

        let context_data = config.context_data.resolve(&ctx)?;
        let value = config.value.resolve(&ctx)?;
        let disabled = config.disabled.resolve(&ctx)?;
        let hide = config.hide.resolve(&ctx)?;
        let validators = config.validators.resolve(&ctx)?;
        let options = controller
            .as_selector()
            .map(|selector| selector.options_config().resolve(&ctx))
            .transpose()?;

        let view = container.create_view(&template_scope(&ctx.data()));

        self.bind_context_data(&context_data, &view);
        {
            let controller = controller.clone();
            self.scope
                .subscribe(&value, move |value| controller.write_value(value.clone()));
        }
        {
            let controller = controller.clone();
            self.scope.subscribe(&disabled, move |disabled| {
                controller.set_disable_state(*disabled);
            });
        }
        if let (Some(options), Some(selector)) = (options, controller.as_selector()) {
            let selector = selector.clone();
            self.scope
                .subscribe(&options, move |options| selector.set_options(options.clone()));
        }
        self.bind_hide(&hide, container, &view, &control);
        {
            let validity = validity(validators, controller.value(), Rc::clone(&control));
            self.scope.subscribe(&validity, move |valid| {
                controller.set_valid_state(*valid);
            });
        }

        debug!(
            control = %control,
            subscriptions = self.scope.len(),
            "controller rendered"
        );
        Ok(view)
    }

    /// Create the view for a group and drive only its context data and
    /// visibility. Value, disabled state and validity stay with the
    /// children's own engines.
    pub fn render_group(
        &mut self,
        container: Rc<dyn ViewContainer>,
    ) -> Result<Rc<dyn EmbeddedView>> {
        let ctx = self.context.clone();
        let control: Rc<str> = Rc::from(ctx.path());
        let config = ctx.controller().config().clone();

        let context_data = config.context_data.resolve(&ctx)?;
        let hide = config.hide.resolve(&ctx)?;

        let view = container.create_view(&template_scope(&ctx.data()));
        self.bind_context_data(&context_data, &view);
        self.bind_hide(&hide, container, &view, &control);

        debug!(
            control = %control,
            subscriptions = self.scope.len(),
            "group rendered"
        );
        Ok(view)
    }

    fn bind_context_data(
        &mut self,
        context_data: &Stream<ContextData>,
        view: &Rc<dyn EmbeddedView>,
    ) {
        let ctx = self.context.clone();
        let view = Rc::clone(view);
        self.scope.subscribe(context_data, move |data| {
            ctx.set_data(data.clone());
            view.set_scope(&template_scope(data));
        });
    }

    fn bind_hide(
        &mut self,
        hide: &Stream<bool>,
        container: Rc<dyn ViewContainer>,
        view: &Rc<dyn EmbeddedView>,
        control: &Rc<str>,
    ) {
        let attached = Cell::new(true);
        let view = Rc::clone(view);
        let control = Rc::clone(control);
        self.scope.subscribe(hide, move |hidden| {
            let hidden = *hidden;
            if attached.get() == !hidden {
                return;
            }
            if hidden {
                container.detach(&view);
            } else {
                container.insert(&view);
            }
            attached.set(!hidden);
            trace!(control = %control, hidden, "view visibility changed");
        });
    }

    /// Keep `accessor` and the controller in sync.
    ///
    /// Controller value and disabled state flow into the accessor. User
    /// input writes the value and marks the controller dirty; focus loss
    /// marks it touched. Input events are ignored once the engine is
    /// destroyed.
    pub fn bind_to_accessor(&mut self, accessor: Rc<dyn ValueAccessor>) {
        let controller = self.context.controller().clone();
        // Value the adapter just sent; only its own echo is held back.
        let echo: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));

        {
            let accessor = Rc::clone(&accessor);
            let echo = Rc::clone(&echo);
            self.scope.subscribe(&controller.value(), move |value| {
                let sent = echo.borrow_mut().take();
                if sent.as_ref() != Some(value) {
                    accessor.write_value(value);
                }
            });
        }
        {
            let accessor = Rc::clone(&accessor);
            self.scope.subscribe(&controller.disabled(), move |disabled| {
                accessor.set_disabled_state(*disabled);
            });
        }

        self.armed.set(true);
        {
            let controller = controller.clone();
            let armed = Rc::clone(&self.armed);
            accessor.register_on_change(Box::new(move |value: Value| {
                if !armed.get() {
                    return;
                }
                *echo.borrow_mut() = Some(value.clone());
                controller.write_value(value);
                echo.borrow_mut().take();
                controller.set_dirty_state(true);
            }));
        }
        {
            let armed = Rc::clone(&self.armed);
            accessor.register_on_touched(Box::new(move || {
                if armed.get() {
                    controller.set_touched_state(true);
                }
            }));
        }
        let armed = Rc::clone(&self.armed);
        self.scope.hold(Subscription::new(move || armed.set(false)));

        debug!(control = %self.context.path(), "accessor bound");
    }

    /// Bind the accessor found in `view`, if any.
    ///
    /// Returns whether one was bound. Fails with
    /// [`FormError::AccessorNotFound`] when `required` and none exists.
    pub fn bind_view_accessor(&mut self, view: &dyn EmbeddedView, required: bool) -> Result<bool> {
        match view.locate_accessor() {
            Some(accessor) => {
                self.bind_to_accessor(accessor);
                Ok(true)
            }
            None if required => Err(FormError::AccessorNotFound {
                control: self.context.path(),
            }),
            None => Ok(false),
        }
    }

    /// Cancel every subscription and disarm the accessor callbacks.
    /// Returns how many subscriptions were released.
    pub fn destroy(self) -> usize {
        let Self { context, scope, .. } = self;
        let released = scope.release();
        debug!(
            control = %context.path(),
            subscriptions = released,
            "binding engine torn down"
        );
        released
    }
}

impl fmt::Debug for BindingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingEngine")
            .field("context", &self.context.path())
            .field("subscriptions", &self.scope.len())
            .field("armed", &self.armed.get())
            .finish()
    }
}

fn validity(
    validators: Stream<Vec<Validator>>,
    value: Stream<Value>,
    control: Rc<str>,
) -> Stream<bool> {
    validators.switch_map(move |validators| {
        let validators: Rc<[Validator]> = Rc::from(validators.as_slice());
        let control = Rc::clone(&control);
        value.switch_map(move |value| run_validators(&validators, value, &control))
    })
}

fn run_validators(validators: &[Validator], value: &Value, control: &str) -> Stream<bool> {
    if validators.is_empty() {
        return Stream::of(true);
    }
    let results = validators
        .iter()
        .map(|validator| {
            validator.run(value).unwrap_or_else(|err| {
                warn!(
                    control,
                    validator = validator.name(),
                    error = %err,
                    "validator failed; counting as invalid"
                );
                Stream::of(false)
            })
        })
        .collect();
    trace!(control, validators = validators.len(), "validity recomputed");
    combine_latest(results).map(|results| results.iter().all(|ok| *ok))
}
