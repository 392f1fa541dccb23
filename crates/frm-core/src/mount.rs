//! Mount lifecycle for controls and groups.
//!
//! A mount owns everything one rendered control needs: its context node,
//! its binding engine and its view. The host drives three phases:
//!
//! 1. `init` creates the context under the parent and renders the view.
//! 2. [`ControlMount::after_view_init`] binds the input found in the view.
//! 3. Dropping the mount tears the engine down and destroys the view.

use std::fmt;
use std::rc::Rc;

use crate::context::FormContext;
use crate::controller::Controller;
use crate::engine::BindingEngine;
use crate::error::Result;
use crate::host::{EmbeddedView, ViewContainer};

/// Options for [`ControlMount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MountOptions {
    /// Fail when the rendered view contains no bindable input.
    pub require_accessor: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            require_accessor: true,
        }
    }
}

/// A rendered, bound control.
pub struct ControlMount {
    context: FormContext,
    engine: Option<BindingEngine>,
    view: Rc<dyn EmbeddedView>,
    options: MountOptions,
}

impl ControlMount {
    /// Create the context node and render the control into `container`.
    pub fn init(
        controller: Controller,
        parent: Option<&FormContext>,
        container: Rc<dyn ViewContainer>,
        options: MountOptions,
    ) -> Result<Self> {
        let context = FormContext::create(controller, parent)?;
        let mut engine = BindingEngine::new(context.clone());
        let view = engine.render_controller(container)?;
        Ok(Self {
            context,
            engine: Some(engine),
            view,
            options,
        })
    }

    /// Bind the view's input. Returns whether one was found.
    pub fn after_view_init(&mut self) -> Result<bool> {
        match self.engine.as_mut() {
            Some(engine) => {
                engine.bind_view_accessor(self.view.as_ref(), self.options.require_accessor)
            }
            None => Ok(false),
        }
    }

    #[must_use]
    pub fn context(&self) -> &FormContext {
        &self.context
    }

    #[must_use]
    pub fn view(&self) -> &Rc<dyn EmbeddedView> {
        &self.view
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.engine
            .as_ref()
            .map_or(0, BindingEngine::subscription_count)
    }
}

impl Drop for ControlMount {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.destroy();
        }
        self.view.destroy();
    }
}

impl fmt::Debug for ControlMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlMount")
            .field("context", &self.context)
            .field("engine", &self.engine)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A rendered group: a composite context node whose children mount
/// beneath it.
pub struct GroupMount {
    context: FormContext,
    engine: Option<BindingEngine>,
    view: Rc<dyn EmbeddedView>,
}

impl GroupMount {
    pub fn init(
        controller: Controller,
        parent: Option<&FormContext>,
        container: Rc<dyn ViewContainer>,
    ) -> Result<Self> {
        let context = FormContext::create(controller, parent)?;
        let mut engine = BindingEngine::new(context.clone());
        let view = engine.render_group(container)?;
        Ok(Self {
            context,
            engine: Some(engine),
            view,
        })
    }

    /// The context children pass as their parent.
    #[must_use]
    pub fn context(&self) -> &FormContext {
        &self.context
    }

    #[must_use]
    pub fn view(&self) -> &Rc<dyn EmbeddedView> {
        &self.view
    }
}

impl Drop for GroupMount {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.destroy();
        }
        self.view.destroy();
    }
}

impl fmt::Debug for GroupMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupMount")
            .field("context", &self.context)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
