//! Resolving operations outside a binding engine.

use frm_reactive::Stream;

use crate::context::FormContext;
use crate::error::{FormError, Result};
use crate::mount::{ControlMount, GroupMount};
use crate::operation::Operation;

/// Anything that can hand out the form context it lives in.
pub trait ContextProvider {
    fn form_context(&self) -> Option<&FormContext>;
}

impl ContextProvider for FormContext {
    fn form_context(&self) -> Option<&FormContext> {
        Some(self)
    }
}

impl ContextProvider for ControlMount {
    fn form_context(&self) -> Option<&FormContext> {
        Some(self.context())
    }
}

impl ContextProvider for GroupMount {
    fn form_context(&self) -> Option<&FormContext> {
        Some(self.context())
    }
}

impl<P: ContextProvider> ContextProvider for Option<P> {
    fn form_context(&self) -> Option<&FormContext> {
        self.as_ref().and_then(ContextProvider::form_context)
    }
}

/// Resolve `op` against the provider's context.
///
/// Fails with [`FormError::MissingContext`] when there is no provider or
/// the provider has no context.
pub fn operate<T: 'static>(
    provider: Option<&dyn ContextProvider>,
    op: &Operation<T>,
) -> Result<Stream<T>> {
    let ctx = provider
        .and_then(ContextProvider::form_context)
        .ok_or(FormError::MissingContext { operation: "operate" })?;
    op.resolve(ctx)
}
