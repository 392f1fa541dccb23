//! The context tree.
//!
//! Every mounted control gets a [`FormContext`] node pairing its controller
//! with a name, an optional parent and injectable data. Nodes whose
//! controller is a group also keep a registry of their live child nodes,
//! which field lookups consult.
//!
//! # Invariants
//!
//! 1. A node's name is its controller's name, or [`ROOT_NAME`] when unset.
//! 2. The parent is fixed at creation.
//! 3. No two live children of one node share a name. A child leaves the
//!    registry when its last handle is dropped.
//!
//! # Lookup
//!
//! [`FormContext::lookup`] resolves the nearest enclosing match. Starting at
//! the evaluating node and walking towards the root, each level checks the
//! node itself, then its registered child nodes, then its group's child
//! controllers. Remaining dotted segments descend through groups.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use frm_reactive::{Observable, Stream};
use indexmap::IndexMap;
use tracing::debug;

use crate::controller::{Controller, FormControl};
use crate::error::{FormError, Result};
use crate::value::ContextData;

/// Name of a node whose controller has none.
pub const ROOT_NAME: &str = "root";

type Registry = RefCell<IndexMap<String, Weak<ContextInner>>>;

struct ContextInner {
    name: String,
    controller: Controller,
    parent: Option<FormContext>,
    data: Observable<ContextData>,
    children: Option<Registry>,
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        let Some(parent) = &self.parent else {
            return;
        };
        if let Some(registry) = &parent.inner.children
            && let Ok(mut registry) = registry.try_borrow_mut()
        {
            registry.retain(|_, child| child.strong_count() > 0);
        }
    }
}

/// A node in the context tree. Cloning shares the node.
#[derive(Clone)]
pub struct FormContext {
    inner: Rc<ContextInner>,
}

impl FormContext {
    /// Create a node for `controller` under `parent`.
    ///
    /// Fails with [`FormError::DuplicateContext`] when `parent` already has a
    /// live child of the same name.
    pub fn create(controller: Controller, parent: Option<&FormContext>) -> Result<Self> {
        let mut builder = ContextBuilder::new(controller);
        if let Some(parent) = parent {
            builder = builder.parent(parent);
        }
        builder.build()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Dotted path from the root, e.g. `root.address.street`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut names = vec![self.name()];
        let mut node = self.parent();
        while let Some(ctx) = node {
            names.push(ctx.name());
            node = ctx.parent();
        }
        names.reverse();
        names.join(".")
    }

    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.inner.controller
    }

    #[must_use]
    pub fn parent(&self) -> Option<&FormContext> {
        self.inner.parent.as_ref()
    }

    /// Whether this node keeps a child registry.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.inner.children.is_some()
    }

    /// The live registered child named `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<FormContext> {
        let registry = self.inner.children.as_ref()?;
        let inner = registry.borrow().get(name)?.upgrade()?;
        Some(Self { inner })
    }

    /// Names of the live registered children, in registration order.
    #[must_use]
    pub fn child_names(&self) -> Vec<String> {
        self.inner
            .children
            .as_ref()
            .map(|registry| {
                registry
                    .borrow()
                    .iter()
                    .filter(|(_, child)| child.strong_count() > 0)
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Current injected data.
    #[must_use]
    pub fn data(&self) -> ContextData {
        self.inner.data.get()
    }

    /// Replace the injected data.
    pub fn set_data(&self, data: ContextData) {
        self.inner.data.set(data);
    }

    /// Hot stream of the injected data.
    #[must_use]
    pub fn data_stream(&self) -> Stream<ContextData> {
        self.inner.data.stream()
    }

    /// Resolve a field by (possibly dotted) path.
    ///
    /// Fails with [`FormError::UnknownField`] when nothing matches.
    pub fn lookup(&self, path: &str) -> Result<Controller> {
        let unknown = || FormError::UnknownField {
            field: path.to_string(),
            scope: self.path(),
        };
        let mut segments = path.split('.');
        let head = segments.next().filter(|s| !s.is_empty()).ok_or_else(unknown)?;

        let mut found = None;
        let mut node = Some(self);
        while let Some(ctx) = node {
            found = ctx.find_local(head);
            if found.is_some() {
                break;
            }
            node = ctx.parent();
        }
        let mut controller = found.ok_or_else(unknown)?;

        for segment in segments {
            let group = controller.as_group().ok_or_else(unknown)?;
            controller = group.get(segment).map_err(|_| unknown())?;
        }
        Ok(controller)
    }

    fn find_local(&self, name: &str) -> Option<Controller> {
        if self.name() == name {
            return Some(self.controller().clone());
        }
        if let Some(child) = self.child(name) {
            return Some(child.controller().clone());
        }
        self.controller().as_group()?.get(name).ok()
    }
}

impl fmt::Debug for FormContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormContext")
            .field("path", &self.path())
            .field("composite", &self.is_composite())
            .field("children", &self.child_names())
            .finish()
    }
}

/// Step-by-step construction of a [`FormContext`].
#[derive(Debug)]
pub struct ContextBuilder {
    controller: Controller,
    parent: Option<FormContext>,
    data: ContextData,
}

impl ContextBuilder {
    #[must_use]
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            parent: None,
            data: ContextData::new(),
        }
    }

    /// Attach under `parent`.
    #[must_use]
    pub fn parent(mut self, parent: &FormContext) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Initial injected data.
    #[must_use]
    pub fn data(mut self, data: ContextData) -> Self {
        self.data = data;
        self
    }

    /// Create the node and register it with a composite parent.
    pub fn build(self) -> Result<FormContext> {
        let name = self
            .controller
            .name()
            .unwrap_or_else(|| ROOT_NAME.to_string());

        if let Some(parent) = &self.parent
            && parent.child(&name).is_some()
        {
            return Err(FormError::DuplicateContext {
                parent: parent.path(),
                name,
            });
        }

        let children = self
            .controller
            .as_group()
            .map(|_| RefCell::new(IndexMap::new()));
        let ctx = FormContext {
            inner: Rc::new(ContextInner {
                name,
                controller: self.controller,
                parent: self.parent,
                data: Observable::new(self.data),
                children,
            }),
        };

        if let Some(registry) = ctx.parent().and_then(|p| p.inner.children.as_ref()) {
            registry
                .borrow_mut()
                .insert(ctx.name().to_string(), Rc::downgrade(&ctx.inner));
        }
        debug!(context = %ctx.path(), composite = ctx.is_composite(), "context registered");
        Ok(ctx)
    }
}
