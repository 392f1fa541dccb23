//! In-memory collaborators and helpers for tests.
//!
//! [`MockContainer`], [`MockView`] and [`MockAccessor`] record every call the
//! core makes and let a test drive the user side (`input`, `blur`).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use frm_reactive::{Stream, Subscription};

use crate::context::FormContext;
use crate::controller::{ControlConfig, create_controller};
use crate::host::{EmbeddedView, ValueAccessor, ViewContainer};
use crate::operation::Operation;
use crate::value::{ContextData, Value};

/// Values a stream emitted while the collector was alive.
pub struct Collected<T> {
    seen: Rc<RefCell<Vec<T>>>,
    subscription: Subscription,
}

impl<T: Clone> Collected<T> {
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.seen.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.seen.borrow().last().cloned()
    }

    /// Stop collecting, keeping what was seen.
    pub fn stop(self) -> Vec<T> {
        self.subscription.unsubscribe();
        self.seen.take()
    }
}

/// Subscribe to `stream`, recording every emission.
pub fn collect_stream<T: Clone + 'static>(stream: &Stream<T>) -> Collected<T> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = stream.subscribe(move |value| sink.borrow_mut().push(value.clone()));
    Collected { seen, subscription }
}

/// Resolve `op` against `ctx` and record its emissions.
///
/// # Panics
///
/// Panics when the operation fails to resolve.
pub fn collect<T: Clone + 'static>(op: &Operation<T>, ctx: &FormContext) -> Collected<T> {
    let stream = op
        .resolve(ctx)
        .unwrap_or_else(|err| panic!("operation failed to resolve: {err}"));
    collect_stream(&stream)
}

/// A root context over a fresh leaf.
///
/// # Panics
///
/// Never in practice: a root node has no siblings to collide with.
#[must_use]
pub fn root_context() -> FormContext {
    FormContext::create(create_controller(ControlConfig::default()), None)
        .unwrap_or_else(|err| panic!("root context: {err}"))
}

/// Records writes and lets the test play the user.
#[derive(Default)]
pub struct MockAccessor {
    writes: RefCell<Vec<Value>>,
    disabled: Cell<Option<bool>>,
    on_change: RefCell<Option<Box<dyn Fn(Value)>>>,
    on_touched: RefCell<Option<Box<dyn Fn()>>>,
}

impl MockAccessor {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Every value written into the input.
    #[must_use]
    pub fn writes(&self) -> Vec<Value> {
        self.writes.borrow().clone()
    }

    #[must_use]
    pub fn last_write(&self) -> Option<Value> {
        self.writes.borrow().last().cloned()
    }

    /// Last disabled state pushed, if any.
    #[must_use]
    pub fn disabled(&self) -> Option<bool> {
        self.disabled.get()
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.on_change.borrow().is_some() && self.on_touched.borrow().is_some()
    }

    /// Simulate the user typing `value`.
    pub fn input(&self, value: Value) {
        if let Some(on_change) = self.on_change.borrow().as_ref() {
            on_change(value);
        }
    }

    /// Simulate focus loss.
    pub fn blur(&self) {
        if let Some(on_touched) = self.on_touched.borrow().as_ref() {
            on_touched();
        }
    }
}

impl ValueAccessor for MockAccessor {
    fn write_value(&self, value: &Value) {
        self.writes.borrow_mut().push(value.clone());
    }

    fn register_on_change(&self, on_change: Box<dyn Fn(Value)>) {
        *self.on_change.borrow_mut() = Some(on_change);
    }

    fn register_on_touched(&self, on_touched: Box<dyn Fn()>) {
        *self.on_touched.borrow_mut() = Some(on_touched);
    }

    fn set_disabled_state(&self, disabled: bool) {
        self.disabled.set(Some(disabled));
    }
}

/// A view that remembers its scope.
pub struct MockView {
    scope: RefCell<ContextData>,
    scope_updates: Cell<usize>,
    accessor: Option<Rc<MockAccessor>>,
    destroyed: Cell<bool>,
}

impl MockView {
    #[must_use]
    pub fn new(scope: &ContextData, accessor: Option<Rc<MockAccessor>>) -> Self {
        Self {
            scope: RefCell::new(scope.clone()),
            scope_updates: Cell::new(0),
            accessor,
            destroyed: Cell::new(false),
        }
    }

    #[must_use]
    pub fn scope(&self) -> ContextData {
        self.scope.borrow().clone()
    }

    /// How many times the scope was replaced after creation.
    #[must_use]
    pub fn scope_updates(&self) -> usize {
        self.scope_updates.get()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

impl EmbeddedView for MockView {
    fn set_scope(&self, scope: &ContextData) {
        *self.scope.borrow_mut() = scope.clone();
        self.scope_updates.set(self.scope_updates.get() + 1);
    }

    fn locate_accessor(&self) -> Option<Rc<dyn ValueAccessor>> {
        self.accessor
            .clone()
            .map(|accessor| accessor as Rc<dyn ValueAccessor>)
    }

    fn destroy(&self) {
        self.destroyed.set(true);
    }
}

/// A mount point tracking created views and attachment.
#[derive(Default)]
pub struct MockContainer {
    accessor: Option<Rc<MockAccessor>>,
    views: RefCell<Vec<Rc<MockView>>>,
    attached: Cell<bool>,
    inserts: Cell<usize>,
    detaches: Cell<usize>,
}

impl MockContainer {
    /// A container whose views hold no input.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A container whose views expose `accessor`.
    #[must_use]
    pub fn with_accessor(accessor: Rc<MockAccessor>) -> Rc<Self> {
        Rc::new(Self {
            accessor: Some(accessor),
            ..Self::default()
        })
    }

    /// The most recently created view.
    #[must_use]
    pub fn view(&self) -> Option<Rc<MockView>> {
        self.views.borrow().last().cloned()
    }

    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.borrow().len()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    #[must_use]
    pub fn inserts(&self) -> usize {
        self.inserts.get()
    }

    #[must_use]
    pub fn detaches(&self) -> usize {
        self.detaches.get()
    }
}

impl ViewContainer for MockContainer {
    fn create_view(&self, scope: &ContextData) -> Rc<dyn EmbeddedView> {
        let view = Rc::new(MockView::new(scope, self.accessor.clone()));
        self.views.borrow_mut().push(Rc::clone(&view));
        self.attached.set(true);
        view
    }

    fn insert(&self, _view: &Rc<dyn EmbeddedView>) {
        self.attached.set(true);
        self.inserts.set(self.inserts.get() + 1);
    }

    fn detach(&self, _view: &Rc<dyn EmbeddedView>) {
        self.attached.set(false);
        self.detaches.set(self.detaches.get() + 1);
    }
}
