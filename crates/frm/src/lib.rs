#![forbid(unsafe_code)]

//! frm public facade.
//!
//! Re-exports the reactive primitives and the form engine, plus a
//! [`prelude`] for glob import.

pub use frm_core::{
    BindingEngine, ContextBuilder, ContextData, ContextProvider, ControlConfig, ControlMount,
    Controller, EmbeddedView, Flag, FormContext, FormControl, FormError, GroupController,
    GroupMount, LeafController, MountOptions, Operation, ROOT_NAME, Result, SelectorConfig,
    SelectorController, SelectorOption, Validator, Value, ValueAccessor, ViewContainer,
    create_controller, create_group_controller, create_selector, operate,
};
pub use frm_core::{host, operators, validators, value};
pub use frm_reactive::{BindingScope, Deferred, Observable, Stream, Subscription};

#[cfg(feature = "test-helpers")]
pub use frm_core::testing;

pub mod prelude {
    pub use frm_core::operators::{
        Comparator, UseIf, UseWhen, and, compare, field_value, not, or, use_from, use_if,
        use_value, use_when,
    };
    pub use frm_core::{
        BindingEngine, ContextData, ControlConfig, ControlMount, Controller, Flag, FormContext,
        FormControl, FormError, GroupMount, MountOptions, Operation, SelectorConfig,
        SelectorOption, Validator, Value, create_controller, create_group_controller,
        create_selector,
    };
    pub use frm_reactive::{Deferred, Observable, Stream};
}
