#![forbid(unsafe_code)]

//! Reactive form state.
//!
//! Controllers hold a value and four flags. Their configuration is made of
//! [`Operation`]s, small reactive programs built from the combinators in
//! [`operators`] and resolved against a [`FormContext`]. A
//! [`BindingEngine`] keeps a controller in step with its configuration and
//! with the input the rendering layer provides.
//!
//! # Example
//!
//! ```
//! use frm_core::controller::{
//!     ControlConfig, FormControl, create_controller, create_group_controller,
//! };
//! use frm_core::operators::{Comparator, compare, field_value, use_value};
//! use frm_core::FormContext;
//! use serde_json::json;
//!
//! let age = create_controller(ControlConfig::default());
//! let form = create_group_controller([("age", age.clone())], ControlConfig::default())?;
//! let root = FormContext::create(form, None)?;
//!
//! let under_age = compare(field_value("age"), Comparator::Lt, use_value(json!(18)));
//! let stream = under_age.resolve(&root)?;
//!
//! age.write_value(json!(16));
//! assert_eq!(stream.latest(), Some(true));
//! age.write_value(json!(30));
//! assert_eq!(stream.latest(), Some(false));
//! # Ok::<(), frm_core::FormError>(())
//! ```

pub mod context;
pub mod controller;
pub mod engine;
pub mod error;
pub mod host;
pub mod mount;
pub mod operate;
pub mod operation;
pub mod operators;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
pub mod validators;
pub mod value;

pub use context::{ContextBuilder, FormContext, ROOT_NAME};
pub use controller::{
    ControlConfig, Controller, Flag, FormControl, GroupController, LeafController, SelectorConfig,
    SelectorController, SelectorOption, create_controller, create_group_controller,
    create_selector,
};
pub use engine::BindingEngine;
pub use error::{FormError, Result};
pub use host::{EmbeddedView, ValueAccessor, ViewContainer};
pub use mount::{ControlMount, GroupMount, MountOptions};
pub use operate::{ContextProvider, operate};
pub use operation::Operation;
pub use validators::Validator;
pub use value::{ContextData, Value};
