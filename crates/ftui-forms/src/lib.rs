#![forbid(unsafe_code)]

//! Reactive form model for FrankenTUI.
//!
//! This crate provides:
//! - [`FormControl`] for a single editable value with validators
//! - [`FormGroup`] for named child controls with an aggregate value and status
//! - [`ControlEvent`] streams per control, filterable by [`EventKinds`]
//! - [`ValueAccessor`] for binding a control to an input widget
//! - [`FormBuilder`] for declarative construction of control trees
//!
//! Every mutation runs synchronously: the control updates, emits its
//! events, and its ancestors recompute before the call returns.
//!
//! ```
//! use ftui_forms::{validators, EventKinds, FormControl, FormGroup};
//!
//! let name = FormControl::with_validators("halib", [validators::capitalized("Capitalize")]);
//! let form = FormGroup::new([("name", name.clone()), ("age", FormControl::new(22))]);
//! assert!(form.invalid());
//!
//! let _sub = form.on(EventKinds::STATUS, |event| {
//!     assert!(event.source().is_some());
//! });
//! name.set_value("Halib").unwrap();
//! assert!(form.valid());
//! ```

pub mod accessor;
pub mod builder;
pub mod control;
pub mod error;
pub mod event;
pub mod form_control;
pub mod form_group;
pub mod options;
pub mod reactive;
pub mod validator;
pub mod validators;
pub mod value;

pub use accessor::{AccessorSlots, ChangeCallback, TouchCallback, ValueAccessor};
pub use builder::{ControlContainer, Field, FormBuilder};
pub use control::{Control, ControlStatus, WeakControl};
pub use error::{FormError, Result};
pub use event::{ControlEvent, EventKind, EventKinds};
pub use form_control::FormControl;
pub use form_group::{ControlLookup, FormGroup};
pub use options::EventOptions;
pub use reactive::{Binding, Channel, Subscription, SubscriptionScope};
pub use validator::{ValidationError, Validator};
pub use value::{ControlValue, ValueMap};
