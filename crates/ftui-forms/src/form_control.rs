#![forbid(unsafe_code)]

//! Leaf control.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::accessor::ValueAccessor;
use crate::control::{Control, Node};
use crate::error::FormError;
use crate::options::EventOptions;
use crate::validator::Validator;
use crate::value::ControlValue;

/// A control holding one terminal value.
///
/// Derefs to [`Control`] for the shared API (`set_value`, `reset`,
/// `mark_as_*`, subscriptions, ...).
///
/// ```
/// use ftui_forms::{validators, ControlValue, FormControl};
///
/// let name = FormControl::with_validators("halib", [validators::capitalized("Capitalize it")]);
/// assert!(name.invalid());
/// name.set_value("Halib").unwrap();
/// assert!(name.valid());
/// name.reset();
/// assert_eq!(name.value(), ControlValue::from("halib"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FormControl(Control);

impl FormControl {
    pub fn new(initial: impl Into<ControlValue>) -> Self {
        Self(Control::leaf(initial, Vec::new()))
    }

    pub fn with_validators(
        initial: impl Into<ControlValue>,
        validators: impl IntoIterator<Item = Validator>,
    ) -> Self {
        Self(Control::leaf(initial, validators.into_iter().collect()))
    }

    pub(crate) fn from_control(control: Control) -> Self {
        Self(control)
    }

    #[must_use]
    pub fn into_control(self) -> Control {
        self.0
    }

    /// Bind an editing surface to this control.
    ///
    /// Installs change and touch callbacks into `accessor`, replacing any it
    /// had, then writes the current value to it once. A previously
    /// registered accessor stops receiving write-backs.
    pub fn register(&self, accessor: Rc<dyn ValueAccessor>) {
        let Node::Leaf { accessor: slot } = self.0.node() else {
            return;
        };

        let weak = self.0.downgrade();
        accessor.set_on_change(Box::new(move |value| {
            let Some(control) = weak.upgrade() else {
                warn!("accessor change fired after its control was dropped");
                return Err(FormError::ControlDropped);
            };
            FormControl(control).handle_change(value);
            Ok(())
        }));

        let weak = self.0.downgrade();
        accessor.set_on_touch(Box::new(move || {
            let Some(control) = weak.upgrade() else {
                warn!("accessor touch fired after its control was dropped");
                return Err(FormError::ControlDropped);
            };
            control.mark_as_touched();
            Ok(())
        }));

        *slot.borrow_mut() = Some(Rc::clone(&accessor));
        debug!("registered value accessor");
        let current = self.0.value();
        accessor.write_value(&current);
    }

    /// Whether an accessor is bound.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        match self.0.node() {
            Node::Leaf { accessor } => accessor.borrow().is_some(),
            Node::Group { .. } => false,
        }
    }

    /// Drop the bound accessor. Callbacks it already holds keep working
    /// until the accessor replaces them.
    pub fn unregister(&self) -> Option<Rc<dyn ValueAccessor>> {
        match self.0.node() {
            Node::Leaf { accessor } => accessor.borrow_mut().take(),
            Node::Group { .. } => None,
        }
    }

    /// Apply a user edit: mark dirty, then assign without write-back.
    ///
    /// This is what the installed change callback runs.
    pub fn handle_change(&self, value: impl Into<ControlValue>) {
        self.0.mark_as_dirty();
        self.0
            .assign_leaf_value(value.into(), EventOptions::default().into(), false);
    }
}

impl Deref for FormControl {
    type Target = Control;

    fn deref(&self) -> &Control {
        &self.0
    }
}

impl AsRef<Control> for FormControl {
    fn as_ref(&self) -> &Control {
        &self.0
    }
}

impl From<FormControl> for Control {
    fn from(control: FormControl) -> Self {
        control.0
    }
}

impl fmt::Debug for FormControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FormControl").field(&self.0).finish()
    }
}
