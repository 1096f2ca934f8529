#![forbid(unsafe_code)]

//! Bridge between a leaf control and an external editing surface.
//!
//! A [`ValueAccessor`] is whatever renders and edits a value: a text input
//! widget, a checkbox, a test double. [`FormControl::register`] installs the
//! control's change and touch callbacks into the accessor and pushes the
//! current value once; from then on every programmatic `set_value` is
//! written back through [`ValueAccessor::write_value`].
//!
//! The installed callbacks hold the control weakly. Firing one after the
//! control is gone returns [`FormError::ControlDropped`].
//!
//! [`FormControl::register`]: crate::FormControl::register

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{FormError, Result};
use crate::value::ControlValue;

/// Callback an accessor invokes when the user edits the value.
pub type ChangeCallback = Box<dyn Fn(ControlValue) -> Result<()>>;

/// Callback an accessor invokes when the user leaves the field.
pub type TouchCallback = Box<dyn Fn() -> Result<()>>;

/// External read/write surface bound to a leaf control.
///
/// Registration replaces any callbacks previously installed on the
/// accessor.
pub trait ValueAccessor {
    /// Show `value`. Called on registration and on every programmatic
    /// value change, but not for changes that came from the accessor.
    fn write_value(&self, value: &ControlValue);

    fn set_on_change(&self, callback: ChangeCallback);

    fn set_on_touch(&self, callback: TouchCallback);
}

/// Callback slots for [`ValueAccessor`] implementors to embed.
///
/// ```
/// use std::rc::Rc;
/// use ftui_forms::{AccessorSlots, ChangeCallback, ControlValue, FormControl,
///     TouchCallback, ValueAccessor};
///
/// #[derive(Default)]
/// struct Input {
///     slots: AccessorSlots,
/// }
///
/// impl ValueAccessor for Input {
///     fn write_value(&self, _value: &ControlValue) {}
///     fn set_on_change(&self, callback: ChangeCallback) {
///         self.slots.install_change(callback);
///     }
///     fn set_on_touch(&self, callback: TouchCallback) {
///         self.slots.install_touch(callback);
///     }
/// }
///
/// let input = Rc::new(Input::default());
/// let name = FormControl::new("");
/// name.register(input.clone());
/// input.slots.change("Halib".into()).unwrap();
/// assert_eq!(name.value(), ControlValue::from("Halib"));
/// assert!(name.dirty());
/// ```
#[derive(Default)]
pub struct AccessorSlots {
    on_change: RefCell<Option<Rc<dyn Fn(ControlValue) -> Result<()>>>>,
    on_touch: RefCell<Option<Rc<dyn Fn() -> Result<()>>>>,
}

impl AccessorSlots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install_change(&self, callback: ChangeCallback) {
        *self.on_change.borrow_mut() = Some(Rc::from(callback));
    }

    pub fn install_touch(&self, callback: TouchCallback) {
        *self.on_touch.borrow_mut() = Some(Rc::from(callback));
    }

    /// Report a user edit to the bound control.
    ///
    /// # Errors
    ///
    /// [`FormError::AccessorNotRegistered`] if no control is bound, or
    /// [`FormError::ControlDropped`] if the bound control is gone.
    pub fn change(&self, value: ControlValue) -> Result<()> {
        let callback = self
            .on_change
            .borrow()
            .clone()
            .ok_or(FormError::AccessorNotRegistered("on_change"))?;
        callback(value)
    }

    /// Report that the user left the field.
    ///
    /// # Errors
    ///
    /// Same as [`change`](Self::change).
    pub fn touch(&self) -> Result<()> {
        let callback = self
            .on_touch
            .borrow()
            .clone()
            .ok_or(FormError::AccessorNotRegistered("on_touch"))?;
        callback()
    }

    /// Whether both callbacks are installed.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.on_change.borrow().is_some() && self.on_touch.borrow().is_some()
    }
}

impl fmt::Debug for AccessorSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorSlots")
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn unbound_slots_report_not_registered() {
        let slots = AccessorSlots::new();
        assert!(!slots.is_bound());
        assert_eq!(
            slots.change(ControlValue::Null),
            Err(FormError::AccessorNotRegistered("on_change"))
        );
        assert_eq!(slots.touch(), Err(FormError::AccessorNotRegistered("on_touch")));
    }

    #[test]
    fn installing_replaces_previous_callback() {
        let slots = AccessorSlots::new();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        slots.install_touch(Box::new(move || {
            c.set(c.get() + 1);
            Ok(())
        }));
        let c = Rc::clone(&calls);
        slots.install_touch(Box::new(move || {
            c.set(c.get() + 10);
            Ok(())
        }));
        slots.touch().unwrap();
        assert_eq!(calls.get(), 10);
    }

    #[test]
    fn callback_may_reinstall_itself() {
        let slots = Rc::new(AccessorSlots::new());
        let weak = Rc::downgrade(&slots);
        slots.install_change(Box::new(move |_| {
            if let Some(slots) = weak.upgrade() {
                slots.install_change(Box::new(|_| Ok(())));
            }
            Ok(())
        }));
        slots.change(ControlValue::Null).unwrap();
        slots.change(ControlValue::Null).unwrap();
    }
}
