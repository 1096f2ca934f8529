#![forbid(unsafe_code)]

//! Read bindings from controls to display state.
//!
//! A [`Binding<T>`] derives a display value from a control on demand: the
//! text of an input, whether to show an error line, the error message
//! itself. [`SubscriptionScope`] collects the event subscriptions a widget
//! makes so they are all released together when the widget goes away.
//!
//! # Usage
//!
//! ```
//! use ftui_forms::{validators, FormControl};
//! use ftui_forms::reactive::{bind_error, bind_mapped};
//!
//! let name = FormControl::with_validators("", [validators::required("Required")]);
//! let label = bind_mapped(&name, |v| format!("Name: {v}"));
//! let error = bind_error(&name).then(|e| e.map(|e| e.message));
//!
//! assert_eq!(error.get(), None);
//! name.mark_as_touched();
//! name.mark_as_dirty();
//! assert_eq!(error.get().as_deref(), Some("Required"));
//!
//! name.set_value("Halib").unwrap();
//! assert_eq!(label.get(), "Name: Halib");
//! assert_eq!(error.get(), None);
//! ```
//!
//! # Invariants
//!
//! 1. `Binding::get()` always reads the control's current state.
//! 2. A binding's transform runs on every `get()` call (no caching).
//! 3. Bindings are `Clone`; clones share the transform.
//! 4. `SubscriptionScope` releases subscriptions in reverse registration
//!    order on drop, and no callback from the scope fires afterwards.
//!
//! # Failure Modes
//!
//! - Transform panic: propagates to the caller of `get()`.
//! - A binding keeps its control alive; a control detached from its group
//!   keeps answering with its own state.

use std::fmt;
use std::rc::Rc;

use crate::control::Control;
use crate::event::{ControlEvent, EventKinds};
use crate::validator::ValidationError;
use crate::value::ControlValue;

use super::channel::Subscription;

/// A read-only, lazily evaluated view of control state.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: 'static> Binding<T> {
    /// Create a binding that evaluates `f` on each `get()` call.
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    /// Get the current bound value.
    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Apply a further transform, returning a new `Binding`.
    pub fn then<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        Binding {
            eval: Rc::new(move || f((self.eval)())),
        }
    }
}

/// Binding over the whole control.
pub fn bind_control<T: 'static>(
    control: &Control,
    map: impl Fn(&Control) -> T + 'static,
) -> Binding<T> {
    let control = control.clone();
    Binding::new(move || map(&control))
}

/// The control's current value.
pub fn bind_value(control: &Control) -> Binding<ControlValue> {
    bind_control(control, Control::value)
}

/// The control's value transformed by `map`, without cloning the value.
pub fn bind_mapped<T: 'static>(
    control: &Control,
    map: impl Fn(&ControlValue) -> T + 'static,
) -> Binding<T> {
    bind_control(control, move |c| c.with_value(&map))
}

/// The error a UI should currently show, per [`Control::display_error`].
pub fn bind_error(control: &Control) -> Binding<Option<ValidationError>> {
    bind_control(control, Control::display_error)
}

// ---------------------------------------------------------------------------
// SubscriptionScope: lifecycle management
// ---------------------------------------------------------------------------

/// Collects the subscriptions of a logical scope (e.g., a widget).
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use ftui_forms::{EventKinds, FormControl};
/// use ftui_forms::reactive::SubscriptionScope;
///
/// let control = FormControl::new(0);
/// let renders = Rc::new(Cell::new(0));
/// let mut scope = SubscriptionScope::new();
/// let r = Rc::clone(&renders);
/// scope.subscribe(&control, EventKinds::VALUE, move |_| r.set(r.get() + 1));
///
/// control.set_value(1).unwrap();
/// drop(scope);
/// control.set_value(2).unwrap();
/// assert_eq!(renders.get(), 1);
/// ```
pub struct SubscriptionScope {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionScope {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Keep `sub` alive until the scope is dropped or cleared.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to `control` within this scope.
    ///
    /// Returns the scope for chaining.
    pub fn subscribe(
        &mut self,
        control: &Control,
        kinds: impl Into<EventKinds>,
        callback: impl Fn(&ControlEvent) + 'static,
    ) -> &mut Self {
        let sub = control.on(kinds, callback);
        self.subscriptions.push(sub);
        self
    }

    /// Create a binding for use alongside this scope's subscriptions.
    pub fn bind<T: 'static>(
        &mut self,
        control: &Control,
        map: impl Fn(&Control) -> T + 'static,
    ) -> Binding<T> {
        bind_control(control, map)
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release all subscriptions now. The scope stays usable.
    pub fn clear(&mut self) {
        while self.subscriptions.pop().is_some() {}
    }
}

impl Drop for SubscriptionScope {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Default for SubscriptionScope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SubscriptionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators;
    use crate::{FormControl, FormGroup};
    use std::cell::{Cell, RefCell};

    #[test]
    fn value_binding_tracks_control() {
        let control = FormControl::new(42);
        let b = bind_value(&control);
        assert_eq!(b.get(), ControlValue::Int(42));

        control.set_value(100).unwrap();
        assert_eq!(b.get(), ControlValue::Int(100));
    }

    #[test]
    fn mapped_binding() {
        let count = FormControl::new(3);
        let label = bind_mapped(&count, |c| format!("items: {c}"));
        assert_eq!(label.get(), "items: 3");

        count.set_value(7).unwrap();
        assert_eq!(label.get(), "items: 7");
    }

    #[test]
    fn binding_then_chain() {
        let control = FormControl::new(5);
        let doubled = bind_mapped(&control, |v| v.as_i64().unwrap_or(0)).then(|v| v * 2);
        assert_eq!(doubled.get(), 10);
    }

    #[test]
    fn group_binding_reads_aggregate() {
        let a = FormControl::new(1);
        let group = FormGroup::new([("a", a.clone())]);
        let status = bind_control(&group, Control::valid);
        let size = bind_mapped(&group, |v| v.len().unwrap_or(0));
        assert!(status.get());
        assert_eq!(size.get(), 1);

        a.set_validators([validators::min_number(10.0, "small")]);
        assert!(!status.get());
    }

    #[test]
    fn error_binding_follows_display_rule() {
        let control = FormControl::with_validators("", [validators::required("Required")]);
        let err = bind_error(&control);
        assert!(err.get().is_none());
        control.mark_as_touched();
        control.mark_as_dirty();
        assert_eq!(err.get().map(|e| e.code.into_owned()), Some("required".to_owned()));
    }

    #[test]
    fn binding_clone_shares_transform() {
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let b = Binding::new(move || {
            c.set(c.get() + 1);
            c.get()
        });
        let b2 = b.clone();
        assert_eq!(b.get(), 1);
        assert_eq!(b2.get(), 2);
    }

    #[test]
    fn binding_debug_shows_value() {
        let b = Binding::new(|| 7);
        assert_eq!(format!("{b:?}"), "Binding { value: 7 }");
    }

    #[test]
    fn scope_releases_on_drop() {
        let control = FormControl::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut scope = SubscriptionScope::new();
            let l = Rc::clone(&log);
            scope.subscribe(&control, EventKinds::VALUE, move |e| {
                if let ControlEvent::ValueChanged { value, .. } = e {
                    l.borrow_mut().push(value.clone());
                }
            });
            assert_eq!(scope.binding_count(), 1);
            control.set_value(1).unwrap();
        }
        control.set_value(2).unwrap();
        assert_eq!(*log.borrow(), vec![ControlValue::Int(1)]);
    }

    #[test]
    fn scope_clear_is_reusable() {
        let control = FormControl::new(0);
        let count = Rc::new(Cell::new(0));
        let mut scope = SubscriptionScope::default();

        let c = Rc::clone(&count);
        scope
            .subscribe(&control, EventKinds::all(), move |_| c.set(c.get() + 1))
            .hold(control.on(EventKinds::STATUS, |_| {}));
        assert_eq!(scope.binding_count(), 2);

        scope.clear();
        assert!(scope.is_empty());
        control.mark_as_dirty();
        assert_eq!(count.get(), 0);

        let c = Rc::clone(&count);
        scope.subscribe(&control, EventKinds::DIRTY, move |_| c.set(c.get() + 1));
        control.mark_as_pristine();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn scope_bind_returns_live_binding() {
        let control = FormControl::new("x");
        let mut scope = SubscriptionScope::new();
        let touched = scope.bind(&control, Control::touched);
        assert!(!touched.get());
        control.mark_as_touched();
        assert!(touched.get());
        assert!(format!("{scope:?}").contains("binding_count: 0"));
    }
}
