#![forbid(unsafe_code)]

//! Composite control.
//!
//! A [`FormGroup`] owns named children in insertion order. Its value is the
//! map of child values, its status folds in every child's status, and
//! touched/dirty/disabled/reset operations fan out to the whole subtree.
//!
//! Structural changes (`add_control`, `remove_control`, `set_control`)
//! recompute the group once and propagate upward like any value change.

use std::fmt;
use std::ops::Deref;

use tracing::{debug, warn};

use crate::control::Control;
use crate::error::{FormError, Result};
use crate::form_control::FormControl;
use crate::options::EventOptions;
use crate::validator::Validator;

/// A control holding named child controls.
///
/// ```
/// use ftui_forms::{validators, ControlValue, FormControl, FormGroup};
///
/// let name = FormControl::with_validators("halib", [validators::capitalized("Capitalize")]);
/// let group = FormGroup::new([("name", name.clone()), ("age", FormControl::new(22))]);
/// assert!(group.invalid());
///
/// name.set_validators(Vec::new());
/// assert!(group.valid());
/// assert_eq!(group.value(), ControlValue::map([
///     ("name", ControlValue::from("halib")),
///     ("age", ControlValue::from(22)),
/// ]));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FormGroup(Control);

/// Argument to [`FormGroup::contains`]: a child name or a child instance.
#[derive(Debug, Clone, Copy)]
pub enum ControlLookup<'a> {
    Name(&'a str),
    Instance(&'a Control),
}

impl<'a> From<&'a str> for ControlLookup<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for ControlLookup<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a Control> for ControlLookup<'a> {
    fn from(control: &'a Control) -> Self {
        Self::Instance(control)
    }
}

impl<'a> From<&'a FormControl> for ControlLookup<'a> {
    fn from(control: &'a FormControl) -> Self {
        Self::Instance(control)
    }
}

impl<'a> From<&'a FormGroup> for ControlLookup<'a> {
    fn from(group: &'a FormGroup) -> Self {
        Self::Instance(&group.0)
    }
}

impl FormGroup {
    /// Build a group from `(name, control)` pairs.
    ///
    /// Controls already attached elsewhere are moved into this group. A
    /// repeated name keeps the last control.
    pub fn new<K, C>(children: impl IntoIterator<Item = (K, C)>) -> Self
    where
        K: Into<String>,
        C: Into<Control>,
    {
        Self::with_validators(children, Vec::new())
    }

    pub fn with_validators<K, C>(
        children: impl IntoIterator<Item = (K, C)>,
        validators: impl IntoIterator<Item = Validator>,
    ) -> Self
    where
        K: Into<String>,
        C: Into<Control>,
    {
        let children = children
            .into_iter()
            .map(|(name, control)| (name.into(), control.into()))
            .collect();
        Self(Control::group(children, validators.into_iter().collect()))
    }

    pub(crate) fn from_control(control: Control) -> Self {
        Self(control)
    }

    #[must_use]
    pub fn into_control(self) -> Control {
        self.0
    }

    /// Children in insertion order.
    #[must_use]
    pub fn controls(&self) -> Vec<(String, Control)> {
        self.0.children()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.children().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Control> {
        self.0.child(name)
    }

    /// Name under which `control` is attached here (identity lookup).
    #[must_use]
    pub fn control_name(&self, control: &Control) -> Option<String> {
        self.0
            .children()
            .into_iter()
            .find(|(_, child)| child.ptr_eq(control))
            .map(|(name, _)| name)
    }

    /// Whether a child has the given name, or is the given instance.
    #[must_use]
    pub fn contains<'a>(&self, lookup: impl Into<ControlLookup<'a>>) -> bool {
        match lookup.into() {
            ControlLookup::Name(name) => self.0.child(name).is_some(),
            ControlLookup::Instance(control) => self.control_name(control).is_some(),
        }
    }

    /// Attach `control` under `name` unless the name is taken.
    ///
    /// # Errors
    ///
    /// [`FormError::Cycle`] if `control` is this group or one of its
    /// ancestors.
    pub fn add_control(&self, name: impl Into<String>, control: impl Into<Control>) -> Result<()> {
        self.add_control_with(name, control, EventOptions::default())
    }

    pub fn add_control_with(
        &self,
        name: impl Into<String>,
        control: impl Into<Control>,
        opts: EventOptions,
    ) -> Result<()> {
        let name = name.into();
        let control = control.into();
        if self.0.child(&name).is_some() {
            debug!(name = %name, "add_control: name taken, ignoring");
            return Ok(());
        }
        self.check_acyclic(&name, &control)?;
        debug!(name = %name, "add_control");
        self.0.attach_child(name, control, opts);
        self.0.recompute(opts.into());
        Ok(())
    }

    /// Attach `control` under `name`, replacing and detaching any previous
    /// child of that name.
    ///
    /// # Errors
    ///
    /// [`FormError::Cycle`] if `control` is this group or one of its
    /// ancestors.
    pub fn set_control(&self, name: impl Into<String>, control: impl Into<Control>) -> Result<()> {
        self.set_control_with(name, control, EventOptions::default())
    }

    pub fn set_control_with(
        &self,
        name: impl Into<String>,
        control: impl Into<Control>,
        opts: EventOptions,
    ) -> Result<()> {
        let name = name.into();
        let control = control.into();
        self.check_acyclic(&name, &control)?;
        debug!(name = %name, "set_control");
        self.0.attach_child(name, control, opts);
        self.0.recompute(opts.into());
        Ok(())
    }

    /// Detach and return the child named `name`, then recompute.
    ///
    /// A missing name returns `None` and changes nothing.
    pub fn remove_control(&self, name: &str) -> Option<Control> {
        self.remove_control_with(name, EventOptions::default())
    }

    pub fn remove_control_with(&self, name: &str, opts: EventOptions) -> Option<Control> {
        let removed = self.0.detach_child(name, opts)?;
        debug!(name, "remove_control");
        self.0.recompute(opts.into());
        Some(removed)
    }

    fn check_acyclic(&self, name: &str, control: &Control) -> Result<()> {
        if control.is_ancestor_or_self_of(&self.0) {
            warn!(name, "refusing to attach a control beneath itself");
            return Err(FormError::Cycle {
                name: name.to_owned(),
            });
        }
        Ok(())
    }
}

impl Deref for FormGroup {
    type Target = Control;

    fn deref(&self) -> &Control {
        &self.0
    }
}

impl AsRef<Control> for FormGroup {
    fn as_ref(&self) -> &Control {
        &self.0
    }
}

impl From<FormGroup> for Control {
    fn from(group: FormGroup) -> Self {
        group.0
    }
}

impl fmt::Debug for FormGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.children().into_iter().map(|(name, _)| name).collect();
        f.debug_struct("FormGroup")
            .field("controls", &names)
            .field("control", &self.0)
            .finish()
    }
}
