#![forbid(unsafe_code)]

//! The control state machine shared by leaves and groups.
//!
//! A [`Control`] is a cheap, clonable handle (`Rc`) to one node of a form
//! tree. Leaves ([`FormControl`](crate::FormControl)) and groups
//! ([`FormGroup`](crate::FormGroup)) are typed views over the same handle;
//! the base operations here dispatch on the node kind where behavior
//! differs.
//!
//! # Propagation
//!
//! Value and validator changes run *recompute-and-propagate*
//! ([`Control::update_value_and_status`]): a group first re-projects its
//! value from its children, then the control re-runs its validators, emits
//! one `ValueChanged` (plus `StatusChanged` if validity flipped), and
//! finally asks its parent to do the same. The originating control is
//! carried up unchanged as the event `source`.
//!
//! Touched and dirty marks bubble the same boolean up to the root; groups
//! additionally fan marks, `disable`/`enable`, and `reset` out to their
//! children with `only_self` forced so children never bubble back up.
//!
//! # Invariants
//!
//! 1. `status` is `Valid` iff own validators pass and, for groups, every
//!    child is `Valid`. It is computed at construction, never left unset.
//! 2. A group's value is always the key-wise projection of its children,
//!    as of its last recompute.
//! 3. A control has at most one parent; ownership is strictly top-down
//!    (parents hold children strongly, children hold a `Weak` parent).
//! 4. One logical update emits at most one `ValueChanged` and one
//!    `StatusChanged` per control.
//! 5. No `RefCell` borrow is held while validators, accessors, or event
//!    subscribers run; all of them may re-enter the tree.
//!
//! # Failure Modes
//!
//! - A subscriber that captures a strong handle to the control it listens
//!   on keeps that control alive until the subscription is dropped.
//! - A panicking validator or subscriber unwinds through the mutator that
//!   triggered it; state already written stays written.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::accessor::ValueAccessor;
use crate::error::{FormError, Result};
use crate::event::{ControlEvent, EventKinds};
use crate::form_control::FormControl;
use crate::form_group::FormGroup;
use crate::options::{EventOptions, Propagation};
use crate::reactive::{Channel, Subscription};
use crate::validator::{ValidationError, Validator};
use crate::value::{ControlValue, ValueMap};

/// Validity of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlStatus {
    Valid,
    Invalid,
}

impl ControlStatus {
    #[must_use]
    pub const fn from_valid(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

pub(crate) struct ControlState {
    value: ControlValue,
    /// Leaf only. Groups derive theirs from their children.
    initial_value: ControlValue,
    status: ControlStatus,
    touched: bool,
    dirty: bool,
    disabled: bool,
    errors: Vec<ValidationError>,
    validators: Vec<Validator>,
    parent: Weak<ControlInner>,
}

/// Kind-specific part of a control.
pub(crate) enum Node {
    Leaf {
        accessor: RefCell<Option<Rc<dyn ValueAccessor>>>,
    },
    /// Children in insertion order.
    Group {
        children: RefCell<Vec<(String, Control)>>,
    },
}

pub(crate) struct ControlInner {
    state: RefCell<ControlState>,
    node: Node,
    events: Channel<ControlEvent>,
}

/// Shared handle to a form control (leaf or group).
///
/// Clones refer to the same control. Equality is identity.
#[derive(Clone)]
pub struct Control {
    inner: Rc<ControlInner>,
}

/// Non-owning handle to a control, as carried by events.
#[derive(Clone, Default)]
pub struct WeakControl {
    inner: Weak<ControlInner>,
}

impl WeakControl {
    #[must_use]
    pub fn upgrade(&self) -> Option<Control> {
        self.inner.upgrade().map(|inner| Control { inner })
    }

    /// Whether both handles refer to the same control.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether this handle refers to `control`.
    #[must_use]
    pub fn points_to(&self, control: &Control) -> bool {
        std::ptr::eq(self.inner.as_ptr(), Rc::as_ptr(&control.inner))
    }
}

impl fmt::Debug for WeakControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakControl")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Control {
    fn with_node(initial: ControlValue, validators: Vec<Validator>, node: Node) -> Self {
        Self {
            inner: Rc::new(ControlInner {
                state: RefCell::new(ControlState {
                    value: initial.clone(),
                    initial_value: initial,
                    status: ControlStatus::Valid,
                    touched: false,
                    dirty: false,
                    disabled: false,
                    errors: Vec::new(),
                    validators,
                    parent: Weak::new(),
                }),
                node,
                events: Channel::new(),
            }),
        }
    }

    /// New leaf with its status already computed.
    pub(crate) fn leaf(initial: impl Into<ControlValue>, validators: Vec<Validator>) -> Self {
        let control = Self::with_node(
            initial.into(),
            validators,
            Node::Leaf {
                accessor: RefCell::new(None),
            },
        );
        control.recompute(EventOptions::new().silent().self_only().into());
        control
    }

    /// New group adopting `children`, with value and status already computed.
    ///
    /// A child that already belongs to another group is detached from it
    /// first. A repeated name replaces the earlier child.
    pub(crate) fn group(children: Vec<(String, Control)>, validators: Vec<Validator>) -> Self {
        let group = Self::with_node(
            ControlValue::Map(ValueMap::new()),
            validators,
            Node::Group {
                children: RefCell::new(Vec::with_capacity(children.len())),
            },
        );
        for (name, child) in children {
            group.attach_child(name, child, EventOptions::new().self_only());
        }
        group.recompute(EventOptions::new().silent().self_only().into());
        group
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakControl {
        WeakControl {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same control.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn node(&self) -> &Node {
        &self.inner.node
    }
}

// ---------------------------------------------------------------------------
// Read access
// ---------------------------------------------------------------------------

impl Control {
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.inner.node, Node::Group { .. })
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.inner.node, Node::Leaf { .. })
    }

    /// Typed group view, if this control is a group.
    #[must_use]
    pub fn as_group(&self) -> Option<FormGroup> {
        self.is_group().then(|| FormGroup::from_control(self.clone()))
    }

    /// Typed leaf view, if this control is a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<FormControl> {
        self.is_leaf().then(|| FormControl::from_control(self.clone()))
    }

    fn state(&self) -> Ref<'_, ControlState> {
        self.inner.state.borrow()
    }

    /// Current value (cloned). Use [`with_value`](Self::with_value) to avoid
    /// the clone.
    #[must_use]
    pub fn value(&self) -> ControlValue {
        self.state().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not mutate this control.
    pub fn with_value<R>(&self, f: impl FnOnce(&ControlValue) -> R) -> R {
        f(&self.state().value)
    }

    /// Value that [`reset`](Self::reset) restores.
    ///
    /// A group projects its current children's initial values, so the
    /// result follows `add_control`, `set_control` and `remove_control`.
    #[must_use]
    pub fn initial_value(&self) -> ControlValue {
        match &self.inner.node {
            Node::Leaf { .. } => self.state().initial_value.clone(),
            Node::Group { .. } => ControlValue::Map(
                self.children()
                    .into_iter()
                    .map(|(name, child)| (name, child.initial_value()))
                    .collect(),
            ),
        }
    }

    #[must_use]
    pub fn status(&self) -> ControlStatus {
        self.state().status
    }

    #[must_use]
    pub fn valid(&self) -> bool {
        self.status().is_valid()
    }

    #[must_use]
    pub fn invalid(&self) -> bool {
        !self.valid()
    }

    #[must_use]
    pub fn touched(&self) -> bool {
        self.state().touched
    }

    #[must_use]
    pub fn dirty(&self) -> bool {
        self.state().dirty
    }

    #[must_use]
    pub fn pristine(&self) -> bool {
        !self.dirty()
    }

    #[must_use]
    pub fn disabled(&self) -> bool {
        self.state().disabled
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.disabled()
    }

    /// Errors from this control's own validators, in registration order.
    #[must_use]
    pub fn errors(&self) -> Vec<ValidationError> {
        self.state().errors.clone()
    }

    #[must_use]
    pub fn validators(&self) -> Vec<Validator> {
        self.state().validators.clone()
    }

    /// The error a UI should show: the first own error, but only once the
    /// control is invalid, touched, dirty, and enabled.
    #[must_use]
    pub fn display_error(&self) -> Option<ValidationError> {
        let state = self.state();
        let visible = !state.status.is_valid() && state.touched && state.dirty && !state.disabled;
        if visible {
            state.errors.first().cloned()
        } else {
            None
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<FormGroup> {
        self.parent_control().map(FormGroup::from_control)
    }

    fn parent_control(&self) -> Option<Control> {
        self.state().parent.upgrade().map(|inner| Control { inner })
    }

    /// Topmost ancestor, or this control if it has no parent.
    #[must_use]
    pub fn root(&self) -> Control {
        let mut current = self.clone();
        while let Some(parent) = current.parent_control() {
            current = parent;
        }
        current
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub(crate) fn is_ancestor_or_self_of(&self, other: &Control) -> bool {
        let mut current = Some(other.clone());
        while let Some(control) = current {
            if control.ptr_eq(self) {
                return true;
            }
            current = control.parent_control();
        }
        false
    }

    /// Snapshot of a group's children. Empty for leaves.
    pub(crate) fn children(&self) -> Vec<(String, Control)> {
        match &self.inner.node {
            Node::Group { children } => children.borrow().clone(),
            Node::Leaf { .. } => Vec::new(),
        }
    }

    fn child_controls(&self) -> Vec<Control> {
        match &self.inner.node {
            Node::Group { children } => children.borrow().iter().map(|(_, c)| c.clone()).collect(),
            Node::Leaf { .. } => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

impl Control {
    /// Subscribe to events whose kind is in `kinds`.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on(
        &self,
        kinds: impl Into<EventKinds>,
        callback: impl Fn(&ControlEvent) + 'static,
    ) -> Subscription {
        let kinds = kinds.into();
        self.inner.events.subscribe(move |event| {
            if kinds.accepts(event.kind()) {
                callback(event);
            }
        })
    }

    /// Subscribe to every event.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&ControlEvent) + 'static) -> Subscription {
        self.inner.events.subscribe(callback)
    }

    /// Most recent event emitted by this control.
    #[must_use]
    pub fn last_event(&self) -> Option<ControlEvent> {
        self.inner.events.current()
    }

    fn emit(&self, event: ControlEvent) {
        self.inner.events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

impl Control {
    /// Append validators and recompute.
    pub fn add_validators(&self, validators: impl IntoIterator<Item = Validator>) {
        self.add_validators_with(validators, EventOptions::default());
    }

    pub fn add_validators_with(
        &self,
        validators: impl IntoIterator<Item = Validator>,
        opts: EventOptions,
    ) {
        self.inner.state.borrow_mut().validators.extend(validators);
        self.recompute(opts.into());
    }

    /// Remove validators by identity and recompute.
    pub fn remove_validators(&self, validators: &[Validator]) {
        self.remove_validators_with(validators, EventOptions::default());
    }

    pub fn remove_validators_with(&self, validators: &[Validator], opts: EventOptions) {
        self.inner
            .state
            .borrow_mut()
            .validators
            .retain(|v| !validators.iter().any(|r| r.ptr_eq(v)));
        self.recompute(opts.into());
    }

    /// Replace all validators and recompute.
    pub fn set_validators(&self, validators: impl IntoIterator<Item = Validator>) {
        self.set_validators_with(validators, EventOptions::default());
    }

    pub fn set_validators_with(
        &self,
        validators: impl IntoIterator<Item = Validator>,
        opts: EventOptions,
    ) {
        self.inner.state.borrow_mut().validators = validators.into_iter().collect();
        self.recompute(opts.into());
    }

    /// Remove all validators and recompute.
    pub fn clear_validators(&self) {
        self.clear_validators_with(EventOptions::default());
    }

    pub fn clear_validators_with(&self, opts: EventOptions) {
        self.inner.state.borrow_mut().validators.clear();
        self.recompute(opts.into());
    }
}

// ---------------------------------------------------------------------------
// Disabled state
// ---------------------------------------------------------------------------

impl Control {
    /// Disable this control (and, for groups, every descendant).
    pub fn disable(&self) {
        self.disable_with(EventOptions::default());
    }

    pub fn disable_with(&self, opts: EventOptions) {
        self.set_disabled(true, opts);
    }

    /// Enable this control (and, for groups, every descendant).
    pub fn enable(&self) {
        self.enable_with(EventOptions::default());
    }

    pub fn enable_with(&self, opts: EventOptions) {
        self.set_disabled(false, opts);
    }

    fn set_disabled(&self, disabled: bool, opts: EventOptions) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let changed = state.disabled != disabled;
            state.disabled = disabled;
            changed
        };
        if changed && opts.emit_event {
            self.emit(ControlEvent::DisabledChanged {
                disabled,
                source: self.downgrade(),
            });
        }
        for child in self.child_controls() {
            child.set_disabled(disabled, opts);
        }
    }
}

// ---------------------------------------------------------------------------
// Touched / dirty marks
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Mark {
    Touched,
    Dirty,
}

impl Control {
    pub fn mark_as_touched(&self) {
        self.mark_as_touched_with(EventOptions::default());
    }

    pub fn mark_as_touched_with(&self, opts: EventOptions) {
        self.mark(Mark::Touched, true, opts);
    }

    pub fn mark_as_untouched(&self) {
        self.mark_as_untouched_with(EventOptions::default());
    }

    pub fn mark_as_untouched_with(&self, opts: EventOptions) {
        self.mark(Mark::Touched, false, opts);
    }

    pub fn mark_as_dirty(&self) {
        self.mark_as_dirty_with(EventOptions::default());
    }

    pub fn mark_as_dirty_with(&self, opts: EventOptions) {
        self.mark(Mark::Dirty, true, opts);
    }

    pub fn mark_as_pristine(&self) {
        self.mark_as_pristine_with(EventOptions::default());
    }

    pub fn mark_as_pristine_with(&self, opts: EventOptions) {
        self.mark(Mark::Dirty, false, opts);
    }

    /// Own flag (bubbling up), then every child with `only_self` forced.
    fn mark(&self, mark: Mark, flag: bool, opts: EventOptions) {
        self.apply_mark(mark, flag, opts.into());
        let child_opts = opts.self_only();
        for child in self.child_controls() {
            child.mark(mark, flag, child_opts);
        }
    }

    /// Set the flag if it changes, emit, and bubble the same flag upward.
    ///
    /// Ancestors only update their own flag here; they do not fan back out
    /// to their other children.
    fn apply_mark(&self, mark: Mark, flag: bool, prop: Propagation) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let slot = match mark {
                Mark::Touched => &mut state.touched,
                Mark::Dirty => &mut state.dirty,
            };
            let changed = *slot != flag;
            *slot = flag;
            changed
        };
        if !changed {
            return;
        }
        if prop.emit_event {
            let source = prop.origin(self);
            self.emit(match mark {
                Mark::Touched => ControlEvent::TouchedChanged {
                    touched: flag,
                    source,
                },
                Mark::Dirty => ControlEvent::DirtyChanged { dirty: flag, source },
            });
        }
        if !prop.only_self {
            if let Some(parent) = self.parent_control() {
                parent.apply_mark(mark, flag, prop.forward(self));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

impl Control {
    /// Set the value with default options.
    ///
    /// # Errors
    ///
    /// See [`set_value_with`](Self::set_value_with).
    pub fn set_value(&self, value: impl Into<ControlValue>) -> Result<()> {
        self.set_value_with(value, EventOptions::default())
    }

    /// Set the value.
    ///
    /// A leaf takes any value, writes it back to a bound accessor, and
    /// recomputes. A group takes a partial map: each entry is forwarded to
    /// the matching child with `only_self` forced, then the group
    /// recomputes once, so observers see one coalesced update.
    ///
    /// # Errors
    ///
    /// For groups (checked recursively, before anything is mutated):
    /// - [`FormError::ValueShape`] if the value (or a nested group's entry)
    ///   is not a map.
    /// - [`FormError::UnknownControl`] for a key with no matching child.
    pub fn set_value_with(&self, value: impl Into<ControlValue>, opts: EventOptions) -> Result<()> {
        let value = value.into();
        self.check_shape(&value)?;
        self.apply_value(value, opts);
        Ok(())
    }

    fn check_shape(&self, value: &ControlValue) -> Result<()> {
        if self.is_leaf() {
            return Ok(());
        }
        let ControlValue::Map(entries) = value else {
            tracing::warn!(found = value.type_name(), "group set_value with non-map value");
            return Err(FormError::ValueShape {
                expected: "map",
                found: value.type_name(),
            });
        };
        let children = self.children();
        for (key, entry) in entries {
            let Some((_, child)) = children.iter().find(|(name, _)| name == key) else {
                tracing::warn!(key = %key, "group set_value with unknown control");
                return Err(FormError::UnknownControl(key.clone()));
            };
            child.check_shape(entry)?;
        }
        Ok(())
    }

    /// Assign an already shape-checked value.
    fn apply_value(&self, value: ControlValue, opts: EventOptions) {
        match &self.inner.node {
            Node::Leaf { .. } => self.assign_leaf_value(value, opts.into(), true),
            Node::Group { .. } => {
                let _span = tracing::debug_span!("form_group_set_value").entered();
                let ControlValue::Map(entries) = value else {
                    return;
                };
                let child_opts = opts.self_only();
                for (key, entry) in entries {
                    if let Some(child) = self.child(&key) {
                        child.apply_value(entry, child_opts);
                    }
                }
                self.recompute(opts.into());
            }
        }
    }

    /// Leaf value assignment. `write_back` is false when the value came from
    /// the bound accessor itself.
    pub(crate) fn assign_leaf_value(
        &self,
        value: ControlValue,
        prop: Propagation,
        write_back: bool,
    ) {
        let accessor = match &self.inner.node {
            Node::Leaf { accessor } if write_back => accessor.borrow().clone(),
            _ => None,
        };
        match accessor {
            Some(accessor) => {
                self.inner.state.borrow_mut().value = value.clone();
                accessor.write_value(&value);
            }
            None => self.inner.state.borrow_mut().value = value,
        }
        self.recompute(prop);
    }

    pub(crate) fn child(&self, name: &str) -> Option<Control> {
        match &self.inner.node {
            Node::Group { children } => children
                .borrow()
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, c)| c.clone()),
            Node::Leaf { .. } => None,
        }
    }

    /// Restore the initial state with default options.
    pub fn reset(&self) {
        self.reset_with(EventOptions::default());
    }

    /// Restore the initial state.
    ///
    /// A leaf re-applies its initial value, then marks itself untouched,
    /// then pristine: three separately propagating operations. A group
    /// resets every child with `only_self`, marks itself untouched and
    /// pristine, then recomputes once.
    pub fn reset_with(&self, opts: EventOptions) {
        match &self.inner.node {
            Node::Leaf { .. } => {
                let initial = self.initial_value();
                self.assign_leaf_value(initial, opts.into(), true);
                self.mark_as_untouched_with(opts);
                self.mark_as_pristine_with(opts);
            }
            Node::Group { .. } => {
                let child_opts = opts.self_only();
                for child in self.child_controls() {
                    child.reset_with(child_opts);
                }
                self.mark_as_untouched_with(opts);
                self.mark_as_pristine_with(opts);
                self.recompute(opts.into());
            }
        }
    }

    /// Re-project the value, re-run validators, emit, and propagate upward.
    pub fn update_value_and_status(&self) {
        self.update_value_and_status_with(EventOptions::default());
    }

    pub fn update_value_and_status_with(&self, opts: EventOptions) {
        self.recompute(opts.into());
    }

    pub(crate) fn recompute(&self, prop: Propagation) {
        if let Node::Group { children } = &self.inner.node {
            let projected: ValueMap = children
                .borrow()
                .iter()
                .map(|(key, child)| (key.clone(), child.value()))
                .collect();
            self.inner.state.borrow_mut().value = ControlValue::Map(projected);
        }

        let validators = self.validators();
        let errors: Vec<ValidationError> = validators
            .iter()
            .filter_map(|validator| validator.validate(self))
            .collect();
        let children_valid = self.child_controls().iter().all(Control::valid);
        let status = ControlStatus::from_valid(errors.is_empty() && children_valid);

        let (status_changed, value) = {
            let mut state = self.inner.state.borrow_mut();
            let changed = state.status != status;
            state.status = status;
            state.errors = errors;
            (changed, prop.emit_event.then(|| state.value.clone()))
        };

        trace!(
            group = self.is_group(),
            ?status,
            status_changed,
            emit_event = prop.emit_event,
            only_self = prop.only_self,
            "recomputed control"
        );

        if let Some(value) = value {
            let source = prop.origin(self);
            self.emit(ControlEvent::ValueChanged {
                value,
                source: source.clone(),
            });
            if status_changed {
                self.emit(ControlEvent::StatusChanged { status, source });
            }
        }

        if !prop.only_self {
            if let Some(parent) = self.parent_control() {
                parent.recompute(prop.forward(self));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Parent / child wiring
// ---------------------------------------------------------------------------

impl Control {
    /// Re-parent this control, then recompute with `opts`.
    ///
    /// If the current parent still lists this control, the entry is removed
    /// and that parent recomputes (unless it is also the new parent).
    pub(crate) fn set_parent(&self, parent: Option<&Control>, opts: EventOptions) {
        let old = std::mem::take(&mut self.inner.state.borrow_mut().parent).upgrade();
        if let Some(old) = old.map(|inner| Control { inner }) {
            let removed = old.take_child(self);
            let same_parent = parent.is_some_and(|p| p.ptr_eq(&old));
            if removed.is_some() && !same_parent {
                debug!(name = ?removed, "detached control from previous group");
                old.recompute(opts.with_only_self(false).into());
            }
        }
        self.inner.state.borrow_mut().parent =
            parent.map_or_else(Weak::new, |p| Rc::downgrade(&p.inner));
        self.recompute(opts.into());
    }

    /// Remove `child` from this group's list by identity.
    fn take_child(&self, child: &Control) -> Option<String> {
        let Node::Group { children } = &self.inner.node else {
            return None;
        };
        let mut children = children.borrow_mut();
        let index = children.iter().position(|(_, c)| c.ptr_eq(child))?;
        Some(children.remove(index).0)
    }

    /// Attach `child` under `name`, replacing (and detaching) any previous
    /// occupant. Does not recompute this group.
    pub(crate) fn attach_child(&self, name: String, child: Control, opts: EventOptions) {
        let Node::Group { children } = &self.inner.node else {
            return;
        };
        let in_place = children
            .borrow()
            .iter()
            .any(|(key, c)| *key == name && c.ptr_eq(&child));
        if in_place {
            child.recompute(opts.self_only().into());
            return;
        }
        child.set_parent(Some(self), opts.self_only());
        let displaced = {
            let mut children = children.borrow_mut();
            match children.iter_mut().find(|(key, _)| *key == name) {
                Some(slot) => Some(std::mem::replace(&mut slot.1, child)),
                None => {
                    children.push((name, child));
                    None
                }
            }
        };
        if let Some(old) = displaced {
            old.inner.state.borrow_mut().parent = Weak::new();
        }
    }

    /// Remove the child named `name` and clear its parent link. Does not
    /// recompute this group.
    pub(crate) fn detach_child(&self, name: &str, opts: EventOptions) -> Option<Control> {
        let Node::Group { children } = &self.inner.node else {
            return None;
        };
        let removed = {
            let mut children = children.borrow_mut();
            let index = children.iter().position(|(key, _)| key == name)?;
            children.remove(index).1
        };
        removed.set_parent(None, opts.self_only());
        Some(removed)
    }
}

impl PartialEq for Control {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Control {}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_group() { "group" } else { "leaf" };
        match self.inner.state.try_borrow() {
            Ok(state) => f
                .debug_struct("Control")
                .field("kind", &kind)
                .field("value", &state.value)
                .field("status", &state.status)
                .field("touched", &state.touched)
                .field("dirty", &state.dirty)
                .field("disabled", &state.disabled)
                .finish(),
            Err(_) => f
                .debug_struct("Control")
                .field("kind", &kind)
                .finish_non_exhaustive(),
        }
    }
}
