#![forbid(unsafe_code)]

//! Options protocol shared by every control mutator.

use crate::control::{Control, WeakControl};

/// Options accepted by every mutator (`*_with` methods).
///
/// The defaults emit events and propagate to the parent. Mutators without
/// the `_with` suffix use [`EventOptions::default()`].
///
/// ```
/// use ftui_forms::EventOptions;
///
/// let opts = EventOptions::new().silent().self_only();
/// assert!(!opts.emit_event);
/// assert!(opts.only_self);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOptions {
    /// Push change events to subscribers. State changes happen either way.
    pub emit_event: bool,
    /// Confine the operation to the control it was invoked on.
    pub only_self: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            emit_event: true,
            only_self: false,
        }
    }
}

impl EventOptions {
    /// Default options: emit events, propagate upward.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            emit_event: true,
            only_self: false,
        }
    }

    /// Suppress event emission.
    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.emit_event = false;
        self
    }

    /// Do not propagate to the parent.
    #[must_use]
    pub const fn self_only(mut self) -> Self {
        self.only_self = true;
        self
    }

    #[must_use]
    pub const fn with_emit_event(mut self, emit_event: bool) -> Self {
        self.emit_event = emit_event;
        self
    }

    #[must_use]
    pub const fn with_only_self(mut self, only_self: bool) -> Self {
        self.only_self = only_self;
        self
    }
}

/// [`EventOptions`] plus the control a cascade started from.
///
/// The source is set by the first control in a cascade and forwarded
/// unchanged to every ancestor.
#[derive(Clone)]
pub(crate) struct Propagation {
    pub(crate) emit_event: bool,
    pub(crate) only_self: bool,
    source: Option<WeakControl>,
}

impl Propagation {
    /// The originating control: the forwarded source, or `this`.
    pub(crate) fn origin(&self, this: &Control) -> WeakControl {
        self.source.clone().unwrap_or_else(|| this.downgrade())
    }

    /// Options for the parent's step of the cascade started at `this`.
    pub(crate) fn forward(&self, this: &Control) -> Self {
        Self {
            emit_event: self.emit_event,
            only_self: self.only_self,
            source: Some(self.origin(this)),
        }
    }
}

impl From<EventOptions> for Propagation {
    fn from(opts: EventOptions) -> Self {
        Self {
            emit_event: opts.emit_event,
            only_self: opts.only_self,
            source: None,
        }
    }
}
