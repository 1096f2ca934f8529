#![forbid(unsafe_code)]

//! Change events emitted by controls.
//!
//! Every control owns one event stream. A [`ControlEvent`] carries the new
//! state of the control whose stream it was emitted on, plus the `source`:
//! the control where the cascade started. An ancestor re-emitting a leaf's
//! change therefore reports its own aggregate value but the leaf as source.
//!
//! Subscribers filter by [`EventKinds`] flags rather than by inspecting
//! variants at runtime.

use bitflags::bitflags;

use crate::control::{Control, ControlStatus, WeakControl};
use crate::value::ControlValue;

/// Discriminant of a [`ControlEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    Value,
    Status,
    Touched,
    Dirty,
    Disabled,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Value,
        EventKind::Status,
        EventKind::Touched,
        EventKind::Dirty,
        EventKind::Disabled,
    ];

    /// The filter flag matching this kind.
    #[must_use]
    pub const fn flag(self) -> EventKinds {
        match self {
            Self::Value => EventKinds::VALUE,
            Self::Status => EventKinds::STATUS,
            Self::Touched => EventKinds::TOUCHED,
            Self::Dirty => EventKinds::DIRTY,
            Self::Disabled => EventKinds::DISABLED,
        }
    }
}

bitflags! {
    /// Subscription filter over event kinds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventKinds: u8 {
        const VALUE    = 1 << 0;
        const STATUS   = 1 << 1;
        const TOUCHED  = 1 << 2;
        const DIRTY    = 1 << 3;
        const DISABLED = 1 << 4;
    }
}

impl EventKinds {
    /// Whether an event of `kind` passes this filter.
    #[must_use]
    pub const fn accepts(self, kind: EventKind) -> bool {
        self.contains(kind.flag())
    }
}

impl From<EventKind> for EventKinds {
    fn from(kind: EventKind) -> Self {
        kind.flag()
    }
}

/// A state change on a control.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// Value recomputed. Emitted once per control per update, even when
    /// the value is unchanged.
    ValueChanged { value: ControlValue, source: WeakControl },
    /// Validity flipped.
    StatusChanged { status: ControlStatus, source: WeakControl },
    TouchedChanged { touched: bool, source: WeakControl },
    DirtyChanged { dirty: bool, source: WeakControl },
    DisabledChanged { disabled: bool, source: WeakControl },
}

impl ControlEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ValueChanged { .. } => EventKind::Value,
            Self::StatusChanged { .. } => EventKind::Status,
            Self::TouchedChanged { .. } => EventKind::Touched,
            Self::DirtyChanged { .. } => EventKind::Dirty,
            Self::DisabledChanged { .. } => EventKind::Disabled,
        }
    }

    /// Weak handle to the control the cascade started from.
    #[must_use]
    pub const fn source_handle(&self) -> &WeakControl {
        match self {
            Self::ValueChanged { source, .. }
            | Self::StatusChanged { source, .. }
            | Self::TouchedChanged { source, .. }
            | Self::DirtyChanged { source, .. }
            | Self::DisabledChanged { source, .. } => source,
        }
    }

    /// The originating control, if it is still alive.
    #[must_use]
    pub fn source(&self) -> Option<Control> {
        self.source_handle().upgrade()
    }

    /// Whether `control` is the origin of this event (identity comparison).
    #[must_use]
    pub fn is_from(&self, control: &Control) -> bool {
        self.source_handle().points_to(control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_a_distinct_flag() {
        let mut all = EventKinds::empty();
        for kind in EventKind::ALL {
            assert!(!all.intersects(kind.flag()));
            all |= kind.flag();
        }
        assert_eq!(all, EventKinds::all());
    }

    #[test]
    fn filter_accepts_selected_kinds() {
        let filter = EventKinds::VALUE | EventKinds::STATUS;
        assert!(filter.accepts(EventKind::Value));
        assert!(filter.accepts(EventKind::Status));
        assert!(!filter.accepts(EventKind::Touched));
        assert!(EventKinds::from(EventKind::Dirty).accepts(EventKind::Dirty));
    }

    #[test]
    fn event_reports_kind_and_source() {
        let control = Control::leaf("x", Vec::new());
        let other = Control::leaf("y", Vec::new());
        let event = ControlEvent::TouchedChanged {
            touched: true,
            source: control.downgrade(),
        };
        assert_eq!(event.kind(), EventKind::Touched);
        assert!(event.is_from(&control));
        assert!(!event.is_from(&other));
        assert_eq!(event.source(), Some(control));
    }

    #[test]
    fn source_of_dropped_control_is_none() {
        let event = {
            let control = Control::leaf(1, Vec::new());
            ControlEvent::ValueChanged {
                value: ControlValue::Int(1),
                source: control.downgrade(),
            }
        };
        assert!(event.source().is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn kind_serde_round_trip() {
        for kind in EventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: EventKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(serde_json::to_string(&EventKind::Touched).unwrap(), r#""Touched""#);
    }
}
