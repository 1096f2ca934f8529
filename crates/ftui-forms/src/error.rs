#![forbid(unsafe_code)]

//! Contract-violation errors.
//!
//! Validation failures are not errors in this sense: they are data, stored
//! in [`Control::errors`](crate::Control::errors). `FormError` is returned
//! only when a caller wires the tree incorrectly.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `ValueShape` | `set_value` on a group with a non-map value | Nothing is mutated |
//! | `UnknownControl` | `set_value` on a group with a key it does not own | Nothing is mutated |
//! | `Cycle` | Attaching a group (or an ancestor) under itself | Nothing is mutated |
//! | `ControlDropped` | Accessor callback outlived its control | Callback is a no-op |
//! | `AccessorNotRegistered` | Accessor callback fired before `register` | Callback is a no-op |

/// Errors from form tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A group received a value that is not a map.
    #[error("expected a {expected} value, found {found}")]
    ValueShape {
        expected: &'static str,
        found: &'static str,
    },
    /// A group received a key with no matching child.
    #[error("no control named '{0}' in group")]
    UnknownControl(String),
    /// Attaching the control would make a group its own ancestor.
    #[error("attaching control '{name}' would create a cycle in the form tree")]
    Cycle { name: String },
    /// An accessor callback outlived the control it was bound to.
    #[error("the control bound to this accessor has been dropped")]
    ControlDropped,
    /// An accessor callback fired before the accessor was registered.
    #[error("accessor callback '{0}' fired before the accessor was registered")]
    AccessorNotRegistered(&'static str),
}

/// Result alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
