#![forbid(unsafe_code)]

//! Validator functions and the errors they produce.
//!
//! A [`Validator`] is a named, shareable, pure function from a control to an
//! optional [`ValidationError`]. Validators see the whole control, so a rule
//! may consult `touched`/`dirty`/`disabled` as well as the value. Group
//! validators read the group's aggregate value for cross-field rules.
//!
//! Validator identity is the identity of its function: clones of one
//! `Validator` compare equal, two separately constructed validators never
//! do. [`Control::remove_validators`](crate::Control::remove_validators)
//! relies on this.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::control::Control;

/// A failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationError {
    /// Stable identifier of the rule (`"required"`, `"min_length"`, ...).
    pub code: Cow<'static, str>,
    /// Human-readable message for display.
    pub message: String,
}

impl ValidationError {
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

type Check = dyn Fn(&Control) -> Option<ValidationError>;

/// A named validation rule.
#[derive(Clone)]
pub struct Validator {
    name: Cow<'static, str>,
    check: Rc<Check>,
}

impl Validator {
    /// Wrap a check function. `check` must be pure and synchronous.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        check: impl Fn(&Control) -> Option<ValidationError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Rc::new(check),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the rule against `control`.
    #[must_use]
    pub fn validate(&self, control: &Control) -> Option<ValidationError> {
        (self.check)(control)
    }

    /// Whether both handles share one check function.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.check, &other.check)
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Validator {}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .finish()
    }
}
