#![forbid(unsafe_code)]

//! Built-in validation rules.
//!
//! Each constructor returns a fresh [`Validator`]; keep the returned handle
//! if you intend to remove the rule later.

use std::borrow::Cow;

use crate::validator::{ValidationError, Validator};
use crate::value::ControlValue;

/// Fails on `Null`, empty text, and empty lists.
pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Validator::new("required", move |control| {
        let missing = control.with_value(|value| {
            matches!(value, ControlValue::Null)
                || (matches!(value, ControlValue::Text(_) | ControlValue::List(_))
                    && value.is_empty())
        });
        missing.then(|| ValidationError::new("required", message.clone()))
    })
}

/// Fails unless the value is text starting with an uppercase ASCII letter.
pub fn capitalized(message: impl Into<String>) -> Validator {
    let message = message.into();
    Validator::new("capitalized", move |control| {
        let ok = control.with_value(|value| {
            value
                .as_str()
                .and_then(|s| s.chars().next())
                .is_some_and(|c| c.is_ascii_uppercase())
        });
        (!ok).then(|| ValidationError::new("capitalized", message.clone()))
    })
}

/// Fails when text, list, or map length is below `min`. `Null` counts as
/// length zero; other scalars are not checked.
pub fn min_length(min: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Validator::new("min_length", move |control| {
        let too_short = control.with_value(|value| match value {
            ControlValue::Null => min > 0,
            other => other.len().is_some_and(|len| len < min),
        });
        too_short.then(|| ValidationError::new("min_length", message.clone()))
    })
}

/// Fails when the value is not a number or is below `min`.
pub fn min_number(min: f64, message: impl Into<String>) -> Validator {
    let message = message.into();
    Validator::new("min_number", move |control| {
        let ok = control.with_value(|value| value.as_f64().is_some_and(|n| n >= min));
        (!ok).then(|| ValidationError::new("min_number", message.clone()))
    })
}

/// Group rule: every listed field must hold the same value.
///
/// Missing fields read as `Null`.
pub fn field_equality<I, S>(fields: I, message: impl Into<String>) -> Validator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    let message = message.into();
    Validator::new("field_equality", move |control| {
        let equal = control.with_value(|value| {
            let mut values = fields
                .iter()
                .map(|field| value.get(field).unwrap_or(&ControlValue::Null));
            match values.next() {
                Some(first) => values.all(|v| v == first),
                None => true,
            }
        });
        (!equal).then(|| ValidationError::new("field_equality", message.clone()))
    })
}

/// Rule from a value predicate: fails when `predicate` returns `false`.
pub fn predicate(
    code: impl Into<Cow<'static, str>>,
    message: impl Into<String>,
    predicate: impl Fn(&ControlValue) -> bool + 'static,
) -> Validator {
    let code = code.into();
    let message = message.into();
    Validator::new(code.clone(), move |control| {
        let ok = control.with_value(&predicate);
        (!ok).then(|| ValidationError::new(code.clone(), message.clone()))
    })
}
