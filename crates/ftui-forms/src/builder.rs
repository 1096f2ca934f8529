#![forbid(unsafe_code)]

//! Declarative construction of control trees.
//!
//! [`FormBuilder`] is sugar over [`FormControl::with_validators`] and
//! [`FormGroup::with_validators`]: each entry of a field list becomes a leaf
//! (from an initial value and validators), an existing control, the control
//! owned by a [`ControlContainer`], or a nested group.
//!
//! ```
//! use ftui_forms::{validators, ControlValue, Field, FormBuilder, FormControl};
//!
//! let email = FormControl::new("a@b.c");
//! let form = FormBuilder::new().group([
//!     ("name", Field::validated("Halib", [validators::capitalized("Capitalize")])),
//!     ("email", email.clone().into()),
//!     ("address", Field::group([("city", Field::value("Baku"))])),
//! ]);
//!
//! assert!(form.valid());
//! assert_eq!(form.get("email"), Some(email.into_control()));
//! assert!(form.get("address").and_then(|c| c.as_group()).is_some());
//! assert_eq!(form.value().get("address").and_then(|a| a.get("city")),
//!     Some(&ControlValue::from("Baku")));
//! ```

use crate::control::Control;
use crate::form_control::FormControl;
use crate::form_group::FormGroup;
use crate::validator::Validator;
use crate::value::ControlValue;

/// Something that owns a leaf control, typically an input widget.
pub trait ControlContainer {
    fn control(&self) -> FormControl;
}

/// One entry of a builder field list.
#[derive(Debug, Clone)]
pub enum Field {
    /// New leaf.
    Value {
        initial: ControlValue,
        validators: Vec<Validator>,
    },
    /// Existing control, attached as is.
    Control(Control),
    /// Nested group.
    Group {
        fields: Vec<(String, Field)>,
        validators: Vec<Validator>,
    },
}

impl Field {
    /// Leaf without validators.
    pub fn value(initial: impl Into<ControlValue>) -> Self {
        Self::validated(initial, Vec::new())
    }

    /// Leaf with validators.
    pub fn validated(
        initial: impl Into<ControlValue>,
        validators: impl IntoIterator<Item = Validator>,
    ) -> Self {
        Self::Value {
            initial: initial.into(),
            validators: validators.into_iter().collect(),
        }
    }

    /// Nested group without validators.
    pub fn group<K, F>(fields: impl IntoIterator<Item = (K, F)>) -> Self
    where
        K: Into<String>,
        F: Into<Field>,
    {
        Self::group_with_validators(fields, Vec::new())
    }

    pub fn group_with_validators<K, F>(
        fields: impl IntoIterator<Item = (K, F)>,
        validators: impl IntoIterator<Item = Validator>,
    ) -> Self
    where
        K: Into<String>,
        F: Into<Field>,
    {
        Self::Group {
            fields: collect_fields(fields),
            validators: validators.into_iter().collect(),
        }
    }

    /// The control owned by `container`.
    pub fn container(container: &impl ControlContainer) -> Self {
        Self::Control(container.control().into_control())
    }

    fn build(self) -> Control {
        match self {
            Self::Value {
                initial,
                validators,
            } => FormControl::with_validators(initial, validators).into_control(),
            Self::Control(control) => control,
            Self::Group { fields, validators } => build_group(fields, validators).into_control(),
        }
    }
}

impl From<Control> for Field {
    fn from(control: Control) -> Self {
        Self::Control(control)
    }
}

impl From<FormControl> for Field {
    fn from(control: FormControl) -> Self {
        Self::Control(control.into_control())
    }
}

impl From<FormGroup> for Field {
    fn from(group: FormGroup) -> Self {
        Self::Control(group.into_control())
    }
}

impl<V: Into<ControlValue>> From<(V, Vec<Validator>)> for Field {
    fn from((initial, validators): (V, Vec<Validator>)) -> Self {
        Self::validated(initial, validators)
    }
}

fn collect_fields<K, F>(fields: impl IntoIterator<Item = (K, F)>) -> Vec<(String, Field)>
where
    K: Into<String>,
    F: Into<Field>,
{
    fields
        .into_iter()
        .map(|(name, field)| (name.into(), field.into()))
        .collect()
}

fn build_group(fields: Vec<(String, Field)>, validators: Vec<Validator>) -> FormGroup {
    let children: Vec<(String, Control)> = fields
        .into_iter()
        .map(|(name, field)| (name, field.build()))
        .collect();
    FormGroup::with_validators(children, validators)
}

/// Builds control trees from field lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormBuilder;

impl FormBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub fn group<K, F>(&self, fields: impl IntoIterator<Item = (K, F)>) -> FormGroup
    where
        K: Into<String>,
        F: Into<Field>,
    {
        self.group_with_validators(fields, Vec::new())
    }

    pub fn group_with_validators<K, F>(
        &self,
        fields: impl IntoIterator<Item = (K, F)>,
        validators: impl IntoIterator<Item = Validator>,
    ) -> FormGroup
    where
        K: Into<String>,
        F: Into<Field>,
    {
        build_group(collect_fields(fields), validators.into_iter().collect())
    }

    pub fn control(
        &self,
        initial: impl Into<ControlValue>,
        validators: impl IntoIterator<Item = Validator>,
    ) -> FormControl {
        FormControl::with_validators(initial, validators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators;

    struct TextInput {
        control: FormControl,
    }

    impl ControlContainer for TextInput {
        fn control(&self) -> FormControl {
            self.control.clone()
        }
    }

    #[test]
    fn shorthand_tuples_build_leaves() {
        let form = FormBuilder::new().group([
            ("asd", ("test", vec![validators::capitalized("asd")])),
            ("qwe", ("Test", vec![validators::capitalized("qwe")])),
        ]);
        assert_eq!(form.len(), 2);
        assert!(form.invalid());
        assert!(form.get("qwe").is_some_and(|c| c.valid()));
        assert!(form.get("asd").is_some_and(|c| c.is_leaf()));
    }

    #[test]
    fn existing_controls_are_attached_not_copied() {
        let leaf = FormControl::new("asd");
        let nested = FormGroup::new([("zxc", FormControl::new("asd"))]);
        let form = FormBuilder::new().group([
            ("asd", Field::from(leaf.clone())),
            ("qwe", Field::from(nested.clone())),
        ]);
        assert_eq!(form.get("asd"), Some(leaf.clone().into_control()));
        assert_eq!(form.get("qwe"), Some(nested.into_control()));
        assert_eq!(leaf.parent(), Some(form));
    }

    #[test]
    fn container_contributes_its_control() {
        let input = TextInput {
            control: FormControl::new("asd"),
        };
        let form = FormBuilder::new().group([("asd", Field::container(&input))]);
        assert_eq!(form.get("asd"), Some(input.control.into_control()));
    }

    #[test]
    fn nested_field_lists_build_groups() {
        let input = TextInput {
            control: FormControl::new("asd"),
        };
        let form = FormBuilder::new().group([(
            "asd",
            Field::group([
                ("asd", Field::container(&input)),
                ("qwe", FormControl::new("asd").into()),
                ("zxc", Field::validated("asd", [validators::min_length(8, "asd")])),
            ]),
        )]);
        let inner = form.get("asd").and_then(|c| c.as_group()).unwrap();
        assert_eq!(inner.len(), 3);
        assert!(inner.invalid());
        assert!(form.invalid());
    }

    #[test]
    fn group_validators_apply_to_built_group() {
        let form = FormBuilder::new().group_with_validators(
            [("password", Field::value("a")), ("confirm", Field::value("b"))],
            [validators::field_equality(["password", "confirm"], "mismatch")],
        );
        assert!(form.invalid());
        assert_eq!(form.errors()[0].message, "mismatch");
    }

    #[test]
    fn control_shortcut() {
        let control = FormBuilder::new().control("", [validators::required("req")]);
        assert!(control.invalid());
    }
}
