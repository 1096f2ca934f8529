#![forbid(unsafe_code)]

//! Trees built with `FormBuilder` behave like hand-built ones.

use ftui_forms::{
    ControlContainer, ControlValue, Field, FormBuilder, FormControl, FormGroup, validators,
};

struct Checkbox {
    control: FormControl,
}

impl ControlContainer for Checkbox {
    fn control(&self) -> FormControl {
        self.control.clone()
    }
}

#[test]
fn built_tree_matches_hand_built_tree() {
    let built = FormBuilder::new().group([
        ("name", Field::validated("Halib", [validators::capitalized("caps")])),
        ("age", Field::value(22)),
    ]);
    let manual = FormGroup::new([
        ("name", FormControl::with_validators("Halib", [validators::capitalized("caps")])),
        ("age", FormControl::new(22)),
    ]);
    assert_eq!(built.value(), manual.value());
    assert_eq!(built.status(), manual.status());
}

#[test]
fn mixed_fields_and_nesting() {
    let agree = Checkbox {
        control: FormControl::new(false),
    };
    let email = FormControl::new("a@b.c");
    let form = FormBuilder::new().group([
        ("email", Field::from(email.clone())),
        ("agree", Field::container(&agree)),
        (
            "password",
            Field::group_with_validators(
                [("value", Field::value("secret")), ("confirm", Field::value("secret"))],
                [validators::field_equality(["value", "confirm"], "mismatch")],
            ),
        ),
    ]);

    assert!(form.valid());
    assert!(form.contains(&email));
    assert_eq!(agree.control.parent(), Some(form.clone()));

    let password = form.get("password").and_then(|c| c.as_group()).unwrap();
    password
        .set_value(ControlValue::map([("confirm", "other")]))
        .unwrap();
    assert!(password.invalid());
    assert!(form.invalid());
    assert_eq!(
        form.value().get("password").and_then(|p| p.get("confirm")),
        Some(&ControlValue::from("other"))
    );
}

#[test]
fn built_group_propagates_edits() {
    let form = FormBuilder::new().group([("count", (0, vec![validators::min_number(1.0, "min")]))]);
    assert!(form.invalid());
    let count = form.get("count").and_then(|c| c.as_leaf()).unwrap();
    count.set_value(3).unwrap();
    assert!(form.valid());
    assert_eq!(form.value(), ControlValue::map([("count", 3)]));
}
