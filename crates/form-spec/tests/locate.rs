mod common;

use common::{answers, description, fixture, flat_form, multi_field, no_data, repeater};
use form_spec::{
    Form, FormChild, NavigationPolicy, flatten, is_screen_answered, locate, locate_with_policy,
};
use serde_json::json;

fn intro_form() -> Form {
    Form::new("intro", "Intro")
        .with_child(FormChild::Field(description("intro")))
        .with_child(FormChild::Field(common::field("a")))
        .with_child(FormChild::Field(common::field("b")))
        .with_child(FormChild::Field(common::field("c")))
}

#[test]
fn empty_screen_list_locates_zero() {
    assert_eq!(locate(&[], &answers(json!({}))), 0);
}

#[test]
fn nothing_answered_starts_at_the_first_screen() {
    let form = intro_form();
    let screens = flatten(&form, &answers(json!({})), &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers(json!({}))), 0);
}

#[test]
fn resumes_after_the_answered_run() {
    let form = intro_form();
    let answers = answers(json!({ "a": "x" }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers), 2);
}

#[test]
fn answered_last_screen_stays_on_the_last_screen() {
    let form = intro_form();
    let answers = answers(json!({ "a": "x", "c": "y" }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers), 3);
}

#[test]
fn fully_answered_form_lands_on_the_last_screen() {
    let form = flat_form(&["a", "b"]);
    let answers = answers(json!({ "a": 1, "b": 2 }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers), 1);
}

#[test]
fn disjoint_gaps_resume_after_the_furthest_answer() {
    let form = flat_form(&["a", "b", "c", "d"]);
    let answers = answers(json!({ "a": 1, "c": 3 }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers), 3);
}

#[test]
fn partially_filled_multi_field_keeps_the_locator_on_it() {
    let form = flat_form(&["name"])
        .with_child(FormChild::MultiField(multi_field("contact", &["email", "phone"])))
        .with_child(FormChild::Field(common::field("notes")));

    let partial = answers(json!({ "name": "Anna", "email": "anna@example.com" }));
    let screens = flatten(&form, &partial, &no_data()).expect("flatten");
    assert!(!is_screen_answered(&screens[1], &partial, NavigationPolicy::default()));
    assert_eq!(locate(&screens, &partial), 1);

    let full = answers(json!({ "name": "Anna", "email": "anna@example.com", "phone": "555" }));
    assert!(is_screen_answered(&screens[1], &full, NavigationPolicy::default()));
    assert_eq!(locate(&screens, &full), 2);
}

#[test]
fn empty_repeater_array_counts_as_answered() {
    let form = Form::new("rep", "Rep")
        .with_child(FormChild::Repeater(repeater("children", &["name"])))
        .with_child(FormChild::Field(common::field("after")));
    let answers = answers(json!({ "children": [] }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers), 1);
}

#[test]
fn nested_answers_are_found_by_dot_path() {
    let form = fixture("parental_leave");
    let answers = answers(json!({
        "approveExternalData": true,
        "applicant": { "email": "a@b.is", "phone": "555", "relationship": "mother" }
    }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers), 4);
}

#[test]
fn null_answers_follow_the_policy() {
    let form = flat_form(&["a", "b", "c"]);
    let answers = answers(json!({ "a": null }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers), 0);
    let policy = NavigationPolicy {
        null_is_answered: true,
    };
    assert_eq!(locate_with_policy(&screens, &answers, policy), 1);
}

#[test]
fn locate_is_idempotent() {
    let form = intro_form();
    let answers = answers(json!({ "a": "x" }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(locate(&screens, &answers), locate(&screens, &answers));
}
