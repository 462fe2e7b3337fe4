mod common;

use common::{answers, fixture, hidden_section, no_data, section};
use form_spec::{
    Form, FormChild, NavigationPolicy, flatten, next_screen, previous_screen, progress,
    resume_screen,
};
use serde_json::json;

fn gapped_form() -> Form {
    Form::new("gapped", "Gapped")
        .with_child(FormChild::Section(section("first", &["a"])))
        .with_child(FormChild::Section(hidden_section("hidden", &["b", "c"])))
        .with_child(FormChild::Section(section("last", &["d"])))
}

#[test]
fn next_and_previous_skip_hidden_screens() {
    let form = gapped_form();
    let screens = flatten(&form, &answers(json!({})), &no_data()).expect("flatten");

    assert_eq!(next_screen(&screens, 0), Some(3));
    assert_eq!(next_screen(&screens, 3), None);
    assert_eq!(previous_screen(&screens, 3), Some(0));
    assert_eq!(previous_screen(&screens, 0), None);
}

#[test]
fn resume_moves_off_a_hidden_located_screen() {
    let form = gapped_form();
    let answers = answers(json!({ "a": "x" }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(form_spec::locate(&screens, &answers), 1);
    assert_eq!(
        resume_screen(&screens, &answers, NavigationPolicy::default()),
        Some(3)
    );
}

#[test]
fn resume_falls_back_to_an_earlier_screen() {
    let form = Form::new("tail", "Tail")
        .with_child(FormChild::Section(section("first", &["a"])))
        .with_child(FormChild::Section(hidden_section("hidden", &["b"])));
    let answers = answers(json!({ "a": "x" }));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(
        resume_screen(&screens, &answers, NavigationPolicy::default()),
        Some(0)
    );
}

#[test]
fn resume_on_empty_form_is_none() {
    let form = Form::new("empty", "Empty");
    let answers = answers(json!({}));
    let screens = flatten(&form, &answers, &no_data()).expect("flatten");
    assert_eq!(
        resume_screen(&screens, &answers, NavigationPolicy::default()),
        None
    );
}

#[test]
fn progress_counts_navigable_screens_only() {
    let form = gapped_form();
    let screens = flatten(&form, &answers(json!({})), &no_data()).expect("flatten");

    let report = progress(&screens, 3);
    assert_eq!(report.position, 2);
    assert_eq!(report.navigable_total, 2);
    assert_eq!(report.percent, 100);
    assert_eq!(report.section_index, Some(2));

    let hidden = progress(&screens, 1);
    assert_eq!(hidden.position, 0);
    assert_eq!(hidden.section_index, Some(1));
}

#[test]
fn fixture_walk_visits_every_navigable_screen() {
    let form = fixture("parental_leave");
    let screens = flatten(&form, &answers(json!({})), &no_data()).expect("flatten");
    let mut visited = vec![0];
    let mut current = 0;
    while let Some(next) = next_screen(&screens, current) {
        visited.push(next);
        current = next;
    }
    assert_eq!(visited, vec![0, 1, 2, 3, 6, 7]);
}
