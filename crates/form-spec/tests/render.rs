mod common;

use common::{answers, fixture, no_data};
use form_spec::{RenderStatus, build_render_payload, render_json_ui, render_text};
use serde_json::json;

#[test]
fn render_text_shows_resume_screen_and_sidebar() {
    let form = fixture("parental_leave");
    let answers = answers(json!({ "approveExternalData": true }));
    let payload = build_render_payload(&form, &answers, &no_data(), None).expect("payload");

    assert_eq!(payload.status, RenderStatus::NeedInput);
    assert_eq!(payload.current_screen_id.as_deref(), Some("applicantInfo"));

    let text = render_text(&payload);
    assert!(text.contains("Current screen: applicantInfo"));
    assert!(text.contains(" > Applicant"));
    assert!(text.contains(" - applicant.email (Email) [required]"));
}

#[test]
fn render_json_ui_exposes_structure() {
    let form = fixture("parental_leave");
    let answers = answers(json!({ "applicant": { "email": "a@b.is" } }));
    let payload = build_render_payload(&form, &answers, &no_data(), Some(2)).expect("payload");

    let ui = render_json_ui(&payload);
    assert_eq!(ui["form_id"], "parental-leave");
    assert_eq!(ui["current_screen_id"], "applicantInfo");
    assert_eq!(ui["progress"]["position"], 3);
    assert_eq!(ui["progress"]["navigable_total"], 6);
    let screens = ui["screens"].as_array().expect("screens array");
    assert_eq!(screens.len(), 8);
    assert_eq!(screens[2]["fields"][0]["current_value"], "a@b.is");
    assert_eq!(screens[4]["navigable"], false);
    let sections = ui["sections"].as_array().expect("sections array");
    assert_eq!(sections[1]["active"], true);
}

#[test]
fn out_of_range_current_falls_back_to_resume() {
    let form = fixture("parental_leave");
    let payload =
        build_render_payload(&form, &answers(json!({})), &no_data(), Some(99)).expect("payload");
    assert_eq!(payload.current_screen_id.as_deref(), Some("intro"));
}

#[test]
fn answering_every_navigable_screen_completes_the_form() {
    let form = fixture("parental_leave");
    let answers = answers(json!({
        "approveExternalData": true,
        "applicant": { "email": "a@b.is", "phone": "555", "relationship": "father" },
        "periods": []
    }));
    let payload = build_render_payload(&form, &answers, &no_data(), None).expect("payload");
    assert_eq!(payload.status, RenderStatus::Complete);
    assert_eq!(payload.current_screen_id.as_deref(), Some("review"));
}
