#![allow(dead_code)]

use form_spec::{
    AnswerMap, ExternalDataMap, Expr, Field, FieldKind, Form, FormChild, MultiField, Repeater,
    Screen, Section, SectionChild, SubSection,
};
use serde_json::Value;

pub fn fixture(name: &str) -> Form {
    let raw = match name {
        "parental_leave" => include_str!("../fixtures/parental_leave.json"),
        _ => panic!("unknown fixture {}", name),
    };
    serde_json::from_str(raw).expect("deserialize fixture")
}

pub fn answers(value: Value) -> AnswerMap {
    AnswerMap::from_value(value)
}

pub fn no_data() -> ExternalDataMap {
    ExternalDataMap::new()
}

pub fn field(id: &str) -> Field {
    Field::text(id)
}

pub fn description(id: &str) -> Field {
    Field::new(id, id, FieldKind::Description)
}

/// Form whose top-level children are single text fields.
pub fn flat_form(ids: &[&str]) -> Form {
    ids.iter().fold(Form::new("flat", "Flat"), |form, id| {
        form.with_child(FormChild::Field(field(id)))
    })
}

pub fn section(id: &str, fields: &[&str]) -> Section {
    fields.iter().fold(Section::new(id, id), |section, field_id| {
        section.with_child(SectionChild::Field(field(field_id)))
    })
}

pub fn hidden_section(id: &str, fields: &[&str]) -> Section {
    section(id, fields).with_condition(Expr::literal(false))
}

pub fn sub_section(id: &str, fields: &[&str]) -> SubSection {
    fields.iter().fold(SubSection::new(id, id), |sub, field_id| {
        sub.with_child(Screen::Field(field(field_id)))
    })
}

pub fn multi_field(id: &str, fields: &[&str]) -> MultiField {
    MultiField::new(id, id, fields.iter().map(|field_id| field(field_id)).collect())
}

pub fn repeater(id: &str, fields: &[&str]) -> Repeater {
    Repeater::new(
        id,
        id,
        fields
            .iter()
            .map(|field_id| Screen::Field(field(field_id)))
            .collect(),
    )
}

pub fn ids(screens: &[form_spec::FlattenedScreen<'_>]) -> Vec<String> {
    screens.iter().map(|screen| screen.id.clone()).collect()
}
