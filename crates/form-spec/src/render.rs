use serde_json::{Map, Value, json};

use crate::{
    answers::{AnswerMap, ExternalDataMap},
    error::FormError,
    flatten::{FlattenedScreen, flatten},
    locate::is_screen_answered,
    navigation::{Progress, progress, resume_screen},
    sections::navigable_sections,
    spec::{Field, FieldKind, Form, ScreenRef},
};

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// A navigable screen still lacks answers.
    NeedInput,
    /// Every navigable screen that collects answers is answered.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
        }
    }
}

/// Describes one input of a screen.
#[derive(Debug, Clone)]
pub struct RenderField {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<String>,
    pub current_value: Option<Value>,
}

/// Describes a flattened screen for render outputs.
#[derive(Debug, Clone)]
pub struct RenderScreen {
    pub id: String,
    pub title: String,
    pub kind: &'static str,
    pub navigable: bool,
    pub answered: bool,
    pub section_index: Option<usize>,
    pub sub_section_index: Option<usize>,
    pub fields: Vec<RenderField>,
}

#[derive(Debug, Clone)]
pub struct RenderSubSection {
    pub id: String,
    pub title: String,
    pub active: bool,
}

/// Sidebar entry.
#[derive(Debug, Clone)]
pub struct RenderSection {
    pub id: String,
    pub title: String,
    pub active: bool,
    pub sub_sections: Vec<RenderSubSection>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub form_id: String,
    pub form_title: String,
    pub form_version: Option<String>,
    pub status: RenderStatus,
    pub current_screen_id: Option<String>,
    pub progress: Option<Progress>,
    pub help: Option<String>,
    pub screens: Vec<RenderScreen>,
    pub sections: Vec<RenderSection>,
}

impl RenderPayload {
    pub fn current_screen(&self) -> Option<&RenderScreen> {
        let current = self.progress.as_ref()?.current;
        self.screens.get(current)
    }
}

/// Build the renderer payload from the form, answers and external data.
///
/// `current` pins the displayed screen; without it the resume screen is used.
pub fn build_render_payload(
    form: &Form,
    answers: &AnswerMap,
    external: &ExternalDataMap,
    current: Option<usize>,
) -> Result<RenderPayload, FormError> {
    let policy = form.policy();
    let flattened = flatten(form, answers, external)?;
    let current = current
        .filter(|index| *index < flattened.len())
        .or_else(|| resume_screen(&flattened, answers, policy));
    let progress = current.map(|index| progress(&flattened, index));

    let screens = flattened
        .iter()
        .map(|screen| RenderScreen {
            id: screen.id.clone(),
            title: screen.node.title().to_string(),
            kind: screen.kind_label(),
            navigable: screen.is_navigable,
            answered: is_screen_answered(screen, answers, policy),
            section_index: screen.section_index,
            sub_section_index: screen.sub_section_index,
            fields: screen_fields(screen, answers),
        })
        .collect::<Vec<_>>();

    let complete = screens
        .iter()
        .zip(&flattened)
        .filter(|(render, screen)| render.navigable && !screen.answer_ids.is_empty())
        .all(|(render, _)| render.answered);
    let status = if complete {
        RenderStatus::Complete
    } else {
        RenderStatus::NeedInput
    };

    let active_section = progress.as_ref().and_then(|progress| progress.section_index);
    let active_sub_section = progress
        .as_ref()
        .and_then(|progress| progress.sub_section_index);
    let sections = navigable_sections(form, answers, external)?
        .into_iter()
        .map(|section| {
            let active = active_section == Some(section.index);
            RenderSection {
                id: section.id().to_string(),
                title: section.title().to_string(),
                active,
                sub_sections: section
                    .sub_sections
                    .iter()
                    .map(|sub| RenderSubSection {
                        id: sub.sub_section.id.clone(),
                        title: sub.sub_section.title.clone(),
                        active: active && active_sub_section == Some(sub.index),
                    })
                    .collect(),
            }
        })
        .collect();

    Ok(RenderPayload {
        form_id: form.id.clone(),
        form_title: form.title.clone(),
        form_version: form.version.clone(),
        status,
        current_screen_id: current.map(|index| flattened[index].id.clone()),
        progress,
        help: form.description.clone(),
        screens,
        sections,
    })
}

fn screen_fields(screen: &FlattenedScreen<'_>, answers: &AnswerMap) -> Vec<RenderField> {
    let field = |field: &Field, id: String| RenderField {
        current_value: answers.get(&id).cloned(),
        id,
        title: field.title.clone(),
        description: field.description.clone(),
        kind: field.kind,
        required: field.required,
        options: field.options.iter().map(|option| option.value.clone()).collect(),
    };
    match screen.node {
        ScreenRef::Field(single) => vec![field(single, screen.id.clone())],
        ScreenRef::MultiField(multi) => {
            let prefix = screen
                .id
                .strip_suffix(multi.id.as_str())
                .unwrap_or_default();
            multi
                .children
                .iter()
                .map(|child| field(child, format!("{}{}", prefix, child.id)))
                .collect()
        }
        ScreenRef::Repeater(_) => Vec::new(),
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let screens = payload
        .screens
        .iter()
        .map(|screen| {
            let fields = screen
                .fields
                .iter()
                .map(|field| {
                    let mut map = Map::new();
                    map.insert("id".into(), Value::String(field.id.clone()));
                    map.insert("title".into(), Value::String(field.title.clone()));
                    map.insert(
                        "description".into(),
                        field
                            .description
                            .clone()
                            .map(Value::String)
                            .unwrap_or(Value::Null),
                    );
                    map.insert("type".into(), Value::String(field.kind.as_str().into()));
                    map.insert("required".into(), Value::Bool(field.required));
                    if !field.options.is_empty() {
                        map.insert("options".into(), json!(field.options));
                    }
                    if let Some(current_value) = &field.current_value {
                        map.insert("current_value".into(), current_value.clone());
                    }
                    Value::Object(map)
                })
                .collect::<Vec<_>>();
            json!({
                "id": screen.id,
                "title": screen.title,
                "type": screen.kind,
                "navigable": screen.navigable,
                "answered": screen.answered,
                "section_index": screen.section_index,
                "sub_section_index": screen.sub_section_index,
                "fields": fields,
            })
        })
        .collect::<Vec<_>>();

    let sections = payload
        .sections
        .iter()
        .map(|section| {
            json!({
                "id": section.id,
                "title": section.title,
                "active": section.active,
                "sub_sections": section
                    .sub_sections
                    .iter()
                    .map(|sub| json!({ "id": sub.id, "title": sub.title, "active": sub.active }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();

    json!({
        "form_id": payload.form_id,
        "form_title": payload.form_title,
        "form_version": payload.form_version,
        "status": payload.status.as_str(),
        "current_screen_id": payload.current_screen_id,
        "progress": payload.progress,
        "help": payload.help,
        "screens": screens,
        "sections": sections,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {} ({})", payload.form_title, payload.form_id));
    match &payload.progress {
        Some(progress) => lines.push(format!(
            "Status: {} ({}/{}, {}%)",
            payload.status.as_str(),
            progress.position,
            progress.navigable_total,
            progress.percent
        )),
        None => lines.push(format!("Status: {}", payload.status.as_str())),
    }
    if let Some(help) = &payload.help {
        lines.push(format!("Help: {}", help));
    }

    if !payload.sections.is_empty() {
        lines.push("Sections:".to_string());
        for section in &payload.sections {
            let marker = if section.active { ">" } else { " " };
            lines.push(format!(" {} {}", marker, section.title));
            for sub in &section.sub_sections {
                let marker = if sub.active { ">" } else { " " };
                lines.push(format!("   {} {}", marker, sub.title));
            }
        }
    }

    match payload.current_screen() {
        Some(screen) => {
            lines.push(format!("Current screen: {} ({})", screen.id, screen.title));
            for field in &screen.fields {
                let mut entry = format!(" - {} ({})", field.id, field.title);
                if field.required {
                    entry.push_str(" [required]");
                }
                if let Some(value) = &field.current_value {
                    entry.push_str(&format!(" = {}", value_to_display(value)));
                }
                lines.push(entry);
            }
        }
        None => lines.push("No navigable screens.".to_string()),
    }

    lines.join("\n")
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        other => other.to_string(),
    }
}
