use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expr::Expr;

/// Input widget a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    TextArea,
    Number,
    Date,
    Checkbox,
    Radio,
    Select,
    FileUpload,
    /// Static text; never carries an answer.
    Description,
    /// Consent screen that triggers the external data fetch.
    ExternalDataProvider,
    /// Summary of earlier answers; never carries an answer.
    Review,
}

impl FieldKind {
    /// Whether the field stores a value under its id.
    pub fn collects_answer(&self) -> bool {
        !matches!(self, FieldKind::Description | FieldKind::Review)
    }

    /// Whether the field picks from [`Field::options`].
    pub fn has_options(&self) -> bool {
        matches!(self, FieldKind::Radio | FieldKind::Select)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "text_area",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Select => "select",
            FieldKind::FileUpload => "file_upload",
            FieldKind::Description => "description",
            FieldKind::ExternalDataProvider => "external_data_provider",
            FieldKind::Review => "review",
        }
    }
}

/// One selectable choice of a radio/select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Where a field's initial value comes from when it has not been answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum DefaultValue {
    Literal { value: Value },
    Answer { path: String },
    ExternalData { path: String },
}

/// A single input, keyed by its dot-path id in the answer map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

impl Field {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            kind,
            required: false,
            options: Vec::new(),
            condition: None,
            default_value: None,
        }
    }

    pub fn text(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, FieldKind::Text)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_condition(mut self, condition: Expr) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_default(mut self, default_value: DefaultValue) -> Self {
        self.default_value = Some(default_value);
        self
    }
}

/// Several fields presented together on one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MultiField {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expr>,
    #[serde(default)]
    pub children: Vec<Field>,
}

impl MultiField {
    pub fn new(id: impl Into<String>, title: impl Into<String>, children: Vec<Field>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            condition: None,
            children,
        }
    }
}

/// Variable-length list of structurally identical entries.
///
/// Unexpanded, the repeater is a single "manage entries" screen whose answer
/// is the array stored under its id. Each entry's own screens come from
/// [`expand_repeater`](crate::flatten::expand_repeater).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Repeater {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expr>,
    #[serde(default)]
    pub children: Vec<Screen>,
}

impl Repeater {
    pub fn new(id: impl Into<String>, title: impl Into<String>, children: Vec<Screen>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            condition: None,
            children,
        }
    }
}

/// Node that becomes exactly one flattened screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Screen {
    MultiField(MultiField),
    Repeater(Repeater),
    Field(Field),
}

impl Screen {
    pub fn view(&self) -> ScreenRef<'_> {
        match self {
            Screen::MultiField(multi) => ScreenRef::MultiField(multi),
            Screen::Repeater(repeater) => ScreenRef::Repeater(repeater),
            Screen::Field(field) => ScreenRef::Field(field),
        }
    }
}

/// Borrowed view of the definition behind a flattened screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenRef<'a> {
    MultiField(&'a MultiField),
    Repeater(&'a Repeater),
    Field(&'a Field),
}

impl<'a> ScreenRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            ScreenRef::MultiField(multi) => &multi.id,
            ScreenRef::Repeater(repeater) => &repeater.id,
            ScreenRef::Field(field) => &field.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            ScreenRef::MultiField(multi) => &multi.title,
            ScreenRef::Repeater(repeater) => &repeater.title,
            ScreenRef::Field(field) => &field.title,
        }
    }

    pub fn condition(&self) -> Option<&'a Expr> {
        match self {
            ScreenRef::MultiField(multi) => multi.condition.as_ref(),
            ScreenRef::Repeater(repeater) => repeater.condition.as_ref(),
            ScreenRef::Field(field) => field.condition.as_ref(),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            ScreenRef::MultiField(_) => "multi_field",
            ScreenRef::Repeater(_) => "repeater",
            ScreenRef::Field(field) => field.kind.as_str(),
        }
    }
}
