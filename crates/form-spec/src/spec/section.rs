use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::spec::field::{Field, MultiField, Repeater, Screen, ScreenRef};

/// Node allowed directly under a [`Section`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionChild {
    SubSection(SubSection),
    MultiField(MultiField),
    Repeater(Repeater),
    Field(Field),
}

impl SectionChild {
    pub fn id(&self) -> &str {
        match self {
            SectionChild::SubSection(sub_section) => &sub_section.id,
            SectionChild::MultiField(multi) => &multi.id,
            SectionChild::Repeater(repeater) => &repeater.id,
            SectionChild::Field(field) => &field.id,
        }
    }

    pub fn as_screen(&self) -> Option<ScreenRef<'_>> {
        match self {
            SectionChild::SubSection(_) => None,
            SectionChild::MultiField(multi) => Some(ScreenRef::MultiField(multi)),
            SectionChild::Repeater(repeater) => Some(ScreenRef::Repeater(repeater)),
            SectionChild::Field(field) => Some(ScreenRef::Field(field)),
        }
    }
}

/// Top-level grouping shown as one entry of the progress sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expr>,
    #[serde(default)]
    pub children: Vec<SectionChild>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            condition: None,
            children: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: Expr) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_child(mut self, child: SectionChild) -> Self {
        self.children.push(child);
        self
    }

    /// Declared subsections in order, hidden ones included.
    pub fn sub_sections(&self) -> impl Iterator<Item = &SubSection> {
        self.children.iter().filter_map(|child| match child {
            SectionChild::SubSection(sub_section) => Some(sub_section),
            _ => None,
        })
    }

    /// Every screen in the section, subsection screens included.
    pub fn screens(&self) -> impl Iterator<Item = ScreenRef<'_>> {
        self.children.iter().flat_map(|child| match child {
            SectionChild::SubSection(sub_section) => sub_section
                .children
                .iter()
                .map(Screen::view)
                .collect::<Vec<_>>(),
            other => other.as_screen().into_iter().collect(),
        })
    }
}

/// Second-level grouping inside a [`Section`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubSection {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expr>,
    #[serde(default)]
    pub children: Vec<Screen>,
}

impl SubSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            condition: None,
            children: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: Expr) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_child(mut self, child: Screen) -> Self {
        self.children.push(child);
        self
    }
}
