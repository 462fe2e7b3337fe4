use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::{Field, MultiField, Repeater, Screen, ScreenRef};
use crate::spec::section::Section;

/// Policies shared by the locator and navigation helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct NavigationPolicy {
    /// Count an explicit `null` answer as provided.
    #[serde(default)]
    pub null_is_answered: bool,
}

/// Node allowed directly under a [`Form`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormChild {
    Section(Section),
    MultiField(MultiField),
    Repeater(Repeater),
    Field(Field),
}

impl FormChild {
    pub fn id(&self) -> &str {
        match self {
            FormChild::Section(section) => &section.id,
            FormChild::MultiField(multi) => &multi.id,
            FormChild::Repeater(repeater) => &repeater.id,
            FormChild::Field(field) => &field.id,
        }
    }

    /// Screen view of this node, `None` for sections.
    pub fn as_screen(&self) -> Option<ScreenRef<'_>> {
        match self {
            FormChild::Section(_) => None,
            FormChild::MultiField(multi) => Some(ScreenRef::MultiField(multi)),
            FormChild::Repeater(repeater) => Some(ScreenRef::Repeater(repeater)),
            FormChild::Field(field) => Some(ScreenRef::Field(field)),
        }
    }
}

/// Top-level form template.
///
/// A form is built once per template and never mutated; every derived view
/// (screens, sections, resume index) is recomputed from it together with an
/// answer snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_policy: Option<NavigationPolicy>,
    #[serde(default)]
    pub children: Vec<FormChild>,
}

impl Form {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            version: None,
            description: None,
            navigation_policy: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: FormChild) -> Self {
        self.children.push(child);
        self
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.navigation_policy.unwrap_or_default()
    }

    /// Declared sections in order, hidden ones included.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.children.iter().filter_map(|child| match child {
            FormChild::Section(section) => Some(section),
            _ => None,
        })
    }

    /// Top-level screen definitions in declaration order, repeater entries excluded.
    pub fn screens(&self) -> Vec<ScreenRef<'_>> {
        let mut screens = Vec::new();
        for child in &self.children {
            match child {
                FormChild::Section(section) => screens.extend(section.screens()),
                other => screens.extend(other.as_screen()),
            }
        }
        screens
    }

    /// Finds the repeater behind a repeater screen id.
    ///
    /// Top-level repeaters are addressed by their own id. A repeater inside
    /// another repeater is addressed through the outer entry, as in
    /// `children[0].toys`, matching the id its expanded screen carries.
    pub fn find_repeater(&self, path: &str) -> Option<&Repeater> {
        let Some((outer, id)) = split_entry_path(path) else {
            return self.screens().into_iter().find_map(|screen| match screen {
                ScreenRef::Repeater(repeater) if repeater.id == path => Some(repeater),
                _ => None,
            });
        };
        self.find_repeater(outer)?
            .children
            .iter()
            .find_map(|child| match child {
                Screen::Repeater(repeater) if repeater.id == id => Some(repeater),
                _ => None,
            })
    }
}

/// Splits `outer[n].id` into the outer repeater path and the inner id.
fn split_entry_path(path: &str) -> Option<(&str, &str)> {
    let (head, id) = path.rsplit_once("].")?;
    let (outer, index) = head.rsplit_once('[')?;
    index.parse::<usize>().ok()?;
    Some((outer, id))
}
