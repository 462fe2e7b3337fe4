use serde::Serialize;
use tracing::{debug, trace};

use crate::answers::{AnswerMap, ExternalDataMap};
use crate::condition;
use crate::error::FormError;
use crate::expr::Expr;
use crate::spec::{Form, FormChild, ScreenRef, SectionChild};

/// Entry of an expanded repeater a screen belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeaterEntry {
    pub repeater_id: String,
    pub index: usize,
}

/// One navigable unit of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenedScreen<'a> {
    pub id: String,
    /// False when the screen or one of its owning groups is hidden.
    pub is_navigable: bool,
    /// Declaration index of the owning section.
    pub section_index: Option<usize>,
    /// Declaration index of the owning subsection within its section.
    pub sub_section_index: Option<usize>,
    /// Answer keys that must all be present for the screen to count as answered.
    pub answer_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeater: Option<RepeaterEntry>,
    pub node: ScreenRef<'a>,
}

impl FlattenedScreen<'_> {
    pub fn kind_label(&self) -> &'static str {
        self.node.kind_label()
    }
}

struct Placement {
    visible: bool,
    section_index: Option<usize>,
    sub_section_index: Option<usize>,
}

struct Flattener<'a, 'd> {
    answers: &'d AnswerMap,
    external: &'d ExternalDataMap,
    screens: Vec<FlattenedScreen<'a>>,
}

impl<'a> Flattener<'a, '_> {
    fn visible(&self, node_id: &str, condition: Option<&Expr>) -> Result<bool, FormError> {
        condition::evaluate(node_id, condition, self.answers, self.external)
    }

    fn push(
        &mut self,
        node: ScreenRef<'a>,
        placement: &Placement,
        prefix: Option<&RepeaterEntry>,
    ) -> Result<(), FormError> {
        let id = scoped_id(prefix, node.id());
        let own_visible = self.visible(&id, node.condition())?;
        let is_navigable = placement.visible && own_visible;
        let answer_ids = match node {
            ScreenRef::Field(field) if field.kind.collects_answer() => vec![id.clone()],
            ScreenRef::Field(_) => Vec::new(),
            ScreenRef::Repeater(_) => vec![id.clone()],
            ScreenRef::MultiField(multi) => {
                let mut ids = Vec::new();
                for field in &multi.children {
                    if !field.kind.collects_answer() {
                        continue;
                    }
                    let field_id = scoped_id(prefix, &field.id);
                    if self.visible(&field_id, field.condition.as_ref())? {
                        ids.push(field_id);
                    }
                }
                ids
            }
        };
        trace!(screen = %id, navigable = is_navigable, "screen");
        self.screens.push(FlattenedScreen {
            id,
            is_navigable,
            section_index: placement.section_index,
            sub_section_index: placement.sub_section_index,
            answer_ids,
            repeater: prefix.cloned(),
            node,
        });
        Ok(())
    }
}

fn scoped_id(prefix: Option<&RepeaterEntry>, id: &str) -> String {
    match prefix {
        Some(entry) => format!("{}[{}].{}", entry.repeater_id, entry.index, id),
        None => id.to_string(),
    }
}

/// Flattens the form tree into the ordered list of wizard screens.
///
/// Hidden sections and subsections keep their screens in the list, marked
/// non-navigable, so answers already given to them are not lost. Screens
/// placed directly on the form after a section share that section's indices.
pub fn flatten<'a>(
    form: &'a Form,
    answers: &AnswerMap,
    external: &ExternalDataMap,
) -> Result<Vec<FlattenedScreen<'a>>, FormError> {
    let mut flattener = Flattener {
        answers,
        external,
        screens: Vec::new(),
    };
    let mut last_section: Option<usize> = None;
    let mut last_sub_section: Option<usize> = None;
    let mut section_count = 0;

    for child in &form.children {
        let FormChild::Section(section) = child else {
            if let Some(screen) = child.as_screen() {
                let placement = Placement {
                    visible: true,
                    section_index: last_section,
                    sub_section_index: last_sub_section,
                };
                flattener.push(screen, &placement, None)?;
            }
            continue;
        };

        let section_index = section_count;
        section_count += 1;
        last_section = Some(section_index);
        last_sub_section = None;
        let section_visible = flattener.visible(&section.id, section.condition.as_ref())?;
        let mut sub_section_count = 0;

        for child in &section.children {
            match child {
                SectionChild::SubSection(sub_section) => {
                    let sub_section_index = sub_section_count;
                    sub_section_count += 1;
                    last_sub_section = Some(sub_section_index);
                    let sub_visible =
                        flattener.visible(&sub_section.id, sub_section.condition.as_ref())?;
                    let placement = Placement {
                        visible: section_visible && sub_visible,
                        section_index: Some(section_index),
                        sub_section_index: Some(sub_section_index),
                    };
                    for screen in &sub_section.children {
                        flattener.push(screen.view(), &placement, None)?;
                    }
                }
                other => {
                    if let Some(screen) = other.as_screen() {
                        let placement = Placement {
                            visible: section_visible,
                            section_index: Some(section_index),
                            sub_section_index: None,
                        };
                        flattener.push(screen, &placement, None)?;
                    }
                }
            }
        }
    }

    let screens = flattener.screens;
    debug!(
        form = %form.id,
        screens = screens.len(),
        navigable = screens.iter().filter(|screen| screen.is_navigable).count(),
        "flattened form"
    );
    Ok(screens)
}

/// Builds the screens of one repeater entry.
///
/// `repeater_id` is the id of the repeater's flattened screen: the bare id for
/// a top-level repeater, or the scoped id such as `children[0].toys` for one
/// inside another entry. Entry screens inherit the indices and navigability
/// of the top-level screen that owns them and are keyed under
/// `repeater_id[entry].`. The caller splices them in after the repeater's own
/// screen.
pub fn expand_repeater<'a>(
    form: &'a Form,
    repeater_id: &str,
    entry: usize,
    answers: &AnswerMap,
    external: &ExternalDataMap,
) -> Result<Vec<FlattenedScreen<'a>>, FormError> {
    let unknown = || FormError::UnknownRepeater(repeater_id.to_string());
    let repeater = form.find_repeater(repeater_id).ok_or_else(unknown)?;
    let root_id = repeater_id
        .split_once('[')
        .map_or(repeater_id, |(root, _)| root);
    let owner = flatten(form, answers, external)?
        .into_iter()
        .find(|screen| screen.id == root_id)
        .ok_or_else(unknown)?;
    let own_visible =
        condition::evaluate(repeater_id, repeater.condition.as_ref(), answers, external)?;
    let placement = Placement {
        visible: owner.is_navigable && own_visible,
        section_index: owner.section_index,
        sub_section_index: owner.sub_section_index,
    };

    let prefix = RepeaterEntry {
        repeater_id: repeater_id.to_string(),
        index: entry,
    };
    let mut flattener = Flattener {
        answers,
        external,
        screens: Vec::new(),
    };
    for screen in &repeater.children {
        flattener.push(screen.view(), &placement, Some(&prefix))?;
    }
    debug!(
        repeater = %repeater_id,
        entry,
        screens = flattener.screens.len(),
        "expanded repeater entry"
    );
    Ok(flattener.screens)
}
