use serde::Serialize;
use tracing::debug;

use crate::answers::{AnswerMap, ExternalDataMap};
use crate::condition;
use crate::error::FormError;
use crate::spec::{Form, Section, SubSection};

/// A visible subsection with its declaration index inside its section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigableSubSection<'a> {
    pub index: usize,
    pub sub_section: &'a SubSection,
}

/// A visible section with its declaration index and visible subsections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigableSection<'a> {
    pub index: usize,
    pub section: &'a Section,
    pub sub_sections: Vec<NavigableSubSection<'a>>,
}

impl NavigableSection<'_> {
    pub fn id(&self) -> &str {
        &self.section.id
    }

    pub fn title(&self) -> &str {
        &self.section.title
    }
}

/// Sections and subsections whose conditions currently pass, in declaration order.
///
/// Only drives the progress sidebar; the flattened screen list keeps hidden
/// entries regardless.
pub fn navigable_sections<'a>(
    form: &'a Form,
    answers: &AnswerMap,
    external: &ExternalDataMap,
) -> Result<Vec<NavigableSection<'a>>, FormError> {
    let mut sections = Vec::new();
    for (index, section) in form.sections().enumerate() {
        if !condition::evaluate(&section.id, section.condition.as_ref(), answers, external)? {
            continue;
        }
        let mut sub_sections = Vec::new();
        for (sub_index, sub_section) in section.sub_sections().enumerate() {
            if condition::evaluate(
                &sub_section.id,
                sub_section.condition.as_ref(),
                answers,
                external,
            )? {
                sub_sections.push(NavigableSubSection {
                    index: sub_index,
                    sub_section,
                });
            }
        }
        sections.push(NavigableSection {
            index,
            section,
            sub_sections,
        });
    }
    debug!(form = %form.id, sections = sections.len(), "resolved navigable sections");
    Ok(sections)
}
