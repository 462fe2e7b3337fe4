use std::collections::BTreeSet;

use serde::Serialize;

use crate::expr::Expr;
use crate::spec::{Form, FormChild, ScreenRef, SectionChild};

/// One authoring defect in a form definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub node_id: Option<String>,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Reports structural defects of a form definition.
///
/// The screen operations assume a well-formed tree and never repair it;
/// this check is meant for authoring time and tests.
pub fn validate(form: &Form) -> ValidationResult {
    let mut checker = Checker::default();
    checker.require_id(&form.id);
    for child in &form.children {
        match child {
            FormChild::Section(section) => {
                checker.node(&section.id, section.condition.as_ref());
                for child in &section.children {
                    match child {
                        SectionChild::SubSection(sub_section) => {
                            checker.node(&sub_section.id, sub_section.condition.as_ref());
                            for screen in &sub_section.children {
                                checker.screen(screen.view());
                            }
                        }
                        other => {
                            if let Some(screen) = other.as_screen() {
                                checker.screen(screen);
                            }
                        }
                    }
                }
            }
            other => {
                if let Some(screen) = other.as_screen() {
                    checker.screen(screen);
                }
            }
        }
    }

    ValidationResult {
        valid: checker.errors.is_empty(),
        errors: checker.errors,
    }
}

#[derive(Default)]
struct Checker {
    seen: BTreeSet<String>,
    errors: Vec<ValidationError>,
}

impl Checker {
    fn error(&mut self, node_id: &str, message: String, code: &str) {
        self.errors.push(ValidationError {
            node_id: (!node_id.is_empty()).then(|| node_id.to_string()),
            message,
            code: code.into(),
        });
    }

    fn require_id(&mut self, id: &str) -> bool {
        if id.trim().is_empty() {
            self.error(id, "node id is empty".into(), "empty_id");
            return false;
        }
        true
    }

    fn node(&mut self, id: &str, condition: Option<&Expr>) {
        if self.require_id(id) && !self.seen.insert(id.to_string()) {
            self.error(id, format!("duplicate id '{}'", id), "duplicate_id");
        }
        if let Some(condition) = condition
            && let Err(err) = condition.check()
        {
            self.error(id, err.to_string(), "invalid_condition");
        }
    }

    fn screen(&mut self, screen: ScreenRef<'_>) {
        self.node(screen.id(), screen.condition());
        match screen {
            ScreenRef::Field(field) => {
                if field.kind.has_options() && field.options.is_empty() {
                    self.error(
                        &field.id,
                        format!("{} field has no options", field.kind.as_str()),
                        "missing_options",
                    );
                }
            }
            ScreenRef::MultiField(multi) => {
                if multi.children.is_empty() {
                    self.error(&multi.id, "multi-field has no fields".into(), "empty_group");
                }
                for field in &multi.children {
                    self.screen(ScreenRef::Field(field));
                }
            }
            ScreenRef::Repeater(repeater) => {
                if repeater.children.is_empty() {
                    self.error(&repeater.id, "repeater has no screens".into(), "empty_group");
                }
                // Entry ids are scoped under the repeater key.
                let outer = std::mem::take(&mut self.seen);
                for child in &repeater.children {
                    self.screen(child.view());
                }
                self.seen = outer;
            }
        }
    }
}
