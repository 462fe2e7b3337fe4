use tracing::debug;

use crate::answers::{AnswerMap, ExternalDataMap};
use crate::spec::{DefaultValue, Field, Form, ScreenRef};

/// Values for unanswered fields whose default currently resolves.
///
/// Existing answers are never overwritten; the result only holds the keys
/// that would be filled in. Fields inside repeater entries are skipped since
/// their keys depend on the entry index.
pub fn resolve_defaults(form: &Form, answers: &AnswerMap, external: &ExternalDataMap) -> AnswerMap {
    let policy = form.policy();
    let mut defaults = AnswerMap::new();
    for field in form.screens().into_iter().flat_map(screen_fields) {
        let Some(default_value) = &field.default_value else {
            continue;
        };
        if !field.kind.collects_answer() || answers.has_value(&field.id, policy) {
            continue;
        }
        let resolved = match default_value {
            DefaultValue::Literal { value } => Some(value.clone()),
            DefaultValue::Answer { path } => answers.get(path).cloned(),
            DefaultValue::ExternalData { path } => external.get(path).cloned(),
        };
        if let Some(value) = resolved.filter(|value| !value.is_null()) {
            defaults.insert(&field.id, value);
        }
    }
    debug!(form = %form.id, defaults = defaults.as_map().len(), "resolved default values");
    defaults
}

/// Merges resolved defaults into a copy of `answers`.
pub fn apply_defaults(form: &Form, answers: &AnswerMap, external: &ExternalDataMap) -> AnswerMap {
    let mut merged = answers.clone();
    let defaults = resolve_defaults(form, answers, external);
    for field in form.screens().into_iter().flat_map(screen_fields) {
        if let Some(value) = defaults.get(&field.id) {
            merged.insert(&field.id, value.clone());
        }
    }
    merged
}

fn screen_fields(screen: ScreenRef<'_>) -> Vec<&Field> {
    match screen {
        ScreenRef::Field(field) => vec![field],
        ScreenRef::MultiField(multi) => multi.children.iter().collect(),
        ScreenRef::Repeater(_) => Vec::new(),
    }
}
