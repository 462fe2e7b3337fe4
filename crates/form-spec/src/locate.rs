use tracing::debug;

use crate::answers::AnswerMap;
use crate::flatten::FlattenedScreen;
use crate::spec::NavigationPolicy;

/// Whether every answer key of `screen` has been provided.
///
/// Single fields need their own key, multi-fields need every visible child,
/// repeaters only need their array key to be present (even when empty).
/// Screens that collect nothing, such as descriptions, are never answered.
pub fn is_screen_answered(
    screen: &FlattenedScreen<'_>,
    answers: &AnswerMap,
    policy: NavigationPolicy,
) -> bool {
    !screen.answer_ids.is_empty()
        && screen
            .answer_ids
            .iter()
            .all(|id| answers.has_value(id, policy))
}

/// Index of the screen a returning user resumes on.
///
/// This is the screen right after the furthest answered one, clamped to the
/// last screen. With nothing answered, or no screens at all, it is `0`.
/// Gaps before the furthest answered screen do not pull the index back.
pub fn locate(screens: &[FlattenedScreen<'_>], answers: &AnswerMap) -> usize {
    locate_with_policy(screens, answers, NavigationPolicy::default())
}

pub fn locate_with_policy(
    screens: &[FlattenedScreen<'_>],
    answers: &AnswerMap,
    policy: NavigationPolicy,
) -> usize {
    let furthest = screens
        .iter()
        .rposition(|screen| is_screen_answered(screen, answers, policy));
    let index = match furthest {
        Some(index) => (index + 1).min(screens.len() - 1),
        None => 0,
    };
    debug!(screens = screens.len(), ?furthest, index, "located current screen");
    index
}
