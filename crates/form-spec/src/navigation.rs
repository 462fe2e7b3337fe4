use serde::Serialize;

use crate::answers::AnswerMap;
use crate::flatten::FlattenedScreen;
use crate::locate::locate_with_policy;
use crate::spec::NavigationPolicy;

/// Nearest navigable screen after `current`.
pub fn next_screen(screens: &[FlattenedScreen<'_>], current: usize) -> Option<usize> {
    screens
        .iter()
        .enumerate()
        .skip(current.saturating_add(1))
        .find(|(_, screen)| screen.is_navigable)
        .map(|(index, _)| index)
}

/// Nearest navigable screen before `current`.
pub fn previous_screen(screens: &[FlattenedScreen<'_>], current: usize) -> Option<usize> {
    screens
        .iter()
        .enumerate()
        .take(current.min(screens.len()))
        .rev()
        .find(|(_, screen)| screen.is_navigable)
        .map(|(index, _)| index)
}

/// Screen shown when a user re-enters a partially completed form.
///
/// Starts from [`locate_with_policy`] and moves to the nearest navigable
/// screen, forward first. `None` only when no screen is navigable.
pub fn resume_screen(
    screens: &[FlattenedScreen<'_>],
    answers: &AnswerMap,
    policy: NavigationPolicy,
) -> Option<usize> {
    let located = locate_with_policy(screens, answers, policy);
    match screens.get(located) {
        Some(screen) if screen.is_navigable => Some(located),
        Some(_) => next_screen(screens, located).or_else(|| previous_screen(screens, located)),
        None => None,
    }
}

/// Position of the current screen among the navigable ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub current: usize,
    /// 1-based position among navigable screens, 0 if `current` is hidden.
    pub position: usize,
    pub navigable_total: usize,
    pub section_index: Option<usize>,
    pub sub_section_index: Option<usize>,
    pub percent: u8,
}

pub fn progress(screens: &[FlattenedScreen<'_>], current: usize) -> Progress {
    let navigable_total = screens.iter().filter(|screen| screen.is_navigable).count();
    let screen = screens.get(current);
    let position = match screen {
        Some(screen) if screen.is_navigable => screens[..current]
            .iter()
            .filter(|screen| screen.is_navigable)
            .count()
            + 1,
        _ => 0,
    };
    let percent = if navigable_total == 0 {
        0
    } else {
        ((position * 100) / navigable_total) as u8
    };
    Progress {
        current,
        position,
        navigable_total,
        section_index: screen.and_then(|screen| screen.section_index),
        sub_section_index: screen.and_then(|screen| screen.sub_section_index),
        percent,
    }
}
