#![allow(missing_docs)]

pub mod answers;
pub mod condition;
pub mod defaults;
pub mod error;
pub mod expr;
pub mod flatten;
pub mod locate;
pub mod navigation;
pub mod render;
pub mod sections;
pub mod spec;
pub mod validate;

pub use answers::{AnswerMap, DataMap, ExternalDataMap};
pub use defaults::{apply_defaults, resolve_defaults};
pub use error::FormError;
pub use expr::{Comparator, Expr, ExprError, Source};
pub use flatten::{FlattenedScreen, RepeaterEntry, expand_repeater, flatten};
pub use locate::{is_screen_answered, locate, locate_with_policy};
pub use navigation::{Progress, next_screen, previous_screen, progress, resume_screen};
pub use render::{
    RenderPayload, RenderScreen, RenderSection, RenderStatus, build_render_payload,
    render_json_ui, render_text,
};
pub use sections::{NavigableSection, NavigableSubSection, navigable_sections};
pub use spec::{
    DefaultValue, Field, FieldKind, FieldOption, Form, FormChild, MultiField, NavigationPolicy,
    Repeater, Screen, ScreenRef, Section, SectionChild, SubSection,
};
pub use validate::{ValidationError, ValidationResult, validate};
