pub mod field;
pub mod form;
pub mod section;

pub use field::{
    DefaultValue, Field, FieldKind, FieldOption, MultiField, Repeater, Screen, ScreenRef,
};
pub use form::{Form, FormChild, NavigationPolicy};
pub use section::{Section, SectionChild, SubSection};
