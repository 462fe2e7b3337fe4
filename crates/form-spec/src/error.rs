use thiserror::Error;

use crate::expr::ExprError;

/// Errors surfaced by the screen-resolution operations.
///
/// All of them point at a defect in the form definition rather than in the
/// answers; missing answers are never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("condition on '{node_id}' failed: {source}")]
    Condition {
        node_id: String,
        #[source]
        source: ExprError,
    },
    #[error("repeater '{0}' is not part of the form")]
    UnknownRepeater(String),
}
