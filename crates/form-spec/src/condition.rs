use crate::answers::{AnswerMap, ExternalDataMap};
use crate::error::FormError;
use crate::expr::Expr;

/// Decides whether the node owning `condition` is visible.
///
/// An absent condition is always visible. A malformed condition is reported
/// against `node_id` and aborts the pass.
pub fn evaluate(
    node_id: &str,
    condition: Option<&Expr>,
    answers: &AnswerMap,
    external: &ExternalDataMap,
) -> Result<bool, FormError> {
    let Some(condition) = condition else {
        return Ok(true);
    };
    condition
        .evaluate(answers, external)
        .map_err(|source| FormError::Condition {
            node_id: node_id.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprError;

    #[test]
    fn missing_condition_is_visible() {
        let answers = AnswerMap::new();
        assert_eq!(evaluate("intro", None, &answers, &answers), Ok(true));
    }

    #[test]
    fn errors_name_the_owning_node() {
        let answers = AnswerMap::new();
        let broken = Expr::answered("");
        assert_eq!(
            evaluate("spouse", Some(&broken), &answers, &answers),
            Err(FormError::Condition {
                node_id: "spouse".into(),
                source: ExprError::EmptyPath,
            })
        );
    }
}
