use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::answers::DataMap;

/// Snapshot an expression reads a path from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    #[default]
    Answers,
    ExternalData,
}

/// Comparison used by [`Expr::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Authoring defect found while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("expression references an empty path")]
    EmptyPath,
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Expression AST used for section, subsection and screen conditions.
///
/// Values that have not been provided yet read as absent: every check
/// against them is false except `neq` and `not`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expr {
    LiteralBool {
        value: bool,
    },
    /// Truthiness of the referenced value.
    Var {
        path: String,
        #[serde(default)]
        source: Source,
    },
    /// The referenced value has been provided (non-null).
    Answered {
        path: String,
        #[serde(default)]
        source: Source,
    },
    Compare {
        path: String,
        #[serde(default)]
        source: Source,
        comparator: Comparator,
        value: Value,
    },
    /// Two referenced values are equal and both present.
    Eq {
        left: String,
        right: String,
        #[serde(default)]
        source: Source,
    },
    In {
        path: String,
        #[serde(default)]
        source: Source,
        values: Vec<Value>,
    },
    Matches {
        path: String,
        #[serde(default)]
        source: Source,
        pattern: String,
    },
    And {
        expressions: Vec<Expr>,
    },
    Or {
        expressions: Vec<Expr>,
    },
    Not {
        expression: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(value: bool) -> Self {
        Expr::LiteralBool { value }
    }

    pub fn answered(path: impl Into<String>) -> Self {
        Expr::Answered {
            path: path.into(),
            source: Source::Answers,
        }
    }

    pub fn answer_eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Expr::Compare {
            path: path.into(),
            source: Source::Answers,
            comparator: Comparator::Eq,
            value: value.into(),
        }
    }

    pub fn external_eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Expr::Compare {
            path: path.into(),
            source: Source::ExternalData,
            comparator: Comparator::Eq,
            value: value.into(),
        }
    }

    pub fn not(expression: Expr) -> Self {
        Expr::Not {
            expression: Box::new(expression),
        }
    }

    fn lookup<'a>(
        path: &str,
        source: Source,
        answers: &'a DataMap,
        external: &'a DataMap,
    ) -> Result<Option<&'a Value>, ExprError> {
        if path.trim().is_empty() {
            return Err(ExprError::EmptyPath);
        }
        let map = match source {
            Source::Answers => answers,
            Source::ExternalData => external,
        };
        Ok(map.get(path).filter(|value| !value.is_null()))
    }

    /// Evaluates the expression against the two snapshots.
    pub fn evaluate(&self, answers: &DataMap, external: &DataMap) -> Result<bool, ExprError> {
        match self {
            Expr::LiteralBool { value } => Ok(*value),
            Expr::Var { path, source } => {
                Ok(Self::lookup(path, *source, answers, external)?.is_some_and(is_truthy))
            }
            Expr::Answered { path, source } => {
                Ok(Self::lookup(path, *source, answers, external)?.is_some())
            }
            Expr::Compare {
                path,
                source,
                comparator,
                value,
            } => {
                let actual = Self::lookup(path, *source, answers, external)?;
                Ok(compare(actual, *comparator, value))
            }
            Expr::Eq {
                left,
                right,
                source,
            } => {
                let left_val = Self::lookup(left, *source, answers, external)?;
                let right_val = Self::lookup(right, *source, answers, external)?;
                Ok(match (left_val, right_val) {
                    (Some(left_val), Some(right_val)) => values_equal(left_val, right_val),
                    _ => false,
                })
            }
            Expr::In {
                path,
                source,
                values,
            } => {
                let actual = Self::lookup(path, *source, answers, external)?;
                Ok(actual.is_some_and(|actual| {
                    values.iter().any(|candidate| values_equal(actual, candidate))
                }))
            }
            Expr::Matches {
                path,
                source,
                pattern,
            } => {
                let regex = Regex::new(pattern).map_err(|err| ExprError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: err.to_string(),
                })?;
                let actual = Self::lookup(path, *source, answers, external)?;
                Ok(actual
                    .and_then(Value::as_str)
                    .is_some_and(|text| regex.is_match(text)))
            }
            Expr::And { expressions } => {
                for expr in expressions {
                    if !expr.evaluate(answers, external)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Expr::Or { expressions } => {
                for expr in expressions {
                    if expr.evaluate(answers, external)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expr::Not { expression } => expression.evaluate(answers, external).map(|value| !value),
        }
    }

    /// Checks the expression for defects that do not depend on data.
    pub fn check(&self) -> Result<(), ExprError> {
        let require_path = |path: &str| {
            if path.trim().is_empty() {
                Err(ExprError::EmptyPath)
            } else {
                Ok(())
            }
        };
        match self {
            Expr::LiteralBool { .. } => Ok(()),
            Expr::Var { path, .. }
            | Expr::Answered { path, .. }
            | Expr::Compare { path, .. }
            | Expr::In { path, .. } => require_path(path),
            Expr::Eq { left, right, .. } => {
                require_path(left)?;
                require_path(right)
            }
            Expr::Matches { path, pattern, .. } => {
                require_path(path)?;
                Regex::new(pattern)
                    .map(|_| ())
                    .map_err(|err| ExprError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: err.to_string(),
                    })
            }
            Expr::And { expressions } | Expr::Or { expressions } => {
                expressions.iter().try_for_each(Expr::check)
            }
            Expr::Not { expression } => expression.check(),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(num) => num.as_f64().is_some_and(|num| num != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Equality that treats `1` and `1.0` as the same number.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => left == right,
        _ => left == right,
    }
}

fn compare(actual: Option<&Value>, comparator: Comparator, expected: &Value) -> bool {
    let Some(actual) = actual else {
        return comparator == Comparator::Neq;
    };
    match comparator {
        Comparator::Eq => values_equal(actual, expected),
        Comparator::Neq => !values_equal(actual, expected),
        Comparator::Gt | Comparator::Gte | Comparator::Lt | Comparator::Lte => {
            let ordering = match (as_number(actual), as_number(expected)) {
                (Some(left), Some(right)) => left.partial_cmp(&right),
                _ => match (actual.as_str(), expected.as_str()) {
                    (Some(left), Some(right)) => Some(left.cmp(right)),
                    _ => None,
                },
            };
            let Some(ordering) = ordering else {
                return false;
            };
            match comparator {
                Comparator::Gt => ordering.is_gt(),
                Comparator::Gte => ordering.is_ge(),
                Comparator::Lt => ordering.is_lt(),
                _ => ordering.is_le(),
            }
        }
    }
}

/// Numbers, or strings holding a number as text inputs store them.
fn as_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()))
}
