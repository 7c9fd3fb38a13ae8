use thiserror::Error;

use crate::item::Operator;

/// Result alias used throughout the crate.
pub type Result<T, E = TemplateError> = std::result::Result<T, E>;

/// A malformed template, or a bound template that cannot be partially expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unsupported operator '{0}', expected '?' or '&'")]
    UnsupportedOperator(char),

    #[error("unexpected characters '{text}'")]
    UnexpectedCharacters { text: String },

    #[error("multiple operators in one expression")]
    MultipleOperators,

    #[error("multiple question marks in template")]
    MultipleQuestionMarks,

    #[error("operator '{0}' used in an expression outside the query component")]
    OperatorOutsideQuery(Operator),

    #[error("mixed literal and variable components in one path segment")]
    MixedLiteralAndVariable,

    #[error("invalid variable name '{text}'")]
    InvalidVariableName { text: String },

    #[error("multiple variables without operator, starting at '{name}'")]
    MultipleVariablesWithoutOperator { name: String },

    #[error("adjacent varspecs cannot be merged")]
    AdjacentVarspecs,

    #[error("repeated variable name '{name}'")]
    RepeatedVariableName { name: String },

    #[error("missing operator in partially bound expression {expression}")]
    MissingOperator { expression: String },

    #[error("first value missing: '{name}' must be bound before later query variables")]
    FirstValueMissing { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = TemplateError::RepeatedVariableName {
            name: "a".to_string(),
        };
        assert_eq!(e.to_string(), "repeated variable name 'a'");

        let e = TemplateError::OperatorOutsideQuery(Operator::FormContinuation);
        assert_eq!(
            e.to_string(),
            "operator '&' used in an expression outside the query component"
        );
    }
}
