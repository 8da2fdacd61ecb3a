use thiserror::Error;

/// Why a tool call's arguments were rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("arguments are missing")]
    MissingArguments,

    #[error("malformed arguments: {0}")]
    Malformed(String),

    #[error("invalid `{field}`: {issue}")]
    InvalidField { field: String, issue: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, issue: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            issue: issue.into(),
        }
    }
}
