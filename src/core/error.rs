use thiserror::Error;

use crate::core::model::Position;

/// Failures raised while rewriting one line of tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslitError {
    #[error("unknown class code '{code}'")]
    UnknownClass { code: String },

    #[error("'{code}' ({role}) needs a preceding fragment but the output is empty")]
    EmptyOutput { code: String, role: &'static str },
}

impl TranslitError {
    pub(crate) fn empty(code: &str, role: Position) -> Self {
        TranslitError::EmptyOutput {
            code: code.to_string(),
            role: role.as_str(),
        }
    }
}

/// Failures raised while loading or validating a class table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("duplicate class code '{code}'")]
    Duplicate { code: String },

    #[error("class code '{code}' has no legal positions")]
    NoPositions { code: String },

    #[error("class code '{code}' is a {kind} class but is not legal in the {position} position")]
    MissingPosition {
        code: String,
        kind: &'static str,
        position: &'static str,
    },

    #[error("class code '{code}' has an invalid rule: {source}")]
    InvalidRule {
        code: String,
        source: serde_json::Error,
    },

    #[error("failed to parse class table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read class table: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_display_names_role() {
        let err = TranslitError::empty("layar", Position::Above);
        assert_eq!(
            err.to_string(),
            "'layar' (above) needs a preceding fragment but the output is empty"
        );
    }
}
