//! Error types for findquery.

use thiserror::Error;

/// The main error type for findquery operations.
///
/// Translation of a typed [`Selector`](crate::ast::Selector) never fails;
/// these errors come from the untyped boundaries (JSON, query strings,
/// settings files).
#[derive(Debug, Error)]
pub enum QueryError {
    /// A selector value has a shape the translator does not accept.
    #[error("Invalid selector at '{path}': {message}")]
    InvalidSelector { path: String, message: String },

    /// Malformed query configuration.
    #[error("Invalid query config: {0}")]
    InvalidConfig(String),

    /// A requested field, relation or order key is not on the allow list.
    #[error("{kind} not allowed: {names}")]
    NotAllowed { kind: &'static str, names: String },

    /// Failed to parse a list query string.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Settings file error.
    #[error("Settings error: {0}")]
    Settings(String),
}

impl QueryError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an invalid selector error for the given dotted path.
    pub fn selector(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a not-allowed error listing every rejected name.
    pub fn not_allowed(kind: &'static str, names: &[String]) -> Self {
        Self::NotAllowed {
            kind,
            names: names.join(", "),
        }
    }
}

/// Result type alias for findquery operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_not_allowed_lists_names() {
        let err = QueryError::not_allowed("Fields", &["sku".to_string(), "ean".to_string()]);
        assert_eq!(err.to_string(), "Fields not allowed: sku, ean");
    }
}
