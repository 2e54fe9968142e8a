//! Error types for tool-call extraction.

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during tool-call extraction.
///
/// Note that [`ToolCallParser::extract`](crate::parser::ToolCallParser::extract)
/// never surfaces these to the caller: a parser that fails internally degrades
/// to a no-call result carrying the original text. These errors appear on the
/// registry and streaming surfaces, and internally between the fallible
/// extraction tier and its infallible wrapper.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No parser with the requested name is registered.
    #[error("Unknown tool-call parser: {name}")]
    UnknownParser {
        /// The name that was looked up.
        name: String,
    },

    /// Streaming extraction was requested from a parser that does not support it.
    #[error("Streaming tool-call extraction is not supported by the '{parser}' parser")]
    StreamingUnsupported {
        /// Name of the parser that was invoked.
        parser: &'static str,
    },

    /// The start marker was present but no complete block matched.
    #[error("Start marker '{marker}' found but no complete block matched")]
    BlockNotFound {
        /// The start marker that was detected.
        marker: &'static str,
    },

    /// The tool-call block parsed as JSON but was not an array.
    #[error("Expected a JSON array of tool calls, found {found}")]
    ExpectedArray {
        /// JSON type name of the value that was found.
        found: &'static str,
    },

    /// JSON parsing or serialization error from serde_json.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that occur while coercing a raw argument value to a schema type.
///
/// These are always local to a single argument: the caller logs a warning
/// and keeps the untouched string value.
#[derive(Debug, thiserror::Error)]
pub enum CoerceError {
    /// The value is not a base-10 integer.
    #[error("Invalid integer literal: {value}")]
    InvalidInteger {
        /// The raw value that failed to parse.
        value: String,
    },

    /// The value is not a finite floating-point number.
    #[error("Invalid number literal: {value}")]
    InvalidNumber {
        /// The raw value that failed to parse.
        value: String,
    },

    /// The value is neither valid JSON nor permissive literal syntax.
    #[error("Value is not valid JSON or literal syntax: {value}")]
    InvalidStructure {
        /// The raw value that failed to parse.
        value: String,
    },
}

/// Errors from the permissive literal grammar.
#[derive(Debug, thiserror::Error)]
pub enum LiteralError {
    /// Input ended in the middle of a literal.
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// A character that cannot start or continue a literal.
    #[error("Unexpected character '{ch}' at byte {pos}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset in the input.
        pos: usize,
    },

    /// A complete literal was parsed but input remained after it.
    #[error("Trailing input after literal at byte {pos}")]
    TrailingInput {
        /// Byte offset where the trailing input begins.
        pos: usize,
    },

    /// A numeric literal that cannot be represented as a JSON number.
    #[error("Number out of representable range: {literal}")]
    NumberOutOfRange {
        /// The numeric literal as written.
        literal: String,
    },

    /// A bare word that is not a recognized keyword literal.
    #[error("Unknown keyword literal: {word}")]
    UnknownKeyword {
        /// The word that was not recognized.
        word: String,
    },

    /// An argument list with unbalanced brackets or an unterminated string.
    #[error("Unbalanced argument list")]
    UnbalancedArguments,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_parser_display() {
        let err = ExtractError::UnknownParser {
            name: "yaml".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown tool-call parser: yaml");
    }

    #[test]
    fn test_streaming_unsupported_display() {
        let err = ExtractError::StreamingUnsupported { parser: "xml" };
        assert!(err.to_string().contains("xml"));
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_extract_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: ExtractError = json_err.into();
        assert!(matches!(err, ExtractError::Json(_)));
    }

    #[test]
    fn test_coerce_error_display() {
        let err = CoerceError::InvalidInteger {
            value: "3.5".to_string(),
        };
        assert!(err.to_string().contains("3.5"));
    }
}
