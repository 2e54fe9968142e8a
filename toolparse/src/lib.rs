//! # toolparse
//!
//! A forgiving extractor that pulls structured tool calls out of raw LLM
//! output.
//!
//! Models that support function calling embed their invocations in the
//! generated text using one of several wire conventions. This library
//! recognizes three of them, each behind the same contract:
//!
//! - **xml** — `<tool_call>` blocks with nested `<tool>name</tool>` and
//!   `<arg>value</arg>` tags
//! - **json** — a `<TOOLCALL>` block holding a JSON array of
//!   `{"name": .., "arguments": {..}}` objects
//! - **pythonic** — a `<TOOLCALL>` block holding lines of
//!   `name(key=value, ...)` calls
//!
//! Extraction is total: text that does not conform to the selected
//! convention is never lost, it comes back as ordinary content. Malformed
//! pieces inside a recognized block are skipped with a warning, and an
//! unrecoverable failure degrades to the original text rather than an
//! error.
//!
//! ## Quick Start
//!
//! ```rust
//! use toolparse::extract;
//!
//! let output = "Sure. <tool_call><tool>get_weather</tool><city>Paris</city></tool_call>";
//! let result = extract("xml", output, None).unwrap();
//!
//! assert!(result.tools_called);
//! assert_eq!(result.content.as_deref(), Some("Sure."));
//! assert_eq!(result.tool_calls[0].function.name, "get_weather");
//! assert_eq!(result.tool_calls[0].function.arguments, r#"{"city":"Paris"}"#);
//! ```
//!
//! ## Schema-guided typing
//!
//! Argument values arrive as raw text in the XML convention, so by default
//! they are typed heuristically: values that look like literals (numbers,
//! quoted strings, brackets, boolean keywords) are decoded, everything else
//! stays a string. Supplying the tool definitions the model was shown makes
//! typing deterministic:
//!
//! ```rust
//! use serde_json::json;
//! use toolparse::{extract, FunctionDefinition, ToolDefinition};
//!
//! let tools = vec![ToolDefinition {
//!     tool_type: "function".into(),
//!     function: FunctionDefinition {
//!         name: "get_weather".into(),
//!         description: None,
//!         parameters: Some(json!({
//!             "properties": {"days": {"type": "integer"}}
//!         })),
//!     },
//! }];
//!
//! let output = "<tool_call><tool>get_weather</tool><days>3</days></tool_call>";
//! let result = extract("xml", output, Some(&tools)).unwrap();
//! assert_eq!(result.tool_calls[0].function.arguments, r#"{"days":3}"#);
//! ```
//!
//! ## Direct strategy use
//!
//! The registry lookup is a convenience; strategies are plain values and
//! can be used directly or collected into a custom [`ParserRegistry`]:
//!
//! ```rust
//! use toolparse::{PythonicToolCallParser, ToolCallParser};
//!
//! let parser = PythonicToolCallParser::new();
//! let result = parser.extract("<TOOLCALL>refresh()</TOOLCALL>", None);
//! assert!(result.tools_called);
//! ```

pub mod coerce;
pub mod error;
pub mod literal;
pub mod parser;
pub mod schema;
pub mod types;

use once_cell::sync::Lazy;

pub use error::{ExtractError, Result};
pub use parser::{
    JsonArrayToolCallParser, ParserRegistry, PythonicToolCallParser, ToolCallParser,
    XmlToolCallParser,
};
pub use schema::ParamType;
pub use types::{
    ExtractionResult, FunctionCall, FunctionDefinition, StreamDelta, ToolCall, ToolDefinition,
};

static DEFAULT_REGISTRY: Lazy<ParserRegistry> = Lazy::new(ParserRegistry::with_defaults);

/// Extracts tool calls from a model response using a named strategy.
///
/// This is the main entry point. The strategy name is one of `"xml"`,
/// `"json"`, or `"pythonic"`; `tools` optionally carries the function
/// signatures the model was shown, used to guide argument typing.
///
/// # Errors
///
/// Returns [`ExtractError::UnknownParser`] if no strategy with that name
/// exists. Extraction itself never errors — unparseable output comes back
/// as a no-call result carrying the original text.
pub fn extract(
    parser: &str,
    output: &str,
    tools: Option<&[ToolDefinition]>,
) -> Result<ExtractionResult> {
    let parser = DEFAULT_REGISTRY.get(parser)?;
    Ok(parser.extract(output, tools))
}

/// Returns the registry holding the built-in strategies.
pub fn registry() -> &'static ParserRegistry {
    &DEFAULT_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_via_registry() {
        let output = r#"<TOOLCALL>[{"name": "f", "arguments": {}}]</TOOLCALL>"#;
        let result = extract("json", output, None).unwrap();
        assert!(result.tools_called);
        assert_eq!(result.tool_calls[0].function.name, "f");
    }

    #[test]
    fn test_extract_unknown_parser() {
        let err = extract("yaml", "anything", None).unwrap_err();
        assert!(matches!(err, ExtractError::UnknownParser { .. }));
    }

    #[test]
    fn test_registry_exposes_default_strategies() {
        assert_eq!(registry().names(), ["xml", "json", "pythonic"]);
    }

    #[test]
    fn test_plain_answer_is_never_lost() {
        for name in registry().names() {
            let result = extract(name, "Just a plain answer.", None).unwrap();
            assert!(!result.tools_called, "{name} should not find calls");
            assert_eq!(result.content.as_deref(), Some("Just a plain answer."));
        }
    }
}
