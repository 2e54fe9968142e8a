//! Pythonic-call extraction strategy.

use regex::Regex;
use serde_json::Map;
use tracing::{error, warn};

use super::ToolCallParser;
use crate::{
    coerce,
    error::Result,
    literal, schema,
    types::{ExtractionResult, ToolCall, ToolDefinition},
};

const TOOL_CALL_START: &str = "<TOOLCALL>";

/// Parser for the pythonic tool-call convention:
///
/// ```text
/// <TOOLCALL>
/// get_weather(city="Paris", days=3)
/// send_email(to="x@example.com")
/// </TOOLCALL>
/// ```
///
/// Each non-empty line of the first block is one call. Argument values are
/// parsed with the permissive literal grammar, so `days=3` is already an
/// integer without schema help; a supplied schema only nudges values that
/// do not match their declared type. Lines that are not call expressions
/// are skipped with a warning.
///
/// # Examples
///
/// ```
/// use toolparse::parser::{PythonicToolCallParser, ToolCallParser};
///
/// let parser = PythonicToolCallParser::new();
/// let result = parser.extract("<TOOLCALL>get_weather(city=\"Paris\")</TOOLCALL>", None);
///
/// assert!(result.tools_called);
/// assert_eq!(result.tool_calls[0].function.name, "get_weather");
/// ```
#[derive(Debug, Clone)]
pub struct PythonicToolCallParser {
    /// Matches a complete `<TOOLCALL>...</TOOLCALL>` block, spanning newlines.
    block_regex: Regex,
    /// Matches one `name(arguments)` call taking the whole line.
    call_regex: Regex,
}

impl Default for PythonicToolCallParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonicToolCallParser {
    /// Creates a new pythonic tool-call parser.
    pub fn new() -> Self {
        Self {
            block_regex: Regex::new(r"(?s)<TOOLCALL>(.*?)</TOOLCALL>").unwrap(),
            call_regex: Regex::new(r"^(\w+)\((.*)\)$").unwrap(),
        }
    }

    fn try_extract(
        &self,
        output: &str,
        start: usize,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ExtractionResult> {
        let Some(caps) = self.block_regex.captures(output) else {
            // Marker present but no complete block: no calls, full text back.
            return Ok(ExtractionResult::passthrough(output));
        };
        let body = caps[1].trim();

        let mut tool_calls = Vec::new();
        for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some(call) = self.call_regex.captures(line) else {
                warn!(line, "line is not a call expression, skipping");
                continue;
            };
            let name = call[1].to_string();

            let mut arguments = match literal::parse_call_arguments(&call[2]) {
                Ok(arguments) => arguments,
                Err(err) => {
                    warn!(%err, line, "invalid argument list, using empty arguments");
                    Map::new()
                }
            };

            for (key, value) in arguments.iter_mut() {
                if let Some(target) = schema::parameter_type(tools, &name, key) {
                    *value = coerce::coerce_value(value.take(), target);
                }
            }

            let payload = serde_json::to_string(&arguments)?;
            tool_calls.push(ToolCall::new(name, payload));
        }

        let content = output[..start].trim();
        Ok(ExtractionResult {
            tools_called: !tool_calls.is_empty(),
            tool_calls,
            content: if content.is_empty() {
                None
            } else {
                Some(content.to_string())
            },
        })
    }
}

impl ToolCallParser for PythonicToolCallParser {
    #[inline]
    fn name(&self) -> &'static str {
        "pythonic"
    }

    fn extract(&self, output: &str, tools: Option<&[ToolDefinition]>) -> ExtractionResult {
        let Some(start) = output.find(TOOL_CALL_START) else {
            return ExtractionResult::passthrough(output);
        };

        match self.try_extract(output, start, tools) {
            Ok(result) => result,
            Err(err) => {
                error!(%err, output, "pythonic tool-call extraction failed, returning raw output");
                ExtractionResult::passthrough(output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::types::FunctionDefinition;

    fn arguments(result: &ExtractionResult, index: usize) -> Value {
        serde_json::from_str(&result.tool_calls[index].function.arguments).unwrap()
    }

    #[test]
    fn test_no_marker_passes_through() {
        let parser = PythonicToolCallParser::new();
        let result = parser.extract("Just an answer.", None);

        assert!(!result.tools_called);
        assert!(result.tool_calls.is_empty());
        assert_eq!(result.content.as_deref(), Some("Just an answer."));
    }

    #[test]
    fn test_basic_call_types_literals() {
        let parser = PythonicToolCallParser::new();
        let output = r#"<TOOLCALL>get_weather(city="Paris", days=3)</TOOLCALL>"#;
        let result = parser.extract(output, None);

        assert!(result.tools_called);
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].function.name, "get_weather");
        // Literal parsing already yields correct types without a schema.
        assert_eq!(
            arguments(&result, 0),
            json!({"city": "Paris", "days": 3})
        );
    }

    #[test]
    fn test_multiple_calls_one_per_line() {
        let parser = PythonicToolCallParser::new();
        let output = "<TOOLCALL>\nfirst(a=1)\nsecond(b=2)\n</TOOLCALL>";
        let result = parser.extract(output, None);

        assert_eq!(result.tool_calls.len(), 2);
        assert_eq!(result.tool_calls[0].function.name, "first");
        assert_eq!(result.tool_calls[1].function.name, "second");
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let parser = PythonicToolCallParser::new();
        let output = "<TOOLCALL>\nnot a call expression\nget_weather(city=\"Paris\")\n</TOOLCALL>";
        let result = parser.extract(output, None);

        assert!(result.tools_called);
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].function.name, "get_weather");
    }

    #[test]
    fn test_invalid_argument_list_yields_empty_arguments() {
        let parser = PythonicToolCallParser::new();
        let output = "<TOOLCALL>get_weather(city=\"Paris)</TOOLCALL>";
        let result = parser.extract(output, None);

        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(arguments(&result, 0), json!({}));
    }

    #[test]
    fn test_empty_argument_list() {
        let parser = PythonicToolCallParser::new();
        let result = parser.extract("<TOOLCALL>refresh()</TOOLCALL>", None);

        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(arguments(&result, 0), json!({}));
    }

    #[test]
    fn test_positional_arguments_get_synthetic_names() {
        let parser = PythonicToolCallParser::new();
        let result = parser.extract("<TOOLCALL>f(\"Paris\", 3)</TOOLCALL>", None);

        assert_eq!(
            arguments(&result, 0),
            json!({"arg_0": "Paris", "arg_1": 3})
        );
    }

    #[test]
    fn test_schema_nudges_string_to_boolean() {
        let parser = PythonicToolCallParser::new();
        let tools = vec![ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: "set_mode".to_string(),
                description: None,
                parameters: Some(json!({
                    "properties": {"enabled": {"type": "boolean"}}
                })),
            },
        }];
        let output = "<TOOLCALL>set_mode(enabled=\"yes\")</TOOLCALL>";
        let result = parser.extract(output, Some(&tools));

        assert_eq!(arguments(&result, 0), json!({"enabled": true}));
    }

    #[test]
    fn test_content_cuts_at_first_marker() {
        let parser = PythonicToolCallParser::new();
        let output = "Let me check. <TOOLCALL>get_weather(city=\"Paris\")</TOOLCALL>";
        let result = parser.extract(output, None);

        assert_eq!(result.content.as_deref(), Some("Let me check."));
    }

    #[test]
    fn test_marker_without_complete_block_returns_full_text() {
        let parser = PythonicToolCallParser::new();
        let output = "before <TOOLCALL>get_weather(";
        let result = parser.extract(output, None);

        assert!(!result.tools_called);
        assert_eq!(result.content.as_deref(), Some(output));
    }

    #[test]
    fn test_all_lines_malformed_reports_no_calls() {
        let parser = PythonicToolCallParser::new();
        let output = "<TOOLCALL>\nnot a call\nalso not one\n</TOOLCALL>";
        let result = parser.extract(output, None);

        assert!(!result.tools_called);
        assert!(result.tool_calls.is_empty());
    }
}
