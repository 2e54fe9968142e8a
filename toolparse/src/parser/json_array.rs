//! JSON-array extraction strategy.

use regex::Regex;
use serde_json::Value;
use tracing::error;

use super::ToolCallParser;
use crate::{
    error::{ExtractError, Result},
    types::{ExtractionResult, ToolCall, ToolDefinition},
};

const TOOL_CALL_START: &str = "<TOOLCALL>";

/// Parser for the JSON-array tool-call convention:
///
/// ```text
/// <TOOLCALL>[{"name": "get_weather", "arguments": {"city": "Paris"}}]</TOOLCALL>
/// ```
///
/// Only the first block is read. A body missing its surrounding brackets
/// (a truncated array) is reframed before parsing; malformed individual
/// items are silently dropped.
///
/// Two observed quirks of this convention are preserved deliberately:
///
/// - once the start marker is found and the array parses, the result
///   reports `tools_called == true` even if every item was malformed and
///   the call list is empty;
/// - `content` is the text before the **last** occurrence of the start
///   marker, where the other strategies cut at the first.
#[derive(Debug, Clone)]
pub struct JsonArrayToolCallParser {
    /// Matches a complete `<TOOLCALL>...</TOOLCALL>` block, spanning newlines.
    block_regex: Regex,
}

impl Default for JsonArrayToolCallParser {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonArrayToolCallParser {
    /// Creates a new JSON-array tool-call parser.
    pub fn new() -> Self {
        Self {
            block_regex: Regex::new(r"(?s)<TOOLCALL>(.*?)</TOOLCALL>").unwrap(),
        }
    }

    fn try_extract(&self, output: &str) -> Result<ExtractionResult> {
        let caps = self
            .block_regex
            .captures(output)
            .ok_or(ExtractError::BlockNotFound {
                marker: TOOL_CALL_START,
            })?;

        // Tolerate a truncated array by reframing the brackets. This can
        // still produce malformed JSON, which fails the parse below and
        // degrades to the passthrough result.
        let mut body = caps[1].trim().to_string();
        if !body.starts_with('[') {
            body.insert(0, '[');
        }
        if !body.ends_with(']') {
            body.push(']');
        }

        let parsed: Value = serde_json::from_str(&body)?;
        let items = parsed.as_array().ok_or_else(|| ExtractError::ExpectedArray {
            found: json_type_name(&parsed),
        })?;

        let mut tool_calls = Vec::new();
        for item in items {
            // A malformed item contributes nothing; the rest still parse.
            let Some(name) = item.get("name").and_then(Value::as_str) else {
                continue;
            };
            let payload = match item.get("arguments") {
                Some(Value::Object(map)) => match serde_json::to_string(map) {
                    Ok(payload) => payload,
                    Err(_) => continue,
                },
                Some(Value::String(payload)) => payload.clone(),
                _ => continue,
            };
            tool_calls.push(ToolCall::new(name, payload));
        }

        let cut = output
            .rfind(TOOL_CALL_START)
            .ok_or(ExtractError::BlockNotFound {
                marker: TOOL_CALL_START,
            })?;
        let content = output[..cut].trim();

        // tools_called is unconditional here: the marker was found and the
        // array parsed, even if every item failed above.
        Ok(ExtractionResult {
            tools_called: true,
            tool_calls,
            content: if content.is_empty() {
                None
            } else {
                Some(content.to_string())
            },
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl ToolCallParser for JsonArrayToolCallParser {
    #[inline]
    fn name(&self) -> &'static str {
        "json"
    }

    fn extract(&self, output: &str, _tools: Option<&[ToolDefinition]>) -> ExtractionResult {
        if !output.contains(TOOL_CALL_START) {
            return ExtractionResult::passthrough(output);
        }

        match self.try_extract(output) {
            Ok(result) => result,
            Err(err) => {
                error!(%err, output, "json tool-call extraction failed, returning raw output");
                ExtractionResult::passthrough(output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn arguments(result: &ExtractionResult, index: usize) -> Value {
        serde_json::from_str(&result.tool_calls[index].function.arguments).unwrap()
    }

    #[test]
    fn test_no_marker_passes_through() {
        let parser = JsonArrayToolCallParser::new();
        let result = parser.extract("Nothing to call here.", None);

        assert!(!result.tools_called);
        assert!(result.tool_calls.is_empty());
        assert_eq!(result.content.as_deref(), Some("Nothing to call here."));
    }

    #[test]
    fn test_single_call() {
        let parser = JsonArrayToolCallParser::new();
        let output = r#"<TOOLCALL>[{"name": "get_weather", "arguments": {"city": "Paris"}}]</TOOLCALL>"#;
        let result = parser.extract(output, None);

        assert!(result.tools_called);
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].function.name, "get_weather");
        assert_eq!(arguments(&result, 0), json!({"city": "Paris"}));
    }

    #[test]
    fn test_truncated_array_is_reframed() {
        let parser = JsonArrayToolCallParser::new();
        let output = r#"<TOOLCALL>{"name": "f", "arguments": {}}</TOOLCALL>"#;
        let result = parser.extract(output, None);

        assert!(result.tools_called);
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].function.name, "f");
    }

    #[test]
    fn test_all_items_invalid_still_reports_tools_called() {
        let parser = JsonArrayToolCallParser::new();
        let output = r#"<TOOLCALL>[{"arguments": {}}, {"nome": "typo"}]</TOOLCALL>"#;
        let result = parser.extract(output, None);

        // The documented deviation: marker found and array parsed, so
        // tools_called is true despite the empty call list.
        assert!(result.tools_called);
        assert!(result.tool_calls.is_empty());
    }

    #[test]
    fn test_string_arguments_pass_through() {
        let parser = JsonArrayToolCallParser::new();
        let output =
            r#"<TOOLCALL>[{"name": "f", "arguments": "{\"city\": \"Paris\"}"}]</TOOLCALL>"#;
        let result = parser.extract(output, None);

        assert_eq!(
            result.tool_calls[0].function.arguments,
            r#"{"city": "Paris"}"#
        );
    }

    #[test]
    fn test_non_object_arguments_skip_item() {
        let parser = JsonArrayToolCallParser::new();
        let output = r#"<TOOLCALL>[{"name": "f", "arguments": [1, 2]}, {"name": "g", "arguments": {}}]</TOOLCALL>"#;
        let result = parser.extract(output, None);

        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].function.name, "g");
    }

    #[test]
    fn test_unparseable_body_degrades_to_passthrough() {
        let parser = JsonArrayToolCallParser::new();
        let output = "<TOOLCALL>{not json at all</TOOLCALL>";
        let result = parser.extract(output, None);

        assert!(!result.tools_called);
        assert!(result.tool_calls.is_empty());
        assert_eq!(result.content.as_deref(), Some(output));
    }

    #[test]
    fn test_array_of_non_objects_yields_empty_calls() {
        let parser = JsonArrayToolCallParser::new();
        // Already bracket-framed, parses as JSON, but is not an array of calls.
        let output = r#"<TOOLCALL>["just", "strings"]</TOOLCALL>"#;
        let result = parser.extract(output, None);

        // Items are not objects: each is skipped, but the array parsed.
        assert!(result.tools_called);
        assert!(result.tool_calls.is_empty());
    }

    #[test]
    fn test_marker_without_close_degrades_to_passthrough() {
        let parser = JsonArrayToolCallParser::new();
        let output = r#"before <TOOLCALL>[{"name": "f"#;
        let result = parser.extract(output, None);

        assert!(!result.tools_called);
        assert_eq!(result.content.as_deref(), Some(output));
    }

    #[test]
    fn test_content_cuts_at_last_marker() {
        let parser = JsonArrayToolCallParser::new();
        let output = "intro <TOOLCALL>[]</TOOLCALL> middle <TOOLCALL>ignored";
        let result = parser.extract(output, None);

        assert!(result.tools_called);
        assert_eq!(
            result.content.as_deref(),
            Some("intro <TOOLCALL>[]</TOOLCALL> middle")
        );
    }

    #[test]
    fn test_only_first_block_is_read() {
        let parser = JsonArrayToolCallParser::new();
        let output = r#"<TOOLCALL>[{"name": "first", "arguments": {}}]</TOOLCALL><TOOLCALL>[{"name": "second", "arguments": {}}]</TOOLCALL>"#;
        let result = parser.extract(output, None);

        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].function.name, "first");
    }
}
