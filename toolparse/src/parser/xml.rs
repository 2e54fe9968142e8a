//! XML-tagged extraction strategy.

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{error, warn};

use super::ToolCallParser;
use crate::{
    coerce,
    error::Result,
    schema,
    types::{ExtractionResult, ToolCall, ToolDefinition},
};

const TOOL_CALL_START: &str = "<tool_call>";

/// Parser for the XML-tagged tool-call convention:
///
/// ```text
/// <tool_call>
///   <tool>get_weather</tool>
///   <city>Paris</city>
///   <days>3</days>
/// </tool_call>
/// ```
///
/// Every `<tool_call>` block in the text is processed independently; a
/// malformed block is skipped with a warning and does not affect the
/// others. Text before the first block becomes `content`.
///
/// # Examples
///
/// ```
/// use toolparse::parser::{ToolCallParser, XmlToolCallParser};
///
/// let parser = XmlToolCallParser::new();
/// let output = "Sure. <tool_call><tool>get_weather</tool><city>Paris</city></tool_call>";
/// let result = parser.extract(output, None);
///
/// assert!(result.tools_called);
/// assert_eq!(result.content.as_deref(), Some("Sure."));
/// assert_eq!(result.tool_calls[0].function.name, "get_weather");
/// ```
#[derive(Debug, Clone)]
pub struct XmlToolCallParser {
    /// Matches a complete `<tool_call>...</tool_call>` block, spanning newlines.
    block_regex: Regex,
    /// Matches the `<tool>...</tool>` name tag within a block.
    name_regex: Regex,
}

impl Default for XmlToolCallParser {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlToolCallParser {
    /// Creates a new XML tool-call parser.
    pub fn new() -> Self {
        Self {
            block_regex: Regex::new(r"(?s)<tool_call>(.*?)</tool_call>").unwrap(),
            name_regex: Regex::new(r"(?s)<tool>(.*?)</tool>").unwrap(),
        }
    }

    fn try_extract(
        &self,
        output: &str,
        start: usize,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ExtractionResult> {
        let content = output[..start].trim();
        let mut tool_calls = Vec::new();

        for caps in self.block_regex.captures_iter(&output[start..]) {
            if let Some(call) = self.parse_block(&caps[1], tools)? {
                tool_calls.push(call);
            }
        }

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

    /// Parses one block into a call, or `None` if the block is malformed.
    fn parse_block(
        &self,
        block: &str,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<Option<ToolCall>> {
        let name = match self.name_regex.captures(block) {
            Some(caps) => caps[1].trim().to_string(),
            None => {
                warn!(block, "no <tool> name tag in tool_call block, skipping");
                return Ok(None);
            }
        };

        let mut arguments = Map::new();
        for (key, raw) in parameter_tags(block) {
            // The name tag is not a parameter.
            if key == "tool" {
                continue;
            }
            let raw = raw.trim();
            let value = match schema::parameter_type(tools, &name, key) {
                Some(target) => match coerce::coerce_string(raw, target) {
                    Ok(value) => value,
                    Err(err) => {
                        warn!(
                            parameter = key,
                            value = raw,
                            target = %target,
                            %err,
                            "could not coerce parameter to schema type, keeping string"
                        );
                        Value::String(raw.to_string())
                    }
                },
                None => coerce::coerce_heuristic(raw),
            };
            arguments.insert(key.to_string(), value);
        }

        let payload = serde_json::to_string(&Value::Object(arguments))?;
        Ok(Some(ToolCall::new(name, payload)))
    }
}

/// Finds all `<key>value</key>` tag pairs in a block.
///
/// Tag names are single tokens with no `/`, `>`, or whitespace; the value
/// runs non-greedily to the first matching close tag and may span
/// newlines. The `regex` crate cannot express the close-tag backreference,
/// so this is a small hand-rolled scanner.
fn parameter_tags(block: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut at = 0;
    while let Some(offset) = block[at..].find('<') {
        let open = at + offset;
        let rest = &block[open + 1..];
        let Some(gt) = rest.find('>') else {
            break;
        };
        let name = &rest[..gt];
        if name.is_empty() || name.contains('/') || name.chars().any(char::is_whitespace) {
            at = open + 1;
            continue;
        }
        let value_start = open + 1 + gt + 1;
        let close = format!("</{name}>");
        match block[value_start..].find(&close) {
            Some(end) => {
                pairs.push((name, &block[value_start..value_start + end]));
                at = value_start + end + close.len();
            }
            None => {
                at = open + 1;
            }
        }
    }
    pairs
}

impl ToolCallParser for XmlToolCallParser {
    #[inline]
    fn name(&self) -> &'static str {
        "xml"
    }

    fn extract(&self, output: &str, tools: Option<&[ToolDefinition]>) -> ExtractionResult {
        let Some(start) = output.find(TOOL_CALL_START) else {
            // The common plain-answer path: no marker means no calls.
            return ExtractionResult::passthrough(output);
        };

        match self.try_extract(output, start, tools) {
            Ok(result) => result,
            Err(err) => {
                error!(%err, output, "xml tool-call extraction failed, returning raw output");
                ExtractionResult::passthrough(output)
            }
        }
    }
}
