//! Result and schema types shared by all extraction strategies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The outcome of one extraction attempt over a complete model response.
///
/// Exactly one of two shapes holds for the XML and pythonic strategies:
/// no calls recognized (`tools_called == false`, empty `tool_calls`) or at
/// least one call recognized. The JSON-array strategy deviates: once its
/// start marker and a parseable array are found it reports
/// `tools_called == true` even if every array item was malformed and
/// `tool_calls` ended up empty. See [`JsonArrayToolCallParser`] for details.
///
/// [`JsonArrayToolCallParser`]: crate::parser::JsonArrayToolCallParser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Whether any tool calls were recognized in the response.
    pub tools_called: bool,
    /// The recognized calls, in the order they appeared in the text.
    pub tool_calls: Vec<ToolCall>,
    /// Natural-language text surrounding the call block, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ExtractionResult {
    /// Builds the no-call result that hands the model output back verbatim.
    ///
    /// Used both for the common "plain answer" path (no start marker in the
    /// text) and as the degraded outcome when extraction fails internally.
    pub fn passthrough(output: &str) -> Self {
        Self {
            tools_called: false,
            tool_calls: Vec::new(),
            content: if output.is_empty() {
                None
            } else {
                Some(output.to_string())
            },
        }
    }
}

/// One recognized tool invocation in the OpenAI-compatible wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call, `call_<uuid>`.
    pub id: String,
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub call_type: String,
    /// The function being invoked.
    pub function: FunctionCall,
}

impl ToolCall {
    /// Creates a tool call with a freshly generated identifier.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: format!("call_{}", Uuid::new_v4().simple()),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// The function name and JSON-encoded argument payload of a [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function to invoke.
    pub name: String,
    /// Arguments as a JSON-encoded string. Non-ASCII characters are
    /// preserved, not escaped.
    pub arguments: String,
}

/// A callable function made available to the model, used to guide argument
/// type coercion during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function signature.
    pub function: FunctionDefinition,
}

/// Declared signature of a callable function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name, matched against the name found in the text.
    pub name: String,
    /// Human-readable description. Not used by extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON-Schema-shaped parameter description:
    /// `{"properties": {"<arg>": {"type": "string" | ...}}}`.
    ///
    /// Navigated leniently: a missing or differently shaped schema is not an
    /// error, it simply provides no coercion guidance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// An incremental extraction fragment for streaming responses.
///
/// No strategy currently produces these: streaming extraction signals
/// [`ExtractError::StreamingUnsupported`](crate::error::ExtractError::StreamingUnsupported)
/// instead of attempting partial extraction. The type fixes the contract
/// surface for parsers that may support streaming later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamDelta {
    /// Index of the tool call this fragment belongs to.
    pub index: usize,
    /// Call identifier, present on the first fragment of a call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name, present on the first fragment of a call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Incremental chunk of the JSON-encoded argument payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}
