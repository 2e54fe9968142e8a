//! Schema lookup over JSON-Schema-shaped function signatures.
//!
//! Callers may supply the tool definitions the model was shown; extraction
//! uses them only to decide how to type raw argument values. Absence of a
//! schema, or of any piece within it, is never an error — coercion falls
//! back to heuristic typing.

use crate::types::ToolDefinition;

/// Declared parameter type from a function schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Keep the raw text unchanged.
    String,
    /// Parse as a base-10 integer.
    Integer,
    /// Parse as a floating-point number.
    Number,
    /// Case-insensitive comparison with `"true"`.
    Boolean,
    /// Decode as JSON, falling back to permissive literal syntax.
    Object,
    /// Decode as JSON, falling back to permissive literal syntax.
    Array,
}

impl ParamType {
    /// Maps a JSON-Schema `"type"` string to a [`ParamType`].
    ///
    /// Unknown type names return `None`, which callers treat as "no
    /// guidance" rather than an error.
    pub fn from_schema_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// Returns the JSON-Schema name of this type.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Looks up the declared type of one parameter of one function.
///
/// Navigates `parameters.properties.<parameter>.type` on the first tool
/// definition whose function name matches. Any missing or differently
/// shaped piece along the way yields `None`.
pub fn parameter_type(
    tools: Option<&[ToolDefinition]>,
    function: &str,
    parameter: &str,
) -> Option<ParamType> {
    let definition = tools?.iter().find(|t| t.function.name == function)?;
    let type_name = definition
        .function
        .parameters
        .as_ref()?
        .get("properties")?
        .get(parameter)?
        .get("type")?
        .as_str()?;
    ParamType::from_schema_name(type_name)
}
