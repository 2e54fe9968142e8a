//! Extraction strategies and the registry that selects between them.

mod json_array;
mod pythonic;
mod xml;

pub use json_array::JsonArrayToolCallParser;
pub use pythonic::PythonicToolCallParser;
pub use xml::XmlToolCallParser;

use crate::{
    error::{ExtractError, Result},
    types::{ExtractionResult, StreamDelta, ToolDefinition},
};

/// Trait for strategies that extract tool calls from model output.
///
/// Each parser recognizes one wire convention. Extraction is total:
/// whatever the input, the caller receives a well-formed
/// [`ExtractionResult`] — text that does not conform to the convention
/// passes through as plain content, and internal failures degrade to the
/// same shape rather than propagating.
pub trait ToolCallParser: Send + Sync + std::fmt::Debug {
    /// Returns the registry name of this parser.
    fn name(&self) -> &'static str;

    /// Extracts tool calls from a complete model response.
    ///
    /// `tools` optionally carries the function signatures the model was
    /// shown, used to guide argument type coercion.
    fn extract(&self, output: &str, tools: Option<&[ToolDefinition]>) -> ExtractionResult;

    /// Extracts an incremental tool-call fragment from a streaming response.
    ///
    /// No current strategy supports this: the default implementation
    /// signals [`ExtractError::StreamingUnsupported`] rather than
    /// attempting partial extraction.
    fn extract_streaming(
        &self,
        previous_text: &str,
        delta_text: &str,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<Option<StreamDelta>> {
        let _ = (previous_text, delta_text, tools);
        Err(ExtractError::StreamingUnsupported {
            parser: self.name(),
        })
    }
}

/// Registry of extraction strategies keyed by name.
///
/// A caller selects exactly one strategy per request; the registry is the
/// lookup point for that selection.
///
/// # Examples
///
/// ```
/// use toolparse::parser::ParserRegistry;
///
/// let registry = ParserRegistry::with_defaults();
/// let parser = registry.get("pythonic").unwrap();
/// assert_eq!(parser.name(), "pythonic");
/// assert!(registry.get("yaml").is_err());
/// ```
#[derive(Debug, Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn ToolCallParser>>,
}

impl ParserRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Creates a registry with the three built-in strategies:
    /// `"xml"`, `"json"`, and `"pythonic"`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(XmlToolCallParser::new()));
        registry.register(Box::new(JsonArrayToolCallParser::new()));
        registry.register(Box::new(PythonicToolCallParser::new()));
        registry
    }

    /// Registers a parser, replacing any existing parser with the same name.
    pub fn register(&mut self, parser: Box<dyn ToolCallParser>) {
        if let Some(existing) = self.parsers.iter_mut().find(|p| p.name() == parser.name()) {
            *existing = parser;
        } else {
            self.parsers.push(parser);
        }
    }

    /// Looks up a parser by name.
    pub fn get(&self, name: &str) -> Result<&dyn ToolCallParser> {
        self.parsers
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
            .ok_or_else(|| ExtractError::UnknownParser {
                name: name.to_string(),
            })
    }

    /// Returns the names of all registered parsers in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Returns the number of registered parsers.
    #[inline]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Returns true if no parsers are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_names() {
        let registry = ParserRegistry::with_defaults();
        assert_eq!(registry.names(), ["xml", "json", "pythonic"]);
    }

    #[test]
    fn test_get_unknown_parser() {
        let registry = ParserRegistry::with_defaults();
        let err = registry.get("yaml").unwrap_err();
        assert!(matches!(err, ExtractError::UnknownParser { name } if name == "yaml"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ParserRegistry::with_defaults();
        registry.register(Box::new(XmlToolCallParser::new()));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_streaming_is_unsupported_for_every_default_parser() {
        let registry = ParserRegistry::with_defaults();
        for name in registry.names() {
            let parser = registry.get(name).unwrap();
            let err = parser.extract_streaming("", "", None).unwrap_err();
            assert!(matches!(
                err,
                ExtractError::StreamingUnsupported { parser } if parser == name
            ));
        }
    }
}
