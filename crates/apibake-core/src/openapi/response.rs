//! Response and media type entities.

use super::{Schema, extensions::Extensions, map::Map, schema::RefOr};

/// Describes a single response for an operation, keyed by status code.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Response {
    /// A description of the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// A map of media types to their schemas (e.g. `application/json`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Map<String, MediaType>>,

    /// Extension properties.
    #[serde(flatten)]
    pub extensions: Option<Extensions>,
}

impl Response {
    /// Creates a new empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description for the response.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the content (media types) for the response.
    pub fn content(mut self, content: Map<String, MediaType>) -> Self {
        self.content = Some(content);
        self
    }

    /// Returns the schema for the given media type, if declared.
    pub fn media_schema(&self, media_type: &str) -> Option<&RefOr<Schema>> {
        self.content
            .as_ref()
            .and_then(|content| content.get(media_type))
            .and_then(|media| media.schema.as_ref())
    }
}

/// A media type and its schema.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct MediaType {
    /// The schema for this media type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RefOr<Schema>>,

    /// Example value for this media type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl MediaType {
    /// Creates a new empty media type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema for the media type.
    pub fn schema(mut self, schema: RefOr<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the example value.
    pub fn example(mut self, example: serde_json::Value) -> Self {
        self.example = Some(example);
        self
    }
}
