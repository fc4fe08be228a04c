//! Request body entity.

use super::{MediaType, Schema, map::Map, schema::RefOr};

/// The body an operation accepts, keyed by media type.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct RequestBody {
    /// A description of the request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the request body is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// A map of media types to their schemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Map<String, MediaType>>,
}

impl RequestBody {
    /// Creates a new empty request body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description for the request body.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets whether the request body is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets the content (media types) for the request body.
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
