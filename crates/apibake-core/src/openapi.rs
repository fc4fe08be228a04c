//! OpenAPI document model.
//!
//! This module provides the types for representing an OpenAPI 3.0 document,
//! covering the subset a CLI generator consumes: paths, operations, request and
//! response schemas, reusable components, and vendor extensions.

pub mod components;
pub mod extensions;
pub mod external_docs;
pub mod info;
pub mod map;
pub mod parameter;
pub mod path;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod server;
pub mod tag;

use std::path::Path;

pub use self::{
    components::Components,
    extensions::Extensions,
    external_docs::ExternalDocs,
    info::{Contact, Info, License},
    map::Map,
    parameter::{Parameter, ParameterIn},
    path::{HttpMethod, Operation, PathItem, Paths},
    request_body::RequestBody,
    response::{MediaType, Response},
    schema::{Ref, RefOr, Schema, SchemaType},
    server::Server,
    tag::Tag,
};

/// An error raised while loading a document from disk or text.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document could not be read.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON.
    #[error("failed to parse JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML.
    #[error("failed to parse YAML document: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// The root object of a complete OpenAPI document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OpenApi {
    /// The OpenAPI version the document declares (e.g. "3.0.1").
    pub openapi: String,

    /// Core metadata about the API.
    pub info: Info,

    /// The servers hosting the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    /// The paths and operations exposed by the API.
    pub paths: Paths,

    /// Reusable component definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    /// Tags for organizing operations into groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,

    /// External documentation reference.
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
}

impl OpenApi {
    /// Creates a new OpenAPI document with the given info.
    pub fn new(info: Info) -> Self {
        Self {
            openapi: "3.0.1".to_string(),
            info,
            servers: None,
            paths: Paths::new(),
            components: None,
            tags: None,
            external_docs: None,
        }
    }

    /// Sets the servers.
    pub fn servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = Some(servers);
        self
    }

    /// Sets the paths.
    pub fn paths(mut self, paths: Paths) -> Self {
        self.paths = paths;
        self
    }

    /// Sets the components.
    pub fn components(mut self, components: Components) -> Self {
        self.components = Some(components);
        self
    }

    /// Sets the tags.
    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sets the external documentation.
    pub fn external_docs(mut self, external_docs: ExternalDocs) -> Self {
        self.external_docs = Some(external_docs);
        self
    }

    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a document from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, LoadError> {
        Ok(serde_norway::from_str(text)?)
    }

    /// Parses a document from text, trying JSON first and falling back to YAML.
    pub fn from_text(text: &str) -> Result<Self, LoadError> {
        match Self::from_json(text) {
            Ok(document) => Ok(document),
            Err(_) => Self::from_yaml(text),
        }
    }

    /// Loads a document from a file, choosing the format from the extension.
    ///
    /// Files without a `.json`, `.yaml` or `.yml` extension go through the
    /// content-based fallback of [`OpenApi::from_text`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_text(&text),
        }
    }

    /// The base URL of the first declared server, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.servers
            .as_ref()
            .and_then(|servers| servers.first())
            .map(|server| server.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = "\
openapi: 3.0.1
info:
  title: Test API
  version: 1.0.0
servers:
  - url: http://localhost/v4
paths: {}
";

    #[test]
    fn from_yaml_parses_minimal_document() {
        //* When
        let document = OpenApi::from_yaml(MINIMAL_YAML).expect("should parse YAML");

        //* Then
        assert_eq!(document.openapi, "3.0.1");
        assert_eq!(document.info.title, "Test API");
        assert_eq!(document.base_url(), Some("http://localhost/v4"));
    }

    #[test]
    fn from_text_falls_back_to_yaml_for_non_json_input() {
        //* When
        let document = OpenApi::from_text(MINIMAL_YAML).expect("should fall back to YAML");

        //* Then
        assert_eq!(document.info.version, "1.0.0");
    }

    #[test]
    fn from_text_accepts_json_input() {
        //* Given
        let raw = r#"{"openapi": "3.0.1", "info": {"title": "T", "version": "1"}, "paths": {}}"#;

        //* When
        let document = OpenApi::from_text(raw).expect("should parse JSON");

        //* Then
        assert_eq!(document.info.title, "T");
        assert!(document.base_url().is_none());
    }
}
