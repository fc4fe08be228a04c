//! Path item and operation entities.

use super::{
    Parameter, RequestBody, Response, Server, extensions::Extensions, map::Map, schema::RefOr,
};

/// The HTTP verbs an operation can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    /// All methods the baking engine considers, in a stable order.
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    /// The lowercase wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operations and shared parameters available under a single URL path.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct PathItem {
    /// The GET operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,

    /// The POST operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,

    /// The PUT operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,

    /// The DELETE operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,

    /// Parameters shared by every operation under this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<RefOr<Parameter>>>,

    /// Extension properties (`x-linode-cli-command`, ...).
    #[serde(flatten)]
    pub extensions: Option<Extensions>,
}

impl PathItem {
    /// Creates a new empty path item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the operation for the given method, if declared.
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }

    /// Iterates over the declared operations together with their methods.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .iter()
            .filter_map(|method| self.operation(*method).map(|op| (*method, op)))
    }

    /// Returns the vendor extension value for the given key, if present.
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        super::extensions::get(self.extensions.as_ref(), key)
    }
}

/// A single operation: path plus HTTP verb.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Operation {
    /// A unique identifier for the operation (e.g. `fooBarPost`).
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// A short summary of the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A detailed description of the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tags for grouping the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Servers overriding the document-level list for this operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    /// Parameters specific to this operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<RefOr<Parameter>>>,

    /// The request body schema.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Per-status-code response schemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Map<String, RefOr<Response>>>,

    /// Whether the operation is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Extension properties (`x-linode-cli-action`, `x-linode-cli-skip`, ...).
    #[serde(flatten)]
    pub extensions: Option<Extensions>,
}

impl Operation {
    /// Creates a new empty operation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the vendor extension value for the given key, if present.
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        super::extensions::get(self.extensions.as_ref(), key)
    }
}

/// A map of URL path templates to their path items.
pub type Paths = Map<String, PathItem>;
