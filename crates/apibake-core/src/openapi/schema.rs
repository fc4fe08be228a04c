//! Schema types and references.
//!
//! A schema node is recursive: it may carry a primitive type, `oneOf`/`anyOf`
//! composition branches (each itself a schema node), object `properties`, array
//! `items`, and vendor extensions. Any position that accepts a schema also accepts
//! a `$ref` pointer to another node in the document, modeled by [`RefOr`].

use super::{extensions::Extensions, map::Map};

/// A schema definition or a reference to another node in the document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// A reference to another node.
    Ref(Ref),
    /// An inline definition.
    T(T),
}

impl<T> RefOr<T> {
    /// Creates a new reference to a component.
    pub fn new_ref(ref_path: impl Into<String>) -> Self {
        RefOr::Ref(Ref {
            ref_path: ref_path.into(),
        })
    }

    /// Creates a new inline definition.
    pub fn new_inline(value: T) -> Self {
        RefOr::T(value)
    }
}

/// A pointer-by-path reference to another node in the same document.
///
/// The path may address a component directly (`#/components/schemas/Foo`) or a
/// sub-path inside another schema's body
/// (`#/components/schemas/PaginationEnvelope/properties/page`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ref {
    /// The reference path.
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl Ref {
    /// Creates a new reference with the given path.
    pub fn new(ref_path: impl Into<String>) -> Self {
        Self {
            ref_path: ref_path.into(),
        }
    }
}

/// A schema definition.
///
/// Unlike generator-oriented models that split object and array schemas into
/// separate variants, consuming real-world documents calls for a single node type
/// where every keyword is optional: fixtures freely combine `type`, `properties`,
/// and `oneOf` on the same node.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Schema {
    /// The schema type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// The schema format.
    ///
    /// Kept as a free-form string: vendors use non-registered formats (e.g. `json`)
    /// that an enumeration would reject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// A description of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Title of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Properties for object types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, RefOr<Schema>>>,

    /// Required properties for object types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// The schema for array items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RefOr<Schema>>>,

    /// Mutually exclusive alternative shapes for the value.
    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<RefOr<Schema>>>,

    /// Overlapping alternative shapes for the value.
    #[serde(rename = "anyOf", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<RefOr<Schema>>>,

    /// Possible values for an enumeration.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Default value for this schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Example value for this schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Whether the value can be null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Whether the field is read-only.
    ///
    /// Read-only properties never become request arguments.
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    /// Whether the field is write-only.
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    /// Whether the schema is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Minimum value for numeric types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Maximum value for numeric types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Minimum length for string types.
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum length for string types.
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Pattern for string types (regular expression).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Minimum number of items in an array.
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    /// Maximum number of items in an array.
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    /// Whether additional properties are allowed (for object types).
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,

    /// Vendor extension properties (`x-linode-filterable`, `x-linode-cli-display`, ...).
    #[serde(flatten)]
    pub extensions: Option<Extensions>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema type.
    pub fn schema_type(mut self, schema_type: SchemaType) -> Self {
        self.schema_type = Some(schema_type);
        self
    }

    /// Sets the schema format.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the properties.
    pub fn properties(mut self, properties: Map<String, RefOr<Schema>>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Sets the required properties.
    pub fn required(mut self, required: Vec<String>) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets the items schema.
    pub fn items(mut self, items: RefOr<Schema>) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    /// Sets the `oneOf` composition branches.
    pub fn one_of(mut self, one_of: Vec<RefOr<Schema>>) -> Self {
        self.one_of = Some(one_of);
        self
    }

    /// Sets the `anyOf` composition branches.
    pub fn any_of(mut self, any_of: Vec<RefOr<Schema>>) -> Self {
        self.any_of = Some(any_of);
        self
    }

    /// Sets the enum values.
    pub fn enum_values(mut self, values: Vec<serde_json::Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Sets the example value.
    pub fn example(mut self, example: serde_json::Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Sets the nullable flag.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Sets the read-only flag.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Sets the extensions.
    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Returns the vendor extension value for the given key, if present.
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        super::extensions::get(self.extensions.as_ref(), key)
    }

    /// Returns the schema type, defaulting to `string` when absent.
    ///
    /// Matches how untyped leaf properties are treated when deriving CLI arguments
    /// and output columns.
    pub fn type_or_default(&self) -> SchemaType {
        self.schema_type.clone().unwrap_or(SchemaType::String)
    }

    /// Whether this node declares any composition branches.
    pub fn has_composition(&self) -> bool {
        self.one_of.is_some() || self.any_of.is_some()
    }
}

/// Schema type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Integer type.
    Integer,
    /// Number type (floating point).
    Number,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
    /// Null type.
    Null,
}

impl SchemaType {
    /// The lowercase wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Null => "null",
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_ref_or_with_ref_path_yields_ref_variant() {
        //* Given
        let raw = r##"{"$ref": "#/components/schemas/Foo"}"##;

        //* When
        let node: RefOr<Schema> = serde_json::from_str(raw).expect("should deserialize");

        //* Then
        assert!(
            matches!(node, RefOr::Ref(Ref { ref_path }) if ref_path == "#/components/schemas/Foo"),
            "a node with only $ref should parse as a reference"
        );
    }

    #[test]
    fn deserialize_schema_with_composition_and_properties_keeps_both() {
        //* Given
        let raw = r##"{
            "type": "object",
            "properties": {"label": {"type": "string"}},
            "oneOf": [{"$ref": "#/components/schemas/A"}, {"type": "object"}]
        }"##;

        //* When
        let schema: Schema = serde_json::from_str(raw).expect("should deserialize");

        //* Then
        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        assert!(schema.properties.as_ref().is_some_and(|p| p.contains_key("label")));
        assert_eq!(schema.one_of.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn deserialize_schema_captures_vendor_extensions() {
        //* Given
        let raw = r##"{"type": "string", "x-linode-filterable": true}"##;

        //* When
        let schema: Schema = serde_json::from_str(raw).expect("should deserialize");

        //* Then
        assert_eq!(
            schema.extension("x-linode-filterable"),
            Some(&serde_json::Value::Bool(true))
        );
    }

    #[test]
    fn schema_type_defaults_to_string_for_untyped_nodes() {
        //* Given
        let schema = Schema::new();

        //* Then
        assert_eq!(schema.type_or_default(), SchemaType::String);
    }
}
