//! Request argument flattening.
//!
//! A request-body schema flattens into dotted-path CLI arguments. Aggregation
//! accounts for properties nested in `oneOf` and `anyOf` blocks: every branch's
//! properties are merged into the parent's set before the walk recurses.

use std::collections::HashSet;

use super::ext;
use crate::{
    openapi::{Map, RefOr, Schema, SchemaType},
    resolve::{ResolveError, Resolver},
};

/// A single CLI argument derived from a request-body property.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestArg {
    /// The dotted path of the property (e.g. `generation.cpu`).
    pub path: String,

    /// The leaf property name.
    pub name: String,

    /// The first sentence of the property description.
    pub description: String,

    /// The property type.
    pub datatype: SchemaType,

    /// The property format, if declared (e.g. `json`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Whether the property is listed as required.
    pub required: bool,

    /// The item type for array properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<SchemaType>,

    /// Whether the property accepts null.
    pub nullable: bool,
}

/// Flattens a request-body schema into CLI arguments.
///
/// Properties marked `readOnly` are excluded. Nested objects recurse with dotted
/// prefixes; membership in the enclosing schema's `required` list (or a
/// composition branch's) marks an argument required.
pub fn bake_args<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
) -> Result<Vec<RequestArg>, ResolveError> {
    let mut args = Vec::new();
    let mut visiting = HashSet::new();
    visiting.insert(std::ptr::from_ref(schema));
    walk(resolver, schema, &mut Vec::new(), &mut visiting, &mut args)?;
    Ok(args)
}

fn walk<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
    prefix: &mut Vec<String>,
    visiting: &mut HashSet<*const Schema>,
    args: &mut Vec<RequestArg>,
) -> Result<(), ResolveError> {
    let (properties, required) = aggregate_properties(resolver, schema)?;

    for (name, node) in properties {
        let property = resolver.schema(node)?;
        if property.read_only == Some(true) {
            continue;
        }

        let has_children = !aggregate_properties(resolver, property)?.0.is_empty();
        if has_children {
            // A property cycling back into a schema already on the walk stack
            // has no finite dotted path; skip it.
            if !visiting.insert(std::ptr::from_ref(property)) {
                continue;
            }
            prefix.push(name.to_string());
            walk(resolver, property, prefix, visiting, args)?;
            prefix.pop();
            visiting.remove(&std::ptr::from_ref(property));
            continue;
        }

        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix.join("."), name)
        };
        let item_type = match &property.items {
            Some(items) => Some(resolver.schema(items)?.type_or_default()),
            None => None,
        };
        args.push(RequestArg {
            path,
            name: name.to_string(),
            description: first_sentence(property.description.as_deref()),
            datatype: property.type_or_default(),
            format: property.format.clone(),
            required: required.contains(name),
            item_type,
            nullable: property.nullable == Some(true),
        });
    }

    Ok(())
}

/// Aggregates the properties of a schema, merging in the properties of every
/// `oneOf`/`anyOf` branch (recursively), together with the union of the
/// `required` lists encountered.
pub fn aggregate_properties<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
) -> Result<(Map<&'a str, &'a RefOr<Schema>>, HashSet<&'a str>), ResolveError> {
    let mut properties = Map::new();
    let mut required = HashSet::new();
    let mut seen = HashSet::new();
    collect(resolver, schema, &mut properties, &mut required, &mut seen)?;
    Ok((properties, required))
}

fn collect<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
    properties: &mut Map<&'a str, &'a RefOr<Schema>>,
    required: &mut HashSet<&'a str>,
    seen: &mut HashSet<*const Schema>,
) -> Result<(), ResolveError> {
    // A branch referring back to an enclosing schema contributes nothing new.
    if !seen.insert(std::ptr::from_ref(schema)) {
        return Ok(());
    }

    if let Some(own) = &schema.properties {
        for (name, node) in own {
            properties.insert(name.as_str(), node);
        }
    }
    if let Some(names) = &schema.required {
        required.extend(names.iter().map(String::as_str));
    }

    for branches in [&schema.one_of, &schema.any_of].into_iter().flatten() {
        for branch in branches {
            let branch_schema = resolver.schema(branch)?;
            collect(resolver, branch_schema, properties, required, seen)?;
        }
    }

    Ok(())
}

/// Builds the argument list for a filterable list operation: every filterable
/// attribute of the response model becomes a string-typed filter argument.
pub fn filter_args(model: &super::ResponseModel) -> Vec<RequestArg> {
    model
        .attrs
        .iter()
        .filter(|attr| attr.filterable)
        .map(|attr| RequestArg {
            path: attr.name.clone(),
            name: attr.column_name.clone(),
            description: format!("Filter results by {}.", attr.name),
            datatype: attr.datatype,
            format: None,
            required: false,
            item_type: attr.item_type,
            nullable: false,
        })
        .collect()
}

/// The text before the first period, trimmed.
pub(crate) fn first_sentence(text: Option<&str>) -> String {
    text.and_then(|text| text.split('.').next())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Whether a property's extensions mark it filterable.
pub(crate) fn is_filterable(schema: &Schema) -> bool {
    schema
        .extension(ext::FILTERABLE)
        .is_some_and(|value| value.as_bool().unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::{Components, Info, OpenApi, Ref};

    fn leaf(schema_type: SchemaType) -> RefOr<Schema> {
        RefOr::new_inline(Schema::new().schema_type(schema_type))
    }

    fn object(properties: Map<String, RefOr<Schema>>) -> Schema {
        Schema::new()
            .schema_type(SchemaType::Object)
            .properties(properties)
    }

    #[test]
    fn bake_args_flattens_nested_objects_into_dotted_paths() {
        //* Given
        let mut inner = Map::new();
        inner.insert("cpu".to_string(), leaf(SchemaType::Integer));
        inner.insert("memory".to_string(), leaf(SchemaType::Integer));
        let mut outer = Map::new();
        outer.insert("label".to_string(), leaf(SchemaType::String));
        outer.insert("generation".to_string(), RefOr::new_inline(object(inner)));
        let schema = object(outer).required(vec!["label".to_string()]);
        let document = OpenApi::new(Info::new("t", "1"));

        //* When
        let resolver = Resolver::new(&document);
        let args = bake_args(&resolver, &schema).expect("should bake args");

        //* Then
        let mut paths: Vec<&str> = args.iter().map(|arg| arg.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["generation.cpu", "generation.memory", "label"]);
        let label = args.iter().find(|arg| arg.path == "label").expect("label arg");
        assert!(label.required);
        let cpu = args
            .iter()
            .find(|arg| arg.path == "generation.cpu")
            .expect("cpu arg");
        assert!(!cpu.required);
    }

    #[test]
    fn bake_args_merges_one_of_branch_properties() {
        //* Given
        let mut branch_a = Map::new();
        branch_a.insert("size".to_string(), leaf(SchemaType::Integer));
        let mut branch_b = Map::new();
        branch_b.insert("region".to_string(), leaf(SchemaType::String));
        let mut own = Map::new();
        own.insert("label".to_string(), leaf(SchemaType::String));
        let schema = object(own).one_of(vec![
            RefOr::new_inline(object(branch_a).required(vec!["size".to_string()])),
            RefOr::new_inline(object(branch_b)),
        ]);
        let document = OpenApi::new(Info::new("t", "1"));

        //* When
        let resolver = Resolver::new(&document);
        let args = bake_args(&resolver, &schema).expect("should bake args");

        //* Then
        let mut paths: Vec<&str> = args.iter().map(|arg| arg.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["label", "region", "size"]);
        let size = args.iter().find(|arg| arg.path == "size").expect("size arg");
        assert!(size.required, "branch-level required should be honored");
    }

    #[test]
    fn bake_args_skips_read_only_properties() {
        //* Given
        let mut own = Map::new();
        own.insert(
            "id".to_string(),
            RefOr::new_inline(Schema::new().schema_type(SchemaType::Integer).read_only(true)),
        );
        own.insert("label".to_string(), leaf(SchemaType::String));
        let schema = object(own);
        let document = OpenApi::new(Info::new("t", "1"));

        //* When
        let resolver = Resolver::new(&document);
        let args = bake_args(&resolver, &schema).expect("should bake args");

        //* Then
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].path, "label");
    }

    #[test]
    fn bake_args_records_array_item_types() {
        //* Given
        let mut own = Map::new();
        own.insert(
            "tags".to_string(),
            RefOr::new_inline(
                Schema::new()
                    .schema_type(SchemaType::Array)
                    .items(leaf(SchemaType::String)),
            ),
        );
        let schema = object(own);
        let document = OpenApi::new(Info::new("t", "1"));

        //* When
        let resolver = Resolver::new(&document);
        let args = bake_args(&resolver, &schema).expect("should bake args");

        //* Then
        assert_eq!(args[0].datatype, SchemaType::Array);
        assert_eq!(args[0].item_type, Some(SchemaType::String));
    }

    #[test]
    fn bake_args_terminates_on_self_referential_properties() {
        //* Given
        let mut own = Map::new();
        own.insert("label".to_string(), leaf(SchemaType::String));
        own.insert(
            "child".to_string(),
            RefOr::Ref(Ref::new("#/components/schemas/Node")),
        );
        let mut schemas = Map::new();
        schemas.insert("Node".to_string(), RefOr::new_inline(object(own)));
        let document =
            OpenApi::new(Info::new("t", "1")).components(Components::new().schemas(schemas));

        //* When
        let resolver = Resolver::new(&document);
        let schema = resolver
            .schema_ref("#/components/schemas/Node")
            .expect("should resolve");
        let args = bake_args(&resolver, schema).expect("should bake args");

        //* Then
        // The cyclic `child` property is dropped; the walk must not recurse
        // into `Node` again.
        let paths: Vec<&str> = args.iter().map(|arg| arg.path.as_str()).collect();
        assert_eq!(paths, vec!["label"]);
    }

    #[test]
    fn aggregate_properties_tolerates_self_referential_branches() {
        //* Given
        let mut own = Map::new();
        own.insert("label".to_string(), leaf(SchemaType::String));
        let mut schemas = Map::new();
        schemas.insert(
            "Loop".to_string(),
            RefOr::new_inline(
                object(own).any_of(vec![RefOr::Ref(Ref::new("#/components/schemas/Loop"))]),
            ),
        );
        let document = OpenApi::new(Info::new("t", "1"))
            .components(Components::new().schemas(schemas));

        //* When
        let resolver = Resolver::new(&document);
        let schema = resolver
            .schema_ref("#/components/schemas/Loop")
            .expect("should resolve");
        let (properties, _) =
            aggregate_properties(&resolver, schema).expect("should aggregate");

        //* Then
        assert_eq!(properties.len(), 1);
        assert!(properties.contains_key("label"));
    }

    #[test]
    fn first_sentence_truncates_at_the_first_period() {
        assert_eq!(
            first_sentence(Some("Creates a foo. Ignores the rest.")),
            "Creates a foo"
        );
        assert_eq!(first_sentence(None), "");
    }
}
