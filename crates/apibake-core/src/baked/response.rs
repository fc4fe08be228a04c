//! Response models and output attribute handling.

use std::collections::HashSet;

use serde_json::Value;

use super::{ext, request::is_filterable};
use crate::{
    openapi::{Map, Schema, SchemaType},
    resolve::{ResolveError, Resolver},
};

/// A single output attribute derived from a response property.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResponseAttr {
    /// The dotted path of the attribute within a response entry.
    pub name: String,

    /// The column header the attribute is displayed under (the leaf name).
    pub column_name: String,

    /// Whether the attribute may be used as a list filter.
    pub filterable: bool,

    /// Display weight; zero means hidden by default.
    pub display: u64,

    /// The attribute type.
    pub datatype: SchemaType,

    /// The item type for array attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<SchemaType>,

    /// Maps attribute values to output colors; `default_` keys the fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_map: Option<Map<String, String>>,
}

impl ResponseAttr {
    /// Walks the attribute's dotted path through a response entry.
    pub fn get_value<'v>(&self, entry: &'v Value) -> Option<&'v Value> {
        let mut current = entry;
        for segment in self.name.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Renders the attribute's value as display text.
    ///
    /// Scalars render bare (strings without quotes), arrays join their items
    /// with spaces, and a missing value renders empty.
    pub fn get_string(&self, entry: &Value) -> String {
        match self.get_value(entry) {
            None | Some(Value::Null) => String::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(value_to_string)
                .collect::<Vec<_>>()
                .join(" "),
            Some(value) => value_to_string(value),
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// The output model of an operation, derived from its `200` response schema.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ResponseModel {
    /// The attributes of a single response entry.
    pub attrs: Vec<ResponseAttr>,

    /// Dotted paths emitted as individual rows (`x-linode-cli-rows`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<String>>,

    /// Dotted path to a nested list split into rows (`x-linode-cli-nested-list`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_list: Option<String>,

    /// Dotted paths rendered as separate tables (`x-linode-cli-subtables`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtables: Option<Vec<String>>,

    /// Whether the response is a pagination envelope.
    pub is_paginated: bool,
}

impl ResponseModel {
    /// Builds a response model from a resolved `200` response schema.
    ///
    /// A pagination envelope (`page`, `pages`, `results` integers plus a `data`
    /// array) contributes the attributes of its `data` item schema; anything else
    /// contributes its own properties.
    pub fn bake<'a>(
        resolver: &Resolver<'a>,
        schema: &'a Schema,
    ) -> Result<Self, ResolveError> {
        let envelope_item = pagination_item(resolver, schema)?;
        let is_paginated = envelope_item.is_some();
        let source = envelope_item.unwrap_or(schema);

        let mut attrs = Vec::new();
        let mut visiting = HashSet::new();
        visiting.insert(std::ptr::from_ref(source));
        walk_attrs(resolver, source, &mut Vec::new(), &mut visiting, &mut attrs)?;

        Ok(Self {
            attrs,
            rows: string_list(schema.extension(ext::ROWS)),
            nested_list: schema
                .extension(ext::NESTED_LIST)
                .and_then(Value::as_str)
                .map(str::to_string),
            subtables: string_list(schema.extension(ext::SUBTABLES)),
            is_paginated,
        })
    }

    /// The attributes displayed by default, i.e. those with a display weight.
    pub fn display_attrs(&self) -> impl Iterator<Item = &ResponseAttr> {
        self.attrs.iter().filter(|attr| attr.display > 0)
    }

    /// The attributes usable as list filters.
    pub fn filterable_attrs(&self) -> impl Iterator<Item = &ResponseAttr> {
        self.attrs.iter().filter(|attr| attr.filterable)
    }

    /// Normalizes a raw response body into displayable rows.
    ///
    /// Applies `rows` extraction, `nested_list` splitting (each element of the
    /// nested list becomes its own row carrying a `_split` marker), pagination
    /// envelope unwrapping, and finally wraps a bare object into a single row.
    pub fn fix_json(&self, json: Value) -> Vec<Value> {
        if let Some(rows) = &self.rows {
            return fix_rows(rows, &json);
        }
        if let Some(nested_list) = &self.nested_list {
            let entries = match json {
                Value::Array(entries) => entries,
                other => vec![other],
            };
            return fix_nested_list(nested_list, entries);
        }
        if json.get("pages").is_some() {
            return match json.get("data") {
                Some(Value::Array(entries)) => entries.clone(),
                Some(other) => vec![other.clone()],
                None => Vec::new(),
            };
        }
        match json {
            Value::Array(entries) => entries,
            other => vec![other],
        }
    }
}

fn fix_rows(rows: &[String], json: &Value) -> Vec<Value> {
    let mut fixed = Vec::new();
    for path in rows {
        let mut current = Some(json);
        for segment in path.split('.') {
            current = current.and_then(|value| value.get(segment));
        }
        match current {
            Some(Value::Array(items)) => fixed.extend(items.iter().cloned()),
            Some(value) => fixed.push(value.clone()),
            None => {}
        }
    }
    fixed
}

fn fix_nested_list(nested_list: &str, entries: Vec<Value>) -> Vec<Value> {
    let segments: Vec<&str> = nested_list.split('.').collect();
    let (root, leaf) = match (segments.first(), segments.last()) {
        (Some(root), Some(leaf)) => (*root, *leaf),
        _ => return entries,
    };

    let mut fixed = Vec::new();
    for entry in entries {
        let mut nested = Some(&entry);
        for segment in &segments {
            nested = nested.and_then(|value| value.get(segment));
        }
        let items = match nested {
            Some(Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
            None => continue,
        };

        for item in items {
            let mut row = entry.clone();
            if let Value::Object(fields) = &mut row {
                fields.remove(root);
                fields.insert("_split".to_string(), Value::String(leaf.to_string()));
                fields.insert(root.to_string(), item);
            }
            fixed.push(row);
        }
    }
    fixed
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let Value::Array(items) = value? else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Returns the `data` item schema when the given schema is a pagination envelope.
fn pagination_item<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
) -> Result<Option<&'a Schema>, ResolveError> {
    let Some(properties) = &schema.properties else {
        return Ok(None);
    };
    if !["page", "pages", "results"]
        .iter()
        .all(|field| properties.contains_key(*field))
    {
        return Ok(None);
    }
    let Some(data) = properties.get("data") else {
        return Ok(None);
    };

    let data_schema = resolver.schema(data)?;
    match &data_schema.items {
        Some(items) => Ok(Some(resolver.schema(items)?)),
        None => Ok(None),
    }
}

fn walk_attrs<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
    prefix: &mut Vec<String>,
    visiting: &mut HashSet<*const Schema>,
    attrs: &mut Vec<ResponseAttr>,
) -> Result<(), ResolveError> {
    let Some(properties) = &schema.properties else {
        return Ok(());
    };

    for (name, node) in properties {
        let property = resolver.schema(node)?;
        if property.properties.is_some() {
            // A property cycling back into a schema already on the walk stack
            // has no finite dotted path; skip it.
            if !visiting.insert(std::ptr::from_ref(property)) {
                continue;
            }
            prefix.push(name.clone());
            walk_attrs(resolver, property, prefix, visiting, attrs)?;
            prefix.pop();
            visiting.remove(&std::ptr::from_ref(property));
            continue;
        }

        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix.join("."), name)
        };
        let item_type = match &property.items {
            Some(items) => Some(resolver.schema(items)?.type_or_default()),
            None => None,
        };
        attrs.push(ResponseAttr {
            column_name: name.clone(),
            filterable: is_filterable(property),
            display: display_weight(property),
            datatype: property.type_or_default(),
            item_type,
            color_map: color_map(property),
            name: path,
        });
    }

    Ok(())
}

/// The display weight of a property: a number is used as-is, `true` counts as 1.
fn display_weight(schema: &Schema) -> u64 {
    match schema.extension(ext::DISPLAY) {
        Some(Value::Bool(true)) => 1,
        Some(Value::Number(number)) => number.as_u64().unwrap_or(0),
        _ => 0,
    }
}

fn color_map(schema: &Schema) -> Option<Map<String, String>> {
    let Value::Object(fields) = schema.extension(ext::COLOR)? else {
        return None;
    };
    Some(
        fields
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_str()
                    .map(|color| (key.clone(), color.to_string()))
            })
            .collect(),
    )
}
