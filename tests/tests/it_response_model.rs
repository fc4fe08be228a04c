//! Integration tests for response models baked from a paginated document.
//!
//! The JSON fixture declares a pagination envelope referenced through
//! `properties` sub-paths and filterable, display-weighted attributes.

use std::path::Path;

use apibake::{BakedCli, BakedOperation, OpenApi, SchemaType};
use serde_json::json;

fn bake_fixture() -> BakedCli {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/paginated.json");
    let document = OpenApi::from_path(&path).expect("should load the fixture document");
    BakedCli::bake(&document).expect("should bake the document")
}

fn list_operation(registry: &BakedCli) -> &BakedOperation {
    registry
        .find_operation("foo", "list")
        .expect("should find the list operation")
}

#[test]
fn bake_detects_the_pagination_envelope() {
    //* Given
    let registry = bake_fixture();

    //* When
    let model = list_operation(&registry)
        .response_model
        .as_ref()
        .expect("the list operation should have a response model");

    //* Then
    // The attributes come from the `data` item schema, not the envelope.
    assert!(model.is_paginated);
    let names: Vec<&str> = model.attrs.iter().map(|attr| attr.name.as_str()).collect();
    assert_eq!(names, vec!["id", "label", "status", "tags"]);
}

#[test]
fn list_action_exposes_filterable_attributes_as_arguments() {
    //* Given
    let registry = bake_fixture();

    //* When
    let list = list_operation(&registry);

    //* Then
    let paths: Vec<&str> = list.args.iter().map(|arg| arg.path.as_str()).collect();
    assert_eq!(paths, vec!["id", "label"]);
    assert_eq!(list.args[0].datatype, SchemaType::Integer);
    assert_eq!(list.args[1].datatype, SchemaType::String);
    assert!(list.args.iter().all(|arg| !arg.required));
}

#[test]
fn attributes_carry_display_weights_and_color_maps() {
    //* Given
    let registry = bake_fixture();
    let model = list_operation(&registry)
        .response_model
        .as_ref()
        .expect("response model");

    //* When
    let displayed: Vec<&str> = model
        .display_attrs()
        .map(|attr| attr.name.as_str())
        .collect();
    let status = model
        .attrs
        .iter()
        .find(|attr| attr.name == "status")
        .expect("status attribute");

    //* Then
    assert_eq!(displayed, vec!["id", "label", "status"]);
    assert_eq!(status.display, 3);
    let colors = status.color_map.as_ref().expect("status color map");
    assert_eq!(colors.get("active").map(String::as_str), Some("green"));
    assert_eq!(colors.get("default_").map(String::as_str), Some("yellow"));
}

#[test]
fn array_attributes_record_their_item_type() {
    //* Given
    let registry = bake_fixture();
    let model = list_operation(&registry)
        .response_model
        .as_ref()
        .expect("response model");

    //* When
    let tags = model
        .attrs
        .iter()
        .find(|attr| attr.name == "tags")
        .expect("tags attribute");

    //* Then
    assert_eq!(tags.datatype, SchemaType::Array);
    assert_eq!(tags.item_type, Some(SchemaType::String));
    assert_eq!(tags.display, 0);
}

#[test]
fn fix_json_unwraps_a_paginated_body_into_entries() {
    //* Given
    let registry = bake_fixture();
    let model = list_operation(&registry)
        .response_model
        .as_ref()
        .expect("response model");
    let body = json!({
        "page": 1,
        "pages": 1,
        "results": 2,
        "data": [
            {"id": 1, "label": "first", "status": "active", "tags": ["a", "b"]},
            {"id": 2, "label": "second", "status": "offline", "tags": []},
        ]
    });

    //* When
    let entries = model.fix_json(body);

    //* Then
    assert_eq!(entries.len(), 2);
    let label = model
        .attrs
        .iter()
        .find(|attr| attr.name == "label")
        .expect("label attribute");
    assert_eq!(label.get_string(&entries[0]), "first");
    let tags = model
        .attrs
        .iter()
        .find(|attr| attr.name == "tags")
        .expect("tags attribute");
    assert_eq!(tags.get_string(&entries[0]), "a b");
}

#[test]
fn registry_round_trips_through_save_and_load() {
    //* Given
    let registry = bake_fixture();

    //* When
    let mut buffer = Vec::new();
    registry.save(&mut buffer).expect("should write the registry");
    let restored = BakedCli::load(buffer.as_slice()).expect("should read the registry");

    //* Then
    assert_eq!(restored, registry);
}
