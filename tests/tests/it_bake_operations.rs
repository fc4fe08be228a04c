//! Integration tests for baking operations out of a complete document.
//!
//! The YAML fixture exercises command grouping, action aliases, `oneOf`/`anyOf`
//! request composition, skipped operations and URL parameter shadowing.

use std::path::Path;

use apibake::{BakedCli, BakedOperation, HttpMethod, LookupError, OpenApi, SchemaType};

fn bake_fixture() -> BakedCli {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/foo_bar.yaml");
    let document = OpenApi::from_path(&path).expect("should load the fixture document");
    BakedCli::bake(&document).expect("should bake the document")
}

fn operation<'a>(registry: &'a BakedCli, action: &str) -> &'a BakedOperation {
    registry
        .find_operation("foo", action)
        .expect("should find the operation")
}

#[test]
fn bake_groups_operations_by_command_and_action() {
    //* When
    let registry = bake_fixture();

    //* Then
    assert_eq!(registry.base_url, "http://localhost/v4");
    assert_eq!(registry.spec_version, "1.2.3");
    assert_eq!(registry.commands.len(), 1);

    let actions = registry.commands.get("foo").expect("foo command group");
    assert_eq!(actions.len(), 2);
    assert!(actions.contains_key("create"));
    assert!(actions.contains_key("update"));
}

#[test]
fn bake_skips_operations_marked_with_the_skip_extension() {
    //* When
    let registry = bake_fixture();

    //* Then
    // The delete operation carries `x-linode-cli-skip`.
    let error = registry
        .find_operation("foo", "purge")
        .expect_err("the skipped operation must not be baked");
    assert_eq!(
        error,
        LookupError::UnknownAction {
            command: "foo".to_string(),
            action: "purge".to_string(),
        }
    );
}

#[test]
fn create_action_carries_aliases_and_documentation() {
    //* Given
    let registry = bake_fixture();

    //* When
    let create = operation(&registry, "create");

    //* Then
    assert_eq!(create.method, HttpMethod::Post);
    assert_eq!(create.action_aliases, vec!["make".to_string()]);
    assert_eq!(create.url, "http://localhost/v4/foo/bar");
    assert_eq!(create.summary, "Foo Bar Create");
    assert_eq!(create.description, "Creates a foo bar");
    assert_eq!(
        create.docs_url.as_deref(),
        Some("https://www.linode.com/docs/api/foo-bar/#foo-bar-create")
    );
}

#[test]
fn create_action_flattens_composed_request_bodies() {
    //* Given
    let registry = bake_fixture();

    //* When
    let create = operation(&registry, "create");

    //* Then
    // Own properties come first, then each `oneOf` branch's, with nested
    // objects flattened into dotted paths.
    let paths: Vec<&str> = create.args.iter().map(|arg| arg.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["label", "size", "generation.cpu", "generation.memory", "region"]
    );

    let arg = |path: &str| {
        create
            .args
            .iter()
            .find(|arg| arg.path == path)
            .expect("argument should exist")
    };
    assert!(arg("label").required, "own required list must be honored");
    assert!(arg("size").required, "branch required list must be honored");
    assert!(!arg("region").required);
    assert_eq!(arg("generation.cpu").datatype, SchemaType::Integer);
    assert_eq!(arg("generation.cpu").name, "cpu");
}

#[test]
fn update_action_renames_shadowed_url_parameters() {
    //* Given
    let registry = bake_fixture();

    //* When
    let update = operation(&registry, "update");

    //* Then
    // The request body also declares `barId`, so the URL parameter and the
    // path template gain a trailing underscore.
    assert_eq!(update.params.len(), 1);
    assert_eq!(update.params[0].name, "barId_");
    assert_eq!(update.params[0].param_type, SchemaType::Integer);
    assert_eq!(update.path, "/foo/bar/{barId_}");
    assert_eq!(update.url, "http://localhost/v4/foo/bar/{barId_}");
    assert!(update.args.iter().any(|arg| arg.path == "barId"));
}

#[test]
fn update_action_records_allowed_defaults() {
    //* Given
    let registry = bake_fixture();

    //* When
    let update = operation(&registry, "update");

    //* Then
    assert_eq!(update.allowed_defaults, Some(vec!["region".to_string()]));
}

#[test]
fn find_operation_falls_back_to_action_aliases() {
    //* Given
    let registry = bake_fixture();

    //* When
    let by_alias = registry
        .find_operation("foo", "make")
        .expect("should find the operation by alias");

    //* Then
    assert_eq!(by_alias.action, "create");
    assert_eq!(
        registry.find_operation("bar", "create"),
        Err(LookupError::UnknownCommand("bar".to_string()))
    );
}
