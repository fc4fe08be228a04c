//! Integration tests for `$ref` resolution over complete documents.
//!
//! Loads the fixture documents from `assets/` and checks that every reference
//! they contain dereferences, including references into schema sub-paths such
//! as `#/components/schemas/PaginationEnvelope/properties/page`.

use std::path::Path;

use apibake::{OpenApi, ResolveError, Resolver, SchemaType};

fn load_fixture(name: &str) -> OpenApi {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(name);
    OpenApi::from_path(&path).expect("should load the fixture document")
}

#[test]
fn every_reference_in_the_yaml_fixture_resolves() {
    //* Given
    let document = load_fixture("foo_bar.yaml");

    //* When
    let errors = Resolver::new(&document).validate();

    //* Then
    assert!(errors.is_empty(), "expected no resolution errors: {errors:?}");
}

#[test]
fn every_reference_in_the_json_fixture_resolves() {
    //* Given
    let document = load_fixture("paginated.json");

    //* When
    let errors = Resolver::new(&document).validate();

    //* Then
    assert!(errors.is_empty(), "expected no resolution errors: {errors:?}");
}

#[test]
fn schema_ref_reaches_the_pagination_envelope_page_property() {
    //* Given
    let document = load_fixture("paginated.json");

    //* When
    let resolver = Resolver::new(&document);
    let schema = resolver
        .schema_ref("#/components/schemas/PaginationEnvelope/properties/page")
        .expect("should resolve into the properties sub-path");

    //* Then
    assert_eq!(schema.schema_type, Some(SchemaType::Integer));
    assert_eq!(schema.description.as_deref(), Some("The current page."));
}

#[test]
fn schema_ref_follows_sub_paths_through_composition_branches() {
    //* Given
    let document = load_fixture("foo_bar.yaml");

    //* When
    // `oneOf/0` is itself a reference to `SizeVariant`; the walk must follow
    // it before descending into `properties`.
    let resolver = Resolver::new(&document);
    let schema = resolver
        .schema_ref(
            "#/components/schemas/FooBarRequest/oneOf/0/properties/generation/properties/cpu",
        )
        .expect("should resolve through the branch reference");

    //* Then
    assert_eq!(schema.schema_type, Some(SchemaType::Integer));
}

#[test]
fn validate_reports_a_dangling_reference() {
    //* Given
    let raw = "\
openapi: 3.0.1
info:
  title: Broken API
  version: 1.0.0
paths: {}
components:
  schemas:
    Holder:
      type: object
      properties:
        broken:
          $ref: '#/components/schemas/Nowhere'
";
    let document = OpenApi::from_yaml(raw).expect("should parse the document");

    //* When
    let errors = Resolver::new(&document).validate();

    //* Then
    assert_eq!(errors.len(), 1);
    assert!(
        matches!(&errors[0], ResolveError::Unresolved { segment, .. } if segment == "Nowhere"),
        "expected an unresolved error, got {errors:?}"
    );
}
