//! `$ref` resolution over an OpenAPI document.
//!
//! References are pointer-by-path strings resolving to another node anywhere in
//! the same document. Besides plain component pointers
//! (`#/components/schemas/Foo`), schema references may address a sub-path of
//! another schema's body, e.g.
//! `#/components/schemas/PaginationEnvelope/properties/page`. Supported sub-path
//! segments are `properties/<field>`, `items`, `oneOf/<index>` and
//! `anyOf/<index>`, chained arbitrarily deep.

use std::collections::HashSet;

use crate::openapi::{OpenApi, Parameter, RefOr, Response, Schema};

/// An error raised while dereferencing a `$ref` pointer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The reference string does not follow the supported pointer grammar.
    #[error("malformed reference `{reference}`: {reason}")]
    Malformed {
        /// The offending reference string.
        reference: String,
        /// Why the reference could not be parsed.
        reason: String,
    },

    /// A pointer segment does not dereference to an existing node.
    #[error("unresolved reference `{reference}`: no node at `{segment}`")]
    Unresolved {
        /// The offending reference string.
        reference: String,
        /// The segment that failed to dereference.
        segment: String,
    },

    /// Following the reference chain revisited a pointer.
    #[error("reference cycle detected at `{reference}`")]
    Cycle {
        /// The reference that closed the cycle.
        reference: String,
    },
}

impl ResolveError {
    fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }

    fn unresolved(reference: &str, segment: impl Into<String>) -> Self {
        Self::Unresolved {
            reference: reference.to_string(),
            segment: segment.into(),
        }
    }
}

/// Dereferences `$ref` pointers against a borrowed document.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    document: &'a OpenApi,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given document.
    pub fn new(document: &'a OpenApi) -> Self {
        Self { document }
    }

    /// The document this resolver dereferences against.
    pub fn document(&self) -> &'a OpenApi {
        self.document
    }

    /// Dereferences a schema node, following reference chains.
    pub fn schema(&self, node: &'a RefOr<Schema>) -> Result<&'a Schema, ResolveError> {
        let mut visited = HashSet::new();
        self.deref_schema(node, &mut visited)
    }

    /// Resolves a schema reference string.
    pub fn schema_ref(&self, reference: &str) -> Result<&'a Schema, ResolveError> {
        let mut visited = HashSet::new();
        self.schema_ref_inner(reference, &mut visited)
    }

    /// Dereferences a parameter node, following reference chains.
    pub fn parameter(&self, node: &'a RefOr<Parameter>) -> Result<&'a Parameter, ResolveError> {
        let mut visited = HashSet::new();
        self.deref_parameter(node, &mut visited)
    }

    /// Dereferences a response node, following reference chains.
    pub fn response(&self, node: &'a RefOr<Response>) -> Result<&'a Response, ResolveError> {
        let mut visited = HashSet::new();
        self.deref_response(node, &mut visited)
    }

    /// Walks the entire document and returns every reference that fails to
    /// dereference.
    ///
    /// For a well-formed document the result is empty: every `$ref` string must
    /// resolve to an existing node.
    pub fn validate(&self) -> Vec<ResolveError> {
        let mut errors = Vec::new();

        for path_item in self.document.paths.values() {
            if let Some(parameters) = &path_item.parameters {
                for parameter in parameters {
                    self.check_parameter(parameter, &mut errors);
                }
            }
            for (_, operation) in path_item.operations() {
                if let Some(parameters) = &operation.parameters {
                    for parameter in parameters {
                        self.check_parameter(parameter, &mut errors);
                    }
                }
                if let Some(request_body) = &operation.request_body
                    && let Some(content) = &request_body.content
                {
                    for media in content.values() {
                        if let Some(schema) = &media.schema {
                            self.check_schema(schema, &mut errors);
                        }
                    }
                }
                if let Some(responses) = &operation.responses {
                    for response in responses.values() {
                        self.check_response(response, &mut errors);
                    }
                }
            }
        }

        if let Some(components) = &self.document.components {
            if let Some(schemas) = &components.schemas {
                for schema in schemas.values() {
                    self.check_schema(schema, &mut errors);
                }
            }
            if let Some(parameters) = &components.parameters {
                for parameter in parameters.values() {
                    self.check_parameter(parameter, &mut errors);
                }
            }
            if let Some(responses) = &components.responses {
                for response in responses.values() {
                    self.check_response(response, &mut errors);
                }
            }
            if let Some(request_bodies) = &components.request_bodies {
                for request_body in request_bodies.values() {
                    if let Some(content) = &request_body.content {
                        for media in content.values() {
                            if let Some(schema) = &media.schema {
                                self.check_schema(schema, &mut errors);
                            }
                        }
                    }
                }
            }
        }

        errors
    }

    fn deref_schema(
        &self,
        node: &'a RefOr<Schema>,
        visited: &mut HashSet<String>,
    ) -> Result<&'a Schema, ResolveError> {
        match node {
            RefOr::T(schema) => Ok(schema),
            RefOr::Ref(reference) => self.schema_ref_inner(&reference.ref_path, visited),
        }
    }

    fn schema_ref_inner(
        &self,
        reference: &str,
        visited: &mut HashSet<String>,
    ) -> Result<&'a Schema, ResolveError> {
        if !visited.insert(reference.to_string()) {
            return Err(ResolveError::Cycle {
                reference: reference.to_string(),
            });
        }

        let segments = parse_pointer(reference)?;
        let (section, name) = match segments.as_slice() {
            [section, name, ..] => (*section, *name),
            _ => {
                return Err(ResolveError::malformed(
                    reference,
                    "expected `#/components/<section>/<name>`",
                ));
            }
        };
        if section != "schemas" {
            return Err(ResolveError::malformed(
                reference,
                format!("expected a schema reference, found section `{section}`"),
            ));
        }

        let root = self
            .document
            .components
            .as_ref()
            .and_then(|components| components.schemas.as_ref())
            .and_then(|schemas| schemas.get(name))
            .ok_or_else(|| ResolveError::unresolved(reference, name))?;
        let mut schema = self.deref_schema(root, visited)?;

        // Walk the optional sub-path into the schema body.
        let mut rest = &segments[2..];
        while let Some(segment) = rest.first() {
            let node = match *segment {
                "properties" => {
                    let field = rest.get(1).ok_or_else(|| {
                        ResolveError::malformed(reference, "`properties` requires a field name")
                    })?;
                    rest = &rest[2..];
                    schema
                        .properties
                        .as_ref()
                        .and_then(|properties| properties.get(*field))
                        .ok_or_else(|| ResolveError::unresolved(reference, *field))?
                }
                "items" => {
                    rest = &rest[1..];
                    schema
                        .items
                        .as_deref()
                        .ok_or_else(|| ResolveError::unresolved(reference, "items"))?
                }
                "oneOf" | "anyOf" => {
                    let index = rest
                        .get(1)
                        .and_then(|raw| raw.parse::<usize>().ok())
                        .ok_or_else(|| {
                            ResolveError::malformed(
                                reference,
                                format!("`{segment}` requires a branch index"),
                            )
                        })?;
                    let branches = if *segment == "oneOf" {
                        schema.one_of.as_ref()
                    } else {
                        schema.any_of.as_ref()
                    };
                    let target = format!("{segment}/{index}");
                    rest = &rest[2..];
                    branches
                        .and_then(|branches| branches.get(index))
                        .ok_or_else(|| ResolveError::unresolved(reference, target))?
                }
                other => {
                    return Err(ResolveError::malformed(
                        reference,
                        format!("unsupported sub-path segment `{other}`"),
                    ));
                }
            };
            schema = self.deref_schema(node, visited)?;
        }

        Ok(schema)
    }

    fn deref_parameter(
        &self,
        node: &'a RefOr<Parameter>,
        visited: &mut HashSet<String>,
    ) -> Result<&'a Parameter, ResolveError> {
        match node {
            RefOr::T(parameter) => Ok(parameter),
            RefOr::Ref(reference) => {
                let next = self.component_entry(
                    &reference.ref_path,
                    "parameters",
                    visited,
                    |components, name| {
                        components
                            .parameters
                            .as_ref()
                            .and_then(|parameters| parameters.get(name))
                    },
                )?;
                self.deref_parameter(next, visited)
            }
        }
    }

    fn deref_response(
        &self,
        node: &'a RefOr<Response>,
        visited: &mut HashSet<String>,
    ) -> Result<&'a Response, ResolveError> {
        match node {
            RefOr::T(response) => Ok(response),
            RefOr::Ref(reference) => {
                let next = self.component_entry(
                    &reference.ref_path,
                    "responses",
                    visited,
                    |components, name| {
                        components
                            .responses
                            .as_ref()
                            .and_then(|responses| responses.get(name))
                    },
                )?;
                self.deref_response(next, visited)
            }
        }
    }

    fn component_entry<T>(
        &self,
        reference: &str,
        expected_section: &str,
        visited: &mut HashSet<String>,
        lookup: impl FnOnce(&'a crate::openapi::Components, &str) -> Option<&'a T>,
    ) -> Result<&'a T, ResolveError> {
        if !visited.insert(reference.to_string()) {
            return Err(ResolveError::Cycle {
                reference: reference.to_string(),
            });
        }

        let segments = parse_pointer(reference)?;
        let (section, name) = match segments.as_slice() {
            [section, name] => (*section, *name),
            _ => {
                return Err(ResolveError::malformed(
                    reference,
                    "expected `#/components/<section>/<name>`",
                ));
            }
        };
        if section != expected_section {
            return Err(ResolveError::malformed(
                reference,
                format!("expected section `{expected_section}`, found `{section}`"),
            ));
        }

        self.document
            .components
            .as_ref()
            .and_then(|components| lookup(components, name))
            .ok_or_else(|| ResolveError::unresolved(reference, name))
    }

    fn check_schema(&self, node: &'a RefOr<Schema>, errors: &mut Vec<ResolveError>) {
        match node {
            RefOr::Ref(reference) => {
                if let Err(error) = self.schema_ref(&reference.ref_path) {
                    errors.push(error);
                }
            }
            RefOr::T(schema) => {
                if let Some(properties) = &schema.properties {
                    for property in properties.values() {
                        self.check_schema(property, errors);
                    }
                }
                if let Some(items) = &schema.items {
                    self.check_schema(items, errors);
                }
                for branches in [&schema.one_of, &schema.any_of].into_iter().flatten() {
                    for branch in branches {
                        self.check_schema(branch, errors);
                    }
                }
            }
        }
    }

    fn check_parameter(&self, node: &'a RefOr<Parameter>, errors: &mut Vec<ResolveError>) {
        match self.parameter(node) {
            Ok(parameter) => {
                if let Some(schema) = &parameter.schema {
                    self.check_schema(schema, errors);
                }
            }
            Err(error) => errors.push(error),
        }
    }

    fn check_response(&self, node: &'a RefOr<Response>, errors: &mut Vec<ResolveError>) {
        match self.response(node) {
            Ok(response) => {
                if let Some(content) = &response.content {
                    for media in content.values() {
                        if let Some(schema) = &media.schema {
                            self.check_schema(schema, errors);
                        }
                    }
                }
            }
            Err(error) => errors.push(error),
        }
    }
}

/// Splits a reference string into its pointer segments after `#/components/`.
fn parse_pointer(reference: &str) -> Result<Vec<&str>, ResolveError> {
    let rest = reference.strip_prefix("#/components/").ok_or_else(|| {
        ResolveError::malformed(reference, "expected a `#/components/...` pointer")
    })?;
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(ResolveError::malformed(reference, "empty pointer segment"));
    }
    Ok(segments)
}
