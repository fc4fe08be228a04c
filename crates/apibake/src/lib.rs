//! # apibake
//!
//! Bake OpenAPI specifications into CLI operation registries.
//!
//! This crate provides the main API for working with OpenAPI documents destined
//! for CLI generation, re-exporting all types from the `apibake-core` crate.

// Re-export the model and engine modules for access to internal types
pub use apibake_core::{baked, openapi, resolve};
// Re-export all main types at the crate root for convenience
pub use apibake_core::{
    BakeError, BakedCli, BakedOperation, CacheError, Components, Contact, Extensions,
    ExternalDocs, HttpMethod, Info, License, LoadError, LookupError, Map, MediaType, OpenApi,
    Operation, Parameter, ParameterIn, PathItem, Paths, Ref, RefOr, RequestArg, RequestBody,
    ResolveError, Resolver, Response, ResponseAttr, ResponseModel, Schema, SchemaType, Server,
    Tag, UrlParam,
};
