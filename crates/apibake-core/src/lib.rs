//! # apibake-core
//!
//! Core types for baking OpenAPI documents into CLI operation registries.
//!
//! This crate provides the typed OpenAPI 3.0 document model, `$ref` resolution
//! (including sub-path references into another schema's `properties`), and the
//! baking engine that maps operations to CLI commands via `x-linode-cli-*`
//! vendor extensions.

pub mod baked;
pub mod openapi;
pub mod resolve;

// Re-export main types at the crate root for convenience
pub use baked::{
    BakeError, BakedCli, BakedOperation, CacheError, LookupError, RequestArg, ResponseAttr,
    ResponseModel, UrlParam,
};
pub use openapi::{
    Components, Contact, Extensions, ExternalDocs, HttpMethod, Info, License, LoadError, Map,
    MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem, Paths, Ref, RefOr,
    RequestBody, Response, Schema, SchemaType, Server, Tag,
};
pub use resolve::{ResolveError, Resolver};
