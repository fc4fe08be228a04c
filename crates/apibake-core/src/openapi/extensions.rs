//! Vendor extension support for the OpenAPI document model.
//!
//! Extensions are the non-standard keys (prefixed `x-`) that carry tool-specific
//! metadata, e.g. `x-linode-cli-command`. They are captured verbatim wherever the
//! specification allows them and queried by the baking engine.

use super::map::Map;

/// A map of extension properties.
///
/// Keys are expected to start with `x-` and values can be any valid JSON value.
/// Captured via `#[serde(flatten)]`, so any key not claimed by a sibling field
/// lands here.
pub type Extensions = Map<String, serde_json::Value>;

/// Looks up an extension value, treating an absent map as empty.
pub(crate) fn get<'a>(
    extensions: Option<&'a Extensions>,
    key: &str,
) -> Option<&'a serde_json::Value> {
    extensions.and_then(|ext| ext.get(key))
}
