//! The baking engine.
//!
//! Baking turns a parsed OpenAPI document into a registry of CLI operations:
//! path items become command groups, operations become actions, request-body
//! schemas flatten into arguments and response schemas into output models. The
//! registry serializes to JSON so a CLI can load it without re-parsing (and
//! re-resolving) the source document.

pub mod operation;
pub mod request;
pub mod response;

use std::io::{Read, Write};

pub use self::{
    operation::{BakedOperation, UrlParam},
    request::RequestArg,
    response::{ResponseAttr, ResponseModel},
};
use crate::{
    openapi::{Map, OpenApi},
    resolve::{ResolveError, Resolver},
};

/// The vendor extension keys the baking engine honors.
pub mod ext {
    /// Path-item level: names the command group; path items without it are skipped.
    pub const COMMAND: &str = "x-linode-cli-command";
    /// Operation level: names the action; a list names the action plus aliases.
    pub const ACTION: &str = "x-linode-cli-action";
    /// Operation level: excludes the operation from baking.
    pub const SKIP: &str = "x-linode-cli-skip";
    /// Operation level: argument names that may take configured default values.
    pub const ALLOWED_DEFAULTS: &str = "x-linode-cli-allowed-defaults";
    /// Property level: the attribute may be used as a list filter.
    pub const FILTERABLE: &str = "x-linode-filterable";
    /// Property level: display weight for output columns.
    pub const DISPLAY: &str = "x-linode-cli-display";
    /// Property level: maps attribute values to output colors.
    pub const COLOR: &str = "x-linode-cli-color";
    /// Response-schema level: dotted paths to emit as rows.
    pub const ROWS: &str = "x-linode-cli-rows";
    /// Response-schema level: dotted path to a nested list to split into rows.
    pub const NESTED_LIST: &str = "x-linode-cli-nested-list";
    /// Response-schema level: dotted paths rendered as separate tables.
    pub const SUBTABLES: &str = "x-linode-cli-subtables";
}

/// The media type request and response schemas are read from.
pub(crate) const MEDIA_JSON: &str = "application/json";

/// An error raised while baking a document.
#[derive(Debug, thiserror::Error)]
pub enum BakeError {
    /// A reference in the document failed to resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Neither the operation nor the document declares a server.
    #[error("no server declared for path `{path}`")]
    MissingServer {
        /// The path whose operation has no usable server.
        path: String,
    },
}

/// An error raised while looking up a baked operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The command group does not exist.
    #[error("command not found: {0}")]
    UnknownCommand(String),

    /// The action does not exist under the command, not even as an alias.
    #[error("no action {action} for command {command}")]
    UnknownAction {
        /// The command group that was searched.
        command: String,
        /// The action that was not found.
        action: String,
    },
}

/// An error raised while reading or writing a baked registry.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The registry could not be read or written.
    #[error("failed to access baked registry: {0}")]
    Io(#[from] std::io::Error),

    /// The registry is not valid JSON.
    #[error("failed to decode baked registry: {0}")]
    Json(#[from] serde_json::Error),
}

/// A registry of baked operations, grouped as command -> action -> operation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BakedCli {
    /// The base URL of the API, taken from the document's first server.
    pub base_url: String,

    /// The version of the source document.
    pub spec_version: String,

    /// Baked operations keyed by command group, then action name.
    pub commands: Map<String, Map<String, BakedOperation>>,
}

impl BakedCli {
    /// Bakes a parsed document into an operation registry.
    ///
    /// Path items without an `x-linode-cli-command` extension are skipped, as are
    /// operations without an `x-linode-cli-action` extension or carrying
    /// `x-linode-cli-skip`.
    pub fn bake(document: &OpenApi) -> Result<Self, BakeError> {
        let resolver = Resolver::new(document);
        let mut commands: Map<String, Map<String, BakedOperation>> = Map::new();

        for (path, path_item) in &document.paths {
            let Some(command) = path_item.extension(ext::COMMAND).and_then(|v| v.as_str())
            else {
                continue;
            };

            for (method, operation) in path_item.operations() {
                if operation.extension(ext::SKIP).is_some() {
                    continue;
                }
                let Some((action, aliases)) = action_of(operation.extension(ext::ACTION)) else {
                    continue;
                };

                let baked = BakedOperation::bake(
                    &resolver, path, path_item, method, operation, command, &action, aliases,
                )?;
                commands
                    .entry(command.to_string())
                    .or_default()
                    .insert(action, baked);
            }
        }

        Ok(Self {
            base_url: document.base_url().unwrap_or_default().to_string(),
            spec_version: document.info.version.clone(),
            commands,
        })
    }

    /// Finds the operation for the given command and action.
    ///
    /// Falls back to matching action aliases when no action matches by name.
    pub fn find_operation(
        &self,
        command: &str,
        action: &str,
    ) -> Result<&BakedOperation, LookupError> {
        let actions = self
            .commands
            .get(command)
            .ok_or_else(|| LookupError::UnknownCommand(command.to_string()))?;

        if let Some(operation) = actions.get(action) {
            return Ok(operation);
        }

        actions
            .values()
            .find(|operation| operation.action_aliases.iter().any(|alias| alias == action))
            .ok_or_else(|| LookupError::UnknownAction {
                command: command.to_string(),
                action: action.to_string(),
            })
    }

    /// Writes the registry as JSON.
    pub fn save(&self, writer: impl Write) -> Result<(), CacheError> {
        Ok(serde_json::to_writer(writer, self)?)
    }

    /// Reads a registry previously written by [`BakedCli::save`].
    pub fn load(reader: impl Read) -> Result<Self, CacheError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Extracts the action name and aliases from an `x-linode-cli-action` value.
///
/// A string names the action; a list names the action first and aliases after.
fn action_of(value: Option<&serde_json::Value>) -> Option<(String, Vec<String>)> {
    match value? {
        serde_json::Value::String(action) => Some((action.clone(), Vec::new())),
        serde_json::Value::Array(items) => {
            let mut names = items.iter().filter_map(|item| item.as_str());
            let action = names.next()?.to_string();
            let aliases = names.map(str::to_string).collect();
            Some((action, aliases))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_of_accepts_plain_string() {
        //* When
        let parsed = action_of(Some(&serde_json::json!("list")));

        //* Then
        assert_eq!(parsed, Some(("list".to_string(), vec![])));
    }

    #[test]
    fn action_of_splits_list_into_action_and_aliases() {
        //* When
        let parsed = action_of(Some(&serde_json::json!(["create", "make", "new"])));

        //* Then
        assert_eq!(
            parsed,
            Some(("create".to_string(), vec!["make".to_string(), "new".to_string()]))
        );
    }

    #[test]
    fn action_of_rejects_non_string_values() {
        //* When
        let parsed = action_of(Some(&serde_json::json!(42)));

        //* Then
        assert_eq!(parsed, None);
    }
}
