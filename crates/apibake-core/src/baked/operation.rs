//! Baked operation: a single CLI action wired to an HTTP operation.

use super::{BakeError, MEDIA_JSON, RequestArg, ResponseModel, ext, request};
use crate::{
    openapi::{HttpMethod, Operation, ParameterIn, PathItem, SchemaType},
    resolve::Resolver,
};

/// A variable element of the URL path, generally an ID or slug.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UrlParam {
    /// The parameter name.
    pub name: String,

    /// The parameter value type.
    pub param_type: SchemaType,
}

/// The information a CLI needs to expose one operation as a command action.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BakedOperation {
    /// The command group this operation belongs to.
    pub command: String,

    /// The action name within the command group.
    pub action: String,

    /// Alternative names for the action.
    pub action_aliases: Vec<String>,

    /// The HTTP method of the operation.
    pub method: HttpMethod,

    /// The full request URL (server base plus path template).
    pub url: String,

    /// The path template, with shadowed parameter names already renamed.
    pub path: String,

    /// The operation summary.
    pub summary: String,

    /// The first sentence of the operation description.
    pub description: String,

    /// The documentation URL derived from the first tag and summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,

    /// The URL path parameters, in declaration order.
    pub params: Vec<UrlParam>,

    /// The CLI arguments of the operation.
    pub args: Vec<RequestArg>,

    /// Argument names that may take configured default values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_defaults: Option<Vec<String>>,

    /// The output model built from the `200` response, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_model: Option<ResponseModel>,
}

impl BakedOperation {
    /// Bakes one operation of a path item.
    #[allow(clippy::too_many_arguments, reason = "bake-time wiring of one operation")]
    pub(crate) fn bake<'a>(
        resolver: &Resolver<'a>,
        path: &str,
        path_item: &'a PathItem,
        method: HttpMethod,
        operation: &'a Operation,
        command: &str,
        action: &str,
        action_aliases: Vec<String>,
    ) -> Result<Self, BakeError> {
        let document = resolver.document();
        let server = operation
            .servers
            .as_ref()
            .and_then(|servers| servers.first())
            .map(|server| server.url.as_str())
            .or_else(|| document.base_url())
            .ok_or_else(|| BakeError::MissingServer {
                path: path.to_string(),
            })?;

        let summary = operation.summary.clone().unwrap_or_default();
        let description = request::first_sentence(operation.description.as_deref());
        let docs_url = docs_url(operation.tags.as_deref(), &summary);

        let response_model = response_model(resolver, operation)?;

        let args = match method {
            HttpMethod::Post | HttpMethod::Put => match operation
                .request_body
                .as_ref()
                .and_then(|body| body.media_schema(MEDIA_JSON))
            {
                Some(schema) => request::bake_args(resolver, resolver.schema(schema)?)?,
                None => Vec::new(),
            },
            // For list operations the arguments are the filterable fields of the
            // response model.
            HttpMethod::Get => match &response_model {
                Some(model) if model.is_paginated => request::filter_args(model),
                _ => Vec::new(),
            },
            HttpMethod::Delete => Vec::new(),
        };

        let mut params = url_params(resolver, path_item, operation)?;

        // A parameter name shadowed by an argument gets a trailing underscore in
        // both the parameter and the path template.
        let mut path = path.to_string();
        for param in &mut params {
            if args.iter().any(|arg| arg.path == param.name) {
                path = path.replace(
                    &format!("{{{}}}", param.name),
                    &format!("{{{}_}}", param.name),
                );
                param.name.push('_');
            }
        }

        Ok(Self {
            command: command.to_string(),
            action: action.to_string(),
            action_aliases,
            method,
            url: format!("{server}{path}"),
            path,
            summary,
            description,
            docs_url,
            params,
            args,
            allowed_defaults: allowed_defaults(operation),
            response_model,
        })
    }
}

fn response_model<'a>(
    resolver: &Resolver<'a>,
    operation: &'a Operation,
) -> Result<Option<ResponseModel>, BakeError> {
    let Some(response) = operation
        .responses
        .as_ref()
        .and_then(|responses| responses.get("200"))
    else {
        return Ok(None);
    };
    let Some(schema) = resolver.response(response)?.media_schema(MEDIA_JSON) else {
        return Ok(None);
    };
    let schema = resolver.schema(schema)?;
    Ok(Some(ResponseModel::bake(resolver, schema)?))
}

fn url_params<'a>(
    resolver: &Resolver<'a>,
    path_item: &'a PathItem,
    operation: &'a Operation,
) -> Result<Vec<UrlParam>, BakeError> {
    let mut params = Vec::new();
    let sources = [&path_item.parameters, &operation.parameters];
    for node in sources.into_iter().flatten().flat_map(|list| list.iter()) {
        let parameter = resolver.parameter(node)?;
        if parameter.location != ParameterIn::Path {
            continue;
        }
        let param_type = match &parameter.schema {
            Some(schema) => resolver.schema(schema)?.type_or_default(),
            None => SchemaType::String,
        };
        params.push(UrlParam {
            name: parameter.name.clone(),
            param_type,
        });
    }
    Ok(params)
}

/// Derives the documentation URL from the operation's first tag and summary,
/// both lowercased with non-letter characters stripped and spaces dashed.
fn docs_url(tags: Option<&[String]>, summary: &str) -> Option<String> {
    let tag = tags.and_then(|tags| tags.first())?;
    if summary.is_empty() {
        return None;
    }
    Some(format!(
        "https://www.linode.com/docs/api/{}/#{}",
        flatten_url_path(tag),
        flatten_url_path(summary)
    ))
}

fn flatten_url_path(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

fn allowed_defaults(operation: &Operation) -> Option<Vec<String>> {
    let serde_json::Value::Array(items) = operation.extension(ext::ALLOWED_DEFAULTS)? else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::to_string)
            .collect(),
    )
}
