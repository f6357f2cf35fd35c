use super::{call_endpoint, Endpoint, EndpointKind, ENDPOINTS};
use crate::ipc::error::{ErrorKind, HandlerErr, HandlerResult, Reply};
use crate::ipc::helpers::{get_required_str, percent_decode};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use tracing::debug;

const SCHEME: &str = "class://";

/// Match a `class://<endpoint>/<segment>...` URI against the resource
/// templates and turn its path segments into named arguments.
pub fn parse_resource_uri(
    uri: &str,
) -> Result<(&'static Endpoint, serde_json::Value), HandlerErr> {
    let Some(path) = uri.strip_prefix(SCHEME) else {
        return Err(HandlerErr::bad_params(format!(
            "unsupported resource uri: {}",
            uri
        )));
    };
    let mut parts = path.split('/');
    let name = parts.next().unwrap_or_default();
    let segments: Vec<String> = parts.map(percent_decode).collect();

    let Some((endpoint, template)) = ENDPOINTS.iter().find_map(|e| match e.kind {
        EndpointKind::Resource { uri_template } if e.name == name => Some((e, uri_template)),
        _ => None,
    }) else {
        return Err(HandlerErr::new(
            ErrorKind::NotImplemented,
            format!("unknown resource: {}", uri),
        ));
    };

    if segments.len() != endpoint.arguments.len() || segments.iter().any(|s| s.is_empty()) {
        return Err(HandlerErr::bad_params(format!(
            "resource uri must match {}",
            template
        )));
    }

    let mut args = serde_json::Map::new();
    for (key, value) in endpoint.arguments.iter().zip(segments) {
        args.insert(key.to_string(), serde_json::Value::String(value));
    }
    Ok((endpoint, serde_json::Value::Object(args)))
}

fn handle_resources_list() -> HandlerResult {
    let resources: Vec<serde_json::Value> = ENDPOINTS
        .iter()
        .filter_map(|e| match e.kind {
            EndpointKind::Resource { uri_template } => Some(json!({
                "name": e.name,
                "uriTemplate": uri_template,
                "description": e.description,
            })),
            EndpointKind::Tool => None,
        })
        .collect();
    Ok(Reply::ok(json!({ "resources": resources })))
}

fn handle_resources_read(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let uri = get_required_str(params, "uri")?;
    let (endpoint, args) = parse_resource_uri(&uri)?;
    debug!(endpoint = endpoint.name, "resource resolved");
    call_endpoint(state, endpoint.name, &args).unwrap_or_else(|| {
        Err(HandlerErr::new(
            ErrorKind::NotImplemented,
            format!("no handler for resource {}", endpoint.name),
        ))
    })
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "resources.list" => Some(handle_resources_list()),
        "resources.read" => Some(handle_resources_read(state, &req.params)),
        _ => None,
    }
}
