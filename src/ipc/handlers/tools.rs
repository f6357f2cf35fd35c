use super::{call_endpoint, find_endpoint, EndpointKind, ENDPOINTS};
use crate::ipc::error::{ErrorKind, HandlerErr, HandlerResult, Reply};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_tools_list() -> HandlerResult {
    let tools: Vec<serde_json::Value> = ENDPOINTS
        .iter()
        .filter(|e| e.kind == EndpointKind::Tool)
        .map(|e| {
            json!({
                "name": e.name,
                "description": e.description,
                "arguments": e.arguments,
            })
        })
        .collect();
    Ok(Reply::ok(json!({ "tools": tools })))
}

fn handle_tools_call(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let name = get_required_str(params, "name")?;
    let Some(endpoint) = find_endpoint(&name).filter(|e| e.kind == EndpointKind::Tool) else {
        return Err(HandlerErr::new(
            ErrorKind::NotImplemented,
            format!("unknown tool: {}", name),
        ));
    };

    let empty = json!({});
    let args = match params.get("arguments") {
        None | Some(serde_json::Value::Null) => &empty,
        Some(v) if v.is_object() => v,
        Some(_) => return Err(HandlerErr::bad_params("arguments must be an object")),
    };
    call_endpoint(state, endpoint.name, args).unwrap_or_else(|| {
        Err(HandlerErr::new(
            ErrorKind::NotImplemented,
            format!("no handler for tool {}", endpoint.name),
        ))
    })
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "tools.list" => Some(handle_tools_list()),
        "tools.call" => Some(handle_tools_call(state, &req.params)),
        _ => None,
    }
}
