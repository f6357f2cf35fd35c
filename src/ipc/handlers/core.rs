use crate::ipc::error::{HandlerResult, Reply};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &AppState) -> HandlerResult {
    Ok(Reply::ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store.location().describe()
    })))
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "health" => Some(handle_health(state)),
        _ => None,
    }
}
