use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::{err, ErrorKind, HandlerResult};
use tracing::{debug, info_span, warn};

fn route(state: &AppState, req: &Request) -> Option<HandlerResult> {
    if let Some(res) = handlers::core::try_handle(state, req) {
        return Some(res);
    }
    if let Some(res) = handlers::resources::try_handle(state, req) {
        return Some(res);
    }
    if let Some(res) = handlers::tools::try_handle(state, req) {
        return Some(res);
    }
    // Endpoints can also be called directly by name.
    handlers::call_endpoint(state, &req.method, &req.params)
}

pub fn handle_request(state: &AppState, req: Request) -> serde_json::Value {
    let span = info_span!("request", id = %req.id, method = %req.method);
    let _guard = span.enter();

    match route(state, &req) {
        Some(Ok(reply)) => {
            debug!(status = reply.status, "handled");
            reply.response(&req.id)
        }
        Some(Err(e)) => {
            if e.kind == ErrorKind::Internal {
                warn!(error = %e, "request failed");
            } else {
                debug!(code = e.kind.code(), error = %e, "request rejected");
            }
            e.response(&req.id)
        }
        None => {
            debug!("unknown method");
            err(
                &req.id,
                ErrorKind::NotImplemented,
                format!("unknown method: {}", req.method),
            )
        }
    }
}
