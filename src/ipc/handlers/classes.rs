use crate::ipc::error::{HandlerErr, HandlerResult, Reply};
use crate::ipc::helpers::{get_required_str, get_required_value, resolve_class_id};
use crate::ipc::types::AppState;
use crate::model::{ClassDocument, ClassGroup};
use serde_json::json;
use tracing::info;

fn handle_get_class_by_name(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let Some(doc) = state.store.find_by_class_name(&class_name)? else {
        return Err(HandlerErr::not_found("Class not found"));
    };
    Ok(Reply::ok(json!({ "class": doc })))
}

fn handle_get_all(state: &AppState) -> HandlerResult {
    let classes = state.store.find_all()?;
    // An empty collection is reported as not found rather than an empty list.
    if classes.is_empty() {
        return Err(HandlerErr::not_found("No classes found"));
    }
    Ok(Reply::ok(json!({ "classes": classes })))
}

fn handle_create_class(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let data = ClassGroup::from_value("data", get_required_value(params, "data")?)?;

    if state.store.find_id_by_class_name(&data.class_name)?.is_some() {
        return Err(HandlerErr::conflict("Class already exists"));
    }
    // A renamed class keeps its original identifier, so the name check alone
    // does not rule out a key collision.
    let id = data.identifier();
    if state.store.find_by_id(&id)?.is_some() {
        return Err(HandlerErr::conflict("Class already exists"));
    }

    let class_id = state.store.insert(&ClassDocument { id, group: data })?;
    info!(class_id = %class_id, "class created");
    Ok(Reply::created(json!({
        "message": "Class created",
        "class_id": class_id
    })))
}

fn handle_update_class(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let data = ClassGroup::from_value("data", get_required_value(params, "data")?)?;

    let class_id = resolve_class_id(&state.store, &class_name)?;
    if data.class_name != class_name {
        if let Some(other) = state.store.find_id_by_class_name(&data.class_name)? {
            if other != class_id {
                return Err(HandlerErr::conflict("Class already exists"));
            }
        }
    }

    if state.store.replace_fields(&class_id, &data)? == 0 {
        return Err(HandlerErr::no_change());
    }
    info!(class_id = %class_id, "class updated");
    Ok(Reply::ok(json!({ "message": "Class updated" })))
}

fn handle_delete_class(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    if state.store.delete(&class_id)? == 0 {
        return Err(HandlerErr::not_found("Class not found"));
    }
    info!(class_id = %class_id, "class deleted");
    Ok(Reply::ok(json!({ "message": "Class deleted" })))
}

pub fn try_handle(
    state: &AppState,
    endpoint: &str,
    params: &serde_json::Value,
) -> Option<HandlerResult> {
    match endpoint {
        "getClassByName" => Some(handle_get_class_by_name(state, params)),
        "getAll" => Some(handle_get_all(state)),
        "createClass" => Some(handle_create_class(state, params)),
        "updateClassWithClassName" => Some(handle_update_class(state, params)),
        "deleteClassWithClassName" => Some(handle_delete_class(state, params)),
        _ => None,
    }
}
