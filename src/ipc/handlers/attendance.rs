use crate::calc::AttendanceRecord;
use crate::ipc::error::{HandlerErr, HandlerResult, Reply};
use crate::ipc::helpers::{get_required_str, get_required_value, resolve_class_id};
use crate::ipc::types::AppState;
use crate::model::parse_attendance;
use serde_json::json;
use tracing::info;

fn attendance_for_class(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    let Some(students) = state.store.find_students(&class_id)? else {
        return Err(HandlerErr::not_found("No students found"));
    };
    let records: Vec<AttendanceRecord> =
        students.iter().map(AttendanceRecord::for_student).collect();
    Ok(Reply::ok(json!({ "attendance": records })))
}

fn attendance_for_student(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let roll_number = get_required_str(params, "rollNumber")?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    let Some(student) = state.store.find_student_by_roll(&class_id, &roll_number)? else {
        return Err(HandlerErr::not_found("Student not found"));
    };
    // Wrapped under the same key as the class-wide list, not returned flat.
    Ok(Reply::ok(json!({
        "attendance": AttendanceRecord::for_student(&student)
    })))
}

fn attendance_update(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let roll_number = get_required_str(params, "rollNumber")?;
    let entries = parse_attendance("attendance", get_required_value(params, "attendance")?)?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    // An unknown roll number matches no student, which surfaces as "no changes".
    let modified = state
        .store
        .set_attendance(&class_id, &roll_number, &entries)?;
    if modified == 0 {
        return Err(HandlerErr::no_change());
    }
    info!(
        class_id = %class_id,
        roll_number = %roll_number,
        sessions = entries.len(),
        "attendance updated"
    );
    Ok(Reply::ok(json!({ "message": "Attendance updated" })))
}

pub fn try_handle(
    state: &AppState,
    endpoint: &str,
    params: &serde_json::Value,
) -> Option<HandlerResult> {
    match endpoint {
        "getAttendanceByClassName" => Some(attendance_for_class(state, params)),
        "getAttendanceByClassNameAndRollNumber" => Some(attendance_for_student(state, params)),
        "updateAttendanceByClassNameAndRollNumber" => Some(attendance_update(state, params)),
        _ => None,
    }
}
