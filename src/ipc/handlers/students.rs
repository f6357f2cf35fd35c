use crate::ipc::error::{HandlerErr, HandlerResult, Reply};
use crate::ipc::helpers::{get_required_str, get_required_value, resolve_class_id};
use crate::ipc::types::AppState;
use crate::model::Student;
use serde_json::json;
use tracing::info;

fn handle_get_students(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    let Some(students) = state.store.find_students(&class_id)? else {
        return Err(HandlerErr::not_found("No students found"));
    };
    Ok(Reply::ok(json!({ "students": students })))
}

fn handle_get_student_by_roll(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let roll_number = get_required_str(params, "rollNumber")?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    let Some(student) = state.store.find_student_by_roll(&class_id, &roll_number)? else {
        return Err(HandlerErr::not_found("Student not found"));
    };
    Ok(Reply::ok(json!({ "student": student })))
}

fn handle_add_student(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let student = Student::from_value("student", get_required_value(params, "student")?)?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    if state
        .store
        .has_student_with_roll(&class_id, &student.roll_number)?
    {
        return Err(HandlerErr::conflict("Student exists"));
    }
    if state.store.push_student(&class_id, &student)? == 0 {
        return Err(HandlerErr::internal("Failed to add student"));
    }
    info!(class_id = %class_id, roll_number = %student.roll_number, "student added");
    Ok(Reply::ok(json!({ "message": "Student added" })))
}

fn handle_remove_student(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let name = get_required_str(params, "name")?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    if !state.store.has_student_named(&class_id, &name)? {
        return Err(HandlerErr::not_found("Student not found"));
    }
    if state.store.pull_students_named(&class_id, &name)? == 0 {
        return Err(HandlerErr::internal("Failed to remove student"));
    }
    info!(class_id = %class_id, name = %name, "student removed");
    Ok(Reply::ok(json!({ "message": "Student removed" })))
}

fn handle_update_student(state: &AppState, params: &serde_json::Value) -> HandlerResult {
    let class_name = get_required_str(params, "className")?;
    let name = get_required_str(params, "name")?;
    let data = Student::from_value("data", get_required_value(params, "data")?)?;
    let class_id = resolve_class_id(&state.store, &class_name)?;

    let Some(doc) = state.store.find_by_id(&class_id)? else {
        return Err(HandlerErr::not_found("Class not found"));
    };
    let Some(idx) = doc.group.students.iter().position(|s| s.name == name) else {
        return Err(HandlerErr::not_found("Student not found"));
    };
    let roll_taken = doc
        .group
        .students
        .iter()
        .enumerate()
        .any(|(i, s)| i != idx && s.roll_number == data.roll_number);
    if roll_taken {
        return Err(HandlerErr::conflict("Student exists"));
    }

    if state.store.set_student_named(&class_id, &name, &data)? == 0 {
        return Err(HandlerErr::no_change());
    }
    info!(class_id = %class_id, name = %name, "student updated");
    Ok(Reply::ok(json!({ "message": "Student updated" })))
}

pub fn try_handle(
    state: &AppState,
    endpoint: &str,
    params: &serde_json::Value,
) -> Option<HandlerResult> {
    match endpoint {
        "getStudents" => Some(handle_get_students(state, params)),
        "getStudentByRoll" => Some(handle_get_student_by_roll(state, params)),
        "addNewStudentByClassName" => Some(handle_add_student(state, params)),
        "removeStudentByClassName" => Some(handle_remove_student(state, params)),
        "updateStudentByClassName" => Some(handle_update_student(state, params)),
        _ => None,
    }
}
