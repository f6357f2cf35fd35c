pub mod attendance;
pub mod classes;
pub mod core;
pub mod resources;
pub mod students;
pub mod tools;

use crate::ipc::error::HandlerResult;
use crate::ipc::types::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// Read-only, addressed by a `class://` URI template.
    Resource { uri_template: &'static str },
    Tool,
}

#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub name: &'static str,
    pub kind: EndpointKind,
    pub description: &'static str,
    /// Required argument names. For resources these line up with the URI
    /// template's path placeholders.
    pub arguments: &'static [&'static str],
}

pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        name: "getClassByName",
        kind: EndpointKind::Resource {
            uri_template: "class://getClassByName/{class_name}",
        },
        description: "Get class details by class name.",
        arguments: &["className"],
    },
    Endpoint {
        name: "getAll",
        kind: EndpointKind::Resource {
            uri_template: "class://getAll",
        },
        description: "Get all classes.",
        arguments: &[],
    },
    Endpoint {
        name: "getStudents",
        kind: EndpointKind::Resource {
            uri_template: "class://getStudents/{class_name}",
        },
        description: "Get all students in a class.",
        arguments: &["className"],
    },
    Endpoint {
        name: "getStudentByRoll",
        kind: EndpointKind::Resource {
            uri_template: "class://getStudentByRoll/{class_name}/{registration_number}",
        },
        description: "Get student details by roll number.",
        arguments: &["className", "rollNumber"],
    },
    Endpoint {
        name: "createClass",
        kind: EndpointKind::Tool,
        description: "Create a new class.",
        arguments: &["data"],
    },
    Endpoint {
        name: "updateClassWithClassName",
        kind: EndpointKind::Tool,
        description: "Update class details by class name.",
        arguments: &["className", "data"],
    },
    Endpoint {
        name: "deleteClassWithClassName",
        kind: EndpointKind::Tool,
        description: "Delete a class by class name.",
        arguments: &["className"],
    },
    Endpoint {
        name: "addNewStudentByClassName",
        kind: EndpointKind::Tool,
        description: "Add a new student to a class by class name.",
        arguments: &["className", "student"],
    },
    Endpoint {
        name: "removeStudentByClassName",
        kind: EndpointKind::Tool,
        description: "Remove a student from a class by class name.",
        arguments: &["className", "name"],
    },
    Endpoint {
        name: "updateStudentByClassName",
        kind: EndpointKind::Tool,
        description: "Update a student's details in a class by class name.",
        arguments: &["className", "name", "data"],
    },
    Endpoint {
        name: "getAttendanceByClassName",
        kind: EndpointKind::Tool,
        description: "Get attendance for all students in a class by class name.",
        arguments: &["className"],
    },
    Endpoint {
        name: "getAttendanceByClassNameAndRollNumber",
        kind: EndpointKind::Tool,
        description: "Get attendance for a student by class name and roll number.",
        arguments: &["className", "rollNumber"],
    },
    Endpoint {
        name: "updateAttendanceByClassNameAndRollNumber",
        kind: EndpointKind::Tool,
        description: "Update attendance for a student by class name and roll number.",
        arguments: &["className", "rollNumber", "attendance"],
    },
];

pub fn find_endpoint(name: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().find(|e| e.name == name)
}

/// Run the endpoint called `name`, or `None` if no handler owns that name.
pub fn call_endpoint(
    state: &AppState,
    name: &str,
    params: &serde_json::Value,
) -> Option<HandlerResult> {
    if let Some(res) = classes::try_handle(state, name, params) {
        return Some(res);
    }
    if let Some(res) = students::try_handle(state, name, params) {
        return Some(res);
    }
    attendance::try_handle(state, name, params)
}
