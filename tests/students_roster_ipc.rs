use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_attendanced");
    let mut child = Command::new(exe)
        .env("ATTENDANCE_STORE_URI", ":memory:")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn attendanced");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn assert_err(value: &serde_json::Value, status: u64, message: &str) {
    assert_eq!(value["ok"], false, "expected failure, got {}", value);
    assert_eq!(value["status"].as_u64(), Some(status), "{}", value);
    assert_eq!(value["error"]["message"].as_str(), Some(message), "{}", value);
}

fn create_10a(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) {
    let created = request(
        stdin,
        reader,
        "setup",
        "createClass",
        json!({ "data": {
            "className": "10A",
            "branch": "Science",
            "students": [{ "name": "Amy", "rollNumber": "R1", "attendance": {} }]
        }}),
    );
    assert_eq!(created["status"], 201, "{}", created);
}

#[test]
fn new_class_lists_its_single_student() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    create_10a(&mut stdin, &mut reader);

    let students = request(
        &mut stdin,
        &mut reader,
        "1",
        "getStudents",
        json!({ "className": "10A" }),
    );
    assert_eq!(
        students["result"]["students"],
        json!([{ "name": "Amy", "rollNumber": "R1", "attendance": {} }])
    );
}

#[test]
fn add_student_rejects_duplicate_roll_and_accepts_new_one() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    create_10a(&mut stdin, &mut reader);

    let dup = request(
        &mut stdin,
        &mut reader,
        "1",
        "addNewStudentByClassName",
        json!({
            "className": "10A",
            "student": { "name": "Another Amy", "rollNumber": "R1", "attendance": {} }
        }),
    );
    assert_err(&dup, 400, "Student exists");

    let added = request(
        &mut stdin,
        &mut reader,
        "2",
        "addNewStudentByClassName",
        json!({
            "className": "10A",
            "student": { "name": "Bo", "rollNumber": "R2", "attendance": { "d1": true } }
        }),
    );
    assert_eq!(added["result"]["message"], "Student added");

    let bo = request(
        &mut stdin,
        &mut reader,
        "3",
        "getStudentByRoll",
        json!({ "className": "10A", "rollNumber": "R2" }),
    );
    assert_eq!(
        bo["result"]["student"],
        json!({ "name": "Bo", "rollNumber": "R2", "attendance": { "d1": true } })
    );

    let no_class = request(
        &mut stdin,
        &mut reader,
        "4",
        "addNewStudentByClassName",
        json!({
            "className": "Nope",
            "student": { "name": "Cy", "rollNumber": "R3" }
        }),
    );
    assert_err(&no_class, 404, "Class not found");

    let bad = request(
        &mut stdin,
        &mut reader,
        "5",
        "addNewStudentByClassName",
        json!({ "className": "10A", "student": { "name": "Cy" } }),
    );
    assert_eq!(bad["error"]["code"], "bad_params");

    let students = request(
        &mut stdin,
        &mut reader,
        "6",
        "getStudents",
        json!({ "className": "10A" }),
    );
    assert_eq!(students["result"]["students"].as_array().map(|a| a.len()), Some(2));
}

#[test]
fn removed_student_is_no_longer_found_by_roll() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    create_10a(&mut stdin, &mut reader);

    let missing = request(
        &mut stdin,
        &mut reader,
        "1",
        "removeStudentByClassName",
        json!({ "className": "10A", "name": "Zed" }),
    );
    assert_err(&missing, 404, "Student not found");

    let removed = request(
        &mut stdin,
        &mut reader,
        "2",
        "removeStudentByClassName",
        json!({ "className": "10A", "name": "Amy" }),
    );
    assert_eq!(removed["result"]["message"], "Student removed");

    let gone = request(
        &mut stdin,
        &mut reader,
        "3",
        "getStudentByRoll",
        json!({ "className": "10A", "rollNumber": "R1" }),
    );
    assert_err(&gone, 404, "Student not found");

    // The class survives with an empty roster.
    let students = request(
        &mut stdin,
        &mut reader,
        "4",
        "getStudents",
        json!({ "className": "10A" }),
    );
    assert_eq!(students["result"]["students"], json!([]));
}

#[test]
fn update_student_replaces_the_named_entry() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    create_10a(&mut stdin, &mut reader);
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "addNewStudentByClassName",
        json!({ "className": "10A", "student": { "name": "Bo", "rollNumber": "R2" } }),
    );

    let same = request(
        &mut stdin,
        &mut reader,
        "2",
        "updateStudentByClassName",
        json!({
            "className": "10A",
            "name": "Amy",
            "data": { "name": "Amy", "rollNumber": "R1", "attendance": {} }
        }),
    );
    assert_err(&same, 404, "No changes made");

    let steal_roll = request(
        &mut stdin,
        &mut reader,
        "3",
        "updateStudentByClassName",
        json!({
            "className": "10A",
            "name": "Amy",
            "data": { "name": "Amy", "rollNumber": "R2" }
        }),
    );
    assert_err(&steal_roll, 400, "Student exists");

    let unknown = request(
        &mut stdin,
        &mut reader,
        "4",
        "updateStudentByClassName",
        json!({
            "className": "10A",
            "name": "Zed",
            "data": { "name": "Zed", "rollNumber": "R9" }
        }),
    );
    assert_err(&unknown, 404, "Student not found");

    let updated = request(
        &mut stdin,
        &mut reader,
        "5",
        "updateStudentByClassName",
        json!({
            "className": "10A",
            "name": "Amy",
            "data": { "name": "Amy Lee", "rollNumber": "R1", "attendance": { "d1": false } }
        }),
    );
    assert_eq!(updated["result"]["message"], "Student updated");

    let amy = request(
        &mut stdin,
        &mut reader,
        "6",
        "resources.read",
        json!({ "uri": "class://getStudentByRoll/10A/R1" }),
    );
    assert_eq!(amy["result"]["student"]["name"], "Amy Lee");
    assert_eq!(amy["result"]["student"]["attendance"], json!({ "d1": false }));
}
