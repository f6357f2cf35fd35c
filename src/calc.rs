use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::Student;

/// Share of sessions marked present, as a percentage in `0.0..=100.0`.
///
/// An empty register yields `0.0` rather than dividing by zero. The ratio is
/// not rounded.
pub fn attendance_percentage(attendance: &BTreeMap<String, bool>) -> f64 {
    let total = attendance.len();
    if total == 0 {
        return 0.0;
    }
    let attended = attendance.values().filter(|present| **present).count();
    (attended as f64) / (total as f64) * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub name: String,
    pub roll_number: String,
    pub attendance_percentage: f64,
}

impl AttendanceRecord {
    pub fn for_student(student: &Student) -> Self {
        AttendanceRecord {
            name: student.name.clone(),
            roll_number: student.roll_number.clone(),
            attendance_percentage: attendance_percentage(&student.attendance),
        }
    }
}
