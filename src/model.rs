use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid {field}: {source}")]
    Malformed {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must not be empty")]
    Empty(String),

    #[error("duplicate rollNumber in payload: {0}")]
    DuplicateRoll(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub roll_number: String,
    #[serde(default)]
    pub attendance: BTreeMap<String, bool>,
}

impl Student {
    /// Decode and check a student payload found under `params[field]`.
    pub fn from_value(field: &str, value: &serde_json::Value) -> Result<Self, ValidationError> {
        let student = Student::deserialize(value).map_err(|source| ValidationError::Malformed {
            field: field.to_string(),
            source,
        })?;
        student.validate()?;
        Ok(student)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("rollNumber", &self.roll_number)?;
        validate_session_keys(&self.attendance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGroup {
    pub class_name: String,
    pub branch: String,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl ClassGroup {
    pub fn from_value(field: &str, value: &serde_json::Value) -> Result<Self, ValidationError> {
        let group =
            ClassGroup::deserialize(value).map_err(|source| ValidationError::Malformed {
                field: field.to_string(),
                source,
            })?;
        group.validate()?;
        Ok(group)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("className", &self.class_name)?;
        require_non_empty("branch", &self.branch)?;
        let mut seen: HashSet<&str> = HashSet::new();
        for s in &self.students {
            s.validate()?;
            if !seen.insert(s.roll_number.as_str()) {
                return Err(ValidationError::DuplicateRoll(s.roll_number.clone()));
            }
        }
        Ok(())
    }

    /// Store key assigned at creation. It is not recomputed when the class is
    /// later renamed.
    pub fn identifier(&self) -> String {
        format!("{}-{}", self.class_name, self.branch)
    }

    pub fn student_by_roll(&self, roll_number: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.roll_number == roll_number)
    }

    pub fn student_by_name(&self, name: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.name == name)
    }
}

/// A persisted class: the store identifier plus the class fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDocument {
    pub id: String,
    #[serde(flatten)]
    pub group: ClassGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: String,
    pub class_name: String,
    pub branch: String,
}

/// Decode a session-key → present map for an attendance update.
pub fn parse_attendance(
    field: &str,
    value: &serde_json::Value,
) -> Result<BTreeMap<String, bool>, ValidationError> {
    let attendance = BTreeMap::<String, bool>::deserialize(value).map_err(|source| {
        ValidationError::Malformed {
            field: field.to_string(),
            source,
        }
    })?;
    if attendance.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    validate_session_keys(&attendance)?;
    Ok(attendance)
}

fn validate_session_keys(attendance: &BTreeMap<String, bool>) -> Result<(), ValidationError> {
    if attendance.keys().any(|k| k.trim().is_empty()) {
        return Err(ValidationError::Empty("attendance session key".to_string()));
    }
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    Ok(())
}
