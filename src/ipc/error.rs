use crate::model::ValidationError;
use crate::store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadJson,
    BadParams,
    Conflict,
    NotFound,
    NoChange,
    NotImplemented,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::BadJson => "bad_json",
            ErrorKind::BadParams => "bad_params",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::NoChange => "no_change",
            ErrorKind::NotImplemented => "not_implemented",
            ErrorKind::Internal => "internal",
        }
    }

    pub fn status(self) -> u16 {
        match self {
            ErrorKind::BadJson | ErrorKind::BadParams | ErrorKind::Conflict => 400,
            ErrorKind::NotFound | ErrorKind::NoChange | ErrorKind::NotImplemented => 404,
            ErrorKind::Internal => 500,
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerErr {
    pub kind: ErrorKind,
    pub message: String,
}

impl HandlerErr {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        HandlerErr {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadParams, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn no_change() -> Self {
        Self::new(ErrorKind::NoChange, "No changes made")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn response(&self, id: &str) -> serde_json::Value {
        err(id, self.kind, &self.message)
    }
}

// Any store failure leaves the handler as a 500 carrying the raw description.
impl From<StoreError> for HandlerErr {
    fn from(e: StoreError) -> Self {
        HandlerErr::internal(e.to_string())
    }
}

impl From<ValidationError> for HandlerErr {
    fn from(e: ValidationError) -> Self {
        HandlerErr::bad_params(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Reply { status: 200, body }
    }

    pub fn created(body: serde_json::Value) -> Self {
        Reply { status: 201, body }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        ok(id, self.status, self.body)
    }
}

pub type HandlerResult = Result<Reply, HandlerErr>;

pub fn ok(id: &str, status: u16, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "status": status,
        "result": result
    })
}

pub fn err(id: &str, kind: ErrorKind, message: impl Into<String>) -> serde_json::Value {
    json!({
        "id": id,
        "ok": false,
        "status": kind.status(),
        "error": {
            "code": kind.code(),
            "message": message.into(),
        },
    })
}

/// Response for a line that is not a valid request. There is no id to echo.
pub fn malformed_line(message: impl Into<String>) -> serde_json::Value {
    err("", ErrorKind::BadJson, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(ErrorKind::NotFound.status(), 404);
        assert_eq!(ErrorKind::NoChange.status(), 404);
        assert_eq!(ErrorKind::Conflict.status(), 400);
        assert_eq!(ErrorKind::BadParams.status(), 400);
        assert_eq!(ErrorKind::Internal.status(), 500);
    }

    #[test]
    fn error_response_shape() {
        let v = HandlerErr::not_found("Class not found").response("7");
        assert_eq!(
            v,
            json!({
                "id": "7",
                "ok": false,
                "status": 404,
                "error": { "code": "not_found", "message": "Class not found" }
            })
        );
    }

    #[test]
    fn store_errors_become_internal_with_description() {
        let store_err = StoreError::Database(rusqlite::Error::InvalidQuery);
        let e: HandlerErr = store_err.into();
        assert_eq!(e.kind, ErrorKind::Internal);
        assert!(e.message.starts_with("database error:"));
    }

    #[test]
    fn created_reply_carries_201() {
        let v = Reply::created(json!({ "message": "Class created" })).response("1");
        assert_eq!(v["status"], 201);
        assert_eq!(v["ok"], true);
        assert_eq!(v["result"]["message"], "Class created");
    }
}
