use crate::store::ClassStore;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Per-process state. The store is opened before the first request and
/// closed when this is dropped.
pub struct AppState {
    pub store: ClassStore,
}
