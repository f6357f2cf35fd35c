use crate::ipc::error::HandlerErr;
use crate::store::ClassStore;

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_required_value<'a>(
    params: &'a serde_json::Value,
    key: &str,
) -> Result<&'a serde_json::Value, HandlerErr> {
    match params.get(key) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(HandlerErr::bad_params(format!("missing {}", key))),
    }
}

/// Look up the store identifier of the class called `class_name`.
///
/// Handlers call this before touching an existing class and return its
/// not-found error unchanged.
pub fn resolve_class_id(store: &ClassStore, class_name: &str) -> Result<String, HandlerErr> {
    store
        .find_id_by_class_name(class_name)?
        .ok_or_else(|| HandlerErr::not_found("Class not found"))
}

pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let h1 = bytes[i + 1] as char;
            let h2 = bytes[i + 2] as char;
            if let (Some(a), Some(b)) = (h1.to_digit(16), h2.to_digit(16)) {
                out.push(((a << 4) + b) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).to_string()
}
