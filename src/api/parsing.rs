use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};

use crate::errors::BridgeError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// HTTP method of a proxy event, from the v2 `requestContext` or the v1
/// top-level `httpMethod`.
pub fn http_method(payload: &Value) -> Option<&str> {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
}

/// Query string parameters, or `None` when absent, null or empty.
pub fn query_params(payload: &Value) -> Option<&Map<String, Value>> {
    payload
        .get("queryStringParameters")
        .and_then(Value::as_object)
        .filter(|params| !params.is_empty())
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Raw request body bytes, undoing API Gateway's base64 wrapping when
/// `isBase64Encoded` is set. A missing body is empty.
///
/// # Errors
///
/// Returns an error if the body is flagged as base64 but does not decode.
pub fn raw_body(payload: &Value) -> Result<Vec<u8>, BridgeError> {
    let body = payload.get("body").and_then(Value::as_str).unwrap_or("");
    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if is_base64 {
        Ok(STANDARD.decode(body)?)
    } else {
        Ok(body.as_bytes().to_vec())
    }
}
