//! JSON-RPC 2.0 message shapes

use serde_json::{json, Value};

use super::LspError;

/// Error object of a failed response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
}

/// A message received from the server
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// `id` + `result`/`error`, no `method`
    Response {
        id: Value,
        result: Result<Value, ResponseError>,
    },
    /// `method`, no `id`
    Notification { method: String, params: Value },
    /// `id` + `method`: the server asks us something
    Request {
        id: Value,
        method: String,
        params: Value,
    },
}

impl Inbound {
    pub fn classify(mut value: Value) -> Result<Self, LspError> {
        let Some(obj) = value.as_object_mut() else {
            return Err(LspError::Protocol("message is not an object".into()));
        };
        let id = obj.remove("id");
        let method = obj
            .remove("method")
            .and_then(|m| m.as_str().map(str::to_string));
        let params = obj.remove("params").unwrap_or(Value::Null);

        match (id, method) {
            (Some(id), Some(method)) => Ok(Inbound::Request { id, method, params }),
            (None, Some(method)) => Ok(Inbound::Notification { method, params }),
            (Some(id), None) => {
                let result = match obj.remove("error") {
                    Some(err) => Err(ResponseError {
                        code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
                        message: err
                            .get("message")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    }),
                    None => Ok(obj.remove("result").unwrap_or(Value::Null)),
                };
                Ok(Inbound::Response { id, result })
            }
            (None, None) => Err(LspError::Protocol("message has neither id nor method".into())),
        }
    }
}

pub fn request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

pub fn notification(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
    })
}

/// Successful reply to a server-initiated request
pub fn response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}
