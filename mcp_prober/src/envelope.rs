use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const JSONRPC_VERSION: &str = "2.0";

/// Error code carried by envelopes the prober synthesizes itself when a call
/// never produced a usable server response.
pub const LOCAL_ERROR_CODE: i64 = -32000;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const CLIENT_NAME: &str = "mcp-prober";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Null when the server could not tell which request it was answering.
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Builds the error envelope used in place of a server reply.
    pub fn local_error(id: u64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::from(id),
            result: None,
            error: Some(JsonRpcError {
                code: LOCAL_ERROR_CODE,
                message: message.into(),
                data: None,
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// True when this response carries the request's correlation id.
    pub fn echoes(&self, request: &JsonRpcRequest) -> bool {
        self.id == Value::from(request.id)
    }
}

pub fn initialize_request(id: u64) -> JsonRpcRequest {
    JsonRpcRequest::new(
        id,
        "initialize",
        Some(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "roots": { "listChanged": true },
                "sampling": {}
            },
            "clientInfo": {
                "name": CLIENT_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })),
    )
}

/// The four calls every probe run issues, numbered from 1.
pub fn standard_calls(tool_name: &str, tool_text: &str) -> Vec<JsonRpcRequest> {
    vec![
        initialize_request(1),
        JsonRpcRequest::new(2, "tools/list", None),
        JsonRpcRequest::new(3, "resources/list", None),
        JsonRpcRequest::new(
            4,
            "tools/call",
            Some(json!({
                "name": tool_name,
                "arguments": { "text": tool_text }
            })),
        ),
    ]
}
