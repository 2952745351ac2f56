use crate::domain::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// JSON-RPC error object, as returned by nodes and EIP-1193 providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcFailure {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RpcCallError {
    /// The endpoint answered with a JSON-RPC error object.
    Remote(RpcFailure),
    /// Nothing is listening at the endpoint.
    Unreachable(String),
    Transport(String),
}

impl RpcCallError {
    pub fn code(&self) -> Option<i64> {
        match self {
            RpcCallError::Remote(failure) => Some(failure.code),
            _ => None,
        }
    }
}

impl fmt::Display for RpcCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCallError::Remote(failure) => {
                write!(f, "{} (code {})", failure.message, failure.code)
            }
            RpcCallError::Unreachable(msg) => write!(f, "Endpoint unreachable: {}", msg),
            RpcCallError::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RpcCallError {}

impl From<RpcCallError> for AppError {
    fn from(err: RpcCallError) -> Self {
        AppError::RpcError(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcFailure>,
}

pub struct JsonRpcClient {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcCallError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(endpoint = %self.endpoint, method, id, "Sending JSON-RPC request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RpcCallError::Unreachable(format!("{}: {}", self.endpoint, e))
                } else {
                    RpcCallError::Transport(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RpcCallError::Transport(format!("Failed to read response: {}", e)))?;

        // Some nodes pair an HTTP error status with a well-formed error object.
        let parsed: Option<JsonRpcResponse> = serde_json::from_str(&text).ok();
        match parsed {
            Some(JsonRpcResponse {
                error: Some(failure),
                ..
            }) => Err(RpcCallError::Remote(failure)),
            Some(JsonRpcResponse { result, .. }) if status.is_success() => {
                Ok(result.unwrap_or(Value::Null))
            }
            _ if !status.is_success() => Err(RpcCallError::Transport(format!(
                "API error ({}): {}",
                status, text
            ))),
            _ => Err(RpcCallError::Transport(format!(
                "Invalid JSON-RPC response: {}",
                text
            ))),
        }
    }
}
