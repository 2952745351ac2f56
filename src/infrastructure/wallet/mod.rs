use crate::domain::error::AppError;
use crate::infrastructure::rpc::{JsonRpcClient, RpcCallError};
use async_trait::async_trait;
use serde_json::Value;

/// Provider error code for a request the user declined.
pub const USER_REJECTED: i64 = 4001;
/// Provider error code for a chain the wallet does not know yet.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// Maps a provider failure that has no more specific meaning to an `AppError`.
/// An unreachable provider is always `WalletUnavailable`.
pub fn wallet_error(err: RpcCallError) -> AppError {
    match err {
        RpcCallError::Unreachable(msg) => {
            AppError::WalletUnavailable(format!("Wallet provider is not reachable: {}", msg))
        }
        other => other.into(),
    }
}

/// EIP-1193 style wallet: one `request` entry point, provider error codes preserved.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcCallError>;
}

/// Wallet reached through its local JSON-RPC port.
pub struct HttpWalletProvider {
    rpc: JsonRpcClient,
}

impl HttpWalletProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            rpc: JsonRpcClient::new(endpoint),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.rpc.endpoint()
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcCallError> {
        self.rpc.call(method, params).await
    }
}
