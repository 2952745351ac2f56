use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const STUDIONET_CHAIN_ID: u64 = 61999;
pub const STUDIONET_RPC_URL: &str = "https://studio.genlayer.com/api";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Network definition handed to the wallet when switching or adding a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSpec {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
}

impl ChainSpec {
    pub fn studionet() -> Self {
        Self {
            chain_id: STUDIONET_CHAIN_ID,
            chain_name: "GenLayer StudioNet".to_string(),
            rpc_urls: vec![STUDIONET_RPC_URL.to_string()],
            native_currency: NativeCurrency {
                name: "GEN".to_string(),
                symbol: "GEN".to_string(),
                decimals: 18,
            },
        }
    }

    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    pub fn switch_params(&self) -> Value {
        json!([{ "chainId": self.chain_id_hex() }])
    }

    pub fn add_params(&self) -> Value {
        json!([{
            "chainId": self.chain_id_hex(),
            "chainName": self.chain_name,
            "rpcUrls": self.rpc_urls,
            "nativeCurrency": self.native_currency,
        }])
    }
}

impl Default for ChainSpec {
    fn default() -> Self {
        Self::studionet()
    }
}
