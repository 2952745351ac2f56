pub mod calldata;
pub mod transaction;

use crate::domain::address::{Address, TxHash};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::rpc::JsonRpcClient;
use crate::infrastructure::wallet::{wallet_error, WalletProvider};
use async_trait::async_trait;
use calldata::{decode_result, method_call};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const CONSENSUS_CONTRACT_NAME: &str = "ConsensusMain";
const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Validator settings passed with every `addTransaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    pub initial_validators: u64,
    pub max_rotations: u64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            initial_validators: 5,
            max_rotations: 3,
        }
    }
}

/// Named-procedure access to the Verdict Registry contract.
#[async_trait]
pub trait ContractRpc: Send + Sync {
    /// Fails with `ConfigError` when no contract address is configured.
    fn ensure_configured(&self) -> Result<()>;

    async fn read_contract(&self, function: &str, args: Vec<Value>) -> Result<Value>;

    async fn write_contract(
        &self,
        account: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<TxHash>;
}

pub struct GenLayerClient {
    rpc: JsonRpcClient,
    wallet: Option<Arc<dyn WalletProvider>>,
    contract_address: Option<Address>,
    consensus: ConsensusConfig,
    consensus_address: OnceCell<Address>,
}

impl GenLayerClient {
    pub fn new(
        rpc: JsonRpcClient,
        wallet: Option<Arc<dyn WalletProvider>>,
        contract_address: Option<Address>,
        consensus: ConsensusConfig,
    ) -> Self {
        Self {
            rpc,
            wallet,
            contract_address,
            consensus,
            consensus_address: OnceCell::new(),
        }
    }

    fn contract_address(&self) -> Result<&Address> {
        self.contract_address.as_ref().ok_or_else(|| {
            AppError::ConfigError(
                "VERDICT_CONTRACT_ADDRESS is not set. Please add it to your environment variables."
                    .to_string(),
            )
        })
    }

    /// Looked up on first use and reused for the rest of the process.
    async fn consensus_address(&self) -> Result<&Address> {
        self.consensus_address
            .get_or_try_init(|| async {
                let response = self
                    .rpc
                    .call("sim_getConsensusContract", json!([CONSENSUS_CONTRACT_NAME]))
                    .await?;
                let raw = response
                    .get("address")
                    .and_then(Value::as_str)
                    .or_else(|| response.as_str())
                    .ok_or_else(|| {
                        AppError::ParseError(format!(
                            "Unexpected consensus contract response: {}",
                            response
                        ))
                    })?;
                let address = Address::parse(raw)?;
                info!(consensus = %address, endpoint = %self.rpc.endpoint(), "Consensus contract initialized");
                Ok::<_, AppError>(address)
            })
            .await
    }
}

#[async_trait]
impl ContractRpc for GenLayerClient {
    fn ensure_configured(&self) -> Result<()> {
        self.contract_address().map(|_| ())
    }

    async fn read_contract(&self, function: &str, args: Vec<Value>) -> Result<Value> {
        let contract = self.contract_address()?;
        let data = transaction::serialize_call(&method_call(function, &args)?, false);

        debug!(contract = %contract, function, "Reading contract");

        let result = self
            .rpc
            .call(
                "gen_call",
                json!([{
                    "type": "read",
                    "to": contract.as_str(),
                    "from": ZERO_ADDRESS,
                    "data": format!("0x{}", hex::encode(data)),
                    "transaction_hash_variant": "latest-nonfinal",
                }]),
            )
            .await?;

        decode_result(&result)
    }

    async fn write_contract(
        &self,
        account: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<TxHash> {
        let contract = self.contract_address()?;
        let wallet = self.wallet.as_ref().ok_or_else(|| {
            AppError::WalletUnavailable(
                "No wallet provider is configured. Set VERDICT_WALLET_URL to continue.".to_string(),
            )
        })?;
        let consensus = self.consensus_address().await?;
        let data = transaction::serialize_call(&method_call(function, &args)?, false);
        let tx_data = transaction::encode_add_transaction(
            account,
            contract,
            self.consensus.initial_validators,
            self.consensus.max_rotations,
            &data,
        );

        info!(contract = %contract, account = %account, function, "Submitting contract write");

        let result = wallet
            .request(
                "eth_sendTransaction",
                json!([{
                    "from": account.as_str(),
                    "to": consensus.as_str(),
                    "data": format!("0x{}", hex::encode(tx_data)),
                    "value": "0x0",
                }]),
            )
            .await
            .map_err(wallet_error)?;

        let raw = result.as_str().ok_or_else(|| {
            AppError::ParseError(format!("Unexpected transaction result: {}", result))
        })?;
        TxHash::parse(raw)
    }
}
