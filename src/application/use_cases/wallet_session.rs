use crate::domain::address::Address;
use crate::domain::chain::ChainSpec;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::rpc::RpcCallError;
use crate::infrastructure::wallet::{wallet_error, WalletProvider, UNRECOGNIZED_CHAIN, USER_REJECTED};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub struct WalletSession {
    provider: Option<Arc<dyn WalletProvider>>,
    chain: ChainSpec,
}

impl WalletSession {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, chain: ChainSpec) -> Self {
        Self { provider, chain }
    }

    pub fn chain(&self) -> &ChainSpec {
        &self.chain
    }

    fn provider(&self) -> Result<&Arc<dyn WalletProvider>> {
        self.provider.as_ref().ok_or_else(|| {
            AppError::WalletUnavailable(
                "No wallet provider is configured. Set VERDICT_WALLET_URL to continue.".to_string(),
            )
        })
    }

    /// Asks the wallet for account access and returns the first account.
    pub async fn connect_wallet(&self) -> Result<Address> {
        let provider = self.provider()?;
        let accounts = provider
            .request("eth_requestAccounts", json!([]))
            .await
            .map_err(|err| match err {
                RpcCallError::Remote(ref failure) if failure.code == USER_REJECTED => {
                    AppError::WalletRejected("Wallet connection rejected by user".to_string())
                }
                other => wallet_error(other),
            })?;

        let account = first_account(&accounts)?
            .ok_or_else(|| AppError::WalletUnavailable("No wallet connected".to_string()))?;
        info!(account = %account, "Wallet connected");
        Ok(account)
    }

    /// Account the wallet has already authorized, without prompting.
    pub async fn connected_wallet(&self) -> Option<Address> {
        let provider = self.provider.as_ref()?;
        match provider.request("eth_accounts", json!([])).await {
            Ok(accounts) => first_account(&accounts).ok().flatten(),
            Err(err) => {
                warn!(error = %err, "Failed to query wallet accounts");
                None
            }
        }
    }

    pub async fn account_or_connect(&self) -> Result<Address> {
        match self.connected_wallet().await {
            Some(account) => Ok(account),
            None => self.connect_wallet().await,
        }
    }

    /// Switches the wallet to the configured chain, registering it first if unknown.
    pub async fn ensure_network(&self) -> Result<()> {
        let provider = self.provider()?;

        let switched = provider
            .request("wallet_switchEthereumChain", self.chain.switch_params())
            .await;

        match switched {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some(UNRECOGNIZED_CHAIN) => {
                info!(chain_id = %self.chain.chain_id_hex(), chain = %self.chain.chain_name, "Adding chain to wallet");
                provider
                    .request("wallet_addEthereumChain", self.chain.add_params())
                    .await
                    .map_err(|add_err| {
                        if add_err.code() == Some(USER_REJECTED) {
                            AppError::WalletRejected(format!(
                                "User rejected adding {}",
                                self.chain.chain_name
                            ))
                        } else {
                            wallet_error(add_err)
                        }
                    })?;
                Ok(())
            }
            Err(err) if err.code() == Some(USER_REJECTED) => Err(AppError::WalletRejected(
                format!("User rejected switching to {}", self.chain.chain_name),
            )),
            Err(err) => Err(wallet_error(err)),
        }
    }
}

fn first_account(accounts: &Value) -> Result<Option<Address>> {
    let Some(list) = accounts.as_array() else {
        return Ok(None);
    };
    match list.first().and_then(Value::as_str) {
        Some(raw) => Address::parse(raw).map(Some),
        None => Ok(None),
    }
}
