use std::sync::{Arc, Mutex};

use tracing::info;

use crate::infrastructure::config::ConfigService;
use crate::infrastructure::genlayer::GenLayerClient;
use crate::infrastructure::rpc::JsonRpcClient;
use crate::infrastructure::wallet::{HttpWalletProvider, WalletProvider};
use crate::interfaces::http::{add_log, LogEntry};
use crate::interfaces::state::AppState;

pub fn setup(config_service: &ConfigService, logs: &Mutex<Vec<LogEntry>>) -> Arc<AppState> {
    let config = config_service.config();

    let wallet: Option<Arc<dyn WalletProvider>> = match &config.wallet_url {
        Some(url) => {
            add_log(logs, "INFO", "Wallet", &format!("Using wallet provider at {}", url));
            Some(Arc::new(HttpWalletProvider::new(url.clone())))
        }
        None => {
            add_log(logs, "WARN", "Wallet", "No wallet provider configured");
            None
        }
    };

    let contract_address = config_service.contract_address();
    match &contract_address {
        Some(address) => add_log(
            logs,
            "INFO",
            "GenLayer",
            &format!("Verdict registry contract at {}", address),
        ),
        None => add_log(
            logs,
            "WARN",
            "GenLayer",
            "VERDICT_CONTRACT_ADDRESS is not set",
        ),
    }

    let contract = GenLayerClient::new(
        JsonRpcClient::new(config.rpc_url.clone()),
        wallet.clone(),
        contract_address,
        config.consensus,
    );

    info!(rpc_url = %config.rpc_url, chain = %config.chain.chain_name, "Application state ready");

    Arc::new(AppState::new(
        Arc::new(contract),
        wallet,
        config.chain.clone(),
    ))
}
