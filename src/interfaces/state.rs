use crate::application::{CaseActions, CaseRegistry, WalletSession};
use crate::domain::chain::ChainSpec;
use crate::infrastructure::genlayer::ContractRpc;
use crate::infrastructure::wallet::WalletProvider;
use std::sync::Arc;

pub struct AppState {
    pub case_actions: CaseActions,
}

impl AppState {
    pub fn new(
        contract: Arc<dyn ContractRpc>,
        wallet: Option<Arc<dyn WalletProvider>>,
        chain: ChainSpec,
    ) -> Self {
        let wallet_session = Arc::new(WalletSession::new(wallet, chain));
        let registry = Arc::new(CaseRegistry::new(contract, wallet_session.clone()));
        Self {
            case_actions: CaseActions::new(registry, wallet_session),
        }
    }
}
