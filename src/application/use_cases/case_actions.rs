use crate::application::use_cases::case_registry::CaseRegistry;
use crate::application::use_cases::wallet_session::WalletSession;
use crate::domain::address::{Address, TxHash};
use crate::domain::case::Case;
use crate::domain::chain::ChainSpec;
use crate::domain::error::{AppError, Result};
use crate::domain::requests::{CreateCaseRequest, SubmitVerdictRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCase {
    pub tx_hash: TxHash,
    pub case_id: u64,
}

/// The user-facing actions: each runs one sequential chain of wallet and contract calls.
pub struct CaseActions {
    registry: Arc<CaseRegistry>,
    wallet: Arc<WalletSession>,
}

impl CaseActions {
    pub fn new(registry: Arc<CaseRegistry>, wallet: Arc<WalletSession>) -> Self {
        Self { registry, wallet }
    }

    pub async fn create_case(&self, request: CreateCaseRequest) -> Result<CreatedCase> {
        let request = request.validated()?;
        let span = tracing::info_span!("create_case", action_id = %Uuid::new_v4());

        async {
            let account = self.wallet.account_or_connect().await?;
            let tx_hash = self.registry.post_case(&account, &request.question).await?;

            // The contract hands out ids sequentially, so the new case is the one before next.
            let next_id = self.registry.get_next_case_id().await?;
            let case_id = next_id.checked_sub(1).filter(|id| *id > 0).ok_or_else(|| {
                AppError::ParseError(format!(
                    "Contract reported next case id {} after a successful post",
                    next_id
                ))
            })?;

            info!(case_id, tx_hash = %tx_hash, "Case created");
            Ok::<_, AppError>(CreatedCase { tx_hash, case_id })
        }
        .instrument(span)
        .await
    }

    pub async fn load_case(&self, case_id: u64) -> Result<Case> {
        self.registry
            .get_case(case_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Case not found".to_string()))
    }

    pub async fn refresh_case(&self, case_id: u64) -> Result<Case> {
        self.load_case(case_id).await
    }

    pub async fn next_case_id(&self) -> Result<u64> {
        self.registry.get_next_case_id().await
    }

    pub async fn submit_verdict(&self, request: SubmitVerdictRequest) -> Result<TxHash> {
        let request = request.validated()?;
        let span = tracing::info_span!(
            "submit_verdict",
            action_id = %Uuid::new_v4(),
            case_id = request.case_id
        );

        async {
            self.load_case(request.case_id).await?;
            let account = self.wallet.account_or_connect().await?;
            let tx_hash = self
                .registry
                .submit_verdict(&account, request.case_id, request.verdict, &request.reasoning)
                .await?;
            info!(verdict = request.verdict.as_wire(), tx_hash = %tx_hash, "Verdict submitted");
            Ok::<_, AppError>(tx_hash)
        }
        .instrument(span)
        .await
    }

    /// The automated verdict lands later; callers refresh the case to observe it.
    pub async fn request_ai_judgment(&self, case_id: u64) -> Result<TxHash> {
        let span = tracing::info_span!("ai_judge", action_id = %Uuid::new_v4(), case_id);

        async {
            self.load_case(case_id).await?;
            let account = self.wallet.account_or_connect().await?;
            let tx_hash = self.registry.ai_judge(&account, case_id).await?;
            info!(tx_hash = %tx_hash, "Automated judgment requested");
            Ok::<_, AppError>(tx_hash)
        }
        .instrument(span)
        .await
    }

    pub async fn wallet_status(&self) -> Option<Address> {
        self.wallet.connected_wallet().await
    }

    pub async fn connect_wallet(&self) -> Result<Address> {
        self.wallet.connect_wallet().await
    }

    pub async fn ensure_network(&self) -> Result<&ChainSpec> {
        self.wallet.ensure_network().await?;
        Ok(self.wallet.chain())
    }
}
