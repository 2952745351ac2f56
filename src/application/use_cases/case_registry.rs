use crate::application::use_cases::wallet_session::WalletSession;
use crate::domain::address::{Address, TxHash};
use crate::domain::case::{Case, RawCase, Ruling};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::genlayer::ContractRpc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Typed access to the Verdict Registry contract procedures.
pub struct CaseRegistry {
    contract: Arc<dyn ContractRpc>,
    wallet: Arc<WalletSession>,
}

impl CaseRegistry {
    pub fn new(contract: Arc<dyn ContractRpc>, wallet: Arc<WalletSession>) -> Self {
        Self { contract, wallet }
    }

    pub async fn post_case(&self, account: &Address, question: &str) -> Result<TxHash> {
        self.write(account, "post_case", vec![json!(question)]).await
    }

    pub async fn submit_verdict(
        &self,
        account: &Address,
        case_id: u64,
        verdict: Ruling,
        reasoning: &str,
    ) -> Result<TxHash> {
        self.write(
            account,
            "submit_verdict",
            vec![json!(case_id), json!(verdict.as_wire()), json!(reasoning)],
        )
        .await
    }

    pub async fn ai_judge(&self, account: &Address, case_id: u64) -> Result<TxHash> {
        self.write(account, "ai_judge", vec![json!(case_id)]).await
    }

    pub async fn get_case(&self, case_id: u64) -> Result<Option<Case>> {
        let question = self.read_text("get_question", case_id).await?;
        if question.is_empty() {
            return Ok(None);
        }

        let raw = RawCase {
            question,
            verdict: self.read_text("get_verdict", case_id).await?,
            reasoning: self.read_text("get_reasoning", case_id).await?,
            judge: self.read_text("get_judge", case_id).await?,
            source: self.read_text("get_source", case_id).await?,
            created_at: self.read_text("get_created_at", case_id).await?,
        };

        Case::from_wire(case_id, raw)
    }

    pub async fn get_next_case_id(&self) -> Result<u64> {
        let value = self.contract.read_contract("get_next_case_id", vec![]).await?;
        let next_id = match &value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        next_id.ok_or_else(|| AppError::ParseError(format!("Unexpected next case id: {}", value)))
    }

    async fn write(&self, account: &Address, function: &str, args: Vec<Value>) -> Result<TxHash> {
        self.contract.ensure_configured()?;
        self.wallet.ensure_network().await?;
        let tx_hash = self.contract.write_contract(account, function, args).await?;
        info!(function, account = %account, tx_hash = %tx_hash, "Contract write submitted");
        Ok(tx_hash)
    }

    async fn read_text(&self, function: &str, case_id: u64) -> Result<String> {
        let value = self.contract.read_contract(function, vec![json!(case_id)]).await?;
        match value {
            Value::String(s) => Ok(s),
            Value::Null => Ok(String::new()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(AppError::ParseError(format!(
                "Unexpected {} result: {}",
                function, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::case::{Source, Verdict};
    use crate::domain::chain::ChainSpec;
    use crate::testing::{FakeRegistry, ScriptedWallet, ALICE};

    fn registry(contract: &Arc<FakeRegistry>, wallet: &Arc<ScriptedWallet>) -> CaseRegistry {
        let session = WalletSession::new(Some(wallet.clone()), ChainSpec::studionet());
        CaseRegistry::new(contract.clone(), Arc::new(session))
    }

    fn alice() -> Address {
        Address::parse(ALICE).unwrap()
    }

    #[tokio::test]
    async fn test_missing_case_stops_after_question() {
        let contract = Arc::new(FakeRegistry::new());
        let wallet = Arc::new(ScriptedWallet::connected());
        let case = registry(&contract, &wallet).get_case(42).await.unwrap();
        assert_eq!(case, None);
        assert_eq!(contract.reads(), vec!["get_question"]);
    }

    #[tokio::test]
    async fn test_pending_case_reads_every_field() {
        let contract = Arc::new(FakeRegistry::new().with_case("Should the deposit be returned?"));
        let wallet = Arc::new(ScriptedWallet::connected());
        let case = registry(&contract, &wallet).get_case(1).await.unwrap().unwrap();

        assert_eq!(case.question, "Should the deposit be returned?");
        assert_eq!(case.verdict, Verdict::Pending);
        assert_eq!(case.judge, None);
        assert_eq!(case.source, None);
        assert_eq!(
            contract.reads(),
            vec![
                "get_question",
                "get_verdict",
                "get_reasoning",
                "get_judge",
                "get_source",
                "get_created_at"
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_verdict_sends_wire_arguments() {
        let contract = Arc::new(FakeRegistry::new().with_case("Is the invoice valid?"));
        let wallet = Arc::new(ScriptedWallet::connected());
        let registry = registry(&contract, &wallet);

        registry
            .submit_verdict(&alice(), 1, Ruling::NeedsReview, "Missing receipts")
            .await
            .unwrap();

        let writes = contract.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1, "submit_verdict");
        assert_eq!(writes[0].2, vec![json!(1), json!("NEEDS_REVIEW"), json!("Missing receipts")]);

        let case = registry.get_case(1).await.unwrap().unwrap();
        assert_eq!(case.verdict, Verdict::NeedsReview);
        assert_eq!(case.source, Some(Source::Human));
        assert_eq!(case.judge, Some(alice()));
    }

    #[tokio::test]
    async fn test_writes_switch_network_first() {
        let contract = Arc::new(FakeRegistry::new());
        let wallet = Arc::new(ScriptedWallet::connected());
        registry(&contract, &wallet)
            .post_case(&alice(), "Is this a fair trade?")
            .await
            .unwrap();
        assert_eq!(wallet.methods(), vec!["wallet_switchEthereumChain"]);
        assert_eq!(contract.writes()[0].2, vec![json!("Is this a fair trade?")]);
    }

    #[tokio::test]
    async fn test_unconfigured_contract_fails_before_wallet() {
        let contract = Arc::new(FakeRegistry::unconfigured());
        let wallet = Arc::new(ScriptedWallet::connected());
        let err = registry(&contract, &wallet)
            .ai_judge(&alice(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(wallet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_next_case_id() {
        let contract = Arc::new(FakeRegistry::new().with_case("One").with_case("Two"));
        let wallet = Arc::new(ScriptedWallet::connected());
        assert_eq!(registry(&contract, &wallet).get_next_case_id().await.unwrap(), 3);
    }
}
