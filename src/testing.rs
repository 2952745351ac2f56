//! In-process stand-ins for the wallet and the contract, shared by unit tests.

use crate::domain::address::{Address, TxHash};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::genlayer::ContractRpc;
use crate::infrastructure::rpc::{RpcCallError, RpcFailure};
use crate::infrastructure::wallet::WalletProvider;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const ALICE: &str = "0xa11ce00000000000000000000000000000000001";

pub fn provider_error(code: i64, message: &str) -> RpcCallError {
    RpcCallError::Remote(RpcFailure {
        code,
        message: message.to_string(),
        data: None,
    })
}

/// Wallet that answers each method from a queue; the last answer repeats.
#[derive(Default)]
pub struct ScriptedWallet {
    responses: Mutex<HashMap<String, VecDeque<std::result::Result<Value, RpcCallError>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet with `ALICE` already authorized.
    pub fn connected() -> Self {
        let wallet = Self::new();
        wallet.respond("eth_accounts", Ok(json!([ALICE])));
        wallet.respond("eth_requestAccounts", Ok(json!([ALICE])));
        wallet.respond("wallet_switchEthereumChain", Ok(Value::Null));
        wallet
    }

    pub fn respond(&self, method: &str, response: std::result::Result<Value, RpcCallError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(method, _)| method).collect()
    }
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    async fn request(&self, method: &str, params: Value) -> std::result::Result<Value, RpcCallError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        let mut responses = self.responses.lock().unwrap();
        let Some(queue) = responses.get_mut(method) else {
            return Err(provider_error(-32601, "Method not found"));
        };
        if queue.len() > 1 {
            return queue.pop_front().unwrap();
        }
        queue
            .front()
            .cloned()
            .unwrap_or_else(|| Err(provider_error(-32601, "Method not found")))
    }
}

#[derive(Debug, Clone)]
struct StoredCase {
    question: String,
    verdict: String,
    reasoning: String,
    judge: String,
    source: String,
    created_at: String,
}

impl StoredCase {
    /// What the contract reports for an id it never assigned.
    fn missing() -> Self {
        Self {
            question: String::new(),
            verdict: String::new(),
            reasoning: String::new(),
            judge: "0x000".to_string(),
            source: "NONE".to_string(),
            created_at: String::new(),
        }
    }
}

/// Contract double that answers reads with the same sentinels the real one uses.
pub struct FakeRegistry {
    configured: bool,
    cases: Mutex<Vec<StoredCase>>,
    reads: Mutex<Vec<String>>,
    writes: Mutex<Vec<(Address, String, Vec<Value>)>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self {
            configured: true,
            cases: Mutex::new(Vec::new()),
            reads: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_case(self, question: &str) -> Self {
        self.insert(question);
        self
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<(Address, String, Vec<Value>)> {
        self.writes.lock().unwrap().clone()
    }

    fn insert(&self, question: &str) -> u64 {
        let mut cases = self.cases.lock().unwrap();
        cases.push(StoredCase {
            question: question.to_string(),
            created_at: "2026-01-15T08:30:00Z".to_string(),
            ..StoredCase::missing()
        });
        cases.len() as u64
    }

    fn case_field(&self, args: &[Value], pick: fn(&StoredCase) -> String) -> Value {
        let id = args.first().and_then(Value::as_u64).unwrap_or(0);
        let cases = self.cases.lock().unwrap();
        let missing = StoredCase::missing();
        let stored = id
            .checked_sub(1)
            .and_then(|index| cases.get(index as usize))
            .unwrap_or(&missing);
        json!(pick(stored))
    }

    fn judge(&self, id: u64, verdict: &str, reasoning: &str, judge: &Address, source: &str) {
        let mut cases = self.cases.lock().unwrap();
        if let Some(case) = id.checked_sub(1).and_then(|index| cases.get_mut(index as usize)) {
            case.verdict = verdict.to_string();
            case.reasoning = reasoning.to_string();
            case.judge = judge.to_string();
            case.source = source.to_string();
        }
    }
}

impl Default for FakeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractRpc for FakeRegistry {
    fn ensure_configured(&self) -> Result<()> {
        if self.configured {
            Ok(())
        } else {
            Err(AppError::ConfigError("contract address missing".to_string()))
        }
    }

    async fn read_contract(&self, function: &str, args: Vec<Value>) -> Result<Value> {
        self.ensure_configured()?;
        self.reads.lock().unwrap().push(function.to_string());
        let value = match function {
            "get_next_case_id" => json!(self.cases.lock().unwrap().len() as u64 + 1),
            "get_question" => self.case_field(&args, |c| c.question.clone()),
            "get_verdict" => self.case_field(&args, |c| c.verdict.clone()),
            "get_reasoning" => self.case_field(&args, |c| c.reasoning.clone()),
            "get_judge" => self.case_field(&args, |c| c.judge.clone()),
            "get_source" => self.case_field(&args, |c| c.source.clone()),
            "get_created_at" => self.case_field(&args, |c| c.created_at.clone()),
            other => return Err(AppError::RpcError(format!("unknown read {}", other))),
        };
        Ok(value)
    }

    async fn write_contract(
        &self,
        account: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<TxHash> {
        self.ensure_configured()?;
        self.writes
            .lock()
            .unwrap()
            .push((account.clone(), function.to_string(), args.clone()));

        let id = args.first().and_then(Value::as_u64).unwrap_or(0);
        match function {
            "post_case" => {
                let question = args.first().and_then(Value::as_str).unwrap_or_default();
                self.insert(question);
            }
            "submit_verdict" => {
                let verdict = args.get(1).and_then(Value::as_str).unwrap_or_default();
                let reasoning = args.get(2).and_then(Value::as_str).unwrap_or_default();
                self.judge(id, verdict, reasoning, account, "HUMAN");
            }
            "ai_judge" => {
                self.judge(id, "NEEDS_REVIEW", "Automated review requested", account, "AI");
            }
            other => return Err(AppError::RpcError(format!("unknown write {}", other))),
        }

        let count = self.writes.lock().unwrap().len();
        TxHash::parse(&format!("0x{:064x}", count))
    }
}
