use crate::domain::address::{is_zero_address, Address};
use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Pending,
    Approved,
    Rejected,
    NeedsReview,
}

impl Verdict {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Verdict::Pending => "PENDING",
            Verdict::Approved => "APPROVED",
            Verdict::Rejected => "REJECTED",
            Verdict::NeedsReview => "NEEDS_REVIEW",
        }
    }

    /// The contract leaves the verdict empty until a case is judged.
    pub fn from_wire(raw: &str) -> Result<Self> {
        match raw.trim() {
            "" | "PENDING" => Ok(Verdict::Pending),
            "APPROVED" => Ok(Verdict::Approved),
            "REJECTED" => Ok(Verdict::Rejected),
            "NEEDS_REVIEW" => Ok(Verdict::NeedsReview),
            other => Err(AppError::ParseError(format!("Unknown verdict: {:?}", other))),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A verdict a judge can submit. `PENDING` is not a ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ruling {
    Approved,
    Rejected,
    NeedsReview,
}

impl Ruling {
    pub fn as_wire(&self) -> &'static str {
        Verdict::from(*self).as_wire()
    }
}

impl From<Ruling> for Verdict {
    fn from(value: Ruling) -> Self {
        match value {
            Ruling::Approved => Verdict::Approved,
            Ruling::Rejected => Verdict::Rejected,
            Ruling::NeedsReview => Verdict::NeedsReview,
        }
    }
}

impl TryFrom<Verdict> for Ruling {
    type Error = AppError;

    fn try_from(value: Verdict) -> Result<Self> {
        match value {
            Verdict::Approved => Ok(Ruling::Approved),
            Verdict::Rejected => Ok(Ruling::Rejected),
            Verdict::NeedsReview => Ok(Ruling::NeedsReview),
            Verdict::Pending => Err(AppError::ValidationError(
                "PENDING cannot be submitted as a verdict".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    Human,
    Ai,
}

impl Source {
    /// `NONE` and the empty string both mean the case has not been judged.
    pub fn from_wire(raw: &str) -> Result<Option<Self>> {
        match raw.trim() {
            "" | "NONE" => Ok(None),
            "HUMAN" => Ok(Some(Source::Human)),
            "AI" => Ok(Some(Source::Ai)),
            other => Err(AppError::ParseError(format!("Unknown verdict source: {:?}", other))),
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Source::Human => "HUMAN",
            Source::Ai => "AI",
        }
    }
}

/// Field values exactly as the contract read procedures return them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCase {
    pub question: String,
    pub verdict: String,
    pub reasoning: String,
    pub judge: String,
    pub source: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: u64,
    pub question: String,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    pub created_at: String,
}

impl Case {
    /// Normalizes a contract read. An empty question means no such case.
    pub fn from_wire(id: u64, raw: RawCase) -> Result<Option<Self>> {
        if raw.question.is_empty() {
            return Ok(None);
        }

        let verdict = Verdict::from_wire(&raw.verdict)?;
        let reasoning = if raw.reasoning.is_empty() {
            None
        } else {
            Some(raw.reasoning)
        };
        let judge = if raw.judge.trim().is_empty() || is_zero_address(&raw.judge) {
            None
        } else {
            Some(Address::parse(&raw.judge)?)
        };
        let source = Source::from_wire(&raw.source)?;

        let case = Case {
            id,
            question: raw.question,
            verdict,
            reasoning,
            judge,
            source,
            created_at: raw.created_at,
        };

        if !case.is_consistent() {
            warn!(
                case_id = id,
                verdict = %case.verdict,
                has_reasoning = case.reasoning.is_some(),
                has_judge = case.judge.is_some(),
                has_source = case.source.is_some(),
                "Contract returned a case whose verdict disagrees with its judgment fields"
            );
        }

        Ok(Some(case))
    }

    pub fn is_pending(&self) -> bool {
        self.verdict == Verdict::Pending
    }

    /// PENDING iff judge, reasoning and source are all absent.
    pub fn is_consistent(&self) -> bool {
        let unjudged = self.reasoning.is_none() && self.judge.is_none() && self.source.is_none();
        self.is_pending() == unjudged
    }
}
