use crate::domain::case::Ruling;
use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCaseRequest {
    #[validate(length(
        min = 5,
        max = 4096,
        message = "Question must be between 5 and 4096 characters"
    ))]
    pub question: String,
}

impl CreateCaseRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    /// Trims the input and checks its length.
    pub fn validated(self) -> Result<Self> {
        let request = Self {
            question: self.question.trim().to_string(),
        };
        request.validate()?;
        Ok(request)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVerdictRequest {
    #[validate(range(min = 1, message = "Invalid case ID"))]
    pub case_id: u64,
    pub verdict: Ruling,
    #[validate(length(
        min = 5,
        max = 4096,
        message = "Reasoning must be between 5 and 4096 characters"
    ))]
    pub reasoning: String,
}

impl SubmitVerdictRequest {
    pub fn validated(self) -> Result<Self> {
        let request = Self {
            reasoning: self.reasoning.trim().to_string(),
            ..self
        };
        request.validate()?;
        Ok(request)
    }
}

/// Parses a case id typed by the user.
pub fn parse_case_id(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            "Please enter a case ID".to_string(),
        ));
    }
    match trimmed.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::ValidationError("Invalid case ID".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_trimmed_before_length_check() {
        let err = CreateCaseRequest::new("   abc    ").validated().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg.contains("Question")));

        let ok = CreateCaseRequest::new("  Is this fair?  ").validated().unwrap();
        assert_eq!(ok.question, "Is this fair?");
    }

    #[test]
    fn test_question_length_bounds() {
        assert!(CreateCaseRequest::new("abcde").validated().is_ok());
        let long = "x".repeat(4097);
        assert!(CreateCaseRequest::new(long).validated().is_err());
    }

    #[test]
    fn test_question_length_counts_characters() {
        // Five multi-byte characters.
        assert!(CreateCaseRequest::new("ÄÖÜßé").validated().is_ok());
    }

    #[test]
    fn test_verdict_request_validation() {
        let request = SubmitVerdictRequest {
            case_id: 0,
            verdict: Ruling::Approved,
            reasoning: " ok ".to_string(),
        };
        let err = request.validated().unwrap_err();
        let AppError::ValidationError(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("Invalid case ID"));
        assert!(msg.contains("Reasoning"));
    }

    #[test]
    fn test_verdict_request_deserializes_camel_case() {
        let request: SubmitVerdictRequest = serde_json::from_str(
            r#"{"caseId": 4, "verdict": "REJECTED", "reasoning": "  Not supported by facts  "}"#,
        )
        .unwrap();
        let request = request.validated().unwrap();
        assert_eq!(request.case_id, 4);
        assert_eq!(request.verdict, Ruling::Rejected);
        assert_eq!(request.reasoning, "Not supported by facts");
    }

    #[test]
    fn test_parse_case_id() {
        assert_eq!(parse_case_id(" 12 ").unwrap(), 12);
        assert!(matches!(parse_case_id(""), Err(AppError::ValidationError(m)) if m == "Please enter a case ID"));
        assert!(matches!(parse_case_id("0"), Err(AppError::ValidationError(m)) if m == "Invalid case ID"));
        assert!(matches!(parse_case_id("-3"), Err(AppError::ValidationError(m)) if m == "Invalid case ID"));
        assert!(matches!(parse_case_id("abc"), Err(AppError::ValidationError(m)) if m == "Invalid case ID"));
    }
}
