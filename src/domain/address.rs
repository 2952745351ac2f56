use crate::domain::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap());

// The contract reports "no judge" as a run of zeros, not always a full-width address.
static ZERO_ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x0*$").unwrap());

/// A wallet or contract address (`0x` followed by 40 hex digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !ADDRESS_PATTERN.is_match(trimmed) {
            return Err(AppError::ParseError(format!(
                "Invalid address: {:?}",
                raw
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 20] {
        let mut bytes = [0u8; 20];
        // Always 40 hex digits after `parse`.
        let _ = hex::decode_to_slice(&self.0[2..], &mut bytes);
        bytes
    }

    pub fn is_zero(&self) -> bool {
        is_zero_address(&self.0)
    }
}

/// True for `0x`, `0x000` and the full-width zero address.
pub fn is_zero_address(raw: &str) -> bool {
    ZERO_ADDRESS_PATTERN.is_match(raw.trim())
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

/// Identifier of a submitted write transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::ParseError(
                "Empty transaction identifier".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
