use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Length of the external identifier representation in hex characters.
pub const RECORD_ID_LEN: usize = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRecordIdError {
    #[error("identifier must be exactly {RECORD_ID_LEN} characters, got {0}")]
    Length(usize),
    #[error("identifier must be hexadecimal, found `{0}`")]
    NotHex(char),
}

/// Store-assigned record identifier, externally a 24-character lowercase
/// hexadecimal string. Parsing rejects malformed input before any store
/// access happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Mint a fresh identifier from v4 UUID entropy (12 bytes, hex-encoded).
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..RECORD_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.len() != RECORD_ID_LEN {
            return Err(ParseRecordIdError::Length(value.len()));
        }
        if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseRecordIdError::NotHex(bad));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for RecordId {
    type Error = ParseRecordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
