//! Error types for the hint engine

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HintError {
    /// Configuration cannot produce correct labels or styles
    #[error("invalid hint configuration: {0}")]
    InvalidConfig(String),

    /// Label generation was asked to label an empty candidate set
    #[error("no candidates to label")]
    NoCandidates,
}

impl HintError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

pub type HintResult<T> = Result<T, HintError>;
