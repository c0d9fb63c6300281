//! Error types
//!
//! `QuizError` covers question construction inside the engine. `StoreError`
//! covers everything that touches files: catalogs, settings, high scores and
//! the offline generator.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a question from being built.
///
/// None of these are transient. They point at a content or configuration
/// defect, so nothing retries them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("catalog has no entries for tier {tier}")]
    EmptyCatalogTier { tier: u8 },
    #[error("invalid operand: {lhs} {op} {rhs}")]
    InvalidOperand { lhs: i64, op: char, rhs: i64 },
    #[error("option range [{low}, {high}] holds fewer than 4 distinct values")]
    InsufficientRange { low: i64, high: i64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown operator token {0:?}")]
    UnknownOperator(String),
    #[error("tier must be between 1 and 5, got {0}")]
    InvalidTier(u8),
    #[error("gave up after {attempts} attempts with tier {tier} still short")]
    GenerationExhausted { attempts: u64, tier: u8 },
    #[error("invalid setting {field} = {value}: {reason}")]
    InvalidSettings {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
