//! The module contains the error the engine can throw.
//!
//! Only routine input validation and storage faults are errors. Unknown ids
//! are silent no-ops and a purchase the wallet cannot cover is a plain
//! `false`, so neither has a variant here.
//!
//! - [`InvalidRewardRange`] thrown when a token reward is outside `1..=10`.
//! - [`InvalidPrice`] thrown when a shopping item costs less than one coin.
//! - [`BalanceOverflow`] thrown when a completion or purchase would push the
//!   wallet past the range of `i64`.
//!
//!  [`InvalidRewardRange`]: EngineError::InvalidRewardRange
//!  [`InvalidPrice`]: EngineError::InvalidPrice
//!  [`BalanceOverflow`]: EngineError::BalanceOverflow
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Coins must be between 1 and 10, got {0}")]
    InvalidRewardRange(i64),
    #[error("Price must be at least 1 coin, got {0}")]
    InvalidPrice(i64),
    #[error("Invalid emoji: \"{0}\"")]
    InvalidEmoji(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Transaction amount must be positive, got {0}")]
    InvalidAmount(i64),
    #[error("Wallet balance out of range")]
    BalanceOverflow,
    #[error("Store error: {0}")]
    Store(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidRewardRange(a), Self::InvalidRewardRange(b)) => a == b,
            (Self::InvalidPrice(a), Self::InvalidPrice(b)) => a == b,
            (Self::InvalidEmoji(a), Self::InvalidEmoji(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::BalanceOverflow, Self::BalanceOverflow) => true,
            (Self::Store(a), Self::Store(b)) => a == b,
            (Self::Serialization(a), Self::Serialization(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
