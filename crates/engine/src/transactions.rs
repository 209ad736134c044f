//! Transaction primitives.
//!
//! A `Transaction` is an immutable record of coins entering or leaving the
//! wallet. The engine only ever prepends them; nothing edits or removes one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ResultEngine, util::validate_amount};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earn,
    Spend,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Earn => "earn",
            Self::Spend => "spend",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: i64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Reward for completing the token `name`.
    pub(crate) fn earn(name: &str, amount: i64, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            TransactionKind::Earn,
            amount,
            format!("Completed: {name}"),
            timestamp,
        )
    }

    /// Payment for the shopping item `name`.
    pub(crate) fn spend(name: &str, amount: i64, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            TransactionKind::Spend,
            amount,
            format!("Purchased: {name}"),
            timestamp,
        )
    }

    fn new(
        kind: TransactionKind,
        amount: i64,
        description: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            description,
            timestamp,
        }
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        validate_amount(self.amount)?;
        Ok(())
    }

    /// Effect on the wallet balance: positive for earn, negative for spend.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Earn => self.amount,
            TransactionKind::Spend => -self.amount,
        }
    }
}
