//! Mapping between the in-memory ledger and the key/value store.
//!
//! Each slice lives under its own key. Structured slices are JSON, the wallet
//! balance and the streak counter are plain decimal strings and the last
//! completion date is an RFC 3339 timestamp (the key is absent until the
//! first completion).
//!
//! Loading never fails: a missing or unreadable slice falls back to its
//! default and the problem is logged.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::{
    ResultEngine, ShoppingItem, StreakState, Token, Transaction,
    shopping::default_shopping_items,
    store::{Store, StoreWrite},
};

pub const TOKENS_KEY: &str = "tokens";
pub const SHOPPING_ITEMS_KEY: &str = "shoppingItems";
pub const TRANSACTIONS_KEY: &str = "transactions";
pub const WALLET_BALANCE_KEY: &str = "walletBalance";
pub const STREAK_KEY: &str = "streak";
pub const LAST_COMPLETION_DATE_KEY: &str = "lastCompletionDate";

/// A persisted piece of the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slice {
    Tokens,
    ShoppingItems,
    Transactions,
    WalletBalance,
    /// Streak counter and last completion date, always written together.
    Streak,
}

/// Whole ledger state, owned by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub tokens: Vec<Token>,
    pub shopping_items: Vec<ShoppingItem>,
    /// Most recent first.
    pub transactions: Vec<Transaction>,
    pub wallet_balance: i64,
    pub streak: StreakState,
}

/// Reads every slice from `store`, substituting defaults for anything
/// missing or corrupt.
pub async fn load(store: &dyn Store) -> LedgerState {
    let tokens = load_json::<Vec<Token>>(store, TOKENS_KEY)
        .await
        .map(|tokens| keep_valid(TOKENS_KEY, tokens, Token::validate))
        .unwrap_or_default();
    let shopping_items = load_json::<Vec<ShoppingItem>>(store, SHOPPING_ITEMS_KEY)
        .await
        .map(|items| keep_valid(SHOPPING_ITEMS_KEY, items, ShoppingItem::validate))
        .unwrap_or_else(default_shopping_items);
    let transactions = load_json::<Vec<Transaction>>(store, TRANSACTIONS_KEY)
        .await
        .map(|txs| keep_valid(TRANSACTIONS_KEY, txs, Transaction::validate))
        .unwrap_or_default();
    let wallet_balance = load_parsed::<i64>(store, WALLET_BALANCE_KEY)
        .await
        .unwrap_or(0);
    let streak = load_parsed::<u32>(store, STREAK_KEY).await.unwrap_or(0);
    let last_completion = load_timestamp(store, LAST_COMPLETION_DATE_KEY).await;

    LedgerState {
        tokens,
        shopping_items,
        transactions,
        wallet_balance,
        streak: StreakState::new(streak, last_completion),
    }
}

/// Encodes the full current value of each slice in `slices`.
pub fn writes(state: &LedgerState, slices: &[Slice]) -> ResultEngine<Vec<StoreWrite>> {
    let mut out = Vec::with_capacity(slices.len() + 1);
    for slice in slices {
        match slice {
            Slice::Tokens => {
                out.push(StoreWrite::set(
                    TOKENS_KEY,
                    serde_json::to_string(&state.tokens)?,
                ));
            }
            Slice::ShoppingItems => {
                out.push(StoreWrite::set(
                    SHOPPING_ITEMS_KEY,
                    serde_json::to_string(&state.shopping_items)?,
                ));
            }
            Slice::Transactions => {
                out.push(StoreWrite::set(
                    TRANSACTIONS_KEY,
                    serde_json::to_string(&state.transactions)?,
                ));
            }
            Slice::WalletBalance => {
                out.push(StoreWrite::set(
                    WALLET_BALANCE_KEY,
                    state.wallet_balance.to_string(),
                ));
            }
            Slice::Streak => {
                out.push(StoreWrite::set(STREAK_KEY, state.streak.streak.to_string()));
                out.push(match state.streak.last_completion {
                    Some(at) => StoreWrite::set(LAST_COMPLETION_DATE_KEY, at.to_rfc3339()),
                    None => StoreWrite::remove(LAST_COMPLETION_DATE_KEY),
                });
            }
        }
    }
    Ok(out)
}

async fn load_raw(store: &dyn Store, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!("failed to read {key} from store: {err}");
            None
        }
    }
}

async fn load_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let raw = load_raw(store, key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!("failed to parse {key} from store: {err}");
            None
        }
    }
}

/// Drops entries that break the model rules, logging each one.
fn keep_valid<T>(key: &str, entries: Vec<T>, validate: fn(&T) -> ResultEngine<()>) -> Vec<T> {
    entries
        .into_iter()
        .filter(|entry| match validate(entry) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("dropping invalid entry from {key}: {err}");
                false
            }
        })
        .collect()
}

async fn load_parsed<T: std::str::FromStr>(store: &dyn Store, key: &str) -> Option<T> {
    let raw = load_raw(store, key).await?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::error!("failed to parse {key} from store: {raw:?}");
    }
    parsed
}

async fn load_timestamp(store: &dyn Store, key: &str) -> Option<DateTime<Utc>> {
    let raw = load_raw(store, key).await?;
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(err) => {
            tracing::error!("failed to parse {key} from store: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{MemoryStore, NewToken, TokenKind};

    fn sample_state() -> LedgerState {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        let mut token = Token::new(NewToken::new("Stretch", TokenKind::Physical), at).unwrap();
        token.complete(at);
        LedgerState {
            tokens: vec![token],
            shopping_items: default_shopping_items(),
            transactions: vec![Transaction::earn("Stretch", 5, at)],
            wallet_balance: 5,
            streak: StreakState::new(1, Some(at)),
        }
    }

    const ALL: [Slice; 5] = [
        Slice::Tokens,
        Slice::ShoppingItems,
        Slice::Transactions,
        Slice::WalletBalance,
        Slice::Streak,
    ];

    #[tokio::test]
    async fn empty_store_uses_defaults() {
        let state = load(&MemoryStore::new()).await;

        assert!(state.tokens.is_empty());
        assert_eq!(state.shopping_items.len(), 3);
        assert!(state.transactions.is_empty());
        assert_eq!(state.wallet_balance, 0);
        assert_eq!(state.streak, StreakState::default());
    }

    #[tokio::test]
    async fn written_state_loads_back() {
        let state = sample_state();
        let store = MemoryStore::new();
        store.apply(writes(&state, &ALL).unwrap()).await.unwrap();

        assert_eq!(load(&store).await, state);
    }

    #[tokio::test]
    async fn corrupt_slices_fall_back() {
        let store = MemoryStore::with_entries([
            (TOKENS_KEY, "{not json"),
            (SHOPPING_ITEMS_KEY, "[{\"id\": 1}]"),
            (TRANSACTIONS_KEY, "null"),
            (WALLET_BALANCE_KEY, "lots"),
            (STREAK_KEY, "-2"),
            (LAST_COMPLETION_DATE_KEY, "yesterday"),
        ]);

        let state = load(&store).await;

        assert!(state.tokens.is_empty());
        assert_eq!(
            state
                .shopping_items
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Coffee Break", "Movie Night", "Gaming Session"]
        );
        assert!(state.transactions.is_empty());
        assert_eq!(state.wallet_balance, 0);
        assert_eq!(state.streak, StreakState::default());
    }

    #[tokio::test]
    async fn empty_shop_is_not_reseeded() {
        let store = MemoryStore::with_entries([(SHOPPING_ITEMS_KEY, "[]")]);
        assert!(load(&store).await.shopping_items.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_entries_are_dropped() {
        let state = sample_state();
        let mut tokens = serde_json::to_value(&state.tokens).unwrap();
        let mut bad = tokens[0].clone();
        bad["coins"] = serde_json::json!(-4);
        bad["status"] = serde_json::json!("pending");
        tokens.as_array_mut().unwrap().push(bad);

        let mut items = serde_json::to_value(&state.shopping_items).unwrap();
        items[1]["price"] = serde_json::json!(0);

        let mut transactions = serde_json::to_value(&state.transactions).unwrap();
        let mut negative = transactions[0].clone();
        negative["amount"] = serde_json::json!(-4);
        transactions.as_array_mut().unwrap().push(negative);

        let store = MemoryStore::with_entries([
            (TOKENS_KEY, tokens.to_string()),
            (SHOPPING_ITEMS_KEY, items.to_string()),
            (TRANSACTIONS_KEY, transactions.to_string()),
        ]);

        let loaded = load(&store).await;
        assert_eq!(loaded.tokens, state.tokens);
        assert_eq!(
            loaded
                .shopping_items
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Coffee Break", "Gaming Session"]
        );
        assert_eq!(loaded.transactions, state.transactions);
    }

    #[test]
    fn streak_without_completion_removes_date() {
        let state = LedgerState::default();
        let out = writes(&state, &[Slice::Streak]).unwrap();

        assert_eq!(
            out,
            vec![
                StoreWrite::set(STREAK_KEY, "0".to_string()),
                StoreWrite::remove(LAST_COMPLETION_DATE_KEY),
            ]
        );
    }

    #[test]
    fn scalars_are_plain_strings() {
        let state = sample_state();
        let out = writes(&state, &[Slice::WalletBalance]).unwrap();

        assert_eq!(out, vec![StoreWrite::set(WALLET_BALANCE_KEY, "5".to_string())]);
    }
}
