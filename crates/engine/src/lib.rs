//! Rewards ledger engine.
//!
//! The engine owns tokens (tasks worth coins), shopping items, the
//! transaction history, the wallet balance and the daily streak. Callers
//! mutate it only through the operations on [`Engine`] and observe it through
//! read-only accessors or an owned [`LedgerState`] snapshot.
//!
//! Every mutation is computed on a copy of the state, the touched slices are
//! written to the [`Store`] in one [`Store::apply`] call, and only then does
//! the copy replace the live state. A failed write leaves the ledger as it
//! was.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

pub use error::EngineError;
pub use persistence::{LedgerState, Slice};
pub use shopping::{
    DEFAULT_ITEM_EMOJI, DEFAULT_ITEM_PRICE, NewShoppingItem, ShoppingItem, default_shopping_items,
};
pub use stats::{RewardBand, Stats, TokenFilter, TokenSort};
pub use store::{MemoryStore, SqliteStore, Store, StoreWrite};
pub use streak::StreakState;
pub use tokens::{
    DEFAULT_TOKEN_COINS, DEFAULT_TOKEN_EMOJI, NewToken, Token, TokenKind, TokenStatus, TokenUpdate,
};
pub use transactions::{Transaction, TransactionKind};
pub use util::{MAX_EMOJI_UNITS, REWARD_RANGE};

mod error;
pub mod persistence;
mod shopping;
mod stats;
mod store;
mod streak;
mod tokens;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;

pub struct Engine {
    state: LedgerState,
    store: Box<dyn Store>,
    timezone: Tz,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Persist `slices` of `next`, then make it the live state.
    async fn commit(&mut self, next: LedgerState, slices: &[Slice]) -> ResultEngine<()> {
        let writes = persistence::writes(&next, slices)?;
        self.store.apply(writes).await?;
        self.state = next;
        Ok(())
    }

    fn token_index(&self, id: Uuid) -> Option<usize> {
        self.state.tokens.iter().position(|t| t.id == id)
    }

    fn item_index(&self, id: Uuid) -> Option<usize> {
        self.state.shopping_items.iter().position(|i| i.id == id)
    }

    /// Create a pending token. Wallet and history are not touched.
    pub async fn create_token(&mut self, input: NewToken) -> ResultEngine<Token> {
        self.create_token_at(input, Utc::now()).await
    }

    pub async fn create_token_at(
        &mut self,
        input: NewToken,
        now: DateTime<Utc>,
    ) -> ResultEngine<Token> {
        let token = Token::new(input, now)?;

        let mut next = self.state.clone();
        next.tokens.push(token.clone());
        self.commit(next, &[Slice::Tokens]).await?;

        tracing::info!(token_id = %token.id, coins = token.coins, kind = token.kind.as_str(), "token created");
        Ok(token)
    }

    /// Apply a partial update to a pending token.
    ///
    /// Unknown ids and completed tokens are left alone without error. Supplied
    /// fields are validated like on creation.
    pub async fn edit_token(&mut self, id: Uuid, update: TokenUpdate) -> ResultEngine<()> {
        let Some(index) = self.token_index(id) else {
            tracing::debug!(token_id = %id, "edit ignored: token not found");
            return Ok(());
        };
        if self.state.tokens[index].is_done() {
            tracing::debug!(token_id = %id, "edit ignored: token already completed");
            return Ok(());
        }
        if update.is_empty() {
            return Ok(());
        }

        let mut next = self.state.clone();
        next.tokens[index].apply(update)?;
        self.commit(next, &[Slice::Tokens]).await?;

        tracing::info!(token_id = %id, "token edited");
        Ok(())
    }

    /// Remove a token. Past transactions for it stay in the history.
    pub async fn delete_token(&mut self, id: Uuid) -> ResultEngine<()> {
        let Some(index) = self.token_index(id) else {
            tracing::debug!(token_id = %id, "delete ignored: token not found");
            return Ok(());
        };

        let mut next = self.state.clone();
        next.tokens.remove(index);
        self.commit(next, &[Slice::Tokens]).await?;

        tracing::info!(token_id = %id, "token deleted");
        Ok(())
    }

    /// Complete a pending token: mark it done, credit its coins, record the
    /// earn transaction and update the streak, all in one commit.
    ///
    /// Unknown ids and tokens that are already done are no-ops, so a reward
    /// can never be paid twice.
    pub async fn complete_token(&mut self, id: Uuid) -> ResultEngine<()> {
        self.complete_token_at(id, Utc::now()).await
    }

    pub async fn complete_token_at(&mut self, id: Uuid, now: DateTime<Utc>) -> ResultEngine<()> {
        let Some(index) = self.token_index(id) else {
            tracing::debug!(token_id = %id, "complete ignored: token not found");
            return Ok(());
        };

        let mut next = self.state.clone();
        let token = &mut next.tokens[index];
        if !token.complete(now) {
            tracing::debug!(token_id = %id, "complete ignored: token already completed");
            return Ok(());
        }
        let coins = token.coins;
        let earn = Transaction::earn(&token.name, coins, now);

        next.wallet_balance = next
            .wallet_balance
            .checked_add(coins)
            .ok_or(EngineError::BalanceOverflow)?;
        next.transactions.insert(0, earn);
        next.streak.record_completion(now, self.timezone);

        self.commit(
            next,
            &[
                Slice::Tokens,
                Slice::WalletBalance,
                Slice::Transactions,
                Slice::Streak,
            ],
        )
        .await?;

        tracing::info!(
            token_id = %id,
            coins,
            balance = self.state.wallet_balance,
            streak = self.state.streak.streak,
            "token completed"
        );
        Ok(())
    }

    pub async fn create_shopping_item(
        &mut self,
        input: NewShoppingItem,
    ) -> ResultEngine<ShoppingItem> {
        let item = ShoppingItem::new(input)?;

        let mut next = self.state.clone();
        next.shopping_items.push(item.clone());
        self.commit(next, &[Slice::ShoppingItems]).await?;

        tracing::info!(item_id = %item.id, price = item.price, "shopping item created");
        Ok(item)
    }

    pub async fn delete_shopping_item(&mut self, id: Uuid) -> ResultEngine<()> {
        let Some(index) = self.item_index(id) else {
            tracing::debug!(item_id = %id, "delete ignored: shopping item not found");
            return Ok(());
        };

        let mut next = self.state.clone();
        next.shopping_items.remove(index);
        self.commit(next, &[Slice::ShoppingItems]).await?;

        tracing::info!(item_id = %id, "shopping item deleted");
        Ok(())
    }

    /// Buy a shopping item.
    ///
    /// Returns `Ok(false)` without touching anything when the item does not
    /// exist or the wallet cannot cover its price. The item stays in the
    /// store after a purchase.
    pub async fn purchase_item(&mut self, id: Uuid) -> ResultEngine<bool> {
        self.purchase_item_at(id, Utc::now()).await
    }

    pub async fn purchase_item_at(&mut self, id: Uuid, now: DateTime<Utc>) -> ResultEngine<bool> {
        let Some(index) = self.item_index(id) else {
            tracing::debug!(item_id = %id, "purchase refused: shopping item not found");
            return Ok(false);
        };
        let item = &self.state.shopping_items[index];
        if self.state.wallet_balance < item.price {
            tracing::info!(
                item_id = %id,
                price = item.price,
                balance = self.state.wallet_balance,
                "purchase refused: insufficient funds"
            );
            return Ok(false);
        }

        let price = item.price;
        let spend = Transaction::spend(&item.name, price, now);
        let mut next = self.state.clone();
        next.wallet_balance = next
            .wallet_balance
            .checked_sub(price)
            .ok_or(EngineError::BalanceOverflow)?;
        next.transactions.insert(0, spend);
        self.commit(next, &[Slice::WalletBalance, Slice::Transactions])
            .await?;

        tracing::info!(item_id = %id, price, balance = self.state.wallet_balance, "item purchased");
        Ok(true)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.state.tokens
    }

    pub fn token(&self, id: Uuid) -> Option<&Token> {
        self.state.tokens.iter().find(|t| t.id == id)
    }

    /// Tokens matching `filter`, sorted as it asks.
    pub fn list_tokens(&self, filter: &TokenFilter) -> Vec<Token> {
        filter.apply(&self.state.tokens)
    }

    pub fn shopping_items(&self) -> &[ShoppingItem] {
        &self.state.shopping_items
    }

    pub fn shopping_item(&self, id: Uuid) -> Option<&ShoppingItem> {
        self.state.shopping_items.iter().find(|i| i.id == id)
    }

    /// Transaction history, most recent first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    pub fn wallet_balance(&self) -> i64 {
        self.state.wallet_balance
    }

    /// Stored streak counter, as of the last completion.
    pub fn streak(&self) -> u32 {
        self.state.streak.streak
    }

    /// Streak as it stands today: 0 once a whole day has gone by without a
    /// completion.
    pub fn current_streak(&self) -> u32 {
        self.current_streak_at(Utc::now())
    }

    pub fn current_streak_at(&self, now: DateTime<Utc>) -> u32 {
        self.state.streak.current(now, self.timezone)
    }

    pub fn last_completion_date(&self) -> Option<DateTime<Utc>> {
        self.state.streak.last_completion
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn stats(&self) -> Stats {
        Stats::compute(
            &self.state.tokens,
            &self.state.transactions,
            self.state.streak.streak,
        )
    }

    /// Owned copy of the whole ledger.
    pub fn snapshot(&self) -> LedgerState {
        self.state.clone()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Box<dyn Store>>,
    timezone: Option<Tz>,
}

impl EngineBuilder {
    /// Pass the backing store. Defaults to an empty `MemoryStore`.
    pub fn store(mut self, store: impl Store + 'static) -> EngineBuilder {
        self.store = Some(Box::new(store));
        self
    }

    /// Time zone whose calendar days the streak counts. Defaults to UTC.
    pub fn timezone(mut self, timezone: Tz) -> EngineBuilder {
        self.timezone = Some(timezone);
        self
    }

    /// Construct `Engine`, hydrating the ledger from the store.
    pub async fn build(self) -> Engine {
        let store = self
            .store
            .unwrap_or_else(|| Box::new(MemoryStore::new()) as Box<dyn Store>);
        let state = persistence::load(store.as_ref()).await;
        tracing::debug!(
            tokens = state.tokens.len(),
            items = state.shopping_items.len(),
            transactions = state.transactions.len(),
            balance = state.wallet_balance,
            "ledger loaded"
        );

        Engine {
            state,
            store,
            timezone: self.timezone.unwrap_or(Tz::UTC),
        }
    }
}
