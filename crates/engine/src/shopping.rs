//! Shopping items: rewards bought with coins.
//!
//! Items carry no status. Buying one leaves it in the store so it can be
//! bought again; only an explicit delete removes it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ResultEngine,
    util::{normalize_required_name, validate_emoji, validate_price},
};

pub const DEFAULT_ITEM_EMOJI: &str = "🎁";
pub const DEFAULT_ITEM_PRICE: i64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: Uuid,
    pub name: String,
    pub emoji: String,
    pub price: i64,
}

impl ShoppingItem {
    pub fn new(input: NewShoppingItem) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_required_name(&input.name, "item")?,
            emoji: validate_emoji(&input.emoji)?,
            price: validate_price(input.price)?,
        })
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        normalize_required_name(&self.name, "item")?;
        validate_emoji(&self.emoji)?;
        validate_price(self.price)?;
        Ok(())
    }

    fn seed(name: &str, emoji: &str, price: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            emoji: emoji.to_string(),
            price,
        }
    }
}

/// Input for `Engine::create_shopping_item`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewShoppingItem {
    pub name: String,
    pub emoji: String,
    pub price: i64,
}

impl NewShoppingItem {
    pub fn new(name: &str, price: i64) -> Self {
        Self {
            name: name.to_string(),
            emoji: DEFAULT_ITEM_EMOJI.to_string(),
            price,
        }
    }

    pub fn emoji(mut self, emoji: &str) -> Self {
        self.emoji = emoji.to_string();
        self
    }
}

/// Store contents used when nothing valid is persisted yet.
pub fn default_shopping_items() -> Vec<ShoppingItem> {
    vec![
        ShoppingItem::seed("Coffee Break", "☕", 5),
        ShoppingItem::seed("Movie Night", "🎬", 15),
        ShoppingItem::seed("Gaming Session", "🎮", 10),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    #[test]
    fn seed_has_three_items() {
        let items = default_shopping_items();
        let prices: Vec<i64> = items.iter().map(|i| i.price).collect();

        assert_eq!(prices, vec![5, 15, 10]);
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn reject_free_item() {
        let err = ShoppingItem::new(NewShoppingItem::new("Nap", 0)).unwrap_err();
        assert_eq!(err, EngineError::InvalidPrice(0));
    }
}
