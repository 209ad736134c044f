//! Internal helpers for model validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! input checks so every creation and edit path enforces the same rules.

use std::ops::RangeInclusive;

use crate::{EngineError, ResultEngine};

/// Allowed coin reward for a single token.
pub const REWARD_RANGE: RangeInclusive<i64> = 1..=10;

/// Maximum emoji length, counted in UTF-16 code units.
pub const MAX_EMOJI_UNITS: usize = 2;

pub(crate) fn validate_reward(coins: i64) -> ResultEngine<i64> {
    if !REWARD_RANGE.contains(&coins) {
        return Err(EngineError::InvalidRewardRange(coins));
    }
    Ok(coins)
}

pub(crate) fn validate_price(price: i64) -> ResultEngine<i64> {
    if price < 1 {
        return Err(EngineError::InvalidPrice(price));
    }
    Ok(price)
}

pub(crate) fn validate_amount(amount: i64) -> ResultEngine<i64> {
    if amount < 1 {
        return Err(EngineError::InvalidAmount(amount));
    }
    Ok(amount)
}

/// Accept one glyph of at most two UTF-16 code units, the same bound the
/// dashboard input field applies.
pub(crate) fn validate_emoji(emoji: &str) -> ResultEngine<String> {
    let trimmed = emoji.trim();
    let units = trimmed.encode_utf16().count();
    if units == 0 || units > MAX_EMOJI_UNITS {
        return Err(EngineError::InvalidEmoji(emoji.to_string()));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_bounds() {
        assert_eq!(validate_reward(1), Ok(1));
        assert_eq!(validate_reward(10), Ok(10));
        assert_eq!(validate_reward(0), Err(EngineError::InvalidRewardRange(0)));
        assert_eq!(
            validate_reward(11),
            Err(EngineError::InvalidRewardRange(11))
        );
    }

    #[test]
    fn price_must_be_positive() {
        assert_eq!(validate_price(1), Ok(1));
        assert_eq!(validate_price(0), Err(EngineError::InvalidPrice(0)));
        assert_eq!(validate_price(-3), Err(EngineError::InvalidPrice(-3)));
    }

    #[test]
    fn emoji_counts_utf16_units() {
        assert_eq!(validate_emoji("☕").unwrap(), "☕");
        // Astral plane glyphs take a surrogate pair.
        assert_eq!(validate_emoji("🎬").unwrap(), "🎬");
        assert!(validate_emoji("🎬🎮").is_err());
        assert!(validate_emoji("  ").is_err());
    }

    #[test]
    fn names_are_trimmed() {
        assert_eq!(
            normalize_required_name("  Read a book ", "token").unwrap(),
            "Read a book"
        );
        assert_eq!(
            normalize_required_name(" ", "item"),
            Err(EngineError::InvalidName(
                "item name must not be empty".to_string()
            ))
        );
    }
}
