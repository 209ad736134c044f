//! The module contains `Token`, a rewardable task, and its implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ResultEngine,
    util::{normalize_required_name, validate_emoji, validate_reward},
};

/// Emoji proposed for a new token.
pub const DEFAULT_TOKEN_EMOJI: &str = "⭐";
/// Reward proposed for a new token.
pub const DEFAULT_TOKEN_COINS: i64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Work,
    Physical,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Physical => "physical",
        }
    }
}

/// A token starts `Pending` and moves to `Done` exactly once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    #[default]
    Pending,
    Done,
}

impl TokenStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

/// A task worth a coin reward.
///
/// The persisted JSON shape uses camelCase keys and stores `kind` under
/// `type`, e.g.
///
/// ```json
/// {"id":"…","name":"Run","description":"5k","emoji":"🏃","coins":4,
///  "type":"physical","status":"done","createdAt":"…","completedAt":"…"}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub coins: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub status: TokenStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Builds a pending token after validating the user input.
    pub fn new(input: NewToken, created_at: DateTime<Utc>) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_required_name(&input.name, "token")?,
            description: input.description.trim().to_string(),
            emoji: validate_emoji(&input.emoji)?,
            coins: validate_reward(input.coins)?,
            kind: input.kind,
            status: TokenStatus::Pending,
            created_at,
            completed_at: None,
        })
    }

    /// Checks a token read back from storage against the creation rules.
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        normalize_required_name(&self.name, "token")?;
        validate_emoji(&self.emoji)?;
        validate_reward(self.coins)?;
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == TokenStatus::Pending
    }

    pub fn is_done(&self) -> bool {
        self.status == TokenStatus::Done
    }

    /// Marks the token as done. Returns `false` when it already was.
    pub(crate) fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_done() {
            return false;
        }
        self.status = TokenStatus::Done;
        self.completed_at = Some(now);
        true
    }

    /// Applies a validated partial update. Identity, kind, status and
    /// timestamps are never touched.
    pub(crate) fn apply(&mut self, update: TokenUpdate) -> ResultEngine<()> {
        // Validate everything first so a bad field leaves the token untouched.
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "token"))
            .transpose()?;
        let emoji = update.emoji.as_deref().map(validate_emoji).transpose()?;
        let coins = update.coins.map(validate_reward).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(emoji) = emoji {
            self.emoji = emoji;
        }
        if let Some(coins) = coins {
            self.coins = coins;
        }
        Ok(())
    }
}

/// Input for `Engine::create_token`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewToken {
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub coins: i64,
    pub kind: TokenKind,
}

impl NewToken {
    pub fn new(name: &str, kind: TokenKind) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            emoji: DEFAULT_TOKEN_EMOJI.to_string(),
            coins: DEFAULT_TOKEN_COINS,
            kind,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn emoji(mut self, emoji: &str) -> Self {
        self.emoji = emoji.to_string();
        self
    }

    pub fn coins(mut self, coins: i64) -> Self {
        self.coins = coins;
        self
    }
}

/// Partial edit of a pending token; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub coins: Option<i64>,
}

impl TokenUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.emoji.is_none()
            && self.coins.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::EngineError;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn token() -> Token {
        Token::new(
            NewToken::new("Write report", TokenKind::Work)
                .description("quarterly")
                .emoji("📚")
                .coins(3),
            created_at(),
        )
        .unwrap()
    }

    #[test]
    fn new_token_is_pending() {
        let token = token();

        assert_eq!(token.name, "Write report");
        assert_eq!(token.status, TokenStatus::Pending);
        assert_eq!(token.created_at, created_at());
        assert_eq!(token.completed_at, None);
    }

    #[test]
    fn reject_reward_out_of_range() {
        let err = Token::new(
            NewToken::new("Too generous", TokenKind::Work).coins(11),
            created_at(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::InvalidRewardRange(11));
    }

    #[test]
    fn complete_only_once() {
        let mut token = token();
        let first = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 3, 8, 0, 0).unwrap();

        assert!(token.complete(first));
        assert!(!token.complete(second));
        assert_eq!(token.status, TokenStatus::Done);
        assert_eq!(token.completed_at, Some(first));
    }

    #[test]
    fn bad_update_leaves_token_untouched() {
        let mut token = token();
        let before = token.clone();

        let err = token
            .apply(TokenUpdate {
                name: Some("Renamed".to_string()),
                coins: Some(0),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(err, EngineError::InvalidRewardRange(0));
        assert_eq!(token, before);
    }

    #[test]
    fn json_shape() {
        let token = token();
        let value = serde_json::to_value(&token).unwrap();

        assert_eq!(value["type"], "work");
        assert_eq!(value["status"], "pending");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("completedAt").is_none());
    }
}
