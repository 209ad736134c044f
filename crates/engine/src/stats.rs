//! Read-only views computed from a ledger snapshot: the dashboard figures and
//! the filtered token lists.

use crate::{Token, TokenKind, TokenStatus, Transaction, TransactionKind};

/// Dashboard summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub completed: usize,
    pub pending: usize,
    /// Share of done tokens, rounded to a whole percent. 0 with no tokens.
    pub completion_rate: u32,
    pub total_earned: i64,
    pub total_spent: i64,
    pub streak: u32,
}

impl Stats {
    pub(crate) fn compute(tokens: &[Token], transactions: &[Transaction], streak: u32) -> Self {
        let completed = tokens.iter().filter(|t| t.is_done()).count();
        let pending = tokens.len() - completed;
        let completion_rate = if tokens.is_empty() {
            0
        } else {
            ((completed as f64 / tokens.len() as f64) * 100.0).round() as u32
        };

        let total = |kind: TransactionKind| -> i64 {
            transactions
                .iter()
                .filter(|tx| tx.kind == kind)
                .map(|tx| tx.amount)
                .sum()
        };

        Self {
            completed,
            pending,
            completion_rate,
            total_earned: total(TransactionKind::Earn),
            total_spent: total(TransactionKind::Spend),
            streak,
        }
    }
}

/// Reward buckets used by the token list filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RewardBand {
    #[default]
    All,
    /// 1 to 3 coins.
    Low,
    /// 4 to 6 coins.
    Medium,
    /// 7 coins or more.
    High,
}

impl RewardBand {
    pub fn contains(self, coins: i64) -> bool {
        match self {
            Self::All => true,
            Self::Low => coins <= 3,
            Self::Medium => (4..=6).contains(&coins),
            Self::High => coins >= 7,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Highest reward first.
    Coins,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenFilter {
    pub kind: Option<TokenKind>,
    pub status: Option<TokenStatus>,
    pub band: RewardBand,
    pub sort: TokenSort,
}

impl TokenFilter {
    /// Pending tokens of one kind, the way the dashboard tabs list them.
    pub fn pending(kind: TokenKind) -> Self {
        Self {
            kind: Some(kind),
            status: Some(TokenStatus::Pending),
            ..Default::default()
        }
    }

    pub fn matches(&self, token: &Token) -> bool {
        self.kind.is_none_or(|kind| token.kind == kind)
            && self.status.is_none_or(|status| token.status == status)
            && self.band.contains(token.coins)
    }

    pub(crate) fn apply(&self, tokens: &[Token]) -> Vec<Token> {
        let mut out: Vec<Token> = tokens.iter().filter(|t| self.matches(t)).cloned().collect();
        // Stable sorts keep insertion order for ties.
        match self.sort {
            TokenSort::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            TokenSort::Coins => out.sort_by(|a, b| b.coins.cmp(&a.coins)),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::NewToken;

    fn token(name: &str, kind: TokenKind, coins: i64, day: u32) -> Token {
        let at = Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
        Token::new(NewToken::new(name, kind).coins(coins), at).unwrap()
    }

    #[test]
    fn completion_rate_rounds() {
        let mut tokens = vec![
            token("a", TokenKind::Work, 1, 1),
            token("b", TokenKind::Work, 1, 1),
            token("c", TokenKind::Work, 1, 1),
        ];
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        tokens[0].complete(at);
        tokens[1].complete(at);

        let stats = Stats::compute(&tokens, &[], 0);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completion_rate, 67);
    }

    #[test]
    fn no_tokens_means_zero_rate() {
        assert_eq!(Stats::compute(&[], &[], 0).completion_rate, 0);
    }

    #[test]
    fn totals_split_by_kind() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let transactions = vec![
            Transaction::spend("Coffee Break", 5, at),
            Transaction::earn("Run", 7, at),
            Transaction::earn("Read", 2, at),
        ];

        let stats = Stats::compute(&[], &transactions, 3);
        assert_eq!(stats.total_earned, 9);
        assert_eq!(stats.total_spent, 5);
        assert_eq!(stats.streak, 3);
    }

    #[test]
    fn filter_and_sort() {
        let tokens = vec![
            token("old-high", TokenKind::Work, 8, 1),
            token("new-low", TokenKind::Work, 2, 3),
            token("mid", TokenKind::Work, 5, 2),
            token("gym", TokenKind::Physical, 9, 4),
        ];

        let names = |filter: TokenFilter| -> Vec<String> {
            filter.apply(&tokens).into_iter().map(|t| t.name).collect()
        };

        assert_eq!(
            names(TokenFilter::pending(TokenKind::Work)),
            vec!["new-low", "mid", "old-high"]
        );
        assert_eq!(
            names(TokenFilter {
                sort: TokenSort::Coins,
                ..Default::default()
            }),
            vec!["gym", "old-high", "mid", "new-low"]
        );
        assert_eq!(
            names(TokenFilter {
                band: RewardBand::High,
                kind: Some(TokenKind::Work),
                ..Default::default()
            }),
            vec!["old-high"]
        );
    }
}
