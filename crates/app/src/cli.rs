use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{
    DEFAULT_ITEM_EMOJI, DEFAULT_TOKEN_COINS, DEFAULT_TOKEN_EMOJI, RewardBand, TokenKind,
    TokenSort, TokenStatus,
};
use uuid::Uuid;

use crate::settings::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "coinstreak")]
#[command(about = "Earn coins by completing tasks, spend them on rewards")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage tokens (tasks worth coins).
    Token(Token),
    /// Manage and buy shopping items.
    Shop(Shop),
    /// Show wallet balance and streak.
    Wallet,
    /// Show the transaction history, most recent first.
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show completion and coin statistics.
    Stats,
    /// Open a session (password is prompted, never read from argv).
    Login {
        #[arg(long)]
        username: String,
    },
    /// Close the session.
    Logout,
}

impl Command {
    /// Whether the command reads or changes the ledger.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Login { .. } | Command::Logout)
    }
}

#[derive(Args, Debug)]
pub struct Token {
    #[command(subcommand)]
    pub command: TokenCommand,
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    Add(TokenAddArgs),
    Edit(TokenEditArgs),
    Delete { id: Uuid },
    Complete { id: Uuid },
    List(TokenListArgs),
}

#[derive(Args, Debug)]
pub struct TokenAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = DEFAULT_TOKEN_EMOJI)]
    pub emoji: String,
    #[arg(long, default_value_t = DEFAULT_TOKEN_COINS)]
    pub coins: i64,
    #[arg(long = "type", value_enum, default_value_t = KindArg::Work)]
    pub kind: KindArg,
}

#[derive(Args, Debug)]
pub struct TokenEditArgs {
    pub id: Uuid,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub emoji: Option<String>,
    #[arg(long)]
    pub coins: Option<i64>,
}

#[derive(Args, Debug)]
pub struct TokenListArgs {
    #[arg(long = "type", value_enum)]
    pub kind: Option<KindArg>,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    #[arg(long, value_enum, default_value_t = BandArg::All)]
    pub band: BandArg,
    #[arg(long, value_enum, default_value_t = SortArg::Newest)]
    pub sort: SortArg,
}

#[derive(Args, Debug)]
pub struct Shop {
    #[command(subcommand)]
    pub command: ShopCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShopCommand {
    Add(ShopAddArgs),
    Delete { id: Uuid },
    Buy { id: Uuid },
    List,
}

#[derive(Args, Debug)]
pub struct ShopAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = DEFAULT_ITEM_EMOJI)]
    pub emoji: String,
    #[arg(long)]
    pub price: i64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Work,
    Physical,
}

impl From<KindArg> for TokenKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Work => TokenKind::Work,
            KindArg::Physical => TokenKind::Physical,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Pending,
    Done,
}

impl From<StatusArg> for TokenStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => TokenStatus::Pending,
            StatusArg::Done => TokenStatus::Done,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandArg {
    All,
    Low,
    Medium,
    High,
}

impl From<BandArg> for RewardBand {
    fn from(value: BandArg) -> Self {
        match value {
            BandArg::All => RewardBand::All,
            BandArg::Low => RewardBand::Low,
            BandArg::Medium => RewardBand::Medium,
            BandArg::High => RewardBand::High,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortArg {
    Newest,
    Coins,
}

impl From<SortArg> for TokenSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Newest => TokenSort::Newest,
            SortArg::Coins => TokenSort::Coins,
        }
    }
}
