//! Runs ledger commands against the engine and prints the outcome.

use engine::{Engine, NewShoppingItem, NewToken, Token, TokenFilter, TokenUpdate, TransactionKind};

use crate::{
    cli::{Command, ShopAddArgs, ShopCommand, TokenAddArgs, TokenCommand, TokenListArgs},
    error::Result,
};

pub async fn execute(engine: &mut Engine, command: Command) -> Result<()> {
    match command {
        Command::Token(token) => execute_token(engine, token.command).await,
        Command::Shop(shop) => execute_shop(engine, shop.command).await,
        Command::Wallet => {
            println!("Balance: {} coins", engine.wallet_balance());
            println!("Streak:  {} days", engine.current_streak());
            Ok(())
        }
        Command::History { limit } => {
            if engine.transactions().is_empty() {
                println!("No transactions yet. Complete tasks or make purchases!");
            }
            for tx in engine.transactions().iter().take(limit) {
                let sign = match tx.kind {
                    TransactionKind::Earn => '+',
                    TransactionKind::Spend => '-',
                };
                let local = tx.timestamp.with_timezone(&engine.timezone());
                println!(
                    "{}  {sign}{:>3}  {}",
                    local.format("%Y-%m-%d %H:%M"),
                    tx.amount,
                    tx.description
                );
            }
            Ok(())
        }
        Command::Stats => {
            let stats = engine.stats();
            println!("Current streak:  {} days", engine.current_streak());
            println!("Completion rate: {}%", stats.completion_rate);
            println!("Completed:       {}", stats.completed);
            println!("Pending:         {}", stats.pending);
            println!("Total earned:    {} coins", stats.total_earned);
            println!("Total spent:     {} coins", stats.total_spent);
            Ok(())
        }
        Command::Login { .. } | Command::Logout => Ok(()),
    }
}

async fn execute_token(engine: &mut Engine, command: TokenCommand) -> Result<()> {
    match command {
        TokenCommand::Add(TokenAddArgs {
            name,
            description,
            emoji,
            coins,
            kind,
        }) => {
            let token = engine
                .create_token(
                    NewToken::new(&name, kind.into())
                        .description(&description)
                        .emoji(&emoji)
                        .coins(coins),
                )
                .await?;
            println!("Token created! Worth {} coins: {}", token.coins, token.id);
        }
        TokenCommand::Edit(args) => {
            engine
                .edit_token(
                    args.id,
                    TokenUpdate {
                        name: args.name,
                        description: args.description,
                        emoji: args.emoji,
                        coins: args.coins,
                    },
                )
                .await?;
            match engine.token(args.id) {
                Some(token) if token.is_pending() => println!("Token updated: {}", line(token)),
                Some(_) => println!("Completed tokens cannot be edited"),
                None => println!("Token not found: {}", args.id),
            }
        }
        TokenCommand::Delete { id } => {
            engine.delete_token(id).await?;
            println!("Token deleted");
        }
        TokenCommand::Complete { id } => {
            let was_pending = engine.token(id).map(Token::is_pending);
            engine.complete_token(id).await?;
            match (was_pending, engine.token(id)) {
                (Some(true), Some(token)) => println!(
                    "+{} coins! Balance {} coins, streak {} days",
                    token.coins,
                    engine.wallet_balance(),
                    engine.streak()
                ),
                (Some(false), _) => println!("Token already completed"),
                _ => println!("Token not found: {id}"),
            }
        }
        TokenCommand::List(args) => {
            let tokens = engine.list_tokens(&filter(&args));
            if tokens.is_empty() {
                println!("No tokens");
            }
            for token in &tokens {
                println!("{}", line(token));
            }
        }
    }
    Ok(())
}

async fn execute_shop(engine: &mut Engine, command: ShopCommand) -> Result<()> {
    match command {
        ShopCommand::Add(ShopAddArgs { name, emoji, price }) => {
            let item = engine
                .create_shopping_item(NewShoppingItem::new(&name, price).emoji(&emoji))
                .await?;
            println!("Item added to store: {}", item.id);
        }
        ShopCommand::Delete { id } => {
            engine.delete_shopping_item(id).await?;
            println!("Item deleted from store");
        }
        ShopCommand::Buy { id } => {
            let Some(item) = engine.shopping_item(id).cloned() else {
                println!("Item not found: {id}");
                return Ok(());
            };
            if engine.purchase_item(id).await? {
                println!(
                    "Purchased {} {}! Balance {} coins",
                    item.emoji,
                    item.name,
                    engine.wallet_balance()
                );
            } else {
                println!(
                    "Not enough coins! You need {} more.",
                    item.price - engine.wallet_balance()
                );
            }
        }
        ShopCommand::List => {
            for item in engine.shopping_items() {
                println!("{}  {} {}  {} coins", item.id, item.emoji, item.name, item.price);
            }
        }
    }
    Ok(())
}

fn filter(args: &TokenListArgs) -> TokenFilter {
    TokenFilter {
        kind: args.kind.map(Into::into),
        status: args.status.map(Into::into),
        band: args.band.into(),
        sort: args.sort.into(),
    }
}

fn line(token: &Token) -> String {
    format!(
        "{}  {} {}  [{}] {} coins  {}",
        token.id,
        token.emoji,
        token.name,
        token.kind.as_str(),
        token.coins,
        token.status.as_str()
    )
}
