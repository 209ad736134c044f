use clap::Parser;
use engine::{MemoryStore, SqliteStore, Store};

use cli::{Cli, Command};
use error::AppError;
use settings::{Database, Settings};

mod cli;
mod commands;
mod error;
mod prompt;
mod session;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "coinstreak={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match &settings.database {
        Database::Memory => run(MemoryStore::new(), &settings, cli.command).await?,
        Database::Sqlite(path) => {
            let url = settings::sqlite_url(path);
            tracing::debug!(%url, "opening database");
            let store = SqliteStore::connect(&url).await?;
            run(store, &settings, cli.command).await?;
        }
    }

    Ok(())
}

async fn run<S>(store: S, settings: &Settings, command: Command) -> error::Result<()>
where
    S: Store + 'static,
{
    match command {
        Command::Login { username } => {
            let Some(auth) = &settings.auth else {
                println!("No [auth] section configured, login is not required");
                return Ok(());
            };
            let password = prompt::password("Password: ")?;
            if session::login(&store, auth, &username, &password).await? {
                println!("Logged in as {username}");
            } else {
                println!("Invalid credentials");
            }
            return Ok(());
        }
        Command::Logout => {
            session::logout(&store).await?;
            println!("Logged out");
            return Ok(());
        }
        _ => {}
    }

    if command.needs_session()
        && settings.auth.is_some()
        && !session::is_authenticated(&store).await?
    {
        return Err(AppError::Unauthenticated);
    }

    let mut engine = engine::Engine::builder()
        .store(store)
        .timezone(settings.timezone()?)
        .build()
        .await;
    commands::execute(&mut engine, command).await
}
