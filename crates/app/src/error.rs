use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("engine error: {0}")]
    Engine(#[from] engine::EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid timezone: {0}")]
    Timezone(String),
    #[error("not logged in, run `coinstreak login` first")]
    Unauthenticated,
    #[error("terminal error: {0}")]
    Terminal(String),
}
