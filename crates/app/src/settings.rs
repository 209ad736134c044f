//! Handles settings for the application.
//!
//! Values come from an optional TOML file, then from `COINSTREAK__*`
//! environment variables (e.g. `COINSTREAK__APP__LEVEL=debug`).
//!
//! ```toml
//! timezone = "Europe/Rome"
//!
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "coinstreak.db"
//!
//! [auth]
//! username = "me"
//! password = "secret"
//! ```
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{AppError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "coinstreak.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

/// Connection URL for a SQLite file, created on first use.
pub fn sqlite_url(path: &str) -> String {
    format!("sqlite:{path}?mode=rwc")
}

/// Credential pair gating the dashboard. Not a security boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    /// IANA name of the zone whose calendar days the streak counts.
    pub timezone: String,
    pub auth: Option<Auth>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: App::default(),
            database: Database::Sqlite("coinstreak.db".to_string()),
            timezone: "UTC".to_string(),
            auth: None,
        }
    }
}

impl Settings {
    pub fn new(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("COINSTREAK").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}
