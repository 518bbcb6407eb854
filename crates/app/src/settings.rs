//! Settings for the application, layered from lowest to highest priority:
//! built-in defaults, the TOML file, `SPENDBOOK_*` environment variables and
//! finally command line flags.
//!
//! ```toml
//! preferences_path = "./spendbook_prefs.json"
//!
//! [app]
//! level = "debug"
//! currency_symbol = "€"
//!
//! [database]
//! sqlite = "./spendbook.db"   # or: database = "memory"
//! ```
use serde::Deserialize;

use crate::{cli::Cli, error::Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/spendbook.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct App {
    pub level: String,
    pub currency_symbol: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            currency_symbol: "€".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("./spendbook.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub preferences_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: App::default(),
            database: Database::default(),
            preferences_path: "./spendbook_prefs.json".to_string(),
        }
    }
}

impl Settings {
    pub fn new(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(cli.config.is_some()))
            .add_source(
                config::Environment::with_prefix("SPENDBOOK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let mut settings: Settings = settings.try_deserialize()?;
        settings.apply_overrides(cli);
        Ok(settings)
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if cli.memory {
            self.database = Database::Memory;
        } else if let Some(path) = &cli.database {
            self.database = Database::Sqlite(path.clone());
        }
        if let Some(path) = &cli.preferences {
            self.preferences_path = path.clone();
        }
        if let Some(level) = &cli.log_level {
            self.app.level = level.clone();
        }
    }
}
