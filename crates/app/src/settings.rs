//! Application settings.
//!
//! Sources are layered: the optional TOML file (`config/ledger.toml` unless
//! `--config` says otherwise), then `LEDGER__*` environment variables, then
//! the command line overrides.
use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/ledger.toml";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

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

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

impl Database {
    /// `memory` selects the in-memory database, anything else is a SQLite
    /// file path.
    fn from_arg(value: &str) -> Self {
        if value.eq_ignore_ascii_case("memory") {
            Self::Memory
        } else {
            Self::Sqlite(value.to_string())
        }
    }

    pub fn url(&self) -> String {
        match self {
            Self::Memory => String::from("sqlite::memory:"),
            Self::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

#[derive(Debug, Parser)]
#[command(name = "ledger", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the bind address.
    #[arg(long)]
    bind: Option<String>,
    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,
    /// `memory` or a SQLite file path.
    #[arg(long)]
    database: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings = Self::from_sources(config_path)?;

        if let Some(bind) = args.bind {
            settings.server.bind = bind;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if let Some(database) = args.database {
            settings.database = Database::from_arg(&database);
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }

    fn from_sources(config_path: &str) -> Result<Self, SettingsError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("LEDGER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
