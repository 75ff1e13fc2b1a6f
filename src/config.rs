use crate::cli::Cli;
use crate::error::{KanbanError, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_DB_FILE: &str = "kanban.db";

pub const PORT_ENV: &str = "PORT";
pub const HOST_ENV: &str = "KANBAN_HOST";
pub const DB_PATH_ENV: &str = "KANBAN_DB_PATH";

/// Where the server listens and which database it opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_FILE),
        }
    }
}

impl ServerConfig {
    /// Resolve from command line, then process environment, then defaults
    pub fn resolve(cli: &Cli) -> Result<Self> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup
    pub fn resolve_with<F>(cli: &Cli, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match cli.port {
            Some(port) => port,
            None => match env(PORT_ENV).filter(|v| !v.trim().is_empty()) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    KanbanError::InvalidInput(format!("{} must be a port number, got '{}'", PORT_ENV, raw))
                })?,
                None => defaults.port,
            },
        };

        let host = cli
            .host
            .clone()
            .or_else(|| env(HOST_ENV).filter(|v| !v.trim().is_empty()))
            .unwrap_or(defaults.host);

        let db_path = cli
            .db
            .clone()
            .or_else(|| {
                env(DB_PATH_ENV)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or(defaults.db_path);

        Ok(Self {
            host,
            port,
            db_path,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
