use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::ExtractError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_host")]
    pub host: String,
    #[serde(default = "DatabaseConfig::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseConfig::default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "DatabaseConfig::default_database")]
    pub database: String,
    #[serde(
        with = "humantime_serde",
        default = "DatabaseConfig::default_connect_timeout"
    )]
    pub connect_timeout: Duration,
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
}

impl DatabaseConfig {
    fn default_host() -> String {
        String::from("localhost")
    }

    fn default_port() -> u16 {
        5432
    }

    fn default_user() -> String {
        String::from("postgres")
    }

    fn default_database() -> String {
        String::from("postgres")
    }

    fn default_connect_timeout() -> Duration {
        Duration::from_secs(10)
    }

    /// Connection fields to use, with `credentials_file` taking precedence
    /// over the inline values when set.
    pub fn credentials(&self) -> Result<DatabaseCredentials, ExtractError> {
        match &self.credentials_file {
            Some(path) => DatabaseCredentials::from_file(path),
            None => Ok(DatabaseCredentials {
                user: self.user.clone(),
                password: self.password.clone(),
                host: self.host.clone(),
                port: self.port,
                database: self.database.clone(),
            }),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            user: Self::default_user(),
            password: String::new(),
            database: Self::default_database(),
            connect_timeout: Self::default_connect_timeout(),
            credentials_file: None,
        }
    }
}

/// JSON credentials document as handed out by a secret manager.
#[derive(Clone, Deserialize, PartialEq)]
pub struct DatabaseCredentials {
    pub user: String,
    pub password: String,
    pub host: String,
    #[serde(deserialize_with = "port_from_number_or_string")]
    pub port: u16,
    pub database: String,
}

impl std::fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

impl DatabaseCredentials {
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        serde_json::from_str(json)
            .map_err(|e| ExtractError::ConfigParsingError(format!("credentials document: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self, ExtractError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::ConfigParsingError(format!(
                "reading credentials file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }
}

fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
