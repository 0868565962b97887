use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::DynError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    /// Venue/artist/show booking site (HTML pages)
    Booking,
    /// Trivia question API (JSON)
    Trivia,
}

impl AppType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Booking => "booking",
            AppType::Trivia => "trivia",
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_bind_address() -> String {
    "[::]".to_string()
}

fn default_max_connections() -> u32 {
    5
}

/// Server configuration file structure
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Which application this server runs
    pub app_type: AppType,
    /// SQLite database file (created if missing)
    pub database_file: PathBuf,
    /// Port to listen on (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Address to bind (default: [::], IPv4 + IPv6)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Connection pool size (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Origins allowed to call the trivia API; any origin when unset
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl ServerConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, DynError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database_file.as_os_str().is_empty() {
            return Err("database_file must not be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("max_connections must be at least 1".to_string());
        }

        if let Some(origins) = &self.cors_allowed_origins {
            if origins.is_empty() {
                return Err(
                    "cors_allowed_origins is set but empty; remove it to allow any origin"
                        .to_string(),
                );
            }
            if self.app_type != AppType::Trivia {
                return Err("cors_allowed_origins only applies to app_type = \"trivia\"".to_string());
            }
        }

        Ok(())
    }

    pub fn bind_target(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: ServerConfig = toml::from_str(
            r#"
            app_type = "trivia"
            database_file = "trivia.sqlite"
            "#,
        )
        .unwrap();

        assert_eq!(config.app_type, AppType::Trivia);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.bind_target(), "[::]:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_app_type_rejected() {
        let result: Result<ServerConfig, _> = toml::from_str(
            r#"
            app_type = "coffee"
            database_file = "x.sqlite"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cors_origins_only_for_trivia() {
        let config: ServerConfig = toml::from_str(
            r#"
            app_type = "booking"
            database_file = "fyyur.sqlite"
            cors_allowed_origins = ["http://localhost:3000"]
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_connections_rejected() {
        let config: ServerConfig = toml::from_str(
            r#"
            app_type = "booking"
            database_file = "fyyur.sqlite"
            max_connections = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
