use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PAGE_SIZE, DEFAULT_PORT,
    MAX_PAGE_SIZE, SQLITE_MAX_CONNECTIONS,
};
use crate::utils::file::expand_path;

// =============================================================================
// File Config (JSON)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// SQLite database file
    pub path: Option<String>,
    pub max_connections: Option<u32>,
}

/// Pagination configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaginationFileConfig {
    pub default_size: Option<u32>,
    pub max_size: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub pagination: Option<PaginationFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(database) = other.database {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default);
            if database.path.is_some() {
                tracing::trace!(path = ?database.path, "Merging database.path");
                current.path = database.path;
            }
            if database.max_connections.is_some() {
                current.max_connections = database.max_connections;
            }
        }

        if let Some(pagination) = other.pagination {
            let current = self
                .pagination
                .get_or_insert_with(PaginationFileConfig::default);
            if pagination.default_size.is_some() {
                current.default_size = pagination.default_size;
            }
            if pagination.max_size.is_some() {
                current.max_size = pagination.max_size;
            }
        }

        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Explicit SQLite file; `None` places it in the data directory
    pub path: Option<PathBuf>,
    pub max_connections: u32,
}

/// Page size limits for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    /// Data directory override from CLI/env
    pub data_dir: Option<PathBuf>,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.carelink/carelink.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(file_config, cli);
        config.validate()?;
        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Layer defaults, merged file config and CLI/env overrides
    fn from_layers(file_config: FileConfig, cli: &CliConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_pagination = file_config.pagination.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let path = cli
            .database_path
            .as_ref()
            .map(|p| expand_path(&p.to_string_lossy()))
            .or_else(|| file_database.path.as_deref().map(expand_path));
        let max_connections = cli
            .max_connections
            .or(file_database.max_connections)
            .unwrap_or(SQLITE_MAX_CONNECTIONS);

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_size: file_pagination
                .default_size
                .unwrap_or(defaults.default_size),
            max_size: file_pagination.max_size.unwrap_or(defaults.max_size),
        };

        // debug: CLI/env flag takes precedence, then file config, default false
        let debug = cli.debug || file_config.debug.unwrap_or(false);

        Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                path,
                max_connections,
            },
            pagination,
            data_dir: cli
                .data_dir
                .as_ref()
                .map(|p| expand_path(&p.to_string_lossy())),
            debug,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("Configuration error: database.max_connections must be greater than 0");
        }
        if self.pagination.default_size == 0 || self.pagination.max_size == 0 {
            anyhow::bail!("Configuration error: pagination sizes must be greater than 0");
        }
        if self.pagination.default_size > self.pagination.max_size {
            anyhow::bail!(
                "Configuration error: pagination.default_size ({}) exceeds pagination.max_size ({})",
                self.pagination.default_size,
                self.pagination.max_size
            );
        }
        Ok(())
    }
}

fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("carelink.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 9000 },
            "database": { "path": "/var/lib/care.db", "max_connections": 8 },
            "pagination": { "default_size": 50, "max_size": 200 },
            "debug": true
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(9000));
        let database = config.database.as_ref().unwrap();
        assert_eq!(database.path.as_deref(), Some("/var/lib/care.db"));
        assert_eq!(database.max_connections, Some(8));
        assert_eq!(config.pagination.as_ref().unwrap().max_size, Some(200));
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.database.is_none());
        assert!(config.pagination.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let extra = config.extra.as_object().unwrap();
        assert!(extra.contains_key("unknown_field"));
        config.warn_unknown_fields();
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{ "server": { "host": "10.0.0.1", "port": 7000 }, "pagination": { "max_size": 100 } }"#,
        )
        .unwrap();
        let overlay: FileConfig =
            serde_json::from_str(r#"{ "server": { "port": 7001 }, "debug": true }"#).unwrap();
        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("10.0.0.1"));
        assert_eq!(server.port, Some(7001));
        assert_eq!(base.pagination.unwrap().max_size, Some(100));
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_layers(FileConfig::default(), &CliConfig::default());
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.path, None);
        assert_eq!(config.database.max_connections, SQLITE_MAX_CONNECTIONS);
        assert_eq!(config.pagination, PaginationConfig::default());
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{ "server": { "host": "10.0.0.1", "port": 7000 }, "database": { "path": "/a.db" } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(7100),
            database_path: Some(PathBuf::from("/b.db")),
            ..Default::default()
        };
        let config = AppConfig::from_layers(file, &cli);
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 7100);
        assert_eq!(config.database.path, Some(PathBuf::from("/b.db")));
    }

    #[test]
    fn test_load_from_cli_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{ "server": { "port": 9100 }, "pagination": { "default_size": 10 } }"#,
        );
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.pagination.default_size, 10);
    }

    #[test]
    fn test_load_missing_config_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliConfig {
            config: Some(dir.path().join("missing.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_malformed_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "{ not json");
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let cli = CliConfig {
            host: Some(String::new()),
            ..Default::default()
        };
        let config = AppConfig::from_layers(FileConfig::default(), &cli);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let cli = CliConfig {
            port: Some(0),
            ..Default::default()
        };
        let config = AppConfig::from_layers(FileConfig::default(), &cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let file: FileConfig =
            serde_json::from_str(r#"{ "pagination": { "default_size": 0 } }"#).unwrap();
        let config = AppConfig::from_layers(file, &CliConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_page_sizes() {
        let file: FileConfig =
            serde_json::from_str(r#"{ "pagination": { "default_size": 100, "max_size": 10 } }"#)
                .unwrap();
        let config = AppConfig::from_layers(file, &CliConfig::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }
}
