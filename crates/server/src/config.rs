use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Embedded SQLite store. Takes the place of the DB_HOST, DB_PORT, DB_USER,
/// DB_PASSWORD and DB_NAME connection settings of a networked database:
/// the only location setting is the file path, overridable through
/// `CATALOG_DATABASE_PATH`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for uploaded executables
    pub root: PathBuf,
    /// Largest accepted upload request, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_connections() -> u32 { 5 }
fn default_max_upload_bytes() -> usize { 256 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./data/catalog.db".to_string(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./static"),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Config {
    /// Load the config file, then apply `CATALOG_*` environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(explicit)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        // Try to load from environment variable
        if let Ok(path) = std::env::var("CATALOG_CONFIG") {
            return Self::load_from_path(&PathBuf::from(path));
        }

        // Try to load from default locations
        let default_paths = vec![
            PathBuf::from("catalog-server.toml"),
            PathBuf::from("config/catalog-server.toml"),
            PathBuf::from("/etc/catalog/server.toml"),
        ];

        for path in default_paths {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // Return default config if no file found
        tracing::warn!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = var("CATALOG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("CATALOG_PORT") {
            self.server.port = port.parse().context("CATALOG_PORT must be a port number")?;
        }
        if let Some(path) = var("CATALOG_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(root) = var("CATALOG_STORAGE_ROOT") {
            self.storage.root = PathBuf::from(root);
        }
        if let Some(limit) = var("CATALOG_MAX_UPLOAD_BYTES") {
            self.storage.max_upload_bytes = limit
                .parse()
                .context("CATALOG_MAX_UPLOAD_BYTES must be a byte count")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [storage]
            root = "/srv/static"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.root, PathBuf::from("/srv/static"));
        assert_eq!(config.storage.max_upload_bytes, 256 * 1024 * 1024);
        assert_eq!(config.database.path, "./data/catalog.db");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CATALOG_PORT", "9090"),
            ("CATALOG_DATABASE_PATH", "/tmp/c.db"),
            ("CATALOG_STORAGE_ROOT", "/tmp/static"),
        ]);
        let mut config = Config::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.path, "/tmp/c.db");
        assert_eq!(config.storage.root, PathBuf::from("/tmp/static"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env(|key| (key == "CATALOG_PORT").then(|| "abc".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog-server.toml");
        std::fs::write(&path, "[database]\npath = \"x.db\"\nmax_connections = 2\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.database.path, "x.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.server.port, 5000);
    }
}
