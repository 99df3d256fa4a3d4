//! Configuration management.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::DEFAULT_KEEP_ALIVE;

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".mcp-relay.toml";

/// Configuration structure that matches the TOML file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerConfig {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_keep_alive_secs")]
    keep_alive_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct LoggingConfig {
    /// Path to log file (if set, logs will be written to file in addition to stdout)
    log_file: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    /// If not set, uses RUST_LOG environment variable or defaults to "info"
    log_level: Option<String>,
}

fn default_port() -> u16 {
    relay_types::DEFAULT_PORT
}

fn default_keep_alive_secs() -> u64 {
    DEFAULT_KEEP_ALIVE.as_secs()
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Port to listen on (always on loopback)
    pub port: u16,
    /// Seconds between keep-alive comments on open streams
    pub keep_alive_secs: u64,
    /// Path to log file (if set, logs will be written to file in addition to stdout)
    pub log_file: Option<PathBuf>,
    /// Log level (if set, used when RUST_LOG is not)
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with full priority chain: CLI args > env vars > config files > defaults.
    ///
    /// Config files are searched in this order:
    /// 1. `config.toml` in user config directory (~/.config/mcp-relay/ on Linux)
    /// 2. `.mcp-relay.toml` in current directory
    ///
    /// Environment variables use the `MCP_RELAY_` prefix with `__` between
    /// section and key, e.g. `MCP_RELAY_SERVER__PORT`.
    pub fn from_figment(port: Option<u16>, keep_alive_secs: Option<u64>) -> anyhow::Result<Self> {
        let local_config = env::current_dir().ok().map(|d| d.join(LOCAL_CONFIG_FILE));
        let user_config = directories::ProjectDirs::from("", "", "mcp-relay")
            .map(|dirs| dirs.config_dir().join("config.toml"));

        // Priority: defaults < user config < local config < env vars < CLI args
        let mut figment = Figment::new().merge(Serialized::defaults(ConfigFile::default()));

        for path in [user_config, local_config].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("MCP_RELAY_").split("__"));

        if let Some(p) = port {
            figment = figment.merge(Serialized::default("server.port", p));
        }
        if let Some(k) = keep_alive_secs {
            figment = figment.merge(Serialized::default("server.keep_alive_secs", k));
        }

        let config_file: ConfigFile = figment.extract()?;
        Ok(Self::from_file(config_file))
    }

    /// Keep-alive interval for open streams. Never zero.
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }

    fn from_file(config_file: ConfigFile) -> Self {
        Self {
            port: config_file.server.port,
            keep_alive_secs: config_file.server.keep_alive_secs,
            log_file: config_file.logging.log_file,
            log_level: config_file.logging.log_level,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn clear_env() {
        std::env::remove_var("MCP_RELAY_SERVER__PORT");
        std::env::remove_var("MCP_RELAY_SERVER__KEEP_ALIVE_SECS");
    }

    /// Run `f` with the current directory set to a fresh temp dir.
    fn in_temp_dir<T>(setup: impl FnOnce(&Path), f: impl FnOnce() -> T) -> T {
        let temp_dir = TempDir::new().unwrap();
        setup(temp_dir.path());
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();
        let result = f();
        // Restore (ignore errors)
        let _ = std::env::set_current_dir(original_dir);
        result
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3845);
        assert_eq!(config.keep_alive(), DEFAULT_KEEP_ALIVE);
        assert!(config.log_file.is_none());
    }

    #[test]
    #[serial]
    fn test_from_figment_defaults() {
        clear_env();
        let config = in_temp_dir(|_| {}, || Config::from_figment(None, None).unwrap());
        assert_eq!(config.port, relay_types::DEFAULT_PORT);
        assert_eq!(config.keep_alive_secs, 25);
    }

    #[test]
    #[serial]
    fn test_from_figment_config_file() {
        clear_env();
        let config = in_temp_dir(
            |dir| {
                fs::write(
                    dir.join(LOCAL_CONFIG_FILE),
                    r#"
[server]
port = 7777
keep_alive_secs = 5

[logging]
log_level = "debug"
"#,
                )
                .unwrap();
            },
            || Config::from_figment(None, None).unwrap(),
        );

        assert_eq!(config.port, 7777);
        assert_eq!(config.keep_alive_secs, 5);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    #[serial]
    fn test_from_figment_env_vars_override_config_file() {
        clear_env();
        std::env::set_var("MCP_RELAY_SERVER__PORT", "8888");
        let config = in_temp_dir(
            |dir| fs::write(dir.join(LOCAL_CONFIG_FILE), "[server]\nport = 7777").unwrap(),
            || Config::from_figment(None, None).unwrap(),
        );
        clear_env();

        assert_eq!(config.port, 8888);
    }

    #[test]
    #[serial]
    fn test_from_figment_cli_overrides_env_and_config() {
        clear_env();
        std::env::set_var("MCP_RELAY_SERVER__PORT", "8888");
        let config = in_temp_dir(
            |dir| fs::write(dir.join(LOCAL_CONFIG_FILE), "[server]\nport = 7777").unwrap(),
            || Config::from_figment(Some(9999), Some(3)).unwrap(),
        );
        clear_env();

        assert_eq!(config.port, 9999);
        assert_eq!(config.keep_alive_secs, 3);
    }

    #[test]
    fn test_keep_alive_never_zero() {
        let config = Config {
            keep_alive_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.keep_alive(), Duration::from_secs(1));
    }
}
