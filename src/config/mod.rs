//! CLI configuration resolution
//!
//! Each setting is resolved in precedence order:
//! 1. CLI flag
//! 2. Environment variable
//! 3. Built-in default

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the inventory path
pub const INVENTORY_ENV: &str = "NODE_LABELS_INVENTORY";

/// Environment variable overriding the log filter
pub const LOG_LEVEL_ENV: &str = "NODE_LABELS_LOG";

/// Log filter used when nothing else is configured
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Inventory location relative to `$HOME`
pub const DEFAULT_INVENTORY_PATH: &str = ".config/node-labels/inventory.toml";

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Env,
    Cli,
}

/// A setting together with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub origin: ConfigOrigin,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HOME environment variable not set; pass --inventory or set NODE_LABELS_INVENTORY")]
    NoHome,
}

/// Resolve the inventory path from the process environment.
pub fn inventory_path(cli: Option<PathBuf>) -> Result<Resolved<PathBuf>, ConfigError> {
    resolve_inventory_path(
        cli,
        std::env::var(INVENTORY_ENV).ok(),
        std::env::var("HOME").ok(),
    )
}

/// Resolve the inventory path from explicit inputs.
pub fn resolve_inventory_path(
    cli: Option<PathBuf>,
    env: Option<String>,
    home: Option<String>,
) -> Result<Resolved<PathBuf>, ConfigError> {
    if let Some(path) = cli {
        return Ok(Resolved {
            value: path,
            origin: ConfigOrigin::Cli,
        });
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return Ok(Resolved {
            value: PathBuf::from(path),
            origin: ConfigOrigin::Env,
        });
    }
    let home = home.filter(|h| !h.is_empty()).ok_or(ConfigError::NoHome)?;
    Ok(Resolved {
        value: PathBuf::from(home).join(DEFAULT_INVENTORY_PATH),
        origin: ConfigOrigin::Builtin,
    })
}

/// Resolve the log filter from the process environment.
pub fn log_level(cli: Option<String>) -> Resolved<String> {
    resolve_log_level(cli, std::env::var(LOG_LEVEL_ENV).ok())
}

/// Resolve the log filter from explicit inputs.
pub fn resolve_log_level(cli: Option<String>, env: Option<String>) -> Resolved<String> {
    match (cli, env.filter(|e| !e.is_empty())) {
        (Some(level), _) => Resolved {
            value: level,
            origin: ConfigOrigin::Cli,
        },
        (None, Some(level)) => Resolved {
            value: level,
            origin: ConfigOrigin::Env,
        },
        (None, None) => Resolved {
            value: DEFAULT_LOG_LEVEL.to_string(),
            origin: ConfigOrigin::Builtin,
        },
    }
}
