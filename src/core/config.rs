//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.docs-chat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::{BackendKind, Theme};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub backend: Option<BackendKind>,
    pub theme: Option<Theme>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointsConfig {
    pub base_url: Option<String>,
    pub session_path: Option<String>,
    pub chat_path: Option<String>,
    /// Full URL; wins over `base_url` + `session_path`.
    pub session_url: Option<String>,
    /// Full URL; wins over `base_url` + `chat_path`.
    pub chat_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SESSION_PATH: &str = "/api/chat/session";
pub const DEFAULT_CHAT_PATH: &str = "/api/chat";
pub const DEFAULT_LOG_FILE: &str = "docs-chat.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

pub const ENV_BACKEND: &str = "DOCS_CHAT_BACKEND";
pub const ENV_BASE_URL: &str = "DOCS_CHAT_BASE_URL";
pub const ENV_SESSION_URL: &str = "DOCS_CHAT_SESSION_URL";
pub const ENV_CHAT_URL: &str = "DOCS_CHAT_CHAT_URL";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: BackendKind,
    pub theme: Theme,
    pub session_url: String,
    pub chat_url: String,
    pub log_file: String,
    pub log_level: LevelFilter,
    /// Problems found while resolving, to be logged once the logger exists.
    pub warnings: Vec<String>,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub backend: Option<BackendKind>,
    pub theme: Option<Theme>,
    pub session_url: Option<String>,
    pub chat_url: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.docs-chat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".docs-chat").join("config.toml"))
}

/// Load config from `~/.docs-chat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatConfig::default());
        }
    };
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<ChatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# docs-chat Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# backend = "http"                   # "http" or "mock" (offline canned replies)
# theme = "light"                    # "light" or "dark"
# log_file = "docs-chat.log"
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"

# [endpoints]
# base_url = "http://localhost:3000" # Or set DOCS_CHAT_BASE_URL env var
# session_path = "/api/chat/session"
# chat_path = "/api/chat"
# session_url = "https://docs.example.com/api/chat/session"  # Full override, or DOCS_CHAT_SESSION_URL
# chat_url = "https://docs.example.com/api/chat"             # Full override, or DOCS_CHAT_CHAT_URL
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &ChatConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let mut warnings = Vec::new();

    // Backend: CLI → env → config → default
    let backend = cli
        .backend
        .or_else(|| env(ENV_BACKEND).and_then(|v| parse_backend(&v, &mut warnings)))
        .or(config.general.backend)
        .unwrap_or_default();

    let theme = cli.theme.or(config.general.theme).unwrap_or_default();

    // Base URL: env → config → default
    let base_url = env(ENV_BASE_URL)
        .or_else(|| config.endpoints.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Endpoints: CLI → env → config full URL → base_url + path
    let session_url = cli
        .session_url
        .clone()
        .or_else(|| env(ENV_SESSION_URL))
        .or_else(|| config.endpoints.session_url.clone())
        .unwrap_or_else(|| {
            let path = config
                .endpoints
                .session_path
                .as_deref()
                .unwrap_or(DEFAULT_SESSION_PATH);
            join_url(&base_url, path)
        });

    let chat_url = cli
        .chat_url
        .clone()
        .or_else(|| env(ENV_CHAT_URL))
        .or_else(|| config.endpoints.chat_url.clone())
        .unwrap_or_else(|| {
            let path = config
                .endpoints
                .chat_path
                .as_deref()
                .unwrap_or(DEFAULT_CHAT_PATH);
            join_url(&base_url, path)
        });

    let log_level = match config.general.log_level.as_deref() {
        Some(level) => level.parse::<LevelFilter>().unwrap_or_else(|_| {
            warnings.push(format!(
                "Unknown log level {:?}, using {}",
                level, DEFAULT_LOG_LEVEL
            ));
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    ResolvedConfig {
        backend,
        theme,
        session_url,
        chat_url,
        log_file: config
            .general
            .log_file
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        log_level,
        warnings,
    }
}

fn parse_backend(value: &str, warnings: &mut Vec<String>) -> Option<BackendKind> {
    match <BackendKind as ValueEnum>::from_str(value, true) {
        Ok(kind) => Some(kind),
        Err(_) => {
            warnings.push(format!(
                "Ignoring {}={:?}: expected \"http\" or \"mock\"",
                ENV_BACKEND, value
            ));
            None
        }
    }
}

/// Joins a base URL and a path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
