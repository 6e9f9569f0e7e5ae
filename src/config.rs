use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::toolchain::solc_select::DEFAULT_PROGRAM;
use crate::version::providers::binaries::DEFAULT_BASE_URL;

/// Default refresh interval in milliseconds (24 hours)
pub const DEFAULT_REFRESH_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

/// Environment variable overriding the installed-binaries directory
pub const BINARY_PATH_ENV: &str = "SOLCX_BINARY_PATH";

/// Top-level configuration, read from `config.json` in the data directory
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
    pub toolchain: ToolchainConfig,
}

/// Where the version catalog comes from
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    pub base_url: String,
    /// Platform directory on the binaries server (e.g. `linux-amd64`)
    pub platform: String,
    /// Local catalog file; takes precedence over the binaries server
    pub list_file: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            platform: default_platform(std::env::consts::OS).to_string(),
            list_file: None,
        }
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Cache refresh interval in milliseconds
    pub refresh_interval: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

/// Installer configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolchainConfig {
    /// Directory holding `solc-v{version}` binaries
    pub binary_path: Option<PathBuf>,
    /// Program used to install and switch compilers
    pub solc_select: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            solc_select: DEFAULT_PROGRAM.to_string(),
        }
    }
}

impl ToolchainConfig {
    /// Configured directory, else `$SOLCX_BINARY_PATH`, else `~/.solcx`
    pub fn binary_dir(&self) -> PathBuf {
        self.binary_path.clone().unwrap_or_else(|| {
            binary_dir_with_env(std::env::var(BINARY_PATH_ENV).ok(), dirs::home_dir())
        })
    }
}

impl Config {
    /// Loads `config.json` from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Maps a Rust target OS to a binaries server platform directory
pub fn default_platform(os: &str) -> &'static str {
    match os {
        "macos" => "macosx-amd64",
        "windows" => "windows-amd64",
        _ => "linux-amd64",
    }
}

/// Returns the path to the data directory for solc-pragma.
/// Uses $XDG_DATA_HOME/solc-pragma if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/solc-pragma,
/// or ./solc-pragma if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the catalog cache database.
pub fn db_path() -> PathBuf {
    data_dir().join("catalog.db")
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("solc-pragma.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("solc-pragma")
}

fn binary_dir_with_env(binary_path: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    binary_path
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".solcx")))
        .unwrap_or_else(|| PathBuf::from(".solcx"))
}
