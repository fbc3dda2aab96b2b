//! Configuration management for the Omnisearch MCP Server.
//!
//! This module handles loading and validating configuration from environment variables.
//! An optional `.env` file is read through `dotenvy`, which never writes to stdout
//! (stdout carries MCP traffic).

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;

const SETTINGS_FILE_NAME: &str = "settings.json";
const SYSTEM_APPLICATIONS_DIR: &str = "/usr/share/applications";

/// Configuration for the Omnisearch MCP Server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted settings record
    pub data_dir: PathBuf,

    /// Directories scanned for `.desktop` entries, highest priority first
    pub app_dirs: Vec<PathBuf>,

    /// Optional JSON contact book
    pub contacts_file: Option<PathBuf>,

    /// Results kept per provider per query (default: 20)
    pub max_results_per_provider: usize,

    /// Results kept in the merged list (default: 50)
    pub max_merged_results: usize,

    /// How long the app and contact lists are cached, in seconds (default: 300)
    pub apps_cache_ttl_secs: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `OMNISEARCH_DATA_DIR`: settings directory (default: `./omnisearch-data`)
    /// - `OMNISEARCH_APP_DIRS`: `:`-separated desktop entry directories
    /// - `OMNISEARCH_CONTACTS_FILE`: JSON contact book
    /// - `MAX_RESULTS_PER_PROVIDER`: per-provider result cap (default: 20)
    /// - `MAX_MERGED_RESULTS`: merged result cap (default: 50)
    /// - `APPS_CACHE_TTL_SECS`: candidate cache TTL (default: 300)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let data_dir = env::var("OMNISEARCH_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let app_dirs = match env::var("OMNISEARCH_APP_DIRS") {
            Ok(val) => Self::parse_dir_list("OMNISEARCH_APP_DIRS", &val)?,
            Err(_) => defaults.app_dirs,
        };

        let contacts_file = env::var("OMNISEARCH_CONTACTS_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let max_results_per_provider = Self::parse_env_usize("MAX_RESULTS_PER_PROVIDER", 20)?;
        let max_merged_results = Self::parse_env_usize("MAX_MERGED_RESULTS", 50)?;
        let apps_cache_ttl_secs = Self::parse_env_u64("APPS_CACHE_TTL_SECS", 300)?;

        for (var, value) in [
            ("MAX_RESULTS_PER_PROVIDER", max_results_per_provider),
            ("MAX_MERGED_RESULTS", max_merged_results),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    var: var.to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            data_dir,
            app_dirs,
            contacts_file,
            max_results_per_provider,
            max_merged_results,
            apps_cache_ttl_secs,
            log_level,
        })
    }

    /// Path of the persisted settings record.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE_NAME)
    }

    /// Desktop entry directories used when none are configured: the user's
    /// own entries first so they shadow system ones.
    pub fn default_app_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Ok(home) = env::var("HOME") {
            if !home.trim().is_empty() {
                dirs.push(PathBuf::from(home).join(".local/share/applications"));
            }
        }
        dirs.push(PathBuf::from(SYSTEM_APPLICATIONS_DIR));
        dirs
    }

    /// Parse a `:`-separated directory list, skipping empty segments.
    fn parse_dir_list(var_name: &str, val: &str) -> ConfigResult<Vec<PathBuf>> {
        let dirs: Vec<PathBuf> = val
            .split(':')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        if dirs.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Must list at least one directory".to_string(),
            });
        }
        Ok(dirs)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("./omnisearch-data"),
            app_dirs: Self::default_app_dirs(),
            contacts_file: None,
            max_results_per_provider: 20,
            max_merged_results: 50,
            apps_cache_ttl_secs: 300,
            log_level: "error".to_string(),
        }
    }
}
