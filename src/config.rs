//! Configuration for claimlens paths and limits.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CLAIMLENS_HOME, CLAIMLENS_DATA)
//! 2. Config file (.claimlens/config.yaml)
//! 3. Defaults (~/.claimlens)
//!
//! Config file discovery:
//! - Searches current directory and parents for .claimlens/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<std::result::Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub limits: Option<LimitsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Engine state directory (relative to config file)
    pub home: Option<String>,
    /// Data directory for feedback and history (relative to config file)
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub adapter_timeout_seconds: Option<u64>,
    pub history_depth: Option<usize>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to claimlens home (engine state)
    pub home: PathBuf,
    /// Absolute path to the data directory
    pub data: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Runtime limits
    pub limits: LimitSettings,
}

#[derive(Debug, Clone)]
pub struct LimitSettings {
    /// Wall-clock budget for one adapter collection pass
    pub adapter_timeout_seconds: u64,
    /// Snapshots kept when comparing claim history
    pub history_depth: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            adapter_timeout_seconds: 60,
            history_depth: 5,
        }
    }
}

impl ResolvedConfig {
    /// Analyst feedback event log
    pub fn feedback_events_path(&self) -> PathBuf {
        self.data.join("feedback").join("events.jsonl")
    }

    /// Feedback-derived scoring adjustment store
    pub fn adjustments_path(&self) -> PathBuf {
        self.data.join("feedback").join("rule_adjustments.json")
    }

    /// Per-company claim history files
    pub fn history_dir(&self) -> PathBuf {
        self.data.join("historical")
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".claimlens").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".claimlens");

    let config_file = find_config_file();

    let (home, data, limits) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .claimlens/
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        let home = if let Ok(env_home) = std::env::var("CLAIMLENS_HOME") {
            PathBuf::from(env_home)
        } else if let Some(ref home_path) = config.paths.home {
            let claimlens_dir = config_path.parent().unwrap_or(Path::new("."));
            resolve_path(claimlens_dir, home_path)
        } else {
            default_home.clone()
        };

        let data = if let Ok(env_data) = std::env::var("CLAIMLENS_DATA") {
            PathBuf::from(env_data)
        } else if let Some(ref data_path) = config.paths.data {
            resolve_path(base_dir, data_path)
        } else {
            home.join("data")
        };

        let limits = LimitSettings {
            adapter_timeout_seconds: config
                .limits
                .as_ref()
                .and_then(|l| l.adapter_timeout_seconds)
                .unwrap_or(60),
            history_depth: config
                .limits
                .as_ref()
                .and_then(|l| l.history_depth)
                .unwrap_or(5),
        };

        (home, data, limits)
    } else {
        let home = std::env::var("CLAIMLENS_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_home.clone());

        let data = std::env::var("CLAIMLENS_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join("data"));

        (home, data, LimitSettings::default())
    };

    Ok(ResolvedConfig {
        home,
        data,
        config_file,
        limits,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let claimlens_dir = temp.path().join(".claimlens");
        std::fs::create_dir_all(&claimlens_dir).unwrap();

        let config_path = claimlens_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./
  data: ../data
limits:
  adapter_timeout_seconds: 30
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./".to_string()));
        assert_eq!(config.paths.data, Some("../data".to_string()));
        assert_eq!(
            config.limits.unwrap().adapter_timeout_seconds,
            Some(30)
        );
    }

    #[test]
    fn test_derived_paths() {
        let config = ResolvedConfig {
            home: PathBuf::from("/test/.claimlens"),
            data: PathBuf::from("/test/data"),
            config_file: None,
            limits: LimitSettings::default(),
        };

        assert_eq!(
            config.feedback_events_path(),
            PathBuf::from("/test/data/feedback/events.jsonl")
        );
        assert_eq!(
            config.adjustments_path(),
            PathBuf::from("/test/data/feedback/rule_adjustments.json")
        );
        assert_eq!(config.history_dir(), PathBuf::from("/test/data/historical"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
    }
}
