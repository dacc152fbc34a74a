//! Configuration loading for scour.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

/// Environment variable pointing at an alternate config file.
pub const CONFIG_ENV: &str = "SCOUR_CONFIG";

/// Environment variable overriding the workspace root directly.
pub const WORKSPACE_ENV: &str = "SCOUR_WORKSPACE";

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

/// Configuration for the workspace location.
#[derive(Debug, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_workspace_root")]
    pub root: String,
}

fn default_workspace_root() -> String {
    "~/.agent/workspace".to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
        }
    }
}

impl Config {
    /// Load config from `$SCOUR_CONFIG`, then the platform config dir,
    /// falling back to defaults when no file exists. `$SCOUR_WORKSPACE`
    /// overrides the workspace root regardless of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                toml::from_str(&contents)?
            }
            _ => Config::default(),
        };

        if let Ok(root) = std::env::var(WORKSPACE_ENV)
            && !root.is_empty()
        {
            config.workspace.root = root;
        }

        Ok(config)
    }

    /// The config file location: `$SCOUR_CONFIG` wins, otherwise
    /// `~/.config/scour/config.toml` (per-platform).
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "scour").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The configured workspace root, tilde-expanded.
    #[must_use]
    pub fn workspace_root(&self) -> PathBuf {
        expand_tilde(&self.workspace.root)
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}
