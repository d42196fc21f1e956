//! Config file I/O: load with defaults, atomic save, XDG path helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::env_vars::substitute_variables;
use crate::error::ConfigError;

impl Config {
    /// Load configuration from the default path, creating it if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, writing a default file there if missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Config path: {:?}", path);

        if !path.exists() {
            log::info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            config
                .save_to(path)
                .with_context(|| format!("failed to write default config to {}", path.display()))?;
            return Ok(config);
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(metadata) = fs::metadata(path) {
                let mode = metadata.permissions().mode();
                if mode & 0o044 != 0 {
                    log::warn!(
                        "Config file {:?} is readable by group or others (mode {:04o}) and may hold API keys. Run: chmod 600 {:?}",
                        path,
                        mode & 0o777,
                        path,
                    );
                }
            }
        }

        let config = Self::read(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let contents = substitute_variables(&contents);
        let config: Config = serde_yaml_ng::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path` via a temp file and rename.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Configuration file path: `~/.config/errflow/config.yaml`.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Configuration directory (XDG convention, `%APPDATA%` on Windows).
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|dir| dir.join("errflow"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config").join("errflow"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }
}
