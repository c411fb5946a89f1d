use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::palette::PaletteConfig;

pub mod palette;

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "NoteFmt";
const APP_NAME: &str = "notefmt";

pub const CONFIG_ENV: &str = "NOTEFMT_CONFIG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("palette color `{slot}` has unsupported value {value:?}")]
    InvalidColor { slot: String, value: String },
}

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        if !self.paths.config_file.exists() {
            let default_cfg = AppConfig::default();
            self.write_default_config(&default_cfg)?;
            tracing::debug!(path = %self.paths.config_file.display(), "wrote default config");
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load()?;
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var(CONFIG_ENV).ok().map(PathBuf::from);

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;

        let config_dir = override_config
            .clone()
            .map(|p| {
                if p.is_dir() {
                    p
                } else {
                    p.parent().map(Path::to_path_buf).unwrap_or(p)
                }
            })
            .unwrap_or_else(|| project_dirs.config_dir().to_path_buf());

        let config_file = override_config
            .filter(|p| p.is_file() || p.extension().is_some())
            .unwrap_or_else(|| config_dir.join("config.toml"));

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn from_file(config_file: PathBuf) -> Self {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            config_dir,
            config_file,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub caret: CaretPolicy,
    pub palette: PaletteConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    fn post_load(&mut self) -> Result<()> {
        self.palette
            .validate()
            .context("validating palette colors")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay between a paste and the pipeline run it schedules
    pub paste_debounce_ms: u64,
    /// How long the copy control shows its "Copied!" label
    pub copy_feedback_ms: u64,
    pub refresh_flash_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            paste_debounce_ms: 100,
            copy_feedback_ms: 1500,
            refresh_flash_ms: 300,
        }
    }
}

impl SessionConfig {
    pub fn paste_debounce(&self) -> Duration {
        Duration::from_millis(self.paste_debounce_ms)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    pub fn refresh_flash(&self) -> Duration {
        Duration::from_millis(self.refresh_flash_ms)
    }
}

/// Where the caret lands after the input surface is recolored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CaretPolicy {
    #[default]
    End,
    Preserve,
}
