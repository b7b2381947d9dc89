//! reveal.toml handling

use anyhow::{Context, Result};
use ink_reveal::RevealConfiguration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "reveal.toml";

/// Top-level CLI configuration (reveal.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub reveal: RevealConfiguration,
}

/// Headless render settings
#[derive(Debug, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Logical surface width
    #[serde(default = "default_width")]
    pub width: f32,
    /// Logical surface height
    #[serde(default = "default_height")]
    pub height: f32,
    /// Device pixel ratio of the simulated display
    #[serde(default = "default_dpr")]
    pub dpr: f32,
    /// Simulated display refresh rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Directory frames are written to
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Write every nth frame; the final frame is always written
    #[serde(default = "default_every")]
    pub every: u32,
    /// Separate placeholder image; defaults to a blurred copy of the source
    #[serde(default)]
    pub placeholder: Option<PathBuf>,
}

fn default_width() -> f32 {
    640.0
}

fn default_height() -> f32 {
    480.0
}

fn default_dpr() -> f32 {
    1.0
}

fn default_fps() -> u32 {
    60
}

fn default_output() -> PathBuf {
    PathBuf::from("frames")
}

fn default_every() -> u32 {
    1
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            dpr: default_dpr(),
            fps: default_fps(),
            output: default_output(),
            every: default_every(),
            placeholder: None,
        }
    }
}

impl CliConfig {
    /// Load from a file, or from reveal.toml inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found at {}. Run `ink-reveal init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: CliConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config
            .reveal
            .validate()
            .with_context(|| format!("Invalid [reveal] table in {}", config_path.display()))?;
        if config.render.fps == 0 {
            anyhow::bail!("[render] fps must be at least 1");
        }

        Ok(config)
    }

    /// Load if a path was given or reveal.toml exists here; defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write a default reveal.toml into `dir`, returning its path
    pub fn scaffold(dir: &Path, force: bool) -> Result<PathBuf> {
        let target = dir.join(CONFIG_FILE);
        if target.exists() && !force {
            anyhow::bail!(
                "{} already exists. Pass --force to overwrite it.",
                target.display()
            );
        }

        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        fs::write(&target, Self::default().to_toml()?)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(target)
    }
}
