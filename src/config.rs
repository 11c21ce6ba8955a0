//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/arbor/arbor.toml`
//! 3. Local config: `<dir>/.arbor.toml` (working directory unless given)
//! 4. Environment variables: `ARBOR_*` prefix, `__` between sections (`ARBOR_RENDER__INDENT=4`)

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::OutlineStyle;

/// How trees are printed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Indented `+- value` lines
    #[default]
    Outline,
    /// Box-drawing tree
    Tree,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Output style for `render`
    pub style: RenderStyle,
    /// Spaces per outline level, also used when reading outlines
    pub indent: usize,
    /// Text before each outline value
    pub prefix: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let outline = OutlineStyle::default();
        Self {
            style: RenderStyle::default(),
            indent: outline.indent,
            prefix: outline.prefix,
        }
    }
}

/// Raw render settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub style: Option<RenderStyle>,
    pub indent: Option<usize>,
    pub prefix: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderSettings,
}

impl RenderSettings {
    /// Overlay wins for every field it specifies.
    pub fn merge(&self, overlay: &RawRenderSettings) -> Self {
        Self {
            style: overlay.style.unwrap_or(self.style),
            indent: overlay.indent.unwrap_or(self.indent),
            prefix: overlay
                .prefix
                .clone()
                .unwrap_or_else(|| self.prefix.clone()),
        }
    }

    pub fn outline_style(&self) -> OutlineStyle {
        OutlineStyle {
            indent: self.indent,
            prefix: self.prefix.clone(),
        }
    }
}

/// Unified configuration for arbor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
}

/// Get the XDG config directory for arbor.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "arbor").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("arbor.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".arbor.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: self.render.merge(&overlay.render),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.arbor.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!(path = %local_path.display(), "local config");
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply ARBOR_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ARBOR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("render.style") {
            settings.render.style =
                RenderStyle::from_str(&val, true).map_err(|e| ApplicationError::Config {
                    message: format!("ARBOR_RENDER__STYLE: {e}"),
                })?;
        }
        if let Ok(val) = config.get::<usize>("render.indent") {
            settings.render.indent = val;
        }
        if let Ok(val) = config.get_string("render.prefix") {
            settings.render.prefix = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.render.indent == 0 {
            return Err(ApplicationError::Config {
                message: "render.indent must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# arbor configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/arbor/arbor.toml
#   Local:  ./.arbor.toml
#   Env:    ARBOR_RENDER__STYLE, ARBOR_RENDER__INDENT, ARBOR_RENDER__PREFIX

[render]
# Output of `arbor render`: "outline" or "tree"
# style = "outline"

# Spaces per outline level (also used to read outline files)
# indent = 2

# Text written before each outline value
# prefix = "+- "
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
