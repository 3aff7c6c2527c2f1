//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/primetree/primetree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `PRIMETREE_*` prefix, `__` separates sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, Strategy};
use crate::domain::LayoutConfig;

/// Unified configuration for primetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Pair selection for automatic decomposition
    pub strategy: Strategy,
    /// Directory for relative output paths (default: cwd)
    pub output_dir: PathBuf,
    /// Colored terminal output
    pub color: bool,
    /// Canvas geometry
    pub layout: LayoutConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            strategy: Strategy::default(),
            output_dir: PathBuf::from("."),
            color: true,
        }
    }
}

/// Raw layout section, fields are Option to detect "not specified".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayout {
    pub canvas_width: Option<f64>,
    pub canvas_height: Option<f64>,
    pub root_y: Option<f64>,
    pub level_gap: Option<f64>,
    pub spread_base: Option<f64>,
    pub depth_bias: Option<f64>,
    pub popup_offset_x: Option<f64>,
    pub node_radius: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayout,
    pub strategy: Option<Strategy>,
    pub output_dir: Option<PathBuf>,
    pub color: Option<bool>,
}

/// Overlay a raw layout section onto a complete one.
fn merge_layout(base: &LayoutConfig, o: &RawLayout) -> LayoutConfig {
    LayoutConfig {
        canvas_width: o.canvas_width.unwrap_or(base.canvas_width),
        canvas_height: o.canvas_height.unwrap_or(base.canvas_height),
        root_y: o.root_y.unwrap_or(base.root_y),
        level_gap: o.level_gap.unwrap_or(base.level_gap),
        spread_base: o.spread_base.unwrap_or(base.spread_base),
        depth_bias: o.depth_bias.unwrap_or(base.depth_bias),
        popup_offset_x: o.popup_offset_x.unwrap_or(base.popup_offset_x),
        node_radius: o.node_radius.unwrap_or(base.node_radius),
    }
}

/// Get the XDG config directory for primetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "primetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("primetree.toml"))
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input unchanged on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay: scalars win if specified, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: merge_layout(&self.layout, &overlay.layout),
            strategy: overlay.strategy.unwrap_or(self.strategy),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output_dir.to_string_lossy().as_ref());
        self.output_dir = PathBuf::from(expanded);
    }

    /// Reject geometry that would divide by zero or collapse the canvas.
    fn validate(&self) -> Result<(), ApplicationError> {
        let l = &self.layout;
        for (key, val) in [
            ("canvas_width", l.canvas_width),
            ("canvas_height", l.canvas_height),
            ("level_gap", l.level_gap),
            ("spread_base", l.spread_base),
            ("depth_bias", l.depth_bias),
            ("node_radius", l.node_radius),
        ] {
            if val.is_nan() || val <= 0.0 {
                return Err(ApplicationError::Config {
                    message: format!("layout.{key} must be positive, got {val}"),
                });
            }
        }
        for (key, val) in [("root_y", l.root_y), ("popup_offset_x", l.popup_offset_x)] {
            if !val.is_finite() {
                return Err(ApplicationError::Config {
                    message: format!("layout.{key} must be finite, got {val}"),
                });
            }
        }
        Ok(())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file; it must exist when given
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            debug!("loading config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply PRIMETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PRIMETREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let layout = &mut settings.layout;
        for (key, slot) in [
            ("layout.canvas_width", &mut layout.canvas_width),
            ("layout.canvas_height", &mut layout.canvas_height),
            ("layout.root_y", &mut layout.root_y),
            ("layout.level_gap", &mut layout.level_gap),
            ("layout.spread_base", &mut layout.spread_base),
            ("layout.depth_bias", &mut layout.depth_bias),
            ("layout.popup_offset_x", &mut layout.popup_offset_x),
            ("layout.node_radius", &mut layout.node_radius),
        ] {
            if let Ok(val) = config.get_float(key) {
                *slot = val;
            }
        }
        if let Ok(val) = config.get::<Strategy>("strategy") {
            settings.strategy = val;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Serialize the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
