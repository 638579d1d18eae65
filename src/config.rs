//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/branchtree/branchtree.toml`
//! 3. Local config: `--config <file>` or `./.branchtree.toml`
//! 4. Environment variables: `BRANCHTREE_*` prefix, `__` between table and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{validate_spacing, DomainError, Point};

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".branchtree.toml";

/// Geometry of the editor canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Distance between stacked nodes and between sibling branches
    pub grid_spacing: f64,
    /// Position of the middle node of the main branch after a reset
    pub origin_x: f64,
    pub origin_y: f64,
    /// Maximum pointer distance for a click to hit a node
    pub hit_radius: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            grid_spacing: 60.0,
            origin_x: 0.0,
            origin_y: 0.0,
            hit_radius: 12.0,
        }
    }
}

impl LayoutSettings {
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    /// Rejects values the layout cannot work with.
    pub fn validate(&self) -> ApplicationResult<()> {
        validate_spacing(self.grid_spacing)?;
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return Err(DomainError::InvalidLayout {
                name: "hit_radius",
                value: self.hit_radius,
            }
            .into());
        }
        for (name, value) in [("origin_x", self.origin_x), ("origin_y", self.origin_y)] {
            if !value.is_finite() {
                return Err(DomainError::InvalidLayout { name, value }.into());
            }
        }
        Ok(())
    }

    fn merge(&self, overlay: &RawLayoutSettings) -> Self {
        Self {
            grid_spacing: overlay.grid_spacing.unwrap_or(self.grid_spacing),
            origin_x: overlay.origin_x.unwrap_or(self.origin_x),
            origin_y: overlay.origin_y.unwrap_or(self.origin_y),
            hit_radius: overlay.hit_radius.unwrap_or(self.hit_radius),
        }
    }
}

/// Raw layout table for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub grid_spacing: Option<f64>,
    pub origin_x: Option<f64>,
    pub origin_y: Option<f64>,
    pub hit_radius: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutSettings,
}

/// Unified configuration for branchtree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
}

/// Get the XDG config directory for branchtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "branchtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("branchtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
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
            layout: self.layout.merge(&overlay.layout),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit config file; must exist when given. Without it,
    ///   `./.branchtree.toml` is used if present.
    pub fn load(local: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        match local {
            Some(path) => {
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                let fallback = Path::new(LOCAL_CONFIG_FILE);
                if fallback.exists() {
                    current = current.merge_with(&load_raw_settings(fallback)?);
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.layout.validate()?;
        Ok(current)
    }

    /// Load only a single file on top of the defaults (no global, no env).
    pub fn load_file(path: &Path) -> ApplicationResult<Self> {
        let settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.layout.validate()?;
        Ok(settings)
    }

    /// Apply BRANCHTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BRANCHTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let layout = &mut settings.layout;
        for (key, slot) in [
            ("layout.grid_spacing", &mut layout.grid_spacing),
            ("layout.origin_x", &mut layout.origin_x),
            ("layout.origin_y", &mut layout.origin_y),
            ("layout.hit_radius", &mut layout.hit_radius),
        ] {
            match config.get_float(key) {
                Ok(val) => *slot = val,
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => return Err(config_err(e)),
            }
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# branchtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/branchtree/branchtree.toml
#   Local:  --config <file>, or ./.branchtree.toml
#   Env:    BRANCHTREE_LAYOUT__GRID_SPACING=80 etc.

[layout]
# Distance between stacked nodes and between sibling branches
# grid_spacing = 60.0

# Middle node of the main branch after a reset
# origin_x = 0.0
# origin_y = 0.0

# How close a click must land to select a node
# hit_radius = 12.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_validating_then_passes() {
        let layout = LayoutSettings::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.grid_spacing, 60.0);
        assert_eq!(layout.hit_radius, 12.0);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_inherit() {
        let base = LayoutSettings::default();
        let overlay = RawLayoutSettings {
            grid_spacing: Some(40.0),
            origin_y: Some(300.0),
            ..RawLayoutSettings::default()
        };

        let merged = base.merge(&overlay);

        assert_eq!(merged.grid_spacing, 40.0);
        assert_eq!(merged.origin_x, 0.0);
        assert_eq!(merged.origin_y, 300.0);
        assert_eq!(merged.hit_radius, 12.0);
    }

    #[test]
    fn given_zero_hit_radius_when_validating_then_errors() {
        let layout = LayoutSettings {
            hit_radius: 0.0,
            ..LayoutSettings::default()
        };
        let err = layout.validate().unwrap_err();
        assert!(err.to_string().contains("hit_radius"));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }

    #[test]
    fn given_settings_when_rendered_then_contains_layout_table() {
        let text = Settings::default().to_toml().expect("serialize");
        assert!(text.contains("[layout]"));
        assert!(text.contains("grid_spacing = 60.0"));
    }
}
