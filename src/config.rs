//! Compiler configuration
//!
//! Loaded from an optional TOML file; every key falls back to the built-in
//! defaults in [`DEFAULT_CONFIG`].

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::properties::DefaultContext;
use crate::scene::GridSettings;
use crate::values::{Color, ValueParseError};

/// Errors that can occur when loading or parsing a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid value for '{key}': {source}")]
    ValueError {
        key: String,
        #[source]
        source: ValueParseError,
    },
    #[error("Invalid error_mode '{0}' (expected \"first\" or \"all\")")]
    InvalidErrorMode(String),
    #[error("Invalid cell_size {0} (must be positive)")]
    InvalidCellSize(f64),
}

/// Whether a document stops at its first bad cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    #[default]
    FirstError,
    CollectAll,
}

impl ErrorMode {
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().replace('-', "_").as_str() {
            "first" | "first_error" => Some(ErrorMode::FirstError),
            "all" | "collect_all" => Some(ErrorMode::CollectAll),
            _ => None,
        }
    }
}

/// Fallback styling for shapes that do not set it themselves
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDefaults {
    pub fill: Color,
    pub border_color: Color,
    pub border_width: u32,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            fill: Color::rgb(0xff, 0, 0),
            border_color: Color::rgb(0xff, 0, 0),
            border_width: 0,
        }
    }
}

/// Configuration for the compile pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct CompileConfig {
    pub error_mode: ErrorMode,
    /// Grid drawing settings, passed through to the compiled document
    pub grid: GridSettings,
    pub shapes: ShapeDefaults,
}

/// Built-in configuration, as a config file would spell it
pub const DEFAULT_CONFIG: &str = r##"
error_mode = "first"

[grid]
background = "#ffffff"
line_color = "#000000"
line_width = 1
cell_size = 16.0
over_shapes = true

[shapes]
fill = "#ff0000"
border_color = "#ff0000"
border_width = 0
"##;

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    error_mode: Option<String>,
    grid: Option<TomlGrid>,
    shapes: Option<TomlShapes>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlGrid {
    #[serde(alias = "bg_color")]
    background: Option<String>,
    #[serde(alias = "border_color")]
    line_color: Option<String>,
    #[serde(alias = "border_width")]
    line_width: Option<u32>,
    cell_size: Option<f64>,
    #[serde(alias = "grid_over_components")]
    over_shapes: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlShapes {
    fill: Option<String>,
    border_color: Option<String>,
    border_width: Option<u32>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::FirstError,
            grid: GridSettings::default(),
            shapes: ShapeDefaults::default(),
        }
    }
}

impl CompileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(mode) = parsed.error_mode {
            config.error_mode =
                ErrorMode::parse(&mode).ok_or(ConfigError::InvalidErrorMode(mode))?;
        }
        if let Some(grid) = parsed.grid {
            if let Some(color) = grid.background {
                config.grid.background = parse_color("grid.background", &color)?;
            }
            if let Some(color) = grid.line_color {
                config.grid.line_color = parse_color("grid.line_color", &color)?;
            }
            if let Some(width) = grid.line_width {
                config.grid.line_width = width;
            }
            if let Some(size) = grid.cell_size {
                if !(size > 0.0 && size.is_finite()) {
                    return Err(ConfigError::InvalidCellSize(size));
                }
                config.grid.cell_size = size;
            }
            if let Some(over) = grid.over_shapes {
                config.grid.over_shapes = over;
            }
        }
        if let Some(shapes) = parsed.shapes {
            if let Some(fill) = shapes.fill {
                config.shapes.fill = parse_color("shapes.fill", &fill)?;
            }
            if let Some(color) = shapes.border_color {
                config.shapes.border_color = parse_color("shapes.border_color", &color)?;
            }
            if let Some(width) = shapes.border_width {
                config.shapes.border_width = width;
            }
        }

        Ok(config)
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn with_cell_size(mut self, size: f64) -> Self {
        self.grid.cell_size = size;
        self
    }

    /// Shape defaults before any cell-level override
    pub fn default_context(&self) -> DefaultContext {
        DefaultContext {
            fill: self.shapes.fill.clone(),
            border_color: self.shapes.border_color.clone(),
            border_width: self.shapes.border_width,
            orientation: None,
            base_width: None,
            base_height: None,
        }
    }
}

fn parse_color(key: &str, text: &str) -> Result<Color, ConfigError> {
    Color::parse(text).map_err(|source| ConfigError::ValueError {
        key: key.to_string(),
        source,
    })
}
