//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::Direction;
use crate::error::ConfigError;
use crate::kicad::BoardSetup;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Directory holding `.kicad_mod` footprint files.
    #[serde(default = "default_footprint_dir")]
    pub footprint_dir: PathBuf,

    /// Relative placement settings.
    #[serde(default)]
    pub placement: PlacementConfig,

    /// Board setup settings.
    #[serde(default)]
    pub board: BoardConfig,

    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placement.gap_mm < 0.0 {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "placement gap must be non-negative, got {}",
                    self.placement.gap_mm
                ),
            });
        }

        if self.placement.direction.parse::<Direction>().is_err() {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "invalid placement direction '{}'. Must be one of: top, bottom, left, right",
                    self.placement.direction
                ),
            });
        }

        if self.board.thickness_mm <= 0.0 {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "board thickness must be positive, got {}",
                    self.board.thickness_mm
                ),
            });
        }

        if self.board.last_trace_width_mm <= 0.0 {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "trace width must be positive, got {}",
                    self.board.last_trace_width_mm
                ),
            });
        }

        if self.board.paper.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "paper size must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _schema: None,
            _comment: None,
            footprint_dir: default_footprint_dir(),
            placement: PlacementConfig::default(),
            board: BoardConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_footprint_dir() -> PathBuf {
    PathBuf::from("data/footprints")
}

/// Relative placement configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementConfig {
    /// Gap between bounding boxes in mm when chaining parts.
    #[serde(default = "default_gap")]
    pub gap_mm: f64,

    /// Chain direction: "top", "bottom", "left", "right".
    #[serde(default = "default_direction")]
    pub direction: String,

    /// Board position of the first placed part, in mm.
    #[serde(default)]
    pub origin_mm: [f64; 2],
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap_mm: default_gap(),
            direction: default_direction(),
            origin_mm: [0.0, 0.0],
        }
    }
}

fn default_gap() -> f64 {
    2.0
}

fn default_direction() -> String {
    "right".to_string()
}

/// Board setup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    /// Paper size for the page frame (e.g., "A4").
    #[serde(default = "default_paper")]
    pub paper: String,

    /// Board thickness in mm.
    #[serde(default = "default_thickness")]
    pub thickness_mm: f64,

    /// Default trace width in mm.
    #[serde(default = "default_trace_width")]
    pub last_trace_width_mm: f64,
}

impl BoardConfig {
    /// Converts to the board writer's setup block.
    #[must_use]
    pub fn setup(&self) -> BoardSetup {
        BoardSetup {
            paper: self.paper.clone(),
            thickness_mm: self.thickness_mm,
            last_trace_width_mm: self.last_trace_width_mm,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            paper: default_paper(),
            thickness_mm: default_thickness(),
            last_trace_width_mm: default_trace_width(),
        }
    }
}

fn default_paper() -> String {
    "A4".to_string()
}

fn default_thickness() -> f64 {
    1.6
}

fn default_trace_width() -> f64 {
    0.25
}

/// Output file configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Rename an existing output file aside before overwriting it.
    #[serde(default)]
    pub backup: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
