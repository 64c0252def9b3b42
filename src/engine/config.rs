/// Chart configuration: surface size, scale parameters and default styling

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::binning::DEFAULT_BUCKET_COUNT;
use super::classify::ShapeKind;

const FALLBACK_COLOR: &str = "#4682b4";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Width of the x range in plot units
    pub plot_width: f64,
    /// Height of the y range in plot units
    pub plot_height: f64,
    /// Gap between bands as a fraction of the band step
    pub band_padding: f64,
    pub tick_count: usize,
    pub bucket_count: usize,
    pub point_radius: f32,
    /// Hex color of the Default color rule, "#rrggbb"
    pub default_color: String,
    pub default_shape: ShapeKind,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            plot_width: 1000.0,
            plot_height: 600.0,
            band_padding: 0.05,
            tick_count: 10,
            bucket_count: DEFAULT_BUCKET_COUNT,
            point_radius: 4.0,
            default_color: FALLBACK_COLOR.to_string(),
            default_shape: ShapeKind::Circle,
        }
    }
}

/// True for "#rrggbb" with six hex digits
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

impl ChartConfig {
    /// Parse a partial JSON config; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.with_valid_color())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Using chart config from {}", path.display());
        Ok(config)
    }

    /// Replace a default color the chart cannot draw with the built-in one
    fn with_valid_color(mut self) -> Self {
        if is_hex_color(&self.default_color) {
            self.default_color = self.default_color.to_ascii_lowercase();
        } else {
            log::warn!(
                "default_color {:?} is not #rrggbb; using {}",
                self.default_color,
                FALLBACK_COLOR
            );
            self.default_color = FALLBACK_COLOR.to_string();
        }
        self
    }
}
