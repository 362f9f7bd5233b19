//! Engine configuration.
//!
//! Everything the layout and exporters treat as a fixed constant lives here so
//! callers can inject it instead of reaching for globals.

use crate::error::{GridError, GridResult};
use crate::geometry::GridGeometry;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Placeholder cell blue (`#007acc`).
    pub const fn cell_blue() -> Self {
        Self::new(0, 122, 204, 255)
    }

    /// CSS hex form, `#rrggbb`. Alpha is dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Layout and export settings for a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Top-left corner of cell (0, 0).
    pub origin: Point,
    /// Side length of the square SVG canvas.
    pub canvas_size: f64,
    /// Fill for cells without an image.
    pub fill: SerializableColor,
    /// Label color for cells without an image.
    pub label_color: SerializableColor,
    /// Downward shift of a label from the cell center, approximating vertical centering.
    pub label_baseline_offset: f64,
    /// Pointer travel per unit of spacing change during spacing drags.
    pub spacing_drag_divisor: f64,
    /// Side length of the column/row resize handles.
    pub handle_size: f64,
    /// Extra hit slop around every handle.
    pub hit_tolerance: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: Point::new(50.0, 50.0),
            canvas_size: 700.0,
            fill: SerializableColor::cell_blue(),
            label_color: SerializableColor::white(),
            label_baseline_offset: 5.0,
            spacing_drag_divisor: 2.0,
            handle_size: 16.0,
            hit_tolerance: 4.0,
        }
    }
}

impl GridConfig {
    /// Parse a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> GridResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GridError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> GridResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GridError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded grid config from {}", path.display());
        Ok(config)
    }

    /// Geometry engine bound to this configuration.
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.origin, self.spacing_drag_divisor)
    }

    /// Fill color for label cells.
    pub fn fill_color(&self) -> Color {
        self.fill.into()
    }

    fn validate(&self) -> GridResult<()> {
        let positive = [
            ("canvasSize", self.canvas_size),
            ("spacingDragDivisor", self.spacing_drag_divisor),
            ("handleSize", self.handle_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GridError::Validation { field, value });
            }
        }
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance >= 0.0) {
            return Err(GridError::Validation {
                field: "hitTolerance",
                value: self.hit_tolerance,
            });
        }
        Ok(())
    }
}
