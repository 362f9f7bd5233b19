//! Canonical grid state.

use crate::error::{GridError, GridResult};
use crate::image::ImageRef;
use serde::{Deserialize, Serialize};

/// Default side length of a cell.
pub const DEFAULT_ELEMENT_SIZE: f64 = 100.0;
/// Default label template.
pub const DEFAULT_ELEMENT_TEXT: &str = "Item";
/// Upper bound on `columns * rows`.
pub const MAX_CELLS: u64 = 100_000;

/// The authoritative state of one repeat grid.
///
/// Fields are private so the invariants always hold: at least one column and
/// row, at most [`MAX_CELLS`] cells, finite non-negative spacing, and a finite
/// positive cell size.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    columns: u32,
    rows: u32,
    horizontal_spacing: f64,
    vertical_spacing: f64,
    element_size: f64,
    element_text: String,
    image: Option<ImageRef>,
    active: bool,
}

impl Default for GridModel {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
            horizontal_spacing: 0.0,
            vertical_spacing: 0.0,
            element_size: DEFAULT_ELEMENT_SIZE,
            element_text: DEFAULT_ELEMENT_TEXT.to_string(),
            image: None,
            active: false,
        }
    }
}

impl GridModel {
    /// Create a model with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn horizontal_spacing(&self) -> f64 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f64 {
        self.vertical_spacing
    }

    pub fn element_size(&self) -> f64 {
        self.element_size
    }

    pub fn element_text(&self) -> &str {
        &self.element_text
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Whether the grid has been created.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether repeated cells and spacing handles exist.
    pub fn is_repeating(&self) -> bool {
        self.active && (self.columns > 1 || self.rows > 1)
    }

    /// Number of cells including the original.
    pub fn total_cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Set the cell side length. Non-finite or non-positive sizes are rejected
    /// and leave the model untouched.
    pub fn set_element_size(&mut self, size: f64) -> GridResult<()> {
        if !(size.is_finite() && size > 0.0) {
            log::warn!("Rejected element size {}", size);
            return Err(GridError::Validation {
                field: "elementSize",
                value: size,
            });
        }
        self.element_size = size;
        Ok(())
    }

    pub fn set_element_text(&mut self, text: impl Into<String>) {
        self.element_text = text.into();
    }

    /// Set the column count, clamped to at least one and to what fits in
    /// [`MAX_CELLS`] with the current row count.
    pub fn set_columns(&mut self, columns: i64) {
        self.columns = clamp_count(columns, self.rows);
    }

    /// Set the row count, clamped like [`GridModel::set_columns`].
    pub fn set_rows(&mut self, rows: i64) {
        self.rows = clamp_count(rows, self.columns);
    }

    /// Set the horizontal gap. Negative and non-finite values become zero.
    pub fn set_horizontal_spacing(&mut self, spacing: f64) {
        self.horizontal_spacing = clamp_spacing(spacing);
    }

    /// Set the vertical gap. Negative and non-finite values become zero.
    pub fn set_vertical_spacing(&mut self, spacing: f64) {
        self.vertical_spacing = clamp_spacing(spacing);
    }

    pub fn set_image(&mut self, image: Option<ImageRef>) {
        self.image = image;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Back to a single inactive cell. Size, text, spacing and image survive.
    pub fn reset(&mut self) {
        self.columns = 1;
        self.rows = 1;
        self.active = false;
    }

    /// Full value copy for serialization.
    pub fn to_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            columns: Some(i64::from(self.columns)),
            rows: Some(i64::from(self.rows)),
            horizontal_spacing: Some(self.horizontal_spacing),
            vertical_spacing: Some(self.vertical_spacing),
            element_size: Some(self.element_size),
            element_text: Some(self.element_text.clone()),
            has_image: Some(self.has_image()),
            image: self.image.clone(),
            is_active: Some(self.active),
            timestamp: None,
        }
    }

    /// Replace every field from a snapshot. Missing values take their defaults
    /// and out-of-range values are clamped. A grid with more than
    /// [`MAX_CELLS`] cells is rejected and leaves `self` untouched.
    pub fn replace_all(&mut self, snapshot: GridSnapshot) -> GridResult<()> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    /// Build a model from a snapshot; see [`GridModel::replace_all`].
    pub fn from_snapshot(snapshot: GridSnapshot) -> GridResult<Self> {
        let columns = snapshot.columns.map_or(1, |n| n.max(1).unsigned_abs());
        let rows = snapshot.rows.map_or(1, |n| n.max(1).unsigned_abs());
        let cells = columns.checked_mul(rows).filter(|&cells| cells <= MAX_CELLS);
        let Some(cells) = cells else {
            return Err(GridError::Validation {
                field: "cells",
                value: columns as f64 * rows as f64,
            });
        };
        log::debug!("Snapshot describes {} cells", cells);
        let element_size = match snapshot.element_size {
            Some(size) if size.is_finite() && size > 0.0 => size,
            Some(size) => {
                log::warn!("Snapshot element size {} out of range, using default", size);
                DEFAULT_ELEMENT_SIZE
            }
            None => DEFAULT_ELEMENT_SIZE,
        };
        // Both counts are at most MAX_CELLS, so they fit.
        let columns = u32::try_from(columns).unwrap_or(u32::MAX);
        let rows = u32::try_from(rows).unwrap_or(u32::MAX);
        Ok(Self {
            columns,
            rows,
            horizontal_spacing: snapshot.horizontal_spacing.map_or(0.0, clamp_spacing),
            vertical_spacing: snapshot.vertical_spacing.map_or(0.0, clamp_spacing),
            element_size,
            element_text: snapshot
                .element_text
                .unwrap_or_else(|| DEFAULT_ELEMENT_TEXT.to_string()),
            image: snapshot.image,
            active: snapshot.is_active.unwrap_or(columns > 1 || rows > 1),
        })
    }
}

fn clamp_count(n: i64, other: u32) -> u32 {
    let limit = MAX_CELLS / u64::from(other.max(1));
    let n = n.max(1).unsigned_abs().min(limit);
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn clamp_spacing(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Serializable copy of a [`GridModel`].
///
/// Every field is optional so partial documents can be imported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub columns: Option<i64>,
    pub rows: Option<i64>,
    pub horizontal_spacing: Option<f64>,
    pub vertical_spacing: Option<f64>,
    pub element_size: Option<f64>,
    pub element_text: Option<String>,
    /// Informational only; the presence of `image` decides.
    pub has_image: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    pub is_active: Option<bool>,
    /// ISO-8601 export time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
