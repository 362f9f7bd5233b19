//! Draggable regions of a grid.

use crate::geometry::{CellRect, DragKind, GridGeometry};
use crate::model::GridModel;
use kurbo::Point;

/// The kind of handle - determines which drag it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Right edge of the original cell; adds or removes columns.
    ColumnResize,
    /// Bottom edge of the original cell; adds or removes rows.
    RowResize,
    /// Gap to the right of cell `(row, col)`.
    HorizontalSpacing { row: u32, col: u32 },
    /// Gap below cell `(row, col)`.
    VerticalSpacing { row: u32, col: u32 },
}

impl HandleKind {
    pub fn drag_kind(self) -> DragKind {
        match self {
            HandleKind::ColumnResize => DragKind::ColumnResize,
            HandleKind::RowResize => DragKind::RowResize,
            HandleKind::HorizontalSpacing { .. } => DragKind::HorizontalSpacing,
            HandleKind::VerticalSpacing { .. } => DragKind::VerticalSpacing,
        }
    }
}

/// A handle and the area it occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub rect: CellRect,
}

impl Handle {
    pub fn new(kind: HandleKind, rect: CellRect) -> Self {
        Self { kind, rect }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.rect.contains(point, tolerance)
    }
}

/// Column and row resize handles, centered on the right and bottom edges of
/// the original cell. Only an active grid has them.
pub fn resize_handles(geometry: &GridGeometry, model: &GridModel, handle_size: f64) -> Vec<Handle> {
    if !model.is_active() {
        return Vec::new();
    }
    let cell = geometry.cell_rect(model, 0, 0);
    let half = handle_size / 2.0;
    let center = cell.center();
    vec![
        Handle::new(
            HandleKind::ColumnResize,
            CellRect::new(cell.x + cell.width - half, center.y - half, handle_size, handle_size),
        ),
        Handle::new(
            HandleKind::RowResize,
            CellRect::new(center.x - half, cell.y + cell.height - half, handle_size, handle_size),
        ),
    ]
}

/// Spacing handles for every gap. Only a repeating grid has them.
pub fn spacing_handles(geometry: &GridGeometry, model: &GridModel) -> Vec<Handle> {
    if !model.is_repeating() {
        return Vec::new();
    }
    let horizontal = geometry
        .horizontal_spacing_handles(model)
        .into_iter()
        .map(|(row, col, rect)| Handle::new(HandleKind::HorizontalSpacing { row, col }, rect));
    let vertical = geometry
        .vertical_spacing_handles(model)
        .into_iter()
        .map(|(row, col, rect)| Handle::new(HandleKind::VerticalSpacing { row, col }, rect));
    horizontal.chain(vertical).collect()
}
