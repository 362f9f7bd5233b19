//! Pure layout math for a grid.
//!
//! [`GridGeometry`] reads a [`GridModel`] and never mutates it. Drag deltas are
//! turned into a new model value that the caller decides whether to commit.

use crate::model::GridModel;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in canvas coordinates.
///
/// Kept as origin plus size so widths are exactly the values they were built
/// from, which a corner-based `kurbo::Rect` cannot promise after subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Hit test with extra slop on every side.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        self.to_rect().inflate(tolerance, tolerance).contains(point)
    }
}

/// What a drag gesture adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragKind {
    ColumnResize,
    RowResize,
    HorizontalSpacing,
    VerticalSpacing,
}

impl DragKind {
    /// Resize drags snap to whole cells and are measured from a baseline.
    pub fn is_resize(self) -> bool {
        matches!(self, DragKind::ColumnResize | DragKind::RowResize)
    }
}

/// Grid dimensions captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub columns: u32,
    pub rows: u32,
}

impl Baseline {
    pub fn of(model: &GridModel) -> Self {
        Self {
            columns: model.columns(),
            rows: model.rows(),
        }
    }
}

/// One grid position with its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub rect: CellRect,
    pub label: String,
}

/// Layout functions bound to an origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    origin: Point,
    spacing_drag_divisor: f64,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::new(Point::new(50.0, 50.0), 2.0)
    }
}

impl GridGeometry {
    pub fn new(origin: Point, spacing_drag_divisor: f64) -> Self {
        Self {
            origin,
            spacing_drag_divisor,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Position and size of the cell at `(row, col)`.
    pub fn cell_rect(&self, model: &GridModel, row: u32, col: u32) -> CellRect {
        let size = model.element_size();
        CellRect::new(
            self.origin.x + f64::from(col) * (size + model.horizontal_spacing()),
            self.origin.y + f64::from(row) * (size + model.vertical_spacing()),
            size,
            size,
        )
    }

    /// Numbered label, 1-based in row-major order.
    pub fn cell_label(&self, model: &GridModel, row: u32, col: u32) -> String {
        cell_label(model, row, col)
    }

    /// Every cell, row-major. Cheap to call again; nothing is cached.
    pub fn cells<'a>(&self, model: &'a GridModel) -> impl Iterator<Item = Cell> + use<'a> {
        let geometry = *self;
        let columns = model.columns();
        (0..model.rows()).flat_map(move |row| {
            (0..columns).map(move |col| Cell {
                row,
                col,
                rect: geometry.cell_rect(model, row, col),
                label: cell_label(model, row, col),
            })
        })
    }

    /// Cells drawn in addition to the original element. Empty unless the grid
    /// is active and larger than one cell. Labels keep their full-grid numbers.
    pub fn repeated_cells<'a>(&self, model: &'a GridModel) -> impl Iterator<Item = Cell> + use<'a> {
        let repeating = model.is_repeating();
        self.cells(model)
            .filter(move |cell| repeating && !(cell.row == 0 && cell.col == 0))
    }

    /// Gaps between horizontally adjacent cells, as `(row, col, rect)` where
    /// `col` is the cell to the left of the gap.
    pub fn horizontal_spacing_handles(&self, model: &GridModel) -> Vec<(u32, u32, CellRect)> {
        let size = model.element_size();
        let mut handles = Vec::new();
        for row in 0..model.rows() {
            for col in 0..model.columns().saturating_sub(1) {
                let cell = self.cell_rect(model, row, col);
                handles.push((
                    row,
                    col,
                    CellRect::new(cell.x + size, cell.y, model.horizontal_spacing(), size),
                ));
            }
        }
        handles
    }

    /// Gaps between vertically adjacent cells, as `(row, col, rect)` where
    /// `row` is the cell above the gap.
    pub fn vertical_spacing_handles(&self, model: &GridModel) -> Vec<(u32, u32, CellRect)> {
        let size = model.element_size();
        let mut handles = Vec::new();
        for row in 0..model.rows().saturating_sub(1) {
            for col in 0..model.columns() {
                let cell = self.cell_rect(model, row, col);
                handles.push((
                    row,
                    col,
                    CellRect::new(cell.x, cell.y + size, size, model.vertical_spacing()),
                ));
            }
        }
        handles
    }

    /// Map drag motion onto the model.
    ///
    /// Resize kinds take the delta from the drag anchor and snap against
    /// `baseline`. Spacing kinds take the increment since the previous pointer
    /// event and add it to the current spacing. Returns the model unchanged if
    /// the cell size cannot be divided by or the delta is not finite.
    pub fn apply_drag_delta(
        &self,
        model: &GridModel,
        kind: DragKind,
        delta: Vec2,
        baseline: Baseline,
    ) -> GridModel {
        let mut next = model.clone();
        let size = model.element_size();
        if !(size.is_finite() && size > 0.0) || !delta.is_finite() {
            log::warn!("Ignoring drag delta {:?} with element size {}", delta, size);
            return next;
        }

        match kind {
            DragKind::ColumnResize => {
                let steps = round_half_up(delta.x / size);
                next.set_columns(snap_count(baseline.columns, steps));
            }
            DragKind::RowResize => {
                let steps = round_half_up(delta.y / size);
                next.set_rows(snap_count(baseline.rows, steps));
            }
            DragKind::HorizontalSpacing => {
                next.set_horizontal_spacing(
                    model.horizontal_spacing() + delta.x / self.spacing_drag_divisor,
                );
            }
            DragKind::VerticalSpacing => {
                next.set_vertical_spacing(
                    model.vertical_spacing() + delta.y / self.spacing_drag_divisor,
                );
            }
        }
        next
    }
}

fn cell_label(model: &GridModel, row: u32, col: u32) -> String {
    let index = u64::from(row) * u64::from(model.columns()) + u64::from(col) + 1;
    format!("{} {}", model.element_text(), index)
}

/// Round half toward positive infinity: 2.5 → 3, -2.5 → -2.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

fn snap_count(base: u32, steps: f64) -> i64 {
    // Float-to-int `as` saturates, so huge deltas clamp instead of wrapping.
    (f64::from(base) + steps) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model(columns: i64, rows: i64, size: f64) -> GridModel {
        let mut model = GridModel::new();
        model.set_columns(columns);
        model.set_rows(rows);
        model.set_element_size(size).unwrap();
        model.set_active(true);
        model
    }

    #[test]
    fn test_cell_rect_honors_spacing() {
        let geometry = GridGeometry::default();
        let mut m = model(3, 2, 100.0);
        m.set_horizontal_spacing(10.0);
        m.set_vertical_spacing(20.0);

        let rect = geometry.cell_rect(&m, 1, 2);
        assert!((rect.x - 270.0).abs() < f64::EPSILON);
        assert!((rect.y - 170.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_origin_is_configurable() {
        let geometry = GridGeometry::new(Point::new(0.0, 10.0), 2.0);
        let rect = geometry.cell_rect(&model(1, 1, 40.0), 0, 0);
        assert_eq!(rect.origin(), Point::new(0.0, 10.0));
    }

    #[test]
    fn test_labels_row_major() {
        let geometry = GridGeometry::default();
        let m = model(3, 2, 100.0);
        let labels: Vec<_> = geometry.cells(&m).map(|c| c.label).collect();
        assert_eq!(
            labels,
            ["Item 1", "Item 2", "Item 3", "Item 4", "Item 5", "Item 6"]
        );
        assert_eq!(geometry.cell_label(&m, 1, 0), "Item 4");
    }

    #[test]
    fn test_repeated_cells_skip_original() {
        let geometry = GridGeometry::default();
        let m = model(2, 2, 100.0);
        let repeated: Vec<_> = geometry.repeated_cells(&m).collect();
        assert_eq!(repeated.len(), 3);
        assert_eq!(repeated[0].label, "Item 2");
        assert!(repeated.iter().all(|c| (c.row, c.col) != (0, 0)));
    }

    #[test]
    fn test_repeated_cells_empty_when_inactive() {
        let geometry = GridGeometry::default();
        let mut m = model(3, 3, 100.0);
        m.set_active(false);
        assert_eq!(geometry.repeated_cells(&m).count(), 0);
        assert_eq!(geometry.repeated_cells(&model(1, 1, 100.0)).count(), 0);
        assert_eq!(geometry.cells(&m).count(), 9);
    }

    #[test]
    fn test_spacing_handles() {
        let geometry = GridGeometry::default();
        let mut m = model(3, 2, 100.0);
        m.set_horizontal_spacing(10.0);
        m.set_vertical_spacing(6.0);

        let horizontal = geometry.horizontal_spacing_handles(&m);
        assert_eq!(horizontal.len(), 4);
        let (row, col, rect) = horizontal[1];
        assert_eq!((row, col), (0, 1));
        assert_eq!(rect, CellRect::new(260.0, 50.0, 10.0, 100.0));

        let vertical = geometry.vertical_spacing_handles(&m);
        assert_eq!(vertical.len(), 3);
        let (row, col, rect) = vertical[2];
        assert_eq!((row, col), (0, 2));
        assert_eq!(rect, CellRect::new(270.0, 150.0, 100.0, 6.0));
    }

    #[test]
    fn test_no_spacing_handles_for_single_line() {
        let geometry = GridGeometry::default();
        assert!(geometry.horizontal_spacing_handles(&model(1, 4, 100.0)).is_empty());
        assert!(geometry.vertical_spacing_handles(&model(4, 1, 100.0)).is_empty());
    }

    #[test]
    fn test_column_resize_snaps() {
        let geometry = GridGeometry::default();
        let m = model(1, 1, 100.0);
        let baseline = Baseline::of(&m);

        let next = geometry.apply_drag_delta(&m, DragKind::ColumnResize, Vec2::new(250.0, 0.0), baseline);
        assert_eq!(next.columns(), 4);

        let next = geometry.apply_drag_delta(&m, DragKind::ColumnResize, Vec2::new(49.0, 0.0), baseline);
        assert_eq!(next.columns(), 1);
    }

    #[test]
    fn test_row_resize_uses_baseline() {
        let geometry = GridGeometry::default();
        let m = model(1, 5, 50.0);
        let baseline = Baseline { columns: 1, rows: 2 };
        let next = geometry.apply_drag_delta(&m, DragKind::RowResize, Vec2::new(0.0, 100.0), baseline);
        assert_eq!(next.rows(), 4);
    }

    #[test]
    fn test_negative_half_step_rounds_up() {
        let geometry = GridGeometry::default();
        let m = model(4, 1, 100.0);
        let next = geometry.apply_drag_delta(&m, DragKind::ColumnResize, Vec2::new(-250.0, 0.0), Baseline::of(&m));
        assert_eq!(next.columns(), 2);
    }

    #[test]
    fn test_spacing_is_incremental() {
        let geometry = GridGeometry::default();
        let mut m = model(2, 2, 100.0);
        m.set_horizontal_spacing(10.0);
        let baseline = Baseline::of(&m);

        let next = geometry.apply_drag_delta(&m, DragKind::HorizontalSpacing, Vec2::new(4.0, 0.0), baseline);
        assert!((next.horizontal_spacing() - 12.0).abs() < f64::EPSILON);
        let next = geometry.apply_drag_delta(&next, DragKind::HorizontalSpacing, Vec2::new(4.0, 0.0), baseline);
        assert!((next.horizontal_spacing() - 14.0).abs() < f64::EPSILON);

        let next = geometry.apply_drag_delta(&next, DragKind::VerticalSpacing, Vec2::new(0.0, -100.0), baseline);
        assert_eq!(next.vertical_spacing(), 0.0);
    }

    #[test]
    fn test_huge_resize_stays_within_cell_cap() {
        let geometry = GridGeometry::default();
        let m = model(2, 4, 100.0);
        let next = geometry.apply_drag_delta(&m, DragKind::ColumnResize, Vec2::new(1.0e300, 0.0), Baseline::of(&m));
        assert_eq!(u64::from(next.columns()), crate::model::MAX_CELLS / 4);
        assert_eq!(next.rows(), 4);
    }

    #[test]
    fn test_overflowing_spacing_drag_stays_finite() {
        let geometry = GridGeometry::default();
        let mut m = model(2, 2, 100.0);
        m.set_horizontal_spacing(f64::MAX);
        let next = geometry.apply_drag_delta(&m, DragKind::HorizontalSpacing, Vec2::new(f64::MAX, 0.0), Baseline::of(&m));
        assert!(next.horizontal_spacing().is_finite());
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let geometry = GridGeometry::default();
        let m = model(2, 2, 100.0);
        let next = geometry.apply_drag_delta(&m, DragKind::ColumnResize, Vec2::new(f64::NAN, 0.0), Baseline::of(&m));
        assert_eq!(next, m);
    }

    #[test]
    fn test_cell_rect_contains() {
        let rect = CellRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(5.0, 5.0), 0.0));
        assert!(!rect.contains(Point::new(12.0, 5.0), 0.0));
        assert!(rect.contains(Point::new(12.0, 5.0), 4.0));
        assert_eq!(rect.center(), Point::new(5.0, 5.0));
    }

    proptest! {
        #[test]
        fn cells_are_square_and_numbered(
            columns in 1i64..12,
            rows in 1i64..12,
            size in 1.0f64..500.0,
            h in 0.0f64..80.0,
            v in 0.0f64..80.0,
        ) {
            let geometry = GridGeometry::default();
            let mut m = model(columns, rows, size);
            m.set_horizontal_spacing(h);
            m.set_vertical_spacing(v);

            let cells: Vec<_> = geometry.cells(&m).collect();
            prop_assert_eq!(cells.len(), (columns * rows) as usize);
            for (i, cell) in cells.iter().enumerate() {
                prop_assert_eq!(cell.rect.width, size);
                prop_assert_eq!(cell.rect.height, size);
                prop_assert_eq!(&cell.label, &format!("Item {}", i + 1));
            }
        }

        #[test]
        fn zero_delta_keeps_baseline_columns(columns in 1i64..50, base in 1u32..50, dy in -1000.0f64..1000.0) {
            let geometry = GridGeometry::default();
            let m = model(columns, 1, 100.0);
            let baseline = Baseline { columns: base, rows: 1 };
            let next = geometry.apply_drag_delta(&m, DragKind::ColumnResize, Vec2::new(0.0, dy), baseline);
            prop_assert_eq!(next.columns(), base);
        }

        #[test]
        fn drag_never_breaks_invariants(
            dx in -1.0e9f64..1.0e9,
            dy in -1.0e9f64..1.0e9,
            size in 0.5f64..300.0,
        ) {
            let geometry = GridGeometry::default();
            let m = model(3, 3, size);
            let baseline = Baseline::of(&m);
            for kind in [DragKind::ColumnResize, DragKind::RowResize, DragKind::HorizontalSpacing, DragKind::VerticalSpacing] {
                let next = geometry.apply_drag_delta(&m, kind, Vec2::new(dx, dy), baseline);
                prop_assert!(next.columns() >= 1);
                prop_assert!(next.rows() >= 1);
                prop_assert!(next.horizontal_spacing() >= 0.0);
                prop_assert!(next.vertical_spacing() >= 0.0);
            }
        }
    }
}
