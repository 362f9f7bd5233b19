//! Presentation of a grid as a draw list.
//!
//! A [`GridLayout`] is rebuilt from the model after every change. Renderers
//! diff or replace their previous list; the engine keeps no paint state.

use crate::config::GridConfig;
use crate::geometry::{Cell, CellRect};
use crate::handles::{Handle, resize_handles, spacing_handles};
use crate::image::ImageRef;
use crate::model::GridModel;
use kurbo::Point;
use peniko::Color;

/// How a cell is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Image scaled to cover the cell.
    Image(ImageRef),
    /// Solid block with centered text.
    Label { text: String, fill: Color },
}

/// One paintable cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCell {
    pub row: u32,
    pub col: u32,
    pub rect: CellRect,
    pub content: CellContent,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// The source element at cell (0, 0). Its label is the bare template text.
    pub original: LayoutCell,
    /// Copies of the source element, excluding the original.
    pub repeated: Vec<LayoutCell>,
    pub resize_handles: Vec<Handle>,
    pub spacing_handles: Vec<Handle>,
    /// Tolerance used by [`GridLayout::handle_at`].
    hit_tolerance: f64,
}

impl GridLayout {
    /// Build the draw list for `model`.
    pub fn build(model: &GridModel, config: &GridConfig) -> Self {
        let geometry = config.geometry();
        let fill = config.fill_color();
        let content = |text: String| match model.image() {
            Some(image) => CellContent::Image(image.clone()),
            None => CellContent::Label { text, fill },
        };

        let original = LayoutCell {
            row: 0,
            col: 0,
            rect: geometry.cell_rect(model, 0, 0),
            content: content(model.element_text().to_string()),
        };
        let repeated = geometry
            .repeated_cells(model)
            .map(|Cell { row, col, rect, label }| LayoutCell {
                row,
                col,
                rect,
                content: content(label),
            })
            .collect();

        Self {
            original,
            repeated,
            resize_handles: resize_handles(&geometry, model, config.handle_size),
            spacing_handles: spacing_handles(&geometry, model),
            hit_tolerance: config.hit_tolerance,
        }
    }

    /// All painted cells, original first.
    pub fn cells(&self) -> impl Iterator<Item = &LayoutCell> {
        std::iter::once(&self.original).chain(self.repeated.iter())
    }

    /// Topmost handle under `point`. Resize handles sit above spacing handles.
    pub fn handle_at(&self, point: Point) -> Option<&Handle> {
        self.resize_handles
            .iter()
            .chain(self.spacing_handles.iter())
            .find(|handle| handle.hit_test(point, self.hit_tolerance))
    }
}
