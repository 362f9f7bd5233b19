//! The repeat grid tool: model, drag controller and configuration together.

use crate::config::GridConfig;
use crate::drag::{DragCommand, DragController, DragOutcome};
use crate::error::GridResult;
use crate::geometry::GridGeometry;
use crate::image::ImageRef;
use crate::layout::GridLayout;
use crate::model::GridModel;
use crate::serialize;
use crate::vector;
use kurbo::Point;
use std::fmt;

/// Summary shown next to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridInfo {
    pub columns: u32,
    pub rows: u32,
    pub total_items: usize,
    /// Spacing rounded to whole pixels.
    pub horizontal_spacing_px: i64,
    pub vertical_spacing_px: i64,
}

impl fmt::Display for GridInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Columns: {}, Rows: {}", self.columns, self.rows)?;
        writeln!(f, "Total Items: {}", self.total_items)?;
        writeln!(f, "H Spacing: {}px", self.horizontal_spacing_px)?;
        write!(f, "V Spacing: {}px", self.vertical_spacing_px)
    }
}

/// One independent grid editing session.
#[derive(Debug, Clone)]
pub struct RepeatGridTool {
    model: GridModel,
    drag: DragController,
    config: GridConfig,
    geometry: GridGeometry,
}

impl Default for RepeatGridTool {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl RepeatGridTool {
    pub fn new(config: GridConfig) -> Self {
        Self::with_model(GridModel::new(), config)
    }

    pub fn with_model(model: GridModel, config: GridConfig) -> Self {
        Self {
            model,
            drag: DragController::new(),
            geometry: config.geometry(),
            config,
        }
    }

    pub fn model(&self) -> &GridModel {
        &self.model
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Whether the create action should be offered.
    pub fn can_create(&self) -> bool {
        self.model.has_image() && !self.model.is_active()
    }

    /// Turn the single element into an editable grid. No-op when already active.
    pub fn create_grid(&mut self) -> bool {
        if self.model.is_active() {
            return false;
        }
        self.model.set_active(true);
        log::info!("Repeat grid created");
        true
    }

    /// Collapse back to the single original element.
    pub fn reset(&mut self) {
        self.drag.handle(DragCommand::EndDrag, &mut self.model, &self.geometry);
        self.model.reset();
        log::info!("Repeat grid reset");
    }

    pub fn set_image(&mut self, image: ImageRef) {
        self.model.set_image(Some(image));
    }

    pub fn clear_image(&mut self) {
        self.model.set_image(None);
    }

    /// Load an image file's bytes into the tool.
    pub fn load_image(&mut self, data: &[u8], file_name: &str) -> GridResult<()> {
        let image = ImageRef::from_bytes(data, file_name)?;
        self.set_image(image);
        Ok(())
    }

    pub fn update_element_size(&mut self, size: f64) -> GridResult<()> {
        self.model.set_element_size(size)
    }

    pub fn update_element_text(&mut self, text: impl Into<String>) {
        self.model.set_element_text(text);
    }

    pub fn set_columns(&mut self, columns: i64) {
        self.model.set_columns(columns);
    }

    pub fn set_rows(&mut self, rows: i64) {
        self.model.set_rows(rows);
    }

    pub fn set_horizontal_spacing(&mut self, spacing: f64) {
        self.model.set_horizontal_spacing(spacing);
    }

    pub fn set_vertical_spacing(&mut self, spacing: f64) {
        self.model.set_vertical_spacing(spacing);
    }

    /// Feed a drag command through the controller. Drags only start on an
    /// active grid, since that is the only time handles exist.
    pub fn handle(&mut self, command: DragCommand) -> DragOutcome {
        if matches!(command, DragCommand::StartDrag { .. }) && !self.model.is_active() {
            log::debug!("Ignoring drag start on inactive grid");
            return DragOutcome::Ignored;
        }
        self.drag.handle(command, &mut self.model, &self.geometry)
    }

    /// Start dragging whatever handle lies under `pointer`.
    pub fn pointer_down(&mut self, pointer: Point) -> DragOutcome {
        let layout = self.layout();
        match layout.handle_at(pointer) {
            Some(handle) => self.handle(DragCommand::StartDrag {
                kind: handle.kind.drag_kind(),
                pointer,
            }),
            None => DragOutcome::Ignored,
        }
    }

    pub fn pointer_move(&mut self, pointer: Point) -> DragOutcome {
        self.handle(DragCommand::PointerMoved { pointer })
    }

    pub fn pointer_up(&mut self) -> DragOutcome {
        self.handle(DragCommand::EndDrag)
    }

    /// Draw list for the current state.
    pub fn layout(&self) -> GridLayout {
        GridLayout::build(&self.model, &self.config)
    }

    pub fn info(&self) -> GridInfo {
        GridInfo {
            columns: self.model.columns(),
            rows: self.model.rows(),
            total_items: self.model.total_cells(),
            horizontal_spacing_px: round_px(self.model.horizontal_spacing()),
            vertical_spacing_px: round_px(self.model.vertical_spacing()),
        }
    }

    pub fn export_json(&self) -> GridResult<Vec<u8>> {
        serialize::export_json(&self.model)
    }

    /// Replace the whole state from a JSON document. Any drag in progress ends.
    /// On a parse error nothing changes.
    pub fn import_json(&mut self, bytes: &[u8]) -> GridResult<()> {
        let model = serialize::import_json(bytes)?;
        self.drag.handle(DragCommand::EndDrag, &mut self.model, &self.geometry);
        self.model = model;
        Ok(())
    }

    pub fn export_svg(&self) -> GridResult<String> {
        vector::export_svg(&self.model, &self.config)
    }
}

fn round_px(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}
