//! Repeat Grid Core Library
//!
//! Grid model, layout geometry, drag state machine and import/export for the
//! repeat grid tool. Rendering and file picking live outside this crate.

pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod image;
pub mod layout;
pub mod model;
pub mod serialize;
pub mod storage;
pub mod tool;
pub mod vector;

pub use config::{GridConfig, SerializableColor};
pub use drag::{DragCommand, DragController, DragOutcome, DragSession, DragState};
pub use error::{GridError, GridResult};
pub use geometry::{Baseline, Cell, CellRect, DragKind, GridGeometry};
pub use handles::{Handle, HandleKind};
pub use image::{ImageFormat, ImageRef};
pub use layout::{CellContent, GridLayout, LayoutCell};
pub use model::{GridModel, GridSnapshot, MAX_CELLS};
pub use tool::{GridInfo, RepeatGridTool};
pub use vector::{VectorFill, VectorLabel, VectorShape};
