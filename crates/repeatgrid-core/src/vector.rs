//! Vector export.
//!
//! Exported cells are laid out on a stride of exactly one cell size: spacing is
//! not applied, so the file shows the grid packed edge to edge even when the
//! live layout has gaps.

use crate::config::{GridConfig, SerializableColor};
use crate::error::{GridError, GridResult};
use crate::geometry::CellRect;
use crate::image::ImageRef;
use crate::model::GridModel;
use std::fmt::{self, Write};

/// Pattern id referenced by image-filled cells.
pub const IMAGE_PATTERN_ID: &str = "pattern";

/// Fill of an exported cell.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorFill {
    Solid(SerializableColor),
    /// Tiled image shared by every cell through one pattern definition.
    ImagePattern(ImageRef),
}

/// Centered cell caption.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: SerializableColor,
}

/// One exported square.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorShape {
    pub row: u32,
    pub col: u32,
    pub rect: CellRect,
    pub fill: VectorFill,
    pub label: Option<VectorLabel>,
}

/// Describe every cell of `model`, row-major, ignoring spacing.
pub fn export_vector_shapes(model: &GridModel, config: &GridConfig) -> Vec<VectorShape> {
    let size = model.element_size();
    let origin = config.origin;
    let columns = model.columns();
    (0..model.rows())
        .flat_map(|row| (0..columns).map(move |col| (row, col)))
        .map(|(row, col)| {
            let rect = CellRect::new(
                origin.x + f64::from(col) * size,
                origin.y + f64::from(row) * size,
                size,
                size,
            );
            let (fill, label) = match model.image() {
                Some(image) => (VectorFill::ImagePattern(image.clone()), None),
                None => {
                    let index = u64::from(row) * u64::from(columns) + u64::from(col) + 1;
                    let center = rect.center();
                    let label = VectorLabel {
                        text: format!("{} {}", model.element_text(), index),
                        x: center.x,
                        y: center.y + config.label_baseline_offset,
                        color: config.label_color,
                    };
                    (VectorFill::Solid(config.fill), Some(label))
                }
            };
            VectorShape { row, col, rect, fill, label }
        })
        .collect()
}

/// Render `model` as a standalone SVG document on a fixed square canvas.
pub fn export_svg(model: &GridModel, config: &GridConfig) -> GridResult<String> {
    let shapes = export_vector_shapes(model, config);
    let mut svg = String::new();
    write_svg(&mut svg, model, config, &shapes)
        .map_err(|e| GridError::Serialization(format!("Failed to write SVG: {}", e)))?;
    log::info!("Exported {} cells as SVG ({} bytes)", shapes.len(), svg.len());
    Ok(svg)
}

fn write_svg(
    out: &mut impl Write,
    model: &GridModel,
    config: &GridConfig,
    shapes: &[VectorShape],
) -> fmt::Result {
    let canvas = config.canvas_size;
    let size = model.element_size();

    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{canvas}" height="{canvas}" viewBox="0 0 {canvas} {canvas}">"#
    )?;

    if let Some(image) = model.image() {
        write!(
            out,
            r#"<defs><pattern id="{IMAGE_PATTERN_ID}" patternUnits="userSpaceOnUse" width="{size}" height="{size}"><image href="{}" width="{size}" height="{size}"/></pattern></defs>"#,
            escape_xml(image.as_str()),
        )?;
    }

    for shape in shapes {
        let fill = match &shape.fill {
            VectorFill::Solid(color) => color.to_hex(),
            VectorFill::ImagePattern(_) => format!("url(#{IMAGE_PATTERN_ID})"),
        };
        let CellRect { x, y, width, height } = shape.rect;
        write!(
            out,
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{fill}" rx="0"/>"#
        )?;
        if let Some(label) = &shape.label {
            write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle" fill="{}" font-family="sans-serif" font-weight="bold">{}</text>"#,
                label.x,
                label.y,
                svg_color(label.color),
                escape_xml(&label.text),
            )?;
        }
    }

    out.write_str("</svg>")
}

fn svg_color(color: SerializableColor) -> String {
    if color == SerializableColor::white() {
        "white".to_string()
    } else {
        color.to_hex()
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
