//! Opaque image references.
//!
//! The engine never decodes pixels. An image is carried around as a data URI
//! and handed back verbatim to renderers and exporters.

use crate::error::{GridError, GridResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Raster formats accepted by the image loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Shared handle to externally-owned image data, stored as a data URI.
///
/// Cloning is cheap; every clone points at the same string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(Arc<str>);

impl ImageRef {
    /// Wrap an already-encoded reference (usually a `data:` URI) without inspecting it.
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    /// Encode raw file bytes into a data URI.
    ///
    /// The format is sniffed from the bytes first and the file name second;
    /// anything that is not a supported raster image is rejected.
    pub fn from_bytes(data: &[u8], file_name: &str) -> GridResult<Self> {
        let format = ImageFormat::from_magic_bytes(data)
            .or_else(|| {
                file_name
                    .rsplit_once('.')
                    .and_then(|(_, ext)| ImageFormat::from_extension(ext))
            })
            .ok_or_else(|| GridError::UnsupportedFileType(file_name.to_string()))?;

        let uri = format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data));
        log::debug!("Loaded {} ({} bytes) as {}", file_name, data.len(), format.mime_type());
        Ok(Self(uri.into()))
    }

    /// The reference exactly as it will be emitted.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type declared by a data URI, if any.
    pub fn mime_type(&self) -> Option<&str> {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split([';', ',']).next())
            .filter(|mime| !mime.is_empty())
    }
}

impl fmt::Debug for ImageRef {
    // Data URIs run to megabytes; keep debug output readable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.0.chars().take(32).collect();
        f.debug_tuple("ImageRef")
            .field(&format_args!("{}… ({} bytes)", preview, self.0.len()))
            .finish()
    }
}
