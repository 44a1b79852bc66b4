//! Rendering engine boundary
//!
//! The session only talks to a PDF engine through these traits. An engine
//! parses bytes into an [`EngineDocument`], which reports its page count and
//! rasterizes pages into RGBA buffers.
//!
//! # Ownership
//!
//! The session owns the boxed document exclusively. Dropping the box is the
//! engine's "destroy" step and the session guarantees it happens once.
//!
//! ```text
//! bytes ──► RenderEngine::open ──► Box<dyn EngineDocument>
//!                                        │
//!                          rasterize(index, scale)
//!                                        ▼
//!                                   RasterPage ──► PageEncoder ──► jpeg/png
//! ```

#[cfg(test)]
pub(crate) mod mock;
#[cfg(feature = "mupdf")]
mod mupdf;

#[cfg(feature = "mupdf")]
pub use self::mupdf::MupdfEngine;

use std::path::PathBuf;

use crate::error::EngineError;
use crate::types::OpenOptions;

/// Parameters handed to [`RenderEngine::open`]
#[derive(Debug, Clone, Default)]
pub struct OpenRequest {
    pub password: Option<String>,
    pub cmap_dir: Option<PathBuf>,
    pub standard_font_dir: Option<PathBuf>,
}

impl From<&OpenOptions> for OpenRequest {
    fn from(options: &OpenOptions) -> Self {
        Self {
            password: options.password.clone(),
            cmap_dir: options.resources.cmaps.clone(),
            standard_font_dir: options.resources.standard_fonts.clone(),
        }
    }
}

/// Raw rasterization output for one page
pub struct RasterPage {
    /// Tightly packed RGBA8 samples, `width * height * 4` bytes
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Font problems the engine noticed while drawing this page
    pub font_warnings: Vec<String>,
}

impl std::fmt::Debug for RasterPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterPage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .field("font_warnings", &self.font_warnings)
            .finish()
    }
}

/// PDF engine entry point
pub trait RenderEngine {
    /// Parse raw PDF bytes
    ///
    /// Password failures must mention "password" in the message, and
    /// rejected passwords "incorrect", so the session can classify them.
    fn open(
        &self,
        data: &[u8],
        request: &OpenRequest,
    ) -> Result<Box<dyn EngineDocument>, EngineError>;
}

/// An opened document owned by a session
pub trait EngineDocument: Send {
    fn page_count(&self) -> Result<u32, EngineError>;

    /// Rasterize a page (0-indexed) at `scale` (1.0 = 72 DPI)
    ///
    /// Per-page engine resources must be released before returning, on both
    /// success and failure.
    fn rasterize(&self, page_index: u32, scale: f32) -> Result<RasterPage, EngineError>;
}

/// Image compression boundary
pub trait PageEncoder: Send + Sync {
    /// Encode an RGBA8 buffer; `quality` in `[0, 1]` applies to JPEG only
    fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: crate::ImageFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EngineError>;
}
