//! MuPDF engine
//!
//! MuPDF's `fz_context` is **not** thread-safe, so a document handle keeps
//! only its source bytes and opens a fresh MuPDF document for every
//! operation, serialized through a `parking_lot::Mutex`. Nothing holding a
//! raw MuPDF pointer outlives a single call, which keeps the handle `Send`.

use ::mupdf::{Colorspace, Document, Matrix, Page, Pixmap, TextPageOptions};
use parking_lot::Mutex;

use super::{EngineDocument, OpenRequest, RasterPage, RenderEngine};
use crate::error::EngineError;

const PDF_MIME: &str = "application/pdf";

/// How far into the buffer the `%PDF-` marker may appear
const HEADER_SCAN_LEN: usize = 1024;

/// [`RenderEngine`] backed by MuPDF
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfEngine;

impl MupdfEngine {
    pub fn new() -> Self {
        Self
    }
}

impl RenderEngine for MupdfEngine {
    fn open(
        &self,
        data: &[u8],
        request: &OpenRequest,
    ) -> Result<Box<dyn EngineDocument>, EngineError> {
        if !has_pdf_header(data) {
            return Err(EngineError::new("not a PDF: missing %PDF- header"));
        }
        if request.cmap_dir.is_some() || request.standard_font_dir.is_some() {
            tracing::debug!("MuPDF ships built-in CMaps and base fonts; resource dirs ignored");
        }

        let doc = MupdfDocument::new(data.to_vec(), request.password.clone())?;
        Ok(Box::new(doc))
    }
}

fn has_pdf_header(data: &[u8]) -> bool {
    let window = &data[..data.len().min(HEADER_SCAN_LEN)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// Open and authenticate a MuPDF document
fn open_document(data: &[u8], password: Option<&str>) -> Result<Document, EngineError> {
    let mut doc = Document::from_bytes(data, PDF_MIME)?;

    if doc.needs_password()? {
        let Some(password) = password else {
            return Err(EngineError::new("password required to open document"));
        };
        if !doc.authenticate(password)? {
            return Err(EngineError::new("incorrect password"));
        }
    }

    Ok(doc)
}

struct MupdfDocument {
    data: Vec<u8>,
    password: Option<String>,
    page_count: u32,
    lock: Mutex<()>,
}

impl MupdfDocument {
    fn new(data: Vec<u8>, password: Option<String>) -> Result<Self, EngineError> {
        // Validate once up front; later operations reopen from `data`
        let doc = open_document(&data, password.as_deref())?;
        let raw_count = doc.page_count()?;
        let page_count = u32::try_from(raw_count)
            .map_err(|_| EngineError::new(format!("invalid page count {}", raw_count)))?;

        Ok(Self {
            data,
            password,
            page_count,
            lock: Mutex::new(()),
        })
    }
}

impl EngineDocument for MupdfDocument {
    fn page_count(&self) -> Result<u32, EngineError> {
        Ok(self.page_count)
    }

    fn rasterize(&self, page_index: u32, scale: f32) -> Result<RasterPage, EngineError> {
        let _guard = self.lock.lock();

        let index = i32::try_from(page_index)
            .map_err(|_| EngineError::new(format!("page index {} out of range", page_index)))?;

        let doc = open_document(&self.data, self.password.as_deref())?;
        let page = doc.load_page(index)?;

        // to_pixmap(ctm, colorspace, alpha, show_extras); opaque so JPEG gets a white page
        let matrix = Matrix::new_scale(scale, scale);
        let pixmap = page.to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)?;
        let (pixels, width, height) = pixmap_to_rgba(&pixmap)?;
        drop(pixmap);

        let font_warnings = unmapped_glyph_warning(count_unmapped_glyphs(&page)?)
            .into_iter()
            .collect();

        tracing::trace!(page_index, width, height, "rasterized page");

        Ok(RasterPage {
            pixels,
            width,
            height,
            font_warnings,
        })
    }
}

/// Glyphs MuPDF could not map to a character
///
/// mupdf-rs has no warning callback, so broken font encodings are detected
/// from the page's structured text, where they surface as U+FFFD.
fn count_unmapped_glyphs(page: &Page) -> Result<usize, EngineError> {
    let text_page = page.to_text_page(TextPageOptions::empty())?;

    let mut unmapped = 0;
    for block in text_page.blocks() {
        for line in block.lines() {
            for ch in line.chars() {
                if matches!(ch.char(), None | Some(char::REPLACEMENT_CHARACTER)) {
                    unmapped += 1;
                }
            }
        }
    }
    Ok(unmapped)
}

fn unmapped_glyph_warning(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 glyph has no character mapping".to_string()),
        n => Some(format!("{} glyphs have no character mapping", n)),
    }
}

/// Repack RGB(A) pixmap samples as RGBA8
fn pixmap_to_rgba(pixmap: &Pixmap) -> Result<(Vec<u8>, u32, u32), EngineError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(EngineError::new(format!("unexpected pixmap with {} components", n)));
    }

    let pixel_count = width as usize * height as usize;
    let samples = pixmap.samples();
    if samples.len() < pixel_count * n {
        return Err(EngineError::new("pixmap sample buffer is truncated"));
    }

    let mut rgba = Vec::with_capacity(pixel_count * 4);
    for px in samples.chunks_exact(n).take(pixel_count) {
        let alpha = if n >= 4 { px[3] } else { 255 };
        rgba.extend_from_slice(&[px[0], px[1], px[2], alpha]);
    }

    Ok((rgba, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_header_detection() {
        assert!(has_pdf_header(b"%PDF-1.7\n..."));
        assert!(has_pdf_header(b"\xEF\xBB\xBF%PDF-1.4"));
        assert!(!has_pdf_header(b"abcdef"));
        assert!(!has_pdf_header(b""));
    }

    #[test]
    fn test_open_rejects_non_pdf() {
        let err = MupdfEngine::new()
            .open(b"abcdef", &OpenRequest::default())
            .err()
            .expect("garbage must not open");
        assert!(err.message().contains("not a PDF"));
    }

    #[test]
    fn test_unmapped_glyph_warning() {
        assert_eq!(unmapped_glyph_warning(0), None);
        assert_eq!(
            unmapped_glyph_warning(1).as_deref(),
            Some("1 glyph has no character mapping")
        );
        assert_eq!(
            unmapped_glyph_warning(12).as_deref(),
            Some("12 glyphs have no character mapping")
        );
    }
}
