//! Document session
//!
//! A [`Session`] owns one opened document and enforces its lifecycle:
//!
//! ```text
//!   open() ──► Open ──close()──► Closed ──close()──► Closed (no-op)
//!               │                  │
//!   page_count / render_page /     └── every other call: DocumentClosed
//!   render_pages
//! ```
//!
//! The engine handle is released exactly once: on the first `close()`, or
//! when the session is dropped while still open.

use std::time::Instant;

use crate::engine::{EngineDocument, OpenRequest, PageEncoder, RenderEngine};
use crate::error::{classify_open_error, PdfError, Result};
use crate::pages::resolve_pages;
use crate::types::{OpenOptions, PageSelection, PdfInput, RenderOptions, RenderedPage};

/// One opened PDF document
pub struct Session {
    /// `None` once closed
    handle: Option<Box<dyn EngineDocument>>,
    encoder: Box<dyn PageEncoder>,
    page_count: u32,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("page_count", &self.page_count)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Session {
    /// Open a document with MuPDF and the default image encoder
    #[cfg(feature = "mupdf")]
    pub fn open<'a>(input: impl Into<PdfInput<'a>>, options: &OpenOptions) -> Result<Self> {
        Self::open_with(
            &crate::engine::MupdfEngine::new(),
            Box::new(crate::encoder::CodecEncoder::new()),
            input,
            options,
        )
    }

    /// Open a document with an explicit engine and encoder
    pub fn open_with<'a>(
        engine: &dyn RenderEngine,
        encoder: Box<dyn PageEncoder>,
        input: impl Into<PdfInput<'a>>,
        options: &OpenOptions,
    ) -> Result<Self> {
        let input = input.into();
        let source = input.describe();
        let data = input.into_bytes()?;

        let started = Instant::now();
        let handle = engine
            .open(&data, &OpenRequest::from(options))
            .map_err(classify_open_error)?;
        let page_count = handle.page_count().map_err(classify_open_error)?;

        tracing::debug!(
            source = %source,
            page_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "opened PDF"
        );

        Ok(Self {
            handle: Some(handle),
            encoder,
            page_count,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    fn document(&self) -> Result<&dyn EngineDocument> {
        self.handle.as_deref().ok_or_else(PdfError::document_closed)
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> Result<u32> {
        self.document()?;
        Ok(self.page_count)
    }

    /// Render a single page (1-indexed)
    pub fn render_page(&self, page_number: u32, options: &RenderOptions) -> Result<RenderedPage> {
        let doc = self.document()?;
        options.validate()?;
        if page_number < 1 || page_number > self.page_count {
            return Err(PdfError::invalid_page(page_number, self.page_count));
        }
        self.render_validated(doc, page_number, options)
    }

    /// Render a page taken from an already resolved plan
    pub(crate) fn render_planned(
        &self,
        page_number: u32,
        options: &RenderOptions,
    ) -> Result<RenderedPage> {
        let doc = self.document()?;
        self.render_validated(doc, page_number, options)
    }

    /// Validate options and resolve the selection for a streaming render
    pub(crate) fn plan(
        &self,
        selection: Option<&PageSelection>,
        options: &RenderOptions,
    ) -> Result<Vec<u32>> {
        self.document()?;
        options.validate()?;
        let pages = resolve_pages(selection, self.page_count)?;
        tracing::debug!(count = pages.len(), "streaming pages");
        Ok(pages)
    }

    /// Rasterize and encode a page already known to be in range
    fn render_validated(
        &self,
        doc: &dyn EngineDocument,
        page_number: u32,
        options: &RenderOptions,
    ) -> Result<RenderedPage> {
        let started = Instant::now();

        let raster = doc
            .rasterize(page_number - 1, options.scale)
            .map_err(|e| PdfError::render_failed(page_number, &e).with_cause(e))?;

        if !raster.font_warnings.is_empty() {
            if options.strict_fonts {
                let detail = raster.font_warnings.join("; ");
                return Err(PdfError::new(
                    crate::ErrorKind::RenderFailed,
                    format!("Font rendering problem on page {}: {}", page_number, detail),
                ));
            }
            for warning in &raster.font_warnings {
                tracing::warn!(page = page_number, warning = %warning, "font rendering problem");
            }
        }

        let data = self
            .encoder
            .encode(
                &raster.pixels,
                raster.width,
                raster.height,
                options.format,
                options.quality,
            )
            .map_err(|e| PdfError::render_failed(page_number, &e).with_cause(e))?;

        tracing::debug!(
            page = page_number,
            width = raster.width,
            height = raster.height,
            bytes = data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered page"
        );

        Ok(RenderedPage {
            page_number,
            total_pages: self.page_count,
            data,
            width: raster.width,
            height: raster.height,
            format: options.format,
        })
    }

    /// Lazily render the selected pages (all pages when `selection` is `None`)
    ///
    /// The selection and options are validated before this returns, so a bad
    /// page number fails here rather than partway through iteration.
    pub fn render_pages(
        &self,
        selection: Option<&PageSelection>,
        options: &RenderOptions,
    ) -> Result<PageStream<'_>> {
        let pages = self.plan(selection, options)?;
        Ok(PageStream {
            session: self,
            pages: pages.into_iter(),
            options: options.clone(),
            failed: false,
        })
    }

    /// Release the document; later calls do nothing
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            drop(handle);
            tracing::debug!(page_count = self.page_count, "closed PDF");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// Lazy page sequence returned by [`Session::render_pages`]
///
/// Each call to `next()` renders exactly one page; nothing is rendered ahead.
/// After an error the stream ends.
pub struct PageStream<'a> {
    session: &'a Session,
    pages: std::vec::IntoIter<u32>,
    options: RenderOptions,
    failed: bool,
}

impl PageStream<'_> {
    /// Pages not yet rendered
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.pages.len()
        }
    }
}

impl Iterator for PageStream<'_> {
    type Item = Result<RenderedPage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let page_number = self.pages.next()?;

        let result = self.session.render_planned(page_number, &self.options);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining.min(1), Some(remaining))
    }
}

impl std::iter::FusedIterator for PageStream<'_> {}
