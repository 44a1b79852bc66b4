//! One-shot helpers
//!
//! Each helper opens its own session and guarantees it is closed on every
//! exit path: normal completion, early return, error, or the caller dropping
//! the stream before it is exhausted.

use crate::engine::{PageEncoder, RenderEngine};
use crate::error::Result;
use crate::session::Session;
use crate::types::{OpenOptions, PageSelection, PdfInput, RenderOptions, RenderedPage};

/// Options for [`render_all_pages`]
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub open: OpenOptions,
    /// Pages to render; `None` renders every page
    pub pages: Option<PageSelection>,
    pub render: RenderOptions,
}

/// Page stream that owns its session
///
/// The session is closed as soon as the last page is produced, after an
/// error, or when the stream is dropped.
pub struct OwnedPageStream {
    session: Option<Session>,
    pages: std::vec::IntoIter<u32>,
    options: RenderOptions,
}

impl OwnedPageStream {
    fn new(
        session: Session,
        selection: Option<&PageSelection>,
        options: RenderOptions,
    ) -> Result<Self> {
        let pages = session.plan(selection, &options)?;
        Ok(Self {
            session: Some(session),
            pages: pages.into_iter(),
            options,
        })
    }

    /// Total pages in the underlying document, `None` once closed
    pub fn total_pages(&self) -> Option<u32> {
        self.session.as_ref().and_then(|s| s.page_count().ok())
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_none()
    }

    fn finish(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
    }
}

impl Iterator for OwnedPageStream {
    type Item = Result<RenderedPage>;

    fn next(&mut self) -> Option<Self::Item> {
        let session = self.session.as_ref()?;
        let Some(page_number) = self.pages.next() else {
            self.finish();
            return None;
        };

        let result = session.render_planned(page_number, &self.options);
        if result.is_err() || self.pages.len() == 0 {
            self.finish();
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.session {
            Some(_) => (self.pages.len().min(1), Some(self.pages.len())),
            None => (0, Some(0)),
        }
    }
}

impl std::iter::FusedIterator for OwnedPageStream {}

/// Stream every selected page of a document, closing it automatically
///
/// Opening and selection errors are returned immediately; render errors
/// appear in the stream.
#[cfg(feature = "mupdf")]
pub fn render_all_pages<'a>(
    input: impl Into<PdfInput<'a>>,
    options: BatchOptions,
) -> Result<OwnedPageStream> {
    let session = Session::open(input, &options.open)?;
    OwnedPageStream::new(session, options.pages.as_ref(), options.render)
}

/// [`render_all_pages`] with an explicit engine and encoder
pub fn render_all_pages_with<'a>(
    engine: &dyn RenderEngine,
    encoder: Box<dyn PageEncoder>,
    input: impl Into<PdfInput<'a>>,
    options: BatchOptions,
) -> Result<OwnedPageStream> {
    let session = Session::open_with(engine, encoder, input, &options.open)?;
    OwnedPageStream::new(session, options.pages.as_ref(), options.render)
}

/// Open a document, read its page count and close it
#[cfg(feature = "mupdf")]
pub fn count_pages<'a>(input: impl Into<PdfInput<'a>>, options: &OpenOptions) -> Result<u32> {
    with_session(input, options, Session::page_count)
}

/// [`count_pages`] with an explicit engine and encoder
pub fn count_pages_with<'a>(
    engine: &dyn RenderEngine,
    encoder: Box<dyn PageEncoder>,
    input: impl Into<PdfInput<'a>>,
    options: &OpenOptions,
) -> Result<u32> {
    with_session_using(engine, encoder, input, options, Session::page_count)
}

/// Run `f` against a freshly opened session, closing it afterwards
///
/// The session is closed whether `f` succeeds, fails, or panics.
#[cfg(feature = "mupdf")]
pub fn with_session<'a, T, F>(
    input: impl Into<PdfInput<'a>>,
    options: &OpenOptions,
    f: F,
) -> Result<T>
where
    F: FnOnce(&Session) -> Result<T>,
{
    let session = Session::open(input, options)?;
    scoped(session, f)
}

/// [`with_session`] with an explicit engine and encoder
pub fn with_session_using<'a, T, F>(
    engine: &dyn RenderEngine,
    encoder: Box<dyn PageEncoder>,
    input: impl Into<PdfInput<'a>>,
    options: &OpenOptions,
    f: F,
) -> Result<T>
where
    F: FnOnce(&Session) -> Result<T>,
{
    let session = Session::open_with(engine, encoder, input, options)?;
    scoped(session, f)
}

// Unwinding drops `session`, whose Drop closes it.
fn scoped<T, F>(mut session: Session, f: F) -> Result<T>
where
    F: FnOnce(&Session) -> Result<T>,
{
    let result = f(&session);
    session.close();
    result
}
