//! PDF Pages
//!
//! Renders PDF pages to JPEG or PNG images.
//!
//! A [`Session`] holds one open document. Pages are rendered one at a time
//! with [`Session::render_page`] or lazily in order with
//! [`Session::render_pages`]. The one-shot helpers in [`convenience`] open
//! and close a session for you.
//!
//! # Modules
//!
//! - `session`: Open document handle and page stream
//! - `convenience`: Self-closing helpers (`render_all_pages`, `count_pages`, `with_session`)
//! - `engine`: Engine traits and the MuPDF backend
//! - `encoder`: JPEG/PNG encoding
//! - `pages`: Page selection resolution
//! - `config`: Environment defaults
//! - `blocking`: Tokio bridge (feature `tokio`)
//!
//! # Example
//!
//! ```no_run
//! use pdf_pages::{render_all_pages, BatchOptions, RenderOptions};
//!
//! let options = BatchOptions {
//!     render: RenderOptions::png(2.0),
//!     ..Default::default()
//! };
//! for page in render_all_pages("report.pdf", options)? {
//!     let page = page?;
//!     std::fs::write(format!("page-{}.png", page.page_number), &page.data)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod convenience;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod pages;
pub mod session;
pub mod types;

#[cfg(any(feature = "tokio", test))]
pub mod blocking;

pub use config::Settings;
pub use convenience::{
    count_pages_with, render_all_pages_with, with_session_using, BatchOptions, OwnedPageStream,
};
#[cfg(feature = "mupdf")]
pub use convenience::{count_pages, render_all_pages, with_session};
pub use encoder::CodecEncoder;
#[cfg(feature = "mupdf")]
pub use engine::MupdfEngine;
pub use engine::{EngineDocument, OpenRequest, PageEncoder, RasterPage, RenderEngine};
pub use error::{classify_open_error, EngineError, ErrorKind, PdfError, Result};
pub use pages::resolve_pages;
pub use session::{PageStream, Session};
pub use types::{
    ImageFormat, OpenOptions, PageRange, PageSelection, PdfInput, RenderOptions, RenderedPage,
    ResourceDirs,
};
