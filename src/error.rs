//! Error types
//!
//! Every failure that leaves this crate is a [`PdfError`] tagged with one
//! [`ErrorKind`]. Engine and encoder failures are wrapped at the session
//! boundary; the original error survives only as the `source()`.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed underlying failure kept for diagnostics
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Closed set of failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input shape or option value not accepted
    InvalidInput,
    /// Input path does not exist
    FileNotFound,
    /// Bytes are not a readable PDF
    InvalidPdf,
    /// Document is encrypted and no password was given
    PasswordRequired,
    /// Supplied password was rejected
    InvalidPassword,
    /// Requested page outside `1..=page_count`
    InvalidPageNumber,
    /// Rasterization or encoding failed
    RenderFailed,
    /// Session was used after `close()`
    DocumentClosed,
    /// Anything the classifier could not place
    Unknown,
}

impl ErrorKind {
    /// Stable snake_case code, suitable for logs and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::InvalidPdf => "invalid_pdf",
            ErrorKind::PasswordRequired => "password_required",
            ErrorKind::InvalidPassword => "invalid_password",
            ErrorKind::InvalidPageNumber => "invalid_page_number",
            ErrorKind::RenderFailed => "render_failed",
            ErrorKind::DocumentClosed => "document_closed",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform error carrying a kind, a human-readable message and an optional cause
///
/// The message is for humans and logs. Branch on [`PdfError::kind`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PdfError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<Cause>,
}

impl PdfError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the underlying failure
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn file_not_found(path: &std::path::Path) -> Self {
        Self::new(
            ErrorKind::FileNotFound,
            format!("File not found: {}", path.display()),
        )
    }

    pub fn invalid_page(page: u32, page_count: u32) -> Self {
        Self::new(
            ErrorKind::InvalidPageNumber,
            format!("Invalid page number {page}: document has {page_count} pages"),
        )
    }

    pub fn render_failed(page: u32, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::RenderFailed,
            format!("Failed to render page {page}: {detail}"),
        )
    }

    pub fn document_closed() -> Self {
        Self::new(ErrorKind::DocumentClosed, "Document has been closed")
    }
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Failure reported by an engine or encoder adapter
///
/// Adapters describe what went wrong in their own vocabulary; the session
/// turns this into a [`PdfError`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<Cause>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<Cause>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<image::ImageError> for EngineError {
    fn from(err: image::ImageError) -> Self {
        EngineError::with_source(format!("Image error: {}", err), err)
    }
}

#[cfg(feature = "mupdf")]
impl From<mupdf::Error> for EngineError {
    fn from(err: mupdf::Error) -> Self {
        EngineError::with_source(format!("MuPDF error: {}", err), err)
    }
}

const PASSWORD_REJECTED: &[&str] = &["incorrect", "wrong", "invalid password"];
const PASSWORD_MISSING: &[&str] = &["password"];

// Structural tokens: generic ones first, then MuPDF's own vocabulary.
const NOT_A_PDF: &[&str] = &[
    "invalid",
    "not a pdf",
    "format",
    "no objects found",
    "startxref",
    "xref",
    "trailer",
    "version marker",
    "corrupt",
    "syntax error",
    "damaged",
];

/// Map an engine's open failure onto the taxonomy
///
/// Keyword matching over the engine message, case-insensitive. The table is
/// tied to the engine's error vocabulary and must be revisited when the
/// engine changes.
pub fn classify_open_error(err: EngineError) -> PdfError {
    let text = err.message().to_lowercase();
    let has = |tokens: &[&str]| tokens.iter().any(|t| text.contains(t));

    let (kind, message) = if has(PASSWORD_REJECTED) {
        (ErrorKind::InvalidPassword, "Incorrect password for PDF")
    } else if has(PASSWORD_MISSING) {
        (ErrorKind::PasswordRequired, "PDF is encrypted and requires a password")
    } else if has(NOT_A_PDF) {
        (ErrorKind::InvalidPdf, "Input is not a valid PDF")
    } else {
        tracing::warn!(error = %err, "unclassified engine error while opening PDF");
        (ErrorKind::Unknown, "Failed to open PDF")
    };

    let message = format!("{}: {}", message, err.message());
    PdfError::new(kind, message).with_cause(err)
}
