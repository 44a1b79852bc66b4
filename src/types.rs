//! Session data types
//!
//! Inputs, options and rendered output shared by the session and the
//! convenience helpers.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PdfError, Result};

/// Where the PDF bytes come from
///
/// Resolved to raw bytes exactly once, when the session opens.
#[derive(Debug, Clone)]
pub enum PdfInput<'a> {
    /// PDF on disk
    Path(PathBuf),
    /// PDF already in memory (owned or borrowed)
    Bytes(Cow<'a, [u8]>),
}

impl<'a> PdfInput<'a> {
    /// Read the input into memory; borrowed bytes stay borrowed
    pub(crate) fn into_bytes(self) -> Result<Cow<'a, [u8]>> {
        match self {
            PdfInput::Path(path) => read_path(&path).map(Cow::Owned),
            PdfInput::Bytes(data) if data.is_empty() => {
                Err(PdfError::invalid_input("PDF byte buffer is empty"))
            }
            PdfInput::Bytes(data) => Ok(data),
        }
    }

    /// Short description for log fields
    pub(crate) fn describe(&self) -> String {
        match self {
            PdfInput::Path(path) => path.display().to_string(),
            PdfInput::Bytes(data) => format!("<{} bytes>", data.len()),
        }
    }
}

fn read_path(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str().is_empty() {
        return Err(PdfError::invalid_input("PDF path is empty"));
    }
    if path.is_dir() {
        return Err(PdfError::invalid_input(format!(
            "PDF path is a directory: {}",
            path.display()
        )));
    }

    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PdfError::file_not_found(path).with_cause(e),
        _ => PdfError::new(
            crate::ErrorKind::Unknown,
            format!("Failed to read {}: {}", path.display(), e),
        )
        .with_cause(e),
    })
}

impl From<PathBuf> for PdfInput<'_> {
    fn from(path: PathBuf) -> Self {
        PdfInput::Path(path)
    }
}

impl From<&Path> for PdfInput<'_> {
    fn from(path: &Path) -> Self {
        PdfInput::Path(path.to_path_buf())
    }
}

impl From<&str> for PdfInput<'_> {
    fn from(path: &str) -> Self {
        PdfInput::Path(PathBuf::from(path))
    }
}

impl From<String> for PdfInput<'_> {
    fn from(path: String) -> Self {
        PdfInput::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for PdfInput<'_> {
    fn from(data: Vec<u8>) -> Self {
        PdfInput::Bytes(Cow::Owned(data))
    }
}

impl<'a> From<&'a [u8]> for PdfInput<'a> {
    fn from(data: &'a [u8]) -> Self {
        PdfInput::Bytes(Cow::Borrowed(data))
    }
}

/// Override locations for engines that load external font or CMap data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDirs {
    /// Character map (CMap) directory
    #[serde(default)]
    pub cmaps: Option<PathBuf>,
    /// Standard 14 font directory
    #[serde(default)]
    pub standard_fonts: Option<PathBuf>,
}

/// Options used when opening a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOptions {
    /// User or owner password; `None` assumes an unencrypted file
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub resources: ResourceDirs,
}

impl OpenOptions {
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Default::default()
        }
    }
}

/// Inclusive page range, 1-indexed
///
/// Missing bounds default to the first and last page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub end: Option<u32>,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Which pages to render
///
/// Absence of a selection (`None`) means every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageSelection {
    /// Explicit page numbers, rendered in the given order (duplicates allowed)
    Pages(Vec<u32>),
    Range(PageRange),
}

impl From<Vec<u32>> for PageSelection {
    fn from(pages: Vec<u32>) -> Self {
        PageSelection::Pages(pages)
    }
}

impl From<PageRange> for PageSelection {
    fn from(range: PageRange) -> Self {
        PageSelection::Range(range)
    }
}

/// Image output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    /// Parse a user-supplied format name (`jpeg`, `jpg`, `png`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

/// Per-call rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Scale factor (1.0 = 72 DPI, 2.0 = 144 DPI)
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub format: ImageFormat,
    /// JPEG quality in `[0, 1]`; ignored for PNG
    #[serde(default = "default_quality")]
    pub quality: f32,
    /// Fail the page instead of tolerating font rendering problems
    #[serde(default)]
    pub strict_fonts: bool,
}

fn default_scale() -> f32 {
    1.5
}

fn default_quality() -> f32 {
    0.85
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            format: ImageFormat::default(),
            quality: default_quality(),
            strict_fonts: false,
        }
    }
}

impl RenderOptions {
    pub fn png(scale: f32) -> Self {
        Self {
            scale,
            format: ImageFormat::Png,
            ..Default::default()
        }
    }

    pub fn jpeg(scale: f32, quality: f32) -> Self {
        Self {
            scale,
            format: ImageFormat::Jpeg,
            quality,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PdfError::invalid_input(format!(
                "Scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(PdfError::invalid_input(format!(
                "Quality must be between 0 and 1, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// One encoded page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Document page count at render time
    pub total_pages: u32,
    /// Encoded image bytes
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl RenderedPage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}
