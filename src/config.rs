//! Environment configuration
//!
//! Default render settings can be supplied through environment variables
//! (or a `.env` file):
//!
//! | Variable                      | Meaning                         |
//! |-------------------------------|---------------------------------|
//! | `PDF_PAGES_SCALE`             | scale factor, `> 0`             |
//! | `PDF_PAGES_FORMAT`            | `jpeg`, `jpg` or `png`          |
//! | `PDF_PAGES_QUALITY`           | JPEG quality in `[0, 1]`        |
//! | `PDF_PAGES_STRICT_FONTS`      | `1/0`, `true/false`, `yes/no`   |
//! | `PDF_PAGES_CMAP_DIR`          | CMap override directory         |
//! | `PDF_PAGES_STANDARD_FONT_DIR` | standard font override directory|

use std::path::PathBuf;

use crate::error::{PdfError, Result};
use crate::types::{ImageFormat, OpenOptions, RenderOptions, ResourceDirs};

const SCALE: &str = "PDF_PAGES_SCALE";
const FORMAT: &str = "PDF_PAGES_FORMAT";
const QUALITY: &str = "PDF_PAGES_QUALITY";
const STRICT_FONTS: &str = "PDF_PAGES_STRICT_FONTS";
const CMAP_DIR: &str = "PDF_PAGES_CMAP_DIR";
const STANDARD_FONT_DIR: &str = "PDF_PAGES_STANDARD_FONT_DIR";

/// Process-wide rendering defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub render: RenderOptions,
    pub resources: ResourceDirs,
}

impl Settings {
    /// Load from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        if let Some(raw) = get(SCALE) {
            settings.render.scale = parse_number(SCALE, &raw)?;
        }
        if let Some(raw) = get(FORMAT) {
            settings.render.format = ImageFormat::from_name(&raw)
                .ok_or_else(|| invalid(FORMAT, &raw, "expected jpeg or png"))?;
        }
        if let Some(raw) = get(QUALITY) {
            settings.render.quality = parse_number(QUALITY, &raw)?;
        }
        if let Some(raw) = get(STRICT_FONTS) {
            settings.render.strict_fonts = parse_flag(&raw)
                .ok_or_else(|| invalid(STRICT_FONTS, &raw, "expected a boolean"))?;
        }
        settings.resources.cmaps = get(CMAP_DIR).map(PathBuf::from);
        settings.resources.standard_fonts = get(STANDARD_FONT_DIR).map(PathBuf::from);

        settings
            .render
            .validate()
            .map_err(|e| PdfError::invalid_input(format!("Invalid render settings: {}", e)))?;

        tracing::debug!(?settings, "loaded render settings");
        Ok(settings)
    }

    /// Open options carrying the configured resource directories
    pub fn open_options(&self, password: Option<String>) -> OpenOptions {
        OpenOptions {
            password,
            resources: self.resources.clone(),
        }
    }
}

fn invalid(key: &str, raw: &str, reason: &str) -> PdfError {
    PdfError::invalid_input(format!("{}={:?}: {}", key, raw, reason))
}

fn parse_number(key: &str, raw: &str) -> Result<f32> {
    raw.parse::<f32>()
        .map_err(|e| invalid(key, raw, &e.to_string()))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
