//! Scriptable engine for tests
//!
//! Counts opens, rasterizations and releases so lifecycle guarantees can be
//! asserted without a native engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{EngineDocument, OpenRequest, RasterPage, RenderEngine};
use crate::error::EngineError;

#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    opens: Arc<AtomicUsize>,
    rasterizations: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
}

impl Counters {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn rasterizations(&self) -> usize {
        self.rasterizations.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MockEngine {
    /// Page sizes in points
    pub pages: Vec<(u32, u32)>,
    pub password: Option<String>,
    /// Message returned from every open attempt
    pub open_error: Option<String>,
    /// 0-indexed page whose rasterization fails
    pub fail_page: Option<u32>,
    /// 0-indexed page that reports a font warning
    pub font_warning_page: Option<u32>,
    pub counters: Counters,
}

impl MockEngine {
    /// Engine whose documents have `count` US Letter pages
    pub fn with_pages(count: usize) -> Self {
        Self {
            pages: vec![(612, 792); count],
            ..Default::default()
        }
    }
}

impl RenderEngine for MockEngine {
    fn open(
        &self,
        _data: &[u8],
        request: &OpenRequest,
    ) -> Result<Box<dyn EngineDocument>, EngineError> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.open_error {
            return Err(EngineError::new(message.clone()));
        }
        if let Some(expected) = &self.password {
            match &request.password {
                None => return Err(EngineError::new("No password given")),
                Some(given) if given != expected => {
                    return Err(EngineError::new("Incorrect Password"))
                }
                Some(_) => {}
            }
        }

        Ok(Box::new(MockDocument {
            engine: self.clone(),
        }))
    }
}

struct MockDocument {
    engine: MockEngine,
}

impl EngineDocument for MockDocument {
    fn page_count(&self) -> Result<u32, EngineError> {
        Ok(self.engine.pages.len() as u32)
    }

    fn rasterize(&self, page_index: u32, scale: f32) -> Result<RasterPage, EngineError> {
        self.engine
            .counters
            .rasterizations
            .fetch_add(1, Ordering::SeqCst);

        let &(w, h) = self
            .engine
            .pages
            .get(page_index as usize)
            .ok_or_else(|| EngineError::new(format!("no page at index {}", page_index)))?;
        if self.engine.fail_page == Some(page_index) {
            return Err(EngineError::new("corrupt content stream"));
        }

        let width = ((w as f32) * scale).round().max(1.0) as u32;
        let height = ((h as f32) * scale).round().max(1.0) as u32;
        let shade = (page_index as u8).wrapping_mul(40);
        let pixels = [shade, shade, shade, 255].repeat((width * height) as usize);

        let font_warnings = if self.engine.font_warning_page == Some(page_index) {
            vec!["TT: undefined function: 32".to_string()]
        } else {
            Vec::new()
        };

        Ok(RasterPage {
            pixels,
            width,
            height,
            font_warnings,
        })
    }
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.engine.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}
