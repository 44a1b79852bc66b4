//! Page selection
//!
//! Turns a caller's selection into the concrete, ordered list of 1-indexed
//! page numbers to render.

use crate::error::{PdfError, Result};
use crate::types::{PageRange, PageSelection};

/// Resolve a selection against a known page count
///
/// - `None` selects `1..=page_count`
/// - an explicit list is returned as given (order and duplicates kept) once
///   every entry is within bounds
/// - a range fills in missing bounds and must satisfy
///   `1 <= start <= end <= page_count`
///
/// Out-of-range values are rejected with [`crate::ErrorKind::InvalidPageNumber`],
/// never clamped.
pub fn resolve_pages(selection: Option<&PageSelection>, page_count: u32) -> Result<Vec<u32>> {
    match selection {
        None => Ok((1..=page_count).collect()),
        Some(PageSelection::Pages(pages)) => {
            if let Some(&bad) = pages.iter().find(|&&p| p < 1 || p > page_count) {
                return Err(PdfError::invalid_page(bad, page_count));
            }
            Ok(pages.clone())
        }
        Some(PageSelection::Range(range)) => resolve_range(range, page_count),
    }
}

fn resolve_range(range: &PageRange, page_count: u32) -> Result<Vec<u32>> {
    let start = range.start.unwrap_or(1);
    let end = range.end.unwrap_or(page_count);

    if start < 1 || start > page_count {
        return Err(PdfError::invalid_page(start, page_count));
    }
    if end < start || end > page_count {
        return Err(PdfError::invalid_page(end, page_count));
    }

    Ok((start..=end).collect())
}
