//! Extraction of the displayable region from fetched view pages.
//!
//! The backend serves full HTML pages; the gallery viewport only wants
//! the visualization markup inside them. Standalone deployments splice
//! whole pages instead. Both policies live behind [`ViewContent`] and are
//! chosen once, at controller construction.

use std::sync::Arc;

/// Default id of the region that holds the visualization markup.
pub const DEFAULT_REGION_ID: &str = "ajax-view";

/// Policy for what part of a fetched page lands in the viewport.
pub trait ViewContent: Send + Sync {
    /// Pull the displayable region out of a fetched page body.
    ///
    /// `None` means the page carried no such region and nothing should be
    /// spliced.
    fn content(&self, body: &str) -> Option<String>;
}

/// Carves out the element with a marker id, including the element itself.
///
/// Tag and attribute names are matched case-insensitively and nested
/// elements of the same tag are balanced; this is not a full HTML parser
/// and expects the mostly well-formed markup the backend actually serves.
pub struct AjaxRegion {
    region_id: String,
}

impl AjaxRegion {
    pub fn new(region_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
        }
    }
}

impl Default for AjaxRegion {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_ID)
    }
}

impl ViewContent for AjaxRegion {
    fn content(&self, body: &str) -> Option<String> {
        let lower = body.to_ascii_lowercase();
        let marker = locate_marker(&lower, &self.region_id)?;
        let start = lower[..marker].rfind('<')?;
        let tag: String = lower[start + 1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if tag.is_empty() {
            return None;
        }
        let end = element_end(&lower, start, &tag)?;
        Some(body[start..end].to_owned())
    }
}

/// Passes fetched pages through whole, for standalone view routes that
/// already serve bare visualization markup.
pub struct FullDocument;

impl ViewContent for FullDocument {
    fn content(&self, body: &str) -> Option<String> {
        Some(body.to_owned())
    }
}

/// Which [`ViewContent`] policy a controller uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewScope {
    /// Carve the marker region out of full pages.
    #[default]
    Embedded,
    /// Splice fetched pages in whole.
    Standalone,
}

impl ViewScope {
    pub fn content(self) -> Arc<dyn ViewContent> {
        match self {
            ViewScope::Embedded => Arc::new(AjaxRegion::default()),
            ViewScope::Standalone => Arc::new(FullDocument),
        }
    }

    /// Parse a scope name as written in configuration, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "embedded" => Some(ViewScope::Embedded),
            "standalone" => Some(ViewScope::Standalone),
            _ => None,
        }
    }
}

/// Byte offset of the `id=` attribute naming the region, in either quote
/// style. `lower` must already be lowercased.
fn locate_marker(lower: &str, region_id: &str) -> Option<usize> {
    let region_id = region_id.to_ascii_lowercase();
    for quote in ['"', '\''] {
        let marker = format!("id={quote}{region_id}{quote}");
        if let Some(pos) = lower.find(&marker) {
            return Some(pos);
        }
    }
    None
}

/// End offset (exclusive) of the element whose opening `<` sits at
/// `start`, balancing nested elements of the same tag.
fn element_end(lower: &str, start: usize, tag: &str) -> Option<usize> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut depth = 0usize;
    let mut pos = start;
    while pos < lower.len() {
        let next_open = lower[pos..].find(&open).map(|i| pos + i);
        let next_close = lower[pos..].find(&close).map(|i| pos + i);
        match (next_open, next_close) {
            (Some(o), c) if c.map_or(true, |c| o < c) => {
                let gt = lower[o..].find('>').map(|i| o + i)?;
                if tag_name_ends(lower, o + open.len()) {
                    let self_closing = lower.as_bytes()[gt - 1] == b'/';
                    if !self_closing {
                        depth += 1;
                    }
                }
                pos = gt + 1;
            }
            (_, Some(c)) => {
                let gt = lower[c..].find('>').map(|i| c + i)?;
                if tag_name_ends(lower, c + close.len()) {
                    if depth <= 1 {
                        return Some(gt + 1);
                    }
                    depth -= 1;
                }
                pos = gt + 1;
            }
            (_, None) => return None,
        }
    }
    None
}

/// Whether the tag name ends at `at`, so `<div` does not match `<divider`.
fn tag_name_ends(lower: &str, at: usize) -> bool {
    match lower.as_bytes().get(at) {
        Some(b) => !b.is_ascii_alphanumeric() && *b != b'-',
        None => false,
    }
}
