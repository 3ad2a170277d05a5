//! Shared test utilities for the travel-book test suite.
//!
//! Builders for travel records, a counting [`QrProvider`] stand-in, and
//! shortcuts that render pages without the document wrapper so assertions
//! only see section markup.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut t = linked(travel("Татры"), "tatry");
//! t.gallery = photos(&["https://img/1.jpg", "https://img/2.jpg"]);
//!
//! let html = render_book_html(&[t], &BookSettings::default());
//! assert_eq!(count(&html, r#"class="section-title""#), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use maud::Markup;

use crate::config::BookConfig;
use crate::pagination::Pagination;
use crate::qr::{self, QrError, QrProvider, TravelLink};
use crate::render::{RenderContext, blocks, book};
use crate::types::{
    BOOK_DEFAULT_TITLE, BookSettings, GalleryItem, LAYOUT_DEFAULT_TITLE, Layout, RecordId, Travel,
    TravelLocation,
};

// =========================================================================
// Record builders
// =========================================================================

/// A travel with only a name and an id derived from it.
pub fn travel(name: &str) -> Travel {
    Travel {
        id: RecordId::Text(name.to_string()),
        name: name.to_string(),
        ..Default::default()
    }
}

/// Gallery entries for the given URLs, without timestamps.
pub fn photos(urls: &[&str]) -> Vec<GalleryItem> {
    urls.iter()
        .map(|url| GalleryItem {
            url: url.to_string(),
            ..Default::default()
        })
        .collect()
}

/// A travel with route points given as `(address, coord)`.
pub fn located(name: &str, points: &[(&str, Option<&str>)]) -> Travel {
    Travel {
        travel_address: points
            .iter()
            .map(|(address, coord)| TravelLocation {
                address: address.to_string(),
                coord: coord.map(str::to_string),
                ..Default::default()
            })
            .collect(),
        ..travel(name)
    }
}

/// Give a travel a public slug.
pub fn linked(travel: Travel, slug: &str) -> Travel {
    Travel {
        slug: Some(slug.to_string()),
        ..travel
    }
}

/// Non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

// =========================================================================
// QR stand-in
// =========================================================================

/// Provider that records calls and answers `data:image/png;base64,qr:<url>`.
///
/// URLs containing the `fail` pattern return an error instead.
#[derive(Debug, Default)]
pub struct CountingQr {
    pub calls: AtomicUsize,
    fail: Option<String>,
}

impl CountingQr {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: Some(pattern.to_string()),
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_on("")
    }
}

impl QrProvider for CountingQr {
    fn generate(&self, url: &str) -> Result<String, QrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail {
            Some(pattern) if url.contains(pattern.as_str()) => {
                Err(QrError::Provider(format!("refused {url}")))
            }
            _ => Ok(format!("data:image/png;base64,qr:{url}")),
        }
    }
}

// =========================================================================
// Rendering shortcuts
// =========================================================================

fn join(pages: Vec<Markup>) -> String {
    pages.into_iter().map(Markup::into_string).collect()
}

/// Book pages for `travels` in input order, with no QR links.
pub fn render_book_html(travels: &[Travel], settings: &BookSettings) -> String {
    crate::logging::init_test_logging();
    let config = BookConfig::default();
    let assets = crate::assets::resolve_all(travels);
    let links = vec![TravelLink::default(); travels.len()];
    let ctx = RenderContext::new(
        settings,
        &config,
        settings.title_or(BOOK_DEFAULT_TITLE),
        travels,
        &assets,
        &links,
        Pagination::BOOK,
    );
    join(book::render_book(&ctx))
}

/// Layout sections for `travels` in input order. Slugged travels get a QR
/// image from [`CountingQr`].
pub fn render_layout_html(travels: &[Travel], settings: &BookSettings, layout: &Layout) -> String {
    crate::logging::init_test_logging();
    let config = BookConfig::default();
    let assets = crate::assets::resolve_all(travels);
    let links = qr::generate_all(travels, &config.site, &CountingQr::default());
    let ctx = RenderContext::new(
        settings,
        &config,
        settings.title_or(LAYOUT_DEFAULT_TITLE),
        travels,
        &assets,
        &links,
        Pagination::LAYOUT,
    );
    join(blocks::render_layout(&ctx, layout))
}
