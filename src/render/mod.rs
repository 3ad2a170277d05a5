//! Page rendering.
//!
//! Both front doors share one [`RenderContext`] and one set of section
//! renderers ([`sections`], [`map`]). They differ only in the macro-structure
//! they compose those sections into:
//!
//! - [`book`]: fixed template (title, TOC, one two-column page per travel)
//! - [`blocks`]: user-defined block layout
//!
//! Every renderer returns `Option<Markup>` when its source data may be absent;
//! `None` means the section is omitted, never rendered empty.

pub mod blocks;
pub mod book;
pub mod map;
pub mod sections;

use crate::assets::{self, TravelAssets};
use crate::config::BookConfig;
use crate::pagination::Pagination;
use crate::qr::TravelLink;
use crate::theme::TemplateTheme;
use crate::types::{BookSettings, Travel};
use regex::Regex;
use std::sync::LazyLock;

static CSS_LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|\d+(\.\d+)?(mm|cm|in|pt|pc|px|em|rem|vh|vw|%))$")
        .expect("invalid CSS length regex")
});

/// True for a single non-negative CSS length such as `20mm` or `1.5rem`.
///
/// Values that end up inside a `style` attribute must pass this check.
pub fn is_css_length(value: &str) -> bool {
    CSS_LENGTH.is_match(value.trim())
}

/// Everything a renderer may read, computed once per generation call.
///
/// `travels`, `assets`, `links` and `pages` are index-aligned.
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub settings: &'a BookSettings,
    pub config: &'a BookConfig,
    pub theme: &'static TemplateTheme,
    pub title: &'a str,
    pub travels: &'a [Travel],
    pub assets: &'a [TravelAssets],
    pub links: &'a [TravelLink],
    pub pages: Vec<u64>,
}

/// One travel together with its resolved data.
#[derive(Debug, Clone, Copy)]
pub struct TravelEntry<'a> {
    pub index: usize,
    pub travel: &'a Travel,
    pub assets: &'a TravelAssets,
    pub link: &'a TravelLink,
    /// Estimated TOC page.
    pub page: u64,
}

impl<'a> RenderContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: &'a BookSettings,
        config: &'a BookConfig,
        title: &'a str,
        travels: &'a [Travel],
        assets: &'a [TravelAssets],
        links: &'a [TravelLink],
        pagination: Pagination,
    ) -> Self {
        Self {
            settings,
            config,
            theme: TemplateTheme::for_template(settings.template),
            title,
            travels,
            assets,
            links,
            pages: pagination.pages(travels.len()),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = TravelEntry<'_>> {
        self.travels
            .iter()
            .zip(self.assets)
            .zip(self.links)
            .zip(&self.pages)
            .enumerate()
            .map(|(index, (((travel, assets), link), page))| TravelEntry {
                index,
                travel,
                assets,
                link,
                page: *page,
            })
    }

    /// Background photo of the title page, if the cover type yields one.
    pub fn book_cover(&self) -> Option<&str> {
        let custom = crate::types::non_blank(&self.settings.cover_image);
        assets::book_cover(self.settings.cover_type, custom, self.assets)
    }
}
