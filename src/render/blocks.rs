//! Custom block layout.
//!
//! Enabled blocks render in ascending `order`. Document-level blocks (cover,
//! toc, spacer) render once. Consecutive travel-level blocks form a *run*
//! that is rendered travel-major, so each travel reads as one chapter:
//!
//! ```text
//! blocks:  cover  toc  photo description qr  spacer
//! output:  cover  toc  photo₁ description₁ qr₁
//!                      photo₂ description₂ qr₂  spacer
//! ```
//!
//! Every block is one `section.pdf-page`. Its effective page break becomes
//! inline print CSS on that section: `always` forces a break before it,
//! `avoid` keeps it on one page.

use crate::assets::photo_url;
use crate::escape::Text;
use crate::labels;
use crate::render::map::route_map;
use crate::render::sections::{
    RichField, caption, cover_photo, display_name, gallery_grid, toc_list,
};
use crate::render::{RenderContext, TravelEntry, is_css_length};
use crate::types::{
    Block, BlockKind, BlockScope, GalleryConfig, ImageSize, Layout, LayoutMode, PageBreak,
    SpacerConfig,
};
use maud::{Markup, html};

pub const DEFAULT_GALLERY_COLUMNS: u32 = 3;
pub const MAX_GALLERY_COLUMNS: u32 = 6;

impl ImageSize {
    /// Fixed cell height of a gallery block.
    pub fn height(self) -> &'static str {
        match self {
            ImageSize::Small => "60mm",
            ImageSize::Medium => "80mm",
            ImageSize::Large => "100mm",
        }
    }
}

impl PageBreak {
    /// Inline print CSS for a block section, `None` for `auto`.
    pub fn style(self) -> Option<&'static str> {
        match self {
            PageBreak::Auto => None,
            PageBreak::Always => Some("page-break-before: always; break-before: page;"),
            PageBreak::Avoid => Some("page-break-inside: avoid; break-inside: avoid;"),
        }
    }
}

/// Render a layout into page sections, in output order.
pub fn render_layout(ctx: &RenderContext<'_>, layout: &Layout) -> Vec<Markup> {
    let blocks = layout.enabled_blocks();
    let mut pages = Vec::new();

    let mut rest = blocks.as_slice();
    while let Some(first) = rest.first() {
        match first.kind.scope() {
            BlockScope::Document => {
                pages.extend(render_document_block(ctx, first, layout.mode));
                rest = &rest[1..];
            }
            BlockScope::Travel => {
                let len = rest
                    .iter()
                    .take_while(|b| b.kind.scope() == BlockScope::Travel)
                    .count();
                let (run, tail) = rest.split_at(len);
                for entry in ctx.entries() {
                    pages.extend(
                        run.iter()
                            .filter_map(|block| render_travel_block(ctx, block, layout.mode, entry)),
                    );
                }
                rest = tail;
            }
        }
    }

    tracing::debug!(blocks = blocks.len(), sections = pages.len(), "layout rendered");
    pages
}

fn render_document_block(ctx: &RenderContext<'_>, block: &Block, mode: LayoutMode) -> Option<Markup> {
    let body = match &block.kind {
        BlockKind::Cover => cover(ctx),
        BlockKind::Toc => toc(ctx),
        BlockKind::Spacer(config) => spacer(ctx, config),
        other => {
            tracing::warn!(block = other.type_name(), "travel block rendered at document level");
            return None;
        }
    };
    Some(page(block, mode, &body))
}

/// One travel's instance of a travel-level block, or `None` when the travel
/// has no data for it.
fn render_travel_block(
    ctx: &RenderContext<'_>,
    block: &Block,
    mode: LayoutMode,
    entry: TravelEntry<'_>,
) -> Option<Markup> {
    let body = match &block.kind {
        BlockKind::Photo => photo(entry)?,
        BlockKind::Description => rich(entry, RichField::Description)?,
        BlockKind::Recommendation => rich(entry, RichField::Recommendation)?,
        BlockKind::Plus => rich(entry, RichField::Plus)?,
        BlockKind::Minus => rich(entry, RichField::Minus)?,
        BlockKind::Gallery(config) => gallery(entry, config),
        BlockKind::Map => map(ctx, block, entry)?,
        BlockKind::Qr => qr(entry)?,
        BlockKind::Cover | BlockKind::Toc | BlockKind::Spacer(_) => return None,
    };
    Some(page(block, mode, &body))
}

/// Wrap a block body into its page section.
fn page(block: &Block, mode: LayoutMode, body: &Markup) -> Markup {
    let style = block.effective_page_break(mode).style();
    html! {
        section class={ "pdf-page " (block.kind.type_name()) "-page" } style=[style] {
            (body)
        }
    }
}

fn cover(ctx: &RenderContext<'_>) -> Markup {
    let background = ctx.book_cover().map(|url| {
        format!(
            "background-image: linear-gradient(180deg, rgba(0,0,0,0.35) 0%, rgba(0,0,0,0.75) 100%), url('{}');",
            super::book::css_url(url)
        )
    });
    html! {
        div.cover-body style=[background] {
            h1.book-title { (Text(ctx.title)) }
            @if let Some(subtitle) = ctx.settings.subtitle() {
                div.book-subtitle { (Text(subtitle)) }
            }
            div.book-count { (labels::travel_count(ctx.travels.len())) }
            @if let Some(years) = labels::year_range(ctx.travels) {
                div.book-years { (years) }
            }
        }
    }
}

fn toc(ctx: &RenderContext<'_>) -> Markup {
    html! {
        div.page-body {
            h2.toc-title { "Содержание" }
            (toc_list(ctx.entries()))
        }
    }
}

fn spacer(ctx: &RenderContext<'_>, config: &SpacerConfig) -> Markup {
    let fallback = ctx.config.layout.spacer_height.as_str();
    let height = match config.height.as_deref() {
        Some(h) if is_css_length(h) => h.trim(),
        Some(h) => {
            tracing::warn!(height = h, fallback, "invalid spacer height, using default");
            fallback
        }
        None => fallback,
    };
    html! {
        div.spacer style={ "height: " (height) ";" } {}
    }
}

fn photo(entry: TravelEntry<'_>) -> Option<Markup> {
    let cover = entry.assets.cover_url()?;
    let name = display_name(entry.travel);
    Some(html! {
        div.photo-body {
            (cover_photo(cover, name))
            div.photo-overlay {
                h1.photo-title { (Text(name)) }
                @if let Some(caption) = caption(entry.travel) {
                    div.photo-caption { (Text(&caption)) }
                }
            }
        }
    })
}

fn rich(entry: TravelEntry<'_>, field: RichField) -> Option<Markup> {
    let content = field.content(entry.travel)?;
    Some(html! {
        div.page-body {
            h2.block-title { (field.heading()) }
            p.block-travel { (Text(display_name(entry.travel))) }
            div class={ "pdf-text-content block-" (field.class_name()) } { (content) }
        }
    })
}

/// Photos a gallery block shows for one travel.
///
/// Explicit `selectedPhotos` index the raw gallery (out-of-range indices are
/// ignored). Without a selection the block shows the same residual grid as
/// the book template, which is empty below two photos.
pub fn gallery_photos(entry: TravelEntry<'_>, config: &GalleryConfig) -> Vec<String> {
    if config.selected_photos.is_empty() {
        return entry
            .assets
            .gallery_grid()
            .map(<[String]>::to_vec)
            .unwrap_or_default();
    }
    config
        .selected_photos
        .iter()
        .filter_map(|&i| entry.travel.gallery.get(i))
        .filter_map(photo_url)
        .collect()
}

fn gallery(entry: TravelEntry<'_>, config: &GalleryConfig) -> Markup {
    let photos = gallery_photos(entry, config);
    let name = display_name(entry.travel);
    let columns = config
        .columns
        .unwrap_or(DEFAULT_GALLERY_COLUMNS)
        .clamp(1, MAX_GALLERY_COLUMNS);

    html! {
        div.page-body {
            h2.block-title { "Фотогалерея" }
            p.block-travel { (Text(name)) }
            @if photos.is_empty() {
                div.gallery-empty { "Галерея пуста" }
            } @else {
                (gallery_grid(&photos, columns, config.image_size.height(), name))
            }
        }
    }
}

/// Fragment id unique per block and travel; `block.id` is user text.
fn svg_id(block: &Block, entry: TravelEntry<'_>) -> String {
    let block_id: String = block
        .id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("block-{block_id}-{}", entry.index)
}

fn map(ctx: &RenderContext<'_>, block: &Block, entry: TravelEntry<'_>) -> Option<Markup> {
    let map = route_map(entry.travel, ctx.theme, &svg_id(block, entry))?;
    Some(html! {
        div.page-body {
            h2.block-title { "Карта маршрута" }
            p.block-travel { (Text(display_name(entry.travel))) }
            (map)
        }
    })
}

fn qr(entry: TravelEntry<'_>) -> Option<Markup> {
    let image = entry.link.image.as_deref()?;
    Some(html! {
        div.page-body.qr-body {
            h2.block-title { "Онлайн-версия" }
            p.block-travel { (Text(display_name(entry.travel))) }
            img.qr-large src=(Text(image)) alt="QR";
            @if let Some(url) = &entry.link.url {
                div.qr-url { (Text(url)) }
            }
        }
    })
}
