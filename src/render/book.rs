//! Fixed "book" template.
//!
//! ```text
//! title page     title, subtitle, "Подборка: N", year range
//! TOC page       one row per travel with its estimated page   (includeToc)
//! per travel     two-column page
//!                  left:  name, cover photo, meta strip, QR
//!                  right: description, recommendation, plus, minus
//!                then gallery grid                              (includeGallery)
//!                then route map                                 (includeMap)
//! ```

use crate::escape::Text;
use crate::labels;
use crate::render::map::route_map;
use crate::render::sections::{
    RichField, auto_columns, cover_photo, display_name, gallery_grid, meta_strip, qr_code,
    text_section, toc_list,
};
use crate::render::{RenderContext, TravelEntry};
use maud::{Markup, html};

/// Render all pages of the book in document order.
pub fn render_book(ctx: &RenderContext<'_>) -> Vec<Markup> {
    let mut pages = Vec::with_capacity(ctx.travels.len() + 2);
    pages.push(title_page(ctx));
    if ctx.settings.include_toc {
        pages.push(toc_page(ctx));
    }
    pages.extend(ctx.entries().map(|entry| travel_page(ctx, entry)));
    pages
}

fn title_page(ctx: &RenderContext<'_>) -> Markup {
    let count = ctx.travels.len();
    let background = ctx.book_cover().map(|url| {
        format!(
            "background-image: linear-gradient(180deg, rgba(0,0,0,0.35) 0%, rgba(0,0,0,0.75) 100%), url('{}');",
            css_url(url)
        )
    });

    html! {
        section.page.title-page style=[background] {
            div.title-body {
                @if let Some(subtitle) = ctx.settings.subtitle() {
                    div.book-subtitle { (Text(subtitle)) }
                }
                h1.book-title { (Text(ctx.title)) }
                div.book-count { "Подборка: " (count) }
                div.book-stats {
                    div.book-stat {
                        div.stat-value { (count) }
                        div.stat-label { (labels::plural_ru(count as u64, ["путешествие", "путешествия", "путешествий"])) }
                    }
                    @if let Some(years) = labels::year_range(ctx.travels) {
                        div.book-stat {
                            div.stat-value { (years) }
                            div.stat-label { "годы" }
                        }
                    }
                }
            }
        }
    }
}

fn toc_page(ctx: &RenderContext<'_>) -> Markup {
    html! {
        section.page.toc {
            h2.toc-title { "Содержание" }
            p.toc-count { (labels::travel_count(ctx.travels.len())) }
            (toc_list(ctx.entries()))
        }
    }
}

fn travel_page(ctx: &RenderContext<'_>, entry: TravelEntry<'_>) -> Markup {
    let name = display_name(entry.travel);
    let rich: Vec<Markup> = RichField::ALL
        .iter()
        .filter_map(|field| text_section(*field, entry.travel))
        .collect();

    html! {
        section.page {
            div.two-col {
                div.col {
                    h2.section-title { (Text(name)) }
                    @if let Some(cover) = entry.assets.cover_url() {
                        (cover_photo(cover, name))
                    }
                    @if let Some(meta) = meta_strip(entry.travel) {
                        (meta)
                    }
                    @if let Some(qr) = qr_code(entry.link) {
                        (qr)
                    }
                }
                div.col {
                    @for section in &rich {
                        (section)
                    }
                }
            }
            @if ctx.settings.include_gallery {
                @if let Some(photos) = entry.assets.gallery_grid() {
                    div.gallery {
                        h3.gallery-title { "Фото" }
                        (gallery_grid(photos, auto_columns(photos.len()), "60mm", name))
                        p.gallery-count { (labels::photo_count(photos.len())) }
                    }
                }
            }
            @if ctx.settings.include_map {
                @if let Some(map) = route_map(entry.travel, ctx.theme, &entry.index.to_string()) {
                    div.map-section {
                        h3.map-title { "Маршрут" }
                        (map)
                    }
                }
            }
        }
    }
}

/// Escape a URL for use inside `url('...')` in a `style` attribute.
///
/// Maud escapes the attribute itself; this only keeps the CSS string intact.
pub(crate) fn css_url(url: &str) -> String {
    url.chars()
        .filter(|c| !c.is_control())
        .flat_map(|c| match c {
            '\'' | '\\' | '(' | ')' => vec!['\\', c],
            c => vec![c],
        })
        .collect()
}
