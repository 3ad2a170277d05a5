//! CLI output formatting.
//!
//! Output is information-first: every travel leads with its positional index
//! and name, details follow as indented context lines.
//!
//! ## Book / Layout
//!
//! ```text
//! Коллекция путешествий
//! 001 Татры → p. 4
//! 002 Рига → p. 8
//!
//! QR codes: 1 of 2 linked travels
//! Wrote dist/book.html (48213 bytes)
//! ```
//!
//! ## Check
//!
//! ```text
//! Travels (date-desc)
//! 001 Татры (3 photos)
//!     Cover: thumbnail
//!     Link: https://metravel.by/travels/tatry
//!     Route: 2 points
//!     Горы, озёра и долгие подъёмы...
//! 002 Рига
//!     Cover: none
//!
//! Layout (flow)
//!     001 cover
//!     002 gallery (travel)
//! ```
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::assets::{CoverSource, TravelAssets};
use crate::config::SiteConfig;
use crate::generate::{BookRequest, RenderedBook};
use crate::qr::public_url;
use crate::render::sections::display_name;
use crate::sort::sort_travels;
use crate::types::{BlockScope, Layout, non_blank};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn photo_detail(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => " (1 photo)".to_string(),
        n => format!(" ({} photos)", n),
    }
}

// ============================================================================
// Book / Layout output
// ============================================================================

/// Format the summary of a generated document.
pub fn format_render_output(rendered: &RenderedBook, output: &Path) -> Vec<String> {
    let mut lines = vec![rendered.title.clone()];
    for (i, entry) in rendered.toc.iter().enumerate() {
        lines.push(format!("{} {} → p. {}", format_index(i + 1), entry.name, entry.page));
    }
    lines.push(String::new());
    if rendered.linked > 0 {
        lines.push(format!(
            "QR codes: {} of {} linked travels",
            rendered.qr_generated, rendered.linked
        ));
    }
    lines.push(format!(
        "Wrote {} ({} bytes)",
        output.display(),
        rendered.html.len()
    ));
    lines
}

pub fn print_render_output(rendered: &RenderedBook, output: &Path) {
    for line in format_render_output(rendered, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format a request inventory: travels in render order, then the layout.
pub fn format_check_output(
    request: &BookRequest,
    layout: Option<&Layout>,
    site: &SiteConfig,
) -> Vec<String> {
    let mut lines = vec![format!("Travels ({})", request.settings.sort_order)];

    for (i, travel) in sort_travels(&request.travels, request.settings.sort_order)
        .iter()
        .enumerate()
    {
        let assets = TravelAssets::resolve(travel);
        lines.push(format!(
            "{} {}{}",
            format_index(i + 1),
            display_name(travel),
            photo_detail(assets.photos.len())
        ));

        let cover = match assets.cover.as_ref().map(|c| c.source) {
            Some(CoverSource::Thumb) => "thumbnail",
            Some(CoverSource::Gallery) => "first gallery photo",
            None => "none",
        };
        lines.push(format!("    Cover: {}", cover));

        if let Some(url) = public_url(travel, site) {
            lines.push(format!("    Link: {}", url));
        }
        if !travel.travel_address.is_empty() {
            lines.push(format!("    Route: {} points", travel.travel_address.len()));
        }
        if let Some(desc) = non_blank(&travel.description) {
            let plain = strip_html_tags(desc);
            let truncated = truncate_desc(plain.trim(), 60);
            if !truncated.is_empty() {
                lines.push(format!("    {}", truncated));
            }
        }
    }

    if let Some(layout) = layout {
        lines.push(String::new());
        lines.push(format!("Layout ({})", layout.mode));
        for (i, block) in layout.enabled_blocks().iter().enumerate() {
            let scope = match block.kind.scope() {
                BlockScope::Document => "",
                BlockScope::Travel => " (travel)",
            };
            lines.push(format!(
                "    {} {}{}",
                format_index(i + 1),
                block.kind.type_name(),
                scope
            ));
        }
    }

    lines
}

pub fn print_check_output(request: &BookRequest, layout: Option<&Layout>, site: &SiteConfig) {
    for line in format_check_output(request, layout, site) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::TocEntry;
    use crate::test_helpers::{linked, located, photos, travel};
    use crate::types::{Block, BlockKind, BookSettings, LayoutMode, SortOrder, Travel};

    #[test]
    fn strip_html_tags_nested() {
        assert_eq!(
            strip_html_tags("<div><p>Some <em>text</em></p></div>"),
            "Some text"
        );
    }

    #[test]
    fn truncate_desc_counts_characters() {
        assert_eq!(truncate_desc("Горы", 10), "Горы");
        assert_eq!(truncate_desc("Горы и озёра", 4), "Горы...");
    }

    #[test]
    fn render_output_lists_toc_and_qr() {
        let rendered = RenderedBook {
            html: "x".repeat(10),
            title: "Лето".to_string(),
            toc: vec![
                TocEntry {
                    name: "Татры".to_string(),
                    page: 4,
                },
                TocEntry {
                    name: "Рига".to_string(),
                    page: 8,
                },
            ],
            linked: 2,
            qr_generated: 1,
        };
        let lines = format_render_output(&rendered, Path::new("dist/book.html"));
        assert_eq!(
            lines,
            vec![
                "Лето",
                "001 Татры → p. 4",
                "002 Рига → p. 8",
                "",
                "QR codes: 1 of 2 linked travels",
                "Wrote dist/book.html (10 bytes)",
            ]
        );
    }

    #[test]
    fn render_output_without_links_skips_qr_line() {
        let rendered = RenderedBook {
            html: String::new(),
            title: "T".to_string(),
            toc: Vec::new(),
            linked: 0,
            qr_generated: 0,
        };
        let lines = format_render_output(&rendered, Path::new("out.html"));
        assert!(!lines.iter().any(|l| l.starts_with("QR")));
    }

    #[test]
    fn check_output_shows_travel_details_in_sorted_order() {
        let mut tatry = linked(
            located("Татры", &[("Закопане", Some("49.3,19.9")), ("", None)]),
            "tatry",
        );
        tatry.travel_image_thumb_url = Some("https://img/t.jpg".to_string());
        tatry.gallery = photos(&["https://img/1.jpg", "https://img/2.jpg"]);
        tatry.description = Some("<p>Горы</p>".to_string());
        let riga = Travel {
            year: Some(2024),
            ..travel("Рига")
        };
        let request = BookRequest {
            travels: vec![tatry, riga],
            settings: BookSettings {
                sort_order: SortOrder::DateDesc,
                ..Default::default()
            },
            layout: None,
        };

        let lines = format_check_output(&request, None, &SiteConfig::default());
        assert_eq!(
            lines,
            vec![
                "Travels (date-desc)",
                "001 Рига",
                "    Cover: none",
                "002 Татры (2 photos)",
                "    Cover: thumbnail",
                "    Link: https://metravel.by/travels/tatry",
                "    Route: 2 points",
                "    Горы",
            ]
        );
    }

    #[test]
    fn check_output_lists_enabled_blocks() {
        let mut hidden = Block::new("h", BlockKind::Toc, 0);
        hidden.enabled = false;
        let layout = Layout {
            mode: LayoutMode::PagePerBlock,
            blocks: vec![
                Block::new("g", BlockKind::Gallery(Default::default()), 2),
                Block::new("c", BlockKind::Cover, 1),
                hidden,
            ],
        };
        let lines = format_check_output(&BookRequest::default(), Some(&layout), &SiteConfig::default());
        assert_eq!(
            &lines[1..],
            &["", "Layout (page-per-block)", "    001 cover", "    002 gallery (travel)"]
        );
    }
}
