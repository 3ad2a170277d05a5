//! Book generation front doors.
//!
//! Two entry points turn a travel list into a print-ready HTML document:
//!
//! - [`generate_book`]: the fixed book template
//! - [`generate_layout`]: a user-defined block [`Layout`]
//!
//! Both run the same pipeline:
//!
//! ```text
//! sort travels ─→ resolve assets ─→ QR fan-out (rayon) ─→ render pages ─→ assemble
//!                                                          │
//!                                      TOC page estimates ─┘
//! ```
//!
//! Text is escaped and rich fields sanitized inside the section renderers,
//! which both front doors share. The front doors never fail: missing data
//! omits sections, bad settings fall back to defaults, a failed QR drops that
//! travel's QR only. Errors exist only at the file level ([`generate_file`]).
//!
//! ## Request File
//!
//! ```json
//! {
//!   "travels": [ { "id": 1, "name": "Татры", "slug": "tatry", ... } ],
//!   "settings": { "title": "Лето", "template": "classic", ... },
//!   "layout": { "layoutMode": "flow", "blocks": [ ... ] }
//! }
//! ```
//!
//! `settings` and `layout` are optional.

use crate::assets::{self, TravelAssets};
use crate::config::{BookConfig, ConfigError};
use crate::document::{self, DocumentKind};
use crate::pagination::Pagination;
use crate::qr::{self, QrProvider, TravelLink};
use crate::render::{RenderContext, blocks, book};
use crate::sort::sort_travels;
use crate::types::{BOOK_DEFAULT_TITLE, BookSettings, LAYOUT_DEFAULT_TITLE, Layout, Travel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no layout: the request has no \"layout\" and none was given")]
    MissingLayout,
}

/// Input of one export, as read from a request file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookRequest {
    pub travels: Vec<Travel>,
    pub settings: BookSettings,
    pub layout: Option<Layout>,
}

/// One TOC row: travel name and estimated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub name: String,
    pub page: u64,
}

/// A generated document plus what went into it.
#[derive(Debug, Clone)]
pub struct RenderedBook {
    pub html: String,
    pub title: String,
    pub toc: Vec<TocEntry>,
    /// Travels that have a public URL.
    pub linked: usize,
    /// Travels whose QR image was generated.
    pub qr_generated: usize,
}

/// Sorted travels with their index-aligned assets and QR links.
struct Prepared {
    travels: Vec<Travel>,
    assets: Vec<TravelAssets>,
    links: Vec<TravelLink>,
}

impl Prepared {
    fn new(
        travels: &[Travel],
        settings: &BookSettings,
        provider: &dyn QrProvider,
        config: &BookConfig,
    ) -> Self {
        let travels = sort_travels(travels, settings.sort_order);
        let assets = assets::resolve_all(&travels);
        let links = qr::generate_all(&travels, &config.site, provider);
        tracing::debug!(
            travels = travels.len(),
            order = %settings.sort_order,
            "travels prepared"
        );
        Self {
            travels,
            assets,
            links,
        }
    }

    fn context<'a>(
        &'a self,
        settings: &'a BookSettings,
        config: &'a BookConfig,
        title: &'a str,
        pagination: Pagination,
    ) -> RenderContext<'a> {
        RenderContext::new(
            settings,
            config,
            title,
            &self.travels,
            &self.assets,
            &self.links,
            pagination,
        )
    }

    fn finish(&self, ctx: &RenderContext<'_>, html: String) -> RenderedBook {
        let toc = ctx
            .entries()
            .map(|entry| TocEntry {
                name: crate::render::sections::display_name(entry.travel).to_string(),
                page: entry.page,
            })
            .collect();
        RenderedBook {
            html,
            title: ctx.title.to_string(),
            toc,
            linked: self.links.iter().filter(|l| l.url.is_some()).count(),
            qr_generated: self.links.iter().filter(|l| l.image.is_some()).count(),
        }
    }
}

/// Render the fixed book template.
pub fn generate_book(
    travels: &[Travel],
    settings: &BookSettings,
    provider: &dyn QrProvider,
    config: &BookConfig,
) -> RenderedBook {
    let prepared = Prepared::new(travels, settings, provider, config);
    let title = settings.title_or(BOOK_DEFAULT_TITLE);
    let ctx = prepared.context(settings, config, title, config.pagination.book);

    let pages = book::render_book(&ctx);
    let html = document::assemble(DocumentKind::Book, title, settings, &pages);
    tracing::debug!(pages = pages.len(), bytes = html.len(), "book assembled");
    prepared.finish(&ctx, html)
}

/// Render a user-defined block layout.
pub fn generate_layout(
    travels: &[Travel],
    settings: &BookSettings,
    layout: &Layout,
    provider: &dyn QrProvider,
    config: &BookConfig,
) -> RenderedBook {
    let prepared = Prepared::new(travels, settings, provider, config);
    let title = settings.title_or(LAYOUT_DEFAULT_TITLE);
    let ctx = prepared.context(settings, config, title, config.pagination.layout);

    let sections = blocks::render_layout(&ctx, layout);
    let html = document::assemble(DocumentKind::Layout(layout.mode), title, settings, &sections);
    tracing::debug!(sections = sections.len(), bytes = html.len(), "layout assembled");
    prepared.finish(&ctx, html)
}

pub fn load_request(path: &Path) -> Result<BookRequest, GenerateError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn load_layout(path: &Path) -> Result<Layout, GenerateError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Which front door a file-level generation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Book,
    Layout,
}

/// Read a request, render it, write the HTML to `output`.
///
/// In layout mode `layout_override` replaces the request's own layout.
pub fn generate_file(
    mode: Mode,
    input: &Path,
    layout_override: Option<&Path>,
    output: &Path,
    provider: &dyn QrProvider,
    config: &BookConfig,
) -> Result<RenderedBook, GenerateError> {
    let request = load_request(input)?;
    let rendered = match mode {
        Mode::Book => generate_book(&request.travels, &request.settings, provider, config),
        Mode::Layout => {
            let layout = match layout_override {
                Some(path) => load_layout(path)?,
                None => request.layout.ok_or(GenerateError::MissingLayout)?,
            };
            generate_layout(&request.travels, &request.settings, &layout, provider, config)
        }
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &rendered.html)?;
    tracing::info!(output = %output.display(), travels = rendered.toc.len(), "document written");
    Ok(rendered)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{CountingQr, count, linked, photos, travel};
    use crate::types::{Block, BlockKind, LayoutMode, SortOrder};
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn book(travels: &[Travel], settings: &BookSettings) -> RenderedBook {
        generate_book(travels, settings, &CountingQr::default(), &BookConfig::default())
    }

    fn full_layout() -> Layout {
        let kinds = [
            BlockKind::Cover,
            BlockKind::Toc,
            BlockKind::Photo,
            BlockKind::Description,
            BlockKind::Gallery(Default::default()),
            BlockKind::Qr,
        ];
        Layout {
            mode: LayoutMode::Flow,
            blocks: kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| Block::new(format!("b{i}"), kind, i as i64))
                .collect(),
        }
    }

    #[test]
    fn script_title_is_escaped_in_both_modes() {
        let settings = BookSettings {
            title: Some("<script>alert('x')</script>Лето".to_string()),
            ..Default::default()
        };
        let provider = CountingQr::default();
        let config = BookConfig::default();
        let outputs = [
            generate_book(&[travel("a")], &settings, &provider, &config).html,
            generate_layout(&[travel("a")], &settings, &full_layout(), &provider, &config).html,
        ];
        for html in outputs {
            assert!(!html.contains("<script"));
            assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;Лето"));
        }
    }

    #[test]
    fn empty_list_yields_complete_document() {
        let rendered = book(&[], &BookSettings::default());
        assert!(rendered.html.starts_with("<!DOCTYPE html>"));
        assert!(rendered.html.contains(BOOK_DEFAULT_TITLE));
        assert!(rendered.html.contains("Подборка: 0"));
        assert!(rendered.html.contains("Содержание"));
        assert!(!rendered.html.contains(r#"class="section-title""#));
        assert!(rendered.toc.is_empty());
    }

    #[test]
    fn layout_default_title() {
        let rendered = generate_layout(
            &[],
            &BookSettings::default(),
            &full_layout(),
            &CountingQr::default(),
            &BookConfig::default(),
        );
        assert_eq!(rendered.title, LAYOUT_DEFAULT_TITLE);
        assert!(rendered.html.contains("0 путешествий"));
    }

    #[test]
    fn toc_follows_sorted_order_and_mode_formula() {
        let with_year = |name: &str, year| Travel {
            year: Some(year),
            ..travel(name)
        };
        let travels = [with_year("old", 2010), with_year("new", 2024), with_year("mid", 2018)];
        let settings = BookSettings {
            sort_order: SortOrder::DateDesc,
            ..Default::default()
        };

        let rendered = book(&travels, &settings);
        let names: Vec<&str> = rendered.toc.iter().map(|e| e.name.as_str()).collect();
        let pages: Vec<u64> = rendered.toc.iter().map(|e| e.page).collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
        assert_eq!(pages, vec![4, 8, 12]);

        let layout = generate_layout(
            &travels,
            &settings,
            &full_layout(),
            &CountingQr::default(),
            &BookConfig::default(),
        );
        let pages: Vec<u64> = layout.toc.iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![3, 5, 7]);
    }

    #[test]
    fn configured_pagination_is_used() {
        let mut config = BookConfig::default();
        config.pagination.book = Pagination {
            first_page: 3,
            pages_per_travel: 2,
        };
        let rendered = generate_book(
            &[travel("a"), travel("b")],
            &BookSettings::default(),
            &CountingQr::default(),
            &config,
        );
        let pages: Vec<u64> = rendered.toc.iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![3, 5]);
    }

    #[test]
    fn one_qr_call_per_linked_travel_despite_failures() {
        let travels: Vec<Travel> = ["a", "b", "c", "d"]
            .iter()
            .map(|slug| linked(travel(slug), slug))
            .chain([travel("unlinked")])
            .collect();
        let provider = CountingQr::failing_on("/travels/c");

        let rendered = generate_book(
            &travels,
            &BookSettings::default(),
            &provider,
            &BookConfig::default(),
        );

        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        assert_eq!(rendered.linked, 4);
        assert_eq!(rendered.qr_generated, 3);
        assert_eq!(count(&rendered.html, r#"class="meta-qr""#), 3);
        assert!(!rendered.html.contains("qr:https://metravel.by/travels/c"));
    }

    #[test]
    fn all_qr_failing_still_yields_document() {
        let travels = [linked(travel("a"), "a"), linked(travel("b"), "b")];
        let rendered = generate_book(
            &travels,
            &BookSettings::default(),
            &CountingQr::always_failing(),
            &BookConfig::default(),
        );
        assert_eq!(rendered.qr_generated, 0);
        assert!(!rendered.html.contains(r#"class="meta-qr""#));
        assert_eq!(count(&rendered.html, r#"class="section-title""#), 2);
    }

    #[test]
    fn identical_inputs_identical_output() {
        let mut t = linked(travel("Татры"), "tatry");
        t.gallery = photos(&["https://img/1.jpg", "https://img/2.jpg", "https://img/3.jpg"]);
        t.gallery[1].updated_at = Some("2024-05-01T10:00:00Z".to_string());
        t.description = Some("<p>Горы</p>".to_string());
        let travels = [t, travel("Рига")];
        let settings = BookSettings::default();

        assert_eq!(book(&travels, &settings).html, book(&travels, &settings).html);

        let layout = full_layout();
        let provider = CountingQr::default();
        let config = BookConfig::default();
        assert_eq!(
            generate_layout(&travels, &settings, &layout, &provider, &config).html,
            generate_layout(&travels, &settings, &layout, &provider, &config).html,
        );
    }

    #[test]
    fn thumb_cover_keeps_full_gallery() {
        let mut t = travel("t");
        t.travel_image_thumb_url = Some("https://img/thumb.jpg".to_string());
        t.gallery = photos(&["https://img/1.jpg", "https://img/2.jpg", "https://img/3.jpg"]);
        let html = book(&[t], &BookSettings::default()).html;
        let grid = &html[html.find(r#"class="gallery-grid""#).unwrap()..];
        assert_eq!(count(grid, "<img "), 3);
        assert!(html.contains(r#"src="https://img/thumb.jpg""#));
    }

    #[test]
    fn generate_file_writes_document() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("request.json");
        fs::write(
            &input,
            r#"{
                "travels": [{"id": 1, "name": "Татры", "slug": "tatry", "year": 2021}],
                "settings": {"title": "Горы", "template": "adventure"}
            }"#,
        )
        .unwrap();
        let output = tmp.path().join("out/book.html");

        let rendered = generate_file(
            Mode::Book,
            &input,
            None,
            &output,
            &CountingQr::default(),
            &BookConfig::default(),
        )
        .unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, rendered.html);
        assert!(written.contains("Горы"));
        assert!(written.contains("--accent: #f97316;"));
    }

    #[test]
    fn layout_mode_requires_layout() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("request.json");
        fs::write(&input, r#"{"travels": []}"#).unwrap();
        let result = generate_file(
            Mode::Layout,
            &input,
            None,
            &tmp.path().join("out.html"),
            &CountingQr::default(),
            &BookConfig::default(),
        );
        assert!(matches!(result, Err(GenerateError::MissingLayout)));
    }

    #[test]
    fn layout_override_file_is_used() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("request.json");
        fs::write(&input, r#"{"travels": [{"id": 1, "name": "A"}]}"#).unwrap();
        let layout = tmp.path().join("layout.json");
        fs::write(
            &layout,
            r#"{"layoutMode": "page-per-block", "blocks": [{"id": "s", "type": "spacer", "enabled": true, "order": 0}]}"#,
        )
        .unwrap();

        let rendered = generate_file(
            Mode::Layout,
            &input,
            Some(&layout),
            &tmp.path().join("out.html"),
            &CountingQr::default(),
            &BookConfig::default(),
        )
        .unwrap();
        assert!(rendered.html.contains("spacer-page"));
        assert!(rendered.html.contains("page-break-before: always;"));
    }

    #[test]
    fn loose_request_shapes_still_render() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("request.json");
        fs::write(
            &input,
            r#"{
                "travels": [{
                    "id": "3",
                    "name": null,
                    "gallery": ["https://img/a.jpg", {"url": "https://img/b.jpg"}, 5, "https://img/c.jpg"]
                }],
                "settings": {"includeGallery": null, "includeToc": "false"}
            }"#,
        )
        .unwrap();

        let request = load_request(&input).unwrap();
        assert_eq!(request.travels[0].name, "");
        assert!(request.settings.include_gallery);
        assert!(!request.settings.include_toc);

        let html = book(&request.travels, &request.settings).html;
        assert!(html.contains("gallery-grid"));
        assert!(html.contains("https://img/c.jpg"));
    }

    #[test]
    fn invalid_json_is_error() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("request.json");
        fs::write(&input, "{ nope").unwrap();
        assert!(matches!(load_request(&input), Err(GenerateError::Json(_))));
    }
}
