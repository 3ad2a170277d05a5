//! Final document assembly.
//!
//! Wraps the rendered page sections into one self-contained HTML document.
//! The only stylesheet is inline, built from four layers:
//!
//! 1. Theme variables for the chosen template ([`crate::theme`])
//! 2. Page geometry: `@page` size, page box dimensions, padding, print breaks
//! 3. `static/base.css`: sections shared by both renderers
//! 4. `static/book.css` or `static/layout.css`
//!
//! ## Page Geometry
//!
//! | format | book (CSS px) | layout (mm)    |
//! |--------|---------------|----------------|
//! | A4     | 794 x 1123    | 210 x 297      |
//! | Letter | 816 x 1056    | 215.9 x 279.4  |
//!
//! Landscape swaps width and height. Heights are minimums: content that
//! overflows a logical page grows it instead of being clipped.

use crate::escape::Text;
use crate::theme::{TemplateTheme, generate_theme_css};
use crate::types::{BookSettings, LayoutMode, Margins, Orientation, PageFormat};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_BASE: &str = include_str!("../static/base.css");
const CSS_BOOK: &str = include_str!("../static/book.css");
const CSS_LAYOUT: &str = include_str!("../static/layout.css");

/// Which renderer produced the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Book,
    Layout(LayoutMode),
}

impl DocumentKind {
    /// CSS class of one logical page.
    fn page_class(self) -> &'static str {
        match self {
            DocumentKind::Book => "page",
            DocumentKind::Layout(_) => "pdf-page",
        }
    }

    fn body_class(self) -> &'static str {
        match self {
            DocumentKind::Book => "book",
            DocumentKind::Layout(LayoutMode::Flow) => "layout-flow",
            DocumentKind::Layout(LayoutMode::PagePerBlock) => "layout-page-per-block",
        }
    }
}

impl Margins {
    /// Inner padding of a logical page.
    pub fn padding(self) -> &'static str {
        match self {
            Margins::Standard => "15mm",
            Margins::Narrow => "8mm",
            Margins::Wide => "25mm",
        }
    }
}

/// Width and minimum height of a logical page, as CSS lengths.
pub fn page_size(kind: DocumentKind, format: PageFormat, orientation: Orientation) -> (&'static str, &'static str) {
    let (short, long) = match (kind, format) {
        (DocumentKind::Book, PageFormat::A4) => ("794px", "1123px"),
        (DocumentKind::Book, PageFormat::Letter) => ("816px", "1056px"),
        (DocumentKind::Layout(_), PageFormat::A4) => ("210mm", "297mm"),
        (DocumentKind::Layout(_), PageFormat::Letter) => ("215.9mm", "279.4mm"),
    };
    match orientation {
        Orientation::Portrait => (short, long),
        Orientation::Landscape => (long, short),
    }
}

/// `@page` rule, page box geometry and print breaks.
fn page_css(kind: DocumentKind, settings: &BookSettings) -> String {
    let (width, min_height) = page_size(kind, settings.format, settings.orientation);
    let size = match settings.format {
        PageFormat::A4 => "A4",
        PageFormat::Letter => "letter",
    };
    let class = kind.page_class();
    let padding = settings.margins.padding();
    // Book pages pad themselves; layout pages leave full-bleed blocks (cover,
    // photo) unpadded and pad only their body.
    let padded = match kind {
        DocumentKind::Book => format!(".{class}"),
        DocumentKind::Layout(_) => format!(".{class} > .page-body, .{class} > .spacer"),
    };

    format!(
        r#"@page {{
    size: {size} {orientation};
    margin: 0;
}}

.{class} {{
    width: {width};
    min-height: {min_height};
}}

{padded} {{
    padding: {padding};
}}

.title-page {{
    padding: 40mm 30mm;
}}

@media print {{
    .{class} {{
        page-break-after: always;
        break-after: page;
    }}
}}"#,
        orientation = settings.orientation,
    )
}

/// The complete inline stylesheet for a document.
pub fn stylesheet(kind: DocumentKind, settings: &BookSettings) -> String {
    let theme = generate_theme_css(TemplateTheme::for_template(settings.template));
    let layout_css = match kind {
        DocumentKind::Book => CSS_BOOK,
        DocumentKind::Layout(_) => CSS_LAYOUT,
    };
    format!(
        "{theme}\n\n{}\n\n{CSS_BASE}\n\n{layout_css}",
        page_css(kind, settings)
    )
}

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ru" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (Text(title)) }
                style { (PreEscaped(css)) }
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

/// Concatenate `pages` in order into one HTML document string.
pub fn assemble(kind: DocumentKind, title: &str, settings: &BookSettings, pages: &[Markup]) -> String {
    let css = stylesheet(kind, settings);
    let content = html! {
        @for page in pages {
            (page)
        }
    };
    base_document(title, &css, kind.body_class(), content).into_string()
}
