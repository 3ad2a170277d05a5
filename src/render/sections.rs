//! Section renderers shared by the book template and the block layout.
//!
//! Plain text always goes through [`Text`], rich HTML always through
//! [`sanitize::rich`]. Nothing in this module interpolates a `&str` directly.

use crate::escape::Text;
use crate::labels;
use crate::qr::TravelLink;
use crate::render::TravelEntry;
use crate::sanitize;
use crate::types::{Travel, non_blank};
use maud::{Markup, PreEscaped, html};

/// Name shown for a travel whose name is blank.
pub const UNNAMED_TRAVEL: &str = "Путешествие";

pub fn display_name(travel: &Travel) -> &str {
    let name = travel.name.trim();
    if name.is_empty() { UNNAMED_TRAVEL } else { name }
}

/// The four user-authored rich-text fields of a travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RichField {
    Description,
    Recommendation,
    Plus,
    Minus,
}

impl RichField {
    pub const ALL: [RichField; 4] = [
        RichField::Description,
        RichField::Recommendation,
        RichField::Plus,
        RichField::Minus,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            RichField::Description => "Описание",
            RichField::Recommendation => "Рекомендации",
            RichField::Plus => "Плюсы",
            RichField::Minus => "Минусы",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            RichField::Description => "description",
            RichField::Recommendation => "recommendation",
            RichField::Plus => "plus",
            RichField::Minus => "minus",
        }
    }

    fn source(self, travel: &Travel) -> &Option<String> {
        match self {
            RichField::Description => &travel.description,
            RichField::Recommendation => &travel.recommendation,
            RichField::Plus => &travel.plus,
            RichField::Minus => &travel.minus,
        }
    }

    /// Sanitized content, or `None` when the field is absent or nothing
    /// survives sanitization.
    pub fn content(self, travel: &Travel) -> Option<PreEscaped<String>> {
        let raw = non_blank(self.source(travel))?;
        let cleaned = sanitize::rich(raw);
        (!cleaned.0.trim().is_empty()).then_some(cleaned)
    }
}

/// `h3` heading plus sanitized body, or `None` when the field is empty.
pub fn text_section(field: RichField, travel: &Travel) -> Option<Markup> {
    let content = field.content(travel)?;
    Some(html! {
        div class={ "text-section text-" (field.class_name()) } {
            h3 { (field.heading()) }
            div.pdf-text-content { (content) }
        }
    })
}

pub fn cover_photo(url: &str, alt: &str) -> Markup {
    html! {
        img.cover-photo src=(Text(url)) alt=(Text(alt)) crossorigin="anonymous";
    }
}

/// Labelled facts of a travel in display order; absent facts are skipped.
pub fn meta_items(travel: &Travel) -> Vec<(&'static str, String)> {
    let mut items = Vec::new();
    if let Some(country) = non_blank(&travel.country_name) {
        items.push(("Страна:", country.to_string()));
    }
    if let Some(complexity) = non_blank(&travel.complexity) {
        items.push(("Сложность:", complexity.to_string()));
    }
    if let Some(days) = travel.days() {
        items.push(("Дней:", days.to_string()));
    }
    if !travel.transports.is_empty() {
        items.push(("Транспорт:", travel.transports.join(", ")));
    }
    items
}

pub fn meta_strip(travel: &Travel) -> Option<Markup> {
    let items = meta_items(travel);
    if items.is_empty() {
        return None;
    }
    Some(html! {
        div.meta-strip {
            @for (label, value) in &items {
                div.meta-item {
                    span.meta-label { (label) }
                    " "
                    span.meta-value { (Text(value)) }
                }
            }
        }
    })
}

/// Country, year and duration joined for one-line captions.
pub fn caption(travel: &Travel) -> Option<String> {
    let parts: Vec<String> = [
        non_blank(&travel.country_name).map(str::to_string),
        travel.year.filter(|y| *y > 0).map(|y| y.to_string()),
        labels::days(travel.number_days),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!parts.is_empty()).then(|| parts.join(" · "))
}

/// QR image with its link, or `None` without an image.
pub fn qr_code(link: &TravelLink) -> Option<Markup> {
    let image = link.image.as_deref()?;
    Some(html! {
        div.meta-qr {
            img.qr-image src=(Text(image)) alt="QR";
            div.qr-caption {
                div.qr-label { "Онлайн-версия" }
                @if let Some(url) = &link.url {
                    div.qr-url { (Text(url)) }
                }
            }
        }
    })
}

/// Column count for an unconfigured grid of `photos` images.
pub fn auto_columns(photos: usize) -> u32 {
    match photos {
        0..=4 => 2,
        5..=6 => 3,
        _ => 4,
    }
}

/// Photo grid with fixed cell height. `image_height` must be a CSS length.
pub fn gallery_grid(photos: &[String], columns: u32, image_height: &str, alt: &str) -> Markup {
    html! {
        div.gallery-grid style={ "grid-template-columns: repeat(" (columns) ", 1fr);" } {
            @for (i, url) in photos.iter().enumerate() {
                figure.gallery-item style={ "height: " (image_height) ";" } {
                    img src=(Text(url)) alt=(Text(&format!("{alt}, фото {}", i + 1))) crossorigin="anonymous";
                }
            }
        }
    }
}

/// TOC entries with their estimated page numbers.
pub fn toc_list<'a>(entries: impl IntoIterator<Item = TravelEntry<'a>>) -> Markup {
    html! {
        div.toc-list {
            @for entry in entries {
                div.toc-item {
                    span.toc-name { (entry.index + 1) ". " (Text(display_name(entry.travel))) }
                    @if let Some(country) = non_blank(&entry.travel.country_name) {
                        span.toc-country { (Text(country)) }
                    }
                    span { (entry.page) }
                }
            }
        }
    }
}
