//! Image asset resolution.
//!
//! Decides which photo represents each travel (its *cover*) and which photos
//! remain for the gallery grid.
//!
//! ## Cover Resolution
//!
//! ```text
//! 1. travel_image_thumb_url (if not blank)   → cover, grid = whole gallery
//! 2. gallery[0]                               → cover, grid = gallery[1..]
//! 3. nothing                                  → no cover section at all
//! ```
//!
//! The grid is only shown with at least two photos left, so a travel with a
//! single photo shows it as the cover and nothing else.
//!
//! ## Cache Busting
//!
//! Gallery entries carrying `updated_at` get a `v=` query parameter derived
//! from that value (first 8 hex chars of its SHA-256). The parameter changes
//! when the photo is re-uploaded and stays identical across exports otherwise,
//! so output remains deterministic.

use crate::types::{CoverType, GalleryItem, Travel, non_blank};
use sha2::{Digest, Sha256};

/// Minimum photos left after cover extraction for a gallery grid to render.
pub const MIN_GRID_PHOTOS: usize = 2;

/// Where a travel's cover photo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSource {
    Thumb,
    Gallery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    pub url: String,
    pub source: CoverSource,
}

/// Resolved images of one travel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelAssets {
    pub cover: Option<Cover>,
    /// Every usable gallery photo, in gallery order.
    pub photos: Vec<String>,
    /// Photos for the gallery grid: `photos` minus the cover when the cover
    /// came from the gallery.
    pub residual: Vec<String>,
}

impl TravelAssets {
    pub fn resolve(travel: &Travel) -> Self {
        let photos: Vec<String> = travel.gallery.iter().filter_map(photo_url).collect();

        let (cover, residual) = match non_blank(&travel.travel_image_thumb_url) {
            Some(thumb) => (
                Some(Cover {
                    url: thumb.to_string(),
                    source: CoverSource::Thumb,
                }),
                photos.clone(),
            ),
            None => match photos.split_first() {
                Some((first, rest)) => (
                    Some(Cover {
                        url: first.clone(),
                        source: CoverSource::Gallery,
                    }),
                    rest.to_vec(),
                ),
                None => (None, Vec::new()),
            },
        };

        Self {
            cover,
            photos,
            residual,
        }
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover.as_ref().map(|c| c.url.as_str())
    }

    /// The gallery grid, or `None` when fewer than [`MIN_GRID_PHOTOS`] remain.
    pub fn gallery_grid(&self) -> Option<&[String]> {
        (self.residual.len() >= MIN_GRID_PHOTOS).then_some(self.residual.as_slice())
    }
}

/// Resolve every travel, keeping positions aligned with the input.
pub fn resolve_all(travels: &[Travel]) -> Vec<TravelAssets> {
    travels.iter().map(TravelAssets::resolve).collect()
}

/// The URL to embed for a gallery entry, or `None` if it has no URL.
pub fn photo_url(item: &GalleryItem) -> Option<String> {
    let url = item.url.trim();
    if url.is_empty() {
        return None;
    }
    Some(match non_blank(&item.updated_at) {
        Some(updated_at) => cache_bust(url, updated_at),
        None => url.to_string(),
    })
}

/// Append a `v=` parameter derived from `version`.
pub fn cache_bust(url: &str, version: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(version.as_bytes()));
    let separator = if url.contains('?') { '&' } else { '?' };
    match url.split_once('#') {
        Some((base, fragment)) => format!("{base}{separator}v={}#{fragment}", &digest[..8]),
        None => format!("{url}{separator}v={}", &digest[..8]),
    }
}

/// Background image of the title page, if any.
///
/// - `gradient` → none
/// - `custom` → the configured cover image
/// - `first-photo` → cover of the first travel
/// - `auto` → the configured cover image, else the first travel with a cover
pub fn book_cover<'a>(
    cover_type: CoverType,
    cover_image: Option<&'a str>,
    assets: &'a [TravelAssets],
) -> Option<&'a str> {
    match cover_type {
        CoverType::Gradient => None,
        CoverType::Custom => cover_image,
        CoverType::FirstPhoto => assets.first().and_then(TravelAssets::cover_url),
        CoverType::Auto => cover_image.or_else(|| assets.iter().find_map(TravelAssets::cover_url)),
    }
}
