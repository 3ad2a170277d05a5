//! QR codes linking each travel to its online version.
//!
//! ## Link Resolution
//!
//! ```text
//! slug present  →  <base_url>/travels/<slug>
//! url present   →  url, verbatim
//! neither       →  no link, no QR section
//! ```
//!
//! ## Fan-out
//!
//! [`generate_all`] issues one independent request per linked travel through a
//! rayon parallel iterator and collects every result, in travel order, before
//! any page is rendered. A failed request is logged and becomes `None`; only
//! that travel loses its QR section.
//!
//! The image itself comes from a [`QrProvider`]. [`PngQrProvider`] encodes
//! with the `qrcode` crate and returns a PNG `data:` URI, so the document
//! stays self-contained.

use crate::config::{QrConfig, SiteConfig};
use crate::types::{Travel, non_blank};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use rayon::prelude::*;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("QR provider failed: {0}")]
    Provider(String),
}

/// Turns a URL into an embeddable image (`data:` URI).
///
/// Implementations must be shareable across rayon workers.
pub trait QrProvider: Send + Sync {
    fn generate(&self, url: &str) -> Result<String, QrError>;
}

/// Public URL of a travel, if it has one.
pub fn public_url(travel: &Travel, site: &SiteConfig) -> Option<String> {
    if let Some(slug) = non_blank(&travel.slug) {
        let base = site.base_url.trim().trim_end_matches('/');
        return Some(format!("{base}/travels/{slug}"));
    }
    non_blank(&travel.url).map(str::to_string)
}

/// QR image and link of one travel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelLink {
    pub url: Option<String>,
    /// `data:` URI, absent when there is no URL or generation failed.
    pub image: Option<String>,
}

/// Generate QR images for all travels in parallel.
///
/// The result has one entry per travel, in the same order.
pub fn generate_all(
    travels: &[Travel],
    site: &SiteConfig,
    provider: &dyn QrProvider,
) -> Vec<TravelLink> {
    travels
        .par_iter()
        .map(|travel| {
            let url = public_url(travel, site);
            let image = url.as_deref().and_then(|url| match provider.generate(url) {
                Ok(data_uri) => Some(data_uri),
                Err(e) => {
                    tracing::warn!(travel = %travel.id, url, error = %e, "QR generation failed, omitting QR section");
                    None
                }
            });
            TravelLink { url, image }
        })
        .collect()
}

/// Local QR renderer producing PNG `data:` URIs.
#[derive(Debug, Clone, Default)]
pub struct PngQrProvider {
    config: QrConfig,
}

impl PngQrProvider {
    pub fn new(config: QrConfig) -> Self {
        Self { config }
    }
}

impl QrProvider for PngQrProvider {
    fn generate(&self, url: &str) -> Result<String, QrError> {
        let code = QrCode::new(url.as_bytes())?;
        let pixels = code
            .render::<Luma<u8>>()
            .quiet_zone(self.config.quiet_zone)
            .min_dimensions(self.config.width, self.config.width)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(pixels).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
    }
}
