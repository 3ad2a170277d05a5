//! # Travel Book
//!
//! Turns a user's travel records into one print-ready HTML document: a
//! "travel book". The document is self-contained (inline CSS, inline SVG maps,
//! QR codes as data URIs) and is meant to be handed to a browser's print step,
//! which this crate never drives.
//!
//! # Architecture: One Pipeline, Two Renderers
//!
//! ```text
//! request.json ─→ sort ─→ resolve covers/galleries ─→ QR fan-out ─→ render ─→ assemble ─→ book.html
//!                                                                    │
//!                                                     book template ─┤
//!                                                     block layout ──┘
//! ```
//!
//! Both renderers share the same section renderers (text, meta strip,
//! gallery grid, route map, QR), the same escaping and the same sanitizer.
//! They differ only in how sections are composed into pages.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Travel records, book settings and layout blocks as they arrive in JSON |
//! | [`generate`] | The two front doors: [`generate::generate_book`], [`generate::generate_layout`] |
//! | [`render`] | Page renderers and shared section renderers, built with Maud |
//! | [`document`] | Wraps pages into the final HTML document with its inline stylesheet |
//! | [`assets`] | Cover and gallery resolution, cache-busting photo URLs |
//! | [`qr`] | Public travel URLs and parallel QR image generation |
//! | [`theme`] | Per-template color schemes exposed as CSS custom properties |
//! | [`sort`] | Stable travel ordering with Russian-friendly collation |
//! | [`pagination`] | Estimated TOC page numbers |
//! | [`labels`] | Russian plural forms and short summary labels |
//! | [`escape`] / [`sanitize`] | Plain text escaping, rich HTML allow-listing |
//! | [`config`] | `book.toml` loading, merging over stock defaults, validation |
//! | [`logging`] | Tracing subscriber setup for the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Never Fail on Bad Data
//!
//! Generation has no error path. Missing fields omit their section, unknown
//! settings fall back to defaults, unknown layout blocks are skipped, and a
//! QR failure drops only that travel's QR. Errors exist only where files are
//! read or written.
//!
//! ## Maud Over String Templates
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Every interpolation
//! is escaped unless it is explicitly wrapped, and the only wrapped values are
//! the sanitizer's output and the generated stylesheet.
//!
//! ## Deterministic Output
//!
//! Identical input yields byte-identical HTML: no timestamps, no random ids,
//! stable sorting, and cache-busting parameters derived from upload timestamps
//! rather than the clock.

pub mod assets;
pub mod config;
pub mod document;
pub mod escape;
pub mod generate;
pub mod labels;
pub mod logging;
pub mod output;
pub mod pagination;
pub mod qr;
pub mod render;
pub mod sanitize;
pub mod sort;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
