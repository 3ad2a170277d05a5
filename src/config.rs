//! Generator configuration module.
//!
//! Handles loading, validating, and merging `book.toml`. Export *settings*
//! (title, template, sort order) come from the user per export and live in
//! [`crate::types::BookSettings`]; this file holds the deployment-level knobs
//! that stay the same across exports.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! base_url = "https://metravel.by"  # Public site, used for QR links
//!
//! [qr]
//! width = 200               # Minimum QR image edge in pixels
//! quiet_zone = true         # White border around the code
//!
//! [pagination.book]
//! first_page = 4            # TOC page number of the first travel
//! pages_per_travel = 4      # Estimated pages consumed per travel
//!
//! [pagination.layout]
//! first_page = 3
//! pages_per_travel = 2
//!
//! [layout]
//! spacer_height = "20mm"    # Spacer block height when the block sets none
//!
//! [processing]
//! max_processes = 4         # Max parallel QR workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::pagination::Pagination;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `book.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookConfig {
    /// Public site settings.
    pub site: SiteConfig,
    /// QR image rendering settings.
    pub qr: QrConfig,
    /// TOC page estimation per rendering mode.
    pub pagination: PaginationConfig,
    /// Custom layout defaults.
    pub layout: LayoutConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl BookConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.site.base_url.trim();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigError::Validation(
                "site.base_url must start with http:// or https://".into(),
            ));
        }
        if self.qr.width == 0 {
            return Err(ConfigError::Validation("qr.width must be non-zero".into()));
        }
        for (name, pagination) in [
            ("book", &self.pagination.book),
            ("layout", &self.pagination.layout),
        ] {
            if pagination.pages_per_travel == 0 {
                return Err(ConfigError::Validation(format!(
                    "pagination.{name}.pages_per_travel must be at least 1"
                )));
            }
        }
        if !crate::render::is_css_length(&self.layout.spacer_height) {
            return Err(ConfigError::Validation(
                "layout.spacer_height must be a CSS length like \"20mm\"".into(),
            ));
        }
        Ok(())
    }
}

/// Public site settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Base of canonical travel URLs: `<base_url>/travels/<slug>`.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://metravel.by".to_string(),
        }
    }
}

/// QR image rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QrConfig {
    /// Minimum edge of the generated PNG in pixels.
    pub width: u32,
    /// Draw the standard white quiet zone around the code.
    pub quiet_zone: bool,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            width: 200,
            quiet_zone: true,
        }
    }
}

/// TOC page estimation for each rendering mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Fixed book template.
    pub book: Pagination,
    /// Custom block layout.
    pub layout: Pagination,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            book: Pagination::BOOK,
            layout: Pagination::LAYOUT,
        }
    }
}

/// Custom layout defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Height of a spacer block whose config doesn't set one.
    pub spacer_height: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacer_height: "20mm".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel QR workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(BookConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<BookConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BookConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `book.toml` file.
///
/// A missing file yields the stock defaults. Present files are merged on top
/// of the defaults, unknown keys are rejected, and the result is validated.
pub fn load_config(path: &Path) -> Result<BookConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(overlay))
}

/// Returns a fully-commented stock `book.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Travel Book Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Per-export choices (title, template, sort order, page format) are not set
# here: they travel with each export request as "settings".

# ---------------------------------------------------------------------------
# Public site
# ---------------------------------------------------------------------------
[site]
# QR codes link to <base_url>/travels/<slug>.
base_url = "https://metravel.by"

# ---------------------------------------------------------------------------
# QR codes
# ---------------------------------------------------------------------------
[qr]
# Minimum edge of the generated PNG in pixels.
width = 200

# Draw the white quiet zone around the code.
quiet_zone = true

# ---------------------------------------------------------------------------
# Table of contents page estimation: first_page + index * pages_per_travel
# ---------------------------------------------------------------------------
[pagination.book]
first_page = 4
pages_per_travel = 4

[pagination.layout]
first_page = 3
pages_per_travel = 2

# ---------------------------------------------------------------------------
# Custom layouts
# ---------------------------------------------------------------------------
[layout]
# Spacer block height when the block config sets none.
spacer_height = "20mm"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel QR workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = BookConfig::default();
        assert_eq!(config.site.base_url, "https://metravel.by");
        assert_eq!(config.qr.width, 200);
        assert_eq!(config.pagination.book, Pagination::BOOK);
        assert_eq!(config.pagination.layout, Pagination::LAYOUT);
        assert_eq!(config.layout.spacer_height, "20mm");
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn partial_overlay_keeps_mode_defaults() {
        let overlay: toml::Value = toml::from_str(
            r#"
[pagination.layout]
pages_per_travel = 3
"#,
        )
        .unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(config.pagination.layout.pages_per_travel, 3);
        assert_eq!(config.pagination.layout.first_page, 3);
        assert_eq!(config.pagination.book, Pagination::BOOK);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("book.toml")).unwrap();
        assert_eq!(config, BookConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.toml");
        fs::write(
            &path,
            r#"
[site]
base_url = "https://example.org"

[qr]
width = 320
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.site.base_url, "https://example.org");
        assert_eq!(config.qr.width, 320);
        assert!(config.qr.quiet_zone);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<BookConfig, _> = toml::from_str("[qr]\nwidht = 100\n");
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<BookConfig, _> = toml::from_str("[qrcode]\nwidth = 100\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(BookConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_pages_per_travel() {
        let mut config = BookConfig::default();
        config.pagination.book.pages_per_travel = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pagination.book"));
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = BookConfig::default();
        config.site.base_url = "metravel.by".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_bad_spacer_height() {
        let mut config = BookConfig::default();
        config.layout.spacer_height = "20mm; background: red".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book.toml");
        fs::write(&path, "[qr]\nwidth = 0\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r#"
[pagination.book]
first_page = 4
pages_per_travel = 4
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[pagination.book]\nfirst_page = 5\n").unwrap();
        let merged = merge_toml(base, overlay);
        let book = merged.get("pagination").unwrap().get("book").unwrap();
        assert_eq!(book.get("first_page").unwrap().as_integer(), Some(5));
        assert_eq!(book.get("pages_per_travel").unwrap().as_integer(), Some(4));
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: BookConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, BookConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[site]",
            "[qr]",
            "[pagination.book]",
            "[pagination.layout]",
            "[layout]",
            "[processing]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }
}
