//! Input types shared by both rendering front doors.
//!
//! Everything here is caller-supplied and read-only for the duration of one
//! generation call. The types deserialize from the JSON shapes the travel
//! listing API and the export dialog produce, which is why field names mix
//! `camelCase` (`countryName`) and `snake_case` (`travel_image_thumb_url`).
//!
//! ## Lenient Settings
//!
//! Export settings come from a UI and from persisted "last used" values that
//! may predate the current option set. An unrecognized enum value never fails
//! deserialization: it is replaced by the documented default and logged at
//! `warn`. The same applies to block types in a [`Layout`]: unknown blocks are
//! skipped instead of rejecting the whole layout.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned by the settings enums' `FromStr` for values outside the option set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown value: {0:?}")]
pub struct UnknownVariant(pub String);

macro_rules! settings_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident,
        { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire name used in JSON settings.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Parse a wire value, substituting the default for unknown input.
            pub fn parse_lenient(value: &str) -> Self {
                value.parse().unwrap_or_else(|_| {
                    tracing::warn!(
                        setting = stringify!($name),
                        value,
                        default = $name::$default.as_str(),
                        "unrecognized setting value, using default"
                    );
                    $name::$default
                })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = serde_json::Value::deserialize(deserializer)?;
                Ok(match raw {
                    serde_json::Value::String(s) => $name::parse_lenient(&s),
                    serde_json::Value::Null => $name::$default,
                    other => $name::parse_lenient(&other.to_string()),
                })
            }
        }
    };
}

settings_enum!(
    /// Where the title page background image comes from.
    CoverType, default = Auto, {
        Auto => "auto",
        FirstPhoto => "first-photo",
        Gradient => "gradient",
        Custom => "custom",
    }
);

settings_enum!(
    /// Visual theme of the document (palette and fonts).
    Template, default = Minimal, {
        Classic => "classic",
        Modern => "modern",
        Romantic => "romantic",
        Adventure => "adventure",
        Minimal => "minimal",
    }
);

settings_enum!(
    /// Paper format for the `@page` rule.
    PageFormat, default = A4, {
        A4 => "A4",
        Letter => "Letter",
    }
);

settings_enum!(
    Orientation, default = Portrait, {
        Portrait => "portrait",
        Landscape => "landscape",
    }
);

settings_enum!(
    /// Inner page padding preset.
    Margins, default = Standard, {
        Standard => "standard",
        Narrow => "narrow",
        Wide => "wide",
    }
);

settings_enum!(
    ImageQuality, default = High, {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

settings_enum!(
    /// Ordering applied to the travel list before rendering.
    SortOrder, default = DateDesc, {
        DateDesc => "date-desc",
        DateAsc => "date-asc",
        Country => "country",
        Alphabetical => "alphabetical",
    }
);

settings_enum!(
    /// Explicit per-block page break request.
    PageBreak, default = Auto, {
        Auto => "auto",
        Always => "always",
        Avoid => "avoid",
    }
);

settings_enum!(
    /// Global page flow of a custom layout.
    LayoutMode, default = Flow, {
        Flow => "flow",
        PagePerBlock => "page-per-block",
    }
);

settings_enum!(
    /// Image height preset of a gallery block.
    ImageSize, default = Medium, {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
);

// =============================================================================
// Travel records
// =============================================================================

/// Identifier that upstream sends either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Number(0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// One photo of a travel gallery.
///
/// Upstream sends either an object or a bare URL string. Entries of any
/// other shape deserialize with an empty `url` and are skipped by renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGalleryItem")]
pub struct GalleryItem {
    pub url: String,
    pub id: Option<RecordId>,
    /// Upload timestamp as sent by the API; used only for cache busting.
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGalleryItem {
    Url(String),
    Item {
        #[serde(default, deserialize_with = "lenient_text")]
        url: Option<String>,
        #[serde(default)]
        id: Option<RecordId>,
        #[serde(default, deserialize_with = "lenient_text")]
        updated_at: Option<String>,
    },
    Other(serde_json::Value),
}

impl From<RawGalleryItem> for GalleryItem {
    fn from(raw: RawGalleryItem) -> Self {
        match raw {
            RawGalleryItem::Url(url) => GalleryItem {
                url,
                ..Default::default()
            },
            RawGalleryItem::Item {
                url,
                id,
                updated_at,
            } => GalleryItem {
                url: url.unwrap_or_default(),
                id,
                updated_at,
            },
            RawGalleryItem::Other(value) => {
                tracing::warn!(entry = %value, "unrecognized gallery entry, skipping");
                GalleryItem::default()
            }
        }
    }
}

/// A route point attached to a travel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelLocation {
    pub id: Option<RecordId>,
    pub address: String,
    /// `"lat,lng"` in decimal degrees.
    pub coord: Option<String>,
    #[serde(rename = "categoryName")]
    pub category_name: Option<String>,
    #[serde(rename = "travelImageThumbUrl")]
    pub travel_image_thumb_url: Option<String>,
}

/// A travel record as supplied by the travel listing API.
///
/// Optional text fields that are present but blank are treated exactly like
/// absent ones by every renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Travel {
    pub id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub slug: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "countryName")]
    pub country_name: Option<String>,
    #[serde(rename = "cityName")]
    pub city_name: Option<String>,
    /// Rich HTML.
    pub description: Option<String>,
    /// Rich HTML.
    pub recommendation: Option<String>,
    /// Rich HTML.
    pub plus: Option<String>,
    /// Rich HTML.
    pub minus: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub gallery: Vec<GalleryItem>,
    pub travel_image_thumb_url: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub year: Option<i64>,
    #[serde(rename = "monthName")]
    pub month_name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub number_days: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub complexity: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub transports: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub companions: Vec<String>,
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    #[serde(rename = "travelAddress", deserialize_with = "null_as_default")]
    pub travel_address: Vec<TravelLocation>,
}

impl Travel {
    /// Numeric year used for sorting; a missing year counts as 0.
    pub fn sort_year(&self) -> i64 {
        self.year.unwrap_or(0)
    }

    /// Positive whole number of days, if known.
    pub fn days(&self) -> Option<i64> {
        self.number_days.filter(|d| *d > 0)
    }
}

/// Returns the field's value when it is present and not blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `2023`, `2023.0` or `"2023"`; anything else becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let parsed = raw
        .and_then(|v| serde_json::from_value::<NumberOrText>(v).ok())
        .and_then(|v| match v {
            NumberOrText::Int(n) => Some(n),
            NumberOrText::Float(f) if f.is_finite() => Some(f.round() as i64),
            NumberOrText::Float(_) => None,
            NumberOrText::Text(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        });
    Ok(parsed)
}

/// Accepts a string or a number and keeps its textual form.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Accepts `true`/`false` as booleans or strings. `null` and anything else
/// count as `true`, the default of every flag that uses it.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::String(s)) if s.trim() == "false" => false,
        Some(serde_json::Value::Null) | None => true,
        Some(other) => {
            if !matches!(&other, serde_json::Value::String(s) if s.trim() == "true") {
                tracing::warn!(value = %other, "invalid flag, using true");
            }
            true
        }
    })
}

/// Accepts a single string (comma separated) or a list of strings/numbers.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let items = match raw {
        Some(serde_json::Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .collect(),
        Some(serde_json::Value::Array(values)) => values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(items.into_iter().filter(|s: &String| !s.is_empty()).collect())
}

// =============================================================================
// Export settings
// =============================================================================

/// Title used by the fixed book template when none is set.
pub const BOOK_DEFAULT_TITLE: &str = "Коллекция путешествий";
/// Title used by the custom layout when none is set.
pub const LAYOUT_DEFAULT_TITLE: &str = "Мои путешествия";

/// User-chosen export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookSettings {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cover_type: CoverType,
    /// Only consulted for `custom` (and preferred by `auto`).
    pub cover_image: Option<String>,
    pub template: Template,
    pub format: PageFormat,
    pub orientation: Orientation,
    pub margins: Margins,
    pub image_quality: ImageQuality,
    pub sort_order: SortOrder,
    #[serde(deserialize_with = "lenient_flag")]
    pub include_toc: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub include_gallery: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub include_map: bool,
}

impl Default for BookSettings {
    fn default() -> Self {
        Self {
            title: None,
            subtitle: None,
            cover_type: CoverType::default(),
            cover_image: None,
            template: Template::default(),
            format: PageFormat::default(),
            orientation: Orientation::default(),
            margins: Margins::default(),
            image_quality: ImageQuality::default(),
            sort_order: SortOrder::default(),
            include_toc: true,
            include_gallery: true,
            include_map: true,
        }
    }
}

impl BookSettings {
    /// The configured title, or `default` when it is missing or blank.
    pub fn title_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_blank(&self.title).unwrap_or(default)
    }

    pub fn subtitle(&self) -> Option<&str> {
        non_blank(&self.subtitle)
    }
}

// =============================================================================
// Custom layout
// =============================================================================

/// Options of a `gallery` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    pub image_size: ImageSize,
    pub columns: Option<u32>,
    /// Zero-based gallery indices to show; empty means all photos.
    pub selected_photos: Vec<usize>,
}

/// Options of a `spacer` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerConfig {
    /// CSS length such as `"20mm"`.
    pub height: Option<String>,
}

/// Whether a block renders once per document or once per travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockScope {
    Document,
    Travel,
}

/// Closed set of layout block variants, each with its typed options.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Cover,
    Toc,
    Photo,
    Description,
    Recommendation,
    Plus,
    Minus,
    Gallery(GalleryConfig),
    Map,
    Qr,
    Spacer(SpacerConfig),
}

impl BlockKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Cover => "cover",
            BlockKind::Toc => "toc",
            BlockKind::Photo => "photo",
            BlockKind::Description => "description",
            BlockKind::Recommendation => "recommendation",
            BlockKind::Plus => "plus",
            BlockKind::Minus => "minus",
            BlockKind::Gallery(_) => "gallery",
            BlockKind::Map => "map",
            BlockKind::Qr => "qr",
            BlockKind::Spacer(_) => "spacer",
        }
    }

    pub fn scope(&self) -> BlockScope {
        match self {
            BlockKind::Cover | BlockKind::Toc | BlockKind::Spacer(_) => BlockScope::Document,
            _ => BlockScope::Travel,
        }
    }

    /// Builds a variant from its wire type name and raw options.
    ///
    /// Returns `None` for unknown types. Options that don't fit the variant's
    /// shape are replaced by that variant's defaults.
    pub fn from_parts(type_name: &str, config: Option<serde_json::Value>) -> Option<Self> {
        let kind = match type_name.trim() {
            "cover" => BlockKind::Cover,
            "toc" => BlockKind::Toc,
            "photo" => BlockKind::Photo,
            "description" => BlockKind::Description,
            "recommendation" => BlockKind::Recommendation,
            "plus" => BlockKind::Plus,
            "minus" => BlockKind::Minus,
            "gallery" => BlockKind::Gallery(typed_config(type_name, config)),
            "map" => BlockKind::Map,
            "qr" => BlockKind::Qr,
            "spacer" => BlockKind::Spacer(typed_config(type_name, config)),
            _ => return None,
        };
        Some(kind)
    }
}

fn typed_config<T>(type_name: &str, config: Option<serde_json::Value>) -> T
where
    T: Default + serde::de::DeserializeOwned,
{
    match config {
        None | Some(serde_json::Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(block = type_name, error = %e, "invalid block config, using defaults");
            T::default()
        }),
    }
}

/// One user-configurable content unit of a custom layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub enabled: bool,
    pub order: i64,
    pub page_break: Option<PageBreak>,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind, order: i64) -> Self {
        Self {
            id: id.into(),
            kind,
            enabled: true,
            order,
            page_break: None,
        }
    }

    /// Explicit `pageBreak` wins, otherwise the layout mode decides.
    pub fn effective_page_break(&self, mode: LayoutMode) -> PageBreak {
        self.page_break.unwrap_or(match mode {
            LayoutMode::Flow => PageBreak::Auto,
            LayoutMode::PagePerBlock => PageBreak::Always,
        })
    }
}

/// A user-defined content layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawLayout")]
pub struct Layout {
    pub mode: LayoutMode,
    pub blocks: Vec<Block>,
}

impl Layout {
    /// Enabled blocks in ascending `order`; equal orders keep input order.
    pub fn enabled_blocks(&self) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self.blocks.iter().filter(|b| b.enabled).collect();
        blocks.sort_by_key(|b| b.order);
        blocks
    }
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawLayout {
    layout_mode: LayoutMode,
    #[serde(deserialize_with = "null_as_default")]
    blocks: Vec<RawBlock>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default = "default_enabled", deserialize_with = "lenient_flag")]
    enabled: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    order: Option<i64>,
    #[serde(default)]
    page_break: Option<String>,
    #[serde(default)]
    config: Option<serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl From<RawLayout> for Layout {
    fn from(raw: RawLayout) -> Self {
        let blocks = raw
            .blocks
            .into_iter()
            .enumerate()
            .filter_map(|(index, block)| {
                let Some(kind) = BlockKind::from_parts(&block.block_type, block.config) else {
                    tracing::warn!(block_type = %block.block_type, "unknown layout block type, skipping");
                    return None;
                };
                let page_break = block.page_break.as_deref().and_then(|value| {
                    value
                        .parse::<PageBreak>()
                        .map_err(|e| tracing::warn!(error = %e, "invalid pageBreak, using layout mode"))
                        .ok()
                });
                Some(Block {
                    id: block
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| format!("block-{index}")),
                    kind,
                    enabled: block.enabled,
                    order: block.order.unwrap_or(index as i64),
                    page_break,
                })
            })
            .collect();
        Layout {
            mode: raw.layout_mode,
            blocks,
        }
    }
}
