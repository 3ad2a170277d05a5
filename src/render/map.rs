//! Route map: a schematic SVG of the travel's route points plus a numbered
//! list of addresses.
//!
//! There is no tile layer. Points are projected linearly into a 100x60 box:
//!
//! ```text
//! x = 6 + (lng - min_lng) / lng_range * 88
//! y = 8 + (max_lat - lat) / lat_range * 44
//! ```
//!
//! Ranges are floored at 0.0001 so a single point (or a north-south line)
//! doesn't divide by zero. Without any usable coordinate the SVG shows a
//! placeholder, but the address list still renders.

use crate::escape::Text;
use crate::theme::TemplateTheme;
use crate::types::{Travel, non_blank};
use maud::{Markup, html};

const VIEW_WIDTH: f64 = 100.0;
const VIEW_HEIGHT: f64 = 60.0;
const PADDING_X: f64 = 6.0;
const PADDING_Y: f64 = 8.0;
const MIN_RANGE: f64 = 0.0001;

/// A route point prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePoint {
    pub address: String,
    pub category: Option<String>,
    pub coord: Option<String>,
    /// `(lat, lng)` when `coord` parses.
    pub position: Option<(f64, f64)>,
}

/// Route points of a travel in input order. Blank addresses become "Точка N".
pub fn route_points(travel: &Travel) -> Vec<RoutePoint> {
    travel
        .travel_address
        .iter()
        .enumerate()
        .map(|(i, location)| {
            let address = location.address.trim();
            RoutePoint {
                address: if address.is_empty() {
                    format!("Точка {}", i + 1)
                } else {
                    address.to_string()
                },
                category: non_blank(&location.category_name).map(str::to_string),
                coord: non_blank(&location.coord).map(str::to_string),
                position: location.coord.as_deref().and_then(parse_coordinates),
            }
        })
        .collect()
}

/// Parse `"lat,lng"` in decimal degrees.
pub fn parse_coordinates(coord: &str) -> Option<(f64, f64)> {
    let (lat, lng) = coord.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    let valid = lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng);
    valid.then_some((lat, lng))
}

/// Project positioned points into the SVG view box, keeping their route number.
fn project(points: &[RoutePoint]) -> Vec<(usize, f64, f64)> {
    let positioned: Vec<(usize, f64, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.position.map(|(lat, lng)| (i, lat, lng)))
        .collect();
    if positioned.is_empty() {
        return Vec::new();
    }

    let (mut min_lat, mut max_lat) = (f64::MAX, f64::MIN);
    let (mut min_lng, mut max_lng) = (f64::MAX, f64::MIN);
    for &(_, lat, lng) in &positioned {
        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
        min_lng = min_lng.min(lng);
        max_lng = max_lng.max(lng);
    }
    let lat_range = (max_lat - min_lat).max(MIN_RANGE);
    let lng_range = (max_lng - min_lng).max(MIN_RANGE);
    let width = VIEW_WIDTH - PADDING_X * 2.0;
    let height = VIEW_HEIGHT - PADDING_Y * 2.0;

    positioned
        .into_iter()
        .map(|(i, lat, lng)| {
            let x = PADDING_X + (lng - min_lng) / lng_range * width;
            let y = PADDING_Y + (max_lat - lat) / lat_range * height;
            (i, x, y)
        })
        .collect()
}

/// SVG path data through the projected points, e.g. `M 6.00,8.00 L 94.00,52.00`.
fn path_data(projected: &[(usize, f64, f64)]) -> String {
    projected
        .iter()
        .enumerate()
        .map(|(n, (_, x, y))| format!("{} {x:.2},{y:.2}", if n == 0 { "M" } else { "L" }))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Schematic route drawing. `id` must be unique within the document.
pub fn route_svg(points: &[RoutePoint], theme: &TemplateTheme, id: &str) -> Markup {
    let projected = project(points);
    let gradient_id = format!("route-gradient-{id}");
    let fill = format!("url(#{gradient_id})");

    html! {
        svg.route-svg viewBox="0 0 100 60" preserveAspectRatio="none" role="img" aria-label="Маршрут путешествия" {
            defs {
                linearGradient id=(gradient_id) x1="0%" y1="0%" x2="100%" y2="100%" {
                    stop offset="0%" stop-color=(theme.surface_alt) {}
                    stop offset="100%" stop-color=(theme.highlight) {}
                }
            }
            rect x="0" y="0" width="100" height="60" rx="5" fill=(fill) {}
            @if projected.is_empty() {
                text x="50" y="32" text-anchor="middle" fill=(theme.muted_light) font-size="8" {
                    "Недостаточно данных"
                }
            } @else {
                path d=(path_data(&projected)) fill="none" stroke=(theme.accent_strong)
                    stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round" {}
                @for (i, x, y) in &projected {
                    g {
                        circle cx=(format!("{x:.2}")) cy=(format!("{y:.2}")) r="2"
                            fill=(theme.accent) stroke=(theme.surface) stroke-width="0.8" {}
                        text x=(format!("{x:.2}")) y=(format!("{:.2}", y - 3.0))
                            font-size="4" text-anchor="middle" fill=(theme.text) font-weight="700" {
                            (i + 1)
                        }
                    }
                }
            }
        }
    }
}

pub fn location_list(points: &[RoutePoint]) -> Markup {
    html! {
        ol.route-list {
            @for point in points {
                li.route-point {
                    div.route-address { (Text(&point.address)) }
                    @if let Some(category) = &point.category {
                        div.route-category { (Text(category)) }
                    }
                    @if let Some(coord) = &point.coord {
                        div.route-coord { (Text(coord)) }
                    }
                }
            }
        }
    }
}

/// Drawing plus list, or `None` when the travel has no route points.
pub fn route_map(travel: &Travel, theme: &TemplateTheme, id: &str) -> Option<Markup> {
    let points = route_points(travel);
    if points.is_empty() {
        return None;
    }
    Some(html! {
        div.route-map {
            div.route-drawing { (route_svg(&points, theme, id)) }
            (location_list(&points))
        }
    })
}
