//! Visitor map markers
//!
//! Turns region aggregates into marker data for the homepage's map script:
//! one marker per distinct location, visitor count in the popup label. Tile
//! loading and map interaction belong to the mapping library on the page.

use crate::storage::RegionAggregate;
use serde::Serialize;

/// Initial map viewport and tile source
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center_latitude: 20.5937,
            center_longitude: 105.8654,
            zoom: 3,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution:
                r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#
                    .to_string(),
        }
    }
}

/// One map marker with its popup markup
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
}

impl Marker {
    fn from_aggregate(aggregate: &RegionAggregate) -> Self {
        let visitors = if aggregate.count == 1 {
            "1 visitor".to_string()
        } else {
            format!("{} visitors", aggregate.count)
        };

        Self {
            latitude: aggregate.latitude,
            longitude: aggregate.longitude,
            popup: format!(
                "<b>{}</b><br>{}",
                super::escape_html(&aggregate.region_label),
                visitors
            ),
        }
    }
}

/// The JSON payload consumed by the page's map script
#[derive(Debug, Clone, Serialize)]
pub struct MapPayload {
    pub view: MapView,
    pub markers: Vec<Marker>,
}

impl MapPayload {
    /// Build the payload from the current region aggregates
    pub fn new(view: MapView, aggregates: &[RegionAggregate]) -> Self {
        Self {
            view,
            markers: aggregates.iter().map(Marker::from_aggregate).collect(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
