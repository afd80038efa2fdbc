//! Neighbourhood Map Module
//! Interactive Leaflet map with one marker per neighbourhood.

use crate::data::Listing;
use crate::pipeline::Analysis;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const TEMPLATE: &str = include_str!("template.html");

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Failed to write map {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to encode map markers: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Blue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub neighbourhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub mean_price: f64,
    pub color: MarkerColor,
}

impl MapMarker {
    pub fn popup(&self) -> String {
        format!(
            "Neighbourhood: {}<br>Average price: R$ {:.2}",
            html_escape::encode_safe(&self.neighbourhood),
            self.mean_price
        )
    }
}

/// Marker as handed to the page script.
#[derive(Serialize)]
struct ScriptMarker {
    lat: f64,
    lon: f64,
    color: MarkerColor,
    popup: String,
}

#[derive(Debug, Clone)]
pub struct NeighbourhoodMap {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl NeighbourhoodMap {
    /// One marker per neighbourhood, placed at its first listing.
    /// Top priced neighbourhoods are red, the rest blue.
    pub fn build(listings: &[Listing], analysis: &Analysis, center: (f64, f64), zoom: u8) -> Self {
        let mut first_listing: HashMap<&str, &Listing> = HashMap::new();
        for listing in listings {
            first_listing
                .entry(listing.neighbourhood.as_str())
                .or_insert(listing);
        }

        let markers = analysis
            .neighbourhood_mean_price
            .iter()
            .filter_map(|group| {
                let anchor = first_listing.get(group.group.as_str())?;
                let color = if analysis.is_top_priced(&group.group) {
                    MarkerColor::Red
                } else {
                    MarkerColor::Blue
                };
                Some(MapMarker {
                    neighbourhood: group.group.clone(),
                    latitude: anchor.latitude,
                    longitude: anchor.longitude,
                    mean_price: group.mean,
                    color,
                })
            })
            .collect();

        Self {
            center,
            zoom,
            markers,
        }
    }

    /// Render a standalone HTML document.
    pub fn to_html(&self) -> Result<String, MapError> {
        let markers: Vec<ScriptMarker> = self
            .markers
            .iter()
            .map(|m| ScriptMarker {
                lat: m.latitude,
                lon: m.longitude,
                color: m.color,
                popup: m.popup(),
            })
            .collect();

        Ok(TEMPLATE
            .replace("__CENTER_LAT__", &self.center.0.to_string())
            .replace("__CENTER_LON__", &self.center.1.to_string())
            .replace("__ZOOM__", &self.zoom.to_string())
            .replace("__MARKERS__", &serde_json::to_string(&markers)?))
    }

    pub fn write_html(&self, path: &Path) -> Result<(), MapError> {
        let io_error = |source| MapError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, self.to_html()?).map_err(io_error)?;

        info!(markers = self.markers.len(), "Wrote map to {}", path.display());
        Ok(())
    }
}
