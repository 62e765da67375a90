use floorplan_geo_core::GeoCoordinate;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A known location: a page point and the coordinate on Earth it depicts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoAnchor {
    pub coordinate: GeoCoordinate,
    /// Page-space point, right-handed (`+y` up).
    pub page_point: Point2<f64>,
}

impl GeoAnchor {
    pub fn new(latitude: f64, longitude: f64, page_x: f64, page_y: f64) -> Self {
        Self {
            coordinate: GeoCoordinate::new(latitude, longitude),
            page_point: Point2::new(page_x, page_y),
        }
    }
}

/// Two anchors defining the calibration baseline of a floorplan.
///
/// The anchors must differ both on the page and on Earth; this is checked
/// when a converter is built from the pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoAnchorPair {
    pub from: GeoAnchor,
    pub to: GeoAnchor,
}

impl GeoAnchorPair {
    pub fn new(from: GeoAnchor, to: GeoAnchor) -> Self {
        Self { from, to }
    }
}
