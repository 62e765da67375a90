//! Georeferencing for flat floorplans.
//!
//! A floorplan drawn in a right-handed page frame (PDF user space: `+x`
//! right, `+y` up) is pinned to the Earth by two [`GeoAnchor`]s. From those
//! anchors a [`CoordinateConverter`] builds a local linear model around the
//! anchors' midpoint and maps page points into Web Mercator map points.
//!
//! On top of the converter:
//! - [`Floorplan`] caches the map-space footprint of a page box (bounds,
//!   rotated box, heading that shows the page upright);
//! - [`ViewportClamp`] decides how a map viewport should zoom, scroll or
//!   rotate to stay on the floorplan;
//! - [`FloorplanConfig`] / [`FloorplanReport`] load and write JSON.
//!
//! ```
//! use floorplan_geo::{CoordinateConverter, GeoAnchor, GeoAnchorPair};
//!
//! # fn main() -> Result<(), floorplan_geo::ConverterError> {
//! let anchors = GeoAnchorPair::new(
//!     GeoAnchor::new(37.770419, -122.465726, 26.2, 86.4),
//!     GeoAnchor::new(37.769288, -122.466376, 570.1, 317.7),
//! );
//! let converter = CoordinateConverter::new(anchors)?;
//! assert!(converter.unit_size_in_meters() > 0.1);
//! assert!((0.0..360.0).contains(&converter.upright_heading()));
//! # Ok(())
//! # }
//! ```

mod anchor;
mod converter;
mod floorplan;
mod io;
mod page;
mod viewport;

pub use anchor::{GeoAnchor, GeoAnchorPair};
pub use converter::{ConverterError, CoordinateConverter};
pub use floorplan::{Floorplan, FloorplanError};
pub use io::{FloorplanConfig, FloorplanIoError, FloorplanReport, PageQueryResult};
pub use page::PageRect;
pub use viewport::{ScrollAdjustment, Viewport, ViewportClamp, ViewportUpdate};

pub use floorplan_geo_core::{
    AffineTransform, GeoCoordinate, MapPoint, MapRect, MapSize, RotatedRect, RotatedRectError,
    WebMercator,
};
