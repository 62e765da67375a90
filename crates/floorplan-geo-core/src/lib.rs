//! Core geometry for georeferencing flat floorplans.
//!
//! This crate is intentionally small and purely geometric. It knows about
//! 2D vectors, the spherical Web Mercator projection, axis-aligned and
//! rotated rectangles in projected space, and affine transforms. It does
//! *not* know anything about anchors, PDFs or map cameras.
//!
//! Conventions:
//! - page-space points are `nalgebra::Point2<f64>` in a right-handed, y-up frame;
//! - projected points ([`MapPoint`]) use the slippy-map convention: `+x` is
//!   east, `+y` is south, the world is a square `world_size` units wide.

mod affine;
mod logger;
mod projection;
mod rotated_rect;
mod vector;

pub use affine::AffineTransform;
pub use projection::{
    great_circle_distance, GeoCoordinate, MapPoint, MapRect, MapSize, WebMercator,
    MAX_MERCATOR_LATITUDE,
};
pub use rotated_rect::{RotatedRect, RotatedRectError};
pub use vector::{
    clamp, displacement_to, dot, midpoint, rotate, scale, smallest, DegenerateInputError,
    Displacement,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
