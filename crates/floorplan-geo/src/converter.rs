//! Page space <-> Web Mercator conversion from two anchors.
//!
//! The converter is a local linear model. Around the tangent point (the
//! midpoint of the two anchors) one page unit corresponds to a fixed number
//! of meters in a fixed compass direction, and one meter corresponds to a
//! fixed number of map points. Accuracy degrades with distance from the
//! tangent point, which is irrelevant at building scale.

use std::f64::consts::FRAC_PI_2;

use floorplan_geo_core::{
    dot, midpoint, rotate, scale, AffineTransform, GeoCoordinate, MapPoint, MapRect, WebMercator,
};
use log::debug;
use nalgebra::{Matrix2, Point2, Vector2};

use crate::anchor::GeoAnchorPair;
use crate::page::PageRect;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Anchors closer than this (page units or meters) are treated as coincident.
const MIN_ANCHOR_SEPARATION: f64 = 1e-9;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ConverterError {
    #[error(
        "anchors coincide (page distance {page_distance}, ground distance {ground_distance_m} m)"
    )]
    DegenerateAnchors {
        page_distance: f64,
        ground_distance_m: f64,
    },
    #[error("anchor is not a finite coordinate: {0:?}")]
    InvalidAnchor(GeoCoordinate),
}

/// Converts page points (right-handed, `+y` up) to Web Mercator map points.
///
/// Immutable after construction; build a new converter when anchors change.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateConverter {
    anchors: GeoAnchorPair,
    projection: WebMercator,
    /// Page-space vector one meter long pointing due east.
    one_meter_east: Vector2<f64>,
    /// Page-space vector one meter long pointing due south.
    one_meter_south: Vector2<f64>,
    tangent_page_point: Point2<f64>,
    tangent_coordinate: GeoCoordinate,
    tangent_map_point: MapPoint,
}

impl CoordinateConverter {
    /// Build a converter in the default map-point space.
    pub fn new(anchors: GeoAnchorPair) -> Result<Self, ConverterError> {
        Self::with_projection(anchors, WebMercator::default())
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(anchors, projection)))]
    pub fn with_projection(
        anchors: GeoAnchorPair,
        projection: WebMercator,
    ) -> Result<Self, ConverterError> {
        for anchor in [&anchors.from, &anchors.to] {
            if !anchor.coordinate.is_valid()
                || !anchor.page_point.x.is_finite()
                || !anchor.page_point.y.is_finite()
            {
                return Err(ConverterError::InvalidAnchor(anchor.coordinate));
            }
        }

        let from_map = projection.project(&anchors.from.coordinate);
        let mut to_map = projection.project(&anchors.to.coordinate);
        // Anchors straddling the antimeridian: measure across it, not around the world.
        to_map.x = from_map.x + projection.shortest_x_offset(from_map.x, to_map.x);

        let page_displacement = anchors.to.page_point - anchors.from.page_point;
        let page_distance = page_displacement.norm();
        let ground_distance_m =
            projection.distance(&anchors.from.coordinate, &anchors.to.coordinate);
        if page_distance < MIN_ANCHOR_SEPARATION
            || ground_distance_m < MIN_ANCHOR_SEPARATION
            || from_map == to_map
        {
            return Err(ConverterError::DegenerateAnchors {
                page_distance,
                ground_distance_m,
            });
        }

        // Map space is +x east, +y south, so this angle is clockwise of due east.
        let map_displacement = to_map - from_map;
        let radians_clockwise_of_east = map_displacement.y.atan2(map_displacement.x);

        // Undo the bearing counter-clockwise in page space to face due east.
        let page_east = rotate(&page_displacement, radians_clockwise_of_east);
        let one_meter_east = scale(&page_east, 1.0 / ground_distance_m);
        let one_meter_south = rotate(&one_meter_east, -FRAC_PI_2);

        if !one_meter_east.x.is_finite() || !one_meter_east.y.is_finite() {
            return Err(ConverterError::DegenerateAnchors {
                page_distance,
                ground_distance_m,
            });
        }

        let mut tangent_map_point = midpoint(&from_map, &to_map);
        tangent_map_point.x = projection.wrap_x(tangent_map_point.x);
        let tangent_coordinate = projection.unproject(&tangent_map_point);
        let tangent_page_point = midpoint(&anchors.from.page_point, &anchors.to.page_point);

        debug!(
            "converter: {:.3} m between anchors over {:.3} page units, \
             east=({:.6}, {:.6}), tangent=({:.7}, {:.7})",
            ground_distance_m,
            page_distance,
            one_meter_east.x,
            one_meter_east.y,
            tangent_coordinate.latitude,
            tangent_coordinate.longitude
        );

        Ok(Self {
            anchors,
            projection,
            one_meter_east,
            one_meter_south,
            tangent_page_point,
            tangent_coordinate,
            tangent_map_point,
        })
    }

    pub fn anchors(&self) -> &GeoAnchorPair {
        &self.anchors
    }

    pub fn projection(&self) -> &WebMercator {
        &self.projection
    }

    pub fn one_meter_east(&self) -> Vector2<f64> {
        self.one_meter_east
    }

    pub fn one_meter_south(&self) -> Vector2<f64> {
        self.one_meter_south
    }

    pub fn tangent_page_point(&self) -> Point2<f64> {
        self.tangent_page_point
    }

    pub fn tangent_coordinate(&self) -> GeoCoordinate {
        self.tangent_coordinate
    }

    pub fn tangent_map_point(&self) -> MapPoint {
        self.tangent_map_point
    }

    fn meters_per_map_point(&self) -> f64 {
        self.projection
            .meters_per_map_point(self.tangent_coordinate.latitude)
    }

    /// Map point depicted by `page_point`, with `x` wrapped into the world.
    pub fn projected_point_from_page_point(&self, page_point: &Point2<f64>) -> MapPoint {
        let d = page_point - self.tangent_page_point;

        let meters_east =
            dot(&d, &self.one_meter_east) / dot(&self.one_meter_east, &self.one_meter_east);
        let meters_south =
            dot(&d, &self.one_meter_south) / dot(&self.one_meter_south, &self.one_meter_south);

        let meters_per_map_point = self.meters_per_map_point();
        MapPoint::new(
            self.projection
                .wrap_x(self.tangent_map_point.x + meters_east / meters_per_map_point),
            self.tangent_map_point.y + meters_south / meters_per_map_point,
        )
    }

    /// Page point depicting `map_point`; exact inverse of
    /// [`CoordinateConverter::projected_point_from_page_point`].
    pub fn page_point_from_projected_point(&self, map_point: &MapPoint) -> Point2<f64> {
        let meters_per_map_point = self.meters_per_map_point();
        let dx = self
            .projection
            .shortest_x_offset(self.tangent_map_point.x, map_point.x);
        let meters_east = dx * meters_per_map_point;
        let meters_south = (map_point.y - self.tangent_map_point.y) * meters_per_map_point;
        self.tangent_page_point
            + self.one_meter_east * meters_east
            + self.one_meter_south * meters_south
    }

    pub fn coordinate_from_page_point(&self, page_point: &Point2<f64>) -> GeoCoordinate {
        self.projection
            .unproject(&self.projected_point_from_page_point(page_point))
    }

    pub fn page_point_from_coordinate(&self, coordinate: &GeoCoordinate) -> Point2<f64> {
        self.page_point_from_projected_point(&self.projection.project(coordinate))
    }

    /// A single affine transform equivalent to
    /// [`CoordinateConverter::projected_point_from_page_point`].
    ///
    /// Both paths agree up to floating-point rounding; the per-point path
    /// is the more accurate one because it never forms the translation
    /// `t_map - L * t_page` explicitly. The transform does not wrap, so near
    /// the antimeridian its `x` may differ from the per-point result by the
    /// world width.
    pub fn affine_transform_page_to_projected(&self) -> AffineTransform {
        let map_points_per_meter = 1.0 / self.meters_per_map_point();
        let east = self.one_meter_east;
        let south = self.one_meter_south;

        // Built back to front: each pre_* step runs before the ones above it.
        AffineTransform::translation(self.tangent_map_point.x, self.tangent_map_point.y)
            .pre_scale(map_points_per_meter, map_points_per_meter)
            .pre_scale(1.0 / dot(&east, &east), 1.0 / dot(&south, &south))
            .pre_concat(&AffineTransform::from_linear(Matrix2::new(
                east.x, east.y, //
                south.x, south.y,
            )))
            .pre_translate(-self.tangent_page_point.x, -self.tangent_page_point.y)
    }

    /// Real-world length in meters of one page unit.
    pub fn unit_size_in_meters(&self) -> f64 {
        1.0 / self.one_meter_east.x.hypot(self.one_meter_east.y)
    }

    /// Map points of the rect corners, ordered
    /// `(maxX, maxY), (minX, maxY), (minX, minY), (maxX, minY)`.
    pub fn polygon_from_page_rect_corners(&self, rect: &PageRect) -> [MapPoint; 4] {
        rect.corners()
            .map(|corner| self.projected_point_from_page_point(&corner))
    }

    pub fn polygon_from_page_path(&self, path: &[Point2<f64>]) -> Vec<MapPoint> {
        path.iter()
            .map(|p| self.projected_point_from_page_point(p))
            .collect()
    }

    /// Smallest axis-aligned map rect that holds `rect` under any rotation:
    /// a square centred on the mapped rect centre whose side is the diagonal
    /// of the nominal mapped bounds.
    pub fn bounding_box_including_rotations(&self, rect: &PageRect) -> MapRect {
        let corners = self.polygon_from_page_rect_corners(rect);
        let diameter = match MapRect::bounding(&corners) {
            Some(nominal) => nominal.size.width.hypot(nominal.size.height),
            None => 0.0,
        };
        let center = self.projected_point_from_page_point(&rect.mid());
        MapRect::new(
            center.x - diameter * 0.5,
            center.y - diameter * 0.5,
            diameter,
            diameter,
        )
    }

    /// Map camera heading (degrees clockwise from north, in `[0, 360)`) that
    /// shows the page upright, page `+x` pointing right on screen.
    pub fn upright_heading(&self) -> f64 {
        normalize_heading(self.one_meter_east.y.atan2(self.one_meter_east.x).to_degrees())
    }
}

/// Wrap degrees into `[0, 360)`.
pub(crate) fn normalize_heading(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
