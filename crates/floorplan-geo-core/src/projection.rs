//! Spherical Web Mercator projection and projected-space rectangles.
//!
//! Projected ("map") points follow the slippy-map convention: the world is a
//! square `world_size` units wide, `x` grows eastward from the antimeridian
//! and `y` grows southward from the northern Mercator limit.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A point in projected space.
pub type MapPoint = Point2<f64>;

/// Latitude beyond which the spherical Mercator projection is clamped.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Latitude and longitude in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within `[-90, 90] x [-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }
}

/// Haversine great-circle distance in meters on a sphere of `earth_radius_m`.
pub fn great_circle_distance(a: &GeoCoordinate, b: &GeoCoordinate, earth_radius_m: f64) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    earth_radius_m * c
}

/// Spherical Web Mercator parameters.
///
/// The default matches the map-point space used by common mobile map kits: a
/// `2^28`-unit world on a sphere with the WGS84 equatorial radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebMercator {
    pub world_size: f64,
    pub earth_radius_m: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            world_size: 268_435_456.0,
            earth_radius_m: 6_378_137.0,
        }
    }
}

impl WebMercator {
    /// Forward projection. Latitudes beyond [`MAX_MERCATOR_LATITUDE`] are clamped.
    pub fn project(&self, coordinate: &GeoCoordinate) -> MapPoint {
        let lat = coordinate
            .latitude
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();
        let x = (coordinate.longitude + 180.0) / 360.0 * self.world_size;
        let y = (0.5 - (FRAC_PI_4 + lat * 0.5).tan().ln() / (2.0 * PI)) * self.world_size;
        MapPoint::new(x, y)
    }

    /// Inverse projection.
    pub fn unproject(&self, point: &MapPoint) -> GeoCoordinate {
        let longitude = point.x / self.world_size * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * point.y / self.world_size);
        let latitude = (2.0 * n.exp().atan() - FRAC_PI_2).to_degrees();
        GeoCoordinate {
            latitude,
            longitude,
        }
    }

    /// Meters covered by one projected unit at `latitude` (degrees).
    pub fn meters_per_map_point(&self, latitude: f64) -> f64 {
        2.0 * PI * self.earth_radius_m * latitude.to_radians().cos() / self.world_size
    }

    /// Projected units covered by one meter at `latitude` (degrees).
    pub fn map_points_per_meter(&self, latitude: f64) -> f64 {
        1.0 / self.meters_per_map_point(latitude)
    }

    pub fn distance(&self, a: &GeoCoordinate, b: &GeoCoordinate) -> f64 {
        great_circle_distance(a, b, self.earth_radius_m)
    }

    /// Wrap a projected `x` into `[0, world_size)`.
    pub fn wrap_x(&self, x: f64) -> f64 {
        let wrapped = x.rem_euclid(self.world_size);
        if wrapped >= self.world_size {
            0.0
        } else {
            wrapped
        }
    }

    /// East-west offset from `from_x` to `to_x`, taking the short way across
    /// the antimeridian.
    pub fn shortest_x_offset(&self, from_x: f64, to_x: f64) -> f64 {
        let dx = to_x - from_x;
        let half = 0.5 * self.world_size;
        if dx > half {
            dx - self.world_size
        } else if dx < -half {
            dx + self.world_size
        } else {
            dx
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

impl MapSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Axis-aligned rectangle in projected space. `origin` is the minimum corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRect {
    pub origin: MapPoint,
    pub size: MapSize,
}

impl MapRect {
    /// Build a rectangle; negative sizes are normalised.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 {
            (x + width, -width)
        } else {
            (x, width)
        };
        let (y, height) = if height < 0.0 {
            (y + height, -height)
        } else {
            (y, height)
        };
        Self {
            origin: MapPoint::new(x, y),
            size: MapSize::new(width, height),
        }
    }

    /// Smallest rectangle containing every point, `None` for an empty slice.
    pub fn bounding(points: &[MapPoint]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn mid_x(&self) -> f64 {
        self.origin.x + self.size.width * 0.5
    }

    pub fn mid_y(&self) -> f64 {
        self.origin.y + self.size.height * 0.5
    }

    pub fn center(&self) -> MapPoint {
        MapPoint::new(self.mid_x(), self.mid_y())
    }

    pub fn contains_point(&self, p: &MapPoint) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    pub fn contains_rect(&self, other: &MapRect) -> bool {
        other.min_x() >= self.min_x()
            && other.max_x() <= self.max_x()
            && other.min_y() >= self.min_y()
            && other.max_y() <= self.max_y()
    }

    /// Overlap of both rectangles, `None` when they are disjoint.
    pub fn intersection(&self, other: &MapRect) -> Option<MapRect> {
        let min_x = self.min_x().max(other.min_x());
        let min_y = self.min_y().max(other.min_y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        if max_x < min_x || max_y < min_y {
            return None;
        }
        Some(MapRect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn union(&self, other: &MapRect) -> MapRect {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        MapRect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Corners as `(maxX, maxY), (minX, maxY), (minX, minY), (maxX, minY)`.
    pub fn corners(&self) -> [MapPoint; 4] {
        [
            MapPoint::new(self.max_x(), self.max_y()),
            MapPoint::new(self.min_x(), self.max_y()),
            MapPoint::new(self.min_x(), self.min_y()),
            MapPoint::new(self.max_x(), self.min_y()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn origin_projects_to_world_center() {
        let proj = WebMercator::default();
        let p = proj.project(&GeoCoordinate::new(0.0, 0.0));
        assert_abs_diff_eq!(p.x, proj.world_size * 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, proj.world_size * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn north_is_negative_y() {
        let proj = WebMercator::default();
        let south = proj.project(&GeoCoordinate::new(37.0, -122.0));
        let north = proj.project(&GeoCoordinate::new(38.0, -122.0));
        assert!(north.y < south.y);
        let east = proj.project(&GeoCoordinate::new(37.0, -121.0));
        assert!(east.x > south.x);
    }

    #[test]
    fn unproject_inverts_project() {
        let proj = WebMercator::default();
        for c in [
            GeoCoordinate::new(37.770419, -122.465726),
            GeoCoordinate::new(-33.8688, 151.2093),
            GeoCoordinate::new(64.1466, -21.9426),
            GeoCoordinate::new(0.0, 179.5),
        ] {
            let back = proj.unproject(&proj.project(&c));
            assert_abs_diff_eq!(back.latitude, c.latitude, epsilon = 1e-9);
            assert_abs_diff_eq!(back.longitude, c.longitude, epsilon = 1e-9);
        }
    }

    #[test]
    fn polar_latitudes_are_clamped() {
        let proj = WebMercator::default();
        let p = proj.project(&GeoCoordinate::new(90.0, 0.0));
        assert!(p.y.is_finite());
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn x_offsets_take_the_short_way_across_the_antimeridian() {
        let proj = WebMercator::default();
        let w = proj.world_size;
        let east_edge = proj.project(&GeoCoordinate::new(0.0, 179.9995)).x;
        let west_edge = proj.project(&GeoCoordinate::new(0.0, -179.9995)).x;

        let dx = proj.shortest_x_offset(east_edge, west_edge);
        assert!(dx > 0.0 && dx < 1_000.0, "dx {dx}");
        assert_abs_diff_eq!(proj.shortest_x_offset(west_edge, east_edge), -dx, epsilon = 1e-6);
        assert_abs_diff_eq!(proj.shortest_x_offset(10.0, 30.0), 20.0);

        assert_abs_diff_eq!(proj.wrap_x(east_edge + dx), proj.wrap_x(west_edge), epsilon = 1e-6);
        assert_abs_diff_eq!(proj.wrap_x(-5.0), w - 5.0);
        assert_eq!(proj.wrap_x(w), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = great_circle_distance(
            &GeoCoordinate::new(10.0, 20.0),
            &GeoCoordinate::new(11.0, 20.0),
            6_371_000.0,
        );
        assert_relative_eq!(d, 111_194.9, max_relative = 1e-4);
    }

    #[test]
    fn meters_per_map_point_shrinks_with_latitude() {
        let proj = WebMercator::default();
        let equator = proj.meters_per_map_point(0.0);
        assert_relative_eq!(equator, 40_075_016.686 / 268_435_456.0, max_relative = 1e-9);
        assert_relative_eq!(
            proj.meters_per_map_point(60.0),
            equator * 0.5,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            proj.map_points_per_meter(60.0) * proj.meters_per_map_point(60.0),
            1.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn rect_normalises_negative_sizes() {
        let r = MapRect::new(10.0, 10.0, -4.0, -6.0);
        assert_eq!(r.origin, MapPoint::new(6.0, 4.0));
        assert_eq!(r.size, MapSize::new(4.0, 6.0));
    }

    #[test]
    fn rect_set_operations() {
        let a = MapRect::new(0.0, 0.0, 10.0, 10.0);
        let b = MapRect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Some(MapRect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.union(&b), MapRect::new(0.0, 0.0, 15.0, 15.0));
        assert!(a.contains_rect(&MapRect::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!a.contains_rect(&b));
        assert!(a
            .intersection(&MapRect::new(20.0, 20.0, 1.0, 1.0))
            .is_none());
        assert!(a.contains_point(&MapPoint::new(10.0, 0.0)));
    }

    #[test]
    fn bounding_rect_covers_points() {
        let r = MapRect::bounding(&[
            MapPoint::new(3.0, -1.0),
            MapPoint::new(-2.0, 4.0),
            MapPoint::new(0.0, 0.0),
        ])
        .expect("non-empty");
        assert_eq!(r, MapRect::new(-2.0, -1.0, 5.0, 5.0));
        assert!(MapRect::bounding(&[]).is_none());
        assert_eq!(r.center(), MapPoint::new(0.5, 1.5));
    }

    #[test]
    fn coordinate_serializes_with_named_fields() {
        let json = serde_json::to_string(&GeoCoordinate::new(1.5, -2.5)).expect("serialize");
        assert_eq!(json, r#"{"latitude":1.5,"longitude":-2.5}"#);
    }
}
