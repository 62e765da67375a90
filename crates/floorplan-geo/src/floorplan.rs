//! Map-space footprint of one floorplan page.

use floorplan_geo_core::{
    AffineTransform, GeoCoordinate, MapPoint, MapRect, RotatedRect, RotatedRectError,
};
use log::debug;
use nalgebra::Point2;

use crate::anchor::GeoAnchorPair;
use crate::converter::{normalize_heading, ConverterError, CoordinateConverter};
use crate::page::PageRect;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum FloorplanError {
    #[error(transparent)]
    Converter(#[from] ConverterError),
    #[error("page box {0:?} has zero area")]
    EmptyPageBox(PageRect),
    #[error(transparent)]
    PageBox(#[from] RotatedRectError),
}

/// One floor of a venue: a page box pinned to the Earth by two anchors.
///
/// Everything a map view needs to draw and clamp to the floorplan is
/// computed once here.
#[derive(Clone, Debug, PartialEq)]
pub struct Floorplan {
    converter: CoordinateConverter,
    page_box: PageRect,
    floor_level: i32,
    /// Page rotation entry of the PDF page: clockwise degrees, multiple of 90.
    page_rotation_degrees: i32,
    page_to_projected: AffineTransform,
    bounding_rect: MapRect,
    bounding_rect_including_rotations: MapRect,
    page_box_rotated: RotatedRect,
    center: GeoCoordinate,
}

impl Floorplan {
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(anchors)))]
    pub fn new(
        anchors: GeoAnchorPair,
        page_box: PageRect,
        floor_level: i32,
        page_rotation_degrees: i32,
    ) -> Result<Self, FloorplanError> {
        Self::from_converter(
            CoordinateConverter::new(anchors)?,
            page_box,
            floor_level,
            page_rotation_degrees,
        )
    }

    pub fn from_converter(
        converter: CoordinateConverter,
        page_box: PageRect,
        floor_level: i32,
        page_rotation_degrees: i32,
    ) -> Result<Self, FloorplanError> {
        if !(page_box.width.abs() > 0.0 && page_box.height.abs() > 0.0) {
            return Err(FloorplanError::EmptyPageBox(page_box));
        }

        let polygon = converter.polygon_from_page_rect_corners(&page_box);
        let bounding_rect =
            MapRect::bounding(&polygon).ok_or(FloorplanError::EmptyPageBox(page_box))?;
        let [c1, c2, c3, c4] = polygon;
        let page_box_rotated = RotatedRect::from_corners(c1, c2, c3, c4)?;
        let bounding_rect_including_rotations =
            converter.bounding_box_including_rotations(&page_box);
        let center = converter.projection().unproject(&bounding_rect.center());
        let page_to_projected = converter.affine_transform_page_to_projected();

        debug!(
            "floorplan level {}: {:.1} x {:.1} map points, center ({:.7}, {:.7})",
            floor_level,
            page_box_rotated.size.width,
            page_box_rotated.size.height,
            center.latitude,
            center.longitude
        );

        Ok(Self {
            converter,
            page_box,
            floor_level,
            page_rotation_degrees,
            page_to_projected,
            bounding_rect,
            bounding_rect_including_rotations,
            page_box_rotated,
            center,
        })
    }

    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    pub fn anchors(&self) -> &GeoAnchorPair {
        self.converter.anchors()
    }

    pub fn page_box(&self) -> PageRect {
        self.page_box
    }

    pub fn floor_level(&self) -> i32 {
        self.floor_level
    }

    pub fn page_rotation_degrees(&self) -> i32 {
        self.page_rotation_degrees
    }

    /// Cached page -> map transform, for renderers that draw the page directly.
    pub fn page_to_projected(&self) -> &AffineTransform {
        &self.page_to_projected
    }

    /// North-aligned bounds of the page box.
    pub fn bounding_rect(&self) -> MapRect {
        self.bounding_rect
    }

    /// Bounds that fit the page box under any camera rotation.
    pub fn bounding_rect_including_rotations(&self) -> MapRect {
        self.bounding_rect_including_rotations
    }

    /// The page box as it sits on the map, rotation included.
    pub fn page_box_rotated(&self) -> &RotatedRect {
        &self.page_box_rotated
    }

    /// Centre of [`Floorplan::bounding_rect`] on Earth.
    pub fn center(&self) -> GeoCoordinate {
        self.center
    }

    /// Camera heading (degrees, `[0, 360)`) that shows the *printed* page
    /// upright, honouring its rotation entry.
    pub fn upright_heading(&self) -> f64 {
        // The rotation entry asks the reader to turn the page clockwise,
        // which is the same as turning the camera heading back.
        normalize_heading(self.converter.upright_heading() - f64::from(self.page_rotation_degrees))
    }

    pub fn polygon_from_page_path(&self, path: &[Point2<f64>]) -> Vec<MapPoint> {
        self.converter.polygon_from_page_path(path)
    }

    /// Where the page origin `(0, 0)` lands on the map.
    pub fn page_origin(&self) -> MapPoint {
        self.converter
            .projected_point_from_page_point(&Point2::origin())
    }

    pub fn page_box_polygon(&self) -> [MapPoint; 4] {
        self.converter.polygon_from_page_rect_corners(&self.page_box)
    }

    pub fn bounding_rect_polygon(&self) -> [MapPoint; 4] {
        self.bounding_rect.corners()
    }

    pub fn bounding_rect_including_rotations_polygon(&self) -> [MapPoint; 4] {
        self.bounding_rect_including_rotations.corners()
    }

    /// Real-world length in meters of one page unit.
    pub fn page_unit_size_in_meters(&self) -> f64 {
        self.converter.unit_size_in_meters()
    }
}
