//! JSON configuration and report helpers for floorplan georeferencing.

use crate::{CoordinateConverter, Floorplan, FloorplanError, GeoAnchorPair, PageRect};
use floorplan_geo_core::{GeoCoordinate, MapPoint, MapRect, RotatedRect, WebMercator};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum FloorplanIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Description of one floorplan and the page points to convert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorplanConfig {
    pub anchors: GeoAnchorPair,
    pub page_box: PageRect,
    #[serde(default)]
    pub floor_level: i32,
    /// PDF page rotation entry in degrees.
    #[serde(default)]
    pub page_rotation_degrees: i32,
    /// Override of the default map-point space.
    #[serde(default)]
    pub projection: Option<WebMercator>,
    #[serde(default)]
    pub query_points: Vec<Point2<f64>>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl FloorplanConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, FloorplanIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), FloorplanIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("floorplan_report.json"))
    }

    pub fn build_converter(&self) -> Result<CoordinateConverter, FloorplanError> {
        let projection = self.projection.unwrap_or_default();
        Ok(CoordinateConverter::with_projection(self.anchors, projection)?)
    }

    pub fn build_floorplan(&self) -> Result<Floorplan, FloorplanError> {
        Floorplan::from_converter(
            self.build_converter()?,
            self.page_box,
            self.floor_level,
            self.page_rotation_degrees,
        )
    }
}

/// One converted query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageQueryResult {
    pub page_point: Point2<f64>,
    pub map_point: MapPoint,
    pub coordinate: GeoCoordinate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorplanReport {
    pub config_path: String,
    pub floor_level: i32,
    #[serde(default)]
    pub unit_size_in_meters: Option<f64>,
    #[serde(default)]
    pub upright_heading: Option<f64>,
    #[serde(default)]
    pub center: Option<GeoCoordinate>,
    #[serde(default)]
    pub bounding_rect: Option<MapRect>,
    #[serde(default)]
    pub bounding_rect_including_rotations: Option<MapRect>,
    #[serde(default)]
    pub page_box_polygon: Option<[MapPoint; 4]>,
    #[serde(default)]
    pub page_box_rotated: Option<RotatedRect>,
    #[serde(default)]
    pub queries: Vec<PageQueryResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FloorplanReport {
    /// Build a base report for a config.
    pub fn new(cfg: &FloorplanConfig, config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_string_lossy().into_owned(),
            floor_level: cfg.floor_level,
            unit_size_in_meters: None,
            upright_heading: None,
            center: None,
            bounding_rect: None,
            bounding_rect_including_rotations: None,
            page_box_polygon: None,
            page_box_rotated: None,
            queries: Vec::new(),
            error: None,
        }
    }

    /// Populate report fields from a floorplan and convert the query points.
    pub fn set_floorplan(&mut self, floorplan: &Floorplan, query_points: &[Point2<f64>]) {
        let converter = floorplan.converter();
        self.unit_size_in_meters = Some(floorplan.page_unit_size_in_meters());
        self.upright_heading = Some(floorplan.upright_heading());
        self.center = Some(floorplan.center());
        self.bounding_rect = Some(floorplan.bounding_rect());
        self.bounding_rect_including_rotations =
            Some(floorplan.bounding_rect_including_rotations());
        self.page_box_polygon = Some(floorplan.page_box_polygon());
        self.page_box_rotated = Some(*floorplan.page_box_rotated());
        self.queries = query_points
            .iter()
            .map(|p| {
                let map_point = converter.projected_point_from_page_point(p);
                PageQueryResult {
                    page_point: *p,
                    map_point,
                    coordinate: converter.projection().unproject(&map_point),
                }
            })
            .collect();
        self.error = None;
    }

    /// Record a construction error.
    pub fn set_error(&mut self, err: FloorplanError) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, FloorplanIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), FloorplanIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
