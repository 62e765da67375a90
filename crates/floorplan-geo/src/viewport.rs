//! Keep a map viewport on a floorplan.
//!
//! These are the decisions behind "bounce back" camera behaviour: zoom in
//! when the user zoomed out past the floorplan, scroll back when the view
//! centre left the page box, and optionally rotate the page upright. Nothing
//! here talks to a map view; callers apply the returned [`ViewportUpdate`].

use floorplan_geo_core::{MapPoint, MapRect, RotatedRect};
use log::trace;
use nalgebra::Vector2;

use crate::floorplan::Floorplan;

/// What the map currently shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Visible region in map points.
    pub visible: MapRect,
    /// Camera altitude in meters.
    pub altitude: f64,
    /// Camera heading in degrees.
    pub heading: f64,
}

impl Viewport {
    pub fn center(&self) -> MapPoint {
        self.visible.center()
    }
}

/// Scroll that brings the view centre back onto the page box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAdjustment {
    pub offset: Vector2<f64>,
    pub new_center: MapPoint,
}

/// Camera changes to apply. `None` fields stay as they are.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportUpdate {
    pub altitude: Option<f64>,
    pub center: Option<MapPoint>,
    pub heading: Option<f64>,
}

impl ViewportUpdate {
    pub fn is_empty(&self) -> bool {
        self.altitude.is_none() && self.center.is_none() && self.heading.is_none()
    }
}

/// Clamping state for one floorplan.
///
/// Zoom is only corrected while the altitude is changing; once it settles,
/// scrolling is corrected instead.
#[derive(Clone, Debug)]
pub struct ViewportClamp {
    bounds: MapRect,
    page_box: RotatedRect,
    center: MapPoint,
    upright_heading: f64,
    /// Scrolls shorter than this (map points) are ignored.
    pub min_scroll_distance: f64,
    last_altitude: Option<f64>,
    needs_heading_reset: bool,
}

impl ViewportClamp {
    pub fn new(floorplan: &Floorplan) -> Self {
        Self {
            bounds: floorplan.bounding_rect_including_rotations(),
            page_box: *floorplan.page_box_rotated(),
            center: floorplan
                .converter()
                .projection()
                .project(&floorplan.center()),
            upright_heading: floorplan.upright_heading(),
            min_scroll_distance: 0.0,
            last_altitude: None,
            needs_heading_reset: true,
        }
    }

    pub fn with_min_scroll_distance(mut self, distance: f64) -> Self {
        self.min_scroll_distance = distance;
        self
    }

    /// Ask for the next settled update to also rotate the page upright.
    pub fn request_heading_reset(&mut self) {
        self.needs_heading_reset = true;
    }

    /// Camera reset: centre on the floorplan, page upright.
    pub fn reset(&self) -> ViewportUpdate {
        ViewportUpdate {
            altitude: None,
            center: Some(self.center),
            heading: Some(self.upright_heading),
        }
    }

    /// True when the floorplan fills the view in neither direction.
    pub fn floorplan_does_not_fill(&self, visible: &MapRect) -> bool {
        if self.bounds.contains_rect(visible) {
            return false;
        }
        match self.bounds.intersection(visible) {
            Some(part) => {
                part.size.width < visible.size.width && part.size.height < visible.size.height
            }
            None => true,
        }
    }

    /// New altitude when zoomed out beyond `fitted`, the visible rect that
    /// would exactly fit the floorplan bounds on screen.
    pub fn zoom_adjustment(&self, viewport: &Viewport, fitted: &MapRect) -> Option<f64> {
        let visible_area = viewport.visible.size.area();
        let fitted_area = fitted.size.area();
        if !(visible_area > 0.0) || fitted_area >= visible_area {
            return None;
        }
        let altitude = viewport.altitude * (fitted_area / visible_area).sqrt();
        (altitude < viewport.altitude).then_some(altitude)
    }

    /// Scroll back onto the rotated page box, if the centre left it.
    pub fn scroll_adjustment(&self, viewport: &Viewport) -> Option<ScrollAdjustment> {
        let center = viewport.center();
        if self.page_box.contains(&center) {
            return None;
        }
        let nearest = self.page_box.nearest_point(&center);
        let offset = nearest - center;
        if offset.norm() <= self.min_scroll_distance {
            return None;
        }
        Some(ScrollAdjustment {
            offset,
            new_center: nearest,
        })
    }

    /// React to a finished region change.
    pub fn on_region_changed(&mut self, viewport: &Viewport, fitted: &MapRect) -> ViewportUpdate {
        if self.last_altitude != Some(viewport.altitude) {
            self.last_altitude = Some(viewport.altitude);
            if self.floorplan_does_not_fill(&viewport.visible) {
                if let Some(altitude) = self.zoom_adjustment(viewport, fitted) {
                    trace!("zoom clamp: altitude {:.1} -> {:.1}", viewport.altitude, altitude);
                    // Zoomed out far enough to see everything: recentre as well.
                    return ViewportUpdate {
                        altitude: Some(altitude),
                        center: Some(self.center),
                        heading: None,
                    };
                }
            }
        }

        let mut update = ViewportUpdate::default();
        if self.needs_heading_reset {
            update.heading = Some(self.upright_heading);
            self.needs_heading_reset = false;
        }
        if let Some(scroll) = self.scroll_adjustment(viewport) {
            trace!("scroll clamp: offset ({:.2}, {:.2})", scroll.offset.x, scroll.offset.y);
            update.center = Some(scroll.new_center);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{GeoAnchor, GeoAnchorPair};
    use crate::page::PageRect;
    use approx::assert_abs_diff_eq;

    fn floorplan() -> Floorplan {
        Floorplan::new(
            GeoAnchorPair::new(
                GeoAnchor::new(37.770419, -122.465726, 26.2, 86.4),
                GeoAnchor::new(37.769288, -122.466376, 570.1, 317.7),
            ),
            PageRect::new(0.0, 0.0, 612.0, 792.0),
            0,
            0,
        )
        .expect("valid floorplan")
    }

    fn view_around(center: MapPoint, half: f64, altitude: f64) -> Viewport {
        Viewport {
            visible: MapRect::new(center.x - half, center.y - half, 2.0 * half, 2.0 * half),
            altitude,
            heading: 0.0,
        }
    }

    #[test]
    fn reset_centres_and_rotates() {
        let fp = floorplan();
        let update = ViewportClamp::new(&fp).reset();
        assert_eq!(update.heading, Some(fp.upright_heading()));
        assert!(update.center.is_some());
        assert!(update.altitude.is_none());
    }

    #[test]
    fn scroll_returns_to_page_box() {
        let fp = floorplan();
        let clamp = ViewportClamp::new(&fp);
        let far = fp.page_box_rotated().center + Vector2::new(5_000.0, -3_000.0);
        let scroll = clamp
            .scroll_adjustment(&view_around(far, 50.0, 300.0))
            .expect("outside");
        assert!(fp.page_box_rotated().contains(&scroll.new_center));
        assert_abs_diff_eq!(scroll.new_center.x, far.x + scroll.offset.x, epsilon = 1e-6);

        let inside = fp.page_box_rotated().center;
        assert!(clamp.scroll_adjustment(&view_around(inside, 50.0, 300.0)).is_none());
    }

    #[test]
    fn short_scrolls_are_ignored() {
        let fp = floorplan();
        let clamp = ViewportClamp::new(&fp).with_min_scroll_distance(10.0);
        let corner = fp.page_box_polygon()[0];
        let just_outside = corner + (corner - fp.page_box_rotated().center).normalize() * 1.0;
        assert!(clamp
            .scroll_adjustment(&view_around(just_outside, 20.0, 300.0))
            .is_none());
    }

    #[test]
    fn zoom_in_when_view_is_too_large() {
        let fp = floorplan();
        let clamp = ViewportClamp::new(&fp);
        let bounds = fp.bounding_rect_including_rotations();
        let huge = view_around(bounds.center(), bounds.size.width * 4.0, 8_000.0);
        assert!(clamp.floorplan_does_not_fill(&huge.visible));

        let altitude = clamp.zoom_adjustment(&huge, &bounds).expect("zoom in");
        let expected = 8_000.0 * (bounds.size.area() / huge.visible.size.area()).sqrt();
        assert_abs_diff_eq!(altitude, expected, epsilon = 1e-6);
        assert!(altitude < 8_000.0);

        let small = view_around(bounds.center(), bounds.size.width * 0.1, 100.0);
        assert!(!clamp.floorplan_does_not_fill(&small.visible));
        assert!(clamp.zoom_adjustment(&small, &bounds).is_none());
    }

    #[test]
    fn region_change_zooms_then_scrolls() {
        let fp = floorplan();
        let mut clamp = ViewportClamp::new(&fp);
        let bounds = fp.bounding_rect_including_rotations();

        let huge = view_around(bounds.center(), bounds.size.width * 4.0, 8_000.0);
        let update = clamp.on_region_changed(&huge, &bounds);
        assert!(update.altitude.is_some());
        assert!(update.heading.is_none());

        // Altitude settled: scroll and the pending heading reset apply.
        let away = view_around(bounds.center() + Vector2::new(0.0, 4_000.0), 100.0, 1_000.0);
        let first = clamp.on_region_changed(&away, &bounds);
        assert!(first.altitude.is_none());
        let settled = clamp.on_region_changed(&away, &bounds);
        assert!(settled.altitude.is_none());
        assert!(settled.center.is_some());
        assert!(settled.heading.is_none());
        assert_eq!(first.heading, Some(fp.upright_heading()));
    }

    #[test]
    fn nothing_to_do_on_the_floorplan() {
        let fp = floorplan();
        let mut clamp = ViewportClamp::new(&fp);
        clamp.on_region_changed(
            &view_around(fp.page_box_rotated().center, 30.0, 200.0),
            &fp.bounding_rect(),
        );
        let update = clamp.on_region_changed(
            &view_around(fp.page_box_rotated().center, 30.0, 200.0),
            &fp.bounding_rect(),
        );
        assert!(update.is_empty());

        clamp.request_heading_reset();
        let update = clamp.on_region_changed(
            &view_around(fp.page_box_rotated().center, 30.0, 200.0),
            &fp.bounding_rect(),
        );
        assert_eq!(update.heading, Some(fp.upright_heading()));
    }
}
