use std::cmp::Ordering;

use image::GrayImage;
use imageproc::contours::{Contour, find_contours};
use imageproc::geometry::{approximate_polygon_dp, arc_length, convex_hull};
use imageproc::point::Point;

use crate::models::{PlotPolygon, polygon_area};

/// Gates applied to every traced contour. A contour must pass all of them to
/// become a candidate plot polygon. Each gate targets one artifact class
/// common in printed parcel maps: scan noise, the page border, roads drawn
/// as long thin shapes, torn or overlapping ink.
#[derive(Debug, Clone)]
pub struct ContourFilter {
    /// Absolute floor for contour area in square pixels.
    pub min_area_px: f64,
    /// Relative floor for contour area as a fraction of image area.
    pub min_area_frac: f64,
    /// A top-level contour above this fraction of image area is the layout
    /// frame, not a plot.
    pub frame_area_frac: f64,
    /// Bounding-box aspect ratio ceiling; the floor is its reciprocal.
    pub max_aspect_ratio: f64,
    /// Minimum enclosed area over convex-hull area.
    pub min_solidity: f64,
    /// Douglas-Peucker epsilon as a fraction of the contour perimeter.
    pub epsilon_factor: f64,
    pub min_vertices: usize,
    pub max_vertices: usize,
}

impl ContourFilter {
    pub fn new() -> Self {
        Self {
            min_area_px: 500.0,
            min_area_frac: 0.001,
            frame_area_frac: 0.25,
            max_aspect_ratio: 10.0,
            min_solidity: 0.5,
            epsilon_factor: 0.015,
            min_vertices: 3,
            max_vertices: 20,
        }
    }

    /// Runs the gates against one traced contour. `Some` carries the
    /// approximated polygon when every gate passes.
    pub fn evaluate(&self, contour: &Contour<i32>, img_area: f64) -> Option<PlotPolygon> {
        let area = polygon_area(&contour.points);

        // Noise gate.
        let min_area = self.min_area_px.max(img_area * self.min_area_frac);
        if area < min_area {
            return None;
        }

        // A parentless contour covering most of the image is the outer frame
        // of the whole layout.
        if contour.parent.is_none() && area > img_area * self.frame_area_frac {
            return None;
        }

        // Roads and stray lines trace as extremely elongated boxes.
        let (width, height) = bounding_extent(&contour.points);
        if height == 0 {
            return None;
        }
        let aspect = width as f64 / height as f64;
        if aspect > self.max_aspect_ratio || aspect < 1.0 / self.max_aspect_ratio {
            return None;
        }

        // Hollow or self-intersecting noise shapes have low solidity.
        let hull = convex_hull(contour.points.clone());
        let hull_area = polygon_area(&hull);
        if hull_area > 0.0 && area / hull_area < self.min_solidity {
            return None;
        }

        // Reduce the pixel-level trace to a small clean vertex list; anything
        // still jagged after approximation is noise, not a plot boundary.
        let epsilon = self.epsilon_factor * arc_length(&contour.points, true);
        let approx = approximate_polygon_dp(&contour.points, epsilon, true);
        if approx.len() < self.min_vertices || approx.len() > self.max_vertices {
            return None;
        }

        Some(PlotPolygon::new(approx))
    }
}

impl Default for ContourFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Trace closed contours in a binary boundary map and reduce the survivors
/// to candidate plot polygons, largest area first.
///
/// The full contour hierarchy is traced so nested plots are discoverable;
/// parent links feed the outer-frame gate. The returned order is the basis
/// for deterministic fallback numbering: the trace order is a raster scan
/// and the sort is stable, so identical pixels always yield the same list.
pub fn extract_polygons(boundaries: &GrayImage, filter: &ContourFilter) -> Vec<PlotPolygon> {
    let img_area = boundaries.width() as f64 * boundaries.height() as f64;
    let contours = find_contours::<i32>(boundaries);
    log::debug!("traced {} contours", contours.len());

    let mut polygons: Vec<PlotPolygon> = contours
        .iter()
        .filter_map(|c| filter.evaluate(c, img_area))
        .collect();
    log::debug!("{} candidates after filtering", polygons.len());

    polygons.sort_by(|a, b| {
        b.area()
            .partial_cmp(&a.area())
            .unwrap_or(Ordering::Equal)
    });
    polygons
}

fn bounding_extent(points: &[Point<i32>]) -> (i32, i32) {
    if points.is_empty() {
        return (0, 0);
    }
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (max_x - min_x, max_y - min_y)
}
