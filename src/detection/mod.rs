pub mod contours;
pub mod ocr;
pub mod preprocessing;

use image::DynamicImage;

use crate::models::PlotPolygon;
pub use contours::ContourFilter;

/// Finds candidate plot polygons in a layout image.
///
/// The pipeline is tuned for printed parcel maps: an edge-preserving smooth,
/// a Canny pass with deliberately low thresholds to catch faint boundary
/// lines, and a morphological close to reconnect boundaries broken by print
/// artifacts, before contour tracing and filtering.
pub struct PlotDetector {
    pub bilateral_window: u32,
    pub bilateral_sigma_color: f32,
    pub bilateral_sigma_spatial: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub filter: ContourFilter,
}

impl PlotDetector {
    pub fn new() -> Self {
        Self {
            bilateral_window: 9,
            bilateral_sigma_color: 75.0,
            bilateral_sigma_spatial: 75.0,
            canny_low: 30.0,
            canny_high: 100.0,
            filter: ContourFilter::new(),
        }
    }

    /// Run detection on a decoded image. Returns candidates sorted by
    /// descending area; empty when nothing survives filtering. Never fails
    /// for a well-formed image.
    pub fn detect(&self, img: &DynamicImage) -> Vec<PlotPolygon> {
        let gray = preprocessing::to_grayscale(img);
        let smoothed = preprocessing::smooth(
            &gray,
            self.bilateral_window,
            self.bilateral_sigma_color,
            self.bilateral_sigma_spatial,
        );
        let edges = preprocessing::detect_edges(&smoothed, self.canny_low, self.canny_high);
        let boundaries = preprocessing::close_boundary_gaps(&edges);
        let polygons = contours::extract_polygons(&boundaries, &self.filter);
        log::debug!("detected {} candidate plots", polygons.len());
        polygons
    }
}

impl Default for PlotDetector {
    fn default() -> Self {
        Self::new()
    }
}
