use imageproc::point::Point as PixelPoint;
use serde::Serialize;

/// Enclosed area of an implicitly closed polygon, via the shoelace formula.
pub fn polygon_area(points: &[PixelPoint<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        sum += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (sum.abs() as f64) / 2.0
}

/// One candidate plot boundary in pixel coordinates.
///
/// Vertices are ordered and implicitly closed (no repeated closing vertex).
/// The detector only produces polygons with 3 to 20 vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPolygon {
    pub vertices: Vec<PixelPoint<i32>>,
}

impl PlotPolygon {
    pub fn new(vertices: Vec<PixelPoint<i32>>) -> Self {
        Self { vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    /// Axis-aligned bounding box as (min_x, min_y, width, height).
    pub fn bounding_box(&self) -> (i32, i32, i32, i32) {
        if self.vertices.is_empty() {
            return (0, 0, 0, 0);
        }
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for p in &self.vertices {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        (min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Bounding box grown by `padding` on each side and clamped to the image,
    /// as (x, y, width, height). Plot labels are often printed just outside
    /// the boundary line, so the pad captures them. Returns `None` for a
    /// degenerate region.
    pub fn padded_region(
        &self,
        padding: u32,
        img_width: u32,
        img_height: u32,
    ) -> Option<(u32, u32, u32, u32)> {
        let (bx, by, bw, bh) = self.bounding_box();
        let x = (bx - padding as i32).max(0) as u32;
        let y = (by - padding as i32).max(0) as u32;
        if x >= img_width || y >= img_height {
            return None;
        }
        let w = ((bw + 2 * padding as i32).max(0) as u32).min(img_width - x);
        let h = ((bh + 2 * padding as i32).max(0) as u32).min(img_height - y);
        if w == 0 || h == 0 {
            return None;
        }
        Some((x, y, w, h))
    }

    /// Vertices as float points for the outbound response.
    pub fn to_points(&self) -> Vec<Point> {
        self.vertices
            .iter()
            .map(|p| Point {
                x: p.x as f32,
                y: p.y as f32,
            })
            .collect()
    }
}

/// A polygon vertex in the outbound response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// One detected plot in the outbound response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRecord {
    pub id: String,
    #[serde(rename = "plotNumber")]
    pub plot_number: String,
    pub status: String,
    pub polygon: Vec<Point>,
}

/// Outbound response: image dimensions plus the detected plots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectResponse {
    pub width: u32,
    pub height: u32,
    pub plots: Vec<PlotRecord>,
}
