use image::{DynamicImage, GrayImage};
use imageproc::contrast::adaptive_threshold;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::bilateral_filter;
use imageproc::morphology::{close, dilate};

/// Convert image to grayscale.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Edge-preserving smoothing. A bilateral filter suppresses scan noise
/// without blurring the thin boundary lines between plots.
pub fn smooth(img: &GrayImage, window_size: u32, sigma_color: f32, sigma_spatial: f32) -> GrayImage {
    bilateral_filter(img, window_size, sigma_color, sigma_spatial)
}

/// Detect edges using the Canny edge detector.
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Bridge small gaps in boundary lines: a morphological close (two 3x3
/// iterations) followed by a light dilation. Printed boundaries are
/// frequently broken and must be reconnected before contour tracing.
pub fn close_boundary_gaps(edges: &GrayImage) -> GrayImage {
    let closed = close(edges, Norm::LInf, 2);
    dilate(&closed, Norm::LInf, 1)
}

/// Binarize an OCR region relative to its local neighborhood, inverted so
/// that ink becomes foreground. Normalizes uneven lighting and print
/// contrast before text recognition.
pub fn binarize_region(region: &GrayImage, block_radius: u32) -> GrayImage {
    let mut binary = adaptive_threshold(region, block_radius);
    image::imageops::invert(&mut binary);
    binary
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn uniform_image_has_no_edges() {
        let img = GrayImage::from_pixel(64, 64, Luma([255u8]));
        let edges = detect_edges(&img, 30.0, 100.0);
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn gap_closing_preserves_dimensions() {
        let img = GrayImage::from_pixel(32, 48, Luma([0u8]));
        let out = close_boundary_gaps(&img);
        assert_eq!(out.dimensions(), (32, 48));
    }

    #[test]
    fn binarize_inverts_polarity() {
        // Dark text stroke on a light background becomes white-on-black.
        let mut img = GrayImage::from_pixel(40, 40, Luma([220u8]));
        for y in 15..25 {
            for x in 18..22 {
                img.put_pixel(x, y, Luma([10u8]));
            }
        }
        let binary = binarize_region(&img, 5);
        // Ink is brought to foreground, the light paper next to it is not.
        assert_eq!(binary.get_pixel(20, 20)[0], 255);
        assert_eq!(binary.get_pixel(26, 20)[0], 0);
    }
}
