use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use plotshape::{RecognitionMode, TextReader};
use std::io::Cursor;

/// Reader that returns the same text for every region and mode.
pub struct FixedTextReader {
    pub text: String,
}

impl FixedTextReader {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl TextReader for FixedTextReader {
    fn read_text(&self, _region: &GrayImage, _mode: RecognitionMode) -> anyhow::Result<String> {
        Ok(self.text.clone())
    }
}

/// Uniform white image of the given size.
pub fn blank_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
}

/// A 400x400 synthetic parcel layout: two square plots drawn with a 3 px
/// black boundary stroke on a white page.
pub fn layout_image() -> DynamicImage {
    let mut img = RgbImage::from_pixel(400, 400, Rgb([255, 255, 255]));
    draw_plot_boundary(&mut img, 30, 30, 150);
    draw_plot_boundary(&mut img, 220, 220, 150);
    DynamicImage::ImageRgb8(img)
}

fn draw_plot_boundary(img: &mut RgbImage, x: i32, y: i32, side: u32) {
    for inset in 0..3 {
        draw_hollow_rect_mut(
            img,
            Rect::at(x + inset, y + inset).of_size(side - 2 * inset as u32, side - 2 * inset as u32),
            Rgb([0, 0, 0]),
        );
    }
}

/// PNG-encode an image, as an upload body would arrive.
pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("failed to encode test image");
    bytes
}
