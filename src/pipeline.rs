//! End-to-end plot detection: media gate, image decoding, polygon detection,
//! per-polygon number recognition, and response assembly.
//!
//! Every invocation is self-contained; the numbering state lives on the
//! stack of the call, so concurrent invocations never interfere.

use std::path::Path;

use image::DynamicImage;

use crate::detection::PlotDetector;
use crate::detection::ocr::{TextReader, recognize_plot_number};
use crate::error::DetectError;
use crate::models::{DetectResponse, PlotRecord};
use crate::numbering::NumberAssigner;

/// Media types the pipeline accepts. `image/jpg` is a common nonstandard
/// alias clients send for JPEG.
pub const SUPPORTED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Status every freshly detected plot starts with.
pub const DEFAULT_STATUS: &str = "AVAILABLE";

/// Reject anything that is not a declared JPEG or PNG, before any image
/// bytes are read.
pub fn ensure_supported_media(content_type: &str) -> Result<(), DetectError> {
    if SUPPORTED_MEDIA_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(DetectError::UnsupportedMedia(content_type.to_string()))
    }
}

/// Media type implied by a file extension, for the CLI front end.
pub fn media_type_for_path(path: &Path) -> Result<&'static str, DetectError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        other => Err(DetectError::UnsupportedMedia(other.to_string())),
    }
}

/// Decode raw bytes into an image plus its dimensions.
pub fn load_image(bytes: &[u8]) -> Result<(DynamicImage, u32, u32), DetectError> {
    let img = image::load_from_memory(bytes).map_err(DetectError::Decode)?;
    let (width, height) = (img.width(), img.height());
    Ok((img, width, height))
}

/// One detection run over one decoded image.
pub struct PlotPipeline<'a> {
    detector: PlotDetector,
    reader: &'a dyn TextReader,
}

impl<'a> PlotPipeline<'a> {
    pub fn new(reader: &'a dyn TextReader) -> Self {
        Self {
            detector: PlotDetector::new(),
            reader,
        }
    }

    pub fn with_detector(mut self, detector: PlotDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Detector, per-polygon recognizer, and assigner in sequence. The
    /// candidate order (largest area first) is preserved in the output.
    pub fn run(&self, image: &DynamicImage) -> DetectResponse {
        let polygons = self.detector.detect(image);

        let recognized: Vec<Option<String>> = polygons
            .iter()
            .map(|poly| recognize_plot_number(self.reader, image, poly))
            .collect();

        let mut assigner = NumberAssigner::new();
        let plots = polygons
            .iter()
            .zip(&recognized)
            .map(|(poly, label)| {
                let assigned = assigner.assign(label.as_deref());
                if assigned.fallback {
                    log::debug!("assigned fallback number {}", assigned.number);
                } else {
                    log::debug!("recognized plot number {}", assigned.number);
                }
                PlotRecord {
                    id: format!("plot-{}", assigned.number),
                    plot_number: assigned.number,
                    status: DEFAULT_STATUS.to_string(),
                    polygon: poly.to_points(),
                }
            })
            .collect();

        DetectResponse {
            width: image.width(),
            height: image.height(),
            plots,
        }
    }
}

/// Full request flow: media gate, decode, detect, number, assemble.
pub fn detect_plots(
    content_type: &str,
    bytes: &[u8],
    reader: &dyn TextReader,
) -> Result<DetectResponse, DetectError> {
    ensure_supported_media(content_type)?;
    let (image, width, height) = load_image(bytes)?;
    log::info!("processing {width}x{height} layout image");
    Ok(PlotPipeline::new(reader).run(&image))
}
