use std::path::Path;

use image::{DynamicImage, GrayImage};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;

use crate::detection::preprocessing;
use crate::models::PlotPolygon;

/// Pixels added around a polygon's bounding box before reading its label.
pub const LABEL_PADDING: u32 = 10;

/// Block radius for the adaptive threshold applied to label regions.
const BINARIZE_BLOCK_RADIUS: u32 = 5;

/// Plausible plot-number range; larger values are usually area or dimension
/// text, not labels.
pub const MIN_PLOT_NUMBER: u32 = 1;
pub const MAX_PLOT_NUMBER: u32 = 9999;

/// Recognition profile requested from the text-recognition capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionMode {
    /// Digit characters only, single text line.
    Digits,
    /// Unrestricted single-word recognition.
    General,
}

/// Narrow capability interface over the text-recognition backend, so the
/// recognizer can be exercised with fake implementations in tests.
pub trait TextReader {
    fn read_text(&self, region: &GrayImage, mode: RecognitionMode) -> anyhow::Result<String>;
}

/// ocrs-backed reader with models from the standard cache location.
///
/// Two engines are kept: the digit profile restricts the output alphabet to
/// `0-9`, the general profile is unrestricted.
pub struct OcrsTextReader {
    digits: OcrEngine,
    general: OcrEngine,
}

impl OcrsTextReader {
    /// Load OCR models from `~/.cache/ocrs`, the location used by ocrs-cli.
    pub fn from_cache_dir() -> anyhow::Result<Self> {
        let home_dir = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;

        let cache_dir = Path::new(&home_dir).join(".cache/ocrs");
        let detection_model_path = cache_dir.join("text-detection.rten");
        let recognition_model_path = cache_dir.join("text-recognition.rten");

        if !detection_model_path.exists() || !recognition_model_path.exists() {
            anyhow::bail!(
                "OCR models not found. Please run: ocrs-cli --help (or download models manually)\n\
                 Expected locations:\n  - {}\n  - {}",
                detection_model_path.display(),
                recognition_model_path.display()
            );
        }

        let digits = OcrEngine::new(OcrEngineParams {
            detection_model: Some(Model::load_file(&detection_model_path)?),
            recognition_model: Some(Model::load_file(&recognition_model_path)?),
            allowed_chars: Some("0123456789".to_string()),
            ..Default::default()
        })?;
        let general = OcrEngine::new(OcrEngineParams {
            detection_model: Some(Model::load_file(&detection_model_path)?),
            recognition_model: Some(Model::load_file(&recognition_model_path)?),
            ..Default::default()
        })?;

        Ok(Self { digits, general })
    }

    fn run(engine: &OcrEngine, region: &GrayImage) -> anyhow::Result<String> {
        // ocrs wants interleaved RGB input.
        let rgb = DynamicImage::ImageLuma8(region.clone()).to_rgb8();
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())?;
        let input = engine.prepare_input(source)?;
        let text = engine.get_text(&input)?;
        Ok(text.trim().to_string())
    }
}

impl TextReader for OcrsTextReader {
    fn read_text(&self, region: &GrayImage, mode: RecognitionMode) -> anyhow::Result<String> {
        let engine = match mode {
            RecognitionMode::Digits => &self.digits,
            RecognitionMode::General => &self.general,
        };
        Self::run(engine, region)
    }
}

/// Reader that never sees any text. Backs the CLI `--no-ocr` mode, where
/// every plot gets a sequential fallback number.
pub struct NullTextReader;

impl TextReader for NullTextReader {
    fn read_text(&self, _region: &GrayImage, _mode: RecognitionMode) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

/// Attempt to read the plot number printed in or near one polygon.
///
/// Reads digit-only first, then falls back to general recognition when the
/// digit pass comes back empty; labels printed with surrounding punctuation
/// or icons often defeat the digit pass. Any reader failure degrades to
/// `None` so one bad region cannot abort the whole request.
pub fn recognize_plot_number(
    reader: &dyn TextReader,
    image: &DynamicImage,
    polygon: &PlotPolygon,
) -> Option<String> {
    let (x, y, w, h) = polygon.padded_region(LABEL_PADDING, image.width(), image.height())?;
    let region = image.crop_imm(x, y, w, h).to_luma8();
    let binary = preprocessing::binarize_region(&region, BINARIZE_BLOCK_RADIUS);

    let text = match reader.read_text(&binary, RecognitionMode::Digits) {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => match reader.read_text(&binary, RecognitionMode::General) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("general OCR pass failed: {err}");
                return None;
            }
        },
        Err(err) => {
            log::debug!("digit OCR pass failed: {err}");
            return None;
        }
    };

    first_plausible_number(&text)
}

/// First maximal digit run whose value is a plausible plot number,
/// normalized to a three-digit zero-padded string.
pub fn first_plausible_number(text: &str) -> Option<String> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse::<u32>().ok())
        .find(|value| (MIN_PLOT_NUMBER..=MAX_PLOT_NUMBER).contains(value))
        .map(|value| format!("{value:03}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::point::Point;
    use std::cell::RefCell;

    /// Scripted reader that records which modes were requested.
    struct FakeReader {
        digits: anyhow::Result<String>,
        general: anyhow::Result<String>,
        calls: RefCell<Vec<RecognitionMode>>,
    }

    impl FakeReader {
        fn new(digits: anyhow::Result<String>, general: anyhow::Result<String>) -> Self {
            Self {
                digits,
                general,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextReader for FakeReader {
        fn read_text(&self, _region: &GrayImage, mode: RecognitionMode) -> anyhow::Result<String> {
            self.calls.borrow_mut().push(mode);
            let result = match mode {
                RecognitionMode::Digits => &self.digits,
                RecognitionMode::General => &self.general,
            };
            match result {
                Ok(text) => Ok(text.clone()),
                Err(err) => Err(anyhow::anyhow!("{err}")),
            }
        }
    }

    fn test_image() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(80, 80, Luma([255u8])))
    }

    fn test_polygon() -> PlotPolygon {
        PlotPolygon::new(vec![
            Point::new(20, 20),
            Point::new(60, 20),
            Point::new(60, 60),
            Point::new(20, 60),
        ])
    }

    #[test]
    fn digit_pass_result_is_preferred() {
        let reader = FakeReader::new(Ok("12".into()), Ok("99".into()));
        let got = recognize_plot_number(&reader, &test_image(), &test_polygon());
        assert_eq!(got, Some("012".into()));
        assert_eq!(&*reader.calls.borrow(), &[RecognitionMode::Digits]);
    }

    #[test]
    fn empty_digit_pass_falls_back_to_general() {
        let reader = FakeReader::new(Ok(String::new()), Ok("no. 45".into()));
        let got = recognize_plot_number(&reader, &test_image(), &test_polygon());
        assert_eq!(got, Some("045".into()));
        assert_eq!(
            &*reader.calls.borrow(),
            &[RecognitionMode::Digits, RecognitionMode::General]
        );
    }

    #[test]
    fn reader_errors_degrade_to_none() {
        let reader = FakeReader::new(Err(anyhow::anyhow!("backend down")), Ok("7".into()));
        assert_eq!(recognize_plot_number(&reader, &test_image(), &test_polygon()), None);

        let reader = FakeReader::new(Ok(String::new()), Err(anyhow::anyhow!("backend down")));
        assert_eq!(recognize_plot_number(&reader, &test_image(), &test_polygon()), None);
    }

    #[test]
    fn implausibly_large_values_are_rejected() {
        let reader = FakeReader::new(Ok("45678".into()), Ok(String::new()));
        assert_eq!(recognize_plot_number(&reader, &test_image(), &test_polygon()), None);
    }

    #[test]
    fn first_plausible_number_picks_first_in_range() {
        assert_eq!(first_plausible_number("Plot 123 (450 sqm)"), Some("123".into()));
        assert_eq!(first_plausible_number("45678 12"), Some("012".into()));
        assert_eq!(first_plausible_number("7"), Some("007".into()));
        assert_eq!(first_plausible_number("0042"), Some("042".into()));
        assert_eq!(first_plausible_number("9999"), Some("9999".into()));
    }

    #[test]
    fn first_plausible_number_rejects_out_of_range_and_empty() {
        assert_eq!(first_plausible_number(""), None);
        assert_eq!(first_plausible_number("no digits here"), None);
        assert_eq!(first_plausible_number("0"), None);
        assert_eq!(first_plausible_number("10000"), None);
        assert_eq!(first_plausible_number("99999999999999999999"), None);
    }
}
