//! Plot boundary extraction from raster layout images.
//!
//! Takes a scanned or printed land subdivision layout and returns closed
//! polygons, one per plot, each annotated with a plot number read from the
//! image or assigned from a deterministic fallback sequence.

pub mod detection;
pub mod error;
pub mod models;
pub mod numbering;
pub mod pipeline;

pub use detection::ocr::{
    NullTextReader, OcrsTextReader, RecognitionMode, TextReader, recognize_plot_number,
};
pub use detection::{ContourFilter, PlotDetector};
pub use error::DetectError;
pub use models::{DetectResponse, PlotPolygon, PlotRecord, Point};
pub use numbering::{AssignedNumber, NumberAssigner, assign_numbers};
pub use pipeline::{PlotPipeline, detect_plots, ensure_supported_media, load_image};
