use thiserror::Error;

/// Failures surfaced to the caller of the detection pipeline.
///
/// Per-polygon recognition problems are not part of this taxonomy: they are
/// absorbed inside the recognizer and degrade to "no result".
#[derive(Debug, Error)]
pub enum DetectError {
    /// Input bytes are not a parsable raster image. The pipeline never starts.
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Declared content type is not JPEG or PNG. Rejected before any byte of
    /// image data is read.
    #[error("unsupported media type `{0}`: only JPEG and PNG images are supported")]
    UnsupportedMedia(String),

    /// Catch-all for unexpected faults; the whole request fails, no partial
    /// plot list is returned.
    #[error("failed to process image: {0}")]
    Pipeline(#[source] anyhow::Error),
}

impl DetectError {
    /// True for errors the caller can fix (bad input), false for internal ones.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DetectError::Decode(_) | DetectError::UnsupportedMedia(_))
    }
}
