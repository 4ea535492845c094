//! Error types for layer generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for layered QR operations
pub type Result<T> = std::result::Result<T, LayerError>;

/// Everything that can go wrong between input bytes and PNG files.
///
/// None of these are transient: every variant is an input or environment
/// problem and retrying the same call gives the same answer.
#[derive(Error, Debug)]
pub enum LayerError {
    /// Version number outside 1..=40
    #[error("invalid QR version {version} (expected 1..=40)")]
    InvalidVersion { version: u8 },

    /// Matrix side does not match the claimed version
    #[error("matrix is {actual}x{actual} but version {version} requires {expected}x{expected}")]
    VersionSizeMismatch {
        version: u8,
        expected: usize,
        actual: usize,
    },

    /// Threshold parameters violate 1 <= k <= n
    #[error("invalid threshold k={k}, n={n} (need 1 <= k <= n)")]
    InvalidThreshold { k: usize, n: usize },

    /// The QR encoder could not represent the input
    #[error("QR encoding failed: {0}")]
    EncodingFailure(String),

    /// A layer index passed to a stacking call does not exist
    #[error("layer index {index} out of range for {layers} layers")]
    LayerIndexOutOfRange { index: usize, layers: usize },

    /// Pixel scaling or margin cannot produce an image
    #[error("invalid render options: {reason}")]
    InvalidRenderOptions { reason: String },

    /// PNG encoding failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem operation failed
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LayerError {
    /// Stable identifier for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            LayerError::InvalidVersion { .. } => "INVALID_VERSION",
            LayerError::VersionSizeMismatch { .. } => "INVALID_VERSION",
            LayerError::InvalidThreshold { .. } => "INVALID_THRESHOLD",
            LayerError::EncodingFailure(_) => "ENCODING_FAILURE",
            LayerError::LayerIndexOutOfRange { .. } => "LAYER_INDEX_OUT_OF_RANGE",
            LayerError::InvalidRenderOptions { .. } => "INVALID_RENDER_OPTIONS",
            LayerError::Image(_) => "IMAGE_ERROR",
            LayerError::Io { .. } => "IO_ERROR",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LayerError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<qrcode::types::QrError> for LayerError {
    fn from(err: qrcode::types::QrError) -> Self {
        LayerError::EncodingFailure(err.to_string())
    }
}
