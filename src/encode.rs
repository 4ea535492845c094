//! QR encoding of input bytes via the `qrcode` crate

use qrcode::{Color, QrCode};

use crate::error::{LayerError, Result};
use crate::models::{BitMatrix, ECLevel, QrMatrix};

impl QrMatrix {
    /// Encode `data` into the smallest normal QR version that fits at `ec_level`.
    ///
    /// Inputs beyond version 40 capacity fail with `EncodingFailure`.
    pub fn encode(data: &[u8], ec_level: ECLevel) -> Result<Self> {
        let code = QrCode::with_error_correction_level(data, ec_level.to_qrcode())?;
        let version = match code.version() {
            qrcode::Version::Normal(v) => u8::try_from(v)
                .map_err(|_| LayerError::EncodingFailure(format!("unexpected version {v}")))?,
            qrcode::Version::Micro(v) => {
                return Err(LayerError::EncodingFailure(format!(
                    "encoder produced Micro QR M{v}"
                )));
            }
        };

        let width = code.width();
        let mut modules = BitMatrix::square(width);
        for (i, color) in code.to_colors().iter().enumerate() {
            if *color == Color::Dark {
                modules.set(i / width, i % width, true);
            }
        }

        tracing::debug!(
            bytes = data.len(),
            version,
            size = width,
            ec_level = ?ec_level,
            "encoded QR matrix"
        );
        QrMatrix::new(version, modules)
    }
}
