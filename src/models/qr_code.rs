use std::fmt;
use std::str::FromStr;

use super::BitMatrix;
use crate::error::{LayerError, Result};

/// QR Code version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest version
    pub const MIN: Version = Version(1);
    /// Largest version
    pub const MAX: Version = Version(40);

    /// Validate a version number
    pub fn new(number: u8) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&number) {
            Ok(Self(number))
        } else {
            Err(LayerError::InvalidVersion { version: number })
        }
    }

    /// Recover the version from a matrix side length (21, 25, ..., 177)
    pub fn from_size(size: usize) -> Option<Self> {
        if size < 21 || (size - 17) % 4 != 0 {
            return None;
        }
        let number = (size - 17) / 4;
        u8::try_from(number).ok().and_then(|n| Self::new(n).ok())
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }

    /// All versions in ascending order
    pub fn all() -> impl Iterator<Item = Version> {
        (Self::MIN.0..=Self::MAX.0).map(Version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    #[default]
    L = 0,
    /// Medium (~15% recovery capacity)
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    pub(crate) fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            ECLevel::L => qrcode::EcLevel::L,
            ECLevel::M => qrcode::EcLevel::M,
            ECLevel::Q => qrcode::EcLevel::Q,
            ECLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for ECLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(ECLevel::L),
            "M" | "MEDIUM" => Ok(ECLevel::M),
            "Q" | "QUARTILE" => Ok(ECLevel::Q),
            "H" | "HIGH" => Ok(ECLevel::H),
            other => Err(format!(
                "unknown error correction level '{other}' (expected L, M, Q or H)"
            )),
        }
    }
}

/// A finished QR symbol: the module grid plus the version it was built for.
///
/// The side length always equals `4 * version + 17`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    version: Version,
    modules: BitMatrix,
}

impl QrMatrix {
    /// Wrap a module grid, checking that its size agrees with `version`
    pub fn new(version: u8, modules: BitMatrix) -> Result<Self> {
        let version = Version::new(version)?;
        let expected = version.size();
        if modules.width() != expected || modules.height() != expected {
            return Err(LayerError::VersionSizeMismatch {
                version: version.number(),
                expected,
                actual: modules.width().max(modules.height()),
            });
        }
        Ok(Self { version, modules })
    }

    /// QR code version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.modules.width()
    }

    /// Whether the module at (row, col) is black
    pub fn is_black(&self, row: usize, col: usize) -> bool {
        self.modules.get(row, col)
    }

    /// Module matrix (true = black, false = white)
    pub fn modules(&self) -> &BitMatrix {
        &self.modules
    }
}
