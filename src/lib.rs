//! layered_qr - split a QR code into stackable transparent layers
//!
//! Produces `n` PNG layers from one QR code such that laying any `k` of them
//! on top of each other shows the original code, a (k, n) threshold scheme
//! on the module grid. Finder, timing, alignment, format and version modules
//! are printed on every layer so each sheet still looks like a QR frame;
//! each black data module goes to a random `n - k + 1` of the layers.
//!
//! Reconstruction from `k` layers is exact. Secrecy below `k` is best-effort
//! only: fewer layers still show part of the data modules. See
//! [`distribute`](mod@distribute) for the argument and its limits.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Generator configuration and environment overrides
pub mod config;
/// Threshold distribution of modules across layers
pub mod distribute;
/// QR encoding adapter
pub mod encode;
/// Error types
pub mod error;
/// Structural module classification (finder/timing/alignment/format/version)
pub mod geometry;
/// Core data structures (BitMatrix, QrMatrix, LayerSet, etc.)
pub mod models;
/// PNG emission of layer sets
pub mod output;
/// Layer rasterization
pub mod render;

pub use config::GeneratorConfig;
pub use distribute::{distribute, distribute_par, distribute_with};
pub use error::{LayerError, Result};
pub use geometry::{Region, StructuralMask, classify};
pub use models::{
    BitMatrix, DistributionStats, ECLevel, LayerSet, QrMatrix, ThresholdParams, Version,
};
pub use render::{RenderOptions, render_layer};

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Output of one pipeline run
#[derive(Debug, Clone)]
pub struct GeneratedLayers {
    /// The encoded QR symbol
    pub matrix: QrMatrix,
    /// Structural mask for its version
    pub mask: StructuralMask,
    /// The `n` layers
    pub layers: LayerSet,
}

/// Encode -> classify -> distribute, driven by a [`GeneratorConfig`]
#[derive(Debug, Clone, Default)]
pub struct LayerGenerator {
    config: GeneratorConfig,
}

impl LayerGenerator {
    /// Create a generator with the given configuration
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate layers using the configured seed, or fresh entropy if none is set
    pub fn generate(&self, data: &[u8], params: ThresholdParams) -> Result<GeneratedLayers> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with_rng(data, params, &mut rng)
    }

    /// Generate layers drawing all randomness from `rng`
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        data: &[u8],
        params: ThresholdParams,
        rng: &mut R,
    ) -> Result<GeneratedLayers> {
        let matrix = QrMatrix::encode(data, self.config.ec_level)?;
        let mask = StructuralMask::for_version(matrix.version());
        tracing::info!(
            version = matrix.version().number(),
            size = matrix.size(),
            k = params.required(),
            n = params.total(),
            copies = params.copies_per_module(),
            "splitting QR code into layers"
        );

        let layers = if self.config.parallel {
            distribute_par(&matrix, &mask, params, rng)?
        } else {
            distribute_with(&matrix, &mask, params, rng)?
        };

        let stats = layers.stats();
        tracing::info!(
            structural = stats.structural_black + stats.structural_white,
            data = stats.data_black + stats.data_white,
            data_black = stats.data_black,
            "processed modules"
        );

        Ok(GeneratedLayers {
            matrix,
            mask,
            layers,
        })
    }

    /// Write the layers into the configured directory
    pub fn write(&self, generated: &GeneratedLayers) -> Result<Vec<PathBuf>> {
        output::write_layers(
            &generated.layers,
            &self.config.output_dir,
            &self.config.prefix,
            &self.config.render,
        )
    }
}
