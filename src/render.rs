//! Rasterize layers into transparent RGBA images

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::error::{LayerError, Result};
use crate::models::BitMatrix;

/// Opaque black, used for painted modules
pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Fully transparent white, used for everything else
pub const CLEAR: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Largest image a layer may render to (an 8192x8192 RGBA buffer is 256 MiB)
pub const MAX_IMAGE_PIXELS: u64 = 1 << 26;

/// Pixel scaling and margin for rendered layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Side of one module in pixels
    pub module_pixels: u32,
    /// Transparent margin on each side, in modules
    pub quiet_zone: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_pixels: 10,
            quiet_zone: 4,
        }
    }
}

impl RenderOptions {
    /// Image side length in pixels for a grid of `modules` per side.
    ///
    /// Fails when the image would exceed [`MAX_IMAGE_PIXELS`].
    pub fn image_side(&self, modules: usize) -> Result<u32> {
        if self.module_pixels == 0 {
            return Err(LayerError::InvalidRenderOptions {
                reason: "module size must be at least one pixel".into(),
            });
        }
        let side = u32::try_from(modules)
            .ok()
            .and_then(|m| m.checked_add(self.quiet_zone.checked_mul(2)?))
            .and_then(|m| m.checked_mul(self.module_pixels))
            .filter(|&side| u64::from(side) * u64::from(side) <= MAX_IMAGE_PIXELS);
        side.ok_or_else(|| LayerError::InvalidRenderOptions {
            reason: format!(
                "{modules} modules at {} px with a {}-module border \
                 exceeds {MAX_IMAGE_PIXELS} pixels",
                self.module_pixels, self.quiet_zone
            ),
        })
    }
}

/// Render one layer: set cells become black squares, all other pixels stay transparent.
pub fn render_layer(layer: &BitMatrix, options: &RenderOptions) -> Result<RgbaImage> {
    let side = options.image_side(layer.width())?;
    let side_px = side as usize;
    let scale = options.module_pixels as usize;
    let border_px = options.quiet_zone as usize * scale;
    let modules = layer.width();

    let mut pixels = vec![0u8; side_px * side_px * 4];

    // Process pixel rows in parallel
    pixels.par_chunks_mut(side_px * 4).enumerate().for_each(|(y, row)| {
        let module_row = (y >= border_px)
            .then(|| (y - border_px) / scale)
            .filter(|&r| r < modules);
        for x in 0..side_px {
            let inked = module_row.is_some_and(|r| {
                x >= border_px && {
                    let c = (x - border_px) / scale;
                    c < modules && layer.get(r, c)
                }
            });
            let color = if inked { INK } else { CLEAR };
            row[x * 4..x * 4 + 4].copy_from_slice(&color.0);
        }
    });

    RgbaImage::from_raw(side, side, pixels).ok_or_else(|| LayerError::InvalidRenderOptions {
        reason: format!("pixel buffer does not fit a {side}x{side} image"),
    })
}
