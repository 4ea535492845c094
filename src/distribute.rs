//! Threshold distribution of black data modules across layers
//!
//! Every structural module is copied verbatim to all `n` layers, so each
//! layer on its own still shows the finder, timing and alignment skeleton.
//! White data modules stay transparent everywhere. Each black data module is
//! painted on a uniformly random set `S` of exactly `n - k + 1` layers, drawn
//! independently per module.
//!
//! # Reconstruction guarantee
//!
//! Take any set `L` of stacked layers with `|L| >= k`. Then
//! `|L| + |S| >= k + (n - k + 1) = n + 1 > n`, so `L` and `S` cannot be
//! disjoint subsets of the `n` layers: some layer in `L` paints the module.
//! This holds for every module and every such `L`, with no probability
//! involved. Stacking `k` or more layers reproduces the QR code exactly.
//!
//! # Below the threshold
//!
//! This is not a secret-sharing scheme in the cryptographic sense. Someone
//! holding `k - 1` layers sees every black data module whose `S` happens to
//! intersect their layers and misses the rest. How much of the payload that
//! leaks depends on `k`, `n` and the error-correction slack of the symbol;
//! there is no bound on it, and nothing here claims one.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{LayerError, Result};
use crate::geometry::StructuralMask;
use crate::models::{BitMatrix, DistributionStats, LayerSet, QrMatrix, ThresholdParams};

/// Distribute `matrix` over `n` layers so that any `k` reconstruct it.
///
/// `k` and `n` are checked before any randomness is drawn or any layer is
/// allocated.
pub fn distribute<R: Rng + ?Sized>(
    matrix: &QrMatrix,
    mask: &StructuralMask,
    k: usize,
    n: usize,
    rng: &mut R,
) -> Result<LayerSet> {
    let params = ThresholdParams::new(k, n)?;
    distribute_with(matrix, mask, params, rng)
}

/// Sequential distribution with pre-validated parameters
pub fn distribute_with<R: Rng + ?Sized>(
    matrix: &QrMatrix,
    mask: &StructuralMask,
    params: ThresholdParams,
    rng: &mut R,
) -> Result<LayerSet> {
    check_mask(matrix, mask)?;
    let size = matrix.size();
    let mut layers = vec![BitMatrix::square(size); params.total()];
    let mut stats = DistributionStats::default();

    for row in 0..size {
        let row_stats = distribute_row(matrix, mask, params, row, &mut layers, rng);
        stats.merge(&row_stats);
    }

    log_stats(params, &stats);
    Ok(LayerSet::new(layers, params, stats))
}

/// Row-parallel distribution.
///
/// One seed per row is drawn from `rng` up front, in row order; each row then
/// runs on the rayon pool with its own generator. The output depends only on
/// the state of `rng`, not on how rows are scheduled.
pub fn distribute_par<R: Rng + ?Sized>(
    matrix: &QrMatrix,
    mask: &StructuralMask,
    params: ThresholdParams,
    rng: &mut R,
) -> Result<LayerSet> {
    check_mask(matrix, mask)?;
    let size = matrix.size();
    let seeds: Vec<u64> = (0..size).map(|_| rng.r#gen()).collect();

    // Each row yields its own n single-row strips, merged afterwards
    let rows: Vec<(Vec<BitMatrix>, DistributionStats)> = seeds
        .par_iter()
        .enumerate()
        .map(|(row, &seed)| {
            let mut row_rng = StdRng::seed_from_u64(seed);
            let mut strips = vec![BitMatrix::new(size, 1); params.total()];
            let stats = distribute_row_into(matrix, mask, params, row, &mut row_rng, |layer, col| {
                strips[layer].set(0, col, true);
            });
            (strips, stats)
        })
        .collect();

    let mut layers = vec![BitMatrix::square(size); params.total()];
    let mut stats = DistributionStats::default();
    for (row, (strips, row_stats)) in rows.into_iter().enumerate() {
        for (layer, strip) in layers.iter_mut().zip(&strips) {
            for (_, col) in strip.iter_ones() {
                layer.set(row, col, true);
            }
        }
        stats.merge(&row_stats);
    }

    log_stats(params, &stats);
    Ok(LayerSet::new(layers, params, stats))
}

fn check_mask(matrix: &QrMatrix, mask: &StructuralMask) -> Result<()> {
    if mask.version() != matrix.version() {
        return Err(LayerError::VersionSizeMismatch {
            version: matrix.version().number(),
            expected: matrix.size(),
            actual: mask.size(),
        });
    }
    Ok(())
}

fn distribute_row<R: Rng + ?Sized>(
    matrix: &QrMatrix,
    mask: &StructuralMask,
    params: ThresholdParams,
    row: usize,
    layers: &mut [BitMatrix],
    rng: &mut R,
) -> DistributionStats {
    distribute_row_into(matrix, mask, params, row, rng, |layer, col| {
        layers[layer].set(row, col, true);
    })
}

fn distribute_row_into<R, F>(
    matrix: &QrMatrix,
    mask: &StructuralMask,
    params: ThresholdParams,
    row: usize,
    rng: &mut R,
    mut paint: F,
) -> DistributionStats
where
    R: Rng + ?Sized,
    F: FnMut(usize, usize),
{
    let mut stats = DistributionStats::default();
    let n = params.total();
    let copies = params.copies_per_module();

    for col in 0..matrix.size() {
        let black = matrix.is_black(row, col);
        if mask.is_structural(row, col) {
            if black {
                stats.structural_black += 1;
                (0..n).for_each(|layer| paint(layer, col));
            } else {
                stats.structural_white += 1;
            }
        } else if black {
            stats.data_black += 1;
            for layer in index::sample(rng, n, copies) {
                paint(layer, col);
            }
        } else {
            stats.data_white += 1;
        }
    }
    stats
}

fn log_stats(params: ThresholdParams, stats: &DistributionStats) {
    tracing::debug!(
        k = params.required(),
        n = params.total(),
        copies = params.copies_per_module(),
        structural_black = stats.structural_black,
        structural_white = stats.structural_white,
        data_black = stats.data_black,
        data_white = stats.data_white,
        "distributed modules"
    );
}
