use crate::error::{LayerError, Result};

/// Threshold parameters of a (k, n) scheme: `n` layers, any `k` reconstruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThresholdParams {
    k: usize,
    n: usize,
}

impl ThresholdParams {
    /// Validate `1 <= k <= n`
    pub fn new(k: usize, n: usize) -> Result<Self> {
        if k < 1 || k > n {
            return Err(LayerError::InvalidThreshold { k, n });
        }
        Ok(Self { k, n })
    }

    /// Layers required to reconstruct
    pub fn required(&self) -> usize {
        self.k
    }

    /// Total layers produced
    pub fn total(&self) -> usize {
        self.n
    }

    /// How many layers each black data module is painted on: `n - k + 1`.
    ///
    /// This is the smallest count for which every `k`-subset of layers is
    /// guaranteed to hit the module.
    pub fn copies_per_module(&self) -> usize {
        self.n - self.k + 1
    }
}
