use super::{BitMatrix, ThresholdParams};
use crate::error::{LayerError, Result};

/// Module tallies from one distribution run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistributionStats {
    /// Structural modules that are black (painted on every layer)
    pub structural_black: usize,
    /// Structural modules that are white
    pub structural_white: usize,
    /// Data/ECC modules that are black (painted on `n - k + 1` layers)
    pub data_black: usize,
    /// Data/ECC modules that are white
    pub data_white: usize,
}

impl DistributionStats {
    pub(crate) fn merge(&mut self, other: &DistributionStats) {
        self.structural_black += other.structural_black;
        self.structural_white += other.structural_white;
        self.data_black += other.data_black;
        self.data_white += other.data_white;
    }
}

/// The `n` output layers of one distribution run
#[derive(Debug, Clone)]
pub struct LayerSet {
    layers: Vec<BitMatrix>,
    params: ThresholdParams,
    stats: DistributionStats,
}

impl LayerSet {
    pub(crate) fn new(
        layers: Vec<BitMatrix>,
        params: ThresholdParams,
        stats: DistributionStats,
    ) -> Self {
        debug_assert_eq!(layers.len(), params.total());
        Self {
            layers,
            params,
            stats,
        }
    }

    /// Number of layers (`n`)
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false for a set built by the distributor (`n >= 1`)
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Side length of each layer in modules
    pub fn size(&self) -> usize {
        self.layers.first().map_or(0, BitMatrix::width)
    }

    /// Parameters the set was produced with
    pub fn params(&self) -> ThresholdParams {
        self.params
    }

    /// Module tallies of the run
    pub fn stats(&self) -> DistributionStats {
        self.stats
    }

    /// Layer `index` (0-based)
    pub fn get(&self, index: usize) -> Option<&BitMatrix> {
        self.layers.get(index)
    }

    /// Iterate over the layers in order
    pub fn iter(&self) -> std::slice::Iter<'_, BitMatrix> {
        self.layers.iter()
    }

    /// Overlay the named layers: a module is black if it is black on any of them.
    ///
    /// Duplicate indices are harmless. Stacking no layers gives an all-white grid.
    pub fn stack(&self, indices: &[usize]) -> Result<BitMatrix> {
        let size = self.size();
        let mut stacked = BitMatrix::square(size);
        for &index in indices {
            let layer = self
                .layers
                .get(index)
                .ok_or(LayerError::LayerIndexOutOfRange {
                    index,
                    layers: self.layers.len(),
                })?;
            stacked.or_assign(layer);
        }
        Ok(stacked)
    }

    /// How many layers paint the module at (row, col) black
    pub fn coverage(&self, row: usize, col: usize) -> usize {
        self.layers.iter().filter(|l| l.get(row, col)).count()
    }

    /// Consume the set, returning the raw layers
    pub fn into_layers(self) -> Vec<BitMatrix> {
        self.layers
    }
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a BitMatrix;
    type IntoIter = std::slice::Iter<'a, BitMatrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
