//! Structural module classification
//!
//! Splits a QR grid into the modules a scanner needs to find and sample the
//! symbol (finder, timing, alignment, format, version info, dark module) and
//! everything else (data and error-correction codewords). Positions come from
//! the fixed per-version geometry of the standard; nothing here looks at the
//! encoded content.

/// Per-version coordinate tables
pub mod tables;

use crate::error::Result;
use crate::models::{BitMatrix, Version};
use tables::alignment_pattern_centers;

/// Kinds of structural region, in the order they are marked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// 7x7 finder pattern plus its one-module separator
    Finder,
    /// Alternating row 6 / column 6 between the finders
    Timing,
    /// 5x5 alignment patterns (version 2+)
    Alignment,
    /// Both 15-module format information copies
    Format,
    /// Both 18-module version information blocks (version 7+)
    VersionInfo,
    /// The always-black module beside the bottom-left finder
    DarkModule,
}

impl Region {
    /// All regions in marking order
    pub const ALL: [Region; 6] = [
        Region::Finder,
        Region::Timing,
        Region::Alignment,
        Region::Format,
        Region::VersionInfo,
        Region::DarkModule,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Structural module mask for a specific QR version.
/// true = structural module, false = data/ECC module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralMask {
    mask: BitMatrix,
    version: Version,
    region_counts: [usize; 6],
}

/// Build the structural mask for a raw version number
pub fn classify(version: u8) -> Result<StructuralMask> {
    Ok(StructuralMask::for_version(Version::new(version)?))
}

impl StructuralMask {
    /// Build the mask for a validated version
    pub fn for_version(version: Version) -> Self {
        let size = version.size();
        let mut builder = MaskBuilder {
            mask: BitMatrix::square(size),
            region_counts: [0; 6],
        };

        // Finder patterns + separators (8x8 each)
        builder.mark_block(Region::Finder, 0, 0, 8, 8);
        builder.mark_block(Region::Finder, 0, size - 8, 8, 8);
        builder.mark_block(Region::Finder, size - 8, 0, 8, 8);

        // Timing patterns (row 6 and column 6); finder cells are already taken
        for i in 0..size {
            builder.mark(Region::Timing, 6, i);
            builder.mark(Region::Timing, i, 6);
        }

        for (row, col) in alignment_pattern_centers(version) {
            builder.mark_block(Region::Alignment, row - 2, col - 2, 5, 5);
        }

        // Format info, copy one: around the top-left finder, skipping timing
        for i in 0..9 {
            if i != 6 {
                builder.mark(Region::Format, 8, i);
                builder.mark(Region::Format, i, 8);
            }
        }
        // Format info, copy two: split between top-right and bottom-left
        for i in 0..8 {
            builder.mark(Region::Format, 8, size - 1 - i);
        }
        for i in 0..7 {
            builder.mark(Region::Format, size - 1 - i, 8);
        }

        if version.number() >= 7 {
            builder.mark_block(Region::VersionInfo, 0, size - 11, 6, 3);
            builder.mark_block(Region::VersionInfo, size - 11, 0, 3, 6);
        }

        builder.mark(Region::DarkModule, size - 8, 8);

        tracing::trace!(
            version = version.number(),
            structural = builder.mask.count_ones(),
            "built structural mask"
        );

        Self {
            mask: builder.mask,
            version,
            region_counts: builder.region_counts,
        }
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Version the mask was built for
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether (row, col) is a structural module
    pub fn is_structural(&self, row: usize, col: usize) -> bool {
        self.mask.get(row, col)
    }

    /// Total number of structural modules
    pub fn structural_count(&self) -> usize {
        self.region_counts.iter().sum()
    }

    /// Number of data/ECC modules
    pub fn data_module_count(&self) -> usize {
        self.size() * self.size() - self.structural_count()
    }

    /// Cells first claimed by `region`
    pub fn region_count(&self, region: Region) -> usize {
        self.region_counts[region.index()]
    }

    /// The mask as a bit matrix
    pub fn as_matrix(&self) -> &BitMatrix {
        &self.mask
    }
}

struct MaskBuilder {
    mask: BitMatrix,
    region_counts: [usize; 6],
}

impl MaskBuilder {
    fn mark(&mut self, region: Region, row: usize, col: usize) {
        if !self.mask.get(row, col) {
            self.mask.set(row, col, true);
            self.region_counts[region.index()] += 1;
        }
    }

    fn mark_block(&mut self, region: Region, row: usize, col: usize, height: usize, width: usize) {
        for r in row..row + height {
            for c in col..col + width {
                self.mark(region, r, c);
            }
        }
    }
}
