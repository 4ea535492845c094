use crate::models::Version;

// Alignment pattern center coordinates (ISO/IEC 18004 Annex E).
// Index: [version]. Every (row, col) pair drawn from one row is a center,
// except the three that land on finder patterns.
const ALIGNMENT_PATTERN_POSITIONS: [&[usize]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

/// Alignment pattern center coordinates for a version (empty for version 1)
pub fn alignment_pattern_positions(version: Version) -> &'static [usize] {
    ALIGNMENT_PATTERN_POSITIONS[version.number() as usize]
}

/// Alignment pattern centers as (row, col), finder corners excluded
pub fn alignment_pattern_centers(version: Version) -> Vec<(usize, usize)> {
    let coords = alignment_pattern_positions(version);
    let Some((&first, &last)) = coords.first().zip(coords.last()) else {
        return Vec::new();
    };
    let mut centers = Vec::with_capacity(coords.len() * coords.len());
    for &row in coords {
        for &col in coords {
            let on_finder = (row == first && col == first)
                || (row == first && col == last)
                || (row == last && col == first);
            if !on_finder {
                centers.push((row, col));
            }
        }
    }
    centers
}
