/// Compact bit matrix addressed as (row, col)
///
/// Used for the QR module grid, the structural mask and every output layer.
/// `true` means black (or "structural" for a mask).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new all-false matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Create a square all-false matrix
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Build a matrix from row slices. Rows shorter than the first are padded with `false`.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut matrix = Self::new(width, height);
        for (row, cells) in rows.iter().enumerate() {
            for (col, &value) in cells.as_ref().iter().enumerate().take(width) {
                matrix.set(row, col, value);
            }
        }
        matrix
    }

    /// Get matrix width (columns)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height (rows)
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (row, col)
    pub fn get(&self, row: usize, col: usize) -> bool {
        if col >= self.width || row >= self.height {
            return false;
        }
        let index = row * self.width + col;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set bit at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        if col >= self.width || row >= self.height {
            return;
        }
        let index = row * self.width + col;
        let bit = 1 << (index % 8);
        if value {
            self.data[index / 8] |= bit;
        } else {
            self.data[index / 8] &= !bit;
        }
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        // Padding bits in the last byte are never set.
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// OR another matrix of the same dimensions into this one.
    ///
    /// This is what physically stacking two transparent layers does.
    pub fn or_assign(&mut self, other: &BitMatrix) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (dst, src) in self.data.iter_mut().zip(&other.data) {
            *dst |= *src;
        }
    }

    /// Iterate over the set cells as (row, col), row-major
    pub fn iter_ones(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |col| (row, col)))
            .filter(move |&(row, col)| self.get(row, col))
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
