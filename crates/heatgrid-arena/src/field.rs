//! Single halo-padded local field.

use heatgrid_core::{GlobalGrid, Partition};

/// Flat offset of padded cell `(x, y)` in a row-major buffer.
///
/// Ghost columns live at `x = 0` and `x = stride - 1`; fixed boundary rows
/// at `y = 0` and the last row.
#[inline]
pub fn index(x: usize, y: usize, stride: usize) -> usize {
    y * stride + x
}

/// Interior dimensions of one participant's sub-grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalShape {
    local_x: usize,
    local_y: usize,
}

impl LocalShape {
    /// Shape with `local_x × local_y` interior cells.
    pub fn new(local_x: usize, local_y: usize) -> Self {
        Self { local_x, local_y }
    }

    /// Shape of the sub-grid owned by `partition`.
    pub fn for_partition(grid: &GlobalGrid, partition: &Partition) -> Self {
        Self::new(partition.width(), grid.height())
    }

    /// Interior columns.
    pub fn local_x(&self) -> usize {
        self.local_x
    }

    /// Interior rows.
    pub fn local_y(&self) -> usize {
        self.local_y
    }

    /// Row length including both ghost columns.
    pub fn stride(&self) -> usize {
        self.local_x + 2
    }

    /// Row count including both boundary rows.
    pub fn padded_rows(&self) -> usize {
        self.local_y + 2
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.stride() * self.padded_rows()
    }

    /// Always `false`: even a zero-width shape keeps its ghost cells.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Interior cell count.
    pub fn interior_len(&self) -> usize {
        self.local_x * self.local_y
    }

    /// Flat offset of padded cell `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        index(x, y, self.stride())
    }

    /// X index of the right ghost column.
    pub fn right_ghost(&self) -> usize {
        self.local_x + 1
    }

    /// Y index of the top boundary row.
    pub fn top_row(&self) -> usize {
        self.local_y + 1
    }
}

/// One halo-padded buffer of `f64` cells.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalField {
    shape: LocalShape,
    data: Vec<f64>,
}

impl LocalField {
    /// Zero-filled field of the given shape.
    pub fn zeros(shape: LocalShape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.len()],
        }
    }

    /// Shape of this field.
    pub fn shape(&self) -> LocalShape {
        self.shape
    }

    /// Value at padded cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the padded buffer.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.shape.index(x, y)]
    }

    /// Overwrite padded cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the padded buffer.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let i = self.shape.index(x, y);
        self.data[i] = value;
    }

    /// Whole padded buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Whole padded buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Column `x` over the interior rows `1..=local_y`, copied out.
    pub fn column(&self, x: usize) -> Vec<f64> {
        (1..=self.shape.local_y())
            .map(|y| self.get(x, y))
            .collect()
    }

    /// Halo-stripped interior in row-major (y-major, x-minor) order.
    pub fn interior(&self) -> Vec<f64> {
        let lx = self.shape.local_x();
        let mut out = Vec::with_capacity(self.shape.interior_len());
        for y in 1..=self.shape.local_y() {
            let row = self.shape.index(1, y);
            out.extend_from_slice(&self.data[row..row + lx]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn index_places_ghosts_at_edges() {
        let s = LocalShape::new(3, 2);
        assert_eq!(s.stride(), 5);
        assert_eq!(s.len(), 20);
        assert_eq!(s.index(0, 0), 0);
        assert_eq!(s.index(4, 0), 4);
        assert_eq!(s.index(0, 1), 5);
        assert_eq!(s.index(s.right_ghost(), s.top_row()), 19);
    }

    #[test]
    fn zero_width_shape_keeps_ghosts() {
        let s = LocalShape::new(0, 4);
        assert_eq!(s.stride(), 2);
        assert_eq!(s.len(), 12);
        assert_eq!(s.interior_len(), 0);
        assert_eq!(s.right_ghost(), 1);
        assert!(LocalField::zeros(s).interior().is_empty());
    }

    #[test]
    fn interior_strips_halo_row_major() {
        let s = LocalShape::new(2, 2);
        let mut f = LocalField::zeros(s);
        for y in 0..s.padded_rows() {
            for x in 0..s.stride() {
                f.set(x, y, (10 * y + x) as f64);
            }
        }
        assert_eq!(f.interior(), vec![11.0, 12.0, 21.0, 22.0]);
        assert_eq!(f.column(0), vec![10.0, 20.0]);
        assert_eq!(f.column(3), vec![13.0, 23.0]);
    }

    proptest! {
        #[test]
        fn index_is_a_bijection_onto_the_buffer(lx in 0usize..12, ly in 1usize..12) {
            let s = LocalShape::new(lx, ly);
            let mut seen = vec![false; s.len()];
            for y in 0..s.padded_rows() {
                for x in 0..s.stride() {
                    let i = s.index(x, y);
                    prop_assert!(i < s.len());
                    prop_assert!(!seen[i]);
                    seen[i] = true;
                }
            }
            prop_assert!(seen.into_iter().all(|b| b));
            prop_assert_eq!(LocalField::zeros(s).interior().len(), s.interior_len());
        }
    }
}
