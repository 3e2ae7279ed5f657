//! Assembly of the global field on the coordinator.
//!
//! Each participant contributes its halo-stripped interior, `width × Gy`
//! values in row-major order. The variable-count gather lays those blocks
//! end to end at displacement `start · Gy`, which is column-band major.
//! The coordinator then re-interleaves the bands so that the result is
//! indexed `y · Gx + x` regardless of how many participants ran.

use heatgrid_comm::Communicator;
use heatgrid_core::{CommError, Decomposition, Rank};

/// The assembled `Gx × Gy` interior, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalField {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl GlobalField {
    /// Wrap a row-major buffer of `width × height` values.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height`.
    pub fn from_row_major(width: usize, height: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), width * height, "GlobalField size mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Interior cell `(x, y)`, zero-based.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of range.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of range");
        self.data[y * self.width + x]
    }

    /// Row `y`, zero-based.
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// All values, `data[y · width + x]`.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume into the row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// Re-interleave column bands produced by the variable-count gather.
///
/// `blocks` holds, for each partition in order, `width_i × height`
/// row-major values starting at `start_i · height`.
pub fn interleave(decomposition: &Decomposition, height: usize, blocks: &[f64]) -> GlobalField {
    let gx = decomposition.grid_x();
    let mut data = vec![0.0; gx * height];
    for part in decomposition.partitions() {
        let (start, width) = (part.start(), part.width());
        if width == 0 {
            continue;
        }
        let band = &blocks[start * height..(start + width) * height];
        for (y, row) in band.chunks_exact(width).enumerate() {
            let dst = y * gx + start;
            data[dst..dst + width].copy_from_slice(row);
        }
    }
    GlobalField::from_row_major(gx, height, data)
}

/// Collect every participant's interior on [`Rank::ROOT`].
///
/// Returns `Some` on the coordinator and `None` on every other rank.
pub fn gather_field<C: Communicator + ?Sized>(
    comm: &C,
    decomposition: &Decomposition,
    height: usize,
    local: &[f64],
) -> Result<Option<GlobalField>, CommError> {
    let counts = decomposition.gather_counts(height);
    let displs = decomposition.gather_displacements(height);
    let blocks = comm.gather_varcount(local, &counts, &displs, Rank::ROOT)?;
    Ok(blocks.map(|b| interleave(decomposition, height, &b)))
}
