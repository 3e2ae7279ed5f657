//! Strided ("vector") transfer descriptors.

use heatgrid_core::CommError;

/// `count` single elements spaced `stride` apart, starting at `offset`.
///
/// This is the transport's equivalent of an MPI vector datatype with a
/// block length of one. A halo column of a row-major buffer is
/// `StridedLayout::new(index(x, 1), local_y, row_stride)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StridedLayout {
    offset: usize,
    count: usize,
    stride: usize,
}

impl StridedLayout {
    /// Layout of `count` elements `stride` apart starting at `offset`.
    ///
    /// A `stride` of zero is treated as one.
    pub fn new(offset: usize, count: usize, stride: usize) -> Self {
        Self {
            offset,
            count,
            stride: stride.max(1),
        }
    }

    /// Layout of `count` consecutive elements starting at `offset`.
    pub fn contiguous(offset: usize, count: usize) -> Self {
        Self::new(offset, count, 1)
    }

    /// First element index.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of elements transferred.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Distance between consecutive elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Minimum buffer length the layout can address.
    pub fn required_len(&self) -> usize {
        match self.count {
            0 => 0,
            n => self.offset + (n - 1) * self.stride + 1,
        }
    }

    /// Fail unless the layout fits in a buffer of `len` elements.
    pub fn check(&self, len: usize) -> Result<(), CommError> {
        let required = self.required_len();
        if required > len {
            return Err(CommError::LayoutOutOfBounds { required, len });
        }
        Ok(())
    }

    /// Element indices addressed by the layout, in transfer order.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        let (offset, stride) = (self.offset, self.stride);
        (0..self.count).map(move |i| offset + i * stride)
    }

    /// Copy the addressed elements of `buf` into a dense payload.
    pub fn pack(&self, buf: &[f64]) -> Result<Vec<f64>, CommError> {
        self.check(buf.len())?;
        Ok(self.indices().map(|i| buf[i]).collect())
    }

    /// Scatter a dense payload into the addressed elements of `buf`.
    ///
    /// The caller is responsible for checking `payload.len() == count`;
    /// extra payload elements are ignored.
    pub fn unpack(&self, payload: &[f64], buf: &mut [f64]) -> Result<(), CommError> {
        self.check(buf.len())?;
        for (i, &v) in self.indices().zip(payload) {
            buf[i] = v;
        }
        Ok(())
    }
}
