//! Ghost-column exchange between X neighbours.
//!
//! Each participant owns a contiguous band of columns. Before every step
//! its left ghost column (x = 0) must hold the last interior column of the
//! left neighbour, and its right ghost column (x = local_x + 1) the first
//! interior column of the right neighbour. Columns are strided in the
//! row-major buffer, so every transfer is described by a
//! [`StridedLayout`] over rows `1..=local_y`.

use heatgrid_arena::{FieldPair, LocalShape};
use heatgrid_comm::{Communicator, RequestList, StridedLayout};
use heatgrid_core::{CommError, Rank, Tag};

/// Neighbour topology and column layouts of one participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaloExchange {
    left: Option<Rank>,
    right: Option<Rank>,
    /// Ghost column x = 0.
    left_ghost: StridedLayout,
    /// Interior column x = 1.
    left_edge: StridedLayout,
    /// Interior column x = local_x.
    right_edge: StridedLayout,
    /// Ghost column x = local_x + 1.
    right_ghost: StridedLayout,
    relay: bool,
}

impl HaloExchange {
    /// Topology for `rank` in a world of `size` with the given local shape.
    pub fn new(rank: Rank, size: usize, shape: LocalShape) -> Self {
        let column = |x: usize| StridedLayout::new(shape.index(x, 1), shape.local_y(), shape.stride());
        Self {
            left: rank.left(),
            right: rank.right(size),
            left_ghost: column(0),
            left_edge: column(1),
            right_edge: column(shape.local_x()),
            right_ghost: column(shape.right_ghost()),
            relay: shape.local_x() == 0,
        }
    }

    /// Left neighbour, if any.
    pub fn left(&self) -> Option<Rank> {
        self.left
    }

    /// Right neighbour, if any.
    pub fn right(&self) -> Option<Rank> {
        self.right
    }

    /// Whether this participant owns no columns and only forwards halos.
    pub fn is_relay(&self) -> bool {
        self.relay
    }

    /// Fill both ghost columns of `fields.current()` from the neighbours.
    ///
    /// Returns once every posted transfer has completed.
    pub fn exchange<C: Communicator + ?Sized>(
        &self,
        comm: &C,
        fields: &mut FieldPair,
    ) -> Result<(), CommError> {
        if self.relay {
            return self.forward(comm, fields);
        }

        let buf = fields.current_mut().as_mut_slice();
        let mut requests = RequestList::new();
        if let Some(left) = self.left {
            requests.push(comm.irecv(self.left_ghost, left, Tag::HALO)?);
        }
        if let Some(right) = self.right {
            requests.push(comm.irecv(self.right_ghost, right, Tag::HALO)?);
        }
        if let Some(left) = self.left {
            requests.push(comm.isend(buf, &self.left_edge, left, Tag::HALO)?);
        }
        if let Some(right) = self.right {
            requests.push(comm.isend(buf, &self.right_edge, right, Tag::HALO)?);
        }
        comm.wait_all(&mut requests, buf)
    }

    /// Zero-width participant: pass the left halo on to the right, then
    /// the right halo on to the left.
    ///
    /// With no interior, ghost column 0 doubles as "column local_x" and
    /// ghost column 1 as "column 1". Rightward traffic is resolved before
    /// leftward so chains of zero-width participants cannot deadlock.
    fn forward<C: Communicator + ?Sized>(
        &self,
        comm: &C,
        fields: &mut FieldPair,
    ) -> Result<(), CommError> {
        let buf = fields.current_mut().as_mut_slice();
        let mut requests = RequestList::new();

        if let Some(left) = self.left {
            requests.push(comm.irecv(self.left_ghost, left, Tag::HALO)?);
            comm.wait_all(&mut requests, buf)?;
        }
        if let Some(right) = self.right {
            requests.push(comm.isend(buf, &self.left_ghost, right, Tag::HALO)?);
            requests.push(comm.irecv(self.right_ghost, right, Tag::HALO)?);
            comm.wait_all(&mut requests, buf)?;
        }
        if let Some(left) = self.left {
            requests.push(comm.isend(buf, &self.right_ghost, left, Tag::HALO)?);
            comm.wait_all(&mut requests, buf)?;
        }
        Ok(())
    }
}
