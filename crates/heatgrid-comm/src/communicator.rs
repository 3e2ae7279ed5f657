//! The [`Communicator`] trait and request bookkeeping.

use std::ops::Deref;

use heatgrid_core::{CommError, Rank, Tag};
use smallvec::SmallVec;

use crate::layout::StridedLayout;

/// Direction of a posted transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// Outgoing transfer.
    Send,
    /// Incoming transfer into the layout's cells.
    Recv,
}

/// Handle for a posted non-blocking transfer.
///
/// Completed by [`Communicator::wait_all`]. Receive requests remember the
/// layout their payload lands in, so posting a receive needs no borrow of
/// the destination buffer.
#[must_use = "posted transfers complete only through wait_all"]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    kind: RequestKind,
    peer: Rank,
    tag: Tag,
    layout: StridedLayout,
}

impl Request {
    /// A send request to `peer`.
    pub fn send(peer: Rank, tag: Tag, layout: StridedLayout) -> Self {
        Self {
            kind: RequestKind::Send,
            peer,
            tag,
            layout,
        }
    }

    /// A receive request from `peer`.
    pub fn recv(peer: Rank, tag: Tag, layout: StridedLayout) -> Self {
        Self {
            kind: RequestKind::Recv,
            peer,
            tag,
            layout,
        }
    }

    /// Send or receive.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The other end of the transfer.
    pub fn peer(&self) -> Rank {
        self.peer
    }

    /// Matching tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Cells read (send) or written (receive).
    pub fn layout(&self) -> &StridedLayout {
        &self.layout
    }
}

/// Requests posted in one exchange round. A halo exchange posts at most four.
pub type RequestList = SmallVec<[Request; 4]>;

/// Message-passing capability for one participant.
///
/// Every method that moves data can fail with a [`CommError`]; callers
/// treat any failure as fatal and abort the run.
pub trait Communicator {
    /// This participant's rank.
    fn rank(&self) -> Rank;

    /// Number of participants in the world.
    fn size(&self) -> usize;

    /// Post a non-blocking send of the cells of `buf` addressed by `layout`.
    fn isend(
        &self,
        buf: &[f64],
        layout: &StridedLayout,
        dest: Rank,
        tag: Tag,
    ) -> Result<Request, CommError>;

    /// Post a non-blocking receive whose payload lands in `layout`.
    ///
    /// The destination buffer is supplied to [`wait_all`](Self::wait_all).
    fn irecv(&self, layout: StridedLayout, source: Rank, tag: Tag) -> Result<Request, CommError>;

    /// Block until every request in `requests` has completed, writing
    /// received payloads into `buf`. Drains `requests`.
    fn wait_all(&self, requests: &mut RequestList, buf: &mut [f64]) -> Result<(), CommError>;

    /// Variable-count gather to `root`.
    ///
    /// Rank `i` contributes `counts[i]` elements placed at `displs[i]` of
    /// the assembled buffer. Returns `Some(buffer)` on `root`, `None`
    /// elsewhere.
    fn gather_varcount(
        &self,
        local: &[f64],
        counts: &[usize],
        displs: &[usize],
        root: Rank,
    ) -> Result<Option<Vec<f64>>, CommError>;

    /// Maximum of `local` over all participants, returned on every rank.
    ///
    /// NaN on any rank makes the result NaN.
    fn all_reduce_max(&self, local: f64) -> Result<f64, CommError>;

    /// Block until every participant has entered the barrier.
    fn barrier(&self) -> Result<(), CommError>;

    /// Seconds since a fixed, world-wide epoch.
    fn wtime(&self) -> f64;

    /// Tell every other participant to stop. Best-effort, never fails.
    fn abort(&self);
}

impl<C: Communicator + ?Sized> Communicator for &C {
    fn rank(&self) -> Rank {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn isend(
        &self,
        buf: &[f64],
        layout: &StridedLayout,
        dest: Rank,
        tag: Tag,
    ) -> Result<Request, CommError> {
        (**self).isend(buf, layout, dest, tag)
    }

    fn irecv(&self, layout: StridedLayout, source: Rank, tag: Tag) -> Result<Request, CommError> {
        (**self).irecv(layout, source, tag)
    }

    fn wait_all(&self, requests: &mut RequestList, buf: &mut [f64]) -> Result<(), CommError> {
        (**self).wait_all(requests, buf)
    }

    fn gather_varcount(
        &self,
        local: &[f64],
        counts: &[usize],
        displs: &[usize],
        root: Rank,
    ) -> Result<Option<Vec<f64>>, CommError> {
        (**self).gather_varcount(local, counts, displs, root)
    }

    fn all_reduce_max(&self, local: f64) -> Result<f64, CommError> {
        (**self).all_reduce_max(local)
    }

    fn barrier(&self) -> Result<(), CommError> {
        (**self).barrier()
    }

    fn wtime(&self) -> f64 {
        (**self).wtime()
    }

    fn abort(&self) {
        (**self).abort()
    }
}

// ── AbortOnDrop ────────────────────────────────────────────────────

/// Holds a communicator and calls [`Communicator::abort`] on it when
/// dropped, unless disarmed.
///
/// Wrap a participant's endpoint in one before handing it to the thread
/// that runs the participant. An early return, a panic, or a thread that
/// never started all drop the guard armed, which wakes peers blocked in a
/// receive instead of leaving them hanging.
pub struct AbortOnDrop<C: Communicator> {
    comm: C,
    armed: bool,
}

impl<C: Communicator> AbortOnDrop<C> {
    /// Arm a guard around `comm`.
    pub fn new(comm: C) -> Self {
        Self { comm, armed: true }
    }

    /// The participant finished cleanly; do not abort on drop.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Whether dropping the guard will abort the run.
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl<C: Communicator> Deref for AbortOnDrop<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.comm
    }
}

impl<C: Communicator> Drop for AbortOnDrop<C> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(rank = %self.comm.rank(), "participant failed; aborting run");
            self.comm.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accessors() {
        let l = StridedLayout::new(3, 4, 5);
        let r = Request::recv(Rank(1), Tag::HALO, l);
        assert_eq!(r.kind(), RequestKind::Recv);
        assert_eq!(r.peer(), Rank(1));
        assert_eq!(r.tag(), Tag::HALO);
        assert_eq!(r.layout(), &l);
    }
}
