//! In-process message-passing world over `crossbeam-channel`.
//!
//! [`local_world`] wires up `size` endpoints, each with one inbox and a
//! sender into every inbox. Endpoints are `Send` but not `Sync`: move each
//! one onto the thread that plays its rank.
//!
//! Sends are eager: the payload is packed and enqueued immediately, so a
//! send request is already complete when it is returned. Receives pull
//! from the inbox until an envelope with the wanted `(source, tag)`
//! arrives; envelopes for other pairs are stashed in arrival order. Each
//! sender enqueues in program order and channels are FIFO, so messages
//! between one pair never overtake each other.
//!
//! Collectives (gather, max-reduction, barrier) are built on the same
//! queues with reserved tags and a flat fan-in/fan-out through rank 0.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use heatgrid_core::{nan_max, CommError, Rank, Tag};
use indexmap::IndexMap;

use crate::communicator::{Communicator, Request, RequestKind, RequestList};
use crate::layout::StridedLayout;

/// How long a sender whose peer hung up waits for the abort that explains it.
const ABORT_GRACE: Duration = Duration::from_millis(200);

/// Unit of traffic between endpoints.
#[derive(Debug)]
enum Envelope {
    /// A tagged payload.
    Data {
        source: Rank,
        tag: Tag,
        payload: Vec<f64>,
    },
    /// The sender has given up on the run.
    Abort { origin: Rank },
}

/// Create an in-process world of `size` connected endpoints.
///
/// Endpoint `i` has rank `i`. All endpoints share one wall-clock epoch.
///
/// # Examples
///
/// ```
/// use heatgrid_comm::{local_world, Communicator};
///
/// let world = local_world(3);
/// assert_eq!(world.len(), 3);
/// assert_eq!(world[2].size(), 3);
/// ```
pub fn local_world(size: usize) -> Vec<ChannelComm> {
    let (senders, receivers): (Vec<Sender<Envelope>>, Vec<Receiver<Envelope>>) =
        (0..size).map(|_| unbounded()).unzip();
    let outboxes: Arc<[Sender<Envelope>]> = senders.into();
    let epoch = Instant::now();

    receivers
        .into_iter()
        .enumerate()
        .map(|(r, inbox)| ChannelComm {
            rank: Rank(r),
            size,
            inbox,
            outboxes: Arc::clone(&outboxes),
            stash: RefCell::new(IndexMap::new()),
            aborted: Cell::new(None),
            epoch,
        })
        .collect()
}

/// One participant's endpoint in a [`local_world`].
pub struct ChannelComm {
    rank: Rank,
    size: usize,
    inbox: Receiver<Envelope>,
    outboxes: Arc<[Sender<Envelope>]>,
    /// Arrived but not yet matched payloads, keyed by `(source, tag)`.
    stash: RefCell<IndexMap<(Rank, Tag), VecDeque<Vec<f64>>>>,
    /// Sticky: once an abort is seen every later receive fails with it.
    aborted: Cell<Option<Rank>>,
    epoch: Instant,
}

impl ChannelComm {
    fn check_peer(&self, peer: Rank) -> Result<(), CommError> {
        if peer.index() >= self.size || peer == self.rank {
            return Err(CommError::InvalidPeer {
                peer,
                size: self.size,
            });
        }
        Ok(())
    }

    fn deliver(&self, dest: Rank, tag: Tag, payload: Vec<f64>) -> Result<(), CommError> {
        if let Some(origin) = self.aborted.get() {
            return Err(CommError::Aborted { origin });
        }
        self.outboxes[dest.index()]
            .send(Envelope::Data {
                source: self.rank,
                tag,
                payload,
            })
            .map_err(|_| self.hung_up(dest))
    }

    /// `peer` dropped its inbox. Peers only exit mid-run because of an
    /// abort, so wait briefly for that abort and report it instead.
    fn hung_up(&self, peer: Rank) -> CommError {
        let deadline = Instant::now() + ABORT_GRACE;
        while let Ok(envelope) = self.inbox.recv_deadline(deadline) {
            match envelope {
                Envelope::Abort { origin } => {
                    self.aborted.set(Some(origin));
                    return CommError::Aborted { origin };
                }
                Envelope::Data {
                    source,
                    tag,
                    payload,
                } => self
                    .stash
                    .borrow_mut()
                    .entry((source, tag))
                    .or_default()
                    .push_back(payload),
            }
        }
        CommError::Disconnected { peer }
    }

    fn take_stashed(&self, source: Rank, tag: Tag) -> Option<Vec<f64>> {
        let mut stash = self.stash.borrow_mut();
        let queue = stash.get_mut(&(source, tag))?;
        let payload = queue.pop_front();
        if queue.is_empty() {
            stash.shift_remove(&(source, tag));
        }
        payload
    }

    /// Block until a payload from `source` with `tag` is available.
    fn recv_from(&self, source: Rank, tag: Tag) -> Result<Vec<f64>, CommError> {
        if let Some(origin) = self.aborted.get() {
            return Err(CommError::Aborted { origin });
        }
        if let Some(payload) = self.take_stashed(source, tag) {
            return Ok(payload);
        }
        loop {
            match self.inbox.recv() {
                Ok(Envelope::Data {
                    source: s,
                    tag: t,
                    payload,
                }) => {
                    if s == source && t == tag {
                        return Ok(payload);
                    }
                    tracing::trace!(rank = %self.rank, from = %s, tag = %t, "stashing unmatched message");
                    self.stash
                        .borrow_mut()
                        .entry((s, t))
                        .or_default()
                        .push_back(payload);
                }
                Ok(Envelope::Abort { origin }) => {
                    self.aborted.set(Some(origin));
                    return Err(CommError::Aborted { origin });
                }
                Err(_) => return Err(CommError::Disconnected { peer: source }),
            }
        }
    }

    fn recv_exact(&self, source: Rank, tag: Tag, expected: usize) -> Result<Vec<f64>, CommError> {
        let payload = self.recv_from(source, tag)?;
        if payload.len() != expected {
            return Err(CommError::LengthMismatch {
                source,
                expected,
                actual: payload.len(),
            });
        }
        Ok(payload)
    }

    /// Number of stashed, unmatched payloads. Zero after a clean run.
    pub fn pending_unmatched(&self) -> usize {
        self.stash.borrow().values().map(VecDeque::len).sum()
    }
}

impl Communicator for ChannelComm {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn isend(
        &self,
        buf: &[f64],
        layout: &StridedLayout,
        dest: Rank,
        tag: Tag,
    ) -> Result<Request, CommError> {
        self.check_peer(dest)?;
        let payload = layout.pack(buf)?;
        self.deliver(dest, tag, payload)?;
        Ok(Request::send(dest, tag, *layout))
    }

    fn irecv(&self, layout: StridedLayout, source: Rank, tag: Tag) -> Result<Request, CommError> {
        self.check_peer(source)?;
        Ok(Request::recv(source, tag, layout))
    }

    fn wait_all(&self, requests: &mut RequestList, buf: &mut [f64]) -> Result<(), CommError> {
        for req in requests.drain(..) {
            match req.kind() {
                RequestKind::Send => {}
                RequestKind::Recv => {
                    let layout = req.layout();
                    let payload = self.recv_exact(req.peer(), req.tag(), layout.count())?;
                    layout.unpack(&payload, buf)?;
                }
            }
        }
        Ok(())
    }

    fn gather_varcount(
        &self,
        local: &[f64],
        counts: &[usize],
        displs: &[usize],
        root: Rank,
    ) -> Result<Option<Vec<f64>>, CommError> {
        if counts.len() != self.size || displs.len() != self.size {
            return Err(CommError::InvalidGatherLayout {
                reason: format!(
                    "expected {} counts and displacements, got {} and {}",
                    self.size,
                    counts.len(),
                    displs.len()
                ),
            });
        }
        if root.index() >= self.size {
            return Err(CommError::InvalidPeer {
                peer: root,
                size: self.size,
            });
        }
        let own = counts[self.rank.index()];
        if local.len() != own {
            return Err(CommError::InvalidGatherLayout {
                reason: format!(
                    "rank {} contributes {} elements but its count is {own}",
                    self.rank,
                    local.len()
                ),
            });
        }

        if self.rank != root {
            self.deliver(root, Tag::GATHER, local.to_vec())?;
            return Ok(None);
        }

        let total = counts
            .iter()
            .zip(displs)
            .map(|(c, d)| c + d)
            .max()
            .unwrap_or(0);
        let mut out = vec![0.0; total];
        for r in 0..self.size {
            let (count, displ) = (counts[r], displs[r]);
            let target = &mut out[displ..displ + count];
            if Rank(r) == root {
                target.copy_from_slice(local);
            } else {
                let payload = self.recv_exact(Rank(r), Tag::GATHER, count)?;
                target.copy_from_slice(&payload);
            }
        }
        Ok(Some(out))
    }

    fn all_reduce_max(&self, local: f64) -> Result<f64, CommError> {
        let root = Rank::ROOT;
        if self.rank != root {
            self.deliver(root, Tag::REDUCE, vec![local])?;
            return Ok(self.recv_exact(root, Tag::REDUCE, 1)?[0]);
        }
        let mut max = local;
        for r in 1..self.size {
            max = nan_max(max, self.recv_exact(Rank(r), Tag::REDUCE, 1)?[0]);
        }
        for r in 1..self.size {
            self.deliver(Rank(r), Tag::REDUCE, vec![max])?;
        }
        Ok(max)
    }

    fn barrier(&self) -> Result<(), CommError> {
        let root = Rank::ROOT;
        if self.rank != root {
            self.deliver(root, Tag::BARRIER, Vec::new())?;
            self.recv_exact(root, Tag::BARRIER, 0)?;
            return Ok(());
        }
        for r in 1..self.size {
            self.recv_exact(Rank(r), Tag::BARRIER, 0)?;
        }
        for r in 1..self.size {
            self.deliver(Rank(r), Tag::BARRIER, Vec::new())?;
        }
        Ok(())
    }

    fn wtime(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn abort(&self) {
        self.aborted.set(Some(self.rank));
        for (r, outbox) in self.outboxes.iter().enumerate() {
            if r != self.rank.index() {
                // Peers that already exited have dropped their inbox.
                let _ = outbox.send(Envelope::Abort { origin: self.rank });
            }
        }
    }
}
