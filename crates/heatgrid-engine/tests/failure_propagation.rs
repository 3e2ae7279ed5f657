//! Integration test: one participant failing takes the whole run down
//! with its own error, and nobody hangs.

use std::cell::Cell;

use heatgrid_comm::{local_world, ChannelComm, Communicator, Request, RequestList, StridedLayout};
use heatgrid_core::{CommError, Rank, SolveError, Tag};
use heatgrid_engine::{run_world, SolverConfig};

// ── Fault-injecting transport ───────────────────────────────────────

#[derive(Clone, Copy)]
enum Fault {
    Error,
    Panic,
}

/// Wraps a real endpoint; on `victim`, the `after`-th `wait_all` fails.
struct FaultyComm {
    inner: ChannelComm,
    victim: Rank,
    after: usize,
    fault: Fault,
    waits: Cell<usize>,
}

impl Communicator for FaultyComm {
    fn rank(&self) -> Rank {
        self.inner.rank()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn isend(
        &self,
        buf: &[f64],
        layout: &StridedLayout,
        dest: Rank,
        tag: Tag,
    ) -> Result<Request, CommError> {
        self.inner.isend(buf, layout, dest, tag)
    }

    fn irecv(&self, layout: StridedLayout, source: Rank, tag: Tag) -> Result<Request, CommError> {
        self.inner.irecv(layout, source, tag)
    }

    fn wait_all(&self, requests: &mut RequestList, buf: &mut [f64]) -> Result<(), CommError> {
        if self.rank() == self.victim {
            let n = self.waits.get() + 1;
            self.waits.set(n);
            if n == self.after {
                match self.fault {
                    Fault::Error => return Err(CommError::Disconnected { peer: Rank(99) }),
                    Fault::Panic => panic!("injected fault"),
                }
            }
        }
        self.inner.wait_all(requests, buf)
    }

    fn gather_varcount(
        &self,
        local: &[f64],
        counts: &[usize],
        displs: &[usize],
        root: Rank,
    ) -> Result<Option<Vec<f64>>, CommError> {
        self.inner.gather_varcount(local, counts, displs, root)
    }

    fn all_reduce_max(&self, local: f64) -> Result<f64, CommError> {
        self.inner.all_reduce_max(local)
    }

    fn barrier(&self) -> Result<(), CommError> {
        self.inner.barrier()
    }

    fn wtime(&self) -> f64 {
        self.inner.wtime()
    }

    fn abort(&self) {
        self.inner.abort()
    }
}

fn faulty_world(size: usize, victim: usize, after: usize, fault: Fault) -> Vec<FaultyComm> {
    local_world(size)
        .into_iter()
        .map(|inner| FaultyComm {
            inner,
            victim: Rank(victim),
            after,
            fault,
            waits: Cell::new(0),
        })
        .collect()
}

fn config(participants: usize) -> SolverConfig {
    SolverConfig {
        participants,
        threads: Some(1),
        ..SolverConfig::new(12, 6, 50)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn transport_error_surfaces_from_the_failing_participant() {
    for victim in 0..3 {
        let err = run_world(faulty_world(3, victim, 5, Fault::Error), &config(3))
            .err()
            .expect("run should fail");
        assert_eq!(err, SolveError::Comm(CommError::Disconnected { peer: Rank(99) }));
    }
}

#[test]
fn panic_is_reported_with_its_rank() {
    let err = run_world(faulty_world(4, 2, 3, Fault::Panic), &config(4))
        .err()
        .expect("run should fail");
    assert_eq!(err, SolveError::ParticipantPanicked { rank: Rank(2) });
}

#[test]
fn healthy_wrapper_completes() {
    let report = run_world(faulty_world(3, 1, usize::MAX, Fault::Error), &config(3)).unwrap();
    assert_eq!(report.iterations_completed, 50);
}
