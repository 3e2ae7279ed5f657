//! Integration test: mixed point-to-point and collective traffic across
//! a multi-endpoint world keeps per-pair order and never cross-matches.

use std::thread;

use heatgrid_comm::{local_world, ChannelComm, Communicator, RequestList, StridedLayout};
use heatgrid_core::{Rank, Tag};
use proptest::prelude::*;

fn on_every_rank<R: Send>(size: usize, f: impl Fn(ChannelComm) -> R + Sync) -> Vec<R> {
    let world = local_world(size);
    thread::scope(|s| {
        let f = &f;
        let handles: Vec<_> = world
            .into_iter()
            .map(|comm| s.spawn(move || f(comm)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn ring_shift_interleaved_with_collectives() {
    const ROUNDS: usize = 25;
    let size = 5;
    let out = on_every_rank(size, |comm| {
        let r = comm.rank().index();
        let right = Rank((r + 1) % size);
        let left = Rank((r + size - 1) % size);
        let one = StridedLayout::contiguous(0, 1);
        let mut received = Vec::with_capacity(ROUNDS);
        for round in 0..ROUNDS {
            let mut buf = [(r * 1000 + round) as f64];
            let mut reqs = RequestList::new();
            reqs.push(comm.irecv(one, left, Tag::HALO).unwrap());
            reqs.push(comm.isend(&buf, &one, right, Tag::HALO).unwrap());
            comm.wait_all(&mut reqs, &mut buf).unwrap();
            received.push(buf[0]);
            if round % 3 == 0 {
                let m = comm.all_reduce_max(round as f64 + r as f64).unwrap();
                assert_eq!(m, (round + size - 1) as f64);
            }
            if round % 7 == 0 {
                comm.barrier().unwrap();
            }
        }
        (received, comm.pending_unmatched())
    });

    for (r, (received, pending)) in out.into_iter().enumerate() {
        let left = (r + size - 1) % size;
        let expected: Vec<f64> = (0..ROUNDS).map(|k| (left * 1000 + k) as f64).collect();
        assert_eq!(received, expected, "rank {r}");
        assert_eq!(pending, 0);
    }
}

#[test]
fn gather_after_strided_exchange() {
    let size = 3;
    let out = on_every_rank(size, |comm| {
        let r = comm.rank().index();
        // 2 rows × 3 columns, middle column is "interior".
        let mut buf = vec![0.0; 6];
        buf[1] = r as f64;
        buf[4] = r as f64 + 0.5;
        let col = |x: usize| StridedLayout::new(x, 2, 3);
        let mut reqs = RequestList::new();
        if r > 0 {
            reqs.push(comm.irecv(col(0), Rank(r - 1), Tag::HALO).unwrap());
            reqs.push(comm.isend(&buf, &col(1), Rank(r - 1), Tag::HALO).unwrap());
        }
        if r + 1 < size {
            reqs.push(comm.irecv(col(2), Rank(r + 1), Tag::HALO).unwrap());
            reqs.push(comm.isend(&buf, &col(1), Rank(r + 1), Tag::HALO).unwrap());
        }
        comm.wait_all(&mut reqs, &mut buf).unwrap();
        let counts = vec![6; size];
        let displs: Vec<usize> = (0..size).map(|i| 6 * i).collect();
        comm.gather_varcount(&buf, &counts, &displs, Rank(0)).unwrap()
    });

    let all = out[0].as_ref().unwrap();
    assert!(out[1..].iter().all(Option::is_none));
    // Rank 1's ghosts hold its neighbours' interior columns.
    assert_eq!(&all[6..12], &[0.0, 1.0, 2.0, 0.5, 1.5, 2.5]);
    // Global edges stay untouched.
    assert_eq!(all[0], 0.0);
    assert_eq!(all[17], 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn reduction_agrees_with_serial_max(values in prop::collection::vec(-1e6f64..1e6, 1..8)) {
        let expected = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let vals = values.clone();
        let out = on_every_rank(values.len(), move |comm| {
            comm.all_reduce_max(vals[comm.rank().index()]).unwrap()
        });
        for got in out {
            prop_assert_eq!(got, expected);
        }
    }
}
