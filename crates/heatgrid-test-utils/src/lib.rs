//! Test utilities for heatgrid development.
//!
//! - [`reference`]: a deliberately naive single-threaded solver used as
//!   the oracle for distributed runs.
//! - [`run_ranks`]: run a closure once per endpoint of an in-process
//!   world, each on its own thread, and collect the results in rank order.
//! - [`assert_fields_close`]: element-wise comparison with a readable
//!   failure message.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod reference;

use std::thread;

use heatgrid_comm::{local_world, ChannelComm};

pub use reference::{solve_serial, solve_serial_until};

/// Run `f` once per rank of a fresh `size`-endpoint world.
///
/// Panics in any rank are re-raised on the calling thread.
pub fn run_ranks<R, F>(size: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(ChannelComm) -> R + Sync,
{
    let world = local_world(size);
    thread::scope(|s| {
        let f = &f;
        let handles: Vec<_> = world
            .into_iter()
            .map(|comm| s.spawn(move || f(comm)))
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(r) => r,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

/// Assert `actual` and `expected` agree element-wise within `tol`.
#[track_caller]
pub fn assert_fields_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "field lengths differ");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "cell {i}: got {a}, expected {e} (tol {tol})"
        );
    }
}
