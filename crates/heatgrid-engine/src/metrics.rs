//! Throughput accounting and the machine-readable summary line.

use std::fmt;
use std::time::Duration;

use crate::gather::GlobalField;
use crate::kernel::FLOPS_PER_CELL;

/// Outcome of a completed run, as seen by the coordinator.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Distributed participants.
    pub participants: usize,
    /// Shared-memory threads per participant.
    pub threads: usize,
    /// Global X cells.
    pub grid_x: usize,
    /// Global Y cells.
    pub grid_y: usize,
    /// Steps asked for.
    pub iterations_requested: usize,
    /// Steps taken. Smaller than requested only if a tolerance stopped
    /// the run early.
    pub iterations_completed: usize,
    /// Wall time between the start barrier and the last step on the
    /// coordinator.
    pub elapsed: Duration,
    /// The assembled final field.
    pub field: GlobalField,
}

impl RunReport {
    /// Nominal floating-point operations: `Gx · Gy · iterations · 10`.
    pub fn total_flops(&self) -> u128 {
        self.grid_x as u128
            * self.grid_y as u128
            * self.iterations_completed as u128
            * u128::from(FLOPS_PER_CELL)
    }

    /// [`total_flops`](Self::total_flops) in units of 10⁹.
    pub fn gflops(&self) -> f64 {
        self.total_flops() as f64 / 1e9
    }

    /// Throughput in GFLOP/s, or 0 if no measurable time elapsed.
    pub fn gflops_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.gflops() / secs
        } else {
            0.0
        }
    }

    /// `DATA,<participants>,<grid_x>,<iterations>,<elapsed_s>,<gflop>,<gflop_per_s>`
    pub fn data_line(&self) -> DataLine<'_> {
        DataLine(self)
    }
}

/// Display adapter for [`RunReport::data_line`].
#[derive(Clone, Copy, Debug)]
pub struct DataLine<'a>(&'a RunReport);

impl fmt::Display for DataLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(
            f,
            "DATA,{},{},{},{},{},{}",
            r.participants,
            r.grid_x,
            r.iterations_completed,
            r.elapsed.as_secs_f64(),
            r.gflops(),
            r.gflops_per_second()
        )
    }
}
