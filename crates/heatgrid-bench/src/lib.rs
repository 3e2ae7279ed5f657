//! Benchmark profiles for the heatgrid solver.
//!
//! - [`reference_profile`]: 256×256 grid, 100 steps, one participant
//! - [`stress_profile`]: 1024×1024 grid, 100 steps
//! - [`scaling_config`]: one point of a strong-scaling sweep
//!   ([`SWEEP_PARTICIPANTS`] × [`SWEEP_GRID_SIZES`]), with [`speedup`]
//!   against its single-participant run

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use heatgrid_engine::SolverConfig;

/// Participant counts of the strong-scaling sweep.
pub const SWEEP_PARTICIPANTS: [usize; 6] = [1, 2, 4, 8, 16, 32];

/// Square grid sizes of the strong-scaling sweep.
pub const SWEEP_GRID_SIZES: [usize; 5] = [256, 512, 1024, 2048, 4096];

/// Steps per sweep point.
pub const SWEEP_ITERATIONS: usize = 1000;

/// CSV header matching the fields of the `DATA` line.
pub const CSV_HEADER: &str = "NP,GridX,Iterations,Time_Sec,Total_GFLOPs,GFLOPs_Sec";

/// 256×256 grid, 100 steps, single participant with auto-detected threads.
pub fn reference_profile() -> SolverConfig {
    SolverConfig::new(256, 256, 100)
}

/// 1024×1024 grid, 100 steps. Same knobs as [`reference_profile`].
pub fn stress_profile() -> SolverConfig {
    SolverConfig::new(1024, 1024, 100)
}

/// A `size × size` run of `iterations` steps on `participants`
/// single-threaded participants.
///
/// Strong scaling holds the grid fixed and grows the participant count,
/// so each participant gets one thread, mirroring one process per core.
pub fn scaling_config(size: usize, participants: usize, iterations: usize) -> SolverConfig {
    SolverConfig {
        participants,
        threads: Some(1),
        ..SolverConfig::new(size, size, iterations)
    }
}

/// Speedup of a run taking `time` seconds over the single-participant
/// `baseline`.
///
/// `None` when there is no baseline (the single-participant run failed or
/// was skipped) or either time is not positive.
pub fn speedup(baseline: Option<f64>, time: f64) -> Option<f64> {
    baseline
        .filter(|&b| b > 0.0)
        .filter(|_| time > 0.0)
        .map(|b| b / time)
}

/// Strip the `DATA,` prefix off a summary line, leaving the CSV record.
pub fn csv_record(data_line: &str) -> Option<&str> {
    data_line.strip_prefix("DATA,")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        assert!(reference_profile().validate().is_ok());
        assert!(stress_profile().validate().is_ok());
        for &n in &SWEEP_PARTICIPANTS {
            assert!(scaling_config(256, n, 10).validate().is_ok());
        }
    }

    #[test]
    fn speedup_needs_a_baseline() {
        assert_eq!(speedup(Some(2.0), 0.5), Some(4.0));
        assert_eq!(speedup(None, 0.5), None);
        assert_eq!(speedup(Some(0.0), 0.5), None);
        assert_eq!(speedup(Some(2.0), 0.0), None);
    }

    #[test]
    fn csv_record_strips_prefix() {
        assert_eq!(csv_record("DATA,1,2,3,4,5,6"), Some("1,2,3,4,5,6"));
        assert_eq!(csv_record("1,2"), None);
        assert_eq!(CSV_HEADER.split(',').count(), 6);
    }
}
