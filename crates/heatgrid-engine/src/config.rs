//! Solver configuration and validation.
//!
//! [`SolverConfig`] is a plain value assembled by the caller (the CLI, a
//! test, a benchmark). [`validate()`](SolverConfig::validate) checks every
//! knob and derives the [`GlobalGrid`] before anything is allocated.

use heatgrid_arena::BoundaryProfile;
use heatgrid_core::{ConfigError, Decomposition, GlobalGrid};

/// Upper bound for the per-participant thread count.
pub const MAX_THREADS: usize = 64;

// ── SolverConfig ───────────────────────────────────────────────────

/// Everything a run needs to know, fixed for its whole lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Global interior cells along X. Default: 20.
    pub grid_x: usize,
    /// Global interior cells along Y. Default: 20.
    pub grid_y: usize,
    /// Number of time steps. Default: 2000.
    pub iterations: usize,
    /// Physical width of the domain. Default: 1.0.
    pub extent_x: f64,
    /// Physical height of the domain. Default: 1.0.
    pub extent_y: f64,
    /// Distributed-memory participants. Default: 1.
    pub participants: usize,
    /// Shared-memory threads per participant. `None` = auto-detect
    /// (`available_parallelism / participants`, clamped to `[1, 64]`).
    pub threads: Option<usize>,
    /// Fixed values on the global left and right edges. Default: zero.
    pub boundary: BoundaryProfile,
    /// Stop early once the largest update of a step falls below this.
    /// `None` runs exactly `iterations` steps. Default: `None`.
    pub tolerance: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            grid_x: 20,
            grid_y: 20,
            iterations: 2000,
            extent_x: GlobalGrid::DEFAULT_EXTENT,
            extent_y: GlobalGrid::DEFAULT_EXTENT,
            participants: 1,
            threads: None,
            boundary: BoundaryProfile::Zero,
            tolerance: None,
        }
    }
}

impl SolverConfig {
    /// Config for a `grid_x × grid_y` run of `iterations` steps, other
    /// knobs at their defaults.
    pub fn new(grid_x: usize, grid_y: usize, iterations: usize) -> Self {
        Self {
            grid_x,
            grid_y,
            iterations,
            ..Self::default()
        }
    }

    /// Check every knob and derive the global grid.
    ///
    /// The partition bounds of every rank are computed here too, so an
    /// overflowing `rank · grid_x` is reported before any thread starts.
    pub fn validate(&self) -> Result<GlobalGrid, ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.participants == 0 {
            return Err(ConfigError::ZeroParticipants);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        if let Some(tol) = self.tolerance {
            if !tol.is_finite() || tol <= 0.0 {
                return Err(ConfigError::InvalidTolerance { value: tol });
            }
        }
        let grid = GlobalGrid::with_extent(self.grid_x, self.grid_y, self.extent_x, self.extent_y)?;
        Decomposition::new(self.grid_x, self.participants)?;
        Ok(grid)
    }

    /// Resolve the per-participant thread count, applying auto-detection
    /// if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_threads(&self) -> usize {
        match self.threads {
            Some(n) => n.clamp(1, MAX_THREADS),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                (cpus / self.participants.max(1)).clamp(1, MAX_THREADS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let c = SolverConfig::default();
        assert_eq!((c.grid_x, c.grid_y, c.iterations), (20, 20, 2000));
        assert_eq!(c.participants, 1);
        assert_eq!(c.boundary, BoundaryProfile::Zero);
        assert!(c.tolerance.is_none());
        let grid = c.validate().unwrap();
        assert_eq!(grid.dx(), 0.05);
    }

    #[test]
    fn rejects_zero_knobs() {
        let mut c = SolverConfig::new(4, 4, 0);
        assert_eq!(c.validate(), Err(ConfigError::ZeroIterations));
        c.iterations = 1;
        c.participants = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroParticipants));
        c.participants = 1;
        c.threads = Some(0);
        assert_eq!(c.validate(), Err(ConfigError::ZeroThreads));
        c.threads = None;
        c.grid_y = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroDimension { axis: "y" }));
    }

    #[test]
    fn rejects_bad_tolerance() {
        for bad in [0.0, -1.0, f64::INFINITY] {
            let c = SolverConfig {
                tolerance: Some(bad),
                ..SolverConfig::new(4, 4, 1)
            };
            assert!(matches!(
                c.validate(),
                Err(ConfigError::InvalidTolerance { .. })
            ));
        }
        let c = SolverConfig {
            tolerance: Some(f64::NAN),
            ..SolverConfig::new(4, 4, 1)
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidTolerance { .. })
        ));
    }

    #[test]
    fn rejects_bad_extent() {
        let c = SolverConfig {
            extent_x: -2.0,
            ..SolverConfig::new(4, 4, 1)
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidExtent { axis: "x", .. })
        ));
    }

    #[test]
    fn overflowing_partition_bounds_rejected() {
        // The padded grid fits, but `5 · grid_x` for rank 4's end does not.
        let c = SolverConfig {
            participants: 6,
            ..SolverConfig::new(usize::MAX / 4, 1, 1)
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::PartitionOverflow { .. })
        ));
    }

    #[test]
    fn overflowing_cell_count_rejected() {
        let c = SolverConfig {
            threads: Some(1),
            ..SolverConfig::new(usize::MAX, 1, 1)
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::CellCountOverflow { .. })
        ));
        let c = SolverConfig::new(1 << 33, 1 << 33, 1);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::CellCountOverflow { .. })
        ));
    }

    #[test]
    fn more_participants_than_columns_is_valid() {
        let c = SolverConfig {
            participants: 7,
            ..SolverConfig::new(3, 3, 1)
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn threads_clamped() {
        let mut c = SolverConfig::default();
        c.threads = Some(1000);
        assert_eq!(c.resolved_threads(), MAX_THREADS);
        c.threads = Some(3);
        assert_eq!(c.resolved_threads(), 3);
        c.threads = None;
        c.participants = 10_000;
        assert_eq!(c.resolved_threads(), 1);
    }
}
