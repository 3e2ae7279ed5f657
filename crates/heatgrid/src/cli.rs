//! Command-line arguments.

use clap::{Parser, ValueEnum};
use heatgrid::arena::BoundaryProfile;
use heatgrid::engine::SolverConfig;

/// Distributed 2D heat-diffusion solver.
///
/// Prints one summary line on stdout:
/// DATA,<participants>,<grid_x>,<iterations>,<elapsed_s>,<total_gflop>,<gflop_per_s>
#[derive(Debug, Parser)]
#[command(name = "heatgrid", version, about)]
pub struct Cli {
    /// Global interior cells along X
    #[arg(default_value_t = 20)]
    pub grid_x: usize,

    /// Global interior cells along Y
    #[arg(default_value_t = 20)]
    pub grid_y: usize,

    /// Number of time steps
    #[arg(default_value_t = 2000)]
    pub iterations: usize,

    /// Distributed participants (one thread each, communicating by messages)
    #[arg(short = 'n', long, default_value_t = 1)]
    pub participants: usize,

    /// Shared-memory threads per participant [default: cores / participants]
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Physical width of the domain
    #[arg(long, default_value_t = 1.0)]
    pub extent_x: f64,

    /// Physical height of the domain
    #[arg(long, default_value_t = 1.0)]
    pub extent_y: f64,

    /// Values held by the left and right edges
    #[arg(long, value_enum, default_value_t = BoundaryArg::Zero)]
    pub boundary: BoundaryArg,

    /// Stop early once the largest per-step update falls below this
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR); logs go to stderr
    #[arg(short = 'l', long = "log-level", default_value = "warn")]
    pub log_level: tracing::Level,
}

/// `--boundary` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BoundaryArg {
    /// Edges held at 0
    Zero,
    /// Edges hold y·dy
    Ramp,
}

impl From<BoundaryArg> for BoundaryProfile {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Zero => BoundaryProfile::Zero,
            BoundaryArg::Ramp => BoundaryProfile::Ramp,
        }
    }
}

impl Cli {
    /// The solver configuration these arguments describe.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            grid_x: self.grid_x,
            grid_y: self.grid_y,
            iterations: self.iterations,
            extent_x: self.extent_x,
            extent_y: self.extent_y,
            participants: self.participants,
            threads: self.threads,
            boundary: self.boundary.into(),
            tolerance: self.tolerance,
        }
    }
}
