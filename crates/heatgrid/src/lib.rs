//! heatgrid: a distributed explicit solver for the 2D heat equation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the heatgrid sub-crates. It also builds the `heatgrid` command-line
//! binary.
//!
//! # Quick start
//!
//! ```rust
//! use heatgrid::prelude::*;
//!
//! let config = SolverConfig {
//!     participants: 3,
//!     threads: Some(1),
//!     ..SolverConfig::new(8, 8, 10)
//! };
//! let report = heatgrid::run(&config).unwrap();
//! assert_eq!(report.iterations_completed, 10);
//! assert!(report.data_line().to_string().starts_with("DATA,3,8,10,"));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `heatgrid-core` | Grid geometry, partitions, ids, errors |
//! | [`arena`] | `heatgrid-arena` | Padded local fields, boundary profiles, double buffer |
//! | [`comm`] | `heatgrid-comm` | `Communicator` trait and the in-process transport |
//! | [`engine`] | `heatgrid-engine` | Halo exchange, kernel, iteration control, gather |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid geometry, partitioning, identifiers and errors (`heatgrid-core`).
pub use heatgrid_core as types;

/// Halo-padded local fields and the ping-pong pair (`heatgrid-arena`).
pub use heatgrid_arena as arena;

/// Message passing (`heatgrid-comm`).
///
/// Implement [`comm::Communicator`] to run the solver over another
/// transport; [`comm::local_world`] builds the in-process one.
pub use heatgrid_comm as comm;

/// The solver itself (`heatgrid-engine`).
pub use heatgrid_engine as engine;

pub use heatgrid_engine::{run, run_world};

/// Common imports for typical heatgrid usage.
pub mod prelude {
    pub use heatgrid_arena::BoundaryProfile;
    pub use heatgrid_comm::{local_world, Communicator};
    pub use heatgrid_core::{CommError, ConfigError, GlobalGrid, Rank, SolveError};
    pub use heatgrid_engine::{GlobalField, RunReport, SolverConfig};
}
