//! Distributed explicit heat-diffusion solver.
//!
//! A run splits the X axis of the global grid across participants. Every
//! step each participant exchanges ghost columns with its neighbours
//! ([`halo`]), applies the five-point update on a thread pool
//! ([`kernel`]), and swaps its buffers ([`controller`]). After the last
//! step the coordinator assembles the global field ([`gather`]) and the
//! run is summarised in a [`RunReport`].
//!
//! ```
//! use heatgrid_engine::{run, SolverConfig};
//!
//! let config = SolverConfig { participants: 2, threads: Some(1), ..SolverConfig::new(4, 4, 1) };
//! let report = run(&config).unwrap();
//! assert_eq!(report.field.get(0, 3), 0.25);
//! assert_eq!(report.field.get(0, 2), 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod gather;
pub mod halo;
pub mod kernel;
pub mod metrics;
pub mod run;

pub use config::SolverConfig;
pub use controller::Participant;
pub use gather::{gather_field, GlobalField};
pub use halo::HaloExchange;
pub use kernel::{StencilKernel, FLOPS_PER_CELL};
pub use metrics::{DataLine, RunReport};
pub use run::{run, run_world};
