//! Core types for the heatgrid diffusion solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! immutable description of the problem shared by every participant:
//! the [`GlobalGrid`] (extents, spacings, stable time step), the 1D
//! [`Decomposition`] of the X axis into [`Partition`]s, participant
//! identifiers, and the error taxonomy used across the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod id;
pub mod num;
pub mod partition;

pub use error::{CommError, ConfigError, SolveError};
pub use grid::GlobalGrid;
pub use id::{Rank, Tag};
pub use num::nan_max;
pub use partition::{Decomposition, Partition};
