//! Message-passing capability consumed by the heatgrid solver.
//!
//! The solver never touches another participant's memory. Everything it
//! needs from the outside world goes through the [`Communicator`] trait:
//! rank and size discovery, non-blocking point-to-point transfers described
//! by a [`StridedLayout`], a variable-count gather, a max-reduction, a
//! barrier, and a wall clock.
//!
//! # Implementations
//!
//! - [`ChannelComm`]: one endpoint of an in-process world created by
//!   [`local_world`]. Each participant runs on its own OS thread and
//!   messages travel over `crossbeam-channel` queues. Sends are eager;
//!   receives match on `(source, tag)` and stash anything else, which
//!   keeps per-pair message order.
//!
//! A binding to a native MPI library would implement the same trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod communicator;
pub mod layout;
pub mod local;

pub use communicator::{AbortOnDrop, Communicator, Request, RequestKind, RequestList};
pub use layout::StridedLayout;
pub use local::{local_world, ChannelComm};
