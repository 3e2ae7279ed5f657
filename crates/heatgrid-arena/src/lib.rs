//! Halo-padded, double-buffered local field storage.
//!
//! Each participant owns one [`FieldPair`]: two [`LocalField`]s of identical
//! [`LocalShape`] that alternate between the "current" (read) and "working"
//! (write) roles.
//!
//! ```text
//!  y = local_y+1  ┌───┬──────────────────┬───┐  top boundary (1.0)
//!                 │ g │                  │ g │
//!                 │ h │     interior     │ h │
//!                 │ o │  x ∈ [1,local_x] │ o │
//!                 │ s │  y ∈ [1,local_y] │ s │
//!                 │ t │                  │ t │
//!  y = 0          └───┴──────────────────┴───┘  bottom boundary (0.0)
//!                x = 0                 x = local_x+1
//! ```
//!
//! Storage is row-major with `stride = local_x + 2`; see [`index`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod field;
pub mod pingpong;

pub use boundary::BoundaryProfile;
pub use field::{index, LocalField, LocalShape};
pub use pingpong::FieldPair;
