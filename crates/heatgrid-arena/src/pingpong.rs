//! Double-buffered ping-pong field pair.
//!
//! [`FieldPair`] holds the two buffers of one participant. During a step
//! the kernel borrows "current" immutably and "working" mutably via
//! [`FieldPair::split`]; [`FieldPair::swap`] then makes the freshly
//! written buffer current. The lifecycle per step is:
//!
//! 1. `current_mut()`: halo exchange fills the ghost columns of "current"
//! 2. `split()`: kernel reads "current", writes "working"
//! 3. `swap()`: roles exchange, generation advances

use std::mem;

use heatgrid_core::GlobalGrid;

use crate::boundary::BoundaryProfile;
use crate::field::{LocalField, LocalShape};

/// The "current" and "working" buffers of one participant.
///
/// # Buffer roles
///
/// ```text
/// current: LocalField  ←─── read by the kernel, ghosts filled by exchange
/// working: LocalField  ←─── interior overwritten by the kernel
/// ```
///
/// Both buffers carry the same fixed boundary cells, so the roles can be
/// exchanged without copying anything.
#[derive(Clone, Debug)]
pub struct FieldPair {
    current: LocalField,
    working: LocalField,
    generation: u64,
}

impl FieldPair {
    /// Allocate both buffers and write the initial state into each.
    pub fn new(
        shape: LocalShape,
        grid: &GlobalGrid,
        profile: BoundaryProfile,
        left_edge: bool,
        right_edge: bool,
    ) -> Self {
        let mut current = LocalField::zeros(shape);
        profile.apply(&mut current, grid.dy(), left_edge, right_edge);
        let working = current.clone();
        Self {
            current,
            working,
            generation: 0,
        }
    }

    /// Build a pair from an explicit initial field.
    ///
    /// The working buffer starts as a copy, so boundary cells agree.
    pub fn from_field(initial: LocalField) -> Self {
        let working = initial.clone();
        Self {
            current: initial,
            working,
            generation: 0,
        }
    }

    /// Shape shared by both buffers.
    pub fn shape(&self) -> LocalShape {
        self.current.shape()
    }

    /// Buffer holding the latest completed state.
    pub fn current(&self) -> &LocalField {
        &self.current
    }

    /// Mutable access to "current", for the halo exchange.
    pub fn current_mut(&mut self) -> &mut LocalField {
        &mut self.current
    }

    /// Borrow "current" for reading and "working" for writing at once.
    pub fn split(&mut self) -> (&LocalField, &mut LocalField) {
        (&self.current, &mut self.working)
    }

    /// Exchange the roles of the two buffers.
    pub fn swap(&mut self) {
        mem::swap(&mut self.current, &mut self.working);
        self.generation += 1;
    }

    /// Number of swaps performed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Release the pair, keeping the latest state.
    pub fn into_current(self) -> LocalField {
        self.current
    }
}
