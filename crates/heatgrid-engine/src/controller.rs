//! Per-participant time stepping.

use heatgrid_arena::{FieldPair, LocalShape};
use heatgrid_comm::Communicator;
use heatgrid_core::{CommError, GlobalGrid, Partition, SolveError};

use crate::config::SolverConfig;
use crate::halo::HaloExchange;
use crate::kernel::StencilKernel;

/// One participant's share of the solve: its columns, its two buffers,
/// its halo topology and its kernel.
///
/// A step is always exchange → kernel → swap. There is no barrier between
/// steps; the blocking halo wait is the only synchronisation.
pub struct Participant<'c, C: Communicator + ?Sized> {
    comm: &'c C,
    partition: Partition,
    fields: FieldPair,
    halo: HaloExchange,
    kernel: StencilKernel,
    tolerance: Option<f64>,
    completed: usize,
}

impl<'c, C: Communicator + ?Sized> Participant<'c, C> {
    /// Set up the participant behind `comm` for `config` on `grid`.
    ///
    /// `grid` must be the result of `config.validate()`.
    pub fn new(comm: &'c C, config: &SolverConfig, grid: &GlobalGrid) -> Result<Self, SolveError> {
        let (rank, size) = (comm.rank(), comm.size());
        if size != config.participants {
            return Err(CommError::WorldSizeMismatch {
                expected: config.participants,
                actual: size,
            }
            .into());
        }
        let partition = Partition::for_rank(grid.width(), size, rank)?;
        let shape = LocalShape::for_partition(grid, &partition);
        let left_edge = rank.left().is_none();
        let right_edge = rank.right(size).is_none();
        let fields = FieldPair::new(shape, grid, config.boundary, left_edge, right_edge);
        let halo = HaloExchange::new(rank, size, shape);
        let kernel = StencilKernel::new(grid, config.resolved_threads(), rank)?;

        tracing::debug!(
            start = partition.start(),
            end = partition.end(),
            threads = kernel.threads(),
            relay = halo.is_relay(),
            "participant ready"
        );

        Ok(Self {
            comm,
            partition,
            fields,
            halo,
            kernel,
            tolerance: config.tolerance,
            completed: 0,
        })
    }

    /// Advance one time step. Returns the largest local `|dphi|`.
    pub fn step(&mut self) -> Result<f64, SolveError> {
        self.halo.exchange(self.comm, &mut self.fields)?;
        let (current, working) = self.fields.split();
        let delta = self.kernel.apply(current, working);
        self.fields.swap();
        self.completed += 1;
        Ok(delta)
    }

    /// Run up to `iterations` steps and return how many were taken.
    ///
    /// Without a tolerance exactly `iterations` steps run. With one, the
    /// participants agree after every step on the global largest update
    /// and all stop on the first step where it is below the tolerance.
    pub fn run(&mut self, iterations: usize) -> Result<usize, SolveError> {
        for _ in 0..iterations {
            let local = self.step()?;
            if let Some(tol) = self.tolerance {
                let global = self.comm.all_reduce_max(local)?;
                if global < tol {
                    tracing::debug!(step = self.completed, delta = global, "converged");
                    break;
                }
            }
        }
        Ok(self.completed)
    }

    /// Columns owned by this participant.
    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Steps completed so far.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Current buffer pair.
    pub fn fields(&self) -> &FieldPair {
        &self.fields
    }

    /// The participant's interior in row-major order, halo stripped.
    pub fn local_interior(&self) -> Vec<f64> {
        self.fields.current().interior()
    }
}
