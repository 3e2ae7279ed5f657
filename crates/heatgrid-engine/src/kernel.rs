//! Five-point explicit update on one participant's cells.

use heatgrid_arena::LocalField;
use heatgrid_core::{nan_max, ConfigError, GlobalGrid, Rank};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Floating-point operations per interior cell update.
pub const FLOPS_PER_CELL: u64 = 10;

/// The stencil coefficients plus the thread pool that applies them.
///
/// For every interior cell `(x, y)`:
///
/// ```text
/// dphi = ((R + L − 2C)·dx⁻² + (D + U − 2C)·dy⁻²)·dt
/// working[x, y] = C + dphi
/// ```
///
/// where `C, L, R, D, U` are read from the current field at `(x, y)`,
/// `(x−1, y)`, `(x+1, y)`, `(x, y−1)`, `(x, y+1)`. Rows of the working
/// field are independent and are updated in parallel.
pub struct StencilKernel {
    inv_dx2: f64,
    inv_dy2: f64,
    dt: f64,
    pool: ThreadPool,
}

impl StencilKernel {
    /// Build a kernel for `grid` running on `threads` worker threads.
    ///
    /// Threads are named after `rank` so they are identifiable in a
    /// debugger or profiler.
    pub fn new(grid: &GlobalGrid, threads: usize, rank: Rank) -> Result<Self, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("heatgrid-r{}-w{i}", rank.index()))
            .build()
            .map_err(|e| ConfigError::ThreadPool {
                reason: e.to_string(),
            })?;
        Ok(Self {
            inv_dx2: grid.inv_dx2(),
            inv_dy2: grid.inv_dy2(),
            dt: grid.dt(),
            pool,
        })
    }

    /// Worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Write one time step of `current` into the interior of `working`.
    ///
    /// Only interior cells of `working` are written; its halo and boundary
    /// rows are left as they are. Returns the largest `|dphi|` applied,
    /// or NaN if any update was NaN.
    ///
    /// # Panics
    ///
    /// Panics if the two fields have different shapes.
    pub fn apply(&self, current: &LocalField, working: &mut LocalField) -> f64 {
        assert_eq!(current.shape(), working.shape(), "stencil buffers differ in shape");
        let shape = current.shape();
        let (lx, ly, stride) = (shape.local_x(), shape.local_y(), shape.stride());
        if lx == 0 {
            return 0.0;
        }

        let (inv_dx2, inv_dy2, dt) = (self.inv_dx2, self.inv_dy2, self.dt);
        let cur = current.as_slice();
        let rows = &mut working.as_mut_slice()[stride..stride * (ly + 1)];

        self.pool.install(|| {
            rows.par_chunks_mut(stride)
                .enumerate()
                .map(|(i, row)| {
                    let y = i + 1;
                    let here = y * stride;
                    let down = here - stride;
                    let up = here + stride;
                    let mut max_delta = 0.0_f64;
                    for x in 1..=lx {
                        let c = cur[here + x];
                        let dphi = ((cur[here + x + 1] + cur[here + x - 1] - 2.0 * c) * inv_dx2
                            + (cur[down + x] + cur[up + x] - 2.0 * c) * inv_dy2)
                            * dt;
                        row[x] = c + dphi;
                        max_delta = nan_max(max_delta, dphi.abs());
                    }
                    max_delta
                })
                .reduce(|| 0.0, nan_max)
        })
    }
}

impl std::fmt::Debug for StencilKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StencilKernel")
            .field("inv_dx2", &self.inv_dx2)
            .field("inv_dy2", &self.inv_dy2)
            .field("dt", &self.dt)
            .field("threads", &self.threads())
            .finish()
    }
}
