//! Serial oracle.
//!
//! Shares no code with the engine beyond [`GlobalGrid`] and
//! [`BoundaryProfile`]: the padded grid is a `Vec<Vec<f64>>` indexed
//! `[y][x]`, updated cell by cell on one thread. Every cell is computed
//! with the same expression as the engine, so results agree to the last
//! bit in practice; tests still compare with a small tolerance.

use heatgrid_arena::BoundaryProfile;
use heatgrid_core::GlobalGrid;

/// Run `iterations` steps and return the `Gx × Gy` interior, row-major.
pub fn solve_serial(grid: &GlobalGrid, iterations: usize, boundary: BoundaryProfile) -> Vec<f64> {
    solve(grid, iterations, boundary, None).0
}

/// Run until the largest `|dphi|` of a step is below `tol`, or
/// `iterations` steps. Returns the interior and the steps taken.
pub fn solve_serial_until(
    grid: &GlobalGrid,
    iterations: usize,
    boundary: BoundaryProfile,
    tol: f64,
) -> (Vec<f64>, usize) {
    solve(grid, iterations, boundary, Some(tol))
}

fn solve(
    grid: &GlobalGrid,
    iterations: usize,
    boundary: BoundaryProfile,
    tol: Option<f64>,
) -> (Vec<f64>, usize) {
    let (gx, gy) = (grid.width(), grid.height());
    let mut phi = vec![vec![0.0_f64; gx + 2]; gy + 2];
    phi[gy + 1].fill(1.0);
    if boundary == BoundaryProfile::Ramp {
        for (y, row) in phi.iter_mut().enumerate() {
            row[0] = y as f64 * grid.dy();
            row[gx + 1] = y as f64 * grid.dy();
        }
    }
    let mut next = phi.clone();

    let (ax, ay, dt) = (grid.inv_dx2(), grid.inv_dy2(), grid.dt());
    let mut steps = 0;
    while steps < iterations {
        let mut max_delta = 0.0_f64;
        for y in 1..=gy {
            for x in 1..=gx {
                let c = phi[y][x];
                let dphi = ((phi[y][x + 1] + phi[y][x - 1] - 2.0 * c) * ax
                    + (phi[y - 1][x] + phi[y + 1][x] - 2.0 * c) * ay)
                    * dt;
                next[y][x] = c + dphi;
                max_delta = max_delta.max(dphi.abs());
            }
        }
        std::mem::swap(&mut phi, &mut next);
        steps += 1;
        if tol.is_some_and(|t| max_delta < t) {
            break;
        }
    }

    let interior = phi[1..=gy]
        .iter()
        .flat_map(|row| row[1..=gx].iter().copied())
        .collect();
    (interior, steps)
}
