//! Immutable description of the global problem grid.

use crate::error::ConfigError;

/// Largest admissible value of `dt·(dx⁻² + dy⁻²)` for explicit 2D diffusion.
pub const STABILITY_LIMIT: f64 = 0.5;

/// Relative slack on [`STABILITY_LIMIT`] for rounding in `dx²·dx⁻²`.
const STABILITY_SLACK: f64 = 1e-12;

/// Global grid geometry and the derived time step.
///
/// `width × height` interior cells cover a physical rectangle of
/// `extent_x × extent_y`. Spacings are `dx = extent_x / width` and
/// `dy = extent_y / height`; the time step is the explicit stability
/// bound `dt = min(dx², dy²) / 4`.
///
/// Constructed once at startup and shared read-only by every participant.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalGrid {
    width: usize,
    height: usize,
    extent_x: f64,
    extent_y: f64,
    dx: f64,
    dy: f64,
    dt: f64,
}

impl GlobalGrid {
    /// Default physical extent on each axis.
    pub const DEFAULT_EXTENT: f64 = 1.0;

    /// Create a grid over the unit square.
    ///
    /// # Examples
    ///
    /// ```
    /// use heatgrid_core::GlobalGrid;
    ///
    /// let grid = GlobalGrid::new(4, 4).unwrap();
    /// assert_eq!(grid.dx(), 0.25);
    /// assert_eq!(grid.dt(), 0.015625);
    /// ```
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        Self::with_extent(width, height, Self::DEFAULT_EXTENT, Self::DEFAULT_EXTENT)
    }

    /// Create a grid over an `extent_x × extent_y` rectangle.
    ///
    /// Returns `Err(ConfigError::ZeroDimension)` for an empty axis,
    /// `Err(ConfigError::InvalidExtent)` for a non-finite or non-positive
    /// extent, `Err(ConfigError::CellCountOverflow)` if the halo-padded
    /// grid has more cells than `usize` can count, and
    /// `Err(ConfigError::Unstable)` if the derived time step fails the
    /// stability bound.
    pub fn with_extent(
        width: usize,
        height: usize,
        extent_x: f64,
        extent_y: f64,
    ) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroDimension { axis: "x" });
        }
        if height == 0 {
            return Err(ConfigError::ZeroDimension { axis: "y" });
        }
        // Every local field and the gathered global field fit inside the
        // padded global grid, so bounding it bounds every allocation.
        width
            .checked_add(2)
            .zip(height.checked_add(2))
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(ConfigError::CellCountOverflow { width, height })?;
        if !extent_x.is_finite() || extent_x <= 0.0 {
            return Err(ConfigError::InvalidExtent {
                axis: "x",
                value: extent_x,
            });
        }
        if !extent_y.is_finite() || extent_y <= 0.0 {
            return Err(ConfigError::InvalidExtent {
                axis: "y",
                value: extent_y,
            });
        }

        let dx = extent_x / width as f64;
        let dy = extent_y / height as f64;
        let dt = (dx * dx).min(dy * dy) / 4.0;

        let grid = Self {
            width,
            height,
            extent_x,
            extent_y,
            dx,
            dy,
            dt,
        };
        grid.check_stability()?;
        Ok(grid)
    }

    /// Verify `dt·(dx⁻² + dy⁻²) ≤ 0.5`.
    ///
    /// Holds by construction; checked anyway because a violation makes
    /// the kernel diverge silently instead of failing.
    pub fn check_stability(&self) -> Result<(), ConfigError> {
        let stability = self.stability_number();
        if !stability.is_finite() || stability > STABILITY_LIMIT * (1.0 + STABILITY_SLACK) {
            return Err(ConfigError::Unstable { stability });
        }
        Ok(())
    }

    /// `dt·(dx⁻² + dy⁻²)`.
    pub fn stability_number(&self) -> f64 {
        self.dt * (self.inv_dx2() + self.inv_dy2())
    }

    /// Interior cells along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Interior cells along Y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total interior cells.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Physical extent along X.
    pub fn extent_x(&self) -> f64 {
        self.extent_x
    }

    /// Physical extent along Y.
    pub fn extent_y(&self) -> f64 {
        self.extent_y
    }

    /// Cell spacing along X.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Cell spacing along Y.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// `1 / dx²`.
    pub fn inv_dx2(&self) -> f64 {
        1.0 / (self.dx * self.dx)
    }

    /// `1 / dy²`.
    pub fn inv_dy2(&self) -> f64 {
        1.0 / (self.dy * self.dy)
    }
}
