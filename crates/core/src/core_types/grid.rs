//! Uniform one-dimensional grid
//!
//! Mirrors the grid object a finite-volume host exposes: cell centers over
//! `[lower, upper]` and the same centers padded with ghost cells that continue
//! the uniform spacing past each end.

use super::arrays::AUX_ROWS;
use crate::error::ModelError;
use std::mem::size_of;

/// Length of a row with `num_ghost` ghost cells on each side of `num_cells`
///
/// # Errors
///
/// Returns `ModelError::InvalidParameter` if the padded length overflows or
/// an auxiliary array of that length could not be allocated.
pub fn padded_len(num_cells: usize, num_ghost: usize) -> Result<usize, ModelError> {
    num_ghost
        .checked_mul(2)
        .and_then(|ghosts| ghosts.checked_add(num_cells))
        .filter(|&len| {
            len.checked_mul(AUX_ROWS * size_of::<f64>())
                .is_some_and(|bytes| isize::try_from(bytes).is_ok())
        })
        .ok_or_else(|| {
            ModelError::invalid(
                "num_ghost",
                format!("{num_ghost} ghost cells per side overflow a row of {num_cells} cells"),
            )
        })
}

/// Uniform cell-centered grid over `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGrid {
    lower: f64,
    upper: f64,
    num_cells: usize,
}

impl UniformGrid {
    /// Create a grid with `num_cells` cells
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidParameter` if the bounds are not finite,
    /// `upper <= lower`, or `num_cells == 0`.
    pub fn new(lower: f64, upper: f64, num_cells: usize) -> Result<Self, ModelError> {
        if !lower.is_finite() || !upper.is_finite() || upper <= lower {
            return Err(ModelError::invalid(
                "x_upper",
                format!("domain [{lower:e}, {upper:e}] is empty or not finite"),
            ));
        }
        if num_cells == 0 {
            return Err(ModelError::invalid("num_cells", "must be positive"));
        }
        Ok(Self {
            lower,
            upper,
            num_cells,
        })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Interior plus `num_ghost` ghost cells per side
    ///
    /// # Errors
    ///
    /// As [`padded_len`].
    pub fn padded_len(&self, num_ghost: usize) -> Result<usize, ModelError> {
        padded_len(self.num_cells, num_ghost)
    }

    /// Cell width
    pub fn delta(&self) -> f64 {
        (self.upper - self.lower) / self.num_cells as f64
    }

    /// Center of cell `i`; negative or past-the-end indices are ghost cells
    #[inline]
    fn center(&self, i: isize) -> f64 {
        self.lower + (i as f64 + 0.5) * self.delta()
    }

    /// Interior cell centers
    pub fn centers(&self) -> Vec<f64> {
        (0..self.num_cells as isize).map(|i| self.center(i)).collect()
    }

    /// Cell centers including `num_ghost` ghost cells on each side
    pub fn centers_with_ghost(&self, num_ghost: usize) -> Vec<f64> {
        let g = num_ghost as isize;
        (-g..self.num_cells as isize + g)
            .map(|i| self.center(i))
            .collect()
    }

    /// Centers of the ghost cells below `lower`, in increasing order
    pub fn lower_ghost_centers(&self, num_ghost: usize) -> Vec<f64> {
        (-(num_ghost as isize)..0).map(|i| self.center(i)).collect()
    }

    /// Centers of the ghost cells above `upper`, in increasing order
    pub fn upper_ghost_centers(&self, num_ghost: usize) -> Vec<f64> {
        let n = self.num_cells as isize;
        (n..n + num_ghost as isize).map(|i| self.center(i)).collect()
    }
}
