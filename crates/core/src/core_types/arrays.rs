//! Row-major state arrays shared with the host engine
//!
//! The host stores the field state `q` and the auxiliary state `aux` as small
//! fixed-row arrays indexed by cell. Both use the same container.

use crate::error::ModelError;

/// Number of rows in the field state (E, H)
pub const FIELD_ROWS: usize = 2;
/// Number of rows in the auxiliary state (ε_r, μ_r, ∂ε_r/∂t, ∂μ_r/∂t)
pub const AUX_ROWS: usize = 4;

/// Field state row of the electric field
pub const ELECTRIC: usize = 0;
/// Field state row of the magnetic field
pub const MAGNETIC: usize = 1;

/// Auxiliary row of the relative permittivity
pub const EPSILON: usize = 0;
/// Auxiliary row of the relative permeability
pub const MU: usize = 1;
/// Auxiliary row of ∂ε_r/∂t
pub const EPSILON_RATE: usize = 2;
/// Auxiliary row of ∂μ_r/∂t
pub const MU_RATE: usize = 3;

/// Multi-row array stored as a flat `Vec<f64>` in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct RowArray {
    /// Values in row-major order (row * len + cell)
    pub data: Vec<f64>,
    /// Number of rows
    pub rows: usize,
    /// Number of cells per row
    pub len: usize,
}

impl RowArray {
    /// Create a new array with given shape, initialized to zero
    #[must_use]
    pub fn new(rows: usize, len: usize) -> Self {
        Self {
            data: vec![0.0; rows * len],
            rows,
            len,
        }
    }

    /// Zero-filled field state (2 rows)
    #[must_use]
    pub fn field(len: usize) -> Self {
        Self::new(FIELD_ROWS, len)
    }

    /// Zero-filled auxiliary state (4 rows)
    #[must_use]
    pub fn aux(len: usize) -> Self {
        Self::new(AUX_ROWS, len)
    }

    /// Wrap existing row-major data
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if `data.len() != rows * len`.
    pub fn from_vec(data: Vec<f64>, rows: usize, len: usize) -> Result<Self, ModelError> {
        if data.len() != rows * len {
            return Err(ModelError::ShapeMismatch {
                array: "row array",
                expected_rows: rows,
                rows: data.len() / len.max(1),
                expected_len: len,
                len,
            });
        }
        Ok(Self { data, rows, len })
    }

    /// Get reference to the full data
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get mutable reference to the full data
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Borrow one row
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.rows, "Row out of bounds");
        &self.data[row * self.len..(row + 1) * self.len]
    }

    /// Mutably borrow one row
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        assert!(row < self.rows, "Row out of bounds");
        &mut self.data[row * self.len..(row + 1) * self.len]
    }

    /// Mutably borrow two distinct rows at once
    ///
    /// # Panics
    ///
    /// Panics if `first >= second` or `second >= rows`
    pub fn row_pair_mut(&mut self, first: usize, second: usize) -> (&mut [f64], &mut [f64]) {
        assert!(first < second && second < self.rows, "Invalid row pair");
        let (head, tail) = self.data.split_at_mut(second * self.len);
        (
            &mut head[first * self.len..(first + 1) * self.len],
            &mut tail[..self.len],
        )
    }

    /// Get value at (row, cell)
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, row: usize, cell: usize) -> f64 {
        assert!(row < self.rows && cell < self.len, "Coordinates out of bounds");
        self.data[row * self.len + cell]
    }

    /// Set value at (row, cell)
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, row: usize, cell: usize, value: f64) {
        assert!(row < self.rows && cell < self.len, "Coordinates out of bounds");
        self.data[row * self.len + cell] = value;
    }

    /// Fill entire array with a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Copy `src` into the columns starting at `offset`, row by row
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if row counts differ or the columns
    /// do not fit.
    pub fn write_columns(&mut self, offset: usize, src: &RowArray) -> Result<(), ModelError> {
        if src.rows != self.rows || offset + src.len > self.len {
            return Err(ModelError::ShapeMismatch {
                array: "column block",
                expected_rows: self.rows,
                rows: src.rows,
                expected_len: self.len.saturating_sub(offset),
                len: src.len,
            });
        }
        for row in 0..self.rows {
            self.row_mut(row)[offset..offset + src.len].copy_from_slice(src.row(row));
        }
        Ok(())
    }

    /// Check the array against the shape a hook expects
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` naming `array` on any difference.
    pub fn expect_shape(
        &self,
        array: &'static str,
        rows: usize,
        len: usize,
    ) -> Result<(), ModelError> {
        if self.rows == rows && self.len == len && self.data.len() == rows * len {
            Ok(())
        } else {
            Err(ModelError::ShapeMismatch {
                array,
                expected_rows: rows,
                rows: self.rows,
                expected_len: len,
                len: self.len,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_creation() {
        let aux = RowArray::aux(10);
        assert_eq!(aux.rows, 4);
        assert_eq!(aux.len, 10);
        assert_eq!(aux.data.len(), 40);
        assert!(aux.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_array_get_set() {
        let mut q = RowArray::field(10);
        q.set(MAGNETIC, 4, 123.45);
        assert_eq!(q.get(MAGNETIC, 4), 123.45);

        // Verify row-major indexing
        assert_eq!(q.data[10 + 4], 123.45);
        assert_eq!(q.row(MAGNETIC)[4], 123.45);
    }

    #[test]
    fn test_row_pair_mut_is_disjoint() {
        let mut aux = RowArray::aux(3);
        let (eps, mu) = aux.row_pair_mut(EPSILON, MU);
        eps.fill(1.0);
        mu.fill(2.0);
        assert_eq!(aux.row(EPSILON), &[1.0, 1.0, 1.0]);
        assert_eq!(aux.row(MU), &[2.0, 2.0, 2.0]);
        assert!(aux.row(EPSILON_RATE).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_write_columns() {
        let mut qbc = RowArray::field(6);
        let mut block = RowArray::field(2);
        block.fill(7.0);
        qbc.write_columns(4, &block).unwrap();
        assert_eq!(qbc.row(ELECTRIC), &[0.0, 0.0, 0.0, 0.0, 7.0, 7.0]);
        assert!(qbc.write_columns(5, &block).is_err());
    }

    #[test]
    fn test_expect_shape() {
        let aux = RowArray::aux(5);
        assert!(aux.expect_shape("aux", AUX_ROWS, 5).is_ok());
        let err = aux.expect_shape("q", FIELD_ROWS, 5).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { rows: 4, .. }));
    }

    #[test]
    fn test_from_vec_rejects_bad_length() {
        assert!(RowArray::from_vec(vec![0.0; 7], 2, 4).is_err());
        assert!(RowArray::from_vec(vec![0.0; 8], 2, 4).is_ok());
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_array_bounds_check() {
        let q = RowArray::field(10);
        let _ = q.get(0, 10);
    }
}
