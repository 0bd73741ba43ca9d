use ndarray::Array2;

use crate::error::SimError;

/// Dense 2D panel temperature field [K], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureGrid {
    values: Array2<f64>,
}

impl TemperatureGrid {
    /// Uniform grid of `rows x cols` cells at `temperature`.
    pub fn uniform(rows: usize, cols: usize, temperature: f64) -> Result<Self, SimError> {
        check_shape(rows, cols)?;
        Ok(Self {
            values: Array2::from_elem((rows, cols), temperature),
        })
    }

    /// Builds a grid from nested rows. Rows must be non-empty and of equal length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SimError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        check_shape(n_rows, n_cols)?;
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(SimError::invalid(
                "grid_row_length",
                row.len() as f64,
                format!("row {i} differs from row 0 length {n_cols}"),
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let values = Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| SimError::invariant(format!("grid reshape failed: {e}")))?;
        Ok(Self { values })
    }

    pub fn from_array(values: Array2<f64>) -> Result<Self, SimError> {
        let (rows, cols) = values.dim();
        check_shape(rows, cols)?;
        Ok(Self { values })
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Array2<f64> {
        &mut self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Hard-clamps every cell into `[min, max]`.
    pub fn clamp(&mut self, min: f64, max: f64) {
        self.values.mapv_inplace(|t| t.clamp(min, max));
    }

    /// Discrete 5-point Laplacian with edge-replicated padding, written into `out`.
    ///
    /// `out[i, j] = (T[i-1, j] + T[i+1, j] + T[i, j-1] + T[i, j+1] - 4 T[i, j]) / dx²`,
    /// where out-of-range neighbours are replaced by the nearest edge cell.
    pub fn laplacian_into(&self, dx: f64, out: &mut Array2<f64>) -> Result<(), SimError> {
        if out.dim() != self.values.dim() {
            return Err(SimError::invariant(format!(
                "laplacian buffer shape {:?} does not match grid shape {:?}",
                out.dim(),
                self.values.dim()
            )));
        }
        let (rows, cols) = self.values.dim();
        let t = &self.values;
        let inv_dx2 = 1.0 / (dx * dx);
        for i in 0..rows {
            let up = i.saturating_sub(1);
            let down = (i + 1).min(rows - 1);
            for j in 0..cols {
                let left = j.saturating_sub(1);
                let right = (j + 1).min(cols - 1);
                let center = t[[i, j]];
                out[[i, j]] = (t[[up, j]] + t[[down, j]] + t[[i, left]] + t[[i, right]]
                    - 4.0 * center)
                    * inv_dx2;
            }
        }
        Ok(())
    }

    /// Nested row vectors, for serialization at the transport boundary.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }
}

fn check_shape(rows: usize, cols: usize) -> Result<(), SimError> {
    if rows == 0 || cols == 0 {
        return Err(SimError::invalid(
            "grid_size",
            (rows * cols) as f64,
            format!("grid must have at least one cell, got {rows}x{cols}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_grid() {
        let g = TemperatureGrid::uniform(3, 4, 300.0).unwrap();
        assert_eq!(g.shape(), (3, 4));
        assert_eq!(g.len(), 12);
        assert!(g.iter().all(|&t| t == 300.0));
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        assert!(TemperatureGrid::uniform(0, 4, 300.0).is_err());
        assert!(TemperatureGrid::from_rows(&[]).is_err());
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = TemperatureGrid::from_rows(&rows).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { .. }), "got {err:?}");
    }

    #[test]
    fn test_rows_round_trip_order() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let g = TemperatureGrid::from_rows(&rows).unwrap();
        assert_eq!(g.get(1, 0), Some(4.0));
        assert_eq!(g.to_rows(), rows);
    }

    #[test]
    fn test_laplacian_of_uniform_field_is_zero() {
        let g = TemperatureGrid::uniform(5, 5, 310.0).unwrap();
        let mut out = Array2::zeros((5, 5));
        g.laplacian_into(0.1, &mut out).unwrap();
        assert!(out.iter().all(|&v| v.abs() < 1e-9));
    }

    #[test]
    fn test_laplacian_point_source() {
        let mut g = TemperatureGrid::uniform(3, 3, 0.0).unwrap();
        g.values_mut()[[1, 1]] = 1.0;
        let mut out = Array2::zeros((3, 3));
        g.laplacian_into(1.0, &mut out).unwrap();
        assert!((out[[1, 1]] + 4.0).abs() < 1e-12);
        assert!((out[[0, 1]] - 1.0).abs() < 1e-12);
        assert!((out[[1, 2]] - 1.0).abs() < 1e-12);
        assert!(out[[0, 0]].abs() < 1e-12);
    }

    #[test]
    fn test_laplacian_edge_replication() {
        // Linear ramp along columns: interior second derivative is zero, and the
        // replicated edge makes the boundary value one-sided.
        let rows = vec![vec![0.0, 1.0, 2.0]];
        let g = TemperatureGrid::from_rows(&rows).unwrap();
        let mut out = Array2::zeros((1, 3));
        g.laplacian_into(1.0, &mut out).unwrap();
        assert!((out[[0, 1]]).abs() < 1e-12);
        assert!((out[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((out[[0, 2]] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_laplacian_shape_mismatch() {
        let g = TemperatureGrid::uniform(3, 3, 300.0).unwrap();
        let mut out = Array2::zeros((2, 3));
        assert!(matches!(
            g.laplacian_into(0.1, &mut out),
            Err(SimError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn test_clamp() {
        let mut g = TemperatureGrid::from_rows(&[vec![100.0, 300.0, 900.0]]).unwrap();
        g.clamp(250.0, 400.0);
        assert_eq!(g.to_rows(), vec![vec![250.0, 300.0, 400.0]]);
    }
}
