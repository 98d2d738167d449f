use rand::Rng;

use crate::model::{CalculationRequest, MatrixError};

/// The solver only visualizes matrices up to this size.
pub const MAX_SIZE: usize = 3;


/// Matrix being edited in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixInput {
    rows: usize,
    cols: usize,
    cells: [[f64; MAX_SIZE]; MAX_SIZE],
}

impl Default for MatrixInput {
    fn default() -> Self {
        let mut input = Self {
            rows: MAX_SIZE,
            cols: MAX_SIZE,
            cells: [[0.0; MAX_SIZE]; MAX_SIZE],
        };
        input.fill_identity_like(0, 0);
        input
    }
}

impl MatrixInput {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_mut(&mut self, r: usize, c: usize) -> &mut f64 {
        &mut self.cells[r][c]
    }

    /// Changes the shape. Entries inside the old shape are kept, new ones are
    /// 1 on the diagonal and 0 elsewhere.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        let rows = rows.clamp(1, MAX_SIZE);
        let cols = cols.clamp(1, MAX_SIZE);
        let (old_rows, old_cols) = (self.rows, self.cols);
        self.rows = rows;
        self.cols = cols;
        self.fill_identity_like(old_rows, old_cols);
    }

    fn fill_identity_like(&mut self, keep_rows: usize, keep_cols: usize) {
        for r in 0..MAX_SIZE {
            for c in 0..MAX_SIZE {
                if r >= keep_rows || c >= keep_cols {
                    self.cells[r][c] = if r == c { 1.0 } else { 0.0 };
                }
            }
        }
    }

    /// `[[1,2,3],[4,5,6],[7,8,9]]`, which has rank 2.
    pub fn load_example(&mut self) {
        self.rows = 3;
        self.cols = 3;
        self.cells = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
    }

    /// Random entries in `-range..=range`, in multiples of `step`.
    pub fn randomize(&mut self, range: f64, step: f64) {
        let mut rng = rand::thread_rng();
        let max = (range / step) as i32;
        for r in 0..self.rows {
            for c in 0..self.cols {
                self.cells[r][c] = rng.gen_range(-max..=max) as f64 * step;
            }
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.cells[..self.rows].iter().map(|row| row[..self.cols].to_vec()).collect()
    }

    pub fn to_request(&self) -> Result<CalculationRequest, MatrixError> {
        CalculationRequest::new(self.to_rows())
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn starts_as_identity() {
        let input = MatrixInput::default();
        assert_eq!(
            input.to_rows(),
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn resize_keeps_overlap_and_fills_identity_like() {
        let mut input = MatrixInput::default();
        input.load_example();
        input.resize(2, 2);
        assert_eq!(input.to_rows(), vec![vec![1.0, 2.0], vec![4.0, 5.0]]);
        input.resize(3, 2);
        assert_eq!(input.to_rows(), vec![vec![1.0, 2.0], vec![4.0, 5.0], vec![0.0, 0.0]]);
        input.resize(3, 3);
        assert_eq!(
            input.to_rows(),
            vec![vec![1.0, 2.0, 0.0], vec![4.0, 5.0, 0.0], vec![0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn size_is_clamped() {
        let mut input = MatrixInput::default();
        input.resize(0, 7);
        assert_eq!((input.rows(), input.cols()), (1, 3));
        assert!(input.to_request().is_ok());
    }

    #[test]
    fn random_entries_are_on_the_grid() {
        let mut input = MatrixInput::default();
        input.randomize(3.0, 0.5);
        for row in input.to_rows() {
            for x in row {
                assert!((-3.0..=3.0).contains(&x));
                assert_eq!((x * 2.0).fract(), 0.0);
            }
        }
    }
}
