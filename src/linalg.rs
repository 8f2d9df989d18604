//! Dense square matrices for the exchange-step linear systems.

use std::ops::{Index, IndexMut};

use crate::real::{self, Real};

/// An N×N matrix of reals, indexed `[row][column]`.
#[derive(Clone, Debug)]
pub struct LinearSystem {
    size: usize,
    rows: Vec<Vec<Real>>,
}

impl LinearSystem {
    /// A zero-filled system.
    pub fn new(size: usize) -> LinearSystem {
        assert!(size > 0, "a linear system has at least one row");
        LinearSystem {
            size,
            rows: vec![vec![real::zero(); size]; size],
        }
    }

    pub fn identity(size: usize) -> LinearSystem {
        let mut system = LinearSystem::new(size);
        for i in 0..size {
            system.rows[i][i] = real::real(1);
        }
        system
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Gauss–Jordan inversion, or `None` if the matrix is singular.
    ///
    /// A zero diagonal term is repaired by adding the first lower row with a
    /// non-zero entry in that column; rows are combined, never swapped, so
    /// the partially-built inverse stays consistent.
    pub fn inverse(mut self) -> Option<LinearSystem> {
        let n = self.size;
        let mut inverse = LinearSystem::identity(n);

        for i in 0..n {
            if self.rows[i][i].is_zero() {
                let j = (i + 1..n).find(|&j| !self.rows[j][i].is_zero())?;

                let donor = self.rows[j].clone();
                let inv_donor = inverse.rows[j].clone();
                for k in 0..n {
                    self.rows[i][k] += &donor[k];
                    inverse.rows[i][k] += &inv_donor[k];
                }
            }

            // Clear column i everywhere else, then normalize the pivot row.
            let pivot = self.rows[i][i].clone();
            let pivot_row = self.rows[i].clone();
            let inv_pivot_row = inverse.rows[i].clone();

            for j in 0..n {
                if j == i {
                    continue;
                }
                let mul = self.rows[j][i].clone() / &pivot;
                for k in 0..n {
                    self.rows[j][k] -= mul.clone() * &pivot_row[k];
                    inverse.rows[j][k] -= mul.clone() * &inv_pivot_row[k];
                }
            }

            for k in 0..n {
                self.rows[i][k] /= &pivot;
                inverse.rows[i][k] /= &pivot;
            }
        }

        Some(inverse)
    }
}

impl Index<usize> for LinearSystem {
    type Output = [Real];

    fn index(&self, row: usize) -> &[Real] {
        &self.rows[row]
    }
}

impl IndexMut<usize> for LinearSystem {
    fn index_mut(&mut self, row: usize) -> &mut [Real] {
        &mut self.rows[row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[i32]]) -> LinearSystem {
        let mut system = LinearSystem::new(rows.len());
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                system[i][j] = real::real(value);
            }
        }
        system
    }

    fn assert_product_is_identity(a: &LinearSystem, b: &LinearSystem) {
        let n = a.size();
        for i in 0..n {
            for j in 0..n {
                let mut sum = real::zero();
                for k in 0..n {
                    sum += a[i][k].clone() * &b[k][j];
                }
                let expected = i32::from(i == j);
                assert!(
                    (sum.clone() - expected).abs() < 1e-100,
                    "entry ({i},{j}) = {sum}"
                );
            }
        }
    }

    #[test]
    fn inverts_a_small_system() {
        let a = from_rows(&[&[2, 1], &[1, 1]]);
        let inverse = a.clone().inverse().unwrap();

        assert_eq!(inverse[0][0], 1);
        assert_eq!(inverse[0][1], -1);
        assert_eq!(inverse[1][0], -1);
        assert_eq!(inverse[1][1], 2);

        assert_product_is_identity(&a, &inverse);
    }

    #[test]
    fn repairs_zero_diagonal_without_swapping() {
        let a = from_rows(&[&[0, 1], &[1, 0]]);
        let inverse = a.clone().inverse().unwrap();
        assert_product_is_identity(&a, &inverse);
    }

    #[test]
    fn zero_column_below_the_diagonal_is_singular() {
        let a = from_rows(&[&[0, 1], &[0, 1]]);
        assert!(a.inverse().is_none());
    }

    #[test]
    fn larger_system_round_trip() {
        let a = from_rows(&[&[3, 0, 2], &[2, 0, -2], &[0, 1, 1]]);
        let inverse = a.clone().inverse().unwrap();
        assert_product_is_identity(&a, &inverse);
    }
}
