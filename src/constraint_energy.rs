//! Constraint acceleration-energy factorization and balancing.
//!
//! During the inward sweep every joint contributes a rank-one term `(1/D)·a·aᵀ` to the chain's
//! constraint acceleration-energy matrix, where `a` holds the joint-space projections of the
//! constraint wrenches. The matrix is never formed explicitly: it is kept as an `LDLᵀ`
//! factorization and updated in place with a signed rank-one update, after which the energy
//! balance is a pair of triangular solves.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Diagonal entries smaller than this are treated as zero during the balance solve.
pub const PIVOT_EPSILON: f64 = 1e-15;

/// `L·D·Lᵀ` factorization of a symmetric positive semi-definite `count×count` matrix.
///
/// Stored packed: the strict lower triangle holds the unit lower triangular `L` and the diagonal
/// holds `D`. The upper triangle is not used. A zero matrix represents `L = I, D = 0`, which is
/// the factorization of the zero matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct LdltFactorization {
    packed: DMatrix<f64>,
    work: DVector<f64>,
}

impl LdltFactorization {
    /// Factorization of the `count×count` zero matrix.
    pub fn zeros(count: usize) -> Self {
        LdltFactorization {
            packed: DMatrix::zeros(count, count),
            work: DVector::zeros(count),
        }
    }

    /// Factorization of a diagonal matrix.
    pub fn from_diagonal(diagonal: &[f64]) -> Self {
        let mut f = Self::zeros(diagonal.len());
        for (i, d) in diagonal.iter().enumerate() {
            f.packed[(i, i)] = *d;
        }
        f
    }

    pub fn dim(&self) -> usize {
        self.packed.nrows()
    }

    /// Packed factors, `L` below the diagonal and `D` on it.
    pub fn packed(&self) -> &DMatrix<f64> {
        &self.packed
    }

    pub fn reset(&mut self) {
        self.packed.fill(0.0);
    }

    /// Diagonal entry `D_ii`.
    pub fn pivot(&self, i: usize) -> f64 {
        self.packed[(i, i)]
    }

    /// Rebuilds `L·D·Lᵀ` as a dense matrix. Allocates, intended for inspection and tests.
    pub fn reconstruct(&self) -> DMatrix<f64> {
        let n = self.dim();
        let mut l = DMatrix::<f64>::identity(n, n);
        let mut d = DMatrix::<f64>::zeros(n, n);
        for i in 0..n {
            d[(i, i)] = self.packed[(i, i)];
            for j in 0..i {
                l[(i, j)] = self.packed[(i, j)];
            }
        }
        &l * d * l.transpose()
    }

    /// Sets `self` to the factorization of `source + alpha·x·xᵀ`, where `x(i)` yields the i-th
    /// element of the update vector.
    pub fn rank_one_update_from<F>(&mut self, source: &LdltFactorization, alpha: f64, x: F)
    where
        F: Fn(usize) -> f64,
    {
        assert_eq!(self.dim(), source.dim(), "factorizations must have the same size");
        self.packed.copy_from(&source.packed);
        self.rank_one_update(alpha, x);
    }

    /// Updates the factorization in place to that of `L·D·Lᵀ + alpha·x·xᵀ`.
    ///
    /// This is method C1 of Gill, Golub, Murray and Saunders (1974), the recurrence analysed by
    /// Sentana (1999) for signed rank-one updates. A pivot that ends up zero has no defined column
    /// in `L`: the column is left as it is and the remaining elements still see the reduction of
    /// the update vector. When a nonzero pivot is downdated to zero, the update is fully absorbed
    /// and the trailing pivots stay unchanged.
    pub fn rank_one_update<F>(&mut self, alpha: f64, x: F)
    where
        F: Fn(usize) -> f64,
    {
        let n = self.dim();
        for i in 0..n {
            self.work[i] = x(i);
        }

        let mut a = alpha;
        for j in 0..n {
            let p = self.work[j];
            let d_old = self.packed[(j, j)];
            let d_new = d_old + a * p * p;

            if d_new == 0.0 {
                self.packed[(j, j)] = 0.0;
                if d_old != 0.0 {
                    a = 0.0;
                }
                for i in j + 1..n {
                    self.work[i] -= p * self.packed[(i, j)];
                }
                continue;
            }

            let beta = p * a / d_new;
            a = d_old * a / d_new;
            self.packed[(j, j)] = d_new;
            for i in j + 1..n {
                self.work[i] -= p * self.packed[(i, j)];
                self.packed[(i, j)] += beta * self.work[i];
            }
        }
    }

    /// Solves `L·z = b` in place (forward substitution, unit diagonal).
    pub fn solve_unit_lower(&self, b: &mut DVector<f64>) {
        let n = self.dim();
        for i in 0..n {
            let mut sum = b[i];
            for j in 0..i {
                sum -= self.packed[(i, j)] * b[j];
            }
            b[i] = sum;
        }
    }

    /// Solves `Lᵀ·z = b` in place (back substitution, unit diagonal).
    pub fn solve_unit_lower_transposed(&self, b: &mut DVector<f64>) {
        let n = self.dim();
        for i in (0..n).rev() {
            let mut sum = b[i];
            for j in i + 1..n {
                sum -= self.packed[(j, i)] * b[j];
            }
            b[i] = sum;
        }
    }
}

/// Solves the energy balance `(L·D·Lᵀ)·scale = e_cstr`.
///
/// Pivots with magnitude below [`PIVOT_EPSILON`] are not inverted; the corresponding element is
/// set to zero so that redundant or inactive constraints contribute nothing. Returns the number
/// of truncated pivots.
pub fn balance(factorization: &LdltFactorization, e_cstr: &DVector<f64>, scale: &mut DVector<f64>)
               -> usize {
    assert_eq!(e_cstr.len(), factorization.dim());
    assert_eq!(scale.len(), factorization.dim());

    scale.copy_from(e_cstr);
    factorization.solve_unit_lower(scale);

    let mut truncated = 0;
    for i in 0..factorization.dim() {
        let d = factorization.pivot(i);
        if d.abs() < PIVOT_EPSILON {
            scale[i] = 0.0;
            truncated += 1;
        } else {
            scale[i] /= d;
        }
    }

    factorization.solve_unit_lower_transposed(scale);
    if truncated > 0 {
        trace!("energy balance truncated {truncated} of {} pivots", factorization.dim());
    }
    truncated
}
