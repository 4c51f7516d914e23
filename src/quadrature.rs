//! Quadrature rules for the reference domains used by this crate.
//!
//! Rules are looked up by the *polynomial order* they must integrate exactly.
//! Points are stored in homogeneous/barycentric form: a rule on a
//! `d`-dimensional reference domain stores its points as a `(d + 1) x |points|`
//! matrix whose first row is the barycentric complement (for simplices) or the
//! constant 1 (for box domains), and whose last `d` rows are the reference
//! coordinates. Weights sum to the measure of the reference domain.
//!
//! The tables are stored as `f64` constants and converted to the working
//! scalar type on construction.

use crate::error::Error;
use crate::Real;
use itertools::Itertools;
use nalgebra::{convert, DMatrix, DMatrixView, DVector};

/// A quadrature rule on a reference domain.
///
/// See the [module documentation](self) for the storage conventions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule<T>
where
    T: Real,
{
    points: DMatrix<T>,
    weights: DVector<T>,
}

impl<T> QuadratureRule<T>
where
    T: Real,
{
    /// Builds a rule from flat, column-major `f64` tables.
    ///
    /// `points` must hold `|points|` columns of `dim + 1` homogeneous
    /// coordinates each.
    fn from_f64_parts(dim: usize, points: &[f64], weights: &[f64]) -> Self {
        let num_points = weights.len();
        assert_eq!(points.len(), (dim + 1) * num_points);
        let points = DMatrix::from_column_slice(dim + 1, num_points, points).map(|x| convert::<f64, T>(x));
        let weights = DVector::from_column_slice(weights).map(|x| convert::<f64, T>(x));
        Self { points, weights }
    }

    /// The number of quadrature points in the rule.
    pub fn num_points(&self) -> usize {
        self.weights.len()
    }

    /// The dimension `d` of the reference domain.
    pub fn reference_dim(&self) -> usize {
        self.points.nrows() - 1
    }

    /// The `(d + 1) x |points|` matrix of homogeneous/barycentric points.
    pub fn homogeneous_points(&self) -> &DMatrix<T> {
        &self.points
    }

    /// The `d x |points|` matrix of reference coordinates (the last `d` rows
    /// of the homogeneous points).
    pub fn reference_points(&self) -> DMatrixView<'_, T> {
        let d = self.reference_dim();
        self.points.rows(1, d)
    }

    /// The quadrature weights.
    pub fn weights(&self) -> &DVector<T> {
        &self.weights
    }
}

/// A symmetric quadrature rule on the unit triangle
/// `{ (x, y) : x, y >= 0, x + y <= 1 }`, exact for polynomials of the given
/// order.
///
/// Orders 1 through 5 are available. Weights sum to the triangle area `1/2`.
pub fn triangle_rule<T>(order: usize) -> Result<QuadratureRule<T>, Error>
where
    T: Real,
{
    // Barycentric coordinates (L0, L1, L2) per column; reference coordinates
    // are (L1, L2).
    let rule = match order.max(1) {
        1 => QuadratureRule::from_f64_parts(2, &[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], &[0.5]),
        2 => {
            #[rustfmt::skip]
            let points = [
                2.0 / 3.0, 1.0 / 6.0, 1.0 / 6.0,
                1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0,
                1.0 / 6.0, 1.0 / 6.0, 2.0 / 3.0,
            ];
            QuadratureRule::from_f64_parts(2, &points, &[1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0])
        }
        3 => {
            #[rustfmt::skip]
            let points = [
                1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0,
                0.6, 0.2, 0.2,
                0.2, 0.6, 0.2,
                0.2, 0.2, 0.6,
            ];
            let weights = [-27.0 / 96.0, 25.0 / 96.0, 25.0 / 96.0, 25.0 / 96.0];
            QuadratureRule::from_f64_parts(2, &points, &weights)
        }
        4 => {
            let a = 0.445_948_490_915_965;
            let b = 0.091_576_213_509_771;
            let wa = 0.111_690_794_839_005;
            let wb = 0.054_975_871_827_661;
            #[rustfmt::skip]
            let points = [
                1.0 - 2.0 * a, a, a,
                a, 1.0 - 2.0 * a, a,
                a, a, 1.0 - 2.0 * a,
                1.0 - 2.0 * b, b, b,
                b, 1.0 - 2.0 * b, b,
                b, b, 1.0 - 2.0 * b,
            ];
            QuadratureRule::from_f64_parts(2, &points, &[wa, wa, wa, wb, wb, wb])
        }
        5 => {
            let a = 0.470_142_064_105_115;
            let b = 0.101_286_507_323_456;
            let wa = 0.066_197_076_394_253;
            let wb = 0.062_969_590_272_414;
            #[rustfmt::skip]
            let points = [
                1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0,
                1.0 - 2.0 * a, a, a,
                a, 1.0 - 2.0 * a, a,
                a, a, 1.0 - 2.0 * a,
                1.0 - 2.0 * b, b, b,
                b, 1.0 - 2.0 * b, b,
                b, b, 1.0 - 2.0 * b,
            ];
            QuadratureRule::from_f64_parts(2, &points, &[0.1125, wa, wa, wa, wb, wb, wb])
        }
        order => {
            return Err(Error::NoRuleAvailable {
                reference_dim: 2,
                order,
            })
        }
    };
    Ok(rule)
}

/// A symmetric quadrature rule on the unit tetrahedron, exact for polynomials
/// of the given order.
///
/// Orders 1 through 4 are available. Weights sum to the tetrahedron volume
/// `1/6`. The order 3 and 4 rules contain a negative centroid weight.
pub fn tetrahedron_rule<T>(order: usize) -> Result<QuadratureRule<T>, Error>
where
    T: Real,
{
    let rule = match order.max(1) {
        1 => QuadratureRule::from_f64_parts(3, &[0.25, 0.25, 0.25, 0.25], &[1.0 / 6.0]),
        2 => {
            // a = (5 - sqrt(5)) / 20, b = (5 + 3 sqrt(5)) / 20
            let a = 0.138_196_601_125_011;
            let b = 0.585_410_196_624_969;
            #[rustfmt::skip]
            let points = [
                b, a, a, a,
                a, b, a, a,
                a, a, b, a,
                a, a, a, b,
            ];
            let weights = [1.0 / 24.0; 4];
            QuadratureRule::from_f64_parts(3, &points, &weights)
        }
        3 => {
            let h = 1.0 / 6.0;
            #[rustfmt::skip]
            let points = [
                0.25, 0.25, 0.25, 0.25,
                0.5, h, h, h,
                h, 0.5, h, h,
                h, h, 0.5, h,
                h, h, h, 0.5,
            ];
            let weights = [-2.0 / 15.0, 3.0 / 40.0, 3.0 / 40.0, 3.0 / 40.0, 3.0 / 40.0];
            QuadratureRule::from_f64_parts(3, &points, &weights)
        }
        4 => {
            // 11-point Keast rule.
            let a = 1.0 / 14.0;
            let c = 11.0 / 14.0;
            let b = 0.399_403_576_166_799;
            let d = 0.100_596_423_833_201;
            let w0 = -74.0 / 5625.0;
            let wa = 343.0 / 45000.0;
            let wb = 28.0 / 1125.0;
            #[rustfmt::skip]
            let points = [
                0.25, 0.25, 0.25, 0.25,
                c, a, a, a,
                a, c, a, a,
                a, a, c, a,
                a, a, a, c,
                b, b, d, d,
                b, d, b, d,
                b, d, d, b,
                d, b, b, d,
                d, b, d, b,
                d, d, b, b,
            ];
            let weights = [w0, wa, wa, wa, wa, wb, wb, wb, wb, wb, wb];
            QuadratureRule::from_f64_parts(3, &points, &weights)
        }
        order => {
            return Err(Error::NoRuleAvailable {
                reference_dim: 3,
                order,
            })
        }
    };
    Ok(rule)
}

/// A tensor-product Gauss-Legendre rule on the box `[-1, 1]^dim`, exact for
/// polynomials of the given order in each variable.
///
/// Orders 1 through 5 are available, using 1 to 3 points per axis. Weights sum
/// to the box volume `2^dim`. The homogeneous coordinate of every point is 1.
pub fn gauss_box_rule<T>(dim: usize, order: usize) -> Result<QuadratureRule<T>, Error>
where
    T: Real,
{
    // An n-point Gauss-Legendre rule is exact for polynomials of order 2n - 1.
    let (points_1d, weights_1d): (&[f64], &[f64]) = match order.max(1) {
        1 => (&[0.0], &[2.0]),
        2 | 3 => (
            &[-0.577_350_269_189_625_8, 0.577_350_269_189_625_8],
            &[1.0, 1.0],
        ),
        4 | 5 => (
            &[-0.774_596_669_241_483_4, 0.0, 0.774_596_669_241_483_4],
            &[5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0],
        ),
        order => {
            return Err(Error::NoRuleAvailable {
                reference_dim: dim,
                order,
            })
        }
    };

    let n = points_1d.len();
    let mut points = Vec::new();
    let mut weights = Vec::new();
    for combination in (0..dim).map(|_| 0..n).multi_cartesian_product() {
        points.push(1.0);
        let mut weight = 1.0;
        for &i in &combination {
            points.push(points_1d[i]);
            weight *= weights_1d[i];
        }
        weights.push(weight);
    }
    Ok(QuadratureRule::from_f64_parts(dim, &points, &weights))
}
