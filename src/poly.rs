//! Dense polynomials over working-precision reals.

use std::ops::{Add, Mul, Sub};

use crate::real::{self, Real};

/// Polynomial in the monomial basis, constant coefficient first.
#[derive(Clone, Debug)]
pub struct Polynomial {
    coeffs: Vec<Real>,
}

impl Polynomial {
    /// The zero polynomial (degree 0).
    pub fn zero() -> Polynomial {
        Polynomial {
            coeffs: vec![real::zero()],
        }
    }

    pub fn constant(value: Real) -> Polynomial {
        Polynomial {
            coeffs: vec![value],
        }
    }

    pub fn from_coeffs(coeffs: Vec<Real>) -> Polynomial {
        assert!(!coeffs.is_empty(), "a polynomial has at least one coefficient");
        Polynomial { coeffs }
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn coeff(&self, i: usize) -> &Real {
        &self.coeffs[i]
    }

    pub fn coeffs(&self) -> &[Real] {
        &self.coeffs
    }

    /// Evaluates the polynomial at `x` in Horner form.
    pub fn eval(&self, x: &Real) -> Real {
        let mut acc = real::zero();
        for c in self.coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    /// The composition `self(inner(x))`, again by Horner's rule.
    pub fn compose(&self, inner: &Polynomial) -> Polynomial {
        let mut coeffs = self.coeffs.iter().rev();
        let top = coeffs.next().expect("coefficients are never empty");

        let mut acc = Polynomial::constant(top.clone());
        for c in coeffs {
            acc = &acc * inner;
            acc.coeffs[0] += c;
        }
        acc
    }

    /// Multiplies every coefficient by `k`.
    pub fn scale(&self, k: &Real) -> Polynomial {
        Polynomial {
            coeffs: self.coeffs.iter().map(|c| c.clone() * k).collect(),
        }
    }

    /// The degree-`n` Chebyshev polynomial of the first kind, in the
    /// monomial basis: T₀ = 1, T₁ = x, Tₙ = 2x·Tₙ₋₁ − Tₙ₋₂.
    pub fn chebyshev(n: usize) -> Polynomial {
        let mut prev = Polynomial::constant(real::real(1));
        if n == 0 {
            return prev;
        }

        let mut curr = Polynomial::from_coeffs(vec![real::zero(), real::real(1)]);
        let two_x = Polynomial::from_coeffs(vec![real::zero(), real::real(2)]);

        for _ in 1..n {
            let next = &(&two_x * &curr) - &prev;
            prev = curr;
            curr = next;
        }
        curr
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = vec![real::zero(); self.coeffs.len().max(rhs.coeffs.len())];
        for (i, c) in coeffs.iter_mut().enumerate() {
            if let Some(a) = self.coeffs.get(i) {
                *c += a;
            }
            if let Some(b) = rhs.coeffs.get(i) {
                *c += b;
            }
        }
        Polynomial { coeffs }
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = vec![real::zero(); self.coeffs.len().max(rhs.coeffs.len())];
        for (i, c) in coeffs.iter_mut().enumerate() {
            if let Some(a) = self.coeffs.get(i) {
                *c += a;
            }
            if let Some(b) = rhs.coeffs.get(i) {
                *c -= b;
            }
        }
        Polynomial { coeffs }
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs =
            vec![real::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a.clone() * b;
            }
        }
        Polynomial { coeffs }
    }
}

#[cfg(test)]
mod tests {
    use rug::ops::Pow;

    use super::*;

    fn poly(coeffs: &[i32]) -> Polynomial {
        Polynomial::from_coeffs(coeffs.iter().map(|&c| real::real(c)).collect())
    }

    #[test]
    fn horner_evaluation() {
        // 1 + 2x + 3x² at x = 2
        let p = poly(&[1, 2, 3]);
        assert_eq!(p.eval(&real::real(2)), 17);
    }

    #[test]
    fn chebyshev_basis() {
        assert_eq!(Polynomial::chebyshev(0).coeffs(), [real::real(1)]);
        assert_eq!(
            Polynomial::chebyshev(1).coeffs(),
            [real::zero(), real::real(1)]
        );
        // T₂ = 2x² − 1
        assert_eq!(
            Polynomial::chebyshev(2).coeffs(),
            [real::real(-1), real::zero(), real::real(2)]
        );
        // T₃ = 4x³ − 3x
        assert_eq!(
            Polynomial::chebyshev(3).coeffs(),
            [real::zero(), real::real(-3), real::zero(), real::real(4)]
        );
    }

    #[test]
    fn chebyshev_identity_at_angles() {
        // Tₙ(cos θ) = cos(nθ)
        let theta = real::pi() / 5;
        let t = Polynomial::chebyshev(7);
        let lhs = t.eval(&theta.clone().cos());
        let rhs = (theta * 7).cos();
        assert!((lhs - rhs).abs() < real::ten().pow(-100));
    }

    #[test]
    fn composition() {
        // p(x) = x² + 1, q(x) = x − 2, p(q(3)) = 2
        let p = poly(&[1, 0, 1]);
        let q = poly(&[-2, 1]);
        let composed = p.compose(&q);
        assert_eq!(composed.eval(&real::real(3)), 2);
        assert_eq!(composed.degree(), 2);
    }

    #[test]
    fn arithmetic() {
        let p = poly(&[1, 2]);
        let q = poly(&[0, 1, 5]);
        assert_eq!((&p + &q).coeffs(), poly(&[1, 3, 5]).coeffs());
        assert_eq!((&q - &p).coeffs(), poly(&[-1, -1, 5]).coeffs());
        assert_eq!((&p * &q).coeffs(), poly(&[0, 1, 7, 10]).coeffs());
        assert_eq!(p.scale(&real::real(3)).coeffs(), poly(&[3, 6]).coeffs());
    }
}
