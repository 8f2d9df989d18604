//! Brackets and per-bracket refinement steps.

use std::str::FromStr;

use strum_macros::{Display, EnumString};

use crate::real::Real;

/// An abscissa together with its evaluated error.
#[derive(Clone, Debug)]
pub struct Point {
    pub x: Real,
    pub err: Real,
}

impl Point {
    pub fn new(x: Real, err: Real) -> Point {
        Point { x, err }
    }

    /// A placeholder probe; its zero error never triggers the
    /// Illinois-family rescalings.
    pub fn origin() -> Point {
        Point {
            x: crate::real::zero(),
            err: crate::real::zero(),
        }
    }
}

/// Strategy used to drive a zero bracket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum RootFinder {
    Bisect,
    RegulaFalsi,
    Illinois,
    #[default]
    Pegasus,
    Ford,
}

impl RootFinder {
    /// All strategies, paired with their command-line names.
    pub fn named(name: &str) -> Option<RootFinder> {
        RootFinder::from_str(name).ok()
    }
}

/// A refinement interval: endpoints `a` and `b` and the current probe `c`.
///
/// Exactly one party, the main loop or a single worker, holds a bracket at
/// any time; refinement steps mutate it in place.
#[derive(Clone, Debug)]
pub struct Bracket {
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

impl Bracket {
    /// One zero-search step. The probe replaces the endpoint whose error has
    /// the probe's sign, keeping the sign change inside [a, b].
    pub fn refine_zero<F>(&mut self, finder: RootFinder, error: F)
    where
        F: Fn(&Real) -> Real,
    {
        let old = self.c.clone();

        let x = match finder {
            RootFinder::Bisect => (self.a.x.clone() + &self.b.x) / 2,
            _ => {
                // Regula falsi: the secant's intersection with zero.
                let dx = self.b.x.clone() - &self.a.x;
                let de = self.b.err.clone() - &self.a.err;
                self.a.x.clone() - self.a.err.clone() * dx / de
            }
        };
        let err = error(&x);
        let probe = Point::new(x, err);

        let same_is_a =
            self.a.err.is_sign_negative() == probe.err.is_sign_negative();
        let (same, other) = if same_is_a {
            (&mut self.a, &mut self.b)
        } else {
            (&mut self.b, &mut self.a)
        };

        // Two successive probes on the same side starve the far endpoint;
        // the Illinois family rescales its error to restore progress.
        if !old.err.is_zero()
            && old.err.is_sign_negative() == probe.err.is_sign_negative()
        {
            match finder {
                RootFinder::Illinois => other.err /= 2,
                RootFinder::Pegasus => {
                    let denom = old.err.clone() + &probe.err;
                    other.err *= old.err / denom;
                }
                RootFinder::Ford => {
                    let scale = 1 - probe.err.clone() / &same.err
                        - probe.err.clone() / &other.err;
                    other.err *= scale;
                }
                RootFinder::Bisect | RootFinder::RegulaFalsi => {}
            }
        }

        *same = probe.clone();
        self.c = probe;
    }

    /// One extremum-search step: successive parabolic interpolation through
    /// (a, c, b), falling back to the midpoint when the parabola
    /// degenerates or lands outside the bracket.
    pub fn refine_extremum<F>(&mut self, error: F)
    where
        F: Fn(&Real) -> Real,
    {
        let (a, b, c) = (&self.a, &self.b, &self.c);

        let d1 = c.x.clone() - &a.x;
        let d2 = c.x.clone() - &b.x;
        let k1 = d1.clone() * (c.err.clone() - &b.err);
        let k2 = d2.clone() * (c.err.clone() - &a.err);
        let mut x: Real = c.x.clone() - (d1 * &k1 - d2 * &k2) / (k1 - k2) / 2;

        if !x.is_finite() || x <= a.x || x >= b.x {
            x = (a.x.clone() + &b.x) / 2;
        }

        let err = error(&x);
        let probe = Point::new(x, err);

        if probe.err < self.c.err {
            // A worse probe tightens the bracket on its own side of c.
            if probe.x > self.c.x {
                self.b = probe;
            } else {
                self.a = probe;
            }
        } else {
            // A better probe takes over as c; the old c becomes the
            // opposite endpoint.
            if probe.x > self.c.x {
                self.a = self.c.clone();
            } else {
                self.b = self.c.clone();
            }
            self.c = probe;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::real::{self, Real};

    fn bracket_for<F>(a: f64, b: f64, error: F) -> Bracket
    where
        F: Fn(&Real) -> Real,
    {
        let ax = real::real(a);
        let bx = real::real(b);
        Bracket {
            a: Point::new(ax.clone(), error(&ax)),
            b: Point::new(bx.clone(), error(&bx)),
            c: Point::origin(),
        }
    }

    #[test]
    fn strategy_names() {
        assert_eq!(RootFinder::named("bisect"), Some(RootFinder::Bisect));
        assert_eq!(
            RootFinder::named("regula-falsi"),
            Some(RootFinder::RegulaFalsi)
        );
        assert_eq!(RootFinder::named("pegasus"), Some(RootFinder::Pegasus));
        assert_eq!(RootFinder::named("brent"), None);
        assert_eq!(RootFinder::Illinois.to_string(), "illinois");
        assert_eq!(RootFinder::default(), RootFinder::Pegasus);
    }

    #[test]
    fn bisection_halves_the_bracket() {
        // f(x) = x² − 2 changes sign on [0, 2].
        let f = |x: &Real| x.clone() * x - 2;
        let mut bracket = bracket_for(0.0, 2.0, f);

        bracket.refine_zero(RootFinder::Bisect, f);
        assert_eq!(bracket.c.x, 1);
        // f(1) < 0, so the probe replaced a.
        assert_eq!(bracket.a.x, 1);
        assert_eq!(bracket.b.x, 2);

        for _ in 0..200 {
            bracket.refine_zero(RootFinder::Bisect, f);
        }
        let root = real::real(2).sqrt();
        assert!((bracket.c.x.clone() - root).abs() < 1e-30);
    }

    #[test]
    fn illinois_family_converges_where_regula_falsi_crawls() {
        let f = |x: &Real| x.clone() * x * x - 2;

        for finder in [
            RootFinder::RegulaFalsi,
            RootFinder::Illinois,
            RootFinder::Pegasus,
            RootFinder::Ford,
        ] {
            let mut bracket = bracket_for(0.0, 2.0, f);
            for _ in 0..300 {
                bracket.refine_zero(finder, f);
                if bracket.c.err.is_zero() {
                    break;
                }
            }
            let root = real::real(2).cbrt();
            assert!(
                (bracket.c.x.clone() - root).abs() < 1e-15,
                "{finder} missed the root: {}",
                bracket.c.x
            );
        }
    }

    #[test]
    fn parabolic_step_finds_an_interior_maximum() {
        // Maximize 1 − (x − 0.25)² on [−1, 1].
        let f = |x: &Real| {
            let d = x.clone() - 0.25f64;
            1 - d.clone() * d
        };

        let cx = real::real(-0.5);
        let mut bracket = bracket_for(-1.0, 1.0, f);
        bracket.c = Point::new(cx.clone(), f(&cx));

        for _ in 0..300 {
            bracket.refine_extremum(f);
            if bracket.b.x.clone() - &bracket.a.x < 1e-40 {
                break;
            }
        }

        assert!((bracket.c.x.clone() - 0.25f64).abs() < 1e-30);
        assert!((bracket.c.err.clone() - 1).abs() < 1e-30);
    }
}
