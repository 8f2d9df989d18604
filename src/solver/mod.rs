//! Remez exchange solver.
//!
//! All internal work happens on the canonical interval [−1, 1]; the user
//! range [xmin, xmax] is reached through x = k₂·t + k₁. Each iteration
//! alternates a linear exchange step with concurrent searches for the error
//! function's zeros and extrema, dispatched bracket-by-bracket to a small
//! worker pool.

mod bracket;
mod pool;

pub use bracket::{Bracket, Point, RootFinder};

use std::sync::Arc;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rug::ops::Pow;

use crate::expr::Expression;
use crate::linalg::LinearSystem;
use crate::poly::Polynomial;
use crate::real::{self, Real};
use pool::{Job, Pool};

/// Evaluation context shared with the worker pool for one search phase.
///
/// Everything here is read-only, so workers evaluate concurrently without
/// synchronization.
pub struct ErrorFn {
    estimate: Polynomial,
    func: Expression,
    weight: Option<Expression>,
    k1: Real,
    k2: Real,
}

impl ErrorFn {
    /// F(t) = f(k₂·t + k₁).
    fn func_at(&self, t: &Real) -> Real {
        let x = self.k2.clone() * t + &self.k1;
        self.func.eval(&x).expect("function expression is well-formed")
    }

    /// W(t) = w(k₂·t + k₁), or 1 without a weight.
    fn weight_at(&self, t: &Real) -> Real {
        match &self.weight {
            Some(weight) => {
                let x = self.k2.clone() * t + &self.k1;
                weight.eval(&x).expect("weight expression is well-formed")
            }
            None => real::real(1),
        }
    }

    /// The signed absolute error p̂(t) − F(t). The weight cancels at zero
    /// crossings, so this is what the zero search refines.
    pub fn absolute(&self, t: &Real) -> Real {
        self.estimate.eval(t) - self.func_at(t)
    }

    /// The weighted relative error |(p̂(t) − F(t)) / W(t)| maximised by the
    /// extrema search.
    pub fn relative(&self, t: &Real) -> Real {
        (self.absolute(t) / self.weight_at(t)).abs()
    }
}

pub struct RemezSolver {
    order: usize,
    digits: u32,
    xmin: Real,
    xmax: Real,
    func: Expression,
    weight: Option<Expression>,
    finder: RootFinder,

    estimate: Polynomial,
    control: Vec<Real>,
    zeros: Vec<Real>,
    k1: Real,
    k2: Real,
    epsilon: Real,
    error: Real,
    done: bool,

    rng: StdRng,
    pool: Pool,
}

impl RemezSolver {
    pub fn new() -> RemezSolver {
        RemezSolver {
            order: 4,
            digits: 17,
            xmin: real::real(-1),
            xmax: real::real(1),
            func: Expression::default(),
            weight: None,
            finder: RootFinder::default(),
            estimate: Polynomial::zero(),
            control: Vec::new(),
            zeros: Vec::new(),
            k1: real::zero(),
            k2: real::real(1),
            epsilon: real::zero(),
            error: real::zero(),
            done: false,
            rng: StdRng::from_entropy(),
            pool: Pool::new(),
        }
    }

    /// Target polynomial degree.
    pub fn set_order(&mut self, order: usize) {
        assert!(order >= 1, "degree must be at least 1");
        self.order = order;
    }

    /// Number of significant digits carried into the stopping threshold
    /// ε = 10^−(digits+2).
    pub fn set_digits(&mut self, digits: u32) {
        self.digits = digits;
    }

    pub fn set_range(&mut self, xmin: Real, xmax: Real) {
        assert!(xmin < xmax, "range must satisfy xmin < xmax");
        self.xmin = xmin;
        self.xmax = xmax;
    }

    pub fn set_func(&mut self, func: Expression) {
        self.func = func;
    }

    /// Weight for the relative error. A constant weight scales the error
    /// uniformly and cannot move its extrema, so it is treated as absent.
    pub fn set_weight(&mut self, weight: Expression) {
        self.weight = (!weight.is_constant()).then_some(weight);
    }

    pub fn set_root_finder(&mut self, finder: RootFinder) {
        self.finder = finder;
    }

    /// Seeds the interior-probe randomization, for reproducible runs.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn max_error(&self) -> &Real {
        &self.error
    }

    /// Control points on [−1, 1]; valid after the first step.
    pub fn control_points(&self) -> &[Real] {
        &self.control
    }

    /// Error-function zeros on [−1, 1]; valid after `do_init`.
    pub fn zeros(&self) -> &[Real] {
        &self.zeros
    }

    pub fn epsilon(&self) -> &Real {
        &self.epsilon
    }

    /// The signed absolute error of the current estimate at t ∈ [−1, 1].
    pub fn error_at(&self, t: &Real) -> Real {
        self.error_fn().absolute(t)
    }

    /// The weighted relative error of the current estimate at t ∈ [−1, 1].
    pub fn weighted_error_at(&self, t: &Real) -> Real {
        self.error_fn().relative(t)
    }

    pub fn do_init(&mut self) {
        self.k1 = (self.xmax.clone() + &self.xmin) / 2;
        self.k2 = (self.xmax.clone() - &self.xmin) / 2;
        self.epsilon = real::ten().pow(-(self.digits as i32 + 2));
        self.error = real::zero();
        self.done = false;

        if self.func.is_constant() {
            // A constant function is its own best approximation.
            let value = self
                .func
                .eval(&real::zero())
                .expect("function expression is well-formed");
            self.estimate = Polynomial::constant(value);
            self.done = true;
            return;
        }

        self.remez_init();
    }

    /// Runs one iteration pair (extrema search, exchange step), then the
    /// zero search unless the maximum error has stabilized. Returns false
    /// once converged.
    pub fn do_step(&mut self) -> bool {
        if self.done {
            return false;
        }

        let old_error = self.error.clone();

        self.find_extrema();
        self.remez_step();

        let stabilized = self.error >= 0
            && (self.error.clone() - &old_error).abs()
                < self.error.clone() * &self.epsilon;
        if self.error.is_zero() || stabilized {
            return false;
        }

        self.find_zeros();
        true
    }

    /// The current estimate, rebased from [−1, 1] to the user's variable by
    /// composition with q(x) = x/k₂ − k₁/k₂.
    pub fn get_estimate(&self) -> Polynomial {
        let q = Polynomial::from_coeffs(vec![
            -(self.k1.clone() / &self.k2),
            real::real(1) / &self.k2,
        ]);
        self.estimate.compose(&q)
    }

    /// The first exchange step: interpolate F at N+1 seed nodes, giving an
    /// initial estimate whose error already changes sign between nodes.
    fn remez_init(&mut self) {
        let n = self.order;

        self.zeros = (0..=n)
            .map(|i| real::real(2 * i as i32 - n as i32) / (n as i32 + 1))
            .collect();
        self.control = vec![real::zero(); n + 2];

        let fxn: Vec<Real> =
            self.zeros.iter().map(|t| self.eval_func(t)).collect();

        // Row i holds the Chebyshev evaluations Tₙ(t_i).
        let mut system = LinearSystem::new(n + 1);
        for order in 0..=n {
            let basis = Polynomial::chebyshev(order);
            for i in 0..=n {
                system[i][order] = basis.eval(&self.zeros[i]);
            }
        }

        let inverse = system
            .inverse()
            .expect("distinct interpolation nodes give a regular system");

        self.estimate = Polynomial::zero();
        for order in 0..=n {
            let mut coeff = real::zero();
            for i in 0..=n {
                coeff += inverse[order][i].clone() * &fxn[i];
            }
            self.estimate =
                &self.estimate + &Polynomial::chebyshev(order).scale(&coeff);
        }
    }

    /// Every subsequent exchange step: solve the (N+2)-point system that
    /// both refines the estimate and levels the weighted error.
    fn remez_step(&mut self) {
        let t = Instant::now();
        let n = self.order;

        let fxn: Vec<Real> =
            self.control.iter().map(|t| self.eval_func(t)).collect();

        let mut system = LinearSystem::new(n + 2);
        for order in 0..=n {
            let basis = Polynomial::chebyshev(order);
            for i in 0..n + 2 {
                system[i][order] = basis.eval(&self.control[i]);
            }
        }

        // The last column carries the oscillating signed weight.
        for i in 0..n + 2 {
            let weight = self.eval_weight(&self.control[i]).abs();
            system[i][n + 1] = if i % 2 == 0 { weight } else { -weight };
        }

        let inverse = system
            .inverse()
            .expect("control points are distinct, the system is regular");

        self.estimate = Polynomial::zero();
        for order in 0..=n {
            let mut coeff = real::zero();
            for i in 0..n + 2 {
                coeff += inverse[order][i].clone() * &fxn[i];
            }
            self.estimate =
                &self.estimate + &Polynomial::chebyshev(order).scale(&coeff);
        }

        // The solved oscillation amplitude; convergence tracking uses the
        // measured maximum from the extrema search instead.
        let mut level = real::zero();
        for i in 0..n + 2 {
            level += inverse[n + 1][i].clone() * &fxn[i];
        }
        debug!("oscillation level {:e}", level);

        info!("exchange step took {:.3} ms", t.elapsed().as_secs_f64() * 1e3);
    }

    /// Finds the N+1 zeros of the absolute error, one per control-point
    /// pair, through the worker pool.
    fn find_zeros(&mut self) {
        let t = Instant::now();
        let n = self.order;
        let eval = Arc::new(self.error_fn());

        for (i, (a, b)) in self.control.iter().tuple_windows().enumerate() {
            let bracket = Bracket {
                a: Point::new(a.clone(), eval.absolute(a)),
                b: Point::new(b.clone(), eval.absolute(b)),
                c: Point::origin(),
            };
            self.pool.post(Job::Zero {
                index: i,
                bracket,
                eval: Arc::clone(&eval),
                finder: self.finder,
            });
        }

        let mut finished = 0;
        while finished < n + 1 {
            let (i, bracket) = self.pool.take();

            let width = (bracket.a.x.clone() - &bracket.b.x).abs();
            if bracket.c.err.is_zero() || width <= self.epsilon {
                self.zeros[i] = bracket.c.x;
                finished += 1;
                continue;
            }

            self.pool.post(Job::Zero {
                index: i,
                bracket,
                eval: Arc::clone(&eval),
                finder: self.finder,
            });
        }

        info!("zero search took {:.3} ms", t.elapsed().as_secs_f64() * 1e3);
    }

    /// Maximises the weighted relative error over the N+2 intervals bounded
    /// by consecutive zeros, relocating the interior control points and
    /// measuring the maximum error.
    fn find_extrema(&mut self) {
        let t = Instant::now();
        let n = self.order;
        let eval = Arc::new(self.error_fn());

        self.control[0] = real::real(-1);
        self.control[n + 1] = real::real(1);
        self.error = real::zero();

        for i in 0..n + 2 {
            let ax = if i == 0 {
                real::real(-1)
            } else {
                self.zeros[i - 1].clone()
            };
            let bx = if i == n + 1 {
                real::real(1)
            } else {
                self.zeros[i].clone()
            };

            // An off-centre probe keeps the first parabolic fit regular on
            // symmetric error shapes.
            let u: f64 = self.rng.gen_range(0.4..=0.6);
            let cx = ax.clone() + (bx.clone() - &ax) * real::real(u);

            let bracket = Bracket {
                a: Point::new(ax.clone(), eval.relative(&ax)),
                b: Point::new(bx.clone(), eval.relative(&bx)),
                c: Point::new(cx.clone(), eval.relative(&cx)),
            };
            self.pool.post(Job::Extremum {
                index: i,
                bracket,
                eval: Arc::clone(&eval),
            });
        }

        let mut finished = 0;
        while finished < n + 2 {
            let (i, bracket) = self.pool.take();

            let width = bracket.b.x.clone() - &bracket.a.x;
            if width <= self.epsilon {
                // The endpoints stay pinned at ±1; their brackets only
                // contribute to the measured maximum.
                if i > 0 && i < n + 1 {
                    self.control[i] = bracket.c.x;
                }
                if bracket.c.err > self.error {
                    self.error = bracket.c.err;
                }
                finished += 1;
                continue;
            }

            self.pool.post(Job::Extremum {
                index: i,
                bracket,
                eval: Arc::clone(&eval),
            });
        }

        debug!("max error {:e}", self.error);
        info!("extrema search took {:.3} ms", t.elapsed().as_secs_f64() * 1e3);
    }

    fn error_fn(&self) -> ErrorFn {
        ErrorFn {
            estimate: self.estimate.clone(),
            func: self.func.clone(),
            weight: self.weight.clone(),
            k1: self.k1.clone(),
            k2: self.k2.clone(),
        }
    }

    fn eval_func(&self, t: &Real) -> Real {
        let x = self.k2.clone() * t + &self.k1;
        self.func.eval(&x).expect("function expression is well-formed")
    }

    fn eval_weight(&self, t: &Real) -> Real {
        match &self.weight {
            Some(weight) => {
                let x = self.k2.clone() * t + &self.k1;
                weight.eval(&x).expect("weight expression is well-formed")
            }
            None => real::real(1),
        }
    }
}

impl Default for RemezSolver {
    fn default() -> Self {
        RemezSolver::new()
    }
}
