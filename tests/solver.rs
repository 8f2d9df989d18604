//! End-to-end solver scenarios.

use proptest::prelude::*;
use rug::ops::Pow;

use minimax::expr::Expression;
use minimax::poly::Polynomial;
use minimax::real::{self, Real};
use minimax::solver::RemezSolver;

fn solver_on(func: &str, order: usize, a: f64, b: f64) -> RemezSolver {
    let mut solver = RemezSolver::new();
    solver.set_order(order);
    solver.set_range(real::real(a), real::real(b));
    solver.set_func(Expression::parse(func).unwrap());
    solver.set_seed(0xa11ce);
    solver
}

/// Iterates until `do_step` reports convergence; false if it never does.
fn converge(solver: &mut RemezSolver) -> bool {
    for _ in 0..500 {
        if !solver.do_step() {
            return true;
        }
    }
    false
}

/// Maximum absolute error of `p` against `f` on a 101-point grid over
/// [a, b], in the user's variable.
fn grid_error(p: &Polynomial, f: &Expression, a: f64, b: f64) -> Real {
    let mut max = real::zero();
    for k in 0..=100 {
        let x = real::real(a + (b - a) * k as f64 / 100.0);
        let err = (p.eval(&x) - f.eval(&x).unwrap()).abs();
        if err > max {
            max = err;
        }
    }
    max
}

fn assert_equioscillation(solver: &RemezSolver) {
    let m = solver.max_error().clone();

    // Signs of the absolute error alternate between control points...
    let errs: Vec<Real> = solver
        .control_points()
        .iter()
        .map(|t| solver.error_at(t))
        .collect();
    for pair in errs.windows(2) {
        assert!(
            pair[0].clone() * &pair[1] <= 0,
            "error does not oscillate: {} then {}",
            pair[0],
            pair[1]
        );
    }

    // ...and the weighted error magnitude levels off at the maximum.
    for t in solver.control_points() {
        let e = solver.weighted_error_at(t);
        assert!(
            (e.clone() - &m).abs() < m.clone() * 1e-9,
            "weighted error {e} is away from the level {m}"
        );
    }
}

#[test]
fn identity_fit_is_exact() {
    let mut solver = solver_on("x", 1, -1.0, 1.0);
    solver.do_init();
    converge(&mut solver);

    assert!(*solver.max_error() < real::ten().pow(-100));

    let p = solver.get_estimate();
    assert!(p.coeff(0).clone().abs() < real::ten().pow(-100));
    assert!((p.coeff(1).clone() - 1).abs() < real::ten().pow(-100));
}

#[test]
fn constant_fit_skips_iteration() {
    let mut solver = solver_on("pi", 3, -1.0, 1.0);
    solver.do_init();

    // No iteration happens at all.
    assert!(!solver.do_step());

    let p = solver.get_estimate();
    assert_eq!(p.degree(), 0);
    assert!((p.coeff(0).clone() - real::pi()).abs() < 1e-30);
}

#[test]
fn classic_atan_exp() {
    let mut solver = solver_on("atan(exp(1+x))", 4, -1.0, 1.0);
    solver.do_init();
    assert!(converge(&mut solver), "did not converge");

    let m = solver.max_error().clone();
    assert!(m > 0);
    assert!(m < 1e-3);

    let control = solver.control_points();
    assert_eq!(control.len(), 6);
    assert_eq!(solver.zeros().len(), 5);
    assert_eq!(control[0], -1);
    assert_eq!(control[5], 1);

    // Control points and zeros interleave.
    for i in 0..5 {
        assert!(control[i] < solver.zeros()[i]);
        assert!(solver.zeros()[i] < control[i + 1]);
    }

    assert_equioscillation(&solver);

    // The zeros of the previous iterate still sit far below the level.
    for z in solver.zeros() {
        assert!(solver.error_at(z).abs() < m);
    }
}

#[test]
fn weighted_fit_changes_the_polynomial() {
    let mut plain = solver_on("atan(exp(1+x))", 4, -1.0, 1.0);
    plain.do_init();
    assert!(converge(&mut plain));

    let mut weighted = solver_on("atan(exp(1+x))", 4, -1.0, 1.0);
    weighted.set_weight(Expression::parse("exp(1+x)").unwrap());
    weighted.do_init();
    assert!(converge(&mut weighted));

    assert_equioscillation(&weighted);

    // A non-constant weight moves the coefficients.
    let p = plain.get_estimate();
    let q = weighted.get_estimate();
    let moved = p
        .coeffs()
        .iter()
        .zip(q.coeffs())
        .any(|(a, b)| (a.clone() - b).abs() > 1e-9);
    assert!(moved, "weighting had no effect");
}

#[test]
fn high_degree_exp_beats_taylor() {
    real::set_precision(256);

    let mut solver = solver_on("exp(x)", 8, 0.0, 1.0);
    solver.do_init();
    assert!(converge(&mut solver));

    let m = solver.max_error().clone();
    assert!(m > 0);
    assert!(m < 1e-10);

    // Degree-8 Taylor expansion of exp at 0.
    let mut factorial = 1u64;
    let taylor = Polynomial::from_coeffs(
        (0..=8u64)
            .map(|k| {
                if k > 0 {
                    factorial *= k;
                }
                real::real(1) / real::real(factorial)
            })
            .collect(),
    );

    let f = Expression::parse("exp(x)").unwrap();
    let mut taylor_worst = real::zero();
    for t in solver.control_points() {
        // Control points live on [-1, 1]; the range [0, 1] maps them
        // through x = t/2 + 1/2.
        let x = (t.clone() + 1) / 2;
        let err = (taylor.eval(&x) - f.eval(&x).unwrap()).abs();
        if err > taylor_worst {
            taylor_worst = err;
        }
    }

    assert!(
        taylor_worst > m,
        "Taylor ({taylor_worst}) should lose to minimax ({m})"
    );
}

#[test]
fn root_finder_strategies_agree() {
    use minimax::solver::RootFinder;

    let mut reference: Option<Real> = None;
    for finder in [
        RootFinder::Bisect,
        RootFinder::RegulaFalsi,
        RootFinder::Illinois,
        RootFinder::Pegasus,
        RootFinder::Ford,
    ] {
        let mut solver = solver_on("exp(x)", 3, -1.0, 1.0);
        solver.set_root_finder(finder);
        solver.do_init();
        assert!(converge(&mut solver), "{finder} did not converge");

        let m = solver.max_error().clone();
        match &reference {
            None => reference = Some(m),
            Some(expected) => {
                assert!(
                    (m.clone() - expected).abs() < expected.clone() * 1e-6,
                    "{finder} found a different level: {m} vs {expected}"
                );
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn minimax_beats_equally_spaced_interpolation(
        order in 2usize..=8,
        func_idx in 0usize..4,
        a in -0.5f64..0.0,
        width in 0.4f64..1.2,
    ) {
        let funcs = ["sin(x)", "exp(x)", "atan(x)", "log(1+x)"];
        let func = funcs[func_idx];
        let b = a + width;

        let mut solver = solver_on(func, order, a, b);
        solver.do_init();

        // The seed estimate interpolates f at N+1 equally-spaced nodes.
        let interpolant = solver.get_estimate();

        prop_assert!(converge(&mut solver), "did not converge");
        let best = solver.get_estimate();

        let f = Expression::parse(func).unwrap();
        let best_err = grid_error(&best, &f, a, b);
        let interp_err = grid_error(&interpolant, &f, a, b);
        prop_assert!(
            best_err <= interp_err,
            "minimax {} worse than interpolation {}",
            best_err,
            interp_err
        );

        // Equioscillation at the converged control points.
        let m = solver.max_error().clone();
        for t in solver.control_points() {
            let e = solver.weighted_error_at(t);
            prop_assert!(
                (e.clone() - &m).abs() < m.clone() * 1e-9,
                "weighted error {} is away from the level {}", e, m
            );
        }
    }
}
