use std::io::{self, Write};
use std::process;

use log::LevelFilter;

use minimax::diagnostics;
use minimax::expr::Expression;
use minimax::opts::Opts;
use minimax::output::{self, FloatType};
use minimax::real::{self, Real};
use minimax::solver::{RemezSolver, RootFinder};

fn main() {
    let opts = Opts::parse();

    let level = if opts.debug {
        LevelFilter::Debug
    } else if opts.stats {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .init();

    if let Some(bits) = opts.precision {
        if !(32..=65535).contains(&bits) {
            fail("invalid precision: must be between 32 and 65535");
        }
        real::set_precision(bits);
    }

    if let Some(src) = &opts.calc {
        let value = constant("expression", src);
        println!("{}", output::format_real(&value, 40));
        return;
    }

    if opts.degree < 1 {
        fail("invalid degree: must be at least 1");
    }

    let ty = float_type(&opts);
    let finder = root_finder(&opts);

    let Some((str_xmin, str_xmax)) = opts.range.split_once(':') else {
        fail("invalid range: expected xmin:xmax");
    };
    let xmin = constant("range bound", str_xmin);
    let xmax = constant("range bound", str_xmax);
    if xmin >= xmax {
        fail("invalid range: xmin >= xmax");
    }

    let Some(func_src) = opts.func.as_deref() else {
        fail("too few arguments: no function specified");
    };

    let mut solver = RemezSolver::new();
    solver.set_order(opts.degree);
    solver.set_digits(ty.digits());
    solver.set_range(xmin, xmax);
    solver.set_root_finder(finder);
    solver.set_func(parse("function", func_src));
    if let Some(weight_src) = opts.weight.as_deref() {
        solver.set_weight(parse("weight function", weight_src));
    }

    solver.do_init();
    for iteration in 0.. {
        eprint!("Iteration: {iteration}\r");
        let _ = io::stderr().flush();

        if !solver.do_step() {
            break;
        }

        if opts.progress {
            let estimate = solver.get_estimate();
            println!("{}", output::gnuplot(&estimate, ty.digits()));
            let _ = io::stdout().flush();
        }
    }
    eprintln!();

    let estimate = solver.get_estimate();
    print!(
        "{}",
        output::banner(
            func_src,
            opts.weight.as_deref(),
            str_xmin,
            str_xmax,
            estimate.degree(),
        )
    );
    print!("{}", output::source(&estimate, ty));
}

fn fail(message: &str) -> ! {
    println!("Error: {message}");
    println!("Try 'minimax --help' for more information.");
    process::exit(1);
}

fn parse(what: &str, src: &str) -> Expression {
    match Expression::parse(src) {
        Ok(expression) => expression,
        Err(err) => {
            diagnostics::report_parse_error(what, src, &err);
            fail(&format!("invalid {what}: {src}"));
        }
    }
}

/// Parses an expression required to be constant and evaluates it.
fn constant(what: &str, src: &str) -> Real {
    let expression = parse(what, src);
    if !expression.is_constant() {
        fail(&format!("invalid {what}: {src} must be constant"));
    }
    expression
        .eval(&real::zero())
        .expect("parsed expressions are well-formed")
}

fn float_type(opts: &Opts) -> FloatType {
    let mut chosen = None;
    let selected = [
        (opts.float, FloatType::Single),
        (opts.double, FloatType::Double),
        (opts.long_double, FloatType::Extended),
    ];

    for (on, ty) in selected {
        if on {
            if chosen.is_some() {
                fail("conflicting output types");
            }
            chosen = Some(ty);
        }
    }

    chosen.unwrap_or_default()
}

fn root_finder(opts: &Opts) -> RootFinder {
    let mut chosen = None;
    let selected = [
        (opts.bisect, RootFinder::Bisect),
        (opts.regula_falsi, RootFinder::RegulaFalsi),
        (opts.illinois, RootFinder::Illinois),
        (opts.pegasus, RootFinder::Pegasus),
        (opts.ford, RootFinder::Ford),
    ];

    for (on, finder) in selected {
        if on {
            if chosen.is_some() {
                fail("conflicting root-finder strategies");
            }
            chosen = Some(finder);
        }
    }

    chosen.unwrap_or_default()
}
