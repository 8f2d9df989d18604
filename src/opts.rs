//! Command-line options.

use argh::FromArgs;

/// Find a minimax polynomial approximation for a function of x.
#[derive(FromArgs)]
pub struct Opts {
    /// degree of the final polynomial
    #[argh(option, short = 'd', default = "4")]
    pub degree: usize,

    /// range over which to approximate, as xmin:xmax
    #[argh(option, short = 'r', default = "String::from(\"-1:1\")")]
    pub range: String,

    /// working precision in bits, 32 to 65535
    #[argh(option, short = 'p')]
    pub precision: Option<u32>,

    /// print coefficients for single precision
    #[argh(switch)]
    pub float: bool,

    /// print coefficients for double precision (default)
    #[argh(switch)]
    pub double: bool,

    /// print coefficients for extended precision
    #[argh(switch)]
    pub long_double: bool,

    /// find zeros by bisection
    #[argh(switch)]
    pub bisect: bool,

    /// find zeros by regula falsi
    #[argh(switch)]
    pub regula_falsi: bool,

    /// find zeros by the Illinois variant
    #[argh(switch)]
    pub illinois: bool,

    /// find zeros by the Pegasus variant (default)
    #[argh(switch)]
    pub pegasus: bool,

    /// find zeros by the Ford variant
    #[argh(switch)]
    pub ford: bool,

    /// print the estimate after each iteration
    #[argh(switch)]
    pub progress: bool,

    /// log per-phase timings
    #[argh(switch)]
    pub stats: bool,

    /// log internal solver scalars
    #[argh(switch)]
    pub debug: bool,

    /// evaluate a constant expression and exit
    #[argh(option)]
    pub calc: Option<String>,

    /// function to approximate
    #[argh(positional)]
    pub func: Option<String>,

    /// optional weight function
    #[argh(positional)]
    pub weight: Option<String>,
}

impl Opts {
    /// Parse options from `env::args`.
    pub fn parse() -> Opts {
        argh::from_env()
    }
}
