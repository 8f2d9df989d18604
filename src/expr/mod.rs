//! Expression front end.
//!
//! Expressions are parsed into a flat postfix operation list with a constant
//! side table, then evaluated on a stack; see [`Expression::eval`].

mod literals;
mod ops;
mod parser;

pub use ops::{EvalError, Expression, Op};
pub use parser::{ExprParser, ParseError};
