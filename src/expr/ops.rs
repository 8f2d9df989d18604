//! Postfix operations and stack evaluation.

use std::fmt;

use rug::ops::Pow;
use rug::Float;
use smallvec::SmallVec;

use crate::real::{self, Real};

/// One postfix operation. `Const` carries an index into the expression's
/// constant table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Op {
    VarX,  VarY,  Const(usize),
    Plus,  Minus, Abs,     Sqrt,     Cbrt,
    Exp,   Exp2,  Erf,     Log,      Log2,
    Log10, Sin,   Cos,     Tan,      Asin,
    Acos,  Atan,  Sinh,    Cosh,     Tanh,
    Add,   Sub,   Mul,     Div,      Mod,
    Atan2, Pow,   Min,     Max,      Fmod,
    ToFloat,      ToDouble,          ToLDouble,
}

impl Op {
    /// The operation named by a function keyword in the grammar.
    pub fn from_name(name: &str) -> Option<Op> {
        match name {
            "abs" => Some(Op::Abs),
            "sqrt" => Some(Op::Sqrt),
            "cbrt" => Some(Op::Cbrt),
            "exp" => Some(Op::Exp),
            "exp2" => Some(Op::Exp2),
            "erf" => Some(Op::Erf),
            "log" => Some(Op::Log),
            "log2" => Some(Op::Log2),
            "log10" => Some(Op::Log10),
            "sin" => Some(Op::Sin),
            "cos" => Some(Op::Cos),
            "tan" => Some(Op::Tan),
            "asin" => Some(Op::Asin),
            "acos" => Some(Op::Acos),
            "atan" => Some(Op::Atan),
            "sinh" => Some(Op::Sinh),
            "cosh" => Some(Op::Cosh),
            "tanh" => Some(Op::Tanh),
            "float" => Some(Op::ToFloat),
            "double" => Some(Op::ToDouble),
            "ldouble" => Some(Op::ToLDouble),
            "atan2" => Some(Op::Atan2),
            "pow" => Some(Op::Pow),
            "min" => Some(Op::Min),
            "max" => Some(Op::Max),
            "fmod" => Some(Op::Fmod),
            _ => None,
        }
    }

    /// Number of stack operands the operation consumes.
    pub fn arity(&self) -> usize {
        match self {
            Op::VarX | Op::VarY | Op::Const(_) => 0,
            Op::Add
            | Op::Sub
            | Op::Mul
            | Op::Div
            | Op::Mod
            | Op::Atan2
            | Op::Pow
            | Op::Min
            | Op::Max
            | Op::Fmod => 2,
            _ => 1,
        }
    }
}

/// The operation sequence violated the stack discipline. Cannot occur for
/// parser-produced expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalError;

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "malformed operation sequence")
    }
}

impl std::error::Error for EvalError {}

/// A parsed arithmetic expression: a postfix operation list plus its
/// constant table. Immutable once parsed.
#[derive(Clone, Debug, Default)]
pub struct Expression {
    ops: Vec<Op>,
    constants: Vec<Real>,
}

impl Expression {
    /// A single variable or other zero-arity operation.
    pub(crate) fn leaf(op: Op) -> Expression {
        Expression {
            ops: vec![op],
            constants: Vec::new(),
        }
    }

    /// A single literal value.
    pub(crate) fn constant(value: Real) -> Expression {
        Expression {
            ops: vec![Op::Const(0)],
            constants: vec![value],
        }
    }

    /// Appends an operation over the values already on the stack.
    pub(crate) fn push(mut self, op: Op) -> Expression {
        self.ops.push(op);
        self
    }

    /// Concatenates another operand's operations, rebasing its constant
    /// indices past this expression's table.
    pub(crate) fn merge(mut self, rhs: Expression) -> Expression {
        let offset = self.constants.len();

        self.ops.extend(rhs.ops.into_iter().map(|op| match op {
            Op::Const(i) => Op::Const(i + offset),
            other => other,
        }));
        self.constants.extend(rhs.constants);

        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// True iff the expression does not depend on `x`.
    pub fn is_constant(&self) -> bool {
        !self.ops.iter().any(|op| matches!(op, Op::VarX))
    }

    /// Evaluates the expression at `x`.
    ///
    /// `y` is reserved and evaluates to zero. Domain errors surface as
    /// non-finite values, following the underlying real arithmetic.
    pub fn eval(&self, x: &Real) -> Result<Real, EvalError> {
        let mut stack: SmallVec<[Real; 16]> = SmallVec::new();

        for op in &self.ops {
            // Leaves push and consume nothing.
            match *op {
                Op::VarX => {
                    stack.push(x.clone());
                    continue;
                }
                Op::VarY => {
                    stack.push(real::zero());
                    continue;
                }
                Op::Const(i) => {
                    stack.push(self.constants[i].clone());
                    continue;
                }
                _ => {}
            }

            let head = stack.pop().ok_or(EvalError)?;

            let value = match *op {
                Op::Plus => head,
                Op::Minus => -head,
                Op::Abs => head.abs(),
                Op::Sqrt => head.sqrt(),
                Op::Cbrt => head.cbrt(),
                Op::Exp => head.exp(),
                Op::Exp2 => head.exp2(),
                Op::Erf => head.erf(),
                Op::Log => head.ln(),
                Op::Log2 => head.log2(),
                Op::Log10 => head.log10(),
                Op::Sin => head.sin(),
                Op::Cos => head.cos(),
                Op::Tan => head.tan(),
                Op::Asin => head.asin(),
                Op::Acos => head.acos(),
                Op::Atan => head.atan(),
                Op::Sinh => head.sinh(),
                Op::Cosh => head.cosh(),
                Op::Tanh => head.tanh(),
                Op::ToFloat => real::real(head.to_f32()),
                Op::ToDouble => real::real(head.to_f64()),
                Op::ToLDouble => real::real(&Float::with_val(64, &head)),
                Op::Add => stack.pop().ok_or(EvalError)? + head,
                Op::Sub => stack.pop().ok_or(EvalError)? - head,
                Op::Mul => stack.pop().ok_or(EvalError)? * head,
                Op::Div => stack.pop().ok_or(EvalError)? / head,
                Op::Mod | Op::Fmod => stack.pop().ok_or(EvalError)? % head,
                Op::Atan2 => stack.pop().ok_or(EvalError)?.atan2(&head),
                Op::Pow => stack.pop().ok_or(EvalError)?.pow(&head),
                Op::Min => stack.pop().ok_or(EvalError)?.min(&head),
                Op::Max => stack.pop().ok_or(EvalError)?.max(&head),
                Op::VarX | Op::VarY | Op::Const(_) => {
                    unreachable!("leaves are handled above")
                }
            };

            stack.push(value);
        }

        match stack.pop() {
            Some(value) if stack.is_empty() => Ok(value),
            _ => Err(EvalError),
        }
    }
}
