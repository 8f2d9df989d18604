//! Parser for arithmetic expressions.

use pest_consume::{match_nodes, Error, Parser};
use rug::Integer;

use super::literals;
use super::ops::{Expression, Op};
use crate::real::{self, Real};

#[derive(Parser)]
#[grammar = "expr/syntax.pest"]
pub struct ExprParser;

pub type ParseError = Error<Rule>;

type ParseResult<T> = Result<T, ParseError>;
type Node<'i> = pest_consume::Node<'i, Rule, ()>;

impl Expression {
    /// Parses an arithmetic expression in `x` into its postfix form.
    pub fn parse(src: &str) -> Result<Expression, ParseError> {
        let nodes = ExprParser::parse(Rule::program, src)?;
        ExprParser::program(nodes.single()?)
    }
}

#[pest_consume::parser]
impl ExprParser {
    fn EOI(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn program(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [expr(e), EOI(_)] => e,
        ))
    }

    fn expr(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [term(first), expr_tail(tail)..] =>
                tail.fold(first, |acc, (op, rhs)| acc.merge(rhs).push(op)),
        ))
    }

    fn expr_tail(input: Node) -> ParseResult<(Op, Expression)> {
        Ok(match_nodes!(input.into_children();
            [add(term)] => (Op::Add, term),
            [sub(term)] => (Op::Sub, term),
        ))
    }

    fn add(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children(); [term(e)] => e))
    }

    fn sub(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children(); [term(e)] => e))
    }

    fn term(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [factor(first), term_tail(tail)..] =>
                tail.fold(first, |acc, (op, rhs)| acc.merge(rhs).push(op)),
        ))
    }

    fn term_tail(input: Node) -> ParseResult<(Op, Expression)> {
        Ok(match_nodes!(input.into_children();
            [mul(factor)] => (Op::Mul, factor),
            [div(factor)] => (Op::Div, factor),
            [rem(factor)] => (Op::Mod, factor),
        ))
    }

    fn mul(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children(); [factor(e)] => e))
    }

    fn div(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children(); [factor(e)] => e))
    }

    fn rem(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children(); [factor(e)] => e))
    }

    fn factor(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            // Exponent chains associate to the right: emit every operand,
            // then one Pow per link.
            [signed(base), exponent(chain)..] => {
                let chain: Vec<Expression> = chain.collect();
                let links = chain.len();
                let merged = chain.into_iter().fold(base, Expression::merge);
                (0..links).fold(merged, |acc, _| acc.push(Op::Pow))
            },
        ))
    }

    fn exponent(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children(); [signed(e)] => e))
    }

    fn signed(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [neg(e)] => e,
            [pos(e)] => e,
            [suffixed(e)] => e,
        ))
    }

    fn neg(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [signed(e)] => e.push(Op::Minus),
        ))
    }

    fn pos(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [signed(e)] => e.push(Op::Plus),
        ))
    }

    fn suffixed(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [terminal(term)] => term,
            // A superscript run is an explicit power of the terminal.
            [terminal(term), superscript(power)] => term
                .merge(Expression::constant(real::real(power)))
                .push(Op::Pow),
        ))
    }

    fn superscript(input: Node) -> ParseResult<Integer> {
        Ok(literals::superscript_value(input.as_str()))
    }

    fn terminal(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [call(e)] => e,
            [parens(e)] => e,
            [var_x(e)] => e,
            [var_y(e)] => e,
            [constant(e)] => e,
        ))
    }

    fn parens(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children(); [expr(e)] => e))
    }

    fn var_x(_input: Node) -> ParseResult<Expression> {
        Ok(Expression::leaf(Op::VarX))
    }

    fn var_y(_input: Node) -> ParseResult<Expression> {
        Ok(Expression::leaf(Op::VarY))
    }

    fn call(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [binary_call(e)] => e,
            [unary_call(e)] => e,
        ))
    }

    fn unary_call(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [unary_fun(op), expr(arg)] => arg.push(op),
        ))
    }

    fn binary_call(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [binary_fun(op), expr(lhs), expr(rhs)] => lhs.merge(rhs).push(op),
        ))
    }

    fn unary_fun(input: Node) -> ParseResult<Op> {
        Ok(Op::from_name(input.as_str())
            .expect("the grammar admits only known function names"))
    }

    fn binary_fun(input: Node) -> ParseResult<Op> {
        Ok(Op::from_name(input.as_str())
            .expect("the grammar admits only known function names"))
    }

    fn constant(input: Node) -> ParseResult<Expression> {
        Ok(match_nodes!(input.into_children();
            [hex_float(value)] => Expression::constant(value),
            [float(value)] => Expression::constant(value),
            [named(value)] => Expression::constant(value),
        ))
    }

    fn named(input: Node) -> ParseResult<Real> {
        Ok(match input.as_str() {
            "pi" | "π" => real::pi(),
            "tau" | "τ" => real::tau(),
            "e" => real::e(),
            name => unreachable!("unknown constant {name}"),
        })
    }

    fn float(input: Node) -> ParseResult<Real> {
        let error = input.error("numeric literal out of range");
        match_nodes!(input.into_children();
            [dec_digits(int)] =>
                literals::real_from_parts(int, "", 10, 10, None),
            [dec_digits(int), dec_frac(frac)] =>
                literals::real_from_parts(int, frac, 10, 10, None),
            [dec_digits(int), dec_exp(exp)] =>
                literals::real_from_parts(int, "", 10, 10, Some(exp)),
            [dec_digits(int), dec_frac(frac), dec_exp(exp)] =>
                literals::real_from_parts(int, frac, 10, 10, Some(exp)),
        )
        .ok_or(error)
    }

    fn hex_float(input: Node) -> ParseResult<Real> {
        // The p-exponent scales by a power of two.
        let error = input.error("numeric literal out of range");
        match_nodes!(input.into_children();
            [hex_digits(int)] =>
                literals::real_from_parts(int, "", 16, 2, None),
            [hex_digits(int), hex_frac(frac)] =>
                literals::real_from_parts(int, frac, 16, 2, None),
            [hex_digits(int), dec_exp(exp)] =>
                literals::real_from_parts(int, "", 16, 2, Some(exp)),
            [hex_digits(int), hex_frac(frac), dec_exp(exp)] =>
                literals::real_from_parts(int, frac, 16, 2, Some(exp)),
        )
        .ok_or(error)
    }

    fn dec_digits(input: Node) -> ParseResult<&str> {
        Ok(input.as_str())
    }

    fn dec_frac(input: Node) -> ParseResult<&str> {
        Ok(input.as_str())
    }

    fn dec_exp(input: Node) -> ParseResult<&str> {
        Ok(input.as_str())
    }

    fn hex_digits(input: Node) -> ParseResult<&str> {
        Ok(input.as_str())
    }

    fn hex_frac(input: Node) -> ParseResult<&str> {
        Ok(input.as_str())
    }
}
