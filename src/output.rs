//! Polynomial rendering.

use std::fmt::Write;

use crate::poly::Polynomial;
use crate::real::Real;

/// Target float type of the generated code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FloatType {
    Single,
    #[default]
    Double,
    Extended,
}

impl FloatType {
    /// Significant digits carried by the type, FLT_DIG + 2 style.
    pub fn digits(self) -> u32 {
        match self {
            FloatType::Single => 8,
            FloatType::Double => 17,
            FloatType::Extended => 20,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            FloatType::Single => "float",
            FloatType::Double => "double",
            FloatType::Extended => "long double",
        }
    }

    /// Literal suffix matching the keyword.
    pub fn suffix(self) -> &'static str {
        match self {
            FloatType::Single => "f",
            FloatType::Double => "",
            FloatType::Extended => "l",
        }
    }
}

/// Formats a real in scientific notation with the requested number of
/// significant digits.
pub fn format_real(value: &Real, digits: u32) -> String {
    format!("{:.*e}", digits.saturating_sub(1) as usize, value)
}

/// The polynomial as a gnuplot expression: `a0+a1*x+a2*x**2...`.
pub fn gnuplot(p: &Polynomial, digits: u32) -> String {
    let mut out = String::new();

    for (j, c) in p.coeffs().iter().enumerate() {
        if j > 0 && *c >= 0 {
            out.push('+');
        }
        out.push_str(&format_real(c, digits));
        match j {
            0 => {}
            1 => out.push_str("*x"),
            _ => {
                let _ = write!(out, "*x**{j}");
            }
        }
    }

    out
}

/// The comment banner preceding the generated function.
pub fn banner(
    func: &str,
    weight: Option<&str>,
    xmin: &str,
    xmax: &str,
    degree: usize,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "/* Approximation of f(x) = {func}");
    if let Some(weight) = weight {
        let _ = writeln!(out, " * with weight function g(x) = {weight}");
    }
    let _ = writeln!(out, " * on interval [ {xmin}, {xmax} ]");
    let _ = writeln!(out, " * with a polynomial of degree {degree}. */");

    out
}

/// The polynomial as a C function body in Horner form.
pub fn source(p: &Polynomial, ty: FloatType) -> String {
    let mut out = String::new();
    let degree = p.degree();
    let keyword = ty.keyword();
    let suffix = ty.suffix();

    let _ = writeln!(out, "{keyword} f({keyword} x)");
    let _ = writeln!(out, "{{");

    if degree == 0 {
        let coeff = format_real(p.coeff(0), ty.digits());
        let _ = writeln!(out, "    return {coeff}{suffix};");
    } else {
        for j in (0..=degree).rev() {
            let coeff = format_real(p.coeff(j), ty.digits());
            let lead = match j {
                _ if j == degree => format!("{keyword} u ="),
                0 => "return u * x +".to_string(),
                _ => "u = u * x +".to_string(),
            };
            let _ = writeln!(out, "    {lead} {coeff}{suffix};");
        }
    }

    let _ = writeln!(out, "}}");
    out
}
