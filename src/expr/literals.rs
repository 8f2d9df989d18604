//! Numeric literals.

use rug::ops::Pow;
use rug::{Integer, Rational};

use crate::real::{self, Real};

/// Constructs an exact rational from unsigned integer and fractional parts.
fn rational_from_fixed_point(
    integer: &str,
    fraction: &str,
    radix: i32,
) -> Option<Rational> {
    let fraction = fraction.trim_end_matches('0');
    let width = fraction.len() as u32;

    let integer = Integer::from_str_radix(integer, radix).ok()?;

    let fraction = if width != 0 {
        Integer::from_str_radix(fraction, radix).ok()?
    } else {
        Integer::new()
    };

    let denominator = Integer::from(radix).pow(width);
    let numerator = integer * &denominator + fraction;

    Some(Rational::from((numerator, denominator)))
}

/// Constructs a [`Real`] from the components of a literal in scientific form.
///
/// The integer and fractional parts are unsigned digit strings in `radix`;
/// the optional exponent is a signed decimal string scaling by a power of
/// `base`. The value is assembled exactly and rounded once into the working
/// precision.
pub fn real_from_parts(
    integer: &str,
    fraction: &str,
    radix: i32,
    base: i32,
    exponent: Option<&str>,
) -> Option<Real> {
    let mantissa = rational_from_fixed_point(integer, fraction, radix)?;

    let value = match exponent {
        Some(exponent) => {
            let exponent = exponent.parse::<i32>().ok()?;
            mantissa * Rational::from(base).pow(exponent)
        }
        None => mantissa,
    };

    Some(real::real(value))
}

/// The integer denoted by a run of Unicode superscript digits.
pub fn superscript_value(digits: &str) -> Integer {
    digits.chars().fold(Integer::new(), |acc, c| {
        let digit = match c {
            '⁰' => 0,
            '¹' => 1,
            '²' => 2,
            '³' => 3,
            '⁴' => 4,
            '⁵' => 5,
            '⁶' => 6,
            '⁷' => 7,
            '⁸' => 8,
            '⁹' => 9,
            _ => unreachable!("superscript runs contain only superscript digits"),
        };
        acc * 10 + digit
    })
}
