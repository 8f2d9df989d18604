//! Working-precision real numbers.
//!
//! All numeric state in the crate is carried by [`rug::Float`] values sharing
//! one process-global precision, configured once before any evaluation.

use std::sync::atomic::{AtomicU32, Ordering};

use rug::float::Constant;
use rug::{Assign, Float};

pub use rug::Float as Real;

/// Precision granularity exposed through the `--precision` flag.
pub const LIMB_BITS: u32 = 32;

/// Default working precision in bits.
pub const DEFAULT_PRECISION: u32 = 512;

static PRECISION: AtomicU32 = AtomicU32::new(DEFAULT_PRECISION);

/// Sets the working precision, rounded up to a whole number of 32-bit limbs.
///
/// Intended to be called once, before any [`Real`] is constructed; values
/// built earlier keep the precision they were created with.
pub fn set_precision(bits: u32) {
    let limbs = bits.max(LIMB_BITS).div_ceil(LIMB_BITS);
    PRECISION.store(limbs * LIMB_BITS, Ordering::Relaxed);
}

/// The current working precision in bits.
pub fn precision() -> u32 {
    PRECISION.load(Ordering::Relaxed)
}

/// Builds a real at the working precision.
pub fn real<T>(value: T) -> Real
where
    Real: Assign<T>,
{
    let mut result = Float::new(precision());
    result.assign(value);
    result
}

/// Positive zero at the working precision.
pub fn zero() -> Real {
    Float::new(precision())
}

pub fn pi() -> Real {
    real(Constant::Pi)
}

pub fn tau() -> Real {
    pi() * 2
}

pub fn e() -> Real {
    real(1).exp()
}

pub fn ten() -> Real {
    real(10)
}
