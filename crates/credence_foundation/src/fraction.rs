//! Exact rational weights in the unit interval.
//!
//! Probabilities and confidences are unsigned fractions `n/d` with `d >= 1`
//! and `n <= d`. All arithmetic stays in arbitrary-precision unsigned
//! integers: there is no division and no floating point, so weights combined
//! along arbitrarily deep derivation chains never lose precision or overflow.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigUint;

use crate::error::{Error, Result, ValidationCode, Violation};

/// An exact rational in `[0, 1]`.
///
/// Fractions are never reduced to lowest terms. Equality and ordering are
/// semantic, by cross-multiplication (`a/b <= c/d` iff `a*d <= c*b`), so
/// `1/2` and `2/4` compare equal while printing differently.
///
/// `Hash` is deliberately not implemented: it would have to agree with the
/// semantic `Eq`, which requires normalization this type avoids.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fraction {
    /// Numerator, at most `den`.
    num: BigUint,
    /// Denominator, at least one.
    den: BigUint,
}

impl Fraction {
    /// Creates a fraction from a numerator/denominator pair.
    ///
    /// This is the only gate through which probability and confidence inputs
    /// enter the system.
    ///
    /// # Errors
    ///
    /// Returns a validation error with code `OUT_OF_RANGE` when `den` is zero
    /// or `num > den`.
    pub fn new(num: u64, den: u64) -> Result<Self> {
        if den == 0 {
            return Err(Error::validation_with(
                ValidationCode::OutOfRange,
                "fraction denominator must be at least one",
                Violation::new("denominator", "denominator >= 1", den.to_string()),
            ));
        }
        if num > den {
            return Err(Error::validation_with(
                ValidationCode::OutOfRange,
                format!("fraction {num}/{den} exceeds one"),
                Violation::new("numerator", "numerator <= denominator", num.to_string()),
            ));
        }
        Ok(Self {
            num: BigUint::from(num),
            den: BigUint::from(den),
        })
    }

    /// Returns `0/1`.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            num: BigUint::ZERO,
            den: BigUint::from(1u8),
        }
    }

    /// Returns `1/1`.
    #[must_use]
    pub fn one() -> Self {
        Self {
            num: BigUint::from(1u8),
            den: BigUint::from(1u8),
        }
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> &BigUint {
        &self.num
    }

    /// Returns the denominator.
    #[must_use]
    pub fn denominator(&self) -> &BigUint {
        &self.den
    }

    /// Returns true if this fraction equals zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.num == BigUint::ZERO
    }

    /// Returns true if this fraction equals one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.num == self.den
    }

    /// Multiplies two fractions: `(a.n * b.n) / (a.d * b.d)`.
    ///
    /// Both operands are in `[0, 1]`, so the product is as well. Used to
    /// accumulate probability along a derivation chain.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            num: &self.num * &other.num,
            den: &self.den * &other.den,
        }
    }

    /// Combines two fractions pessimistically, keeping the smaller.
    ///
    /// The result is expressed over the common denominator `a.d * b.d` with
    /// numerator `min(a.n * b.d, b.n * a.d)`. Used to accumulate confidence
    /// along a derivation chain.
    #[must_use]
    pub fn min_combine(&self, other: &Self) -> Self {
        let left = &self.num * &other.den;
        let right = &other.num * &self.den;
        Self {
            num: left.min(right),
            den: &self.den * &other.den,
        }
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        &self.num * &other.den == &other.num * &self.den
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}
