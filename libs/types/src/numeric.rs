//! Fixed-point decimal types for prices and balances
//!
//! A [`Fixed`] is an integer mantissa scaled by a power of ten,
//! `value = mantissa × 10^scale`. Money is carried at scale -2 (cents).
//! No operation goes through floating point.
//!
//! Scale conventions:
//! - `add`/`sub` return the finer (smaller) of the two operand scales; this
//!   is always exact.
//! - `mul`/`div` compute an exact intermediate and return the finer of the two
//!   operand scales, truncating toward zero when that final step coarsens.
//! - Rescaling to a finer scale is exact; rescaling to a coarser scale
//!   truncates toward zero.
//!
//! Overflow is checked: `checked_*` methods return [`NumericError::Overflow`]
//! and the operator impls panic, like integer arithmetic in debug builds.

use crate::errors::NumericError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

/// Largest accepted magnitude of a scale exponent.
///
/// Keeps every cross-scale alignment of two `i64` mantissas inside `i128`.
pub const MAX_SCALE: i32 = 9;

/// Scale exponent for money: one unit of mantissa is one cent.
pub const MONEY_SCALE: i32 = -2;

/// Monetary amount. Always constructed at [`MONEY_SCALE`] by [`Fixed::money`].
pub type Money = Fixed;

/// Scaled fixed-point number
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "FixedRepr")]
pub struct Fixed {
    mantissa: i64,
    scale: i32,
}

#[derive(Deserialize)]
struct FixedRepr {
    mantissa: i64,
    scale: i32,
}

impl TryFrom<FixedRepr> for Fixed {
    type Error = NumericError;

    fn try_from(repr: FixedRepr) -> Result<Self, Self::Error> {
        Fixed::new(repr.mantissa, repr.scale)
    }
}

fn check_scale(scale: i32) -> Result<(), NumericError> {
    if scale.unsigned_abs() > MAX_SCALE as u32 {
        return Err(NumericError::InvalidScale { scale, max: MAX_SCALE });
    }
    Ok(())
}

fn pow10(exp: u32) -> i128 {
    10i128.pow(exp)
}

fn narrow(value: i128) -> Result<i64, NumericError> {
    i64::try_from(value).map_err(|_| NumericError::Overflow)
}

/// Move an `i128` mantissa between scales (truncating toward zero when coarsening).
fn shift(value: i128, from: i32, to: i32) -> Result<i128, NumericError> {
    match from.cmp(&to) {
        Ordering::Equal => Ok(value),
        Ordering::Greater => value
            .checked_mul(pow10((from - to) as u32))
            .ok_or(NumericError::Overflow),
        Ordering::Less => Ok(value / pow10((to - from) as u32)),
    }
}

impl Fixed {
    /// Create a value from a mantissa and a scale exponent
    pub fn new(mantissa: i64, scale: i32) -> Result<Self, NumericError> {
        check_scale(scale)?;
        Ok(Self { mantissa, scale })
    }

    /// Money amount in cents
    pub const fn money(cents: i64) -> Self {
        Self { mantissa: cents, scale: MONEY_SCALE }
    }

    /// Money amount in whole currency units
    pub fn money_units(units: i64) -> Result<Self, NumericError> {
        Self::from_int(units).rescale(MONEY_SCALE)
    }

    /// Integer value at scale 0
    pub const fn from_int(value: i64) -> Self {
        Self { mantissa: value, scale: 0 }
    }

    pub fn mantissa(&self) -> i64 {
        self.mantissa
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_positive(&self) -> bool {
        self.mantissa > 0
    }

    /// Re-express this value at another scale.
    ///
    /// Finer targets are exact; coarser targets truncate toward zero.
    /// Rescaling to the current scale is the identity.
    pub fn rescale(&self, scale: i32) -> Result<Self, NumericError> {
        check_scale(scale)?;
        let mantissa = narrow(shift(self.mantissa as i128, self.scale, scale)?)?;
        Ok(Self { mantissa, scale })
    }

    /// Both mantissas at the finer of the two scales. Exact.
    fn aligned(&self, other: &Self) -> (i128, i128, i32) {
        let finer = self.scale.min(other.scale);
        let a = self.mantissa as i128 * pow10((self.scale - finer) as u32);
        let b = other.mantissa as i128 * pow10((other.scale - finer) as u32);
        (a, b, finer)
    }

    pub fn checked_add(&self, other: Self) -> Result<Self, NumericError> {
        let (a, b, scale) = self.aligned(&other);
        Ok(Self { mantissa: narrow(a + b)?, scale })
    }

    pub fn checked_sub(&self, other: Self) -> Result<Self, NumericError> {
        let (a, b, scale) = self.aligned(&other);
        Ok(Self { mantissa: narrow(a - b)?, scale })
    }

    /// Product at the finer operand scale
    pub fn checked_mul(&self, other: Self) -> Result<Self, NumericError> {
        let scale = self.scale.min(other.scale);
        let product = self.mantissa as i128 * other.mantissa as i128;
        let mantissa = narrow(shift(product, self.scale + other.scale, scale)?)?;
        Ok(Self { mantissa, scale })
    }

    /// Quotient at the finer operand scale, truncated toward zero
    pub fn checked_div(&self, other: Self) -> Result<Self, NumericError> {
        if other.mantissa == 0 {
            return Err(NumericError::DivisionByZero);
        }
        let (a, b, scale) = self.aligned(&other);
        let quotient = if scale <= 0 {
            a.checked_mul(pow10((-scale) as u32))
                .ok_or(NumericError::Overflow)?
                / b
        } else {
            match b.checked_mul(pow10(scale as u32)) {
                Some(divisor) => a / divisor,
                // |divisor| exceeds every representable dividend
                None => 0,
            }
        };
        Ok(Self { mantissa: narrow(quotient)?, scale })
    }

    /// Multiply by an integer count (e.g. `price × volume`), keeping the scale
    pub fn checked_mul_int(&self, factor: i64) -> Result<Self, NumericError> {
        let mantissa = narrow(self.mantissa as i128 * factor as i128)?;
        Ok(Self { mantissa, scale: self.scale })
    }

    /// Divide by an integer count, truncating toward zero, keeping the scale
    pub fn checked_div_int(&self, divisor: i64) -> Result<Self, NumericError> {
        if divisor == 0 {
            return Err(NumericError::DivisionByZero);
        }
        let mantissa = narrow(self.mantissa as i128 / divisor as i128)?;
        Ok(Self { mantissa, scale: self.scale })
    }

    /// Convert to a `Decimal` for display and export
    pub fn to_decimal(&self) -> Result<Decimal, NumericError> {
        if self.scale <= 0 {
            Decimal::try_from_i128_with_scale(self.mantissa as i128, (-self.scale) as u32)
                .map_err(|_| NumericError::Overflow)
        } else {
            let raw = self.mantissa as i128 * pow10(self.scale as u32);
            Decimal::try_from_i128_with_scale(raw, 0).map_err(|_| NumericError::Overflow)
        }
    }

    /// Mantissa and scale with trailing decimal zeros folded into the scale
    fn normalized(&self) -> (i64, i32) {
        if self.mantissa == 0 {
            return (0, 0);
        }
        let (mut m, mut s) = (self.mantissa, self.scale);
        while m % 10 == 0 {
            m /= 10;
            s += 1;
        }
        (m, s)
    }
}

impl PartialEq for Fixed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fixed {}

impl PartialOrd for Fixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fixed {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

impl Hash for Fixed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl Add for Fixed {
    type Output = Fixed;

    /// # Panics
    /// Panics if the sum overflows the mantissa
    fn add(self, rhs: Fixed) -> Fixed {
        match self.checked_add(rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("fixed-point addition failed: {e}"),
        }
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    /// # Panics
    /// Panics if the difference overflows the mantissa
    fn sub(self, rhs: Fixed) -> Fixed {
        match self.checked_sub(rhs) {
            Ok(diff) => diff,
            Err(e) => panic!("fixed-point subtraction failed: {e}"),
        }
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale >= 0 {
            if self.mantissa == 0 {
                return write!(f, "0");
            }
            return write!(f, "{}{}", self.mantissa, "0".repeat(self.scale as usize));
        }
        let places = (-self.scale) as usize;
        let digits = format!("{:0>width$}", self.mantissa.unsigned_abs(), width = places + 1);
        let (int_part, frac_part) = digits.split_at(digits.len() - places);
        let sign = if self.mantissa < 0 { "-" } else { "" };
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}
