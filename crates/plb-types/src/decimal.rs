use crate::error::{ValueError, ValueResult};
use crate::types::Type;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};
use std::fmt;
use std::str::FromStr;

/// Scale used when a decimal is built from a non-decimal, non-string number.
pub const DEFAULT_SCALE: u32 = 6;

/// Largest exponent accepted in decimal text such as `1e300`.
const MAX_TEXT_EXPONENT: u64 = 4096;

#[derive(Clone, Copy)]
enum Rounding {
    /// Half away from zero.
    HalfUp,
    /// Toward zero.
    Down,
    Ceiling,
    Floor,
}

/// Immutable arbitrary-precision decimal (unscaled integer + non-negative scale).
///
/// Equality, ordering and hashing are numeric: `1.0 == 1.00`. Use [`Decimal::canonical_key`]
/// when the scale must be preserved (for example when deduplicating written values).
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(BigDecimal);

impl Decimal {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from an unscaled value and scale as stored on the wire.
    pub fn from_parts(unscaled: impl Into<BigInt>, scale: u32) -> Self {
        Self(BigDecimal::new(unscaled.into(), i64::from(scale)))
    }

    fn parts(&self) -> (BigInt, u32) {
        let (unscaled, exponent) = self.0.as_bigint_and_exponent();
        // Every constructor keeps the exponent within `0..=u32::MAX`.
        (unscaled, u32::try_from(exponent).unwrap_or(u32::MAX))
    }

    pub fn unscaled(&self) -> BigInt {
        self.parts().0
    }

    pub fn scale(&self) -> u32 {
        self.parts().1
    }

    /// Scale-sensitive identity: `1.0` and `1.00` produce different keys.
    pub fn canonical_key(&self) -> (BigInt, u32) {
        self.parts()
    }

    pub fn from_i32(value: i32) -> Self {
        Self::from_i64(i64::from(value))
    }

    pub fn from_i64(value: i64) -> Self {
        Self::from_parts(BigInt::from(value) * pow10(DEFAULT_SCALE), DEFAULT_SCALE)
    }

    pub fn try_from_f32(value: f32) -> ValueResult<Self> {
        if !value.is_finite() {
            return Err(ValueError::cast(value, Type::Decimal));
        }
        Self::parse(&value.to_string()).map(|d| d.rescale(DEFAULT_SCALE, Rounding::HalfUp))
    }

    /// Converts the shortest text form of `value`, so `0.1` becomes `0.100000`.
    pub fn try_from_f64(value: f64) -> ValueResult<Self> {
        if !value.is_finite() {
            return Err(ValueError::cast(value, Type::Decimal));
        }
        Self::parse(&value.to_string()).map(|d| d.rescale(DEFAULT_SCALE, Rounding::HalfUp))
    }

    /// Parse decimal text exactly, keeping the written scale (`"1.100"` has scale 3).
    ///
    /// A positive exponent is folded into the unscaled value (`"1e3"` has scale 0).
    pub fn parse(text: &str) -> ValueResult<Self> {
        let invalid = || ValueError::cast(text, Type::Decimal);
        let parsed = BigDecimal::from_str(text.trim()).map_err(|_| invalid())?;
        let (unscaled, exponent) = parsed.as_bigint_and_exponent();
        if exponent >= 0 {
            let scale = u32::try_from(exponent).map_err(|_| invalid())?;
            return Ok(Self::from_parts(unscaled, scale));
        }
        if exponent.unsigned_abs() > MAX_TEXT_EXPONENT {
            return Err(invalid());
        }
        let shift = u32::try_from(exponent.unsigned_abs()).map_err(|_| invalid())?;
        Ok(Self::from_parts(unscaled * pow10(shift), 0))
    }

    fn rescale(&self, scale: u32, rounding: Rounding) -> Self {
        let (unscaled, from) = self.parts();
        let unscaled = if scale >= from {
            unscaled * pow10(scale - from)
        } else {
            div_round(&unscaled, &pow10(from - scale), rounding)
        };
        Self::from_parts(unscaled, scale)
    }

    /// Both unscaled values brought to the larger of the two scales.
    fn aligned(&self, other: &Decimal) -> (BigInt, BigInt, u32) {
        let (a, sa) = self.parts();
        let (b, sb) = other.parts();
        let scale = sa.max(sb);
        (a * pow10(scale - sa), b * pow10(scale - sb), scale)
    }

    /// The sum carries the larger scale.
    pub fn add(&self, other: &Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(other);
        Self::from_parts(a + b, scale)
    }

    pub fn subtract(&self, other: &Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(other);
        Self::from_parts(a - b, scale)
    }

    /// The product carries the sum of both scales.
    pub fn multiply(&self, other: &Decimal) -> ValueResult<Decimal> {
        let (a, sa) = self.parts();
        let (b, sb) = other.parts();
        let scale = sa
            .checked_add(sb)
            .ok_or(ValueError::Overflow { op: "multiply" })?;
        Ok(Self::from_parts(a * b, scale))
    }

    /// Divide, rounding half-up to this value's scale.
    pub fn divide(&self, other: &Decimal) -> ValueResult<Decimal> {
        if other.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        let (a, sa) = self.parts();
        let (b, sb) = other.parts();
        // (a / 10^sa) / (b / 10^sb) at scale sa is a * 10^sb / b.
        let quotient = div_round(&(a * pow10(sb)), &b, Rounding::HalfUp);
        Ok(Self::from_parts(quotient, sa))
    }

    /// Remainder of truncating division; the sign follows the dividend.
    pub fn modulus(&self, other: &Decimal) -> ValueResult<Decimal> {
        if other.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        let (a, b, scale) = self.aligned(other);
        Ok(Self::from_parts(a % b, scale))
    }

    pub fn negate(&self) -> Decimal {
        let (unscaled, scale) = self.parts();
        Self::from_parts(-unscaled, scale)
    }

    pub fn abs(&self) -> Decimal {
        Self(self.0.abs())
    }

    pub fn ceiling(&self) -> Decimal {
        self.rescale(0, Rounding::Ceiling)
    }

    pub fn floor(&self) -> Decimal {
        self.rescale(0, Rounding::Floor)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Truncates toward zero; out-of-range values keep the low 32 bits.
    pub fn to_i32(&self) -> i32 {
        self.to_i64() as i32
    }

    /// Truncates toward zero; out-of-range values keep the low 64 bits.
    pub fn to_i64(&self) -> i64 {
        let truncated = self.rescale(0, Rounding::Down).unscaled();
        let low = truncated.iter_u64_digits().next().unwrap_or(0) as i64;
        if truncated.sign() == Sign::Minus {
            low.wrapping_neg()
        } else {
            low
        }
    }

    pub fn to_f32(&self) -> f32 {
        self.0.to_f32().unwrap_or(f32::NAN)
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u32).pow(exponent)
}

/// `num / den` rounded to an integer; `den` is non-zero.
fn div_round(num: &BigInt, den: &BigInt, rounding: Rounding) -> BigInt {
    let quotient = num / den;
    let remainder = num % den;
    if remainder.is_zero() {
        return quotient;
    }
    let positive = (num.sign() == Sign::Minus) == (den.sign() == Sign::Minus);
    let away = match rounding {
        Rounding::HalfUp => remainder.magnitude() + remainder.magnitude() >= *den.magnitude(),
        Rounding::Down => false,
        Rounding::Ceiling => positive,
        Rounding::Floor => !positive,
    };
    match (away, positive) {
        (false, _) => quotient,
        (true, true) => quotient + 1,
        (true, false) => quotient - 1,
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({self})")
    }
}

/// Plain notation with exactly `scale` fraction digits.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (unscaled, scale) = self.parts();
        if unscaled.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        let digits = unscaled.magnitude().to_string();
        let scale = scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{int}.{frac}")
        } else {
            write!(f, "0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

impl FromStr for Decimal {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
