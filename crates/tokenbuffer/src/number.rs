//! Stored numeric representations and checked coercion between them.
//!
//! A number is kept in whatever representation the producer handed over.
//! Readers may ask for any other representation; widening always succeeds,
//! narrowing is range-checked and reports [`BufferError::NumericOverflow`]
//! instead of wrapping or saturating.
use alloc::{
    borrow::Cow,
    format,
    string::{String, ToString},
    sync::Arc,
};
use core::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

use crate::BufferError;

// Floats must lie within [MIN, MAX] before truncation. The i64 upper bound
// has no f64 form; 2^63 is the first double past it.
const I32_MIN_F64: f64 = -2_147_483_648.0;
const I32_MAX_F64: f64 = 2_147_483_647.0;
const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER_EXCLUSIVE: f64 = 9_223_372_036_854_775_808.0;
// i64::MAX has 19 integer digits.
const I64_MAX_DIGITS: i128 = 19;

/// The concrete representation of a stored number.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberType {
    Int,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "i32",
            Self::Long => "i64",
            Self::BigInteger => "BigInt",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::BigDecimal => "BigDecimal",
        })
    }
}

/// A numeric payload.
///
/// `Textual` holds a number whose decoding has been deferred; it is parsed on
/// first typed access.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(i32),
    Long(i64),
    BigInt(BigInt),
    Float(f32),
    Double(f64),
    BigDecimal(BigDecimal),
    Textual(Arc<str>),
}

impl Number {
    /// The stored representation, or `None` for a textual number.
    #[must_use]
    pub fn number_type(&self) -> Option<NumberType> {
        match self {
            Self::Int(_) => Some(NumberType::Int),
            Self::Long(_) => Some(NumberType::Long),
            Self::BigInt(_) => Some(NumberType::BigInteger),
            Self::Float(_) => Some(NumberType::Float),
            Self::Double(_) => Some(NumberType::Double),
            Self::BigDecimal(_) => Some(NumberType::BigDecimal),
            Self::Textual(_) => None,
        }
    }

    /// Whether this number is recorded as an integral token.
    ///
    /// Textual numbers are never integral here, even when their text has no
    /// fraction: they are recorded as floating tokens until decoded.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Long(_) | Self::BigInt(_))
    }

    #[must_use]
    pub fn is_nan(&self) -> bool {
        match self {
            Self::Float(f) => f.is_nan(),
            Self::Double(d) => d.is_nan(),
            _ => false,
        }
    }

    /// Decodes a textual number; every other representation is returned as
    /// is.
    ///
    /// Text containing a fraction or exponent becomes a `Double`; otherwise a
    /// `Long` when it fits and a `BigInt` when it does not.
    ///
    /// # Errors
    /// [`BufferError::InvalidNumber`] when the text is not a number.
    pub fn resolve(&self) -> Result<Cow<'_, Number>, BufferError> {
        let Self::Textual(text) = self else {
            return Ok(Cow::Borrowed(self));
        };
        let text = text.trim();
        let invalid = || BufferError::InvalidNumber(text.to_string());
        if text.contains(['.', 'e', 'E']) {
            return text
                .parse::<f64>()
                .map(|d| Cow::Owned(Self::Double(d)))
                .map_err(|_| invalid());
        }
        if let Ok(l) = text.parse::<i64>() {
            return Ok(Cow::Owned(Self::Long(l)));
        }
        if let Ok(b) = BigInt::from_str(text) {
            return Ok(Cow::Owned(Self::BigInt(b)));
        }
        // NaN and the infinities
        text.parse::<f64>()
            .map(|d| Cow::Owned(Self::Double(d)))
            .map_err(|_| invalid())
    }

    fn overflow(&self, target: NumberType) -> BufferError {
        BufferError::NumericOverflow {
            value: self.to_string(),
            target,
        }
    }

    /// Narrows to `i32`; floats and decimals truncate toward zero.
    ///
    /// # Errors
    /// [`BufferError::NumericOverflow`] outside the `i32` range.
    pub fn to_i32(&self) -> Result<i32, BufferError> {
        let target = NumberType::Int;
        match self {
            Self::Int(i) => Ok(*i),
            Self::Long(l) => i32::try_from(*l).map_err(|_| self.overflow(target)),
            Self::BigInt(b) => b.to_i32().ok_or_else(|| self.overflow(target)),
            Self::Float(_) | Self::Double(_) => {
                let d = self.to_f64()?;
                if (I32_MIN_F64..=I32_MAX_F64).contains(&d) {
                    #[expect(clippy::cast_possible_truncation)]
                    let truncated = d as i32;
                    Ok(truncated)
                } else {
                    Err(self.overflow(target))
                }
            }
            Self::BigDecimal(d) => truncate_within(d, i32::MIN.into(), i32::MAX.into())
                .and_then(|b| b.to_i32())
                .ok_or_else(|| self.overflow(target)),
            Self::Textual(_) => self.resolve()?.to_i32(),
        }
    }

    /// Narrows to `i64`; floats and decimals truncate toward zero.
    ///
    /// # Errors
    /// [`BufferError::NumericOverflow`] outside the `i64` range.
    pub fn to_i64(&self) -> Result<i64, BufferError> {
        let target = NumberType::Long;
        match self {
            Self::Int(i) => Ok(i64::from(*i)),
            Self::Long(l) => Ok(*l),
            Self::BigInt(b) => b.to_i64().ok_or_else(|| self.overflow(target)),
            Self::Float(_) | Self::Double(_) => {
                let d = self.to_f64()?;
                if (I64_MIN_F64..I64_UPPER_EXCLUSIVE).contains(&d) {
                    #[expect(clippy::cast_possible_truncation)]
                    let truncated = d as i64;
                    Ok(truncated)
                } else {
                    Err(self.overflow(target))
                }
            }
            Self::BigDecimal(d) => truncate_within(d, i64::MIN, i64::MAX)
                .and_then(|b| b.to_i64())
                .ok_or_else(|| self.overflow(target)),
            Self::Textual(_) => self.resolve()?.to_i64(),
        }
    }

    /// Widens to an arbitrary-precision integer.
    ///
    /// # Errors
    /// [`BufferError::NumericOverflow`] for NaN and the infinities.
    pub fn to_bigint(&self) -> Result<BigInt, BufferError> {
        match self {
            Self::Int(i) => Ok(BigInt::from(*i)),
            Self::Long(l) => Ok(BigInt::from(*l)),
            Self::BigInt(b) => Ok(b.clone()),
            Self::Float(_) | Self::Double(_) => {
                let d = self.to_f64()?;
                BigInt::from_f64(d).ok_or_else(|| self.overflow(NumberType::BigInteger))
            }
            Self::BigDecimal(d) => Ok(truncate(d)),
            Self::Textual(_) => self.resolve()?.to_bigint(),
        }
    }

    /// Converts to `f32`.
    ///
    /// # Errors
    /// [`BufferError::NumericOverflow`] for finite values beyond the `f32`
    /// range.
    pub fn to_f32(&self) -> Result<f32, BufferError> {
        let target = NumberType::Float;
        match self {
            Self::Float(f) => Ok(*f),
            #[expect(clippy::cast_precision_loss)]
            Self::Int(i) => Ok(*i as f32),
            #[expect(clippy::cast_precision_loss)]
            Self::Long(l) => Ok(*l as f32),
            Self::Double(d) => narrow_f64(*d).ok_or_else(|| self.overflow(target)),
            Self::BigInt(_) | Self::BigDecimal(_) => {
                let d = self.to_f64().map_err(|_| self.overflow(target))?;
                narrow_f64(d).ok_or_else(|| self.overflow(target))
            }
            Self::Textual(_) => self.resolve()?.to_f32(),
        }
    }

    /// Converts to `f64`.
    ///
    /// # Errors
    /// [`BufferError::NumericOverflow`] for arbitrary-precision values beyond
    /// the `f64` range.
    pub fn to_f64(&self) -> Result<f64, BufferError> {
        let target = NumberType::Double;
        match self {
            Self::Double(d) => Ok(*d),
            Self::Float(f) => Ok(f64::from(*f)),
            Self::Int(i) => Ok(f64::from(*i)),
            #[expect(clippy::cast_precision_loss)]
            Self::Long(l) => Ok(*l as f64),
            Self::BigInt(b) => b
                .to_f64()
                .filter(|d| d.is_finite())
                .ok_or_else(|| self.overflow(target)),
            Self::BigDecimal(d) => d
                .to_f64()
                .filter(|d| d.is_finite())
                .ok_or_else(|| self.overflow(target)),
            Self::Textual(_) => self.resolve()?.to_f64(),
        }
    }

    /// Widens to an arbitrary-precision decimal.
    ///
    /// Floats convert through their shortest round-trip text, so `0.1f64`
    /// becomes exactly `0.1`.
    ///
    /// # Errors
    /// [`BufferError::InvalidNumber`] for NaN and the infinities.
    pub fn to_bigdecimal(&self) -> Result<BigDecimal, BufferError> {
        match self {
            Self::Int(i) => Ok(BigDecimal::from(*i)),
            Self::Long(l) => Ok(BigDecimal::from(*l)),
            Self::BigInt(b) => Ok(BigDecimal::new(b.clone(), 0)),
            Self::BigDecimal(d) => Ok(d.clone()),
            Self::Float(f) => decimal_from_text(&format!("{f}")),
            Self::Double(d) => decimal_from_text(&format!("{d}")),
            Self::Textual(_) => self.resolve()?.to_bigdecimal(),
        }
    }
}

fn truncate(d: &BigDecimal) -> BigInt {
    if integer_digits(d) <= 0 {
        return BigInt::zero();
    }
    let (int, _) = d.with_scale(0).into_bigint_and_exponent();
    int
}

/// Digits before the decimal point; zero or less when `|d| < 1`.
fn integer_digits(d: &BigDecimal) -> i128 {
    if d.is_zero() {
        return 0;
    }
    let (_, scale) = d.as_bigint_and_exponent();
    i128::from(d.digits()) - i128::from(scale)
}

/// Truncates `d` toward zero if it lies within `[min, max]`.
///
/// The digit count rules out large magnitudes before any rescaling, so a
/// huge exponent costs no more than its own digits.
fn truncate_within(d: &BigDecimal, min: i64, max: i64) -> Option<BigInt> {
    let digits = integer_digits(d);
    if digits > I64_MAX_DIGITS {
        return None;
    }
    if digits <= 0 {
        return Some(BigInt::zero());
    }
    if *d < BigDecimal::from(min) || *d > BigDecimal::from(max) {
        return None;
    }
    Some(truncate(d))
}

fn narrow_f64(d: f64) -> Option<f32> {
    if d.is_finite() && (d > f64::from(f32::MAX) || d < f64::from(f32::MIN)) {
        None
    } else {
        #[expect(clippy::cast_possible_truncation)]
        let narrowed = d as f32;
        Some(narrowed)
    }
}

fn decimal_from_text(text: &str) -> Result<BigDecimal, BufferError> {
    BigDecimal::from_str(text).map_err(|_| BufferError::InvalidNumber(String::from(text)))
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(l) => write!(f, "{l}"),
            Self::BigInt(b) => write!(f, "{b}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::BigDecimal(d) => write!(f, "{d}"),
            Self::Textual(t) => f.write_str(t),
        }
    }
}

macro_rules! impl_from_for_number {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Self::$variant(n.into())
                }
            }
        )*
    };
}

impl_from_for_number!(
    i8 => Int,
    i16 => Int,
    u8 => Int,
    u16 => Int,
    i32 => Int,
    u32 => Long,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigInt => BigInt,
    BigDecimal => BigDecimal,
);

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or_else(|_| Self::BigInt(n.into()), Self::Long)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn big(text: &str) -> Number {
        Number::BigInt(BigInt::from_str(text).unwrap())
    }

    fn dec(text: &str) -> Number {
        Number::BigDecimal(BigDecimal::from_str(text).unwrap())
    }

    #[test]
    fn two_to_the_63_overflows_i64_but_not_bigint() {
        let n = big("9223372036854775808");
        assert_eq!(
            n.to_i64(),
            Err(BufferError::NumericOverflow {
                value: "9223372036854775808".into(),
                target: NumberType::Long,
            })
        );
        assert_eq!(
            n.to_bigint().unwrap().to_string(),
            "9223372036854775808"
        );
    }

    #[rstest]
    #[case(Number::Int(7), Some(7))]
    #[case(Number::Long(-2_147_483_648), Some(i32::MIN))]
    #[case(Number::Long(2_147_483_648), None)]
    #[case(Number::Double(2_147_483_647.0), Some(i32::MAX))]
    #[case(Number::Double(-2_147_483_648.0), Some(i32::MIN))]
    #[case(Number::Double(2_147_483_647.9), None)]
    #[case(Number::Double(-2_147_483_648.9), None)]
    #[case(Number::Double(2_147_483_648.0), None)]
    #[case(Number::Double(f64::NAN), None)]
    #[case(Number::Float(-3.99), Some(-3))]
    #[case(dec("12.75"), Some(12))]
    #[case(dec("-12.75"), Some(-12))]
    #[case(dec("2147483648.5"), None)]
    #[case(dec("2147483647.5"), None)]
    #[case(dec("-2147483648.5"), None)]
    #[case(dec("0.000001"), Some(0))]
    #[case(dec("1e10000000"), None)]
    #[case(dec("-1e10000000"), None)]
    #[case(dec("1e-10000000"), Some(0))]
    #[case(big("-2147483649"), None)]
    #[case(Number::Textual("42".into()), Some(42))]
    #[case(Number::Textual("4.5e1".into()), Some(45))]
    fn coerce_to_i32(#[case] n: Number, #[case] expected: Option<i32>) {
        match expected {
            Some(v) => assert_eq!(n.to_i32(), Ok(v)),
            None => assert!(matches!(
                n.to_i32(),
                Err(BufferError::NumericOverflow {
                    target: NumberType::Int,
                    ..
                })
            )),
        }
    }

    #[rstest]
    #[case(Number::Int(-1), Some(-1))]
    #[case(big("-9223372036854775808"), Some(i64::MIN))]
    #[case(big("-9223372036854775809"), None)]
    #[case(Number::Double(9.223_372_036_854_776e18), None)]
    #[case(Number::Double(-9.223_372_036_854_776e18), Some(i64::MIN))]
    #[case(Number::Double(f64::INFINITY), None)]
    #[case(dec("1e3"), Some(1000))]
    #[case(dec("9223372036854775807"), Some(i64::MAX))]
    #[case(dec("9223372036854775807.5"), None)]
    #[case(dec("-9223372036854775808.5"), None)]
    #[case(dec("1e10000000"), None)]
    #[case(dec("-1e-10000000"), Some(0))]
    fn coerce_to_i64(#[case] n: Number, #[case] expected: Option<i64>) {
        match expected {
            Some(v) => assert_eq!(n.to_i64(), Ok(v)),
            None => assert!(matches!(
                n.to_i64(),
                Err(BufferError::NumericOverflow {
                    target: NumberType::Long,
                    ..
                })
            )),
        }
    }

    #[test]
    fn floats_widen_and_narrow() {
        assert_eq!(Number::Float(1.5).to_f64(), Ok(1.5));
        assert_eq!(Number::Double(0.25).to_f32(), Ok(0.25));
        assert!(matches!(
            Number::Double(1e300).to_f32(),
            Err(BufferError::NumericOverflow { .. })
        ));
        assert!(Number::Double(f64::NAN).to_f32().unwrap().is_nan());
        assert_eq!(Number::Double(f64::INFINITY).to_f32(), Ok(f32::INFINITY));
        assert!(matches!(
            big(&"9".repeat(400)).to_f64(),
            Err(BufferError::NumericOverflow {
                target: NumberType::Double,
                ..
            })
        ));
        assert_eq!(dec("0.5").to_f64(), Ok(0.5));
    }

    #[test]
    fn decimals_use_shortest_float_text() {
        assert_eq!(Number::Double(0.1).to_bigdecimal(), Ok(BigDecimal::from_str("0.1").unwrap()));
        assert_eq!(Number::Long(5).to_bigdecimal(), Ok(BigDecimal::from(5)));
        assert!(matches!(
            Number::Double(f64::NAN).to_bigdecimal(),
            Err(BufferError::InvalidNumber(_))
        ));
    }

    #[test]
    fn bigint_from_float_truncates() {
        assert_eq!(Number::Double(-7.9).to_bigint(), Ok(BigInt::from(-7)));
        assert!(matches!(
            Number::Double(f64::NAN).to_bigint(),
            Err(BufferError::NumericOverflow {
                target: NumberType::BigInteger,
                ..
            })
        ));
        assert_eq!(dec("-99.99").to_bigint(), Ok(BigInt::from(-99)));
    }

    #[test]
    fn textual_numbers_resolve_lazily() {
        let n = Number::Textual("123456789012345678901234567890".into());
        assert_eq!(n.number_type(), None);
        assert!(matches!(n.resolve().unwrap().as_ref(), Number::BigInt(_)));
        assert!(matches!(
            Number::Textual("1.25".into()).resolve().unwrap().as_ref(),
            Number::Double(d) if *d == 1.25
        ));
        assert_eq!(
            Number::Textual("12abc".into()).to_i32(),
            Err(BufferError::InvalidNumber("12abc".into()))
        );
        assert_eq!(n.to_string(), "123456789012345678901234567890");
    }

    #[test]
    fn unsigned_conversions_pick_the_narrowest_fit() {
        assert_eq!(Number::from(u64::MAX).number_type(), Some(NumberType::BigInteger));
        assert_eq!(Number::from(7u64), Number::Long(7));
        assert_eq!(Number::from(7u8), Number::Int(7));
    }
}
