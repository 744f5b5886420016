//! Decoded field values of an image file directory.

use crate::error::{TiffError, TiffFormatError, TiffResult};

use self::Value::{
    Ascii, Byte, Double, Float, List, Rational, SRational, Short, Signed, SignedByte, SignedShort,
    Unsigned,
};

/// A decoded tag value.
///
/// The directory walker that produced the [`Directory`](crate::Directory) has
/// already resolved offsets and byte order, so values are plain host-order
/// numbers here. A field with more than one value is represented as a `List`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    Byte(u8),
    Short(u16),
    SignedByte(i8),
    SignedShort(i16),
    Signed(i32),
    Unsigned(u32),
    Float(f32),
    Double(f64),
    Rational(u32, u32),
    SRational(i32, i32),
    Ascii(String),
    List(Vec<Value>),
}

impl Value {
    pub fn into_u8(self) -> TiffResult<u8> {
        match self {
            Byte(val) => Ok(val),
            val => Err(TiffError::FormatError(
                TiffFormatError::UnsignedIntegerExpected(val),
            )),
        }
    }

    pub fn into_u16(self) -> TiffResult<u16> {
        match self {
            Byte(val) => Ok(val.into()),
            Short(val) => Ok(val),
            Unsigned(val) => Ok(u16::try_from(val)?),
            val => Err(TiffError::FormatError(
                TiffFormatError::UnsignedIntegerExpected(val),
            )),
        }
    }

    pub fn into_u32(self) -> TiffResult<u32> {
        match self {
            Byte(val) => Ok(val.into()),
            Short(val) => Ok(val.into()),
            Unsigned(val) => Ok(val),
            val => Err(TiffError::FormatError(
                TiffFormatError::UnsignedIntegerExpected(val),
            )),
        }
    }

    pub fn into_u64(self) -> TiffResult<u64> {
        match self {
            Byte(val) => Ok(val.into()),
            Short(val) => Ok(val.into()),
            Unsigned(val) => Ok(val.into()),
            val => Err(TiffError::FormatError(
                TiffFormatError::UnsignedIntegerExpected(val),
            )),
        }
    }

    pub fn into_i32(self) -> TiffResult<i32> {
        match self {
            SignedByte(val) => Ok(val.into()),
            SignedShort(val) => Ok(val.into()),
            Signed(val) => Ok(val),
            val => Err(TiffError::FormatError(
                TiffFormatError::SignedIntegerExpected(val),
            )),
        }
    }

    /// Convert a single numeric value of any width or signedness to `f64`.
    ///
    /// Rationals evaluate to their quotient, which is how resolution-style
    /// fields are consumed.
    pub fn into_f64(self) -> TiffResult<f64> {
        match self {
            Byte(val) => Ok(val.into()),
            Short(val) => Ok(val.into()),
            Unsigned(val) => Ok(val.into()),
            SignedByte(val) => Ok(val.into()),
            SignedShort(val) => Ok(val.into()),
            Signed(val) => Ok(val.into()),
            Float(val) => Ok(val.into()),
            Double(val) => Ok(val),
            Rational(num, den) => Ok(f64::from(num) / f64::from(den)),
            SRational(num, den) => Ok(f64::from(num) / f64::from(den)),
            val => Err(TiffError::FormatError(TiffFormatError::NumericExpected(
                val,
            ))),
        }
    }

    pub fn into_string(self) -> TiffResult<String> {
        match self {
            Ascii(val) => Ok(val),
            val => Err(TiffError::FormatError(TiffFormatError::NumericExpected(
                val,
            ))),
        }
    }

    pub fn into_u8_vec(self) -> TiffResult<Vec<u8>> {
        match self {
            List(vec) => vec.into_iter().map(Value::into_u8).collect(),
            Byte(val) => Ok(vec![val]),
            val => Err(TiffError::FormatError(
                TiffFormatError::UnsignedIntegerExpected(val),
            )),
        }
    }

    pub fn into_u16_vec(self) -> TiffResult<Vec<u16>> {
        match self {
            List(vec) => vec.into_iter().map(Value::into_u16).collect(),
            val => Ok(vec![val.into_u16()?]),
        }
    }

    pub fn into_u32_vec(self) -> TiffResult<Vec<u32>> {
        match self {
            List(vec) => vec.into_iter().map(Value::into_u32).collect(),
            Rational(num, den) => Ok(vec![num, den]),
            val => Ok(vec![val.into_u32()?]),
        }
    }

    pub fn into_u64_vec(self) -> TiffResult<Vec<u64>> {
        match self {
            List(vec) => vec.into_iter().map(Value::into_u64).collect(),
            val => Ok(vec![val.into_u64()?]),
        }
    }

    /// A scalar value, or the sum over all values of an array field.
    ///
    /// Fields like bits-per-sample may legally hold either a single count or
    /// one count per sample; consumers interested in the total width use this.
    pub fn into_sum_u32(self) -> TiffResult<u32> {
        match self {
            List(vec) => {
                let mut sum = 0u32;
                for v in vec {
                    sum = sum
                        .checked_add(v.into_u32()?)
                        .ok_or(TiffError::IntSizeError)?;
                }
                Ok(sum)
            }
            val => val.into_u32(),
        }
    }
}
