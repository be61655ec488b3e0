//! Conversion of raw query values into the scalar types a record field can hold.
use crate::errors::FormatError;

/// A type that can be parsed out of a single raw query value.
///
/// Implemented for `String`, `bool` and every primitive integer type.
/// This trait is sealed: the set of supported scalars is closed.
pub trait Scalar: Sized + sealed::Sealed {
    fn coerce(raw: &str) -> Result<Self, FormatError>;
}

mod sealed {
    pub trait Sealed {}
}

impl sealed::Sealed for String {}
impl Scalar for String {
    fn coerce(raw: &str) -> Result<Self, FormatError> {
        Ok(raw.to_owned())
    }
}

impl sealed::Sealed for bool {}
impl Scalar for bool {
    fn coerce(raw: &str) -> Result<Self, FormatError> {
        parse_bool(raw)
    }
}

/// Accepts exactly `1 t T TRUE true True` and `0 f F FALSE false False`.
pub(crate) fn parse_bool(raw: &str) -> Result<bool, FormatError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(FormatError::InvalidBoolean { raw: raw.to_owned() }),
    }
}

macro_rules! signed {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Scalar for $ty {
                fn coerce(raw: &str) -> Result<Self, FormatError> {
                    raw.parse::<$ty>()
                        .map_err(|_| FormatError::InvalidInteger { raw: raw.to_owned() })
                }
            }
            impl SignedSlot for $ty {
                fn set(&mut self, raw: &str) -> Result<(), FormatError> {
                    *self = <$ty as Scalar>::coerce(raw)?;
                    Ok(())
                }
            }
        )*
    };
}

macro_rules! unsigned {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Scalar for $ty {
                fn coerce(raw: &str) -> Result<Self, FormatError> {
                    // `FromStr` tolerates a leading `+`, unsigned values must be bare digits.
                    if raw.starts_with('+') {
                        return Err(FormatError::InvalidUnsignedInteger { raw: raw.to_owned() });
                    }
                    raw.parse::<$ty>()
                        .map_err(|_| FormatError::InvalidUnsignedInteger { raw: raw.to_owned() })
                }
            }
            impl UnsignedSlot for $ty {
                fn set(&mut self, raw: &str) -> Result<(), FormatError> {
                    *self = <$ty as Scalar>::coerce(raw)?;
                    Ok(())
                }
            }
        )*
    };
}

signed!(i8, i16, i32, i64, i128, isize);
unsigned!(u8, u16, u32, u64, u128, usize);

/// Exclusive access to a signed integer field, erased over its width.
///
/// Used by [`Slot::Signed`](crate::Slot::Signed).
/// Implemented for `i8`, `i16`, `i32`, `i64`, `i128` and `isize` only.
pub trait SignedSlot: sealed::Sealed {
    /// Coerce `raw` and, if it succeeds, overwrite the field.
    fn set(&mut self, raw: &str) -> Result<(), FormatError>;
}

/// Exclusive access to an unsigned integer field, erased over its width.
///
/// Used by [`Slot::Unsigned`](crate::Slot::Unsigned).
/// Implemented for `u8`, `u16`, `u32`, `u64`, `u128` and `usize` only.
pub trait UnsignedSlot: sealed::Sealed {
    /// Coerce `raw` and, if it succeeds, overwrite the field.
    fn set(&mut self, raw: &str) -> Result<(), FormatError>;
}

/// Exclusive access to a sequence field, erased over its element type.
///
/// Used by [`Slot::Array`](crate::Slot::Array).
pub trait ArraySlot {
    /// Coerce every item, after trimming surrounding whitespace.
    ///
    /// The field is replaced only if every item coerces successfully.
    fn set(&mut self, items: &[String]) -> Result<(), FormatError>;
}

impl<T: Scalar> ArraySlot for Vec<T> {
    fn set(&mut self, items: &[String]) -> Result<(), FormatError> {
        let coerced = items
            .iter()
            .map(|item| T::coerce(item.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        *self = coerced;
        Ok(())
    }
}
