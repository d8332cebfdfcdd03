//! Constructor byte values of the AMQP 1.0 primitive type system.

use std::{convert::TryFrom, fmt::Display};

use crate::error::Error;

/// Constructor byte for each AMQP 1.0 encoding, per section 1.6.
///
/// Several logical types have more than one code: a "small"/fixed-zero-width
/// encoding used when the value fits, and a "large" encoding used otherwise.
/// The decoder accepts all of them; the encoder always picks the narrowest
/// one that fits (see [`crate::codec::encode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
#[repr(u8)]
pub enum EncodingCodes {
    DescribedType = 0x00,

    Null = 0x40,

    Boolean = 0x56,
    BooleanTrue = 0x41,
    BooleanFalse = 0x42,

    UByte = 0x50,

    UShort = 0x60,

    UInt = 0x70,
    SmallUint = 0x52,
    Uint0 = 0x43,

    ULong = 0x80,
    SmallUlong = 0x53,
    Ulong0 = 0x44,

    Byte = 0x51,

    Short = 0x61,

    Int = 0x71,
    SmallInt = 0x54,

    Long = 0x81,
    SmallLong = 0x55,

    Float = 0x72,

    Double = 0x82,

    /// Not implemented. Recognized only so decode can report
    /// [`Error::Unsupported`] instead of a generic format-code error.
    Decimal32 = 0x74,
    /// Not implemented. See [`EncodingCodes::Decimal32`].
    Decimal64 = 0x84,
    /// Not implemented. See [`EncodingCodes::Decimal32`].
    Decimal128 = 0x94,

    Char = 0x73,

    Timestamp = 0x83,

    Uuid = 0x98,

    VBin8 = 0xa0,
    VBin32 = 0xb0,

    Str8 = 0xa1,
    Str32 = 0xb1,

    Sym8 = 0xa3,
    Sym32 = 0xb3,

    List0 = 0x45,
    List8 = 0xc0,
    List32 = 0xd0,

    Map8 = 0xc1,
    Map32 = 0xd1,

    Array8 = 0xe0,
    Array32 = 0xf0,
}

impl EncodingCodes {
    /// True for the three decimal codes, which are parsed but never
    /// supported as values.
    pub fn is_decimal(self) -> bool {
        matches!(
            self,
            EncodingCodes::Decimal32 | EncodingCodes::Decimal64 | EncodingCodes::Decimal128
        )
    }
}

impl Display for EncodingCodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:0x{:x}", self, *self as u8)
    }
}

impl TryFrom<u8> for EncodingCodes {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let code = match value {
            0x00 => EncodingCodes::DescribedType,

            0x40 => EncodingCodes::Null,

            0x56 => EncodingCodes::Boolean,
            0x41 => EncodingCodes::BooleanTrue,
            0x42 => EncodingCodes::BooleanFalse,

            0x50 => EncodingCodes::UByte,

            0x60 => EncodingCodes::UShort,

            0x70 => EncodingCodes::UInt,
            0x52 => EncodingCodes::SmallUint,
            0x43 => EncodingCodes::Uint0,

            0x80 => EncodingCodes::ULong,
            0x53 => EncodingCodes::SmallUlong,
            0x44 => EncodingCodes::Ulong0,

            0x51 => EncodingCodes::Byte,

            0x61 => EncodingCodes::Short,

            0x71 => EncodingCodes::Int,
            0x54 => EncodingCodes::SmallInt,

            0x81 => EncodingCodes::Long,
            0x55 => EncodingCodes::SmallLong,

            0x72 => EncodingCodes::Float,

            0x82 => EncodingCodes::Double,

            0x74 => EncodingCodes::Decimal32,
            0x84 => EncodingCodes::Decimal64,
            0x94 => EncodingCodes::Decimal128,

            0x73 => EncodingCodes::Char,

            0x83 => EncodingCodes::Timestamp,

            0x98 => EncodingCodes::Uuid,

            0xa0 => EncodingCodes::VBin8,
            0xb0 => EncodingCodes::VBin32,

            0xa1 => EncodingCodes::Str8,
            0xb1 => EncodingCodes::Str32,

            0xa3 => EncodingCodes::Sym8,
            0xb3 => EncodingCodes::Sym32,

            0x45 => EncodingCodes::List0,
            0xc0 => EncodingCodes::List8,
            0xd0 => EncodingCodes::List32,

            0xc1 => EncodingCodes::Map8,
            0xd1 => EncodingCodes::Map32,

            0xe0 => EncodingCodes::Array8,
            0xf0 => EncodingCodes::Array32,

            other => return Err(Error::Malformed(format!("invalid format code 0x{other:x}"))),
        };

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_known_code() {
        let codes = [
            EncodingCodes::Null,
            EncodingCodes::Boolean,
            EncodingCodes::UByte,
            EncodingCodes::Short,
            EncodingCodes::SmallUlong,
            EncodingCodes::Str32,
            EncodingCodes::Sym8,
            EncodingCodes::Array32,
        ];
        for code in codes {
            let byte = code as u8;
            assert_eq!(EncodingCodes::try_from(byte).unwrap(), code);
        }
    }

    #[test]
    fn unknown_byte_is_malformed() {
        assert!(EncodingCodes::try_from(0x20u8).is_err());
    }

    #[test]
    fn decimal_codes_are_flagged() {
        assert!(EncodingCodes::Decimal128.is_decimal());
        assert!(!EncodingCodes::Double.is_decimal());
    }
}
