//! Low-level little-endian readers shared by the decoder.
//!
//! The streaming variants are used so that truncated input surfaces as
//! `Incomplete { needed }` rather than a generic parse failure.

use nom::bytes::streaming::take;
use nom::number::streaming::{
    le_f32, le_f64, le_i16, le_i32, le_i64, le_i8, le_u16, le_u32, le_u64, le_u8,
};

use crate::error::DecodeError;

pub(crate) type ParseResult<'a, T> = Result<(&'a [u8], T), DecodeError>;

fn map_nom(error: nom::Err<nom::error::Error<&[u8]>>) -> DecodeError {
    match error {
        nom::Err::Incomplete(needed) => DecodeError::incomplete(needed),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            DecodeError::invalid_encoding(format!("parser: {:?}", e.code))
        }
    }
}

macro_rules! scalar_parser {
    ($($name:ident, $parser:ident, $ty:ty;)+) => {$(
        pub(crate) fn $name(input: &[u8]) -> ParseResult<'_, $ty> {
            $parser::<_, nom::error::Error<&[u8]>>(input).map_err(map_nom)
        }
    )+}
}

scalar_parser! {
    parse_u8, le_u8, u8;
    parse_i8, le_i8, i8;
    parse_u16, le_u16, u16;
    parse_i16, le_i16, i16;
    parse_u32, le_u32, u32;
    parse_i32, le_i32, i32;
    parse_u64, le_u64, u64;
    parse_i64, le_i64, i64;
    parse_f32, le_f32, f32;
    parse_f64, le_f64, f64;
}

pub(crate) fn parse_bytes(input: &[u8], count: usize) -> ParseResult<'_, &[u8]> {
    take::<_, _, nom::error::Error<&[u8]>>(count)(input).map_err(map_nom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;

    #[test]
    fn little_endian_scalars() {
        let (rest, value) = parse_u32(&[0x01, 0x02, 0x03, 0x04, 0xAA]).unwrap();
        assert_eq!(value, 0x0403_0201);
        assert_eq!(rest, &[0xAA]);

        let (_, value) = parse_i32(&[0xFE, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(value, -2);
    }

    #[test]
    fn truncated_input_is_incomplete() {
        let err = parse_u64(&[1, 2, 3]).unwrap_err();
        assert!(matches!(*err.kind, DecodeErrorKind::Incomplete { .. }));
    }
}
