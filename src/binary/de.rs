//! # Decoding OPC UA Binary.

use crate::binary::{parser, Limits};
use crate::error::{DecodeError, DecodingLimit};

/// An OPC UA Binary decoder over a borrowed input slice.
///
/// Decoded values are freshly owned; nothing returned by a decode borrows
/// from the input buffer. Lengths are validated against both the configured
/// [`Limits`] and the remaining input before anything is allocated.
pub struct Decoder<'input> {
    input: &'input [u8],
    limits: Limits,
    depth: u32,
}

impl<'input> Decoder<'input> {
    /// Creates a new instance over `input`.
    ///
    /// # Errors
    /// Fails with `LimitExceeded` if the input is already larger than the
    /// configured maximum message size.
    pub fn new(input: &'input [u8], limits: Limits) -> Result<Self, DecodeError> {
        if input.len() > limits.max_message_size {
            return Err(DecodeError::limit_exceeded(
                DecodingLimit::MessageSize,
                input.len() as u64,
                limits.max_message_size as u64,
            ));
        }
        Ok(Self {
            input,
            limits,
            depth: 0,
        })
    }

    /// The limits this decoder applies.
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Limits for a sub-decoder over an embedded body, with the nesting
    /// budget reduced by the depth already consumed here.
    #[must_use]
    pub(crate) fn nested_limits(&self) -> Limits {
        Limits {
            max_nesting_depth: self.limits.max_nesting_depth.saturating_sub(self.depth),
            ..self.limits
        }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Consumes the decoder, returning the unread remainder of the input.
    #[must_use]
    pub fn into_remainder(self) -> &'input [u8] {
        self.input
    }

    /// Runs `body` one nesting level deeper, failing when the configured
    /// depth is exhausted. Guards the recursive types (DiagnosticInfo,
    /// ExtensionObject, Variant) and every constructed decode.
    pub fn nested<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        if self.depth >= self.limits.max_nesting_depth {
            return Err(DecodeError::nesting_depth_exceeded(
                self.limits.max_nesting_depth,
            ));
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let (rest, value) = parser::parse_u8(self.input)?;
        self.input = rest;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        let (rest, value) = parser::parse_i8(self.input)?;
        self.input = rest;
        Ok(value)
    }

    /// Reads one byte as Boolean; any non-zero value decodes as `true`.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let (rest, value) = parser::parse_u16(self.input)?;
        self.input = rest;
        Ok(value)
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        let (rest, value) = parser::parse_i16(self.input)?;
        self.input = rest;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let (rest, value) = parser::parse_u32(self.input)?;
        self.input = rest;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let (rest, value) = parser::parse_i32(self.input)?;
        self.input = rest;
        Ok(value)
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let (rest, value) = parser::parse_u64(self.input)?;
        self.input = rest;
        Ok(value)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        let (rest, value) = parser::parse_i64(self.input)?;
        self.input = rest;
        Ok(value)
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        let (rest, value) = parser::parse_f32(self.input)?;
        self.input = rest;
        Ok(value)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        let (rest, value) = parser::parse_f64(self.input)?;
        self.input = rest;
        Ok(value)
    }

    /// Reads `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'input [u8], DecodeError> {
        let (rest, bytes) = parser::parse_bytes(self.input, count)?;
        self.input = rest;
        Ok(bytes)
    }

    fn read_sequence_length(
        &mut self,
        limit: DecodingLimit,
        maximum: usize,
    ) -> Result<Option<usize>, DecodeError> {
        let length = self.read_i32()?;
        if length < 0 {
            return Ok(None);
        }
        let length = length as usize;
        if length > maximum {
            return Err(DecodeError::limit_exceeded(
                limit,
                length as u64,
                maximum as u64,
            ));
        }
        Ok(Some(length))
    }

    /// Reads a length-prefixed byte sequence under the String limit.
    /// Length −1 yields `None`.
    pub fn read_string_bytes(&mut self) -> Result<Option<&'input [u8]>, DecodeError> {
        match self.read_sequence_length(DecodingLimit::StringLength, self.limits.max_string_length)? {
            None => Ok(None),
            Some(length) => self.read_bytes(length).map(Some),
        }
    }

    /// Reads a length-prefixed byte sequence under the ByteString limit.
    /// Length −1 yields `None`.
    pub fn read_byte_string_bytes(&mut self) -> Result<Option<&'input [u8]>, DecodeError> {
        let maximum = self.limits.max_byte_string_length;
        match self.read_sequence_length(DecodingLimit::ByteStringLength, maximum)? {
            None => Ok(None),
            Some(length) => self.read_bytes(length).map(Some),
        }
    }

    /// Reads an array length prefix. `None` denotes the null array.
    ///
    /// A declared length beyond the array limit, or beyond the number of
    /// bytes actually left in the input (every element encodes to at least
    /// one byte), fails here so nothing is allocated for it.
    pub fn read_array_length(&mut self) -> Result<Option<usize>, DecodeError> {
        let maximum = self.limits.max_array_length;
        match self.read_sequence_length(DecodingLimit::ArrayLength, maximum)? {
            None => Ok(None),
            Some(length) => {
                if length > self.remaining() {
                    return Err(DecodeError::incomplete(nom::Needed::new(
                        length - self.remaining(),
                    )));
                }
                Ok(Some(length))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;

    #[test]
    fn oversized_input_is_refused_up_front() {
        let limits = Limits {
            max_message_size: 8,
            ..Limits::default()
        };
        assert!(Decoder::new(&[0u8; 9], limits).is_err());
        assert!(Decoder::new(&[0u8; 8], limits).is_ok());
    }

    #[test]
    fn hostile_array_length_fails_before_allocating() {
        // Declares 0x7FFFFFF0 elements with four bytes of payload.
        let input = [0xF0, 0xFF, 0xFF, 0x7F, 1, 2, 3, 4];
        let mut decoder = Decoder::new(&input, Limits::default()).unwrap();
        let err = decoder.read_array_length().unwrap_err();
        assert!(matches!(
            *err.kind,
            DecodeErrorKind::LimitExceeded { .. }
        ));
    }

    #[test]
    fn array_length_cannot_exceed_remaining_input() {
        let limits = Limits {
            max_array_length: 1_000_000,
            ..Limits::default()
        };
        // Declares 100 elements but only two payload bytes follow.
        let input = [100, 0, 0, 0, 1, 2];
        let mut decoder = Decoder::new(&input, limits).unwrap();
        let err = decoder.read_array_length().unwrap_err();
        assert!(matches!(*err.kind, DecodeErrorKind::Incomplete { .. }));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let limits = Limits {
            max_nesting_depth: 2,
            ..Limits::default()
        };
        let mut decoder = Decoder::new(&[], limits).unwrap();
        let result: Result<(), _> = decoder.nested(|d| d.nested(|d| d.nested(|_| Ok(()))));
        assert!(matches!(
            *result.unwrap_err().kind,
            DecodeErrorKind::NestingDepthExceeded { maximum: 2 }
        ));
        // The depth unwinds, so a fresh nested decode is fine again.
        assert!(decoder.nested(|_| Ok(())).is_ok());
    }
}
