//! # The OPC UA Binary codec
//!
//! Little-endian, length-prefixed encoding of the built-in type system and
//! every registered structure. The encoder and decoder are driven by the
//! [`BinaryEncode`]/[`BinaryDecode`] implementations that the descriptor
//! macros emit, so the mask, selector and array rules live in one place.
//!
//! Decoding is bounded by [`Limits`]: a hostile message cannot make the
//! decoder allocate past the configured maxima, and nesting (DiagnosticInfo,
//! ExtensionObject, Variant) is depth-limited.

pub mod de;
pub mod enc;
pub(crate) mod parser;

pub use de::Decoder;
pub use enc::Encoder;

use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode};

/// Limits applied while encoding and decoding.
///
/// Lengths are checked against these maxima before any allocation happens;
/// exceeding one fails with a `LimitExceeded` error that maps to
/// `BadEncodingLimitsExceeded`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Maximum decoded length of a String in bytes.
    pub max_string_length: usize,
    /// Maximum decoded length of a ByteString in bytes.
    pub max_byte_string_length: usize,
    /// Maximum number of elements in a single array.
    pub max_array_length: usize,
    /// Maximum size of a whole message in bytes, applied to encoder output
    /// and decoder input alike.
    pub max_message_size: usize,
    /// Maximum nesting depth of recursive constructs.
    pub max_nesting_depth: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_string_length: 65535,
            max_byte_string_length: 65535,
            max_array_length: 65535,
            max_message_size: 16 * 1024 * 1024,
            max_nesting_depth: 100,
        }
    }
}

/// Encodes `value` to its OPC UA Binary form with default limits.
///
/// # Errors
/// Returns an `EncodeError` if the value cannot be represented or exceeds
/// the configured maximum message size.
pub fn encode<T: BinaryEncode>(value: &T) -> Result<Vec<u8>, EncodeError> {
    encode_with_limits(value, Limits::default())
}

/// Encodes `value` to its OPC UA Binary form with the given limits.
///
/// # Errors
/// Returns an `EncodeError` if the value cannot be represented or exceeds
/// the configured maximum message size.
pub fn encode_with_limits<T: BinaryEncode>(
    value: &T,
    limits: Limits,
) -> Result<Vec<u8>, EncodeError> {
    let mut output = Vec::with_capacity(value.encoded_size().min(limits.max_message_size));
    let mut encoder = Encoder::new(&mut output, limits);
    value.encode(&mut encoder)?;
    Ok(output)
}

/// The exact number of bytes [`encode`] produces for `value`.
pub fn encoded_size<T: BinaryEncode>(value: &T) -> usize {
    value.encoded_size()
}

/// Decodes a `T` from `input` with default limits. The whole input must be
/// consumed.
///
/// # Errors
/// Returns a `DecodeError` if the bytes are not a valid encoding of `T`.
pub fn decode<T: BinaryDecode>(input: &[u8]) -> Result<T, DecodeError> {
    decode_with_limits(input, Limits::default())
}

/// Decodes a `T` from `input` with the given limits. The whole input must be
/// consumed.
///
/// # Errors
/// Returns a `DecodeError` if the bytes are not a valid encoding of `T`.
pub fn decode_with_limits<T: BinaryDecode>(
    input: &[u8],
    limits: Limits,
) -> Result<T, DecodeError> {
    let mut decoder = Decoder::new(input, limits)?;
    let value = T::decode(&mut decoder)?;
    if !decoder.is_empty() {
        return Err(DecodeError::invalid_encoding(format!(
            "{} trailing bytes after the encoding",
            decoder.remaining()
        )));
    }
    Ok(value)
}

/// Decodes a `T` from the front of `input`, returning the value and the
/// unconsumed remainder.
///
/// # Errors
/// Returns a `DecodeError` if the bytes are not a valid encoding of `T`.
pub fn decode_with_remainder<T: BinaryDecode>(
    input: &[u8],
    limits: Limits,
) -> Result<(T, &[u8]), DecodeError> {
    let mut decoder = Decoder::new(input, limits)?;
    let value = T::decode(&mut decoder)?;
    let remainder = decoder.into_remainder();
    Ok((value, remainder))
}
