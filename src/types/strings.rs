//! The length-prefixed string types: `String`, `ByteString` and
//! `XmlElement`. All three distinguish the null value (wire length −1) from
//! the empty one (length 0), so they wrap an `Option`.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode};

/// The OPC UA `String` type: a length-prefixed UTF-8 byte sequence that may
/// be null. Named to avoid the obvious clash with `std::string::String`.
///
/// `None` sorts before every non-null value, so the null string is the
/// smallest in the total order.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UaString(Option<String>);

impl UaString {
    /// The null string.
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// The contained string, or `None` when null.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Byte length of the contained string; the null string has length 0.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, String::len)
    }

    /// True for both the null string and the empty non-null string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for UaString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UaString {
    fn from(value: String) -> Self {
        Self(Some(value))
    }
}

impl From<Option<String>> for UaString {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for UaString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str().unwrap_or_default())
    }
}

impl BinaryEncode for UaString {
    fn encoded_size(&self) -> usize {
        4 + self.len()
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_byte_sequence(self.0.as_deref().map(str::as_bytes))
    }
}

impl BinaryDecode for UaString {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        match decoder.read_string_bytes()? {
            None => Ok(Self::null()),
            Some(bytes) => core::str::from_utf8(bytes)
                .map(|s| Self::new(s))
                .map_err(|_| DecodeError::from_kind(DecodeErrorKind::InvalidUtf8)),
        }
    }
}

/// The OPC UA `ByteString` type: length-prefixed opaque bytes that may be
/// null.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ByteString(Option<Vec<u8>>);

impl ByteString {
    /// The null byte string.
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self(Some(value.into()))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.0.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the byte string, yielding its bytes. The null byte string
    /// yields nothing.
    #[must_use]
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.0
    }
}

impl From<&[u8]> for ByteString {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        Self(Some(value))
    }
}

impl BinaryEncode for ByteString {
    fn encoded_size(&self) -> usize {
        4 + self.len()
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_byte_sequence(self.0.as_deref())
    }
}

impl BinaryDecode for ByteString {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(match decoder.read_byte_string_bytes()? {
            None => Self::null(),
            Some(bytes) => Self::new(bytes),
        })
    }
}

/// The OPC UA `XmlElement` type. Carries an XML fragment as opaque bytes
/// with ByteString wire semantics; this crate never interprets the XML.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct XmlElement(pub ByteString);

impl XmlElement {
    #[must_use]
    pub const fn null() -> Self {
        Self(ByteString::null())
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl BinaryEncode for XmlElement {
    fn encoded_size(&self) -> usize {
        self.0.encoded_size()
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        self.0.encode(encoder)
    }
}

impl BinaryDecode for XmlElement {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        ByteString::decode(decoder).map(Self)
    }
}
