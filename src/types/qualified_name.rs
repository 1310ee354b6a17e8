//! The `QualifiedName` type.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode, UaString};

/// A name qualified by the index of the namespace it belongs to.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: UaString,
}

impl QualifiedName {
    #[must_use]
    pub fn new(namespace_index: u16, name: impl Into<UaString>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// The null qualified name: index 0 and a null name.
    #[must_use]
    pub fn null() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && self.name.is_null()
    }
}

impl core::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "{}:", self.namespace_index)?;
        }
        write!(f, "{}", self.name)
    }
}

impl BinaryEncode for QualifiedName {
    fn encoded_size(&self) -> usize {
        2 + self.name.encoded_size()
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_u16(self.namespace_index)?;
        self.name.encode(encoder)
    }
}

impl BinaryDecode for QualifiedName {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let namespace_index = decoder.read_u16()?;
        let name = UaString::decode(decoder)?;
        Ok(Self {
            namespace_index,
            name,
        })
    }
}
