#![doc = include_str!("../README.md")]

#[cfg(test)]
macro_rules! round_trip {
    ($typ:ty, $value:expr, $expected:expr) => {{
        let value: $typ = $value;
        let expected: &[u8] = $expected;
        let actual_encoding = match crate::binary::encode(&value) {
            Ok(actual_encoding) => {
                pretty_assertions::assert_eq!(expected, &*actual_encoding);
                actual_encoding
            }
            Err(error) => {
                panic!("Unexpected encoding error: {:?}", error);
            }
        };
        assert_eq!(
            crate::types::BinaryEncode::encoded_size(&value),
            actual_encoding.len()
        );
        let decoded_value: $typ = crate::binary::decode(&actual_encoding).unwrap();
        pretty_assertions::assert_eq!(value, decoded_value);
    }};
}

#[cfg(test)]
macro_rules! decode_error {
    ($typ:ty, $value:expr) => {{
        match crate::binary::decode::<$typ>($value) {
            Ok(_) => {
                panic!("Unexpected decoding success!");
            }
            Err(_) => {
                // Expected a decoding error, so we're good!
            }
        }
    }};
}

#[cfg(test)]
macro_rules! decode_ok {
    ($typ:ty, $value:expr, $expected:expr) => {{
        match crate::binary::decode::<$typ>($value) {
            Ok(result) => {
                pretty_assertions::assert_eq!(result, $expected);
            }
            Err(e) => {
                panic!("Unexpected decoding failure!: {e}");
            }
        }
    }};
}

pub mod binary;
pub mod error;
mod macros;
pub mod registry;
pub mod security;
pub mod service;
pub mod trust;
pub mod types;

pub use binary::{decode, decode_with_limits, encode, encoded_size, Limits};
pub use error::{DecodeError, EncodeError};
pub use types::{BinaryDecode, BinaryEncode, StatusCode, UaType};

/// The single-import module for working with the codec and its types.
pub mod prelude {
    pub use crate::binary::{Decoder, Encoder, Limits};
    pub use crate::error::{DecodeError, EncodeError};
    pub use crate::registry::{self, DataTypeDescriptor, DataTypeKind, DataTypeMember};
    pub use crate::types::{
        BinaryDecode, BinaryEncode, BuiltInTypeId, ByteString, DataValue, DateTime,
        DiagnosticInfo, ExpandedNodeId, ExtensionObject, Guid, LocalizedText, NodeId,
        QualifiedName, StatusCode, UaMessage, UaString, UaType, Variant, XmlElement,
    };
}
