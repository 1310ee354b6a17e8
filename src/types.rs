//! # OPC UA built-in types
//!
//! The 25 built-in types of the OPC UA type system, together with the two
//! traits every wire-visible type implements: [`BinaryEncode`] and
//! [`BinaryDecode`]. Registered types additionally implement [`UaType`] to
//! hand out their descriptor, and [`UaMessage`] so they can travel inside an
//! [`ExtensionObject`] without their concrete type being known.

mod data_value;
mod date_time;
mod diagnostic_info;
mod extension_object;
mod guid;
mod localized_text;
mod node_id;
mod qualified_name;
mod status_code;
mod strings;
mod variant;

use core::any::Any;

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::registry::DataTypeDescriptor;

pub use self::{
    data_value::DataValue,
    date_time::DateTime,
    diagnostic_info::DiagnosticInfo,
    extension_object::ExtensionObject,
    guid::Guid,
    localized_text::LocalizedText,
    node_id::{ExpandedNodeId, Identifier, NodeId},
    qualified_name::QualifiedName,
    status_code::StatusCode,
    strings::{ByteString, UaString, XmlElement},
    variant::{Variant, VariantArray},
};

/// The identifiers of the built-in types, as used in the Variant encoding
/// mask and in the primitive descriptors.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum BuiltInTypeId {
    Boolean = 1,
    SByte = 2,
    Byte = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    String = 12,
    DateTime = 13,
    Guid = 14,
    ByteString = 15,
    XmlElement = 16,
    NodeId = 17,
    ExpandedNodeId = 18,
    StatusCode = 19,
    QualifiedName = 20,
    LocalizedText = 21,
    ExtensionObject = 22,
    DataValue = 23,
    Variant = 24,
    DiagnosticInfo = 25,
}

impl BuiltInTypeId {
    /// Returns the type id for a raw identifier in `1..=25`.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            1 => Self::Boolean,
            2 => Self::SByte,
            3 => Self::Byte,
            4 => Self::Int16,
            5 => Self::UInt16,
            6 => Self::Int32,
            7 => Self::UInt32,
            8 => Self::Int64,
            9 => Self::UInt64,
            10 => Self::Float,
            11 => Self::Double,
            12 => Self::String,
            13 => Self::DateTime,
            14 => Self::Guid,
            15 => Self::ByteString,
            16 => Self::XmlElement,
            17 => Self::NodeId,
            18 => Self::ExpandedNodeId,
            19 => Self::StatusCode,
            20 => Self::QualifiedName,
            21 => Self::LocalizedText,
            22 => Self::ExtensionObject,
            23 => Self::DataValue,
            24 => Self::Variant,
            25 => Self::DiagnosticInfo,
            _ => return None,
        })
    }
}

/// A **data type** that can be encoded to OPC UA Binary.
pub trait BinaryEncode {
    /// The exact number of bytes [`BinaryEncode::encode`] writes for `self`.
    fn encoded_size(&self) -> usize;

    /// Encodes this value to the given encoder.
    ///
    /// # Errors
    /// Fails when the value is not representable on the wire or the encoder
    /// limits are exceeded. Registered structures and unions make no
    /// partial commits: on failure the writer is rewound to where the
    /// encode started.
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError>;
}

/// A **data type** that can be decoded from OPC UA Binary.
pub trait BinaryDecode: Sized {
    /// Decodes a freshly owned value from the given decoder. Nothing in the
    /// returned value borrows from the decoder's input.
    ///
    /// # Errors
    /// Fails when the input is malformed, truncated, or exceeds the
    /// decoder's limits. A failed decode returns no partial value.
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError>;
}

/// A type registered in the descriptor registry.
pub trait UaType: BinaryEncode + BinaryDecode {
    /// The process-lifetime descriptor for this type.
    fn descriptor() -> &'static DataTypeDescriptor;
}

/// A registered value whose concrete type has been erased, as carried by a
/// decoded [`ExtensionObject`].
pub trait UaMessage: Any + core::fmt::Debug + Send + Sync {
    /// The descriptor of the concrete type.
    fn descriptor(&self) -> &'static DataTypeDescriptor;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_message(&self) -> Box<dyn UaMessage>;
    fn eq_message(&self, other: &dyn UaMessage) -> bool;
    /// Encodes the body without any ExtensionObject framing.
    fn encode_message(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError>;
    /// The exact size of [`UaMessage::encode_message`]'s output.
    fn message_size(&self) -> usize;
}

impl dyn UaMessage {
    /// Borrows the concrete value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: UaMessage>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

impl Clone for Box<dyn UaMessage> {
    fn clone(&self) -> Self {
        self.clone_message()
    }
}

impl PartialEq for Box<dyn UaMessage> {
    fn eq(&self, other: &Self) -> bool {
        self.eq_message(other.as_ref())
    }
}

macro_rules! wire_scalar {
    ($($ty:ty => $write:ident, $read:ident, $size:expr;)+) => {$(
        impl BinaryEncode for $ty {
            fn encoded_size(&self) -> usize {
                $size
            }

            fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
                encoder.$write(*self)
            }
        }

        impl BinaryDecode for $ty {
            fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
                decoder.$read()
            }
        }
    )+}
}

wire_scalar! {
    bool => write_bool, read_bool, 1;
    i8 => write_i8, read_i8, 1;
    u8 => write_u8, read_u8, 1;
    i16 => write_i16, read_i16, 2;
    u16 => write_u16, read_u16, 2;
    i32 => write_i32, read_i32, 4;
    u32 => write_u32, read_u32, 4;
    i64 => write_i64, read_i64, 8;
    u64 => write_u64, read_u64, 8;
    f32 => write_f32, read_f32, 4;
    f64 => write_f64, read_f64, 8;
}

/// Arrays are modelled as `Option<Vec<T>>` so the wire's null array (length
/// −1) stays distinguishable from the empty one (length 0).
impl<T: BinaryEncode> BinaryEncode for Option<Vec<T>> {
    fn encoded_size(&self) -> usize {
        4 + self
            .as_ref()
            .map_or(0, |values| values.iter().map(BinaryEncode::encoded_size).sum())
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        match self {
            None => encoder.write_i32(-1),
            Some(values) => {
                encoder.write_array_length(values.len())?;
                for value in values {
                    value.encode(encoder)?;
                }
                Ok(())
            }
        }
    }
}

impl<T: BinaryDecode> BinaryDecode for Option<Vec<T>> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let Some(length) = decoder.read_array_length()? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(length);
        for _ in 0..length {
            values.push(T::decode(decoder)?);
        }
        Ok(Some(values))
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn scalar_round_trips() {
        round_trip!(bool, true, &[0x01]);
        round_trip!(bool, false, &[0x00]);
        round_trip!(u8, 0xAB, &[0xAB]);
        round_trip!(i8, -1, &[0xFF]);
        round_trip!(i16, -2, &[0xFE, 0xFF]);
        round_trip!(u16, 0x1234, &[0x34, 0x12]);
        round_trip!(i32, -2, &[0xFE, 0xFF, 0xFF, 0xFF]);
        round_trip!(u32, 0xDEAD_BEEF, &[0xEF, 0xBE, 0xAD, 0xDE]);
        round_trip!(i64, -2, &[0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        round_trip!(u64, 1, &[1, 0, 0, 0, 0, 0, 0, 0]);
        round_trip!(f32, -6.5, &[0x00, 0x00, 0xD0, 0xC0]);
        round_trip!(f64, 1.0, &[0, 0, 0, 0, 0, 0, 0xF0, 0x3F]);
    }

    #[test]
    fn boolean_decodes_any_nonzero_as_true() {
        decode_ok!(bool, &[0x02], true);
    }

    #[test]
    fn arrays_distinguish_null_and_empty() {
        round_trip!(Option<Vec<i32>>, None, &[0xFF, 0xFF, 0xFF, 0xFF]);
        round_trip!(Option<Vec<i32>>, Some(vec![]), &[0x00, 0x00, 0x00, 0x00]);
        round_trip!(
            Option<Vec<i32>>,
            Some(vec![1, -2]),
            &[0x02, 0x00, 0x00, 0x00, 1, 0, 0, 0, 0xFE, 0xFF, 0xFF, 0xFF]
        );
    }
}
