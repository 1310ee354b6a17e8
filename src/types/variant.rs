//! The `Variant` type.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{
    BinaryDecode, BinaryEncode, BuiltInTypeId, ByteString, DataValue, DateTime, DiagnosticInfo,
    ExpandedNodeId, ExtensionObject, Guid, LocalizedText, NodeId, QualifiedName, StatusCode,
    UaString, XmlElement,
};

const ARRAY_BIT: u8 = 0x80;
const DIMENSIONS_BIT: u8 = 0x40;

/// A dynamically typed value: one of the built-in types, scalar or array.
///
/// Multidimensional arrays carry their dimensions next to the flat element
/// list; the product of the dimensions always equals the flat length.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Variant {
    /// The empty variant, encoded as a zero mask byte.
    #[default]
    Empty,
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(UaString),
    DateTime(DateTime),
    Guid(Guid),
    ByteString(ByteString),
    XmlElement(XmlElement),
    NodeId(NodeId),
    ExpandedNodeId(ExpandedNodeId),
    StatusCode(StatusCode),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
    ExtensionObject(ExtensionObject),
    DataValue(Box<DataValue>),
    DiagnosticInfo(Box<DiagnosticInfo>),
    Array(Box<VariantArray>),
}

/// The array payload of a [`Variant`]: a homogeneous flat element list plus
/// optional dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantArray {
    /// The built-in type every element is a scalar of.
    pub type_id: BuiltInTypeId,
    pub values: Vec<Variant>,
    pub dimensions: Option<Vec<u32>>,
}

impl VariantArray {
    fn dimensions_product(dimensions: &[u32]) -> u64 {
        dimensions.iter().map(|d| u64::from(*d)).product()
    }
}

impl Variant {
    /// The built-in type id of this value. `None` for the empty variant;
    /// arrays report their element type.
    #[must_use]
    pub fn type_id(&self) -> Option<BuiltInTypeId> {
        Some(match self {
            Self::Empty => return None,
            Self::Boolean(_) => BuiltInTypeId::Boolean,
            Self::SByte(_) => BuiltInTypeId::SByte,
            Self::Byte(_) => BuiltInTypeId::Byte,
            Self::Int16(_) => BuiltInTypeId::Int16,
            Self::UInt16(_) => BuiltInTypeId::UInt16,
            Self::Int32(_) => BuiltInTypeId::Int32,
            Self::UInt32(_) => BuiltInTypeId::UInt32,
            Self::Int64(_) => BuiltInTypeId::Int64,
            Self::UInt64(_) => BuiltInTypeId::UInt64,
            Self::Float(_) => BuiltInTypeId::Float,
            Self::Double(_) => BuiltInTypeId::Double,
            Self::String(_) => BuiltInTypeId::String,
            Self::DateTime(_) => BuiltInTypeId::DateTime,
            Self::Guid(_) => BuiltInTypeId::Guid,
            Self::ByteString(_) => BuiltInTypeId::ByteString,
            Self::XmlElement(_) => BuiltInTypeId::XmlElement,
            Self::NodeId(_) => BuiltInTypeId::NodeId,
            Self::ExpandedNodeId(_) => BuiltInTypeId::ExpandedNodeId,
            Self::StatusCode(_) => BuiltInTypeId::StatusCode,
            Self::QualifiedName(_) => BuiltInTypeId::QualifiedName,
            Self::LocalizedText(_) => BuiltInTypeId::LocalizedText,
            Self::ExtensionObject(_) => BuiltInTypeId::ExtensionObject,
            Self::DataValue(_) => BuiltInTypeId::DataValue,
            Self::DiagnosticInfo(_) => BuiltInTypeId::DiagnosticInfo,
            Self::Array(array) => array.type_id,
        })
    }

    /// Builds an array variant, checking that every element is a scalar of
    /// `type_id`. An array of `Variant` is exempt from the homogeneity
    /// check: each element is a complete variant of its own.
    ///
    /// # Errors
    /// Fails with `BadInvalidArgument` when an element has another type or
    /// is itself an array.
    pub fn array_of(
        type_id: BuiltInTypeId,
        values: Vec<Variant>,
    ) -> Result<Self, StatusCode> {
        if type_id != BuiltInTypeId::Variant {
            for value in &values {
                if matches!(value, Variant::Array(_)) || value.type_id() != Some(type_id) {
                    return Err(StatusCode::BAD_INVALID_ARGUMENT);
                }
            }
        }
        Ok(Self::Array(Box::new(VariantArray {
            type_id,
            values,
            dimensions: None,
        })))
    }

    /// Builds a multidimensional array variant. The product of `dimensions`
    /// must equal the number of elements.
    ///
    /// # Errors
    /// Fails with `BadInvalidArgument` on a type or dimension mismatch.
    pub fn matrix_of(
        type_id: BuiltInTypeId,
        values: Vec<Variant>,
        dimensions: Vec<u32>,
    ) -> Result<Self, StatusCode> {
        if VariantArray::dimensions_product(&dimensions) != values.len() as u64 {
            return Err(StatusCode::BAD_INVALID_ARGUMENT);
        }
        let mut variant = Self::array_of(type_id, values)?;
        if let Self::Array(array) = &mut variant {
            array.dimensions = Some(dimensions);
        }
        Ok(variant)
    }

    fn scalar_payload_size(&self) -> usize {
        match self {
            Self::Empty | Self::Array(_) => 0,
            Self::Boolean(v) => v.encoded_size(),
            Self::SByte(v) => v.encoded_size(),
            Self::Byte(v) => v.encoded_size(),
            Self::Int16(v) => v.encoded_size(),
            Self::UInt16(v) => v.encoded_size(),
            Self::Int32(v) => v.encoded_size(),
            Self::UInt32(v) => v.encoded_size(),
            Self::Int64(v) => v.encoded_size(),
            Self::UInt64(v) => v.encoded_size(),
            Self::Float(v) => v.encoded_size(),
            Self::Double(v) => v.encoded_size(),
            Self::String(v) => v.encoded_size(),
            Self::DateTime(v) => v.encoded_size(),
            Self::Guid(v) => v.encoded_size(),
            Self::ByteString(v) => v.encoded_size(),
            Self::XmlElement(v) => v.encoded_size(),
            Self::NodeId(v) => v.encoded_size(),
            Self::ExpandedNodeId(v) => v.encoded_size(),
            Self::StatusCode(v) => v.encoded_size(),
            Self::QualifiedName(v) => v.encoded_size(),
            Self::LocalizedText(v) => v.encoded_size(),
            Self::ExtensionObject(v) => v.encoded_size(),
            Self::DataValue(v) => v.encoded_size(),
            Self::DiagnosticInfo(v) => v.encoded_size(),
        }
    }

    fn encode_scalar_payload(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Empty | Self::Array(_) => Ok(()),
            Self::Boolean(v) => v.encode(encoder),
            Self::SByte(v) => v.encode(encoder),
            Self::Byte(v) => v.encode(encoder),
            Self::Int16(v) => v.encode(encoder),
            Self::UInt16(v) => v.encode(encoder),
            Self::Int32(v) => v.encode(encoder),
            Self::UInt32(v) => v.encode(encoder),
            Self::Int64(v) => v.encode(encoder),
            Self::UInt64(v) => v.encode(encoder),
            Self::Float(v) => v.encode(encoder),
            Self::Double(v) => v.encode(encoder),
            Self::String(v) => v.encode(encoder),
            Self::DateTime(v) => v.encode(encoder),
            Self::Guid(v) => v.encode(encoder),
            Self::ByteString(v) => v.encode(encoder),
            Self::XmlElement(v) => v.encode(encoder),
            Self::NodeId(v) => v.encode(encoder),
            Self::ExpandedNodeId(v) => v.encode(encoder),
            Self::StatusCode(v) => v.encode(encoder),
            Self::QualifiedName(v) => v.encode(encoder),
            Self::LocalizedText(v) => v.encode(encoder),
            Self::ExtensionObject(v) => v.encode(encoder),
            Self::DataValue(v) => v.encode(encoder),
            Self::DiagnosticInfo(v) => v.encode(encoder),
        }
    }

    fn decode_scalar_payload(
        decoder: &mut Decoder<'_>,
        type_id: BuiltInTypeId,
    ) -> Result<Self, DecodeError> {
        Ok(match type_id {
            BuiltInTypeId::Boolean => Self::Boolean(bool::decode(decoder)?),
            BuiltInTypeId::SByte => Self::SByte(i8::decode(decoder)?),
            BuiltInTypeId::Byte => Self::Byte(u8::decode(decoder)?),
            BuiltInTypeId::Int16 => Self::Int16(i16::decode(decoder)?),
            BuiltInTypeId::UInt16 => Self::UInt16(u16::decode(decoder)?),
            BuiltInTypeId::Int32 => Self::Int32(i32::decode(decoder)?),
            BuiltInTypeId::UInt32 => Self::UInt32(u32::decode(decoder)?),
            BuiltInTypeId::Int64 => Self::Int64(i64::decode(decoder)?),
            BuiltInTypeId::UInt64 => Self::UInt64(u64::decode(decoder)?),
            BuiltInTypeId::Float => Self::Float(f32::decode(decoder)?),
            BuiltInTypeId::Double => Self::Double(f64::decode(decoder)?),
            BuiltInTypeId::String => Self::String(UaString::decode(decoder)?),
            BuiltInTypeId::DateTime => Self::DateTime(DateTime::decode(decoder)?),
            BuiltInTypeId::Guid => Self::Guid(Guid::decode(decoder)?),
            BuiltInTypeId::ByteString => Self::ByteString(ByteString::decode(decoder)?),
            BuiltInTypeId::XmlElement => Self::XmlElement(XmlElement::decode(decoder)?),
            BuiltInTypeId::NodeId => Self::NodeId(NodeId::decode(decoder)?),
            BuiltInTypeId::ExpandedNodeId => Self::ExpandedNodeId(ExpandedNodeId::decode(decoder)?),
            BuiltInTypeId::StatusCode => Self::StatusCode(StatusCode::decode(decoder)?),
            BuiltInTypeId::QualifiedName => Self::QualifiedName(QualifiedName::decode(decoder)?),
            BuiltInTypeId::LocalizedText => Self::LocalizedText(LocalizedText::decode(decoder)?),
            BuiltInTypeId::ExtensionObject => {
                Self::ExtensionObject(ExtensionObject::decode(decoder)?)
            }
            BuiltInTypeId::DataValue => Self::DataValue(Box::new(DataValue::decode(decoder)?)),
            BuiltInTypeId::DiagnosticInfo => {
                Self::DiagnosticInfo(Box::new(DiagnosticInfo::decode(decoder)?))
            }
            BuiltInTypeId::Variant => {
                return Err(DecodeError::invalid_encoding(
                    "Variant cannot contain a scalar Variant",
                ))
            }
        })
    }
}

macro_rules! variant_from {
    ($($ty:ty => $variant:ident;)+) => {$(
        impl From<$ty> for Variant {
            fn from(value: $ty) -> Self {
                Self::$variant(value.into())
            }
        }
    )+}
}

variant_from! {
    bool => Boolean;
    i8 => SByte;
    u8 => Byte;
    i16 => Int16;
    u16 => UInt16;
    i32 => Int32;
    u32 => UInt32;
    i64 => Int64;
    u64 => UInt64;
    f32 => Float;
    f64 => Double;
    UaString => String;
    &str => String;
    DateTime => DateTime;
    Guid => Guid;
    ByteString => ByteString;
    NodeId => NodeId;
    StatusCode => StatusCode;
    QualifiedName => QualifiedName;
    LocalizedText => LocalizedText;
    ExtensionObject => ExtensionObject;
}

impl BinaryEncode for Variant {
    fn encoded_size(&self) -> usize {
        match self {
            Self::Array(array) => {
                let mut size = 1 + 4;
                size += array
                    .values
                    .iter()
                    .map(|value| {
                        if array.type_id == BuiltInTypeId::Variant {
                            value.encoded_size()
                        } else {
                            value.scalar_payload_size()
                        }
                    })
                    .sum::<usize>();
                if let Some(dimensions) = &array.dimensions {
                    size += 4 + 4 * dimensions.len();
                }
                size
            }
            other => 1 + other.scalar_payload_size(),
        }
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Empty => encoder.write_u8(0),
            Self::Array(array) => {
                let mut mask = array.type_id as u8 | ARRAY_BIT;
                if array.dimensions.is_some() {
                    mask |= DIMENSIONS_BIT;
                }
                encoder.write_u8(mask)?;
                encoder.write_array_length(array.values.len())?;
                for value in &array.values {
                    if array.type_id == BuiltInTypeId::Variant {
                        // Elements of a Variant array are complete variants,
                        // mask byte included.
                        value.encode(encoder)?;
                        continue;
                    }
                    if value.type_id() != Some(array.type_id) || matches!(value, Self::Array(_)) {
                        return Err(EncodeError::invalid_value(format!(
                            "array element is not a scalar {:?}",
                            array.type_id
                        )));
                    }
                    value.encode_scalar_payload(encoder)?;
                }
                if let Some(dimensions) = &array.dimensions {
                    let product = VariantArray::dimensions_product(dimensions);
                    if product != array.values.len() as u64 {
                        return Err(EncodeError::invalid_array_dimensions(
                            product as i64,
                            array.values.len(),
                        ));
                    }
                    encoder.write_array_length(dimensions.len())?;
                    for dimension in dimensions {
                        encoder.write_i32(*dimension as i32)?;
                    }
                }
                Ok(())
            }
            scalar => {
                // type_id is Some for everything but Empty and Array.
                let type_id = scalar.type_id().expect("scalar variant has a type id") as u8;
                encoder.write_u8(type_id)?;
                scalar.encode_scalar_payload(encoder)
            }
        }
    }
}

impl BinaryDecode for Variant {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mask = decoder.read_u8()?;
        if mask == 0 {
            return Ok(Self::Empty);
        }
        let Some(type_id) = BuiltInTypeId::from_id(mask & 0x3F) else {
            return Err(DecodeError::invalid_encoding(format!(
                "unknown built-in type id {}",
                mask & 0x3F
            )));
        };
        decoder.nested(|decoder| {
            if mask & ARRAY_BIT == 0 {
                if mask & DIMENSIONS_BIT != 0 {
                    return Err(DecodeError::invalid_encoding(
                        "array dimensions on a scalar Variant",
                    ));
                }
                return Self::decode_scalar_payload(decoder, type_id);
            }

            let length = decoder.read_array_length()?.unwrap_or(0);
            let mut values = Vec::with_capacity(length);
            for _ in 0..length {
                values.push(if type_id == BuiltInTypeId::Variant {
                    Self::decode(decoder)?
                } else {
                    Self::decode_scalar_payload(decoder, type_id)?
                });
            }
            let dimensions = if mask & DIMENSIONS_BIT != 0 {
                let count = decoder.read_array_length()?.unwrap_or(0);
                let mut dimensions = Vec::with_capacity(count);
                for _ in 0..count {
                    let dimension = decoder.read_i32()?;
                    if dimension < 0 {
                        return Err(DecodeError::invalid_encoding(
                            "negative array dimension",
                        ));
                    }
                    dimensions.push(dimension as u32);
                }
                if VariantArray::dimensions_product(&dimensions) != values.len() as u64 {
                    return Err(DecodeError::invalid_encoding(
                        "array dimensions do not match the element count",
                    ));
                }
                Some(dimensions)
            } else {
                None
            };
            Ok(Self::Array(Box::new(VariantArray {
                type_id,
                values,
                dimensions,
            })))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_round_trips() {
        round_trip!(Variant, Variant::Empty, &[0x00]);
    }

    #[test]
    fn int32_array_has_the_documented_wire_form() {
        let value = Variant::array_of(
            BuiltInTypeId::Int32,
            vec![Variant::Int32(1), Variant::Int32(-2), Variant::Int32(3)],
        )
        .unwrap();
        round_trip!(
            Variant,
            value,
            &[
                0x86, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0xFE, 0xFF, 0xFF, 0xFF,
                0x03, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn null_string_scalar() {
        round_trip!(
            Variant,
            Variant::String(UaString::null()),
            &[0x0C, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn matrix_round_trips() {
        let value = Variant::matrix_of(
            BuiltInTypeId::Byte,
            vec![
                Variant::Byte(1),
                Variant::Byte(2),
                Variant::Byte(3),
                Variant::Byte(4),
            ],
            vec![2, 2],
        )
        .unwrap();
        round_trip!(
            Variant,
            value,
            &[
                0xC3, 0x04, 0x00, 0x00, 0x00, 1, 2, 3, 4, 0x02, 0x00, 0x00, 0x00, 0x02, 0x00,
                0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn mismatched_dimensions_are_refused() {
        assert!(Variant::matrix_of(
            BuiltInTypeId::Byte,
            vec![Variant::Byte(1), Variant::Byte(2), Variant::Byte(3)],
            vec![2, 2],
        )
        .is_err());

        // On the wire: 3 bytes but dimensions 2x2.
        decode_error!(
            Variant,
            &[
                0xC3, 0x03, 0x00, 0x00, 0x00, 1, 2, 3, 0x02, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00,
                0x00, 0x02, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn heterogeneous_arrays_are_refused() {
        assert!(
            Variant::array_of(BuiltInTypeId::Int32, vec![Variant::Int32(1), Variant::Byte(2)])
                .is_err()
        );
    }

    #[test]
    fn scalar_variant_inside_variant_is_refused() {
        decode_error!(Variant, &[24, 0x00]);
    }

    #[test]
    fn variant_arrays_carry_complete_elements() {
        let value = Variant::array_of(
            BuiltInTypeId::Variant,
            vec![Variant::Byte(1), Variant::String(UaString::null())],
        )
        .unwrap();
        round_trip!(
            Variant,
            value,
            &[
                0x98, // Variant | ARRAY
                0x02, 0x00, 0x00, 0x00, // two elements
                0x03, 0x01, // Byte 1
                0x0C, 0xFF, 0xFF, 0xFF, 0xFF, // null String
            ]
        );
    }
}
