//! The `ExtensionObject` type.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::registry;
use crate::types::{BinaryDecode, BinaryEncode, ByteString, NodeId, UaMessage, XmlElement};

const ENCODING_NONE: u8 = 0x00;
const ENCODING_BINARY: u8 = 0x01;
const ENCODING_XML: u8 = 0x02;

/// A container for a value that is not a built-in type.
///
/// The payload is either still encoded (tagged with the NodeId of its
/// encoding) or already decoded into a typed value. Decoding resolves the
/// encoding id through the descriptor registry; an id with no registered
/// descriptor keeps the body as opaque bytes so it can be forwarded
/// unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ExtensionObject {
    /// No body.
    #[default]
    None,
    /// An OPC UA Binary body that was not resolved to a registered type.
    Binary { type_id: NodeId, body: ByteString },
    /// An XML body. Never interpreted by this crate.
    Xml { type_id: NodeId, body: XmlElement },
    /// A decoded value of a registered type. Its descriptor's binary
    /// encoding id is the NodeId written on the wire.
    Decoded(Box<dyn UaMessage>),
}

impl ExtensionObject {
    /// Wraps a registered value.
    #[must_use]
    pub fn from_message(value: impl UaMessage) -> Self {
        Self::Decoded(Box::new(value))
    }

    /// The NodeId that tags the encoded form.
    #[must_use]
    pub fn encoding_id(&self) -> NodeId {
        match self {
            Self::None => NodeId::NULL,
            Self::Binary { type_id, .. } | Self::Xml { type_id, .. } => type_id.clone(),
            Self::Decoded(value) => value.descriptor().binary_encoding_id.clone(),
        }
    }

    /// Borrows the decoded value if it is a `T`.
    #[must_use]
    pub fn decoded_as<T: UaMessage>(&self) -> Option<&T> {
        match self {
            Self::Decoded(value) => value.as_ref().downcast_ref(),
            _ => None,
        }
    }
}

impl BinaryEncode for ExtensionObject {
    fn encoded_size(&self) -> usize {
        match self {
            Self::None => NodeId::NULL.encoded_size() + 1,
            Self::Binary { type_id, body } => type_id.encoded_size() + 1 + body.encoded_size(),
            Self::Xml { type_id, body } => type_id.encoded_size() + 1 + body.encoded_size(),
            Self::Decoded(value) => {
                value.descriptor().binary_encoding_id.encoded_size() + 1 + 4 + value.message_size()
            }
        }
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        match self {
            Self::None => {
                NodeId::NULL.encode(encoder)?;
                encoder.write_u8(ENCODING_NONE)
            }
            Self::Binary { type_id, body } => {
                type_id.encode(encoder)?;
                encoder.write_u8(ENCODING_BINARY)?;
                body.encode(encoder)
            }
            Self::Xml { type_id, body } => {
                type_id.encode(encoder)?;
                encoder.write_u8(ENCODING_XML)?;
                body.encode(encoder)
            }
            Self::Decoded(value) => {
                value.descriptor().binary_encoding_id.encode(encoder)?;
                encoder.write_u8(ENCODING_BINARY)?;
                encoder.write_array_length(value.message_size())?;
                let before = encoder.position();
                if let Err(error) = value.encode_message(encoder) {
                    encoder.rewind_to(before);
                    return Err(error);
                }
                Ok(())
            }
        }
    }
}

impl BinaryDecode for ExtensionObject {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let type_id = NodeId::decode(decoder)?;
        let encoding = decoder.read_u8()?;
        match encoding {
            ENCODING_NONE => Ok(Self::None),
            ENCODING_BINARY => decoder.nested(|decoder| {
                let Some(body) = decoder.read_byte_string_bytes()? else {
                    return Ok(Self::Binary {
                        type_id,
                        body: ByteString::null(),
                    });
                };
                let Some(decode) = registry::find_by_encoding_id(&type_id)
                    .and_then(|descriptor| descriptor.decode)
                else {
                    return Ok(Self::Binary {
                        type_id,
                        body: ByteString::new(body),
                    });
                };
                let mut body_decoder = Decoder::new(body, decoder.nested_limits())?;
                let value = decode(&mut body_decoder)?;
                if !body_decoder.is_empty() {
                    return Err(DecodeError::body_length_mismatch(
                        body.len(),
                        body.len() - body_decoder.remaining(),
                    ));
                }
                Ok(Self::Decoded(value))
            }),
            ENCODING_XML => {
                let body = XmlElement::decode(decoder)?;
                Ok(Self::Xml { type_id, body })
            }
            other => Err(DecodeError::invalid_encoding(format!(
                "unknown ExtensionObject encoding 0x{other:02x}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_round_trips() {
        round_trip!(ExtensionObject, ExtensionObject::None, &[0x00, 0x00, 0x00]);
    }

    #[test]
    fn unknown_encoding_id_keeps_the_body_opaque() {
        let object = ExtensionObject::Binary {
            type_id: NodeId::numeric(7, 99),
            body: ByteString::new([1, 2, 3]),
        };
        round_trip!(
            ExtensionObject,
            object,
            &[0x01, 0x07, 0x63, 0x00, 0x01, 0x03, 0x00, 0x00, 0x00, 1, 2, 3]
        );
    }

    #[test]
    fn bogus_encoding_byte_is_refused() {
        decode_error!(ExtensionObject, &[0x00, 0x00, 0x03]);
    }
}
