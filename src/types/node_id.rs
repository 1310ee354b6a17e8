//! The `NodeId` and `ExpandedNodeId` types.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode, ByteString, Guid, UaString};

const FORMAT_TWO_BYTE: u8 = 0x00;
const FORMAT_FOUR_BYTE: u8 = 0x01;
const FORMAT_NUMERIC: u8 = 0x02;
const FORMAT_STRING: u8 = 0x03;
const FORMAT_GUID: u8 = 0x04;
const FORMAT_BYTE_STRING: u8 = 0x05;

/// Flag bits carried in the leading byte of an `ExpandedNodeId`.
const FLAG_NAMESPACE_URI: u8 = 0x80;
const FLAG_SERVER_INDEX: u8 = 0x40;

/// The identifier part of a [`NodeId`].
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Identifier {
    Numeric(u32),
    String(UaString),
    Guid(Guid),
    ByteString(ByteString),
}

impl Identifier {
    /// The ordinal used as the most significant key of the total order.
    fn ordinal(&self) -> u8 {
        match self {
            Self::Numeric(_) => 0,
            Self::String(_) => 1,
            Self::Guid(_) => 2,
            Self::ByteString(_) => 3,
        }
    }
}

/// An identifier of a node in an OPC UA address space: a namespace index
/// plus a numeric, string, guid or byte-string identifier.
///
/// The total order sorts by identifier kind, then namespace, then the
/// identifier value, so node ids can key ordered maps.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NodeId {
    pub namespace: u16,
    pub identifier: Identifier,
}

impl NodeId {
    /// The null node id, `ns=0;i=0`.
    pub const NULL: NodeId = NodeId::numeric(0, 0);

    #[must_use]
    pub const fn numeric(namespace: u16, value: u32) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    #[must_use]
    pub fn string(namespace: u16, value: impl Into<UaString>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(value.into()),
        }
    }

    #[must_use]
    pub fn guid(namespace: u16, value: Guid) -> Self {
        Self {
            namespace,
            identifier: Identifier::Guid(value),
        }
    }

    #[must_use]
    pub fn byte_string(namespace: u16, value: impl Into<ByteString>) -> Self {
        Self {
            namespace,
            identifier: Identifier::ByteString(value.into()),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.namespace == 0
            && match &self.identifier {
                Identifier::Numeric(value) => *value == 0,
                Identifier::String(value) => value.is_null(),
                Identifier::Guid(value) => value.is_null(),
                Identifier::ByteString(value) => value.is_null(),
            }
    }

    /// Encodes the node id with `flags` folded into the leading byte. The
    /// most compact valid format is always chosen.
    pub(crate) fn encode_with_flags(
        &self,
        encoder: &mut Encoder<'_>,
        flags: u8,
    ) -> Result<(), EncodeError> {
        match &self.identifier {
            Identifier::Numeric(value) => {
                if self.namespace == 0 && *value <= u32::from(u8::MAX) {
                    encoder.write_u8(FORMAT_TWO_BYTE | flags)?;
                    encoder.write_u8(*value as u8)
                } else if self.namespace <= u16::from(u8::MAX) && *value <= u32::from(u16::MAX) {
                    encoder.write_u8(FORMAT_FOUR_BYTE | flags)?;
                    encoder.write_u8(self.namespace as u8)?;
                    encoder.write_u16(*value as u16)
                } else {
                    encoder.write_u8(FORMAT_NUMERIC | flags)?;
                    encoder.write_u16(self.namespace)?;
                    encoder.write_u32(*value)
                }
            }
            Identifier::String(value) => {
                encoder.write_u8(FORMAT_STRING | flags)?;
                encoder.write_u16(self.namespace)?;
                value.encode(encoder)
            }
            Identifier::Guid(value) => {
                encoder.write_u8(FORMAT_GUID | flags)?;
                encoder.write_u16(self.namespace)?;
                value.encode(encoder)
            }
            Identifier::ByteString(value) => {
                encoder.write_u8(FORMAT_BYTE_STRING | flags)?;
                encoder.write_u16(self.namespace)?;
                value.encode(encoder)
            }
        }
    }

    /// Decodes the remainder of a node id whose leading byte held `format`.
    pub(crate) fn decode_body(decoder: &mut Decoder<'_>, format: u8) -> Result<Self, DecodeError> {
        match format {
            FORMAT_TWO_BYTE => Ok(Self::numeric(0, u32::from(decoder.read_u8()?))),
            FORMAT_FOUR_BYTE => {
                let namespace = u16::from(decoder.read_u8()?);
                let value = u32::from(decoder.read_u16()?);
                Ok(Self::numeric(namespace, value))
            }
            FORMAT_NUMERIC => {
                let namespace = decoder.read_u16()?;
                let value = decoder.read_u32()?;
                Ok(Self::numeric(namespace, value))
            }
            FORMAT_STRING => {
                let namespace = decoder.read_u16()?;
                let value = UaString::decode(decoder)?;
                Ok(Self::string(namespace, value))
            }
            FORMAT_GUID => {
                let namespace = decoder.read_u16()?;
                let value = Guid::decode(decoder)?;
                Ok(Self::guid(namespace, value))
            }
            FORMAT_BYTE_STRING => {
                let namespace = decoder.read_u16()?;
                let value = ByteString::decode(decoder)?;
                Ok(Self::byte_string(namespace, value))
            }
            other => Err(DecodeError::invalid_encoding(format!(
                "unknown NodeId format 0x{other:02x}"
            ))),
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NULL
    }
}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.identifier
            .ordinal()
            .cmp(&other.identifier.ordinal())
            .then_with(|| self.namespace.cmp(&other.namespace))
            .then_with(|| self.identifier.cmp(&other.identifier))
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        match &self.identifier {
            Identifier::Numeric(value) => write!(f, "i={value}"),
            Identifier::String(value) => write!(f, "s={value}"),
            Identifier::Guid(value) => write!(f, "g={value}"),
            Identifier::ByteString(value) => {
                f.write_str("b=0x")?;
                for byte in value.as_bytes().unwrap_or_default() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl BinaryEncode for NodeId {
    fn encoded_size(&self) -> usize {
        match &self.identifier {
            Identifier::Numeric(value) => {
                if self.namespace == 0 && *value <= u32::from(u8::MAX) {
                    2
                } else if self.namespace <= u16::from(u8::MAX) && *value <= u32::from(u16::MAX) {
                    4
                } else {
                    7
                }
            }
            Identifier::String(value) => 3 + value.encoded_size(),
            Identifier::Guid(_) => 19,
            Identifier::ByteString(value) => 3 + value.encoded_size(),
        }
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        self.encode_with_flags(encoder, 0)
    }
}

impl BinaryDecode for NodeId {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let leading = decoder.read_u8()?;
        if leading & (FLAG_NAMESPACE_URI | FLAG_SERVER_INDEX) != 0 {
            return Err(DecodeError::invalid_encoding(
                "reserved bits set in NodeId leading byte",
            ));
        }
        Self::decode_body(decoder, leading)
    }
}

/// A [`NodeId`] extended with an optional namespace URI and server index,
/// used when a node lives in another server's address space.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExpandedNodeId {
    pub node_id: NodeId,
    /// When non-null, takes precedence over `node_id.namespace`.
    pub namespace_uri: UaString,
    /// 0 means the local server.
    pub server_index: u32,
}

impl ExpandedNodeId {
    #[must_use]
    pub fn local(node_id: NodeId) -> Self {
        Self {
            node_id,
            namespace_uri: UaString::null(),
            server_index: 0,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.node_id.is_null() && self.namespace_uri.is_null() && self.server_index == 0
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if !self.namespace_uri.is_null() {
            flags |= FLAG_NAMESPACE_URI;
        }
        if self.server_index != 0 {
            flags |= FLAG_SERVER_INDEX;
        }
        flags
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self::local(node_id)
    }
}

impl core::fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        if !self.namespace_uri.is_null() {
            write!(f, "nsu={};", self.namespace_uri)?;
        }
        write!(f, "{}", self.node_id)
    }
}

impl BinaryEncode for ExpandedNodeId {
    fn encoded_size(&self) -> usize {
        self.node_id.encoded_size()
            + if self.namespace_uri.is_null() {
                0
            } else {
                self.namespace_uri.encoded_size()
            }
            + if self.server_index != 0 { 4 } else { 0 }
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        self.node_id.encode_with_flags(encoder, self.flags())?;
        if !self.namespace_uri.is_null() {
            self.namespace_uri.encode(encoder)?;
        }
        if self.server_index != 0 {
            encoder.write_u32(self.server_index)?;
        }
        Ok(())
    }
}

impl BinaryDecode for ExpandedNodeId {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let leading = decoder.read_u8()?;
        let node_id = NodeId::decode_body(decoder, leading & 0x3F)?;
        let namespace_uri = if leading & FLAG_NAMESPACE_URI != 0 {
            UaString::decode(decoder)?
        } else {
            UaString::null()
        };
        let server_index = if leading & FLAG_SERVER_INDEX != 0 {
            decoder.read_u32()?
        } else {
            0
        };
        Ok(Self {
            node_id,
            namespace_uri,
            server_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_use_the_most_compact_format() {
        round_trip!(NodeId, NodeId::numeric(0, 255), &[0x00, 0xFF]);
        round_trip!(NodeId, NodeId::numeric(0, 256), &[0x01, 0x00, 0x00, 0x01]);
        round_trip!(NodeId, NodeId::numeric(5, 1025), &[0x01, 0x05, 0x01, 0x04]);
        round_trip!(
            NodeId,
            NodeId::numeric(256, 7),
            &[0x02, 0x00, 0x01, 0x07, 0x00, 0x00, 0x00]
        );
        round_trip!(
            NodeId,
            NodeId::numeric(1, 0x1_0000),
            &[0x02, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn string_id_round_trips() {
        round_trip!(
            NodeId,
            NodeId::string(1, "hot"),
            &[0x03, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, b'h', b'o', b't']
        );
    }

    #[test]
    fn non_compact_numeric_forms_are_still_accepted() {
        // ns=0;i=5 in the full numeric format, as another stack may send it.
        decode_ok!(
            NodeId,
            &[0x02, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00],
            NodeId::numeric(0, 5)
        );
    }

    #[test]
    fn total_order_sorts_kind_then_namespace_then_value() {
        let mut ids = vec![
            NodeId::string(0, "a"),
            NodeId::numeric(1, 0),
            NodeId::numeric(0, 99),
            NodeId::guid(0, Guid::NULL),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                NodeId::numeric(0, 99),
                NodeId::numeric(1, 0),
                NodeId::string(0, "a"),
                NodeId::guid(0, Guid::NULL),
            ]
        );
    }

    #[test]
    fn expanded_round_trips() {
        round_trip!(
            ExpandedNodeId,
            ExpandedNodeId::local(NodeId::numeric(0, 84)),
            &[0x00, 84]
        );
        round_trip!(
            ExpandedNodeId,
            ExpandedNodeId {
                node_id: NodeId::numeric(0, 1),
                namespace_uri: UaString::new("urn:x"),
                server_index: 3,
            },
            &[0xC0, 0x01, 0x05, 0x00, 0x00, 0x00, b'u', b'r', b'n', b':', b'x', 3, 0, 0, 0]
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(NodeId::numeric(0, 2258).to_string(), "i=2258");
        assert_eq!(NodeId::string(2, "x").to_string(), "ns=2;s=x");
        assert_eq!(
            ExpandedNodeId {
                node_id: NodeId::numeric(0, 1),
                namespace_uri: UaString::new("urn:x"),
                server_index: 3,
            }
            .to_string(),
            "svr=3;nsu=urn:x;i=1"
        );
    }
}
