//! # The type-descriptor registry
//!
//! A process-wide, immutable table of type descriptors. Every descriptor
//! carries the type's `NodeId` identity, its binary encoding id, its
//! structural kind and an ordered member list, plus an erased decode hook so
//! `ExtensionObject` bodies can be turned into typed values at runtime.
//!
//! The registry is built lazily on first lookup from the compiled-in
//! descriptor lists and is never mutated afterwards, so it is readable from
//! any thread without synchronisation.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::binary::Decoder;
use crate::error::DecodeError;
use crate::types::{
    BuiltInTypeId, ByteString, DataValue, DateTime, DiagnosticInfo, ExpandedNodeId,
    ExtensionObject, Guid, LocalizedText, NodeId, QualifiedName, StatusCode, UaMessage, UaString,
    UaType, Variant, XmlElement,
};

/// The structural kind of a described type, which selects the codec walk.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DataTypeKind {
    /// One of the 25 built-in types; the codec delegates to the type kernel.
    Primitive(BuiltInTypeId),
    /// An enumeration, encoded as Int32.
    Enum,
    /// Members visited in declaration order.
    Structure,
    /// A u32 encoding mask first; bit *i* is set iff the *i*-th optional
    /// member (in declaration order) is present.
    StructureWithOptional,
    /// A u32 selector (1-based, 0 = none) followed by the selected member.
    Union,
}

/// One member of a structure or union descriptor.
#[derive(Debug)]
pub struct DataTypeMember {
    #[cfg(feature = "type-names")]
    pub name: &'static str,
    /// Resolves the member's own descriptor. A function pointer, so that
    /// descriptors can reference each other without cyclic statics.
    pub descriptor: fn() -> &'static DataTypeDescriptor,
    pub is_array: bool,
    pub is_optional: bool,
}

/// A process-lifetime description of a registered type. Descriptors are
/// immutable and never freed; lookups hand out `&'static` references.
#[derive(Debug)]
pub struct DataTypeDescriptor {
    #[cfg(feature = "type-names")]
    pub name: &'static str,
    /// The identity of the data type itself.
    pub node_id: NodeId,
    /// The node id tagging the type's OPC UA Binary encoding on the wire.
    pub binary_encoding_id: NodeId,
    pub kind: DataTypeKind,
    /// In-memory size of the Rust representation.
    pub mem_size: usize,
    /// Ordered member list; empty for primitives and enumerations.
    pub members: &'static [DataTypeMember],
    /// Decodes a value of this type into an erased message. `None` for
    /// kinds that cannot travel in an `ExtensionObject`.
    pub decode: Option<fn(&mut Decoder<'_>) -> Result<Box<dyn UaMessage>, DecodeError>>,
}

/// The decode hook the descriptor macros install: decodes a `T` and boxes
/// it behind the message trait.
pub fn decode_message<T: UaType + UaMessage>(
    decoder: &mut Decoder<'_>,
) -> Result<Box<dyn UaMessage>, DecodeError> {
    Ok(Box::new(T::decode(decoder)?))
}

macro_rules! primitive_descriptors {
    ($($ty:ty => $symbol:literal, $id:literal, $builtin:ident;)+) => {
        $(
            impl UaType for $ty {
                fn descriptor() -> &'static DataTypeDescriptor {
                    static DESCRIPTOR: DataTypeDescriptor = DataTypeDescriptor {
                        #[cfg(feature = "type-names")]
                        name: $symbol,
                        node_id: NodeId::numeric(0, $id),
                        binary_encoding_id: NodeId::numeric(0, $id),
                        kind: DataTypeKind::Primitive(BuiltInTypeId::$builtin),
                        mem_size: core::mem::size_of::<$ty>(),
                        members: &[],
                        decode: None,
                    };
                    &DESCRIPTOR
                }
            }
        )+

        fn primitive_descriptors() -> impl Iterator<Item = &'static DataTypeDescriptor> {
            [$(<$ty as UaType>::descriptor(),)+].into_iter()
        }
    };
}

primitive_descriptors! {
    bool => "Boolean", 1, Boolean;
    i8 => "SByte", 2, SByte;
    u8 => "Byte", 3, Byte;
    i16 => "Int16", 4, Int16;
    u16 => "UInt16", 5, UInt16;
    i32 => "Int32", 6, Int32;
    u32 => "UInt32", 7, UInt32;
    i64 => "Int64", 8, Int64;
    u64 => "UInt64", 9, UInt64;
    f32 => "Float", 10, Float;
    f64 => "Double", 11, Double;
    UaString => "String", 12, String;
    DateTime => "DateTime", 13, DateTime;
    Guid => "Guid", 14, Guid;
    ByteString => "ByteString", 15, ByteString;
    XmlElement => "XmlElement", 16, XmlElement;
    NodeId => "NodeId", 17, NodeId;
    ExpandedNodeId => "ExpandedNodeId", 18, ExpandedNodeId;
    StatusCode => "StatusCode", 19, StatusCode;
    QualifiedName => "QualifiedName", 20, QualifiedName;
    LocalizedText => "LocalizedText", 21, LocalizedText;
    ExtensionObject => "ExtensionObject", 22, ExtensionObject;
    DataValue => "DataValue", 23, DataValue;
    Variant => "Variant", 24, Variant;
    DiagnosticInfo => "DiagnosticInfo", 25, DiagnosticInfo;
}

/// An array member resolves to its element type's descriptor; the member's
/// `is_array` flag carries the array-ness.
impl<T: UaType> UaType for Option<Vec<T>> {
    fn descriptor() -> &'static DataTypeDescriptor {
        T::descriptor()
    }
}

struct Registry {
    by_node_id: HashMap<NodeId, &'static DataTypeDescriptor>,
    by_encoding_id: HashMap<NodeId, &'static DataTypeDescriptor>,
    #[cfg(feature = "type-names")]
    by_name: HashMap<&'static str, &'static DataTypeDescriptor>,
    all: Vec<&'static DataTypeDescriptor>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry {
        by_node_id: HashMap::new(),
        by_encoding_id: HashMap::new(),
        #[cfg(feature = "type-names")]
        by_name: HashMap::new(),
        all: Vec::new(),
    };
    for descriptor in primitive_descriptors().chain(crate::service::descriptors()) {
        registry
            .by_node_id
            .insert(descriptor.node_id.clone(), descriptor);
        registry
            .by_encoding_id
            .insert(descriptor.binary_encoding_id.clone(), descriptor);
        #[cfg(feature = "type-names")]
        registry.by_name.insert(descriptor.name, descriptor);
        registry.all.push(descriptor);
    }
    registry
});

/// Looks a descriptor up by the data type's own node id.
#[must_use]
pub fn find_by_node_id(node_id: &NodeId) -> Option<&'static DataTypeDescriptor> {
    REGISTRY.by_node_id.get(node_id).copied()
}

/// Looks a descriptor up by its binary encoding id, as tagged on an
/// `ExtensionObject` body.
#[must_use]
pub fn find_by_encoding_id(node_id: &NodeId) -> Option<&'static DataTypeDescriptor> {
    REGISTRY.by_encoding_id.get(node_id).copied()
}

/// Looks a descriptor up by its type name.
#[cfg(feature = "type-names")]
#[must_use]
pub fn find_by_name(name: &str) -> Option<&'static DataTypeDescriptor> {
    REGISTRY.by_name.get(name).copied()
}

/// All registered descriptors, primitives included.
pub fn iter() -> impl Iterator<Item = &'static DataTypeDescriptor> {
    REGISTRY.all.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_registered() {
        let descriptor = find_by_node_id(&NodeId::numeric(0, 6)).unwrap();
        assert_eq!(
            descriptor.kind,
            DataTypeKind::Primitive(BuiltInTypeId::Int32)
        );
        assert_eq!(descriptor.mem_size, 4);
    }

    #[cfg(feature = "type-names")]
    #[test]
    fn lookup_by_name() {
        let descriptor = find_by_name("ReadRequest").unwrap();
        assert_eq!(descriptor.node_id, NodeId::numeric(0, 629));
        assert!(find_by_name("NoSuchType").is_none());
    }

    #[test]
    fn descriptors_resolve_their_members() {
        let descriptor = find_by_node_id(&NodeId::numeric(0, 629)).unwrap();
        assert_eq!(descriptor.kind, DataTypeKind::Structure);
        assert_eq!(descriptor.members.len(), 4);
        let nodes_to_read = &descriptor.members[3];
        assert!(nodes_to_read.is_array);
        assert!(!nodes_to_read.is_optional);
        assert_eq!(
            (nodes_to_read.descriptor)().node_id,
            NodeId::numeric(0, 626)
        );
    }

    #[test]
    fn iteration_covers_primitives_and_structures() {
        assert!(iter().count() > 25);
    }
}
