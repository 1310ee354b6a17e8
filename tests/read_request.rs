//! End-to-end round-trip of a ReadRequest, the canonical service walk:
//! nested structure, enumeration, array member and extension object.

use pretty_assertions::assert_eq;
use uawire::prelude::*;
use uawire::service::{ReadRequest, ReadValueId, RequestHeader, TimestampsToReturn};

fn sample_request() -> ReadRequest {
    ReadRequest {
        request_header: RequestHeader {
            authentication_token: NodeId::numeric(0, 0),
            timestamp: DateTime::from_ticks(0),
            request_handle: 7,
            return_diagnostics: 0,
            audit_entry_id: UaString::null(),
            timeout_hint: 1000,
            additional_header: ExtensionObject::None,
        },
        max_age: 0.0,
        timestamps_to_return: TimestampsToReturn::Both,
        nodes_to_read: Some(vec![ReadValueId {
            node_id: NodeId::numeric(0, 2258),
            attribute_id: 13,
            index_range: UaString::null(),
            data_encoding: QualifiedName::new(0, UaString::null()),
        }]),
    }
}

#[test]
fn encode_decode_is_identity() {
    let request = sample_request();
    let bytes = uawire::encode(&request).unwrap();
    assert_eq!(bytes.len(), uawire::encoded_size(&request));
    let decoded: ReadRequest = uawire::decode(&bytes).unwrap();
    assert_eq!(request, decoded);
}

#[test]
fn the_descriptor_registry_resolves_the_request() {
    let descriptor = registry::find_by_node_id(&NodeId::numeric(0, 629)).unwrap();
    assert_eq!(descriptor.binary_encoding_id, NodeId::numeric(0, 631));
    assert_eq!(descriptor.kind, DataTypeKind::Structure);

    let by_encoding = registry::find_by_encoding_id(&NodeId::numeric(0, 631)).unwrap();
    assert!(core::ptr::eq(descriptor, by_encoding));
}

#[test]
fn truncated_request_does_not_decode() {
    let bytes = uawire::encode(&sample_request()).unwrap();
    for cut in [1, bytes.len() / 2, bytes.len() - 1] {
        assert!(uawire::decode::<ReadRequest>(&bytes[..cut]).is_err());
    }
}

#[test]
fn trailing_bytes_are_refused() {
    let mut bytes = uawire::encode(&sample_request()).unwrap();
    bytes.push(0);
    assert!(uawire::decode::<ReadRequest>(&bytes).is_err());
}
