//! Exact wire-byte vectors against other OPC UA stacks.

use pretty_assertions::assert_eq;
use uawire::prelude::*;

#[test]
fn variant_int32_array() {
    let value = Variant::array_of(
        BuiltInTypeId::Int32,
        vec![Variant::Int32(1), Variant::Int32(-2), Variant::Int32(3)],
    )
    .unwrap();
    let bytes = uawire::encode(&value).unwrap();
    assert_eq!(
        bytes,
        hex::decode("860300000001000000feffffff03000000").unwrap()
    );
    assert_eq!(uawire::decode::<Variant>(&bytes).unwrap(), value);
}

#[test]
fn variant_null_string() {
    let value = Variant::String(UaString::null());
    let bytes = uawire::encode(&value).unwrap();
    assert_eq!(bytes, hex::decode("0cffffffff").unwrap());
    assert_eq!(uawire::decode::<Variant>(&bytes).unwrap(), value);
}

#[test]
fn node_id_compact_forms() {
    assert_eq!(uawire::encode(&NodeId::numeric(0, 255)).unwrap(), [0x00, 0xFF]);
    assert_eq!(
        uawire::encode(&NodeId::numeric(2, 1025)).unwrap(),
        [0x01, 0x02, 0x01, 0x04]
    );
    // A sender must produce the most compact form; a receiver accepts any.
    let verbose = [0x02u8, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00];
    assert_eq!(
        uawire::decode::<NodeId>(&verbose).unwrap(),
        NodeId::numeric(0, 255)
    );
}

#[test]
fn data_value_mask_governs_the_fields() {
    let input = hex::decode("03060500000000004080").unwrap();
    let decoded: DataValue = uawire::decode(&input).unwrap();
    assert_eq!(decoded.value, Some(Variant::Int32(5)));
    assert_eq!(decoded.status, Some(StatusCode(0x8040_0000)));
    assert_eq!(decoded.source_timestamp, None);
    assert_eq!(uawire::encode(&decoded).unwrap(), input);
}

#[test]
fn guid_mixed_endian_layout() {
    let guid = Guid::new(
        0x7296_2B91,
        0xFA75,
        0x4AE6,
        [0x8D, 0x28, 0xB4, 0x04, 0xDC, 0x7D, 0xAF, 0x63],
    );
    assert_eq!(
        uawire::encode(&guid).unwrap(),
        hex::decode("912b967275fae64a8d28b404dc7daf63").unwrap()
    );
}

#[test]
fn decoder_refuses_hostile_array_lengths_without_allocating() {
    // Variant Int32 array declaring i32::MAX elements with no payload.
    let mut input = vec![0x86u8];
    input.extend_from_slice(&i32::MAX.to_le_bytes());
    let error = uawire::decode::<Variant>(&input).unwrap_err();
    assert_eq!(
        error.status_code(),
        StatusCode::BAD_ENCODING_LIMITS_EXCEEDED
    );
}

#[test]
fn message_size_limit_applies_to_input_before_parsing() {
    let limits = Limits {
        max_message_size: 16,
        ..Limits::default()
    };
    let input = vec![0u8; 17];
    let error = uawire::decode_with_limits::<Variant>(&input, limits).unwrap_err();
    assert_eq!(
        error.status_code(),
        StatusCode::BAD_ENCODING_LIMITS_EXCEEDED
    );
}
