//! # Namespace-0 service structures
//!
//! The request/response structures of the OPC UA service sets this core
//! codecs for, declared through the descriptor macros so every type is
//! simultaneously a Rust struct, a binary codec, and a registry entry.
//! Grouped by service set the way the specification groups them.

mod attribute;
mod common;
mod discovery;
mod enums;
mod secure_channel;
mod session;
mod subscription;
mod view;

pub use attribute::*;
pub use common::*;
pub use discovery::*;
pub use enums::*;
pub use secure_channel::*;
pub use session::*;
pub use subscription::*;
pub use view::*;

use crate::registry::DataTypeDescriptor;
use crate::types::UaType;

/// Every descriptor this module contributes to the registry.
pub(crate) fn descriptors() -> impl Iterator<Item = &'static DataTypeDescriptor> {
    #[allow(unused_mut)]
    let mut list: Vec<&'static DataTypeDescriptor> = vec![
        // Enumerations
        NodeClass::descriptor(),
        MessageSecurityMode::descriptor(),
        UserTokenType::descriptor(),
        ApplicationType::descriptor(),
        SecurityTokenRequestType::descriptor(),
        BrowseDirection::descriptor(),
        BrowseResultMask::descriptor(),
        TimestampsToReturn::descriptor(),
        MonitoringMode::descriptor(),
        // Common
        RequestHeader::descriptor(),
        ResponseHeader::descriptor(),
        SignatureData::descriptor(),
        SignedSoftwareCertificate::descriptor(),
        ApplicationDescription::descriptor(),
        UserTokenPolicy::descriptor(),
        EndpointDescription::descriptor(),
        AnonymousIdentityToken::descriptor(),
        UserNameIdentityToken::descriptor(),
        // Discovery
        GetEndpointsRequest::descriptor(),
        GetEndpointsResponse::descriptor(),
        // Secure channel
        ChannelSecurityToken::descriptor(),
        OpenSecureChannelRequest::descriptor(),
        OpenSecureChannelResponse::descriptor(),
        CloseSecureChannelRequest::descriptor(),
        CloseSecureChannelResponse::descriptor(),
        // Session
        CreateSessionRequest::descriptor(),
        CreateSessionResponse::descriptor(),
        ActivateSessionRequest::descriptor(),
        ActivateSessionResponse::descriptor(),
        CloseSessionRequest::descriptor(),
        CloseSessionResponse::descriptor(),
        // Attribute
        ReadValueId::descriptor(),
        ReadRequest::descriptor(),
        ReadResponse::descriptor(),
        WriteValue::descriptor(),
        WriteRequest::descriptor(),
        WriteResponse::descriptor(),
        // View
        ViewDescription::descriptor(),
        BrowseDescription::descriptor(),
        BrowseResult::descriptor(),
        ReferenceDescription::descriptor(),
        BrowseRequest::descriptor(),
        BrowseResponse::descriptor(),
        BrowseNextRequest::descriptor(),
        BrowseNextResponse::descriptor(),
        // Subscription and monitored items
        CreateSubscriptionRequest::descriptor(),
        CreateSubscriptionResponse::descriptor(),
        MonitoringParameters::descriptor(),
        MonitoredItemCreateRequest::descriptor(),
        MonitoredItemCreateResult::descriptor(),
        CreateMonitoredItemsRequest::descriptor(),
        CreateMonitoredItemsResponse::descriptor(),
        DeleteMonitoredItemsRequest::descriptor(),
        DeleteMonitoredItemsResponse::descriptor(),
        SubscriptionAcknowledgement::descriptor(),
        NotificationMessage::descriptor(),
        MonitoredItemNotification::descriptor(),
        DataChangeNotification::descriptor(),
        PublishRequest::descriptor(),
        PublishResponse::descriptor(),
        RepublishRequest::descriptor(),
        RepublishResponse::descriptor(),
    ];
    #[cfg(test)]
    list.extend(test_types::descriptors());
    list.into_iter()
}

/// Exemplar types for the codec paths namespace 0 does not exercise:
/// unions and structures with optional fields.
#[cfg(test)]
pub(crate) mod test_types {
    use crate::registry::DataTypeDescriptor;
    use crate::types::{UaString, UaType, Variant};
    use crate::{ua_structure, ua_union};

    ua_union! {
        /// A sample value that is either a single scalar or a list of names.
        pub enum SampleUnion : 64000, 64001 {
            1 => Scalar(Variant),
            2 => Names(Option<Vec<UaString>>),
        }
    }

    ua_structure! {
        /// A sample structure with two optional members.
        pub struct SampleOptionals : 64002, 64003 {
            id: u32,
            description: ?UaString,
            priority: ?u8,
        }
    }

    pub(crate) fn descriptors() -> impl Iterator<Item = &'static DataTypeDescriptor> {
        [SampleUnion::descriptor(), SampleOptionals::descriptor()].into_iter()
    }

    mod tests {
        use super::*;
        use crate::registry::DataTypeKind;

        #[test]
        fn union_selector_zero_is_none() {
            round_trip!(SampleUnion, SampleUnion::None, &[0x00, 0x00, 0x00, 0x00]);
        }

        #[test]
        fn union_encodes_exactly_the_selected_member() {
            round_trip!(
                SampleUnion,
                SampleUnion::Scalar(Variant::Byte(7)),
                &[0x01, 0x00, 0x00, 0x00, 0x03, 0x07]
            );
            round_trip!(
                SampleUnion,
                SampleUnion::Names(Some(vec![UaString::new("a")])),
                &[
                    0x02, 0x00, 0x00, 0x00, // selector
                    0x01, 0x00, 0x00, 0x00, // one element
                    0x01, 0x00, 0x00, 0x00, b'a',
                ]
            );
        }

        #[test]
        fn union_rejects_unknown_selectors() {
            decode_error!(SampleUnion, &[0x03, 0x00, 0x00, 0x00]);
        }

        #[test]
        fn optional_mask_bits_match_present_members() {
            // No optional present: only the mask and the required member.
            round_trip!(
                SampleOptionals,
                SampleOptionals {
                    id: 9,
                    description: None,
                    priority: None,
                },
                &[0x00, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00]
            );
            // Second optional only: bit 1.
            round_trip!(
                SampleOptionals,
                SampleOptionals {
                    id: 9,
                    description: None,
                    priority: Some(3),
                },
                &[0x02, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x03]
            );
            // Both: bits 0 and 1, members in declaration order.
            round_trip!(
                SampleOptionals,
                SampleOptionals {
                    id: 9,
                    description: Some(UaString::new("x")),
                    priority: Some(3),
                },
                &[
                    0x03, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
                    b'x', 0x03,
                ]
            );
        }

        #[test]
        fn sample_descriptors_expose_their_kinds() {
            assert_eq!(SampleUnion::descriptor().kind, DataTypeKind::Union);
            assert_eq!(
                SampleOptionals::descriptor().kind,
                DataTypeKind::StructureWithOptional
            );
            assert!(SampleOptionals::descriptor().members[1].is_optional);
            assert!(!SampleOptionals::descriptor().members[0].is_optional);
        }

        #[test]
        fn unions_decode_through_the_registry_as_extension_objects() {
            use crate::types::ExtensionObject;

            let object = ExtensionObject::from_message(SampleUnion::Scalar(Variant::Int32(-1)));
            let bytes = crate::binary::encode(&object).unwrap();
            let decoded: ExtensionObject = crate::binary::decode(&bytes).unwrap();
            let union = decoded.decoded_as::<SampleUnion>().unwrap();
            assert_eq!(*union, SampleUnion::Scalar(Variant::Int32(-1)));
        }
    }
}
