//! Structures shared by every service set: the request/response headers,
//! application and endpoint descriptions, and the user identity tokens.

use crate::service::{ApplicationType, MessageSecurityMode, UserTokenType};
use crate::types::{
    ByteString, DateTime, DiagnosticInfo, ExtensionObject, LocalizedText, NodeId, StatusCode,
    UaString,
};
use crate::ua_structure;

ua_structure! {
    /// The header passed with every service request.
    pub struct RequestHeader : 389, 391 {
        authentication_token: NodeId,
        timestamp: DateTime,
        request_handle: u32,
        return_diagnostics: u32,
        audit_entry_id: UaString,
        timeout_hint: u32,
        additional_header: ExtensionObject,
    }
}

ua_structure! {
    /// The header returned with every service response.
    pub struct ResponseHeader : 392, 394 {
        timestamp: DateTime,
        request_handle: u32,
        service_result: StatusCode,
        service_diagnostics: DiagnosticInfo,
        string_table: [UaString],
        additional_header: ExtensionObject,
    }
}

ua_structure! {
    /// A signature created with a certificate's private key.
    pub struct SignatureData : 456, 458 {
        algorithm: UaString,
        signature: ByteString,
    }
}

ua_structure! {
    /// A software certificate with the signature over it.
    pub struct SignedSoftwareCertificate : 344, 346 {
        certificate_data: ByteString,
        signature: ByteString,
    }
}

ua_structure! {
    /// Describes an OPC UA application to its peers.
    pub struct ApplicationDescription : 308, 310 {
        application_uri: UaString,
        product_uri: UaString,
        application_name: LocalizedText,
        application_type: ApplicationType,
        gateway_server_uri: UaString,
        discovery_profile_uri: UaString,
        discovery_urls: [UaString],
    }
}

ua_structure! {
    /// A user token class an endpoint accepts.
    pub struct UserTokenPolicy : 304, 306 {
        policy_id: UaString,
        token_type: UserTokenType,
        issued_token_type: UaString,
        issuer_endpoint_url: UaString,
        security_policy_uri: UaString,
    }
}

ua_structure! {
    /// One endpoint a server offers, with its security requirements.
    pub struct EndpointDescription : 312, 314 {
        endpoint_url: UaString,
        server: ApplicationDescription,
        server_certificate: ByteString,
        security_mode: MessageSecurityMode,
        security_policy_uri: UaString,
        user_identity_tokens: [UserTokenPolicy],
        transport_profile_uri: UaString,
        security_level: u8,
    }
}

ua_structure! {
    /// The identity token for anonymous access.
    pub struct AnonymousIdentityToken : 319, 321 {
        policy_id: UaString,
    }
}

ua_structure! {
    /// A user name and password identity token. The password is encrypted
    /// with the server's public key as dictated by the token policy.
    pub struct UserNameIdentityToken : 322, 324 {
        policy_id: UaString,
        user_name: UaString,
        password: ByteString,
        encryption_algorithm: UaString,
    }
}
