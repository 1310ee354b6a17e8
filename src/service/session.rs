//! The Session service set: CreateSession, ActivateSession, CloseSession.

use crate::service::{
    ApplicationDescription, EndpointDescription, RequestHeader, ResponseHeader, SignatureData,
    SignedSoftwareCertificate,
};
use crate::types::{ByteString, DiagnosticInfo, ExtensionObject, NodeId, StatusCode, UaString};
use crate::ua_structure;

ua_structure! {
    /// Creates a session. The client nonce and certificate feed the
    /// signature handshake completed by ActivateSession.
    pub struct CreateSessionRequest : 459, 461 {
        request_header: RequestHeader,
        client_description: ApplicationDescription,
        server_uri: UaString,
        endpoint_url: UaString,
        session_name: UaString,
        client_nonce: ByteString,
        client_certificate: ByteString,
        requested_session_timeout: f64,
        max_response_message_size: u32,
    }
}

ua_structure! {
    /// The created session, the server's nonce and signature, and the
    /// endpoints the client must validate against the discovery results.
    pub struct CreateSessionResponse : 462, 464 {
        response_header: ResponseHeader,
        session_id: NodeId,
        authentication_token: NodeId,
        revised_session_timeout: f64,
        server_nonce: ByteString,
        server_certificate: ByteString,
        server_endpoints: [EndpointDescription],
        server_software_certificates: [SignedSoftwareCertificate],
        server_signature: SignatureData,
        max_request_message_size: u32,
    }
}

ua_structure! {
    /// Activates a session with the client's proof-of-possession signature
    /// and the user identity token.
    pub struct ActivateSessionRequest : 465, 467 {
        request_header: RequestHeader,
        client_signature: SignatureData,
        client_software_certificates: [SignedSoftwareCertificate],
        locale_ids: [UaString],
        user_identity_token: ExtensionObject,
        user_token_signature: SignatureData,
    }
}

ua_structure! {
    /// The activation result and a fresh server nonce.
    pub struct ActivateSessionResponse : 468, 470 {
        response_header: ResponseHeader,
        server_nonce: ByteString,
        results: [StatusCode],
        diagnostic_infos: [DiagnosticInfo],
    }
}

ua_structure! {
    /// Closes a session, optionally deleting its subscriptions.
    pub struct CloseSessionRequest : 471, 473 {
        request_header: RequestHeader,
        delete_subscriptions: bool,
    }
}

ua_structure! {
    /// Acknowledges the session close.
    pub struct CloseSessionResponse : 474, 476 {
        response_header: ResponseHeader,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::AnonymousIdentityToken;

    #[test]
    fn activate_session_carries_a_typed_identity_token() {
        let request = ActivateSessionRequest {
            request_header: RequestHeader::default(),
            client_signature: SignatureData::default(),
            client_software_certificates: Some(vec![]),
            locale_ids: None,
            user_identity_token: ExtensionObject::from_message(AnonymousIdentityToken {
                policy_id: UaString::new("anonymous"),
            }),
            user_token_signature: SignatureData::default(),
        };
        let bytes = crate::binary::encode(&request).unwrap();
        let decoded: ActivateSessionRequest = crate::binary::decode(&bytes).unwrap();
        pretty_assertions::assert_eq!(request, decoded);
        let token = decoded
            .user_identity_token
            .decoded_as::<AnonymousIdentityToken>()
            .unwrap();
        assert_eq!(token.policy_id, UaString::new("anonymous"));
    }
}
