//! The SecureChannel service set: OpenSecureChannel and CloseSecureChannel.

use crate::service::{MessageSecurityMode, RequestHeader, ResponseHeader, SecurityTokenRequestType};
use crate::types::{ByteString, DateTime};
use crate::ua_structure;

ua_structure! {
    /// Identifies one security token of a secure channel. Tokens are
    /// renewed while the channel stays up; the old token overlaps the new
    /// one until its lifetime ends.
    pub struct ChannelSecurityToken : 441, 443 {
        channel_id: u32,
        token_id: u32,
        created_at: DateTime,
        revised_lifetime: u32,
    }
}

ua_structure! {
    /// Opens or renews a secure channel. The client nonce seeds the
    /// symmetric key derivation.
    pub struct OpenSecureChannelRequest : 444, 446 {
        request_header: RequestHeader,
        client_protocol_version: u32,
        request_type: SecurityTokenRequestType,
        security_mode: MessageSecurityMode,
        client_nonce: ByteString,
        requested_lifetime: u32,
    }
}

ua_structure! {
    /// The issued token and the server's half of the key material.
    pub struct OpenSecureChannelResponse : 447, 449 {
        response_header: ResponseHeader,
        server_protocol_version: u32,
        security_token: ChannelSecurityToken,
        server_nonce: ByteString,
    }
}

ua_structure! {
    /// Closes a secure channel. Not acknowledged on the wire.
    pub struct CloseSecureChannelRequest : 450, 452 {
        request_header: RequestHeader,
    }
}

ua_structure! {
    /// The close acknowledgement structure, defined for completeness.
    pub struct CloseSecureChannelResponse : 453, 455 {
        response_header: ResponseHeader,
    }
}
