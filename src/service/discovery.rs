//! The Discovery service set: GetEndpoints.

use crate::service::{EndpointDescription, RequestHeader, ResponseHeader};
use crate::types::UaString;
use crate::ua_structure;

ua_structure! {
    /// Asks a server for its endpoints, optionally filtered by locale and
    /// transport profile.
    pub struct GetEndpointsRequest : 426, 428 {
        request_header: RequestHeader,
        endpoint_url: UaString,
        locale_ids: [UaString],
        profile_uris: [UaString],
    }
}

ua_structure! {
    /// The endpoints matching the filter.
    pub struct GetEndpointsResponse : 429, 431 {
        response_header: ResponseHeader,
        endpoints: [EndpointDescription],
    }
}
