//! The Attribute service set: Read and Write.

use crate::service::{RequestHeader, ResponseHeader, TimestampsToReturn};
use crate::types::{DataValue, DiagnosticInfo, NodeId, QualifiedName, StatusCode, UaString};
use crate::ua_structure;

ua_structure! {
    /// One node attribute to read.
    pub struct ReadValueId : 626, 628 {
        node_id: NodeId,
        attribute_id: u32,
        index_range: UaString,
        data_encoding: QualifiedName,
    }
}

ua_structure! {
    /// Reads attribute values from one or more nodes.
    pub struct ReadRequest : 629, 631 {
        request_header: RequestHeader,
        max_age: f64,
        timestamps_to_return: TimestampsToReturn,
        nodes_to_read: [ReadValueId],
    }
}

ua_structure! {
    /// The values read, positionally matching the request.
    pub struct ReadResponse : 632, 634 {
        response_header: ResponseHeader,
        results: [DataValue],
        diagnostic_infos: [DiagnosticInfo],
    }
}

ua_structure! {
    /// One attribute value to write.
    pub struct WriteValue : 668, 670 {
        node_id: NodeId,
        attribute_id: u32,
        index_range: UaString,
        value: DataValue,
    }
}

ua_structure! {
    /// Writes attribute values to one or more nodes.
    pub struct WriteRequest : 671, 673 {
        request_header: RequestHeader,
        nodes_to_write: [WriteValue],
    }
}

ua_structure! {
    /// The per-node write results, positionally matching the request.
    pub struct WriteResponse : 674, 676 {
        response_header: ResponseHeader,
        results: [StatusCode],
        diagnostic_infos: [DiagnosticInfo],
    }
}
