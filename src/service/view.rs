//! The View service set: Browse and BrowseNext.

use crate::service::{
    BrowseDirection, BrowseResultMask, NodeClass, RequestHeader, ResponseHeader,
};
use crate::types::{
    ByteString, DateTime, DiagnosticInfo, ExpandedNodeId, LocalizedText, NodeId, QualifiedName,
    StatusCode,
};
use crate::ua_structure;

ua_structure! {
    /// The view a browse operates in; a null view id means the whole
    /// address space.
    pub struct ViewDescription : 511, 513 {
        view_id: NodeId,
        timestamp: DateTime,
        view_version: u32,
    }
}

ua_structure! {
    /// One node to browse, with the reference and node-class filters.
    /// `node_class_mask` is a NodeClass bit mask, carried raw; 0 means
    /// every class.
    pub struct BrowseDescription : 514, 516 {
        node_id: NodeId,
        browse_direction: BrowseDirection,
        reference_type_id: NodeId,
        include_subtypes: bool,
        node_class_mask: u32,
        result_mask: BrowseResultMask,
    }
}

ua_structure! {
    /// One reference found while browsing.
    pub struct ReferenceDescription : 518, 520 {
        reference_type_id: NodeId,
        is_forward: bool,
        node_id: ExpandedNodeId,
        browse_name: QualifiedName,
        display_name: LocalizedText,
        node_class: NodeClass,
        type_definition: ExpandedNodeId,
    }
}

ua_structure! {
    /// The references found for one browsed node. A non-null continuation
    /// point means the server has more.
    pub struct BrowseResult : 522, 524 {
        status_code: StatusCode,
        continuation_point: ByteString,
        references: [ReferenceDescription],
    }
}

ua_structure! {
    /// Discovers the references of one or more nodes.
    pub struct BrowseRequest : 525, 527 {
        request_header: RequestHeader,
        view: ViewDescription,
        requested_max_references_per_node: u32,
        nodes_to_browse: [BrowseDescription],
    }
}

ua_structure! {
    /// The browse results, positionally matching the request.
    pub struct BrowseResponse : 528, 530 {
        response_header: ResponseHeader,
        results: [BrowseResult],
        diagnostic_infos: [DiagnosticInfo],
    }
}

ua_structure! {
    /// Continues (or releases) browses that returned continuation points.
    pub struct BrowseNextRequest : 531, 533 {
        request_header: RequestHeader,
        release_continuation_points: bool,
        continuation_points: [ByteString],
    }
}

ua_structure! {
    /// The continued browse results.
    pub struct BrowseNextResponse : 534, 536 {
        response_header: ResponseHeader,
        results: [BrowseResult],
        diagnostic_infos: [DiagnosticInfo],
    }
}
