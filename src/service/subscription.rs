//! The Subscription and MonitoredItem service sets: CreateSubscription,
//! CreateMonitoredItems, DeleteMonitoredItems, Publish and Republish.

use crate::service::{MonitoringMode, RequestHeader, ResponseHeader, TimestampsToReturn};
use crate::service::attribute::ReadValueId;
use crate::types::{DataValue, DateTime, DiagnosticInfo, ExtensionObject, StatusCode};
use crate::ua_structure;

ua_structure! {
    /// Creates a subscription with the requested publishing parameters;
    /// the server may revise all of them.
    pub struct CreateSubscriptionRequest : 785, 787 {
        request_header: RequestHeader,
        requested_publishing_interval: f64,
        requested_lifetime_count: u32,
        requested_max_keep_alive_count: u32,
        max_notifications_per_publish: u32,
        publishing_enabled: bool,
        priority: u8,
    }
}

ua_structure! {
    /// The created subscription and the revised parameters.
    pub struct CreateSubscriptionResponse : 788, 790 {
        response_header: ResponseHeader,
        subscription_id: u32,
        revised_publishing_interval: f64,
        revised_lifetime_count: u32,
        revised_max_keep_alive_count: u32,
    }
}

ua_structure! {
    /// How a monitored item samples and queues its notifications. The
    /// filter is a typed extension object (data change, event or
    /// aggregate filter).
    pub struct MonitoringParameters : 740, 742 {
        client_handle: u32,
        sampling_interval: f64,
        filter: ExtensionObject,
        queue_size: u32,
        discard_oldest: bool,
    }
}

ua_structure! {
    /// One item to monitor.
    pub struct MonitoredItemCreateRequest : 743, 745 {
        item_to_monitor: ReadValueId,
        monitoring_mode: MonitoringMode,
        requested_parameters: MonitoringParameters,
    }
}

ua_structure! {
    /// The created item and the revised sampling parameters.
    pub struct MonitoredItemCreateResult : 746, 748 {
        status_code: StatusCode,
        monitored_item_id: u32,
        revised_sampling_interval: f64,
        revised_queue_size: u32,
        filter_result: ExtensionObject,
    }
}

ua_structure! {
    /// Creates monitored items inside a subscription.
    pub struct CreateMonitoredItemsRequest : 749, 751 {
        request_header: RequestHeader,
        subscription_id: u32,
        timestamps_to_return: TimestampsToReturn,
        items_to_create: [MonitoredItemCreateRequest],
    }
}

ua_structure! {
    /// The per-item creation results.
    pub struct CreateMonitoredItemsResponse : 752, 754 {
        response_header: ResponseHeader,
        results: [MonitoredItemCreateResult],
        diagnostic_infos: [DiagnosticInfo],
    }
}

ua_structure! {
    /// Deletes monitored items from a subscription.
    pub struct DeleteMonitoredItemsRequest : 779, 781 {
        request_header: RequestHeader,
        subscription_id: u32,
        monitored_item_ids: [u32],
    }
}

ua_structure! {
    /// The per-item deletion results.
    pub struct DeleteMonitoredItemsResponse : 782, 784 {
        response_header: ResponseHeader,
        results: [StatusCode],
        diagnostic_infos: [DiagnosticInfo],
    }
}

ua_structure! {
    /// Acknowledges one notification message of one subscription.
    pub struct SubscriptionAcknowledgement : 821, 823 {
        subscription_id: u32,
        sequence_number: u32,
    }
}

ua_structure! {
    /// A batch of notifications published for a subscription. The entries
    /// are typed extension objects such as [`DataChangeNotification`].
    pub struct NotificationMessage : 803, 805 {
        sequence_number: u32,
        publish_time: DateTime,
        notification_data: [ExtensionObject],
    }
}

ua_structure! {
    /// One changed value, tagged with the client handle of its item.
    pub struct MonitoredItemNotification : 806, 808 {
        client_handle: u32,
        value: DataValue,
    }
}

ua_structure! {
    /// The data-change payload of a notification message.
    pub struct DataChangeNotification : 809, 811 {
        monitored_items: [MonitoredItemNotification],
        diagnostic_infos: [DiagnosticInfo],
    }
}

ua_structure! {
    /// Acknowledges received notifications and asks for the next batch.
    pub struct PublishRequest : 824, 826 {
        request_header: RequestHeader,
        subscription_acknowledgements: [SubscriptionAcknowledgement],
    }
}

ua_structure! {
    /// The next notification message of whichever subscription was ready.
    pub struct PublishResponse : 827, 829 {
        response_header: ResponseHeader,
        subscription_id: u32,
        available_sequence_numbers: [u32],
        more_notifications: bool,
        notification_message: NotificationMessage,
        results: [StatusCode],
        diagnostic_infos: [DiagnosticInfo],
    }
}

ua_structure! {
    /// Asks for the retransmission of a kept notification message.
    pub struct RepublishRequest : 830, 832 {
        request_header: RequestHeader,
        subscription_id: u32,
        retransmit_sequence_number: u32,
    }
}

ua_structure! {
    /// The retransmitted notification message.
    pub struct RepublishResponse : 833, 835 {
        response_header: ResponseHeader,
        notification_message: NotificationMessage,
    }
}
