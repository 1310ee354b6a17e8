//! Enumerations shared across the service sets.

use crate::ua_enumerated;

ua_enumerated! {
    /// The class of a node in the address space. Also used as a bit mask in
    /// browse filters, where the raw u32 form applies.
    pub enum NodeClass : 257 {
        Unspecified = 0,
        Object = 1,
        Variable = 2,
        Method = 4,
        ObjectType = 8,
        VariableType = 16,
        ReferenceType = 32,
        DataType = 64,
        View = 128,
    }
}

ua_enumerated! {
    /// What a secure channel protects.
    pub enum MessageSecurityMode : 302 {
        Invalid = 0,
        None = 1,
        Sign = 2,
        SignAndEncrypt = 3,
    }
}

ua_enumerated! {
    /// The kind of user identity a token carries.
    pub enum UserTokenType : 303 {
        Anonymous = 0,
        UserName = 1,
        Certificate = 2,
        IssuedToken = 3,
    }
}

ua_enumerated! {
    /// What role an application plays.
    pub enum ApplicationType : 307 {
        Server = 0,
        Client = 1,
        ClientAndServer = 2,
        DiscoveryServer = 3,
    }
}

ua_enumerated! {
    /// Whether an OpenSecureChannel issues a fresh token or renews one.
    pub enum SecurityTokenRequestType : 315 {
        Issue = 0,
        Renew = 1,
    }
}

ua_enumerated! {
    /// The direction references are followed when browsing.
    pub enum BrowseDirection : 510 {
        Forward = 0,
        Inverse = 1,
        Both = 2,
        Invalid = 3,
    }
}

ua_enumerated! {
    /// Which fields of a [`ReferenceDescription`](crate::service::ReferenceDescription)
    /// a browse fills in. A bit mask; the named combinations are the ones
    /// the specification defines.
    pub enum BrowseResultMask : 517 {
        None = 0,
        ReferenceTypeId = 1,
        IsForward = 2,
        NodeClass = 4,
        BrowseName = 8,
        DisplayName = 16,
        TypeDefinition = 32,
        All = 63,
        ReferenceTypeInfo = 192,
        TargetInfo = 252,
    }
}

ua_enumerated! {
    /// Which timestamps a read or monitored item returns.
    pub enum TimestampsToReturn : 625 {
        Source = 0,
        Server = 1,
        Both = 2,
        Neither = 3,
        Invalid = 4,
    }
}

ua_enumerated! {
    /// Whether a monitored item samples, reports, or is disabled.
    pub enum MonitoringMode : 716 {
        Disabled = 0,
        Sampling = 1,
        Reporting = 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerations_encode_as_int32() {
        round_trip!(
            TimestampsToReturn,
            TimestampsToReturn::Both,
            &[0x02, 0x00, 0x00, 0x00]
        );
        round_trip!(
            MessageSecurityMode,
            MessageSecurityMode::SignAndEncrypt,
            &[0x03, 0x00, 0x00, 0x00]
        );
        round_trip!(NodeClass, NodeClass::View, &[0x80, 0x00, 0x00, 0x00]);
        round_trip!(
            BrowseResultMask,
            BrowseResultMask::All,
            &[0x3F, 0x00, 0x00, 0x00]
        );
        round_trip!(
            BrowseResultMask,
            BrowseResultMask::ReferenceTypeInfo,
            &[0xC0, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn unknown_discriminants_are_refused() {
        decode_error!(MonitoringMode, &[0x07, 0x00, 0x00, 0x00]);
    }
}
