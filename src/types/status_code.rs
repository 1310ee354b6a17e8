//! The `StatusCode` type and the subset of the status-code catalogue the
//! core reports.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode};

/// An OPC UA status code. The top two bits encode the severity: `00` good,
/// `01` uncertain, `10` bad.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StatusCode(pub u32);

macro_rules! status_codes {
    ($($name:ident = $value:literal, $symbol:literal;)+) => {
        impl StatusCode {
            $(pub const $name: StatusCode = StatusCode($value);)+

            /// The symbolic name, for codes the core knows about.
            #[must_use]
            pub fn name(&self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($symbol),)+
                    _ => None,
                }
            }
        }
    };
}

status_codes! {
    GOOD = 0x0000_0000, "Good";
    BAD_UNEXPECTED_ERROR = 0x8001_0000, "BadUnexpectedError";
    BAD_INTERNAL_ERROR = 0x8002_0000, "BadInternalError";
    BAD_OUT_OF_MEMORY = 0x8003_0000, "BadOutOfMemory";
    BAD_ENCODING_ERROR = 0x8006_0000, "BadEncodingError";
    BAD_DECODING_ERROR = 0x8007_0000, "BadDecodingError";
    BAD_ENCODING_LIMITS_EXCEEDED = 0x8008_0000, "BadEncodingLimitsExceeded";
    BAD_CERTIFICATE_INVALID = 0x8012_0000, "BadCertificateInvalid";
    BAD_SECURITY_CHECKS_FAILED = 0x8013_0000, "BadSecurityChecksFailed";
    BAD_CERTIFICATE_TIME_INVALID = 0x8014_0000, "BadCertificateTimeInvalid";
    BAD_CERTIFICATE_ISSUER_TIME_INVALID = 0x8015_0000, "BadCertificateIssuerTimeInvalid";
    BAD_CERTIFICATE_HOST_NAME_INVALID = 0x8016_0000, "BadCertificateHostNameInvalid";
    BAD_CERTIFICATE_URI_INVALID = 0x8017_0000, "BadCertificateUriInvalid";
    BAD_CERTIFICATE_USE_NOT_ALLOWED = 0x8018_0000, "BadCertificateUseNotAllowed";
    BAD_CERTIFICATE_ISSUER_USE_NOT_ALLOWED = 0x8019_0000, "BadCertificateIssuerUseNotAllowed";
    BAD_CERTIFICATE_UNTRUSTED = 0x801A_0000, "BadCertificateUntrusted";
    BAD_CERTIFICATE_REVOCATION_UNKNOWN = 0x801B_0000, "BadCertificateRevocationUnknown";
    BAD_CERTIFICATE_ISSUER_REVOCATION_UNKNOWN = 0x801C_0000, "BadCertificateIssuerRevocationUnknown";
    BAD_CERTIFICATE_REVOKED = 0x801D_0000, "BadCertificateRevoked";
    BAD_CERTIFICATE_ISSUER_REVOKED = 0x801E_0000, "BadCertificateIssuerRevoked";
    BAD_IDENTITY_TOKEN_INVALID = 0x8020_0000, "BadIdentityTokenInvalid";
    BAD_NONCE_INVALID = 0x8024_0000, "BadNonceInvalid";
    BAD_NOT_SUPPORTED = 0x803D_0000, "BadNotSupported";
    BAD_SECURITY_POLICY_REJECTED = 0x8055_0000, "BadSecurityPolicyRejected";
    BAD_INVALID_ARGUMENT = 0x80AB_0000, "BadInvalidArgument";
    BAD_REQUEST_TOO_LARGE = 0x80B8_0000, "BadRequestTooLarge";
    BAD_RESPONSE_TOO_LARGE = 0x80B9_0000, "BadResponseTooLarge";
    BAD_CERTIFICATE_CHAIN_INCOMPLETE = 0x810D_0000, "BadCertificateChainIncomplete";
}

impl StatusCode {
    #[must_use]
    pub fn is_good(&self) -> bool {
        self.0 >> 30 == 0
    }

    #[must_use]
    pub fn is_uncertain(&self) -> bool {
        self.0 >> 30 == 1
    }

    #[must_use]
    pub fn is_bad(&self) -> bool {
        self.0 & 0x8000_0000 != 0
    }
}

impl core::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl BinaryEncode for StatusCode {
    fn encoded_size(&self) -> usize {
        4
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_u32(self.0)
    }
}

impl BinaryDecode for StatusCode {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        decoder.read_u32().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_predicates() {
        assert!(StatusCode::GOOD.is_good());
        assert!(!StatusCode::GOOD.is_bad());
        assert!(StatusCode::BAD_SECURITY_CHECKS_FAILED.is_bad());
        assert!(!StatusCode::BAD_SECURITY_CHECKS_FAILED.is_good());
        assert!(StatusCode(0x4000_0000).is_uncertain());
    }

    #[test]
    fn displays_symbolically_when_known() {
        assert_eq!(
            StatusCode::BAD_CERTIFICATE_REVOKED.to_string(),
            "BadCertificateRevoked"
        );
        assert_eq!(StatusCode(0x8999_0000).to_string(), "0x89990000");
    }

    #[test]
    fn round_trips() {
        round_trip!(
            StatusCode,
            StatusCode::BAD_DECODING_ERROR,
            &[0x00, 0x00, 0x07, 0x80]
        );
    }
}
