//! The `DiagnosticInfo` type.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode, StatusCode, UaString};

const HAS_SYMBOLIC_ID: u8 = 0x01;
const HAS_NAMESPACE_URI: u8 = 0x02;
const HAS_LOCALIZED_TEXT: u8 = 0x04;
const HAS_LOCALE: u8 = 0x08;
const HAS_ADDITIONAL_INFO: u8 = 0x10;
const HAS_INNER_STATUS_CODE: u8 = 0x20;
const HAS_INNER_DIAGNOSTIC_INFO: u8 = 0x40;

/// Vendor-specific diagnostics accompanying a status code. The string
/// fields are indices into the string table of the response carrying this
/// value. Self-referential through `inner_diagnostic_info`; the decoder
/// bounds the recursion with its nesting-depth limit.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticInfo {
    pub symbolic_id: Option<i32>,
    pub namespace_uri: Option<i32>,
    pub localized_text: Option<i32>,
    pub locale: Option<i32>,
    pub additional_info: Option<UaString>,
    pub inner_status_code: Option<StatusCode>,
    pub inner_diagnostic_info: Option<Box<DiagnosticInfo>>,
}

impl DiagnosticInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn mask(&self) -> u8 {
        let mut mask = 0;
        if self.symbolic_id.is_some() {
            mask |= HAS_SYMBOLIC_ID;
        }
        if self.namespace_uri.is_some() {
            mask |= HAS_NAMESPACE_URI;
        }
        if self.localized_text.is_some() {
            mask |= HAS_LOCALIZED_TEXT;
        }
        if self.locale.is_some() {
            mask |= HAS_LOCALE;
        }
        if self.additional_info.is_some() {
            mask |= HAS_ADDITIONAL_INFO;
        }
        if self.inner_status_code.is_some() {
            mask |= HAS_INNER_STATUS_CODE;
        }
        if self.inner_diagnostic_info.is_some() {
            mask |= HAS_INNER_DIAGNOSTIC_INFO;
        }
        mask
    }
}

impl BinaryEncode for DiagnosticInfo {
    fn encoded_size(&self) -> usize {
        1 + self.symbolic_id.map_or(0, |_| 4)
            + self.namespace_uri.map_or(0, |_| 4)
            + self.localized_text.map_or(0, |_| 4)
            + self.locale.map_or(0, |_| 4)
            + self
                .additional_info
                .as_ref()
                .map_or(0, BinaryEncode::encoded_size)
            + self.inner_status_code.map_or(0, |_| 4)
            + self
                .inner_diagnostic_info
                .as_ref()
                .map_or(0, |inner| inner.encoded_size())
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_u8(self.mask())?;
        if let Some(symbolic_id) = self.symbolic_id {
            encoder.write_i32(symbolic_id)?;
        }
        if let Some(namespace_uri) = self.namespace_uri {
            encoder.write_i32(namespace_uri)?;
        }
        if let Some(localized_text) = self.localized_text {
            encoder.write_i32(localized_text)?;
        }
        if let Some(locale) = self.locale {
            encoder.write_i32(locale)?;
        }
        if let Some(additional_info) = &self.additional_info {
            additional_info.encode(encoder)?;
        }
        if let Some(inner_status_code) = &self.inner_status_code {
            inner_status_code.encode(encoder)?;
        }
        if let Some(inner) = &self.inner_diagnostic_info {
            inner.encode(encoder)?;
        }
        Ok(())
    }
}

impl BinaryDecode for DiagnosticInfo {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mask = decoder.read_u8()?;
        decoder.nested(|decoder| {
            let symbolic_id = (mask & HAS_SYMBOLIC_ID != 0)
                .then(|| decoder.read_i32())
                .transpose()?;
            let namespace_uri = (mask & HAS_NAMESPACE_URI != 0)
                .then(|| decoder.read_i32())
                .transpose()?;
            let localized_text = (mask & HAS_LOCALIZED_TEXT != 0)
                .then(|| decoder.read_i32())
                .transpose()?;
            let locale = (mask & HAS_LOCALE != 0)
                .then(|| decoder.read_i32())
                .transpose()?;
            let additional_info = (mask & HAS_ADDITIONAL_INFO != 0)
                .then(|| UaString::decode(decoder))
                .transpose()?;
            let inner_status_code = (mask & HAS_INNER_STATUS_CODE != 0)
                .then(|| StatusCode::decode(decoder))
                .transpose()?;
            let inner_diagnostic_info = (mask & HAS_INNER_DIAGNOSTIC_INFO != 0)
                .then(|| DiagnosticInfo::decode(decoder).map(Box::new))
                .transpose()?;
            Ok(Self {
                symbolic_id,
                namespace_uri,
                localized_text,
                locale,
                additional_info,
                inner_status_code,
                inner_diagnostic_info,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::Limits;
    use crate::error::DecodeErrorKind;

    #[test]
    fn empty_round_trips() {
        round_trip!(DiagnosticInfo, DiagnosticInfo::default(), &[0x00]);
    }

    #[test]
    fn nested_info_round_trips() {
        let value = DiagnosticInfo {
            symbolic_id: Some(2),
            inner_status_code: Some(StatusCode::BAD_UNEXPECTED_ERROR),
            inner_diagnostic_info: Some(Box::new(DiagnosticInfo {
                locale: Some(1),
                ..DiagnosticInfo::default()
            })),
            ..DiagnosticInfo::default()
        };
        round_trip!(
            DiagnosticInfo,
            value,
            &[
                0x61, // symbolicId | innerStatusCode | innerDiagnosticInfo
                0x02, 0x00, 0x00, 0x00, // symbolicId
                0x00, 0x00, 0x01, 0x80, // BadUnexpectedError
                0x08, // inner: locale
                0x01, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn recursion_is_depth_limited() {
        // Each 0x40 byte opens another inner DiagnosticInfo.
        let mut input = vec![0x40u8; 64];
        input.push(0x00);
        let limits = Limits {
            max_nesting_depth: 8,
            ..Limits::default()
        };
        let error = crate::binary::decode_with_limits::<DiagnosticInfo>(&input, limits)
            .unwrap_err();
        assert!(matches!(
            *error.kind,
            DecodeErrorKind::NestingDepthExceeded { maximum: 8 }
        ));
    }
}
