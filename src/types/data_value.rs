//! The `DataValue` type.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode, DateTime, StatusCode, Variant};

const HAS_VALUE: u8 = 0x01;
const HAS_STATUS: u8 = 0x02;
const HAS_SOURCE_TIMESTAMP: u8 = 0x04;
const HAS_SERVER_TIMESTAMP: u8 = 0x08;
const HAS_SOURCE_PICOSECONDS: u8 = 0x10;
const HAS_SERVER_PICOSECONDS: u8 = 0x20;

/// A value with its quality and the timestamps describing when it was
/// sourced and when the server processed it. Every field is optional; the
/// leading mask byte records which are present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataValue {
    pub value: Option<Variant>,
    /// Absent means Good.
    pub status: Option<StatusCode>,
    pub source_timestamp: Option<DateTime>,
    pub source_picoseconds: Option<u16>,
    pub server_timestamp: Option<DateTime>,
    pub server_picoseconds: Option<u16>,
}

impl DataValue {
    /// A good value with no timestamps.
    #[must_use]
    pub fn from_value(value: impl Into<Variant>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    fn mask(&self) -> u8 {
        let mut mask = 0;
        if self.value.is_some() {
            mask |= HAS_VALUE;
        }
        if self.status.is_some() {
            mask |= HAS_STATUS;
        }
        if self.source_timestamp.is_some() {
            mask |= HAS_SOURCE_TIMESTAMP;
        }
        if self.source_picoseconds.is_some() {
            mask |= HAS_SOURCE_PICOSECONDS;
        }
        if self.server_timestamp.is_some() {
            mask |= HAS_SERVER_TIMESTAMP;
        }
        if self.server_picoseconds.is_some() {
            mask |= HAS_SERVER_PICOSECONDS;
        }
        mask
    }
}

impl BinaryEncode for DataValue {
    fn encoded_size(&self) -> usize {
        1 + self.value.as_ref().map_or(0, BinaryEncode::encoded_size)
            + self.status.as_ref().map_or(0, BinaryEncode::encoded_size)
            + self.source_timestamp.map_or(0, |_| 8)
            + self.source_picoseconds.map_or(0, |_| 2)
            + self.server_timestamp.map_or(0, |_| 8)
            + self.server_picoseconds.map_or(0, |_| 2)
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_u8(self.mask())?;
        if let Some(value) = &self.value {
            value.encode(encoder)?;
        }
        if let Some(status) = &self.status {
            status.encode(encoder)?;
        }
        if let Some(timestamp) = &self.source_timestamp {
            timestamp.encode(encoder)?;
        }
        if let Some(picoseconds) = &self.source_picoseconds {
            encoder.write_u16(*picoseconds)?;
        }
        if let Some(timestamp) = &self.server_timestamp {
            timestamp.encode(encoder)?;
        }
        if let Some(picoseconds) = &self.server_picoseconds {
            encoder.write_u16(*picoseconds)?;
        }
        Ok(())
    }
}

impl BinaryDecode for DataValue {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mask = decoder.read_u8()?;
        decoder.nested(|decoder| {
            let value = (mask & HAS_VALUE != 0)
                .then(|| Variant::decode(decoder))
                .transpose()?;
            let status = (mask & HAS_STATUS != 0)
                .then(|| StatusCode::decode(decoder))
                .transpose()?;
            let source_timestamp = (mask & HAS_SOURCE_TIMESTAMP != 0)
                .then(|| DateTime::decode(decoder))
                .transpose()?;
            let source_picoseconds = (mask & HAS_SOURCE_PICOSECONDS != 0)
                .then(|| decoder.read_u16())
                .transpose()?;
            let server_timestamp = (mask & HAS_SERVER_TIMESTAMP != 0)
                .then(|| DateTime::decode(decoder))
                .transpose()?;
            let server_picoseconds = (mask & HAS_SERVER_PICOSECONDS != 0)
                .then(|| decoder.read_u16())
                .transpose()?;
            Ok(Self {
                value,
                status,
                source_timestamp,
                source_picoseconds,
                server_timestamp,
                server_picoseconds,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_round_trips() {
        round_trip!(DataValue, DataValue::default(), &[0x00]);
    }

    #[test]
    fn mask_bits_match_the_present_fields() {
        let value = DataValue {
            value: Some(Variant::Int32(5)),
            status: Some(StatusCode::GOOD),
            source_timestamp: Some(DateTime::from_ticks(1)),
            source_picoseconds: Some(10),
            ..DataValue::default()
        };
        round_trip!(
            DataValue,
            value,
            &[
                0x17, // value | status | sourceTs | sourcePicos
                0x06, 0x05, 0x00, 0x00, 0x00, // Int32 variant
                0x00, 0x00, 0x00, 0x00, // Good
                0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // ticks 1
                0x0A, 0x00, // picoseconds
            ]
        );
    }

    #[test]
    fn status_only() {
        let value = DataValue {
            status: Some(StatusCode::BAD_INTERNAL_ERROR),
            ..DataValue::default()
        };
        round_trip!(DataValue, value, &[0x02, 0x00, 0x00, 0x02, 0x80]);
    }
}
