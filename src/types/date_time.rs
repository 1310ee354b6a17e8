//! The `DateTime` type.

use chrono::{TimeZone, Utc};

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode};

/// 100-nanosecond intervals per second.
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 1601-01-01 and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;

/// An OPC UA `DateTime`: signed 64-bit count of 100 ns ticks since
/// 1601-01-01 00:00 UTC. The value 0 represents "no time".
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DateTime(i64);

impl DateTime {
    /// The "no time" value.
    pub const NULL: DateTime = DateTime(0);

    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    #[must_use]
    pub const fn ticks(&self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_chrono(&Utc::now())
    }

    /// Converts from a chrono timestamp, saturating at the representable
    /// range instead of wrapping.
    #[must_use]
    pub fn from_chrono(value: &chrono::DateTime<Utc>) -> Self {
        let seconds = value.timestamp();
        let sub_ticks = i64::from(value.timestamp_subsec_nanos() / 100);
        let Some(ticks) = seconds
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(sub_ticks))
            .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
        else {
            return Self(if seconds < 0 { i64::MIN } else { i64::MAX });
        };
        Self(ticks)
    }

    /// Converts to a chrono timestamp.
    #[must_use]
    pub fn to_chrono(&self) -> chrono::DateTime<Utc> {
        let unix_ticks = self.0 - UNIX_EPOCH_TICKS;
        let seconds = unix_ticks.div_euclid(TICKS_PER_SECOND);
        let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        match Utc.timestamp_opt(seconds, nanos) {
            chrono::LocalResult::Single(value) => value,
            _ => chrono::DateTime::<Utc>::MIN_UTC,
        }
    }
}

impl core::fmt::Display for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_null() {
            f.write_str("no-time")
        } else {
            write!(f, "{}", self.to_chrono().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
        }
    }
}

impl BinaryEncode for DateTime {
    fn encoded_size(&self) -> usize {
        8
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_i64(self.0)
    }
}

impl BinaryDecode for DateTime {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        decoder.read_i64().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        round_trip!(DateTime, DateTime::NULL, &[0; 8]);
        round_trip!(
            DateTime,
            DateTime::from_ticks(UNIX_EPOCH_TICKS),
            &UNIX_EPOCH_TICKS.to_le_bytes()
        );
    }

    #[test]
    fn chrono_conversion_is_exact_at_tick_resolution() {
        let original = DateTime::from_ticks(UNIX_EPOCH_TICKS + 1_234_567);
        assert_eq!(DateTime::from_chrono(&original.to_chrono()), original);
    }

    #[test]
    fn unix_epoch_maps_to_the_known_tick_count() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(DateTime::from_chrono(&epoch).ticks(), UNIX_EPOCH_TICKS);
    }
}
