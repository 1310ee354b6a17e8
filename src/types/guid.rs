//! The `Guid` type.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode};

/// A 128-bit globally unique identifier. The first three fields are encoded
/// little-endian, the trailing eight bytes verbatim.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const NULL: Guid = Guid {
        data1: 0,
        data2: 0,
        data3: 0,
        data4: [0; 8],
    };

    #[must_use]
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl core::fmt::Display for Guid {
    /// The canonical 8-4-4-4-12 form, lowercase.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7],
        )
    }
}

impl BinaryEncode for Guid {
    fn encoded_size(&self) -> usize {
        16
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_u32(self.data1)?;
        encoder.write_u16(self.data2)?;
        encoder.write_u16(self.data3)?;
        encoder.write_bytes(&self.data4)
    }
}

impl BinaryDecode for Guid {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let data1 = decoder.read_u32()?;
        let data2 = decoder.read_u16()?;
        let data3 = decoder.read_u16()?;
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(decoder.read_bytes(8)?);
        Ok(Self {
            data1,
            data2,
            data3,
            data4,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The example Guid from the OPC UA specification,
    // 72962B91-FA75-4AE6-8D28-B404DC7DAF63.
    fn sample() -> Guid {
        Guid::new(
            0x7296_2B91,
            0xFA75,
            0x4AE6,
            [0x8D, 0x28, 0xB4, 0x04, 0xDC, 0x7D, 0xAF, 0x63],
        )
    }

    #[test]
    fn round_trips_with_mixed_endianness() {
        round_trip!(
            Guid,
            sample(),
            &[
                0x91, 0x2B, 0x96, 0x72, // data1 LE
                0x75, 0xFA, // data2 LE
                0xE6, 0x4A, // data3 LE
                0x8D, 0x28, 0xB4, 0x04, 0xDC, 0x7D, 0xAF, 0x63,
            ]
        );
    }

    #[test]
    fn displays_canonical_form() {
        assert_eq!(sample().to_string(), "72962b91-fa75-4ae6-8d28-b404dc7daf63");
    }
}
