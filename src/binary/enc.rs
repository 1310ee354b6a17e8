//! # Encoding OPC UA Binary.

use crate::binary::Limits;
use crate::error::EncodeError;

/// An OPC UA Binary encoder writing into a caller-supplied buffer.
///
/// All multi-byte values are written little-endian. The encoder enforces the
/// configured maximum message size relative to its own first write, so a
/// partially filled buffer can be reused across messages.
pub struct Encoder<'a> {
    output: &'a mut Vec<u8>,
    limits: Limits,
    start: usize,
}

impl<'a> Encoder<'a> {
    /// Creates a new instance writing to `output` under `limits`.
    pub fn new(output: &'a mut Vec<u8>, limits: Limits) -> Self {
        let start = output.len();
        Self {
            output,
            limits,
            start,
        }
    }

    /// Bytes written through this encoder so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.output.len() - self.start
    }

    /// Truncates the output back to `position`, undoing writes made since.
    /// The generated encoders use this so a failed encode leaves the
    /// writer where it started instead of half-committed.
    pub fn rewind_to(&mut self, position: usize) {
        self.output.truncate(self.start + position);
    }

    fn reserve(&mut self, additional: usize) -> Result<(), EncodeError> {
        let needed = self.position() + additional;
        if needed > self.limits.max_message_size {
            return Err(EncodeError::message_size_exceeded(
                self.limits.max_message_size,
                needed,
            ));
        }
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.reserve(1)?;
        self.output.push(value);
        Ok(())
    }

    pub fn write_i8(&mut self, value: i8) -> Result<(), EncodeError> {
        self.write_u8(value as u8)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.write_u8(u8::from(value))
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.reserve(bytes.len())?;
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes a length-prefixed byte sequence. `None` is written as the
    /// null length −1, an empty slice as length 0 with no payload.
    pub fn write_byte_sequence(&mut self, bytes: Option<&[u8]>) -> Result<(), EncodeError> {
        match bytes {
            None => self.write_i32(-1),
            Some(bytes) => {
                let length =
                    i32::try_from(bytes.len()).map_err(|_| EncodeError::length_overflow(bytes.len()))?;
                self.write_i32(length)?;
                self.write_bytes(bytes)
            }
        }
    }

    /// Writes the signed 32-bit length prefix of a non-null array.
    pub fn write_array_length(&mut self, length: usize) -> Result<(), EncodeError> {
        let length = i32::try_from(length).map_err(|_| EncodeError::length_overflow(length))?;
        self.write_i32(length)
    }
}
