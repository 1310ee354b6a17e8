//! The `LocalizedText` type.

use crate::binary::{Decoder, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::{BinaryDecode, BinaryEncode, UaString};

const HAS_LOCALE: u8 = 0x01;
const HAS_TEXT: u8 = 0x02;

/// Human-readable text with an optional locale. The encoding mask records
/// which of the two fields is present; a null field is absent.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LocalizedText {
    pub locale: UaString,
    pub text: UaString,
}

impl LocalizedText {
    #[must_use]
    pub fn new(locale: impl Into<UaString>, text: impl Into<UaString>) -> Self {
        Self {
            locale: locale.into(),
            text: text.into(),
        }
    }

    /// Text with no locale.
    #[must_use]
    pub fn text_only(text: impl Into<UaString>) -> Self {
        Self {
            locale: UaString::null(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.locale.is_null() && self.text.is_null()
    }

    fn mask(&self) -> u8 {
        let mut mask = 0;
        if !self.locale.is_null() {
            mask |= HAS_LOCALE;
        }
        if !self.text.is_null() {
            mask |= HAS_TEXT;
        }
        mask
    }
}

impl core::fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl BinaryEncode for LocalizedText {
    fn encoded_size(&self) -> usize {
        let mut size = 1;
        if !self.locale.is_null() {
            size += self.locale.encoded_size();
        }
        if !self.text.is_null() {
            size += self.text.encoded_size();
        }
        size
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.write_u8(self.mask())?;
        if !self.locale.is_null() {
            self.locale.encode(encoder)?;
        }
        if !self.text.is_null() {
            self.text.encode(encoder)?;
        }
        Ok(())
    }
}

impl BinaryDecode for LocalizedText {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mask = decoder.read_u8()?;
        let locale = if mask & HAS_LOCALE != 0 {
            UaString::decode(decoder)?
        } else {
            UaString::null()
        };
        let text = if mask & HAS_TEXT != 0 {
            UaString::decode(decoder)?
        } else {
            UaString::null()
        };
        Ok(Self { locale, text })
    }
}
