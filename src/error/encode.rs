//! Error types associated with encoding to OPC UA Binary.

use snafu::Snafu;

use crate::types::StatusCode;

/// An error type for failed encoding.
///
/// The `kind` field determines the kind of error that occurred, and is boxed
/// to keep the `Result` size small on the happy path.
#[derive(Debug)]
pub struct EncodeError {
    /// The kind of encoding error received.
    pub kind: Box<Kind>,
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl EncodeError {
    #[must_use]
    pub fn from_kind(kind: Kind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }

    /// Creates a wrapper around an output buffer that cannot hold the encoding.
    #[must_use]
    pub fn insufficient_buffer(needed: usize, available: usize) -> Self {
        Self::from_kind(Kind::InsufficientBuffer { needed, available })
    }

    /// Creates a wrapper around an encoding that would exceed the configured
    /// maximum message size.
    #[must_use]
    pub fn message_size_exceeded(limit: usize, needed: usize) -> Self {
        Self::from_kind(Kind::MessageSizeExceeded { limit, needed })
    }

    /// Creates a wrapper around a sequence too long for a signed 32-bit
    /// length prefix.
    #[must_use]
    pub fn length_overflow(length: usize) -> Self {
        Self::from_kind(Kind::LengthOverflow { length })
    }

    /// Creates a wrapper around array dimensions whose product does not equal
    /// the flat array length.
    #[must_use]
    pub fn invalid_array_dimensions(declared: i64, actual: usize) -> Self {
        Self::from_kind(Kind::InvalidArrayDimensions { declared, actual })
    }

    /// Creates a wrapper around a value the wire format cannot represent.
    #[must_use]
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::from_kind(Kind::InvalidValue { msg: msg.into() })
    }

    /// Wraps a nested error with the name of the field being encoded.
    #[must_use]
    pub fn field(name: &'static str, nested: EncodeError) -> Self {
        Self::from_kind(Kind::FieldError {
            name,
            nested: Box::new(nested),
        })
    }

    /// The OPC UA status code with the same meaning as this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match &*self.kind {
            Kind::MessageSizeExceeded { .. } | Kind::LengthOverflow { .. } => {
                StatusCode::BAD_ENCODING_LIMITS_EXCEEDED
            }
            Kind::FieldError { nested, .. } => nested.status_code(),
            _ => StatusCode::BAD_ENCODING_ERROR,
        }
    }
}

impl core::error::Error for EncodeError {}

/// `EncodeError` kinds.
#[derive(Snafu)]
#[snafu(visibility(pub))]
#[derive(Debug)]
#[non_exhaustive]
pub enum Kind {
    /// The output buffer cannot hold the encoded form.
    #[snafu(display("Output buffer too small: needed {needed} bytes, {available} available"))]
    InsufficientBuffer {
        /// Bytes the encoding requires.
        needed: usize,
        /// Bytes the buffer can still take.
        available: usize,
    },

    /// The encoding would exceed the configured maximum message size.
    #[snafu(display("Encoded message would exceed {limit} bytes (needed {needed})"))]
    MessageSizeExceeded {
        /// The configured maximum message size.
        limit: usize,
        /// Bytes the encoding requires.
        needed: usize,
    },

    /// A sequence is too long for its signed 32-bit length prefix.
    #[snafu(display("Sequence of {length} items cannot be length-prefixed as Int32"))]
    LengthOverflow {
        /// The sequence length.
        length: usize,
    },

    /// Array dimensions do not multiply out to the flat array length.
    #[snafu(display(
        "Array dimensions product {declared} does not match flat length {actual}"
    ))]
    InvalidArrayDimensions {
        /// Product of the declared dimensions.
        declared: i64,
        /// The flat array length.
        actual: usize,
    },

    /// The value cannot be represented on the wire.
    #[snafu(display("Value not encodable: {msg}"))]
    InvalidValue {
        /// Why the value is not encodable.
        msg: String,
    },

    /// An error when encoding a field of a constructed type.
    #[snafu(display("Error when encoding field `{}`: {}", name, nested))]
    FieldError {
        /// The field's name.
        name: &'static str,
        /// The underlying error.
        nested: Box<EncodeError>,
    },

    /// Uncategorised error.
    #[snafu(display("Custom: {}", msg))]
    Custom {
        /// The error's message.
        msg: String,
    },
}
