//! Error types associated with decoding from OPC UA Binary.

use snafu::Snafu;

use crate::types::{NodeId, StatusCode};

/// Which configured decoder limit a hostile or oversized message ran into.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecodingLimit {
    /// `Limits::max_string_length`
    StringLength,
    /// `Limits::max_byte_string_length`
    ByteStringLength,
    /// `Limits::max_array_length`
    ArrayLength,
    /// `Limits::max_message_size`
    MessageSize,
}

impl core::fmt::Display for DecodingLimit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StringLength => write!(f, "string length"),
            Self::ByteStringLength => write!(f, "byte-string length"),
            Self::ArrayLength => write!(f, "array length"),
            Self::MessageSize => write!(f, "message size"),
        }
    }
}

/// An error type for failed decoding.
///
/// The `kind` field determines the kind of error that occurred, and is boxed
/// to keep the `Result` size small on the happy path.
#[derive(Debug)]
pub struct DecodeError {
    /// The kind of decoding error received.
    pub kind: Box<Kind>,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl DecodeError {
    #[must_use]
    pub fn from_kind(kind: Kind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }

    /// Creates a wrapper around input that ended before the encoding did.
    #[must_use]
    pub fn incomplete(needed: nom::Needed) -> Self {
        Self::from_kind(Kind::Incomplete { needed })
    }

    /// Creates a wrapper around a declared length that exceeds a configured
    /// limit. The decoder fails before allocating.
    #[must_use]
    pub fn limit_exceeded(limit: DecodingLimit, requested: u64, maximum: u64) -> Self {
        Self::from_kind(Kind::LimitExceeded {
            limit,
            requested,
            maximum,
        })
    }

    /// Creates a wrapper around nesting deeper than the configured maximum.
    #[must_use]
    pub fn nesting_depth_exceeded(maximum: u32) -> Self {
        Self::from_kind(Kind::NestingDepthExceeded { maximum })
    }

    /// Creates a wrapper around a malformed on-wire construct.
    #[must_use]
    pub fn invalid_encoding(msg: impl Into<String>) -> Self {
        Self::from_kind(Kind::InvalidEncoding { msg: msg.into() })
    }

    /// Creates a wrapper around an enumeration value with no known variant.
    #[must_use]
    pub fn invalid_enum_value(type_name: &'static str, value: i32) -> Self {
        Self::from_kind(Kind::InvalidEnumValue { type_name, value })
    }

    /// Creates a wrapper around a union selector with no matching member.
    #[must_use]
    pub fn invalid_union_selector(type_name: &'static str, selector: u32) -> Self {
        Self::from_kind(Kind::InvalidUnionSelector {
            type_name,
            selector,
        })
    }

    /// Creates a wrapper around an extension-object body whose declared and
    /// consumed lengths disagree.
    #[must_use]
    pub fn body_length_mismatch(declared: usize, consumed: usize) -> Self {
        Self::from_kind(Kind::BodyLengthMismatch { declared, consumed })
    }

    /// Wraps a nested error with the name of the field being decoded.
    #[must_use]
    pub fn field(name: &'static str, nested: DecodeError) -> Self {
        Self::from_kind(Kind::FieldError {
            name,
            nested: Box::new(nested),
        })
    }

    /// The OPC UA status code with the same meaning as this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match &*self.kind {
            Kind::LimitExceeded { .. } | Kind::NestingDepthExceeded { .. } => {
                StatusCode::BAD_ENCODING_LIMITS_EXCEEDED
            }
            Kind::FieldError { nested, .. } => nested.status_code(),
            _ => StatusCode::BAD_DECODING_ERROR,
        }
    }
}

impl core::error::Error for DecodeError {}

/// `DecodeError` kinds.
#[derive(Snafu)]
#[snafu(visibility(pub))]
#[derive(Debug)]
#[non_exhaustive]
pub enum Kind {
    /// The input ended before the encoding did.
    #[snafu(display("Need more data to continue: ({:?})", needed))]
    Incomplete {
        /// Amount of bytes needed.
        needed: nom::Needed,
    },

    /// A declared length exceeds a configured decoder limit.
    #[snafu(display("Declared {limit} {requested} exceeds the maximum of {maximum}"))]
    LimitExceeded {
        /// The limit that was hit.
        limit: DecodingLimit,
        /// The declared length.
        requested: u64,
        /// The configured maximum.
        maximum: u64,
    },

    /// Nested values (DiagnosticInfo, ExtensionObject, Variant) recursed
    /// deeper than the configured maximum.
    #[snafu(display("Nesting depth exceeds the maximum of {maximum}"))]
    NestingDepthExceeded {
        /// The configured maximum depth.
        maximum: u32,
    },

    /// The on-wire bytes are not a valid encoding.
    #[snafu(display("Invalid encoding: {msg}"))]
    InvalidEncoding {
        /// What was malformed.
        msg: String,
    },

    /// A length-prefixed string was not valid UTF-8.
    #[snafu(display("String is not valid UTF-8"))]
    InvalidUtf8,

    /// An enumeration value matched no variant.
    #[snafu(display("Value {value} is not a variant of {type_name}"))]
    InvalidEnumValue {
        /// The enumeration's name.
        type_name: &'static str,
        /// The value found on the wire.
        value: i32,
    },

    /// A union selector matched no member.
    #[snafu(display("Selector {selector} matches no member of union {type_name}"))]
    InvalidUnionSelector {
        /// The union's name.
        type_name: &'static str,
        /// The selector found on the wire.
        selector: u32,
    },

    /// An extension-object body declared one length but decoding consumed
    /// another.
    #[snafu(display("Body declared {declared} bytes but decoding consumed {consumed}"))]
    BodyLengthMismatch {
        /// The declared body length.
        declared: usize,
        /// The bytes the typed decode consumed.
        consumed: usize,
    },

    /// An extension object referenced an encoding id that is not registered.
    /// The body is retained undecoded, so this kind only surfaces when a
    /// typed decode was explicitly requested.
    #[snafu(display("No descriptor registered for encoding id {node_id}"))]
    UnknownEncodingId {
        /// The unknown binary encoding id.
        node_id: NodeId,
    },

    /// An error when decoding a field of a constructed type.
    #[snafu(display("Error when decoding field `{}`: {}", name, nested))]
    FieldError {
        /// The field's name.
        name: &'static str,
        /// The underlying error.
        nested: Box<DecodeError>,
    },

    /// Uncategorised error.
    #[snafu(display("Custom: {}", msg))]
    Custom {
        /// The error's message.
        msg: String,
    },
}
